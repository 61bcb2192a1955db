use crate::RequestContext;
use prefs_contracts::models::{PreferenceDto, PreferenceUpdateInputDto, UserDto};
use prefs_contracts::{AppError, AppResult};
use prefs_data::db::{self, DbConn, Store};

/// Reads and writes display preferences by username. Holds no state besides
/// the store handle; every call opens its own connection.
#[derive(Debug, Clone)]
pub struct PreferenceService {
    store: Store,
}

impl PreferenceService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    async fn resolve_user(&self, conn: &DbConn, username: &str) -> AppResult<UserDto> {
        db::find_user_by_username(conn, username)
            .await?
            .ok_or_else(|| AppError::user_not_found(username))
    }

    /// Preferences of `username`. A user without a preference row gets the
    /// defaults instead of an error.
    pub async fn fetch(
        &self,
        context: &RequestContext,
        username: &str,
    ) -> AppResult<PreferenceDto> {
        let conn = self.store.connect().await?;
        let user = self.resolve_user(&conn, username).await?;

        match db::get_preference_by_user_id(&conn, user.id).await? {
            Some(prefs) => Ok(prefs),
            None => {
                tracing::warn!(
                    event = "preference_row_missing",
                    request_id = context.request_id(),
                    user_id = user.id
                );
                Ok(PreferenceDto::default())
            }
        }
    }

    /// Overwrites all three fields of `username`'s preferences. Fields missing
    /// from `input` are reset to their defaults. Unknown users are never created.
    pub async fn update(
        &self,
        context: &RequestContext,
        username: &str,
        input: &PreferenceUpdateInputDto,
    ) -> AppResult<PreferenceDto> {
        let conn = self.store.connect().await?;
        let user = self.resolve_user(&conn, username).await?;

        let prefs = input.resolve();
        db::save_preference(&conn, user.id, &prefs).await?;

        tracing::debug!(
            event = "preferences_saved",
            request_id = context.request_id(),
            user_id = user.id,
            font_size = prefs.font_size.as_str(),
            theme = prefs.theme.as_str()
        );
        Ok(prefs)
    }
}

#[cfg(test)]
#[path = "../../tests/services/preference_service_tests.rs"]
mod tests;
