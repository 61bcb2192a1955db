use super::DbConn;
use crate::db_error::{DbAppError, DbResult};
use crate::models::{PreferenceDto, UserDto};
use libsql::{Row, params};

fn map_user_row(row: &Row) -> DbResult<UserDto> {
    Ok(UserDto {
        id: row.get(0)?,
        username: row.get(1)?,
    })
}

fn map_preference_row(row: &Row) -> DbResult<PreferenceDto> {
    Ok(PreferenceDto {
        font_size: row.get(0)?,
        theme: row.get(1)?,
        base_font: row.get(2)?,
    })
}

pub async fn find_user_by_username(conn: &DbConn, username: &str) -> DbResult<Option<UserDto>> {
    let mut rows = conn
        .query(
            "SELECT id, username FROM users WHERE username = ?1 LIMIT 1",
            params![username],
        )
        .await?;

    if let Some(row) = rows.next().await? {
        return Ok(Some(map_user_row(&row)?));
    }
    Ok(None)
}

pub async fn get_preference_by_user_id(
    conn: &DbConn,
    user_id: i64,
) -> DbResult<Option<PreferenceDto>> {
    let mut rows = conn
        .query(
            "SELECT font_size, theme, base_font FROM preferences WHERE user_id = ?1 LIMIT 1",
            params![user_id],
        )
        .await?;

    if let Some(row) = rows.next().await? {
        return Ok(Some(map_preference_row(&row)?));
    }
    Ok(None)
}

async fn write_preference(
    conn: &DbConn,
    user_id: i64,
    prefs: &PreferenceDto,
) -> libsql::Result<()> {
    let updated = conn
        .execute(
            "UPDATE preferences SET font_size = ?1, theme = ?2, base_font = ?3 WHERE user_id = ?4",
            params![
                prefs.font_size.as_str(),
                prefs.theme.as_str(),
                prefs.base_font.as_str(),
                user_id
            ],
        )
        .await?;

    if updated == 0 {
        conn.execute(
            "INSERT INTO preferences (font_size, theme, base_font, user_id) VALUES (?1, ?2, ?3, ?4)",
            params![
                prefs.font_size.as_str(),
                prefs.theme.as_str(),
                prefs.base_font.as_str(),
                user_id
            ],
        )
        .await?;
    }
    Ok(())
}

/// Stores all three fields for the user in one transaction, creating the
/// preference row if the user has none. On failure nothing is kept.
pub async fn save_preference(conn: &DbConn, user_id: i64, prefs: &PreferenceDto) -> DbResult<()> {
    let tx = conn.transaction().await?;
    if let Err(error) = write_preference(&tx, user_id, prefs).await {
        if let Err(rollback_error) = tx.rollback().await {
            tracing::warn!(
                event = "preference_rollback_failed",
                user_id = user_id,
                detail = %rollback_error
            );
        }
        return Err(DbAppError::from_write_error(error));
    }

    tx.commit().await.map_err(DbAppError::from_write_error)?;
    Ok(())
}

/// Inserts a user with a default preference row. An existing user with the
/// same name is returned untouched.
pub async fn insert_user_with_default_preference(
    conn: &DbConn,
    username: &str,
) -> DbResult<UserDto> {
    let tx = conn.transaction().await?;
    let inserted = tx
        .execute(
            "INSERT INTO users (username) VALUES (?1) ON CONFLICT(username) DO NOTHING",
            params![username],
        )
        .await?;

    if inserted > 0 {
        let user_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO preferences (user_id) VALUES (?1)",
            params![user_id],
        )
        .await?;
    }

    let user = find_user_by_username(&tx, username).await?;
    tx.commit().await?;

    user.ok_or_else(|| DbAppError::from(crate::AppError::user_not_found(username)))
}
