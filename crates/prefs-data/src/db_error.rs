use prefs_contracts::{AppError, codes};
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone)]
pub struct DbAppError {
    inner: AppError,
}

impl DbAppError {
    pub fn into_inner(self) -> AppError {
        self.inner
    }

    /// Maps a failed write. Integrity violations surface as a generic save
    /// failure with no field detail; everything else stays a storage error.
    pub fn from_write_error(error: libsql::Error) -> Self {
        if is_constraint_violation(&error) {
            return Self {
                inner: AppError::new(codes::PREFERENCES_SAVE_FAILED, "Failed to save preferences")
                    .with_source(error),
            };
        }
        Self::from(error)
    }
}

const SQLITE_CONSTRAINT: i32 = 19;

/// True for any `SQLITE_CONSTRAINT` family result (unique, foreign key,
/// not null, ...). Extended codes carry the primary code in the low byte.
pub(crate) fn is_constraint_violation(error: &libsql::Error) -> bool {
    match error {
        libsql::Error::SqliteFailure(code, _) => (*code & 0xff) == SQLITE_CONSTRAINT,
        _ => false,
    }
}

impl Display for DbAppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl StdError for DbAppError {}

impl From<AppError> for DbAppError {
    fn from(value: AppError) -> Self {
        Self { inner: value }
    }
}

impl From<anyhow::Error> for DbAppError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            inner: AppError::from(value),
        }
    }
}

impl From<libsql::Error> for DbAppError {
    fn from(value: libsql::Error) -> Self {
        Self {
            inner: AppError::new(codes::DB_ERROR, "Database operation failed").with_source(value),
        }
    }
}

impl From<DbAppError> for AppError {
    fn from(value: DbAppError) -> Self {
        value.into_inner()
    }
}

pub type DbResult<T> = Result<T, DbAppError>;
