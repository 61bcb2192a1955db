pub mod db;
pub mod db_error;

pub use db::*;
pub use db_error::{DbAppError, DbResult};

pub use prefs_contracts::models;
pub use prefs_contracts::{AppError, AppResult, ErrorContextExt, ResultExt};
