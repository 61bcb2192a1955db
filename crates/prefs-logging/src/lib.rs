pub mod logging;

pub use logging::*;

pub use prefs_contracts::{AppError, AppResult, ErrorContextExt, ResultExt};
