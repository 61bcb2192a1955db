pub mod health;
pub mod preferences;

pub use health::healthz_handler;
pub use preferences::{save_prefs_api, save_prefs_form, view_prefs};
