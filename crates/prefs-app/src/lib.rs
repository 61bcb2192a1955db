mod context;
pub mod services;

pub use context::RequestContext;
pub use services::preferences::PreferenceService;
