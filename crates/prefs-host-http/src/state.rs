use crate::view::ViewRenderer;
use prefs_app::PreferenceService;
use prefs_contracts::AppResult;
use std::sync::Arc;

/// Everything a handler needs, shared across workers through `web::Data`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub preferences: PreferenceService,
    pub views: Arc<ViewRenderer>,
}

impl AppState {
    pub fn new(preferences: PreferenceService) -> AppResult<Self> {
        Ok(Self {
            preferences,
            views: Arc::new(ViewRenderer::new()?),
        })
    }
}
