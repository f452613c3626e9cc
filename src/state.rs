use std::sync::Arc;

use crate::application::services::RedirectService;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService>,
}

impl AppState {
    pub fn new(redirect_service: Arc<RedirectService>) -> Self {
        Self { redirect_service }
    }
}
