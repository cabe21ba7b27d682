use std::time::Instant;

use crate::actions::Actions;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Action services over the external clients
    pub actions: Actions,
    /// Serving since
    pub started_at: Instant,
}

impl AppState {
    pub fn new(actions: Actions) -> Self {
        Self {
            actions,
            started_at: Instant::now(),
        }
    }
}
