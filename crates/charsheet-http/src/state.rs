use std::sync::Arc;

use charsheet_core::ProfileStore;
use charsheet_engine::ProfileService;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable; nothing in it is mutable.
#[derive(Clone)]
pub struct AppState {
    pub service: ProfileService,
    /// Saved profiles, read-only.
    pub store: Arc<dyn ProfileStore>,
}
