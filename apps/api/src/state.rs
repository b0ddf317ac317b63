use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::session::SessionRegistry;
use crate::profiles::ProfileDirectory;
use crate::store::MarketStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MarketStore>,
    /// Profile collaborator — descriptor building plus display enrichment.
    pub profiles: Arc<dyn ProfileDirectory>,
    /// One bid-evaluation session per job, opened lazily on first access.
    pub sessions: Arc<SessionRegistry>,
    pub config: Config,
}
