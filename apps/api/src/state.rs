use std::sync::Arc;

use crate::config::Config;
use crate::ranking::stopwords::StopWords;
use crate::storage::ResumeArchive;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub stopwords: Arc<StopWords>,
    /// Upload persistence. `DiskArchive` by default, `NullArchive` when disabled.
    pub archive: Arc<dyn ResumeArchive>,
}
