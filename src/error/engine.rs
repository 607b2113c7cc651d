use thiserror::Error;

use super::{CaseError, RenderError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Suite '{suite}' case '{case}' failed: {source}")]
    CaseFailed {
        suite: String,
        case: String,
        #[source]
        source: CaseError,
    },
    #[error("Suite '{suite}' base API cannot be rendered: {source}")]
    BaseApi {
        suite: String,
        #[source]
        source: RenderError,
    },
    #[error("Worker task failed: {source}")]
    WorkerFailed {
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("Worker pool was closed.")]
    PoolClosed,
}
