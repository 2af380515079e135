//! Fatal manager errors.
//!
//! Only initialization can fail hard; everything per-item is reported
//! through batch error callbacks instead (see `fpt_types::BatchElementError`).

use fpt_backend::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("manager is not initialized")]
    NotInitialized,

    #[error(transparent)]
    Backend(#[from] BackendError),
}
