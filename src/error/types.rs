use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the Gantt layout MVP crate.
pub type Result<T> = std::result::Result<T, GanttError>;

/// Errors surfaced by the layout engine MVP.
///
/// Normal layout operation never fails: an unset visible window projects to
/// zero, a missing parent reader collapses children into one implicit group,
/// and an empty child collection packs into zero rows. The variants below
/// cover configuration validation and logging plumbing only.
#[derive(Debug, Error)]
pub enum GanttError {
    #[error("visible window end precedes its start")]
    InvalidWindow,
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
