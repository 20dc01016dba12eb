use thiserror::Error;

/// Failure of a single-item deletion drive.
///
/// Each variant maps to one step of the host's native delete flow not
/// completing within its bounded wait. These errors are isolated at item
/// granularity: the executor counts them and moves on, nothing propagates
/// past the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeleteError {
    #[error("item action menu did not appear in time")]
    MenuTimeout,

    #[error("delete action not found in the item menu")]
    DeleteActionTimeout,

    #[error("delete confirmation control did not appear in time")]
    ConfirmTimeout,

    #[error("presentation node detached from the document")]
    NodeDetached,
}
