pub mod accounts;
pub mod doses;
pub mod history;
pub mod meals;
pub mod symptoms;
pub mod waitlist;

/// Map a blocking-task join failure into the domain error type.
pub(crate) fn join_error(e: tokio::task::JoinError) -> alpha_core::AlphaError {
    alpha_core::AlphaError::Other(format!("Background task failed: {}", e))
}
