use crate::error_code::ErrorClass;
use crate::Error;

/// What the dispatcher does with a request whose completion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Escalate priority and re-enqueue.
    Requeue,
    /// Resolve the caller with a failure response.
    Fail,
    /// Resolve the caller with the local rewrite.
    Fallback,
}

/// Retry / fail / fallback after a failed completion.
///
/// - retryable classes requeue while `retry_count < max_retries`
/// - auth always fails, as do retryable classes once retries are used up
/// - anything else (not found, unusable replies, configuration) falls back locally
pub(crate) fn decide(err: &Error, retry_count: u32, max_retries: u32) -> Decision {
    let class = err.class();
    if class.retryable() && retry_count < max_retries {
        return Decision::Requeue;
    }
    match class {
        ErrorClass::Authentication
        | ErrorClass::RateLimited
        | ErrorClass::ServerError
        | ErrorClass::Network
        | ErrorClass::Timeout
        | ErrorClass::Shutdown => Decision::Fail,
        _ => Decision::Fallback,
    }
}
