//! Maps `Box<dyn Error>` from the `PoseSource` boundary to typed `RepError`.
//!
//! Providers are free to report failures with any error type; the core only
//! distinguishes "no frame arrived in time" from everything else.

use crate::error::RepError;

/// Map a provider error to a typed `RepError`.
///
/// `std::io::ErrorKind::TimedOut`/`WouldBlock` map to `Timeout`, as does any
/// message mentioning a timeout; all else becomes `Source`.
pub fn map_source_error(e: &(dyn std::error::Error + 'static)) -> RepError {
    if let Some(io) = e.downcast_ref::<std::io::Error>()
        && matches!(
            io.kind(),
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
        )
    {
        return RepError::Timeout;
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") || s.to_lowercase().contains("timed out") {
        RepError::Timeout
    } else {
        RepError::Source(s)
    }
}
