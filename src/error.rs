//! Failure taxonomy for the engine.
//!
//! Every user-correctable or external-data failure funnels through the
//! feedback queue as an OK notification; persistence and scanner failures
//! are logged and swallowed. No failure is fatal to the session.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Barcode is not a non-empty string of digits. User-correctable.
    #[error("Please scan or enter a valid numerical barcode.")]
    InvalidBarcode,

    /// The lookup proxy answered, but without usable product data.
    #[error("{0}")]
    ProductNotFound(String),

    /// The lookup response could not be parsed at all.
    #[error("Product data is invalid.")]
    LookupFailed,

    /// The host could not persist state. Logged only, never surfaced.
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    /// Camera missing or permission denied. Logged only; the host
    /// returns the user to the dashboard.
    #[error("scanner unavailable: {0}")]
    ScannerUnavailable(String),
}

impl EngineError {
    /// Whether this failure is shown to the user through the feedback
    /// queue (as opposed to being logged and swallowed).
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidBarcode
                | EngineError::ProductNotFound(_)
                | EngineError::LookupFailed
        )
    }

    /// Title of the OK feedback item raised for a user-facing failure.
    pub fn feedback_title(&self) -> &'static str {
        match self {
            EngineError::InvalidBarcode => "Invalid Barcode",
            _ => "Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_split() {
        assert!(EngineError::InvalidBarcode.is_user_facing());
        assert!(EngineError::ProductNotFound("x".into()).is_user_facing());
        assert!(EngineError::LookupFailed.is_user_facing());
        assert!(!EngineError::PersistenceFailed("x".into()).is_user_facing());
        assert!(!EngineError::ScannerUnavailable("x".into()).is_user_facing());
    }

    #[test]
    fn invalid_barcode_keeps_its_own_title() {
        assert_eq!(EngineError::InvalidBarcode.feedback_title(), "Invalid Barcode");
        assert_eq!(
            EngineError::ProductNotFound("Product not found in database.".into())
                .feedback_title(),
            "Error"
        );
    }

    #[test]
    fn display_matches_feedback_text() {
        assert_eq!(
            EngineError::InvalidBarcode.to_string(),
            "Please scan or enter a valid numerical barcode."
        );
        assert_eq!(
            EngineError::ProductNotFound("Product not found in database.".into())
                .to_string(),
            "Product not found in database."
        );
    }
}
