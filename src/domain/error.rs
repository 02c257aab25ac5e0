use thiserror::Error;

/// Failure reported by a branch transform
///
/// Carries a machine-readable `kind` and a human-readable `cause`. The
/// coordinator never reshapes it; the first one observed becomes the
/// pipeline's aggregate error as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {cause}")]
pub struct BranchFailure {
    pub kind: String,
    pub cause: String,
}

impl BranchFailure {
    /// Create a new failure
    pub fn new(kind: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            cause: cause.into(),
        }
    }

    /// Failure raised when a transform cannot handle a payload
    pub fn invalid_payload(payload: impl std::fmt::Display) -> Self {
        Self::new("invalid.payload", format!("cannot handle: {}", payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            BranchFailure::new("invalid.payload", "cannot handle: nope").to_string(),
            "invalid.payload: cannot handle: nope"
        );
    }

    #[test]
    fn invalid_payload_builds_kind_and_cause() {
        let failure = BranchFailure::invalid_payload("nope");
        assert_eq!(failure.kind, "invalid.payload");
        assert_eq!(failure.cause, "cannot handle: nope");
    }

    #[test]
    fn error_is_cloneable() {
        let err = BranchFailure::invalid_payload(42);
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
