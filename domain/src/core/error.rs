//! Domain error types

use thiserror::Error;

/// Domain-level validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Trait score out of range for {trait_name}: {value} (expected 0-100)")]
    TraitOutOfRange { trait_name: &'static str, value: i64 },

    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

impl DomainError {
    /// Check if this error came from personality validation
    pub fn is_trait_error(&self) -> bool {
        matches!(self, DomainError::TraitOutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_error_display() {
        let error = DomainError::TraitOutOfRange {
            trait_name: "openness",
            value: 120,
        };
        assert_eq!(
            error.to_string(),
            "Trait score out of range for openness: 120 (expected 0-100)"
        );
    }

    #[test]
    fn test_is_trait_error_check() {
        assert!(
            DomainError::TraitOutOfRange {
                trait_name: "neuroticism",
                value: -1
            }
            .is_trait_error()
        );
        assert!(!DomainError::InvalidMessage("x".to_string()).is_trait_error());
    }
}
