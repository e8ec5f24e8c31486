//! Common error infrastructure for merge-core.
//!
//! Domain-specific rejections (`GridError`, `RestoreError`, `MissionError`)
//! are defined next to the actions that produce them. Every one of them is a
//! value returned to the caller; no core operation panics on invalid input.

/// Severity level of an error, used for categorization and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same request may succeed later without changes.
    ///
    /// Examples: grid full, not enough gold or energy yet
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: slot index out of range, unknown parcel id
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all merge-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for metrics and for asserting on rejections in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
