use thiserror::Error;

use crate::identity::RealId;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, VendorError>;

/// Errors raised when the vend/destroy discipline is violated.
///
/// Teardown problems (unconsumed queues, leaked bindings) are not errors of
/// this kind: they are collected as [`crate::Failure`] values so that one
/// broken invariant never stops the remaining checks from running.
///
/// # Examples
///
/// ```rust
/// use mock_vendor::{RealId, VendorError};
///
/// let error = VendorError::not_vended("ObjA", RealId::from(0x40));
/// assert!(error.is_not_vended());
/// assert!(error.to_string().contains("ObjA"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VendorError {
    /// Lookup of an identity that was never vended, or was already destroyed
    #[error("No mock of {type_name} is bound to real object {id}; vend must run in the constructor")]
    NotVended { type_name: &'static str, id: RealId },

    /// Any other misuse of the registry contract
    #[error("Mock vendor usage error: {0}")]
    Usage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl VendorError {
    /// Create a lookup error for an unbound identity
    pub fn not_vended(type_name: &'static str, id: RealId) -> Self {
        Self::NotVended { type_name, id }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Check if this error reports a lookup without a binding
    pub fn is_not_vended(&self) -> bool {
        matches!(self, VendorError::NotVended { .. })
    }

    /// Check if this error reports a usage problem
    pub fn is_usage(&self) -> bool {
        matches!(self, VendorError::Usage(_))
    }
}
