//! Error types for Wirebox container operations.
//!
//! Lookup misses are deliberately *not* errors: a `resolve` parameter or a
//! [`Resolver::resolve`](crate::resolver::Resolver::resolve) call against an
//! unknown key yields [`Value::Null`](crate::value::Value::Null).

use std::fmt;

use crate::key::InvokerKey;

/// Main error type for all Wirebox operations.
#[derive(Debug, thiserror::Error)]
pub enum WireboxError {
    /// An entry was invoked whose lifecycle was never declared
    /// (require-registration mode only).
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// A factory asked for an argument of the wrong type.
    #[error("Argument {index}: expected {expected}, found {found}")]
    InvalidArgument {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// Factory returned an error during construction.
    #[error("Failed to construct {implementation}: {source}")]
    ConstructionFailed {
        implementation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A registration targeted an item that was never included.
    #[error("No item {namespace}.{item} was included. Include its namespace before registering entries for it")]
    UnknownItem { namespace: String, item: String },
}

impl WireboxError {
    /// Wraps an error raised by a factory body.
    pub fn construction(
        implementation: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConstructionFailed {
            implementation: implementation.into(),
            source: source.into(),
        }
    }
}

/// Error when an entry without a declared lifecycle is invoked.
///
/// Names both the registry key and the implementation so the offending
/// registration can be found.
#[derive(Debug, Clone)]
pub struct NotRegisteredError {
    /// The entry that was invoked
    pub key: InvokerKey,
    /// Name of the implementation behind the entry
    pub implementation: String,
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Implementation not registered: {} (entry {})",
            self.implementation, self.key
        )?;
        write!(
            f,
            "\n  Hint: declare a lifecycle, e.g. registrations.register(\"{}\", \"{}\", |entries, _, _| {{ entries.with_entry().per_dependency(); }})",
            self.key.namespace(),
            self.key.item(),
        )
    }
}

/// Convenient Result type for Wirebox operations.
pub type Result<T> = std::result::Result<T, WireboxError>;
