//! Store error types.

use thiserror::Error;

/// Struct-definition store errors.
///
/// Every failure aborts the current operation and is surfaced to the
/// caller; nothing is retried or swallowed internally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The name or guid is registered but does not denote a struct type.
    #[error("{0}: not a struct type")]
    NotAStructType(String),

    /// Create attempted on a name that already has a vertex.
    #[error("{0}: type already exists")]
    TypeAlreadyExists(String),

    /// No struct-category vertex for the given name or guid.
    #[error("no struct definition exists with {key} {value}")]
    NotFound {
        /// Lookup key kind, `"name"` or `"guid"`.
        key: &'static str,
        /// The value looked up.
        value: String,
    },

    /// An attribute references a type name with no vertex.
    #[error("{0}: unknown datatype")]
    UnknownReferencedType(String),

    /// A relationship constraint was requested on a map-typed attribute.
    #[error("{type_name}.{attribute}: constraints not supported on map type {data_type}")]
    UnsupportedConstraint {
        /// Owning struct type name.
        type_name: String,
        /// Attribute carrying the constraint.
        attribute: String,
        /// The offending declared type name.
        data_type: String,
    },

    /// A stored attribute blob did not parse to the expected shape.
    #[error("{type_name}: malformed stored attribute: {reason}")]
    Decode {
        /// Type whose stored data failed to parse.
        type_name: String,
        /// Parse failure detail.
        reason: String,
    },

    /// Attribute serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}
