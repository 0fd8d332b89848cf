//! Error types for sff-migrate
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every codec- and resolver-level error is fatal to the enclosing migration
//! run: there is no local recovery, retry, or partial commit. The one
//! non-fatal signal — fields dropped by a structural transform — is not an
//! error at all; it travels in the per-step report instead.

use crate::types::Version;
use std::io;
use thiserror::Error;

/// Result type alias for migration operations
pub type Result<T> = std::result::Result<T, MigrateError>;

/// Error types for the migration core
#[derive(Debug, Error)]
pub enum MigrateError {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Document syntax error (malformed XML, bad numbers, missing attributes)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Transport decoding failed (invalid base64 payload)
    #[error("Transport decode error: {0}")]
    Transport(String),

    /// Unsupported numeric mode token
    #[error("Invalid numeric mode: {0:?}")]
    InvalidMode(String),

    /// Unsupported byte-order token
    #[error("Invalid endianness: {0:?}")]
    InvalidEndianness(String),

    /// Decoded byte length does not match the declared element count
    #[error("Truncated data: expected {expected} bytes, got {actual}")]
    TruncatedData {
        /// Byte length implied by the declared count and mode
        expected: usize,
        /// Byte length actually available
        actual: usize,
    },

    /// Normal-vertex count differs from surface-vertex count
    #[error("Mismatched normal count: {normals} normals for {surface} surface vertices")]
    MismatchedNormalCount {
        /// Number of surface vertices in the mesh
        surface: usize,
        /// Number of normal vertices in the mesh
        normals: usize,
    },

    /// A triangle has neither 3 nor 6 vertex references
    #[error("Malformed triangle {triangle}: has {refs} vertex references, expected 3 or 6")]
    MalformedTriangle {
        /// Triangle identifier from the source document
        triangle: u64,
        /// Number of vertex references found
        refs: usize,
    },

    /// An interleaved triangle references a surface vertex never seen in the vertex scan
    #[error("Triangle {triangle} references unknown surface vertex {vertex}")]
    UnknownVertexReference {
        /// Triangle identifier from the source document
        triangle: u64,
        /// The unresolvable surface-vertex identifier
        vertex: u64,
    },

    /// An encoded triangle index is not less than the surface-vertex count
    #[error("Dangling triangle reference: index {index} >= surface vertex count {surface_count}")]
    DanglingTriangleReference {
        /// The out-of-range encoded index
        index: u64,
        /// Number of surface vertices in the mesh
        surface_count: usize,
    },

    /// Source or target version absent from the configured version list
    #[error("Unknown version: {0:?} not found in the configured version list")]
    UnknownVersion(String),

    /// No registered handler for a required adjacent version pair
    ///
    /// The fields are not named `source`/`target`: thiserror reserves a
    /// `source` field for the error-cause chain.
    #[error("No migration handler registered for {from} -> {to}")]
    NoMigrationHandler {
        /// Source version of the missing step
        from: Version,
        /// Target version of the missing step
        to: Version,
    },

    /// Supplied parameter values do not match a handler's declared arity
    #[error("Parameter count mismatch: handler declares {expected} parameters, {actual} supplied")]
    ParameterCountMismatch {
        /// Number of parameters the handler declares
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },
}
