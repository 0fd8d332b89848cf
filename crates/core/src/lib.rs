//! Core types for sff-migrate
//!
//! This crate defines the foundational vocabulary used throughout the system:
//! - Version / VersionList: schema version tokens and their total order
//! - MigrationStep: one adjacent (source, target) pair
//! - Mode / Endianness: wire-visible numeric type and byte-order tokens
//! - MigrateError / Result: the error taxonomy of the migration core

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod mode;
pub mod types;

pub use error::{MigrateError, Result};
pub use mode::{Endianness, Mode, ALL_MODES};
pub use types::{MigrationStep, Version, VersionList, DEFAULT_VERSIONS};
