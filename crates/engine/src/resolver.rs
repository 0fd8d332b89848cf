//! Version path resolution
//!
//! Given the totally ordered version list and a (source, target) pair,
//! computes the ordered sequence of adjacent migration steps. Migration
//! never runs backward: a source at or after the target resolves to an
//! empty path.

use sff_core::{MigrateError, MigrationStep, Result, Version, VersionList};

/// Resolves (source, target) version pairs into adjacent step sequences
#[derive(Debug, Clone)]
pub struct VersionPathResolver {
    versions: VersionList,
}

impl VersionPathResolver {
    /// Create a resolver over an explicit version list
    pub fn new(versions: VersionList) -> Self {
        VersionPathResolver { versions }
    }

    /// The configured version list
    pub fn versions(&self) -> &VersionList {
        &self.versions
    }

    /// Resolve the migration path from `source` to `target`
    ///
    /// Fails with `UnknownVersion` if either endpoint is absent from the
    /// list. Returns the adjacent pairs from `source`'s position up to
    /// (excluding) `target`'s position; empty when `source` is at or after
    /// `target`.
    pub fn resolve(&self, source: &Version, target: &Version) -> Result<Vec<MigrationStep>> {
        let start = self
            .versions
            .position(source)
            .ok_or_else(|| MigrateError::UnknownVersion(source.as_str().to_string()))?;
        let end = self
            .versions
            .position(target)
            .ok_or_else(|| MigrateError::UnknownVersion(target.as_str().to_string()))?;
        if start >= end {
            return Ok(Vec::new());
        }
        let versions = self.versions.versions();
        Ok((start..end)
            .map(|i| MigrationStep::new(versions[i].clone(), versions[i + 1].clone()))
            .collect())
    }
}
