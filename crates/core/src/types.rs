//! Version identifiers and migration steps
//!
//! A `Version` is an opaque token; ordering comes only from its position in
//! the configured `VersionList`. Adjacency in the list defines the only
//! legal direct migration steps.

use std::fmt;

/// Schema version identifier
///
/// Opaque and totally ordered by position in a [`VersionList`], never by
/// string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Create a version from its string token
    pub fn new(token: impl Into<String>) -> Self {
        Version(token.into())
    }

    /// The version token as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version::new(s)
    }
}

/// One adjacent migration step `(source, target)`
///
/// Created by the version path resolver; consumed by the pipeline;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MigrationStep {
    /// Version migrated from
    pub source: Version,
    /// Version migrated to
    pub target: Version,
}

impl MigrationStep {
    /// Create a step between two adjacent versions
    pub fn new(source: Version, target: Version) -> Self {
        MigrationStep { source, target }
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// The known schema versions supported by this build, oldest first
pub const DEFAULT_VERSIONS: [&str; 2] = ["0.7.0.dev0", "0.8.0.dev0"];

/// Totally ordered list of known schema versions
///
/// ## Invariants
///
/// - The list contains no duplicate tokens
/// - Adjacency in the list defines the only legal direct migration steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionList(Vec<Version>);

impl VersionList {
    /// Create a version list from ordered tokens
    ///
    /// The caller is responsible for supplying a duplicate-free list;
    /// duplicates would make step resolution ambiguous.
    pub fn new(versions: Vec<Version>) -> Self {
        debug_assert!(
            {
                let mut seen = std::collections::HashSet::new();
                versions.iter().all(|v| seen.insert(v.as_str()))
            },
            "version list contains duplicates"
        );
        VersionList(versions)
    }

    /// Position of a version in the list, if present
    pub fn position(&self, version: &Version) -> Option<usize> {
        self.0.iter().position(|v| v == version)
    }

    /// The newest known version (last in the list)
    ///
    /// Returns `None` only for an empty list, which no useful
    /// configuration produces.
    pub fn latest(&self) -> Option<&Version> {
        self.0.last()
    }

    /// The versions in order, oldest first
    #[inline]
    pub fn versions(&self) -> &[Version] {
        &self.0
    }

    /// Number of known versions
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for VersionList {
    /// The version list this build ships with
    fn default() -> Self {
        VersionList::new(DEFAULT_VERSIONS.iter().map(|v| Version::new(*v)).collect())
    }
}
