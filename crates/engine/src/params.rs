//! Parameter provision
//!
//! A handler declares the named parameters its transform requires; where
//! the values come from is the caller's business. The pipeline takes an
//! injected [`ParameterSource`]: a fixed positional list for scripted
//! runs, or an interactive prompt supplied by the CLI shell.

use crate::transform::Params;
use sff_core::{MigrateError, Result};

/// Supplies values for a handler's declared parameters
pub trait ParameterSource {
    /// Resolve values for the declared parameter names, in order
    fn resolve(&self, declared: &[String]) -> Result<Params>;
}

/// Positional value list
///
/// Values are consumed positionally against the declared parameter names;
/// the lengths must match exactly.
#[derive(Debug, Clone, Default)]
pub struct FixedParams {
    values: Vec<String>,
}

impl FixedParams {
    /// Create a source over positional values
    pub fn new(values: Vec<String>) -> Self {
        FixedParams { values }
    }
}

impl ParameterSource for FixedParams {
    fn resolve(&self, declared: &[String]) -> Result<Params> {
        if declared.len() != self.values.len() {
            return Err(MigrateError::ParameterCountMismatch {
                expected: declared.len(),
                actual: self.values.len(),
            });
        }
        Ok(declared
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect())
    }
}

/// Source for runs whose handlers declare no parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParams;

impl ParameterSource for NoParams {
    fn resolve(&self, declared: &[String]) -> Result<Params> {
        if !declared.is_empty() {
            return Err(MigrateError::ParameterCountMismatch {
                expected: declared.len(),
                actual: 0,
            });
        }
        Ok(Params::new())
    }
}
