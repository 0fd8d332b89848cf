//! Migration engine for sff-migrate
//!
//! Sequences schema migrations: resolves the version path, looks up the
//! handler registered for each adjacent version pair, applies structural
//! transforms and mesh codec hooks, and threads intermediate documents
//! between steps.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod params;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod transform;

pub use params::{FixedParams, NoParams, ParameterSource};
pub use pipeline::{MigrationPipeline, MigrationReport, StepReport};
pub use registry::{HandlerRegistry, MigrationHandler};
pub use resolver::VersionPathResolver;
pub use transform::{dropped_fields, DroppedFields, Params, Rule, RuleTransform, RuleValue, Transform};
