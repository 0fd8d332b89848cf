//! sff-migrate - Schema migration for EMDB-SFF segmentation documents
//!
//! Upgrades a segmentation document from the schema version it declares to
//! a newer one by chaining the adjacent single-step migrations registered
//! for this build. Each step rewrites the document's structure and, where
//! the target schema packs geometry, re-encodes mesh vertex and triangle
//! data into base64 binary arrays.
//!
//! # Quick Start
//!
//! ```ignore
//! use sff_migrate::{
//!     parse_document, source_version, HandlerRegistry, MigrationPipeline, NoParams,
//!     Version, VersionList,
//! };
//!
//! let document = parse_document(&xml)?;
//! let source = source_version(&document)?;
//!
//! let pipeline = MigrationPipeline::new(VersionList::default(), HandlerRegistry::builtin());
//! let report = pipeline.run(document, &source, &Version::new("0.8.0.dev0"), &NoParams)?;
//! ```
//!
//! # Architecture
//!
//! - [`sff_core`]: version identifiers, packing modes, the error taxonomy
//! - [`sff_document`]: the element tree and its XML reader/writer
//! - [`sff_codec`]: numeric packing and the legacy-mesh encoder
//! - [`sff_engine`]: path resolution, transforms, registry, pipeline

pub use sff_codec::{
    pack, transport_decode, transport_encode, unpack, Designation, EncodedArray, EncodedMesh,
    LegacyMesh, LegacyTriangle, LegacyVertex, MeshCodec, VertexRemap,
};
pub use sff_core::{
    Endianness, MigrateError, MigrationStep, Mode, Result, Version, VersionList, ALL_MODES,
    DEFAULT_VERSIONS,
};
pub use sff_document::{parse_document, source_version, write_document, Element};
pub use sff_engine::{
    dropped_fields, DroppedFields, FixedParams, HandlerRegistry, MigrationHandler,
    MigrationPipeline, MigrationReport, NoParams, ParameterSource, Params, Rule, RuleTransform,
    RuleValue, StepReport, Transform, VersionPathResolver,
};
