//! Migration handler registry
//!
//! A static mapping from adjacent `(source, target)` version pairs to the
//! handler that performs that step: a structural transform plus an
//! optional mesh codec hook. Populated at construction; an unknown pair is
//! a lookup-miss error in the pipeline, never a load failure.

use crate::transform::{RuleTransform, Transform};
use sff_codec::MeshCodec;
use sff_core::{MigrationStep, Version};
use std::collections::HashMap;

/// Everything one migration step needs
pub struct MigrationHandler {
    transform: Box<dyn Transform + Send + Sync>,
    codec: Option<MeshCodec>,
}

impl MigrationHandler {
    /// Create a handler around a structural transform
    pub fn new(transform: impl Transform + Send + Sync + 'static) -> Self {
        MigrationHandler {
            transform: Box::new(transform),
            codec: None,
        }
    }

    /// Attach a mesh codec hook, applied per mesh after the transform
    pub fn with_codec(mut self, codec: MeshCodec) -> Self {
        self.codec = Some(codec);
        self
    }

    /// The parameters the handler's transform declares
    pub fn declared_params(&self) -> &[String] {
        self.transform.declared_params()
    }

    /// The structural transform
    pub fn transform(&self) -> &(dyn Transform + Send + Sync) {
        self.transform.as_ref()
    }

    /// The mesh codec hook, if the step declares one
    pub fn codec(&self) -> Option<&MeshCodec> {
        self.codec.as_ref()
    }
}

/// Registry of handlers keyed by adjacent version pair
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<(Version, Version), MigrationHandler>,
}

impl HandlerRegistry {
    /// Empty registry
    pub fn empty() -> Self {
        HandlerRegistry::default()
    }

    /// Registry pre-populated with the migrations this build ships
    pub fn builtin() -> Self {
        let mut registry = HandlerRegistry::empty();
        registry.register(
            Version::new("0.7.0.dev0"),
            Version::new("0.8.0.dev0"),
            v0_7_0_dev0_to_v0_8_0_dev0(),
        );
        registry
    }

    /// Register a handler for an adjacent version pair
    ///
    /// Replaces any handler already registered for the pair; the pair is
    /// a total function onto exactly one handler.
    pub fn register(&mut self, source: Version, target: Version, handler: MigrationHandler) {
        self.handlers.insert((source, target), handler);
    }

    /// Look up the handler for a resolved step
    pub fn get(&self, step: &MigrationStep) -> Option<&MigrationHandler> {
        self.handlers
            .get(&(step.source.clone(), step.target.clone()))
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// The v0.7.0.dev0 -> v0.8.0.dev0 migration
///
/// Renames the camelCase container elements to their snake_case successors
/// and rewrites the declared schema version. The legacy vertex and polygon
/// lists are left in place for the codec hook, which replaces them with
/// the packed `vertices`/`normals`/`triangles` elements mesh by mesh.
fn v0_7_0_dev0_to_v0_8_0_dev0() -> MigrationHandler {
    let transform = RuleTransform::new()
        .rename_element("segmentList", "segment_list")
        .rename_element("meshList", "mesh_list")
        .rename_element("biologicalAnnotation", "biological_annotation")
        .set_text("version", "0.8.0.dev0");
    MigrationHandler::new(transform).with_codec(MeshCodec::default_encoding())
}
