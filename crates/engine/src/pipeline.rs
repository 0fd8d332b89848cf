//! Migration pipeline
//!
//! Linear chain of steps, strictly sequential: resolve the path, look up
//! the handler for each adjacent pair, apply its structural transform and
//! then its codec hook, and feed each step's output into the next. The
//! first failing step aborts the whole run; dropped-field detection is the
//! one non-fatal signal and is collected into the returned report instead.

use crate::params::ParameterSource;
use crate::registry::HandlerRegistry;
use crate::resolver::VersionPathResolver;
use crate::transform::{dropped_fields, DroppedFields};
use sff_codec::{LegacyMesh, MeshCodec};
use sff_core::{MigrateError, MigrationStep, Result, Version, VersionList};
use sff_document::Element;
use tracing::{debug, info, warn};

/// What one completed step reports
#[derive(Debug)]
pub struct StepReport {
    /// The step that ran
    pub step: MigrationStep,
    /// Fields the structural transform dropped
    pub dropped: DroppedFields,
}

/// The result of a completed run
#[derive(Debug)]
pub struct MigrationReport {
    /// The fully migrated document
    pub document: Element,
    /// Per-step reports in execution order
    pub steps: Vec<StepReport>,
}

/// Sequences migration steps and threads documents between them
pub struct MigrationPipeline {
    resolver: VersionPathResolver,
    registry: HandlerRegistry,
}

impl MigrationPipeline {
    /// Create a pipeline over an explicit version list and registry
    pub fn new(versions: VersionList, registry: HandlerRegistry) -> Self {
        MigrationPipeline {
            resolver: VersionPathResolver::new(versions),
            registry,
        }
    }

    /// The pipeline's path resolver
    pub fn resolver(&self) -> &VersionPathResolver {
        &self.resolver
    }

    /// Run the migration from `source` to `target`
    ///
    /// Aborts at the first failing step; previously completed steps are
    /// not rolled back, but nothing is handed back to the caller on
    /// failure.
    pub fn run(
        &self,
        document: Element,
        source: &Version,
        target: &Version,
        params: &dyn ParameterSource,
    ) -> Result<MigrationReport> {
        let path = self.resolver.resolve(source, target)?;
        debug!(
            target: "sffmig::pipeline",
            source = %source,
            dest = %target,
            steps = path.len(),
            "Resolved migration path"
        );

        let mut current = document;
        let mut steps = Vec::with_capacity(path.len());
        for step in path {
            let handler = self
                .registry
                .get(&step)
                .ok_or_else(|| MigrateError::NoMigrationHandler {
                    from: step.source.clone(),
                    to: step.target.clone(),
                })?;
            let values = params.resolve(handler.declared_params())?;

            debug!(target: "sffmig::pipeline", step = %step, "Applying structural transform");
            let transformed = handler.transform().apply(&current, &values)?;
            let dropped = dropped_fields(&current, &transformed);
            if !dropped.is_empty() {
                warn!(
                    target: "sffmig::pipeline",
                    step = %step,
                    dropped = %dropped,
                    "Migration dropped fields"
                );
            }

            current = match handler.codec() {
                Some(codec) => encode_meshes(transformed, codec)?,
                None => transformed,
            };

            info!(target: "sffmig::pipeline", step = %step, "Migration step complete");
            steps.push(StepReport { step, dropped });
        }

        Ok(MigrationReport {
            document: current,
            steps,
        })
    }
}

/// Re-encode every legacy mesh under `el`, in document order
///
/// A mesh is any `<mesh>` element still carrying a `vertexList`. Its
/// legacy vertex and polygon lists are replaced by the three packed-array
/// elements, spliced in at the head of the mesh.
fn encode_meshes(mut el: Element, codec: &MeshCodec) -> Result<Element> {
    if el.tag == "mesh" && el.child("vertexList").is_some() {
        let legacy = LegacyMesh::from_element(&el)?;
        let encoded = codec.encode(&legacy)?;
        el.children
            .retain(|c| c.tag != "vertexList" && c.tag != "polygonList");
        let [vertices, normals, triangles] = encoded.into_elements();
        el.children.insert(0, vertices);
        el.children.insert(1, normals);
        el.children.insert(2, triangles);
        return Ok(el);
    }
    let children = std::mem::take(&mut el.children);
    el.children = children
        .into_iter()
        .map(|child| encode_meshes(child, codec))
        .collect::<Result<Vec<Element>>>()?;
    Ok(el)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FixedParams, NoParams};
    use crate::registry::MigrationHandler;
    use crate::transform::{RuleTransform, RuleValue};
    use sff_document::parse_document;

    fn versions(tokens: &[&str]) -> VersionList {
        VersionList::new(tokens.iter().map(|t| Version::new(*t)).collect())
    }

    fn add_field_handler(field: &str) -> MigrationHandler {
        MigrationHandler::new(RuleTransform::new().add_child(
            "segmentation",
            field,
            RuleValue::Literal(field.to_string()),
        ))
    }

    // === Chaining ===

    #[test]
    fn test_chained_steps_accumulate_fields() {
        let mut registry = HandlerRegistry::empty();
        registry.register(Version::new("1"), Version::new("2"), add_field_handler("alpha"));
        registry.register(Version::new("2"), Version::new("3"), add_field_handler("beta"));
        registry.register(Version::new("3"), Version::new("4"), add_field_handler("gamma"));

        let pipeline = MigrationPipeline::new(versions(&["1", "2", "3", "4"]), registry);
        let document = parse_document("<segmentation><version>1</version></segmentation>").unwrap();
        let report = pipeline
            .run(document, &Version::new("1"), &Version::new("4"), &NoParams)
            .unwrap();

        assert_eq!(report.steps.len(), 3);
        assert!(report.steps.iter().all(|s| s.dropped.is_empty()));
        for field in ["alpha", "beta", "gamma"] {
            assert!(report.document.child(field).is_some(), "missing {}", field);
        }
    }

    #[test]
    fn test_empty_path_returns_input_unchanged() {
        let pipeline = MigrationPipeline::new(versions(&["1", "2"]), HandlerRegistry::empty());
        let document = parse_document("<segmentation><version>2</version></segmentation>").unwrap();
        let report = pipeline
            .run(document.clone(), &Version::new("2"), &Version::new("2"), &NoParams)
            .unwrap();
        assert_eq!(report.document, document);
        assert!(report.steps.is_empty());
    }

    // === Failure modes ===

    #[test]
    fn test_missing_handler_aborts() {
        let mut registry = HandlerRegistry::empty();
        registry.register(Version::new("1"), Version::new("2"), add_field_handler("alpha"));
        let pipeline = MigrationPipeline::new(versions(&["1", "2", "3"]), registry);
        let document = parse_document("<segmentation/>").unwrap();
        let err = pipeline
            .run(document, &Version::new("1"), &Version::new("3"), &NoParams)
            .unwrap_err();
        assert!(matches!(
            err,
            MigrateError::NoMigrationHandler { from, to }
                if from == Version::new("2") && to == Version::new("3")
        ));
    }

    #[test]
    fn test_unknown_source_version() {
        let pipeline = MigrationPipeline::new(versions(&["1", "2"]), HandlerRegistry::empty());
        let document = parse_document("<segmentation/>").unwrap();
        let err = pipeline
            .run(document, &Version::new("0"), &Version::new("2"), &NoParams)
            .unwrap_err();
        assert!(matches!(err, MigrateError::UnknownVersion(v) if v == "0"));
    }

    #[test]
    fn test_parameter_arity_checked_per_step() {
        let mut registry = HandlerRegistry::empty();
        registry.register(
            Version::new("1"),
            Version::new("2"),
            MigrationHandler::new(
                RuleTransform::new()
                    .with_param("details")
                    .add_child("segmentation", "details", RuleValue::Param("details".to_string())),
            ),
        );
        let pipeline = MigrationPipeline::new(versions(&["1", "2"]), registry);
        let document = parse_document("<segmentation/>").unwrap();
        let err = pipeline
            .run(
                document,
                &Version::new("1"),
                &Version::new("2"),
                &FixedParams::new(vec!["a".to_string(), "b".to_string()]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            MigrateError::ParameterCountMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    // === Dropped-field reporting ===

    #[test]
    fn test_dropped_fields_collected_not_fatal() {
        let mut registry = HandlerRegistry::empty();
        registry.register(
            Version::new("1"),
            Version::new("2"),
            MigrationHandler::new(RuleTransform::new().drop_element("details")),
        );
        let pipeline = MigrationPipeline::new(versions(&["1", "2"]), registry);
        let document =
            parse_document("<segmentation><details>x</details><name>y</name></segmentation>")
                .unwrap();
        let report = pipeline
            .run(document, &Version::new("1"), &Version::new("2"), &NoParams)
            .unwrap();
        assert_eq!(report.steps.len(), 1);
        let dropped: Vec<&str> = report.steps[0].dropped.iter().collect();
        assert_eq!(dropped, vec!["/segmentation/details"]);
    }

    // === Codec hook ===

    #[test]
    fn test_codec_hook_splices_packed_arrays() {
        let mut registry = HandlerRegistry::empty();
        registry.register(
            Version::new("1"),
            Version::new("2"),
            MigrationHandler::new(RuleTransform::new().set_text("version", "2"))
                .with_codec(MeshCodec::default_encoding()),
        );
        let pipeline = MigrationPipeline::new(versions(&["1", "2"]), registry);
        let document = parse_document(
            "<segmentation><version>1</version><segment id=\"1\"><mesh id=\"0\">\
               <vertexList>\
                 <v vID=\"0\"><x>1.0</x><y>2.0</y><z>3.0</z></v>\
                 <v vID=\"1\"><x>4.0</x><y>5.0</y><z>6.0</z></v>\
                 <v vID=\"2\"><x>7.0</x><y>8.0</y><z>9.0</z></v>\
               </vertexList>\
               <polygonList><P PID=\"0\"><v>0</v><v>1</v><v>2</v></P></polygonList>\
             </mesh></segment></segmentation>",
        )
        .unwrap();

        let report = pipeline
            .run(document, &Version::new("1"), &Version::new("2"), &NoParams)
            .unwrap();
        let mesh = report.document.descendant("mesh").unwrap();
        assert!(mesh.child("vertexList").is_none());
        assert!(mesh.child("polygonList").is_none());
        assert_eq!(mesh.children[0].tag, "vertices");
        assert_eq!(mesh.children[1].tag, "normals");
        assert_eq!(mesh.children[2].tag, "triangles");
        assert_eq!(mesh.children[0].attr("num_vertices"), Some("3"));
        assert_eq!(mesh.children[2].attr("num_triangles"), Some("1"));
    }
}
