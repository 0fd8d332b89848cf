//! End-to-end migration of a v0.7.0.dev0 document to v0.8.0.dev0.
//!
//! Exercises the whole stack through the facade: parse from disk, resolve
//! the path, apply the structural renames, re-encode the mesh, render the
//! output and read it back.

use sff_migrate::{
    parse_document, source_version, write_document, EncodedArray, HandlerRegistry,
    MigrationPipeline, NoParams, Version, VersionList,
};
use std::fs;

/// A small but structurally complete v0.7 document: header, one annotated
/// segment, one mesh with three interleaved surface/normal vertex pairs and
/// one six-reference triangle. Coordinates are exactly representable in
/// float32.
const V0_7_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<segmentation>
  <version>0.7.0.dev0</version>
  <name>Test segmentation</name>
  <segmentList>
    <segment id="1">
      <biologicalAnnotation>
        <description>ribosome</description>
      </biologicalAnnotation>
      <meshList>
        <mesh id="0">
          <vertexList>
            <v vID="0"><x>0.5</x><y>1.5</y><z>2.5</z></v>
            <v vID="3" designation="normal"><x>0.0</x><y>0.0</y><z>1.0</z></v>
            <v vID="1"><x>3.25</x><y>4.25</y><z>5.25</z></v>
            <v vID="4" designation="normal"><x>0.0</x><y>1.0</y><z>0.0</z></v>
            <v vID="2"><x>6.0</x><y>7.0</y><z>8.0</z></v>
            <v vID="5" designation="normal"><x>1.0</x><y>0.0</y><z>0.0</z></v>
          </vertexList>
          <polygonList>
            <P PID="0"><v>0</v><v>3</v><v>1</v><v>4</v><v>2</v><v>5</v></P>
          </polygonList>
        </mesh>
      </meshList>
    </segment>
  </segmentList>
</segmentation>
"#;

fn migrate(xml: &str) -> sff_migrate::MigrationReport {
    let document = parse_document(xml).unwrap();
    let source = source_version(&document).unwrap();
    assert_eq!(source, Version::new("0.7.0.dev0"));

    let pipeline = MigrationPipeline::new(VersionList::default(), HandlerRegistry::builtin());
    pipeline
        .run(document, &source, &Version::new("0.8.0.dev0"), &NoParams)
        .unwrap()
}

#[test]
fn test_structural_renames_and_version_rewrite() {
    let report = migrate(V0_7_DOCUMENT);
    let doc = &report.document;

    assert_eq!(doc.child("version").unwrap().text_str(), "0.8.0.dev0");
    assert!(doc.child("segmentList").is_none());

    let segment_list = doc.child("segment_list").unwrap();
    let segment = segment_list.child("segment").unwrap();
    assert!(segment.child("biological_annotation").is_some());
    assert!(segment.child("biologicalAnnotation").is_none());
    assert!(segment.child("mesh_list").is_some());
    assert!(segment.child("meshList").is_none());

    // The header survives untouched
    assert_eq!(doc.child("name").unwrap().text_str(), "Test segmentation");
}

#[test]
fn test_mesh_is_packed_and_decodable() {
    let report = migrate(V0_7_DOCUMENT);
    let mesh = report.document.descendant("mesh").unwrap();

    assert!(mesh.child("vertexList").is_none());
    assert!(mesh.child("polygonList").is_none());
    assert_eq!(mesh.children[0].tag, "vertices");
    assert_eq!(mesh.children[1].tag, "normals");
    assert_eq!(mesh.children[2].tag, "triangles");

    let vertices = EncodedArray::from_element(&mesh.children[0], "num_vertices").unwrap();
    assert_eq!(vertices.count, 3);
    assert_eq!(
        vertices.decode().unwrap(),
        vec![[0.5, 1.5, 2.5], [3.25, 4.25, 5.25], [6.0, 7.0, 8.0]]
    );

    let normals = EncodedArray::from_element(&mesh.children[1], "num_normals").unwrap();
    assert_eq!(normals.count, 3);
    assert_eq!(
        normals.decode().unwrap(),
        vec![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]
    );

    // The interleaved triangle's surface references come out densely
    // renumbered in first-encounter order.
    let triangles = EncodedArray::from_element(&mesh.children[2], "num_triangles").unwrap();
    assert_eq!(triangles.count, 1);
    assert_eq!(triangles.decode().unwrap(), vec![[0.0, 1.0, 2.0]]);
}

#[test]
fn test_step_report_names_superseded_legacy_paths() {
    let report = migrate(V0_7_DOCUMENT);
    assert_eq!(report.steps.len(), 1);
    let step = &report.steps[0];
    assert_eq!(step.step.source, Version::new("0.7.0.dev0"));
    assert_eq!(step.step.target, Version::new("0.8.0.dev0"));

    // The path diff runs on the structural transform alone. Renamed
    // containers shift the paths of everything beneath them, so the whole
    // legacy subtree is reported under its old spelling. Paths outside the
    // renames survive and are not reported.
    let dropped: Vec<&str> = step.dropped.iter().collect();
    assert!(dropped
        .iter()
        .any(|p| p.starts_with("/segmentation/segmentList")));
    assert!(!dropped.iter().any(|p| p.contains("segment_list")));
    assert!(!dropped.contains(&"/segmentation/name"));
}

#[test]
fn test_rendered_output_reparses_from_disk() {
    let report = migrate(V0_7_DOCUMENT);
    let rendered = write_document(&report.document);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emd_1014_0.8.0.dev0.sff");
    fs::write(&path, &rendered).unwrap();

    let back = parse_document(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(source_version(&back).unwrap(), Version::new("0.8.0.dev0"));
    assert_eq!(back, report.document);

    let mesh = back.descendant("mesh").unwrap();
    let vertices = EncodedArray::from_element(&mesh.children[0], "num_vertices").unwrap();
    assert_eq!(
        vertices.decode().unwrap(),
        vec![[0.5, 1.5, 2.5], [3.25, 4.25, 5.25], [6.0, 7.0, 8.0]]
    );
}

#[test]
fn test_migrating_to_same_version_is_identity() {
    let document = parse_document(V0_7_DOCUMENT).unwrap();
    let source = source_version(&document).unwrap();
    let pipeline = MigrationPipeline::new(VersionList::default(), HandlerRegistry::builtin());
    let report = pipeline
        .run(document.clone(), &source, &source, &NoParams)
        .unwrap();
    assert!(report.steps.is_empty());
    assert_eq!(report.document, document);
}
