//! Mesh re-encoding codec
//!
//! Consumes the legacy mesh representation (one element per vertex, one per
//! polygon) and produces three packed arrays: surface vertices, normal
//! vertices, and triangle indices. Surface vertices are renumbered into a
//! dense zero-based index space in first-encounter order; normal vertices
//! are positional and follow their surface counterparts one-to-one.
//!
//! Index semantics, kept from the legacy tool:
//!
//! - A 3-reference triangle keeps its original vertex identifiers as the
//!   encoded indices, verbatim. Nothing forces those identifiers to equal
//!   the dense remap order; documents whose surface identifiers are not
//!   already `0..N` produce indices that do not point at the renumbered
//!   vertices. Known limitation, preserved for output compatibility.
//! - A 6-reference triangle (interleaved surface,normal pairs) takes the
//!   surface identifiers at even positions and maps each through the dense
//!   remap.

use crate::numeric;
use sff_core::{Endianness, MigrateError, Mode, Result};
use sff_document::Element;
use std::collections::HashMap;
use std::str::FromStr;

/// Role tag of a legacy vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Designation {
    /// Ordinary surface geometry (the default when the attribute is absent)
    Surface,
    /// Normal-direction vector paired with a surface vertex
    Normal,
}

impl Designation {
    fn parse(attr: Option<&str>) -> Result<Self> {
        match attr {
            None | Some("surface") => Ok(Designation::Surface),
            Some("normal") => Ok(Designation::Normal),
            Some(other) => Err(MigrateError::Parse(format!(
                "unknown vertex designation {:?}",
                other
            ))),
        }
    }
}

/// One vertex of a legacy mesh
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyVertex {
    /// Vertex identifier, unique within the mesh
    pub id: u64,
    /// Surface or normal role
    pub designation: Designation,
    /// Coordinates in document order
    pub position: [f64; 3],
}

/// One triangle of a legacy mesh
///
/// Carries either 3 surface references or 6 interleaved
/// surface/normal references.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyTriangle {
    /// Triangle identifier from the source document
    pub id: u64,
    /// Vertex identifier references in document order
    pub vertex_refs: Vec<u64>,
}

/// A legacy mesh scoped to one `<mesh>` element
///
/// Lives only for the duration of that mesh's migration: parsed from the
/// source document, discarded after encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyMesh {
    /// Vertices in document order
    pub vertices: Vec<LegacyVertex>,
    /// Triangles in document order
    pub triangles: Vec<LegacyTriangle>,
}

impl LegacyMesh {
    /// Parse a legacy mesh from a `<mesh>` element
    ///
    /// Reads the `vertexList` and `polygonList` children; either may be
    /// absent, yielding an empty sequence.
    pub fn from_element(mesh: &Element) -> Result<Self> {
        let mut out = LegacyMesh::default();

        if let Some(vertex_list) = mesh.descendant("vertexList") {
            for vertex in &vertex_list.children {
                let id = parse_u64_attr(vertex, "vID")?;
                let designation = Designation::parse(vertex.attr("designation"))?;
                if vertex.children.len() != 3 {
                    return Err(MigrateError::Parse(format!(
                        "vertex {} has {} coordinates, expected 3",
                        id,
                        vertex.children.len()
                    )));
                }
                let mut position = [0.0f64; 3];
                for (slot, coord) in position.iter_mut().zip(&vertex.children) {
                    *slot = parse_f64_text(coord)?;
                }
                out.vertices.push(LegacyVertex {
                    id,
                    designation,
                    position,
                });
            }
        }

        if let Some(polygon_list) = mesh.descendant("polygonList") {
            for (i, polygon) in polygon_list.children.iter().enumerate() {
                let id = match polygon.attr("PID") {
                    Some(_) => parse_u64_attr(polygon, "PID")?,
                    None => i as u64,
                };
                let vertex_refs = polygon
                    .children
                    .iter()
                    .map(|v| {
                        v.text_str().parse::<u64>().map_err(|_| {
                            MigrateError::Parse(format!(
                                "polygon {}: bad vertex reference {:?}",
                                id,
                                v.text_str()
                            ))
                        })
                    })
                    .collect::<Result<Vec<u64>>>()?;
                out.triangles.push(LegacyTriangle { id, vertex_refs });
            }
        }

        Ok(out)
    }
}

fn parse_u64_attr(el: &Element, name: &str) -> Result<u64> {
    let raw = el
        .attr(name)
        .ok_or_else(|| MigrateError::Parse(format!("<{}> missing attribute {}", el.tag, name)))?;
    raw.parse::<u64>()
        .map_err(|_| MigrateError::Parse(format!("bad {} attribute {:?}", name, raw)))
}

fn parse_f64_text(el: &Element) -> Result<f64> {
    el.text_str()
        .parse::<f64>()
        .map_err(|_| MigrateError::Parse(format!("bad coordinate {:?}", el.text_str())))
}

/// Dense renumbering of surface-vertex identifiers
///
/// Assigns zero-based indices in first-encounter order while scanning
/// vertices. The mapping is a bijection onto `0..surface_count`; built once
/// per mesh and consumed only within that mesh's encoding.
#[derive(Debug, Default)]
pub struct VertexRemap {
    map: HashMap<u64, u64>,
}

impl VertexRemap {
    /// Empty remap
    pub fn new() -> Self {
        VertexRemap::default()
    }

    /// Assign the next unused dense index to `id`
    ///
    /// Fails with `Parse` on a duplicate identifier, which would break the
    /// bijection.
    pub fn assign(&mut self, id: u64) -> Result<u64> {
        let next = self.map.len() as u64;
        if self.map.insert(id, next).is_some() {
            return Err(MigrateError::Parse(format!(
                "duplicate surface vertex id {}",
                id
            )));
        }
        Ok(next)
    }

    /// Dense index of an original identifier, if assigned
    pub fn index_of(&self, id: u64) -> Option<u64> {
        self.map.get(&id).copied()
    }

    /// Whether an original identifier was seen during the vertex scan
    pub fn contains(&self, id: u64) -> bool {
        self.map.contains_key(&id)
    }

    /// Number of assigned surface vertices
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no surface vertex has been assigned
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// One packed numeric array in transport form
///
/// Attached to the migrated output document and immutable once produced.
/// `count` is the number of coordinate or index triples, matching the
/// `num_vertices`/`num_normals`/`num_triangles` attribute of the element
/// form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArray {
    /// Number of (x,y,z) or index triples
    pub count: usize,
    /// Numeric element type
    pub mode: Mode,
    /// Byte order
    pub endianness: Endianness,
    /// Transport-encoded payload
    pub data: String,
}

impl EncodedArray {
    /// Pack a flat sequence of triples
    fn from_values(values: &[f64], mode: Mode, endianness: Endianness) -> Self {
        let bytes = numeric::pack(values, mode, endianness);
        EncodedArray {
            count: values.len() / 3,
            mode,
            endianness,
            data: numeric::transport_encode(&bytes),
        }
    }

    /// Decode back into coordinate or index triples
    ///
    /// Inverse of packing: transport-decode, unpack with the stored
    /// count/mode/endianness, group into consecutive triples. Used for
    /// verification, not by the forward pipeline.
    pub fn decode(&self) -> Result<Vec<[f64; 3]>> {
        let bytes = numeric::transport_decode(&self.data)?;
        let total = self
            .count
            .checked_mul(3)
            .ok_or_else(|| MigrateError::Parse(format!("triple count {} overflows", self.count)))?;
        let flat = numeric::unpack(&bytes, total, self.mode, self.endianness)?;
        Ok(flat
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect())
    }

    /// Serialize as a document element
    ///
    /// The count attribute is named per role (`num_vertices`,
    /// `num_normals`, `num_triangles`).
    pub fn to_element(&self, tag: &str, count_attr: &str) -> Element {
        let mut el = Element::new(tag);
        el.set_attr(count_attr, self.count.to_string());
        el.set_attr("mode", self.mode.as_str());
        el.set_attr("endianness", self.endianness.as_str());
        el.set_attr("data", self.data.clone());
        el
    }

    /// Parse an encoded array back out of its element form
    pub fn from_element(el: &Element, count_attr: &str) -> Result<Self> {
        let count_raw = el.attr(count_attr).ok_or_else(|| {
            MigrateError::Parse(format!("<{}> missing attribute {}", el.tag, count_attr))
        })?;
        let count = count_raw
            .parse::<usize>()
            .map_err(|_| MigrateError::Parse(format!("bad {} attribute {:?}", count_attr, count_raw)))?;
        let mode = Mode::from_str(el.attr("mode").unwrap_or(""))?;
        let endianness = Endianness::from_str(el.attr("endianness").unwrap_or(""))?;
        let data = el
            .attr("data")
            .ok_or_else(|| MigrateError::Parse(format!("<{}> missing attribute data", el.tag)))?
            .to_string();
        Ok(EncodedArray {
            count,
            mode,
            endianness,
            data,
        })
    }
}

/// The three packed arrays of one migrated mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMesh {
    /// Surface vertex coordinates
    pub surface: EncodedArray,
    /// Normal vertex coordinates
    pub normals: EncodedArray,
    /// Triangle indices
    pub triangles: EncodedArray,
}

impl EncodedMesh {
    /// The element forms, in splice order: vertices, normals, triangles
    pub fn into_elements(self) -> [Element; 3] {
        [
            self.surface.to_element("vertices", "num_vertices"),
            self.normals.to_element("normals", "num_normals"),
            self.triangles.to_element("triangles", "num_triangles"),
        ]
    }
}

/// Mesh re-encoding codec
///
/// Configured once per migration step with the numeric modes and byte
/// order of the packed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshCodec {
    vertex_mode: Mode,
    triangle_mode: Mode,
    endianness: Endianness,
}

impl MeshCodec {
    /// Create a codec
    ///
    /// `vertex_mode` must be a float mode and `triangle_mode` an integer
    /// mode; anything else fails with `InvalidMode`.
    pub fn new(vertex_mode: Mode, triangle_mode: Mode, endianness: Endianness) -> Result<Self> {
        if !vertex_mode.is_float() {
            return Err(MigrateError::InvalidMode(format!(
                "{} is not a vertex coordinate mode",
                vertex_mode
            )));
        }
        if !triangle_mode.is_integer() {
            return Err(MigrateError::InvalidMode(format!(
                "{} is not a triangle index mode",
                triangle_mode
            )));
        }
        Ok(MeshCodec {
            vertex_mode,
            triangle_mode,
            endianness,
        })
    }

    /// The default encoding: float32 vertices, uint32 triangles, little-endian
    pub fn default_encoding() -> Self {
        MeshCodec {
            vertex_mode: Mode::Float32,
            triangle_mode: Mode::Uint32,
            endianness: Endianness::Little,
        }
    }

    /// Encode one legacy mesh into its three packed arrays
    pub fn encode(&self, mesh: &LegacyMesh) -> Result<EncodedMesh> {
        let mut remap = VertexRemap::new();
        let mut surface: Vec<f64> = Vec::new();
        let mut normals: Vec<f64> = Vec::new();

        // Vertex scan, document order. Surface vertices get dense indices
        // in first-encounter order; normal vertices are positional only.
        for vertex in &mesh.vertices {
            match vertex.designation {
                Designation::Surface => {
                    remap.assign(vertex.id)?;
                    surface.extend_from_slice(&vertex.position);
                }
                Designation::Normal => {
                    normals.extend_from_slice(&vertex.position);
                }
            }
        }

        if !normals.is_empty() && normals.len() != surface.len() {
            return Err(MigrateError::MismatchedNormalCount {
                surface: surface.len() / 3,
                normals: normals.len() / 3,
            });
        }

        let surface_count = surface.len() / 3;
        let mut indices: Vec<u64> = Vec::with_capacity(mesh.triangles.len() * 3);
        for triangle in &mesh.triangles {
            match triangle.vertex_refs.len() {
                3 => {
                    // Verbatim identifiers, see the module header. They must
                    // at least name vertices seen in the scan.
                    for &vertex_ref in &triangle.vertex_refs {
                        if !remap.contains(vertex_ref) {
                            return Err(MigrateError::DanglingTriangleReference {
                                index: vertex_ref,
                                surface_count,
                            });
                        }
                        indices.push(vertex_ref);
                    }
                }
                6 => {
                    for &vertex_ref in triangle.vertex_refs.iter().step_by(2) {
                        let dense = remap.index_of(vertex_ref).ok_or(
                            MigrateError::UnknownVertexReference {
                                triangle: triangle.id,
                                vertex: vertex_ref,
                            },
                        )?;
                        indices.push(dense);
                    }
                }
                refs => {
                    return Err(MigrateError::MalformedTriangle {
                        triangle: triangle.id,
                        refs,
                    });
                }
            }
        }

        let flat_indices: Vec<f64> = indices.iter().map(|&i| i as f64).collect();
        Ok(EncodedMesh {
            surface: EncodedArray::from_values(&surface, self.vertex_mode, self.endianness),
            normals: EncodedArray::from_values(&normals, self.vertex_mode, self.endianness),
            triangles: EncodedArray::from_values(&flat_indices, self.triangle_mode, self.endianness),
        })
    }
}
