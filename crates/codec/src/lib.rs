//! Mesh and numeric codecs for sff-migrate
//!
//! Two layers:
//! - [`numeric`]: packs homogeneous numeric sequences to fixed-width binary
//!   under an explicit mode and byte order, and wraps bytes in a base64
//!   transport encoding.
//! - [`mesh`]: re-encodes the legacy element-per-vertex mesh representation
//!   into three packed arrays (surface vertices, normal vertices, triangle
//!   indices), with a verification decoder.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod mesh;
pub mod numeric;

pub use mesh::{
    Designation, EncodedArray, EncodedMesh, LegacyMesh, LegacyTriangle, LegacyVertex, MeshCodec,
    VertexRemap,
};
pub use numeric::{pack, transport_decode, transport_encode, unpack};
