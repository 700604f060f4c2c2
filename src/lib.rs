// lib.rs

//! Read-only decoding of vertex attributes and indices out of packed binary meshes.
//!
//! A [`MeshContainer`](core::mesh::MeshContainer) holds the raw vertex buffers, one shared
//! index buffer, and the sub-mesh descriptors that address into them. A
//! [`VertexAccessor`](decode::VertexAccessor) borrows a container and turns
//! (attribute name, sub-mesh, element range) into 4-component [`VertexValue`](core::attribute::VertexValue)s,
//! and (sub-mesh, index range) into `u32` indices.

/// Contains the mesh container model, the byte readers, and the half-float conversion.
pub mod core;

/// Defines the vertex/index accessor.
pub mod decode;

/// Contains the interface between `MeshContainer` objects and manifest files on disk.
pub mod io;


/// Contains the most commonly used traits, types, and objects.
pub mod prelude {
    pub use crate::core::attribute::{AttributeDescriptor, AttributeFormat, ComponentCountPolicy, VertexValue};
    pub use crate::core::half::{half_to_f32, HalfFloatMode};
    pub use crate::core::mesh::{DrawElementType, MeshContainer, SubMesh};
    pub use crate::core::mesh::builder::{MeshBuilder, SubMeshBuilder};
    pub use crate::core::shared::ConfigType;
    pub use crate::decode::{self, Config, DecodedSubMesh, RangeKind, VertexAccessor};
    pub use crate::io::manifest::{load_manifest, load_manifest_with_config};
}
