pub mod builder;

use serde::{Deserialize, Serialize};

use super::attribute::AttributeDescriptor;

/// Width of the elements a sub-mesh stores in the shared index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawElementType {
    #[default]
    U16,
    U32,
}

impl DrawElementType {
    /// Flag `1` selects 32-bit indices; every other value selects 16-bit indices.
    pub fn from_flag(flag: u32) -> Self {
        if flag == 1 {
            DrawElementType::U32
        } else {
            DrawElementType::U16
        }
    }

    pub fn flag(self) -> u32 {
        match self {
            DrawElementType::U16 => 0,
            DrawElementType::U32 => 1,
        }
    }

    /// returns the size of one index in bytes.
    pub fn width(self) -> usize {
        match self {
            DrawElementType::U16 => 2,
            DrawElementType::U32 => 4,
        }
    }
}

impl Serialize for DrawElementType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.flag())
    }
}

impl<'de> Deserialize<'de> for DrawElementType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(DrawElementType::from_flag)
    }
}


/// Layout of one drawable piece of a mesh within the container's shared buffers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubMesh {
    pub name: String,

    /// byte offset of the first vertex in vertex buffer 0
    pub vertex_offset: u32,
    /// byte distance between consecutive vertices in vertex buffer 0
    pub stride: u32,
    /// byte offset of the first vertex in vertex buffer 1
    pub vertex_offset2: u32,
    /// byte distance between consecutive vertices in vertex buffer 1
    pub stride2: u32,

    /// byte offset of the first index in the index buffer
    pub index_offset: u32,

    pub vertex_count: u32,
    pub index_count: u32,

    #[serde(default)]
    pub draw_element_type: DrawElementType,

    /// attributes in declaration order
    pub attributes: Vec<AttributeDescriptor>,
}

impl SubMesh {
    /// Returns the first attribute that can be looked up by `name`.
    pub fn get_attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|att| att.has_name(name))
    }

    /// Returns the (offset, stride) pair that applies to attributes stored in `buffer_index`.
    pub fn layout(&self, buffer_index: u32) -> (u32, u32) {
        if buffer_index == 1 {
            (self.vertex_offset2, self.stride2)
        } else {
            (self.vertex_offset, self.stride)
        }
    }
}


/// The already parsed contents of a mesh file: raw vertex buffers, the shared index buffer,
/// and the sub-meshes that address into them.
#[derive(Debug, Clone, Default)]
pub struct MeshContainer {
    pub vertex_buffers: Vec<Vec<u8>>,
    pub index_buffer: Vec<u8>,
    pub sub_meshes: Vec<SubMesh>,
}

impl MeshContainer {
    pub fn get_sub_meshes(&self) -> &[SubMesh] {
        &self.sub_meshes
    }

    /// Returns the first sub-mesh called `name`.
    pub fn sub_mesh(&self, name: &str) -> Option<&SubMesh> {
        self.sub_meshes.iter().find(|s| s.name == name)
    }
}
