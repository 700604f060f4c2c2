use thiserror::Error;

use crate::core::attribute::{AttributeDescriptor, AttributeFormat};
use super::{DrawElementType, MeshContainer, SubMesh};

pub struct MeshBuilder {
    vertex_buffers: Vec<Vec<u8>>,
    index_buffer: Vec<u8>,
    sub_meshes: Vec<SubMesh>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self {
            vertex_buffers: Vec::new(),
            index_buffer: Vec::new(),
            sub_meshes: Vec::new(),
        }
    }

    /// Appends a vertex buffer and returns its buffer index.
    pub fn add_vertex_buffer(&mut self, data: Vec<u8>) -> u32 {
        self.vertex_buffers.push(data);
        (self.vertex_buffers.len() - 1) as u32
    }

    pub fn set_index_buffer(&mut self, data: Vec<u8>) {
        self.index_buffer = data;
    }

    pub fn add_sub_mesh(&mut self, sub_mesh: SubMesh) -> &mut Self {
        self.sub_meshes.push(sub_mesh);
        self
    }

    pub fn build(self) -> Result<MeshContainer, Err> {
        self.buffer_reference_check()?;
        Ok(
            MeshContainer {
                vertex_buffers: self.vertex_buffers,
                index_buffer: self.index_buffer,
                sub_meshes: self.sub_meshes,
            }
        )
    }

    /// Checks that every attribute refers to a vertex buffer that exists.
    fn buffer_reference_check(&self) -> Result<(), Err> {
        for sub_mesh in &self.sub_meshes {
            if let Some(att) = sub_mesh.attributes
                .iter()
                .find(|att| att.buffer_index as usize >= self.vertex_buffers.len())
            {
                return Err(Err::MissingVertexBuffer {
                    sub_mesh: sub_mesh.name.clone(),
                    attribute: att.names.first().cloned().unwrap_or_default(),
                    buffer_index: att.buffer_index,
                    num_buffers: self.vertex_buffers.len(),
                });
            }
        }
        Ok(())
    }
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}


/// Fluent construction of a [`SubMesh`].
pub struct SubMeshBuilder {
    sub_mesh: SubMesh,
}

impl SubMeshBuilder {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            sub_mesh: SubMesh {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    pub fn primary_layout(mut self, vertex_offset: u32, stride: u32) -> Self {
        self.sub_mesh.vertex_offset = vertex_offset;
        self.sub_mesh.stride = stride;
        self
    }

    pub fn secondary_layout(mut self, vertex_offset: u32, stride: u32) -> Self {
        self.sub_mesh.vertex_offset2 = vertex_offset;
        self.sub_mesh.stride2 = stride;
        self
    }

    pub fn vertex_count(mut self, count: u32) -> Self {
        self.sub_mesh.vertex_count = count;
        self
    }

    pub fn indices(mut self, index_offset: u32, index_count: u32, draw_element_type: DrawElementType) -> Self {
        self.sub_mesh.index_offset = index_offset;
        self.sub_mesh.index_count = index_count;
        self.sub_mesh.draw_element_type = draw_element_type;
        self
    }

    pub fn attribute<S: Into<String>>(mut self, name: S, buffer_index: u32, buffer_offset: u32, format: AttributeFormat) -> Self {
        self.sub_mesh.attributes.push(
            AttributeDescriptor::new(name, buffer_index, buffer_offset, format)
        );
        self
    }

    pub fn attribute_descriptor(mut self, att: AttributeDescriptor) -> Self {
        self.sub_mesh.attributes.push(att);
        self
    }

    pub fn build(self) -> SubMesh {
        self.sub_mesh
    }
}


#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("Attribute {attribute:?} of sub-mesh {sub_mesh:?} refers to vertex buffer {buffer_index}, but the mesh has {num_buffers} vertex buffer(s).")]
    MissingVertexBuffer {
        sub_mesh: String,
        attribute: String,
        buffer_index: u32,
        num_buffers: usize,
    },
}
