pub(crate) mod attribute;
pub(crate) mod connectivity;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::attribute::{self as core_attribute, AttributeFormat, ComponentCountPolicy, VertexValue};
use crate::core::bit_coder::ReaderErr;
use crate::core::half::HalfFloatMode;
use crate::core::mesh::{MeshContainer, SubMesh};
use crate::core::shared::ConfigType;
use attribute::AttributeLayout;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub half_float: HalfFloatMode,
    #[serde(default)]
    pub component_counts: ComponentCountPolicy,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            half_float: HalfFloatMode::Ieee,
            component_counts: ComponentCountPolicy::Table,
        }
    }
}


/// Reads vertex attributes and indices out of the buffers of one [`MeshContainer`].
///
/// The accessor only borrows the container. Every read carries its own byte position,
/// so reads take `&self` and an accessor can be shared between threads.
///
/// An accessor created without a container is *inert*: all reads succeed with empty results.
/// After [`VertexAccessor::close`] every read fails with [`Err::Closed`].
#[derive(Debug)]
pub struct VertexAccessor<'mesh> {
    state: State<'mesh>,
    cfg: Config,
}

#[derive(Debug)]
enum State<'mesh> {
    Inert,
    Open {
        vertex_buffers: Vec<&'mesh [u8]>,
        index_buffer: &'mesh [u8],
    },
    Closed,
}

impl<'mesh> VertexAccessor<'mesh> {
    pub fn new(mesh: Option<&'mesh MeshContainer>, cfg: Config) -> Self {
        let state = match mesh {
            Some(mesh) => {
                log::debug!(
                    "Opening accessor over {} vertex buffer(s), {} index bytes, {} sub-mesh(es)",
                    mesh.vertex_buffers.len(),
                    mesh.index_buffer.len(),
                    mesh.sub_meshes.len()
                );
                State::Open {
                    vertex_buffers: mesh.vertex_buffers.iter().map(Vec::as_slice).collect(),
                    index_buffer: &mesh.index_buffer,
                }
            }
            None => {
                log::warn!("No mesh container given; the accessor is inert and every read is empty");
                State::Inert
            }
        };
        Self { state, cfg }
    }

    /// Opens an accessor with the default configuration.
    pub fn from_mesh(mesh: &'mesh MeshContainer) -> Self {
        Self::new(Some(mesh), Config::default())
    }

    pub fn get_config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    #[inline]
    pub fn is_inert(&self) -> bool {
        matches!(self.state, State::Inert)
    }

    /// Releases the buffer views. Calling it again has no effect.
    pub fn close(&mut self) {
        if !matches!(self.state, State::Closed) {
            log::debug!("Closing accessor");
        }
        self.state = State::Closed;
    }

    /// Reads `count` indices of `sub_mesh` starting at index `start`.
    pub fn read_indices(&self, start: usize, count: usize, sub_mesh: &SubMesh) -> Result<Vec<u32>, Err> {
        let index_buffer = match &self.state {
            State::Open { index_buffer, .. } => *index_buffer,
            State::Inert => return Ok(Vec::new()),
            State::Closed => return Err(Err::Closed),
        };
        log::debug!("Reading indices {}..+{} of {:?}", start, count, sub_mesh.name);
        connectivity::decode_indices(index_buffer, start, count, sub_mesh)
    }

    /// Reads `count` values of the attribute called `name` starting at vertex `start`.
    ///
    /// An attribute the sub-mesh does not have yields an empty vector. The number of
    /// components read per value is derived from `name` by the configured
    /// [`ComponentCountPolicy`], so `name` must be the canonical attribute name.
    pub fn read_attribute(&self, name: &str, start: usize, count: usize, sub_mesh: &SubMesh) -> Result<Vec<VertexValue>, Err> {
        let vertex_buffers = match &self.state {
            State::Open { vertex_buffers, .. } => vertex_buffers,
            State::Inert => return Ok(Vec::new()),
            State::Closed => return Err(Err::Closed),
        };

        let Some(att) = sub_mesh.get_attribute(name) else {
            log::trace!("Sub-mesh {:?} has no attribute {:?}", sub_mesh.name, name);
            return Ok(Vec::new());
        };

        let buffer = vertex_buffers
            .get(att.buffer_index as usize)
            .copied()
            .ok_or(Err::MissingVertexBuffer {
                index: att.buffer_index,
                available: vertex_buffers.len(),
            })?;

        let num_components = self.cfg.component_counts.component_count(name)?;
        if let AttributeFormat::Unknown(id) = att.format {
            log::warn!("Attribute {:?} has unknown format {}; reading components as bytes", name, id);
        }

        log::debug!(
            "Reading {} x{} {} values {}..+{} of {:?}",
            name, num_components, att.format, start, count, sub_mesh.name
        );
        attribute::decode_attribute(
            buffer,
            AttributeLayout::new(sub_mesh, att, num_components),
            start,
            count,
            sub_mesh.vertex_count as usize,
            self.cfg.half_float,
        )
    }

    /// Reads every index of `sub_mesh` and all vertices of each attribute in `names`
    /// the sub-mesh has. Names the sub-mesh does not have are skipped.
    pub fn read_sub_mesh(&self, sub_mesh: &SubMesh, names: &[&str]) -> Result<DecodedSubMesh, Err> {
        let indices = self.read_indices(0, sub_mesh.index_count as usize, sub_mesh)?;
        let mut attributes = Vec::new();
        for &name in names {
            let values = self.read_attribute(name, 0, sub_mesh.vertex_count as usize, sub_mesh)?;
            if !values.is_empty() {
                attributes.push((name.to_owned(), values));
            }
        }
        Ok(
            DecodedSubMesh {
                name: sub_mesh.name.clone(),
                indices,
                attributes,
            }
        )
    }
}


/// Index list and per-vertex attribute arrays of one sub-mesh, as renderers and exporters consume them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedSubMesh {
    pub name: String,
    pub indices: Vec<u32>,
    /// (name, values) in the order they were requested
    pub attributes: Vec<(String, Vec<VertexValue>)>,
}

impl DecodedSubMesh {
    pub fn get_attribute(&self, name: &str) -> Option<&[VertexValue]> {
        self.attributes.iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Triangles of the index list; trailing indices that do not form a triangle are dropped.
    pub fn get_faces(&self) -> Vec<[u32; 3]> {
        self.indices.chunks_exact(3)
            .map(|f| [f[0], f[1], f[2]])
            .collect()
    }
}


/// Which bound a rejected range exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// the declared index count of the sub-mesh
    IndexElements,
    /// the length of the index buffer
    IndexBytes,
    /// the declared vertex count of the sub-mesh
    VertexElements,
    /// the length of the vertex buffer
    VertexBytes,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RangeKind::IndexElements => "declared index count",
            RangeKind::IndexBytes => "index buffer length",
            RangeKind::VertexElements => "declared vertex count",
            RangeKind::VertexBytes => "vertex buffer length",
        };
        f.write_str(s)
    }
}


#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("The accessor has been closed")]
    Closed,
    #[error("Vertex buffer {index} does not exist; the mesh has {available}")]
    MissingVertexBuffer { index: u32, available: usize },
    #[error("Range ending at {requested_end} exceeds the {what} ({limit})")]
    Range {
        what: RangeKind,
        requested_end: usize,
        limit: usize,
    },
    #[error("Reader error: {0}")]
    Reader(#[from] ReaderErr),
    #[error("No component count is known for attribute name {0:?}")]
    UnknownAttributeName(String),
}

impl From<core_attribute::Err> for Err {
    fn from(err: core_attribute::Err) -> Self {
        match err {
            core_attribute::Err::UnknownAttributeName(name) => Err::UnknownAttributeName(name),
        }
    }
}

impl Err {
    pub fn is_range_error(&self) -> bool {
        matches!(self, Err::Range { .. })
    }
}
