//! Loading of a [`MeshContainer`] from a JSON manifest.
//!
//! The manifest lists the sub-mesh descriptors and the paths of the raw buffer files.
//! Relative paths are resolved against the directory that holds the manifest.
//! The optional `config` object maps onto [`Config`]; missing fields take their defaults.
//!
//! ```json
//! {
//!     "vertex_buffers": ["body.vb0", "body.vb1"],
//!     "index_buffer": "body.ib",
//!     "sub_meshes": [ { "name": "body", "vertex_offset": 0, "stride": 32, ... } ],
//!     "config": { "half_float": "legacy", "component_counts": "name_pattern" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::mesh::builder::{self, MeshBuilder};
use crate::core::mesh::{MeshContainer, SubMesh};
use crate::decode::Config;


#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("IO Error on '{}': {}", .path.display(), .source)]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid manifest: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Mesh Builder Error: {0}")]
    MeshBuilderError(#[from] builder::Err),
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub vertex_buffers: Vec<PathBuf>,
    pub index_buffer: PathBuf,
    pub sub_meshes: Vec<SubMesh>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Config>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, Err> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads the buffer files, resolving relative paths against `base_dir`.
    /// The manifest's `config` is not part of the container; see [`load_manifest_with_config`].
    pub fn into_container(self, base_dir: &Path) -> Result<MeshContainer, Err> {
        let mut builder = MeshBuilder::new();
        for path in &self.vertex_buffers {
            builder.add_vertex_buffer(read_buffer(&base_dir.join(path))?);
        }
        builder.set_index_buffer(read_buffer(&base_dir.join(&self.index_buffer))?);
        for sub_mesh in self.sub_meshes {
            builder.add_sub_mesh(sub_mesh);
        }
        Ok(builder.build()?)
    }
}

/// Loads the manifest at `path` together with the buffers it refers to.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<MeshContainer, Err> {
    load_manifest_with_config(path).map(|(mesh, _)| mesh)
}

/// Like [`load_manifest`], also returning the accessor configuration the manifest carries, if any.
pub fn load_manifest_with_config<P: AsRef<Path>>(path: P) -> Result<(MeshContainer, Option<Config>), Err> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| Err::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    let mut manifest = Manifest::from_json(&json)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    log::debug!(
        "Loaded manifest {} with {} sub-mesh(es)",
        path.display(),
        manifest.sub_meshes.len()
    );
    let cfg = manifest.config.take();
    Ok((manifest.into_container(base_dir)?, cfg))
}

fn read_buffer(path: &Path) -> Result<Vec<u8>, Err> {
    fs::read(path).map_err(|source| Err::IoError {
        path: path.to_path_buf(),
        source,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attribute::AttributeFormat;
    use crate::core::attribute::ComponentCountPolicy;
    use crate::core::half::HalfFloatMode;
    use crate::core::mesh::DrawElementType;

    const MANIFEST: &str = r#"{
        "vertex_buffers": ["mesh.vb0"],
        "index_buffer": "mesh.ib",
        "sub_meshes": [{
            "name": "tri",
            "vertex_offset": 0, "stride": 6,
            "vertex_offset2": 0, "stride2": 0,
            "index_offset": 0, "vertex_count": 3, "index_count": 3,
            "draw_element_type": 0,
            "attributes": [
                { "names": ["Position0"], "buffer_index": 0, "buffer_offset": 0, "format": 5 }
            ]
        }]
    }"#;

    #[test]
    fn parse() {
        let manifest = Manifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.vertex_buffers, vec![PathBuf::from("mesh.vb0")]);
        let sub_mesh = &manifest.sub_meshes[0];
        assert_eq!(sub_mesh.draw_element_type, DrawElementType::U16);
        assert_eq!(sub_mesh.attributes[0].format, AttributeFormat::HalfFloat);
        assert_eq!(manifest.config, None);
    }

    #[test]
    fn config_from_manifest() {
        let json = MANIFEST.trim_end().trim_end_matches('}').to_owned()
            + r#", "config": { "half_float": "legacy", "component_counts": "name_pattern" } }"#;
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mesh.json"), json).unwrap();
        fs::write(dir.path().join("mesh.vb0"), [0x00u8, 0x3c, 0, 0, 0, 0]).unwrap();
        fs::write(dir.path().join("mesh.ib"), [0u8, 0, 0, 0, 0, 0]).unwrap();

        let (mesh, cfg) = load_manifest_with_config(dir.path().join("mesh.json")).unwrap();
        let cfg = cfg.unwrap();
        assert_eq!(cfg, Config {
            half_float: HalfFloatMode::Legacy,
            component_counts: ComponentCountPolicy::NamePattern,
        });

        let accessor = crate::decode::VertexAccessor::new(Some(&mesh), cfg);
        let values = accessor.read_attribute("Position0", 0, 1, &mesh.sub_meshes[0]).unwrap();
        assert_eq!(values[0].x.to_bits(), 0x3f8003ff);
    }

    #[test]
    fn partial_config_takes_defaults() {
        let manifest = Manifest::from_json(
            r#"{ "vertex_buffers": [], "index_buffer": "mesh.ib", "sub_meshes": [],
                 "config": { "half_float": "legacy" } }"#
        ).unwrap();
        assert_eq!(manifest.config, Some(Config {
            half_float: HalfFloatMode::Legacy,
            component_counts: ComponentCountPolicy::Table,
        }));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mesh.json"), MANIFEST).unwrap();
        fs::write(dir.path().join("mesh.vb0"), [0u8; 18]).unwrap();
        fs::write(dir.path().join("mesh.ib"), [0u8, 0, 1, 0, 2, 0]).unwrap();

        let mesh = load_manifest(dir.path().join("mesh.json")).unwrap();
        assert_eq!(mesh.vertex_buffers[0].len(), 18);
        assert_eq!(mesh.index_buffer, vec![0, 0, 1, 0, 2, 0]);
        assert_eq!(mesh.sub_meshes[0].name, "tri");
    }

    #[test]
    fn missing_buffer_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mesh.json"), MANIFEST).unwrap();
        let err = load_manifest(dir.path().join("mesh.json")).unwrap_err();
        match err {
            Err::IoError { path, .. } => assert!(path.ends_with("mesh.vb0")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(Manifest::from_json("{").unwrap_err(), Err::JsonError(_)));
    }
}
