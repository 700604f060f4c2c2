/// JSON manifests that describe a mesh container and point at its raw buffer files.
pub mod manifest;
