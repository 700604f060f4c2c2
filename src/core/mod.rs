/// Attribute descriptors, component formats and decoded vertex values.
pub mod attribute;

/// Little-endian byte readers over borrowed buffers.
pub mod bit_coder;

/// Half-precision float widening.
pub mod half;

/// Sub-mesh layout descriptors and the mesh container.
pub mod mesh;

pub mod shared;
