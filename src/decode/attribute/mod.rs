use crate::core::attribute::{AttributeDescriptor, AttributeFormat, VertexValue};
use crate::core::bit_coder::{ByteReader, ReaderErr, SliceReader};
use crate::core::half::HalfFloatMode;
use crate::core::mesh::SubMesh;
use crate::core::shared::range_end;
use super::{Err, RangeKind};

/// Everything needed to locate the values of one attribute inside its vertex buffer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AttributeLayout {
    /// start of the sub-mesh in the vertex buffer
    pub vertex_offset: usize,
    /// start of the attribute within one vertex
    pub buffer_offset: usize,
    pub stride: usize,
    pub num_components: usize,
    pub format: AttributeFormat,
}

impl AttributeLayout {
    pub fn new(sub_mesh: &SubMesh, att: &AttributeDescriptor, num_components: usize) -> Self {
        let (vertex_offset, stride) = sub_mesh.layout(att.buffer_index);
        Self {
            vertex_offset: vertex_offset as usize,
            buffer_offset: att.buffer_offset as usize,
            stride: stride as usize,
            num_components,
            format: att.format,
        }
    }

    /// Byte position of element `element`, `None` if it does not fit in `usize`.
    fn position(&self, element: usize) -> Option<usize> {
        self.stride.checked_mul(element)?
            .checked_add(self.vertex_offset)?
            .checked_add(self.buffer_offset)
    }

    /// Exclusive end of the bytes element `element` occupies.
    fn element_end(&self, element: usize) -> Option<usize> {
        self.position(element)?.checked_add(self.num_components * self.format.size())
    }
}

/// Decodes `count` values starting at element `start`.
/// The element range and the bytes of the last element are checked before anything is read.
pub(crate) fn decode_attribute(
    buffer: &[u8],
    layout: AttributeLayout,
    start: usize,
    count: usize,
    vertex_count: usize,
    half_float: HalfFloatMode,
) -> Result<Vec<VertexValue>, Err> {
    debug_assert!(layout.num_components <= 4);

    let end = range_end(start, count).ok_or(Err::Range {
        what: RangeKind::VertexElements,
        requested_end: usize::MAX,
        limit: vertex_count,
    })?;
    if end > vertex_count {
        return Err(Err::Range {
            what: RangeKind::VertexElements,
            requested_end: end,
            limit: vertex_count,
        });
    }
    if count == 0 {
        return Ok(Vec::new());
    }

    match layout.element_end(end - 1) {
        Some(end_byte) if end_byte <= buffer.len() => (),
        end_byte => return Err(Err::Range {
            what: RangeKind::VertexBytes,
            requested_end: end_byte.unwrap_or(usize::MAX),
            limit: buffer.len(),
        }),
    }

    let mut out = Vec::with_capacity(count);
    for element in start..end {
        let pos = layout.position(element).ok_or(ReaderErr::NotEnoughData)?;
        let mut reader = SliceReader::spown_at(buffer, pos)?;
        let mut value = VertexValue::ZERO;
        for component in 0..layout.num_components {
            value.set(component, read_component(&mut reader, layout.format, half_float)?);
        }
        out.push(value);
    }
    Ok(out)
}

/// Reads one component. Unknown formats fall back to a single unsigned byte.
#[inline]
pub(crate) fn read_component<R: ByteReader>(reader: &mut R, format: AttributeFormat, half_float: HalfFloatMode) -> Result<f32, ReaderErr> {
    match format {
        AttributeFormat::Float => reader.read_f32(),
        AttributeFormat::HalfFloat | AttributeFormat::HalfFloat2 => reader.read_u16().map(|bits| half_float.convert(bits)),
        AttributeFormat::Byte | AttributeFormat::Unknown(_) => reader.read_u8().map(f32::from),
    }
}
