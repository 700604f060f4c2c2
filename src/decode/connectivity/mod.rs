use crate::core::bit_coder::{ByteReader, SliceReader};
use crate::core::mesh::{DrawElementType, SubMesh};
use crate::core::shared::range_end;
use super::{Err, RangeKind};

/// Decodes `count` indices of `sub_mesh` starting at element `start`.
/// 16-bit indices are zero-extended. The whole range is validated before anything is read.
pub(crate) fn decode_indices(
    index_buffer: &[u8],
    start: usize,
    count: usize,
    sub_mesh: &SubMesh,
) -> Result<Vec<u32>, Err> {
    let declared = sub_mesh.index_count as usize;
    let end = range_end(start, count).ok_or(Err::Range {
        what: RangeKind::IndexElements,
        requested_end: usize::MAX,
        limit: declared,
    })?;
    if end > declared {
        return Err(Err::Range {
            what: RangeKind::IndexElements,
            requested_end: end,
            limit: declared,
        });
    }

    let width = sub_mesh.draw_element_type.width();
    let first_byte = byte_position(sub_mesh.index_offset as usize, start, width);
    let end_byte = byte_position(sub_mesh.index_offset as usize, end, width);
    match (first_byte, end_byte) {
        (Some(first_byte), Some(end_byte)) if end_byte <= index_buffer.len() => {
            let mut reader = SliceReader::spown_at(index_buffer, first_byte)?;
            read_elements(&mut reader, count, sub_mesh.draw_element_type)
        }
        (_, end_byte) => Err(Err::Range {
            what: RangeKind::IndexBytes,
            requested_end: end_byte.unwrap_or(usize::MAX),
            limit: index_buffer.len(),
        }),
    }
}

fn byte_position(offset: usize, element: usize, width: usize) -> Option<usize> {
    element.checked_mul(width)?.checked_add(offset)
}

fn read_elements<R: ByteReader>(reader: &mut R, count: usize, ty: DrawElementType) -> Result<Vec<u32>, Err> {
    let mut out = Vec::with_capacity(count);
    match ty {
        DrawElementType::U16 => for _ in 0..count {
            out.push(reader.read_u16()? as u32);
        },
        DrawElementType::U32 => for _ in 0..count {
            out.push(reader.read_u32()?);
        },
    }
    Ok(out)
}
