/// Little-endian reads of the primitive types stored in mesh buffers.
/// Only `read_u8` is required; the wider reads are built on top of it.
pub trait ByteReader {
    fn read_u8(&mut self) -> Result<u8, ReaderErr>;

    fn read_u16(&mut self) -> Result<u16, ReaderErr> {
        let out = [
            self.read_u8()?,
            self.read_u8()?
        ];
        Ok(u16::from_le_bytes(out))
    }

    fn read_u32(&mut self) -> Result<u32, ReaderErr> {
        let out = [
            self.read_u8()?,
            self.read_u8()?,
            self.read_u8()?,
            self.read_u8()?
        ];
        Ok(u32::from_le_bytes(out))
    }

    fn read_f32(&mut self) -> Result<f32, ReaderErr> {
        self.read_u32().map(f32::from_bits)
    }
}


/// A reader over a borrowed byte slice that starts at an explicit position.
/// Readers are cheap to spawn, so callers create one per element instead of
/// seeking a shared cursor.
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Spawns a reader positioned at `pos`. Fails if `pos` lies past the end of `data`.
    pub fn spown_at(data: &'a [u8], pos: usize) -> Result<Self, ReaderErr> {
        if pos > data.len() {
            return Err(ReaderErr::NotEnoughData);
        }
        Ok(Self { data, pos })
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], ReaderErr> {
        let end = self.pos.checked_add(N).ok_or(ReaderErr::NotEnoughData)?;
        let bytes = self.data.get(self.pos..end).ok_or(ReaderErr::NotEnoughData)?;
        self.pos = end;
        let mut out = [0; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

impl ByteReader for SliceReader<'_> {
    fn read_u8(&mut self) -> Result<u8, ReaderErr> {
        let [b] = self.take::<1>()?;
        Ok(b)
    }

    fn read_u16(&mut self) -> Result<u16, ReaderErr> {
        self.take::<2>().map(u16::from_le_bytes)
    }

    fn read_u32(&mut self) -> Result<u32, ReaderErr> {
        self.take::<4>().map(u32::from_le_bytes)
    }
}


#[remain::sorted]
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderErr {
    #[error("Not enough data to read")]
    NotEnoughData,
}
