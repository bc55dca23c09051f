//! Triangle index storage with adaptive integer width
//!
//! The width is a function of the mesh's vertex count only, so the reader
//! can re-derive it without a tag in the stream:
//!
//! | vertex count     | width  |
//! |------------------|--------|
//! | `0..=255`        | 8-bit  |
//! | `256..=32767`    | 16-bit |
//! | `32768..`        | 32-bit |

use crate::binary::{BufferPool, CHUNK_ELEMENTS, read_len, write_len};
use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::io::{Read, Write};

/// Largest vertex count stored with 8-bit indices
pub const MAX_U8_VERTEX_COUNT: usize = 255;

/// Largest vertex count stored with 16-bit indices
pub const MAX_U16_VERTEX_COUNT: usize = 32767;

/// Storage width of a mesh's triangle indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexWidth {
    /// One byte per index
    U8,
    /// Two bytes per index
    U16,
    /// Four bytes per index
    U32,
}

impl IndexWidth {
    /// Narrowest width for a mesh with `vertex_count` vertices
    pub fn for_vertex_count(vertex_count: usize) -> Self {
        if vertex_count <= MAX_U8_VERTEX_COUNT {
            IndexWidth::U8
        } else if vertex_count <= MAX_U16_VERTEX_COUNT {
            IndexWidth::U16
        } else {
            IndexWidth::U32
        }
    }

    /// Encoded bytes per index
    pub fn byte_size(self) -> usize {
        match self {
            IndexWidth::U8 => 1,
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
        }
    }
}

/// Triangle indices stored at one of three widths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexArray {
    /// 8-bit storage
    U8(Vec<u8>),
    /// 16-bit storage
    U16(Vec<u16>),
    /// 32-bit storage
    U32(Vec<u32>),
}

impl Default for IndexArray {
    fn default() -> Self {
        IndexArray::U8(Vec::new())
    }
}

impl IndexArray {
    /// Store `indices` at the width chosen for `vertex_count`
    ///
    /// Every index must be below `vertex_count`.
    pub fn from_indices(indices: &[u32], vertex_count: usize) -> Result<Self> {
        if let Some((pos, &bad)) = indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= vertex_count)
        {
            return Err(Error::InvalidArgument(format!(
                "triangle index {} at position {} is out of range for {} vertices",
                bad, pos, vertex_count
            )));
        }

        // Narrowing is lossless: every index is < vertex_count <= the width's limit.
        Ok(match IndexWidth::for_vertex_count(vertex_count) {
            IndexWidth::U8 => IndexArray::U8(indices.iter().map(|&i| i as u8).collect()),
            IndexWidth::U16 => IndexArray::U16(indices.iter().map(|&i| i as u16).collect()),
            IndexWidth::U32 => IndexArray::U32(indices.to_vec()),
        })
    }

    /// Storage width
    pub fn width(&self) -> IndexWidth {
        match self {
            IndexArray::U8(_) => IndexWidth::U8,
            IndexArray::U16(_) => IndexWidth::U16,
            IndexArray::U32(_) => IndexWidth::U32,
        }
    }

    /// Number of indices
    pub fn len(&self) -> usize {
        match self {
            IndexArray::U8(v) => v.len(),
            IndexArray::U16(v) => v.len(),
            IndexArray::U32(v) => v.len(),
        }
    }

    /// Whether there are no indices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at `position`, widened to `u32`
    pub fn get(&self, position: usize) -> Result<u32> {
        let value = match self {
            IndexArray::U8(v) => v.get(position).map(|&i| u32::from(i)),
            IndexArray::U16(v) => v.get(position).map(|&i| u32::from(i)),
            IndexArray::U32(v) => v.get(position).copied(),
        };
        value.ok_or_else(|| {
            Error::InvalidArgument(format!(
                "index position {} is out of range (length {})",
                position,
                self.len()
            ))
        })
    }

    /// Iterate over all indices widened to `u32`
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        let (a, b, c) = match self {
            IndexArray::U8(v) => (Some(v.iter().map(|&i| u32::from(i))), None, None),
            IndexArray::U16(v) => (None, Some(v.iter().map(|&i| u32::from(i))), None),
            IndexArray::U32(v) => (None, None, Some(v.iter().copied())),
        };
        a.into_iter()
            .flatten()
            .chain(b.into_iter().flatten())
            .chain(c.into_iter().flatten())
    }

    /// All indices widened to `u32`
    pub fn to_u32_vec(&self) -> Vec<u32> {
        match self {
            IndexArray::U32(v) => v.clone(),
            _ => self.iter().collect(),
        }
    }

    /// Widen the indices starting at `start` into `out`
    ///
    /// Returns how many indices were written, which is less than `out.len()`
    /// only at the end of the array.
    pub fn expand_into(&self, start: usize, out: &mut [u32]) -> usize {
        let n = out.len().min(self.len().saturating_sub(start));
        let out = &mut out[..n];
        match self {
            IndexArray::U8(v) => {
                for (o, &i) in out.iter_mut().zip(&v[start..start + n]) {
                    *o = u32::from(i);
                }
            }
            IndexArray::U16(v) => {
                for (o, &i) in out.iter_mut().zip(&v[start..start + n]) {
                    *o = u32::from(i);
                }
            }
            IndexArray::U32(v) => out.copy_from_slice(&v[start..start + n]),
        }
        n
    }

    /// Write the index count followed by the packed indices
    pub fn write<W: Write>(&self, writer: &mut W, pool: &BufferPool) -> Result<()> {
        write_len(writer, self.len())?;
        let stride = self.width().byte_size();
        let mut chunk = pool.rent_chunk(stride);
        let mut start = 0;
        while start < self.len() {
            let n = (self.len() - start).min(CHUNK_ELEMENTS);
            let bytes = &mut chunk[..n * stride];
            match self {
                IndexArray::U8(v) => bytes.copy_from_slice(&v[start..start + n]),
                IndexArray::U16(v) => LittleEndian::write_u16_into(&v[start..start + n], bytes),
                IndexArray::U32(v) => LittleEndian::write_u32_into(&v[start..start + n], bytes),
            }
            writer.write_all(bytes)?;
            start += n;
        }
        Ok(())
    }

    /// Read an index block written for a mesh with `vertex_count` vertices
    ///
    /// `width` is the width the writer used; callers derive it from the
    /// vertex count (or force 32-bit for files predating adaptive widths).
    pub fn read<R: Read>(
        reader: &mut R,
        width: IndexWidth,
        pool: &BufferPool,
        context: &str,
    ) -> Result<Self> {
        let count = read_len(reader, context)?;
        let stride = width.byte_size();
        let mut chunk = pool.rent_chunk(stride);
        let mut array = match width {
            IndexWidth::U8 => IndexArray::U8(Vec::with_capacity(count.min(CHUNK_ELEMENTS))),
            IndexWidth::U16 => IndexArray::U16(Vec::with_capacity(count.min(CHUNK_ELEMENTS))),
            IndexWidth::U32 => IndexArray::U32(Vec::with_capacity(count.min(CHUNK_ELEMENTS))),
        };

        let mut remaining = count;
        while remaining > 0 {
            let n = remaining.min(CHUNK_ELEMENTS);
            let bytes = &mut chunk[..n * stride];
            reader
                .read_exact(bytes)
                .map_err(|e| Error::from_decode_io(e, context))?;
            match &mut array {
                IndexArray::U8(v) => v.extend_from_slice(bytes),
                IndexArray::U16(v) => v.extend(bytes.chunks_exact(2).map(LittleEndian::read_u16)),
                IndexArray::U32(v) => v.extend(bytes.chunks_exact(4).map(LittleEndian::read_u32)),
            }
            remaining -= n;
        }
        Ok(array)
    }

    /// Re-store at the width chosen for `vertex_count`
    ///
    /// Used when upgrading 32-bit indices read from pre-3.0 files.
    pub(crate) fn narrowed(self, vertex_count: usize) -> Result<Self> {
        if self.width() == IndexWidth::for_vertex_count(vertex_count) {
            return Ok(self);
        }
        IndexArray::from_indices(&self.to_u32_vec(), vertex_count)
    }
}
