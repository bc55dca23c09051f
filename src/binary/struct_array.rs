//! Length-prefixed arrays of fixed-stride elements
//!
//! Layout: an `i32` element count followed by `count * STRIDE` bytes. Data
//! moves through a pooled chunk buffer of [`CHUNK_ELEMENTS`] elements, so a
//! mesh with millions of vertices never needs a second full-size byte copy.

use super::pool::{BufferPool, CHUNK_ELEMENTS};
use super::{read_len, write_len};
use crate::error::{Error, Result};
use crate::model::{Color, Vec2, Vec3};
use byteorder::{ByteOrder, LittleEndian};
use std::io::{Read, Write};

/// Element with a fixed, architecture-independent byte packing
pub trait Element: Copy {
    /// Encoded size in bytes
    const STRIDE: usize;

    /// Encode into exactly `STRIDE` bytes
    fn encode(&self, out: &mut [u8]);

    /// Decode from exactly `STRIDE` bytes
    fn decode(bytes: &[u8]) -> Self;
}

impl Element for f32 {
    const STRIDE: usize = 4;

    fn encode(&self, out: &mut [u8]) {
        LittleEndian::write_f32(out, *self);
    }

    fn decode(bytes: &[u8]) -> Self {
        LittleEndian::read_f32(bytes)
    }
}

impl Element for Vec2 {
    const STRIDE: usize = 8;

    fn encode(&self, out: &mut [u8]) {
        LittleEndian::write_f32(&mut out[0..4], self.x);
        LittleEndian::write_f32(&mut out[4..8], self.y);
    }

    fn decode(bytes: &[u8]) -> Self {
        Vec2::new(
            LittleEndian::read_f32(&bytes[0..4]),
            LittleEndian::read_f32(&bytes[4..8]),
        )
    }
}

impl Element for Vec3 {
    const STRIDE: usize = 12;

    fn encode(&self, out: &mut [u8]) {
        LittleEndian::write_f32(&mut out[0..4], self.x);
        LittleEndian::write_f32(&mut out[4..8], self.y);
        LittleEndian::write_f32(&mut out[8..12], self.z);
    }

    fn decode(bytes: &[u8]) -> Self {
        Vec3::new(
            LittleEndian::read_f32(&bytes[0..4]),
            LittleEndian::read_f32(&bytes[4..8]),
            LittleEndian::read_f32(&bytes[8..12]),
        )
    }
}

/// Vertex colors are stored channel by channel as R, G, B, A
impl Element for Color {
    const STRIDE: usize = 4;

    fn encode(&self, out: &mut [u8]) {
        out[0] = self.r;
        out[1] = self.g;
        out[2] = self.b;
        out[3] = self.a;
    }

    fn decode(bytes: &[u8]) -> Self {
        Color::argb(bytes[3], bytes[0], bytes[1], bytes[2])
    }
}

/// Double-precision point as written by 1.x files
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LegacyPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LegacyPoint {
    /// Narrow to single precision
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl Element for LegacyPoint {
    const STRIDE: usize = 24;

    fn encode(&self, out: &mut [u8]) {
        LittleEndian::write_f64(&mut out[0..8], self.x);
        LittleEndian::write_f64(&mut out[8..16], self.y);
        LittleEndian::write_f64(&mut out[16..24], self.z);
    }

    fn decode(bytes: &[u8]) -> Self {
        LegacyPoint {
            x: LittleEndian::read_f64(&bytes[0..8]),
            y: LittleEndian::read_f64(&bytes[8..16]),
            z: LittleEndian::read_f64(&bytes[16..24]),
        }
    }
}

/// Write a length-prefixed element array
///
/// An empty slice writes a zero count and nothing else.
pub fn write_struct_array<W: Write, T: Element>(
    writer: &mut W,
    items: &[T],
    pool: &BufferPool,
) -> Result<()> {
    write_len(writer, items.len())?;
    if items.is_empty() {
        return Ok(());
    }

    let mut chunk = pool.rent_chunk(T::STRIDE);
    for batch in items.chunks(CHUNK_ELEMENTS) {
        let bytes = &mut chunk[..batch.len() * T::STRIDE];
        for (item, out) in batch.iter().zip(bytes.chunks_exact_mut(T::STRIDE)) {
            item.encode(out);
        }
        writer.write_all(bytes)?;
    }
    Ok(())
}

/// Read a length-prefixed element array
///
/// A zero count yields an empty vector. A negative count or a block shorter
/// than the count announces is a format error.
pub fn read_struct_array<R: Read, T: Element>(
    reader: &mut R,
    pool: &BufferPool,
    context: &str,
) -> Result<Vec<T>> {
    let count = read_len(reader, context)?;
    read_elements(reader, count, pool, context)
}

/// Read `count` packed elements without a length prefix
pub(crate) fn read_elements<R: Read, T: Element>(
    reader: &mut R,
    count: usize,
    pool: &BufferPool,
    context: &str,
) -> Result<Vec<T>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    // Capacity is bounded by one chunk up front so that a corrupt count
    // fails on the missing data instead of on a huge allocation.
    let mut items = Vec::with_capacity(count.min(CHUNK_ELEMENTS));
    let mut chunk = pool.rent_chunk(T::STRIDE);
    let mut remaining = count;
    while remaining > 0 {
        let n = remaining.min(CHUNK_ELEMENTS);
        let bytes = &mut chunk[..n * T::STRIDE];
        reader
            .read_exact(bytes)
            .map_err(|e| Error::from_decode_io(e, context))?;
        items.extend(bytes.chunks_exact(T::STRIDE).map(T::decode));
        remaining -= n;
    }
    Ok(items)
}
