//! Binary primitives shared by the per-entity codecs
//!
//! Every multi-byte value is little-endian regardless of the host. Optional
//! blocks are introduced by a one-byte presence marker; a `false` marker is
//! never followed by a length.

pub mod pool;
pub mod struct_array;

pub use pool::{BufferPool, CHUNK_ELEMENTS, PooledBuffer};
pub use struct_array::{Element, read_struct_array, write_struct_array};

use crate::error::{Error, Result};
use crate::model::Color;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Largest byte length accepted for a single string
const MAX_STRING_BYTES: usize = 1 << 20;

/// Write a presence marker or boolean
pub fn write_bool<W: Write>(writer: &mut W, value: bool) -> Result<()> {
    writer.write_u8(u8::from(value))?;
    Ok(())
}

/// Read a presence marker or boolean
pub fn read_bool<R: Read>(reader: &mut R, context: &str) -> Result<bool> {
    match reader
        .read_u8()
        .map_err(|e| Error::from_decode_io(e, context))?
    {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(Error::invalid_format_context(
            context,
            &format!("invalid presence marker {:#04x}", other),
        )),
    }
}

/// Write an element count as `i32`
pub fn write_len<W: Write>(writer: &mut W, len: usize) -> Result<()> {
    let len = i32::try_from(len).map_err(|_| {
        Error::InvalidArgument(format!("array length {} exceeds the format limit", len))
    })?;
    writer.write_i32::<LittleEndian>(len)?;
    Ok(())
}

/// Read an element count; negative counts are format errors
pub fn read_len<R: Read>(reader: &mut R, context: &str) -> Result<usize> {
    let len = reader
        .read_i32::<LittleEndian>()
        .map_err(|e| Error::from_decode_io(e, context))?;
    usize::try_from(len).map_err(|_| {
        Error::invalid_format_context(context, &format!("negative array length {}", len))
    })
}

/// Write a length-prefixed UTF-8 string
pub fn write_string<W: Write>(writer: &mut W, value: &str) -> Result<()> {
    write_len(writer, value.len())?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

/// Read a length-prefixed UTF-8 string
pub fn read_string<R: Read>(reader: &mut R, context: &str) -> Result<String> {
    let len = read_len(reader, context)?;
    if len > MAX_STRING_BYTES {
        return Err(Error::invalid_format_context(
            context,
            &format!("string length {} exceeds {} bytes", len, MAX_STRING_BYTES),
        ));
    }
    let mut bytes = vec![0u8; len];
    reader
        .read_exact(&mut bytes)
        .map_err(|e| Error::from_decode_io(e, context))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::invalid_format_context(context, &format!("invalid UTF-8: {}", e)))
}

/// Read a string that must not be empty
pub fn read_required_string<R: Read>(reader: &mut R, context: &str) -> Result<String> {
    let value = read_string(reader, context)?;
    if value.is_empty() {
        return Err(Error::invalid_format_context(
            context,
            "empty string where a value is required",
        ));
    }
    Ok(value)
}

/// Write a color packed as `0xAARRGGBB`
pub fn write_argb<W: Write>(writer: &mut W, color: Color) -> Result<()> {
    writer.write_u32::<LittleEndian>(color.to_argb())?;
    Ok(())
}

/// Read a color packed as `0xAARRGGBB`
pub fn read_argb<R: Read>(reader: &mut R, context: &str) -> Result<Color> {
    let value = reader
        .read_u32::<LittleEndian>()
        .map_err(|e| Error::from_decode_io(e, context))?;
    Ok(Color::from_argb(value))
}

/// Write an optional element array: `false`, or `true` plus the array
pub fn write_optional_array<W: Write, T: Element>(
    writer: &mut W,
    items: &[T],
    pool: &BufferPool,
) -> Result<()> {
    write_bool(writer, !items.is_empty())?;
    if !items.is_empty() {
        write_struct_array(writer, items, pool)?;
    }
    Ok(())
}

/// Read an optional element array; an absent block is an empty vector
pub fn read_optional_array<R: Read, T: Element>(
    reader: &mut R,
    pool: &BufferPool,
    context: &str,
) -> Result<Vec<T>> {
    if read_bool(reader, context)? {
        read_struct_array(reader, pool, context)
    } else {
        Ok(Vec::new())
    }
}

/// Write an optional list of layer tags
pub fn write_layers<W: Write>(writer: &mut W, layers: &[String]) -> Result<()> {
    write_bool(writer, !layers.is_empty())?;
    if !layers.is_empty() {
        write_len(writer, layers.len())?;
        for layer in layers {
            write_string(writer, layer)?;
        }
    }
    Ok(())
}

/// Read an optional list of layer tags; every tag must be non-empty
pub fn read_layers<R: Read>(reader: &mut R, context: &str) -> Result<Vec<String>> {
    if !read_bool(reader, context)? {
        return Ok(Vec::new());
    }
    let count = read_len(reader, context)?;
    let mut layers = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        layers.push(read_required_string(reader, context)?);
    }
    Ok(layers)
}

/// Write an optional name; `None` and `""` are both written as absent
pub fn write_name<W: Write>(writer: &mut W, name: Option<&str>) -> Result<()> {
    match name.filter(|n| !n.is_empty()) {
        Some(name) => {
            write_bool(writer, true)?;
            write_string(writer, name)
        }
        None => write_bool(writer, false),
    }
}

/// Read an optional name; a present name must be non-empty
pub fn read_name<R: Read>(reader: &mut R, context: &str) -> Result<Option<String>> {
    if read_bool(reader, context)? {
        read_required_string(reader, context).map(Some)
    } else {
        Ok(None)
    }
}
