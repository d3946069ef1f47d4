//! The "rowbin" row-oriented binary record format.
//!
//! A deliberately small single-column format used as the benchmarked
//! implementation: every producer writes the same layout, every decoder
//! materializes every row.
//!
//! # Binary Format
//!
//! ```text
//! Header:
//!   magic: [u8; 4]  = b"RWB1"
//!   version: u32    = 1
//!   count: u64      = number of rows
//!   kind: u8        = 0 int, 1 utf8, 2 nullable int
//!   flen: u16       = field name length
//!   field: [u8; flen]
//!
//! Body (repeated `count` times, kind-dependent):
//!   int:      value: i32
//!   utf8:     len: u32, bytes: [u8; len]
//!   nullable: present: u8, value: i32 (only when present == 1)
//! ```
//!
//! All integers are little-endian.

use std::io::{Cursor, Read, Write};

use crate::error::{BenchError, Result};
use crate::schema::{FieldKind, RecordSchema, Value};

/// Magic bytes identifying a rowbin buffer.
const MAGIC: &[u8; 4] = b"RWB1";

/// Current format version.
const FORMAT_VERSION: u32 = 1;

fn write_header<W: Write>(writer: &mut W, schema: &RecordSchema, count: u64) -> Result<()> {
    writer.write_all(MAGIC)?;
    writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
    writer.write_all(&count.to_le_bytes())?;
    writer.write_all(&[schema.kind.tag()])?;

    let name = schema.field.as_bytes();
    if name.len() > u16::MAX as usize {
        return Err(BenchError::InvalidSchema(format!(
            "field name is {} bytes, limit is {}",
            name.len(),
            u16::MAX
        )));
    }
    writer.write_all(&(name.len() as u16).to_le_bytes())?;
    writer.write_all(name)?;
    Ok(())
}

fn write_value<W: Write>(writer: &mut W, schema: &RecordSchema, value: &Value) -> Result<()> {
    if value.kind() != schema.kind {
        return Err(BenchError::TypeMismatch {
            expected: schema.kind.as_str(),
            got: value.kind().as_str(),
        });
    }
    match value {
        Value::Int(v) => writer.write_all(&v.to_le_bytes())?,
        Value::Utf8(s) => {
            writer.write_all(&(s.len() as u32).to_le_bytes())?;
            writer.write_all(s.as_bytes())?;
        }
        Value::NullableInt(v) => match v {
            Some(v) => {
                writer.write_all(&[1])?;
                writer.write_all(&v.to_le_bytes())?;
            }
            None => writer.write_all(&[0])?,
        },
    }
    Ok(())
}

/// Encode `values` as one rowbin buffer under `schema`.
///
/// Every value must match the schema kind; a mismatch is rejected before any
/// row of it is written.
pub fn encode_rows(schema: &RecordSchema, values: &[Value]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(32 + values.len() * 8);
    write_header(&mut buf, schema, values.len() as u64)?;
    for value in values {
        write_value(&mut buf, schema, value)?;
    }
    Ok(buf)
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_value<R: Read>(reader: &mut R, kind: FieldKind) -> Result<Value> {
    let mut buf1 = [0u8; 1];
    let mut buf4 = [0u8; 4];
    match kind {
        FieldKind::Int => {
            reader.read_exact(&mut buf4)?;
            Ok(Value::Int(i32::from_le_bytes(buf4)))
        }
        FieldKind::Utf8 => {
            let len = read_u32(reader)? as usize;
            let mut bytes = vec![0u8; len];
            reader.read_exact(&mut bytes)?;
            let s = String::from_utf8(bytes)
                .map_err(|e| BenchError::Format(format!("invalid utf8 row: {e}")))?;
            Ok(Value::Utf8(s))
        }
        FieldKind::NullableInt => {
            reader.read_exact(&mut buf1)?;
            match buf1[0] {
                0 => Ok(Value::NullableInt(None)),
                1 => {
                    reader.read_exact(&mut buf4)?;
                    Ok(Value::NullableInt(Some(i32::from_le_bytes(buf4))))
                }
                other => Err(BenchError::Format(format!(
                    "invalid null flag {other} in nullable row"
                ))),
            }
        }
    }
}

/// Decode a rowbin buffer, materializing every row.
pub fn decode_rows(buffer: &[u8]) -> Result<(RecordSchema, Vec<Value>)> {
    let mut reader = Cursor::new(buffer);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(BenchError::Format(format!(
            "bad magic bytes: expected {MAGIC:?}, got {magic:?}"
        )));
    }

    let version = read_u32(&mut reader)?;
    if version != FORMAT_VERSION {
        return Err(BenchError::Format(format!(
            "unsupported format version {version}"
        )));
    }

    let mut buf8 = [0u8; 8];
    reader.read_exact(&mut buf8)?;
    let count = u64::from_le_bytes(buf8);

    let mut buf1 = [0u8; 1];
    reader.read_exact(&mut buf1)?;
    let kind = FieldKind::from_tag(buf1[0])?;

    let mut buf2 = [0u8; 2];
    reader.read_exact(&mut buf2)?;
    let flen = u16::from_le_bytes(buf2) as usize;
    let mut name = vec![0u8; flen];
    reader.read_exact(&mut name)?;
    let field = String::from_utf8(name)
        .map_err(|e| BenchError::Format(format!("invalid utf8 field name: {e}")))?;
    let schema = RecordSchema::new(field, kind)?;

    // The count header is untrusted until the rows back it up: every row
    // costs at least one byte, so clamp the preallocation to the bytes left
    // and let the row reads reject a buffer that lies about its length.
    let remaining = buffer.len() as u64 - reader.position();
    let mut values = Vec::with_capacity(count.min(remaining) as usize);
    for _ in 0..count {
        values.push(read_value(&mut reader, kind)?);
    }

    Ok((schema, values))
}
