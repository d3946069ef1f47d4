//! Typed single-column record schema.
//!
//! Schemas are validated at construction so a malformed schema is rejected
//! before it ever reaches the encoder.

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};

/// Primitive kind of the single benchmarked column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Int,
    Utf8,
    NullableInt,
}

impl FieldKind {
    /// Variant-type label used in report keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Int => "int",
            FieldKind::Utf8 => "utf8",
            FieldKind::NullableInt => "nullable",
        }
    }

    pub(crate) fn tag(&self) -> u8 {
        match self {
            FieldKind::Int => 0,
            FieldKind::Utf8 => 1,
            FieldKind::NullableInt => 2,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(FieldKind::Int),
            1 => Ok(FieldKind::Utf8),
            2 => Ok(FieldKind::NullableInt),
            other => Err(BenchError::Format(format!("unknown field kind tag {other}"))),
        }
    }
}

/// Schema of one record: a single named field of a primitive kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub field: String,
    pub kind: FieldKind,
}

impl RecordSchema {
    pub fn new(field: impl Into<String>, kind: FieldKind) -> Result<Self> {
        let field = field.into();
        if field.is_empty() {
            return Err(BenchError::InvalidSchema(
                "field name must not be empty".to_string(),
            ));
        }
        Ok(Self { field, kind })
    }
}

/// One materialized field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Utf8(String),
    NullableInt(Option<i32>),
}

impl Value {
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Int(_) => FieldKind::Int,
            Value::Utf8(_) => FieldKind::Utf8,
            Value::NullableInt(_) => FieldKind::NullableInt,
        }
    }
}
