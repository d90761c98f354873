//! Logical field types and record schemas.

use std::collections::HashMap;

use crate::{SchemaError, WireType};

/// A placeholder for a removed field. Reserved entries are never encoded or decoded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Reserved {
    Index(u32),
    Name(String),
}

/// The logical type of a field.
///
/// Wrappers (`Optional`, `Repeated`, `Map`) are never nested directly inside themselves.
#[derive(Clone, Debug, PartialEq)]
pub enum DataType {
    Bool,
    Int32,
    Int64,
    UInt32,
    UInt64,
    /// Zig-zag coded `i32`.
    SInt32,
    /// Zig-zag coded `i64`.
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Float,
    Double,
    String,
    Bytes,
    /// A single `u8`, written with the `WireType::Byte` extension.
    Byte,
    /// A 16-byte UUID.
    Identifier,
    /// An absolute URL, written as its string form.
    Url,
    Optional(Box<DataType>),
    Repeated(Box<DataType>),
    Map {
        key: Box<DataType>,
        value: Box<DataType>,
    },
    Structure(&'static Schema),
    Reserved(Reserved),
}

impl DataType {
    pub fn optional(inner: DataType) -> Self {
        DataType::Optional(Box::new(inner))
    }

    pub fn repeated(element: DataType) -> Self {
        DataType::Repeated(Box::new(element))
    }

    pub fn map(key: DataType, value: DataType) -> Self {
        DataType::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Returns the wire type a single value of this type is written with.
    ///
    /// Containers and reserved entries have no wire type of their own.
    pub fn wire_type(&self) -> Option<WireType> {
        Some(match self {
            DataType::Bool
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt32
            | DataType::UInt64
            | DataType::SInt32
            | DataType::SInt64 => WireType::Varint,
            DataType::Fixed32 | DataType::SFixed32 | DataType::Float => WireType::I32,
            DataType::Fixed64 | DataType::SFixed64 | DataType::Double => WireType::I64,
            DataType::String
            | DataType::Url
            | DataType::Bytes
            | DataType::Identifier
            | DataType::Structure(_) => WireType::Len,
            DataType::Byte => WireType::Byte,
            DataType::Optional(_)
            | DataType::Repeated(_)
            | DataType::Map { .. }
            | DataType::Reserved(_) => return None,
        })
    }

    /// Strips one level of `Optional`.
    pub fn unwrap_optional(&self) -> &DataType {
        match self {
            DataType::Optional(inner) => inner,
            other => other,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, DataType::Optional(_))
    }

    pub fn is_reserved(&self) -> bool {
        matches!(self, DataType::Reserved(_))
    }
}

/// A schema entry: a field number and the type stored under it.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub number: u32,
    pub data_type: DataType,
}

impl Field {
    pub fn new(number: u32, data_type: DataType) -> Self {
        Self { number, data_type }
    }
}

/// The ordered field list of a record type, indexed by field number.
///
/// Fields are encoded in declaration order but always looked up by number, so numbering does not
/// have to follow declaration position.
#[derive(Clone, Debug)]
pub struct Schema {
    fields: Vec<Field>,
    by_number: HashMap<u32, usize>,
}

impl Schema {
    /// Builds a schema from `fields`.
    ///
    /// # Errors
    ///
    /// Returns `ZeroFieldNumber` or `DuplicateFieldNumber` if the numbering is invalid.
    pub fn new(fields: Vec<Field>) -> Result<Self, SchemaError> {
        let mut by_number = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if field.number == 0 {
                return Err(SchemaError::ZeroFieldNumber);
            }
            if by_number.insert(field.number, i).is_some() {
                return Err(SchemaError::DuplicateFieldNumber(field.number));
            }
        }
        Ok(Self { fields, by_number })
    }

    /// Builds a schema numbering `types` 1, 2, 3... in order.
    pub fn sequential(types: impl IntoIterator<Item = DataType>) -> Self {
        let fields: Vec<Field> = types
            .into_iter()
            .zip(1u32..)
            .map(|(data_type, number)| Field::new(number, data_type))
            .collect();
        let by_number = fields.iter().enumerate().map(|(i, f)| (f.number, i)).collect();
        Self { fields, by_number }
    }

    /// Returns the fields in declaration order, reserved entries included.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by number. Reserved entries never match.
    pub fn field(&self, number: u32) -> Option<&Field> {
        self.by_number
            .get(&number)
            .map(|&i| &self.fields[i])
            .filter(|f| !f.data_type.is_reserved())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.fields == other.fields
    }
}
