//! The accessor interface between the codec and record types.

use std::collections::BTreeMap;

use url::Url;
use uuid::Uuid;

use crate::Schema;

/// A single field value crossing the accessor interface.
///
/// The decoder always knows the declared `DataType` before it produces a value, so `set` receives
/// the variant matching its schema entry: `Int32` for `int32`/`sint32`/`sfixed32`, `UInt32` for
/// `uint32`/`fixed32`, and likewise for the 64-bit types.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Byte(u8),
    Identifier(Uuid),
    Url(Url),
    Structure(DynamicRecord),
    Repeated(Vec<FieldValue>),
}

macro_rules! impl_field_value {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for FieldValue {
            #[inline]
            fn from(v: $ty) -> Self {
                FieldValue::$variant(v)
            }
        }

        impl TryFrom<FieldValue> for $ty {
            type Error = FieldValue;

            /// Returns the value back if it holds a different variant.
            #[inline]
            fn try_from(v: FieldValue) -> Result<Self, FieldValue> {
                match v {
                    FieldValue::$variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}
impl_field_value!(bool, Bool);
impl_field_value!(i32, Int32);
impl_field_value!(i64, Int64);
impl_field_value!(u32, UInt32);
impl_field_value!(u64, UInt64);
impl_field_value!(f32, Float);
impl_field_value!(f64, Double);
impl_field_value!(String, String);
impl_field_value!(Vec<u8>, Bytes);
impl_field_value!(u8, Byte);
impl_field_value!(Uuid, Identifier);
impl_field_value!(Url, Url);
impl_field_value!(DynamicRecord, Structure);

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_owned())
    }
}

impl FieldValue {
    /// Collects a repeated value into native elements, dropping any that hold another variant.
    pub fn into_vec<T: TryFrom<FieldValue>>(self) -> Vec<T> {
        match self {
            FieldValue::Repeated(items) => items
                .into_iter()
                .filter_map(|v| T::try_from(v).ok())
                .collect(),
            other => T::try_from(other).ok().into_iter().collect(),
        }
    }

    /// Wraps native elements as a repeated value.
    pub fn from_vec<T: Into<FieldValue>>(items: impl IntoIterator<Item = T>) -> Self {
        FieldValue::Repeated(items.into_iter().map(Into::into).collect())
    }
}

/// A type the codec can serialize and deserialize.
///
/// Implementations are the schema provider: they publish a static schema and move values in and
/// out by field number. `Default` supplies the instance decode starts from, so every field needs a
/// zero/empty default and decoding an empty buffer yields `Self::default()`.
///
/// `set` is only called with field numbers present in `schema()` and with the `FieldValue`
/// variant matching the declared type; for `Optional` fields it receives the inner value.
pub trait Record: Default {
    fn schema() -> &'static Schema;

    /// Returns the value of `field_number`, or `None` to omit it from the encoding.
    fn get(&self, field_number: u32) -> Option<FieldValue>;

    fn set(&mut self, field_number: u32, value: FieldValue);
}

/// A schema paired with the values of its fields.
///
/// Nested structures cross the accessor interface in this form. Use `from_record()` and
/// `into_record()` to convert to and from a concrete `Record`.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicRecord {
    schema: &'static Schema,
    values: BTreeMap<u32, FieldValue>,
}

impl DynamicRecord {
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn get(&self, field_number: u32) -> Option<&FieldValue> {
        self.values.get(&field_number)
    }

    pub fn set(&mut self, field_number: u32, value: FieldValue) {
        self.values.insert(field_number, value);
    }

    pub fn remove(&mut self, field_number: u32) -> Option<FieldValue> {
        self.values.remove(&field_number)
    }

    /// Iterates over present values in field number order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &FieldValue)> {
        self.values.iter().map(|(&n, v)| (n, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Captures every present, non-reserved field of `record`.
    pub fn from_record<R: Record>(record: &R) -> Self {
        let schema = R::schema();
        let values = schema
            .fields()
            .iter()
            .filter(|f| !f.data_type.is_reserved())
            .filter_map(|f| record.get(f.number).map(|v| (f.number, v)))
            .collect();
        Self { schema, values }
    }

    /// Applies every value to a default `R`.
    pub fn into_record<R: Record>(self) -> R {
        let mut record = R::default();
        for (n, v) in self.values {
            record.set(n, v);
        }
        record
    }
}
