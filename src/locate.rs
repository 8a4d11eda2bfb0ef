use crate::error::{OverflowError, Result};
use crate::types::{OverflowMap, Shape};
use serde::Serialize;
use serde::ser::{self, Impossible};
use std::fmt;

// ─── OverflowFields Trait ───────────────────────────────────────────────────

/// A record that keeps the JSON keys it does not name in an overflow map.
///
/// The overflow field must be excluded from the record's own `Serialize`
/// output with `#[serde(skip)]`; [`validate`] rejects the record otherwise.
///
/// ```
/// use overflow_json::{OverflowFields, OverflowMap};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct CatData {
///     name: String,
///     #[serde(skip)]
///     overflow: OverflowMap,
/// }
///
/// impl OverflowFields for CatData {
///     fn overflow(&self) -> &OverflowMap {
///         &self.overflow
///     }
///
///     fn overflow_mut(&mut self) -> &mut OverflowMap {
///         &mut self.overflow
///     }
/// }
/// ```
pub trait OverflowFields: Serialize {
    fn overflow(&self) -> &OverflowMap;
    fn overflow_mut(&mut self) -> &mut OverflowMap;
}

impl<T: OverflowFields + ?Sized> OverflowFields for Box<T> {
    #[inline]
    fn overflow(&self) -> &OverflowMap {
        (**self).overflow()
    }

    #[inline]
    fn overflow_mut(&mut self) -> &mut OverflowMap {
        (**self).overflow_mut()
    }
}

// ─── FieldHandle ────────────────────────────────────────────────────────────

/// A validated handle on a record's overflow field.
pub struct FieldHandle<'a, T: ?Sized> {
    record: &'a mut T,
}

impl<'a, T: OverflowFields + ?Sized> FieldHandle<'a, T> {
    /// Current overflow map, untouched.
    #[inline]
    pub fn get(&self) -> &OverflowMap {
        self.record.overflow()
    }

    /// Replace the overflow map with an empty one and return it for filling.
    pub fn reset(&mut self) -> &mut OverflowMap {
        let slot = self.record.overflow_mut();
        *slot = OverflowMap::new();
        slot
    }

    /// Like [`reset`](Self::reset), keeping the record's borrow.
    pub fn into_reset(self) -> &'a mut OverflowMap {
        let slot = self.record.overflow_mut();
        *slot = OverflowMap::new();
        slot
    }
}

/// Validate `record` and hand out its overflow field for reading and resetting.
pub fn locate<T: OverflowFields + ?Sized>(record: &mut T) -> Result<FieldHandle<'_, T>> {
    validate(&*record)?;
    Ok(FieldHandle { record })
}

/// Validate `record` and return its overflow map for reading.
pub fn overflow_of<T: OverflowFields + ?Sized>(record: &T) -> Result<&OverflowMap> {
    validate(record)?;
    Ok(record.overflow())
}

/// Check that `record` serializes as a struct and does not emit its overflow
/// map as one of the named fields.
///
/// Only the top level is inspected. Field values are compared by address
/// against the overflow map, never serialized, so this cannot fail on content.
pub fn validate<T: OverflowFields + ?Sized>(record: &T) -> Result<()> {
    let probe = ShapeProbe {
        overflow: record.overflow(),
    };
    match record.serialize(probe) {
        Ok(None) => Ok(()),
        Ok(Some(field)) => Err(OverflowError::WrongOverflowType { field }),
        Err(ProbeError::Rejected(shape)) => Err(OverflowError::NotAStruct { shape }),
        Err(ProbeError::Custom(msg)) => Err(OverflowError::Serialize(ser::Error::custom(msg))),
    }
}

// ─── Shape Probe ────────────────────────────────────────────────────────────
//
// A serializer that stops at the first call it receives. Anything but a
// struct (or a newtype struct around one) is rejected with its shape; for a
// struct, `Ok` carries the name of the field that exposed the overflow map.

#[derive(Debug)]
enum ProbeError {
    Rejected(Shape),
    Custom(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Rejected(shape) => write!(f, "expected struct, got {shape}"),
            ProbeError::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ProbeError {}

impl ser::Error for ProbeError {
    fn custom<M: fmt::Display>(msg: M) -> Self {
        ProbeError::Custom(msg.to_string())
    }
}

type Probed = Option<&'static str>;

#[derive(Clone, Copy)]
struct ShapeProbe {
    overflow: *const OverflowMap,
}

impl ShapeProbe {
    #[inline]
    fn is_overflow<T: ?Sized>(&self, value: &T) -> bool {
        // A zero-sized neighbour, or a struct holding the map as its first
        // field, may share the overflow map's address.
        std::ptr::addr_eq(value as *const T, self.overflow)
            && std::mem::size_of_val(value) == std::mem::size_of::<OverflowMap>()
            && std::any::type_name_of_val(value) == std::any::type_name::<OverflowMap>()
    }
}

macro_rules! reject {
    ($($method:ident($($arg:ty),*) => $shape:ident;)*) => {
        $(
            fn $method(self, $(_: $arg),*) -> std::result::Result<Probed, ProbeError> {
                Err(ProbeError::Rejected(Shape::$shape))
            }
        )*
    };
}

impl ser::Serializer for ShapeProbe {
    type Ok = Probed;
    type Error = ProbeError;

    type SerializeSeq = Impossible<Probed, ProbeError>;
    type SerializeTuple = Impossible<Probed, ProbeError>;
    type SerializeTupleStruct = Impossible<Probed, ProbeError>;
    type SerializeTupleVariant = Impossible<Probed, ProbeError>;
    type SerializeMap = Impossible<Probed, ProbeError>;
    type SerializeStruct = StructProbe;
    type SerializeStructVariant = Impossible<Probed, ProbeError>;

    reject! {
        serialize_bool(bool) => Bool;
        serialize_i8(i8) => Integer;
        serialize_i16(i16) => Integer;
        serialize_i32(i32) => Integer;
        serialize_i64(i64) => Integer;
        serialize_i128(i128) => Integer;
        serialize_u8(u8) => Integer;
        serialize_u16(u16) => Integer;
        serialize_u32(u32) => Integer;
        serialize_u64(u64) => Integer;
        serialize_u128(u128) => Integer;
        serialize_f32(f32) => Float;
        serialize_f64(f64) => Float;
        serialize_char(char) => Char;
        serialize_str(&str) => Str;
        serialize_bytes(&[u8]) => Bytes;
        serialize_none() => Option;
        serialize_unit() => Unit;
        serialize_unit_struct(&'static str) => UnitStruct;
        serialize_unit_variant(&'static str, u32, &'static str) => Enum;
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _: &T) -> std::result::Result<Probed, ProbeError> {
        Err(ProbeError::Rejected(Shape::Option))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> std::result::Result<Probed, ProbeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> std::result::Result<Probed, ProbeError> {
        Err(ProbeError::Rejected(Shape::Enum))
    }

    fn serialize_seq(self, _: Option<usize>) -> std::result::Result<Self::SerializeSeq, ProbeError> {
        Err(ProbeError::Rejected(Shape::Seq))
    }

    fn serialize_tuple(self, _: usize) -> std::result::Result<Self::SerializeTuple, ProbeError> {
        Err(ProbeError::Rejected(Shape::Tuple))
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self::SerializeTupleStruct, ProbeError> {
        Err(ProbeError::Rejected(Shape::TupleStruct))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self::SerializeTupleVariant, ProbeError> {
        Err(ProbeError::Rejected(Shape::Enum))
    }

    fn serialize_map(self, _: Option<usize>) -> std::result::Result<Self::SerializeMap, ProbeError> {
        Err(ProbeError::Rejected(Shape::Map))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> std::result::Result<Self::SerializeStruct, ProbeError> {
        Ok(StructProbe {
            probe: self,
            exposed: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self::SerializeStructVariant, ProbeError> {
        Err(ProbeError::Rejected(Shape::Enum))
    }
}

struct StructProbe {
    probe: ShapeProbe,
    exposed: Probed,
}

impl ser::SerializeStruct for StructProbe {
    type Ok = Probed;
    type Error = ProbeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> std::result::Result<(), ProbeError> {
        if self.exposed.is_none() && self.probe.is_overflow(value) {
            self.exposed = Some(key);
        }
        Ok(())
    }

    fn end(self) -> std::result::Result<Probed, ProbeError> {
        Ok(self.exposed)
    }
}
