use serde_json::value::RawValue;
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;

pub type FastMap<K, V> = BTreeMap<K, V>;

/// An unparsed JSON value: the exact byte span it occupied in the source.
pub type RawJson = Box<RawValue>;

/// Unknown JSON keys mapped to their verbatim values.
///
/// Sorted by key, so encoded output is deterministic.
pub type OverflowMap = FastMap<SmolStr, RawJson>;

// ─── Shape ──────────────────────────────────────────────────────────────────

/// Top-level form a value takes when it is handed to a serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Bool,
    Integer,
    Float,
    Char,
    Str,
    Bytes,
    Option,
    Unit,
    UnitStruct,
    Enum,
    Seq,
    Tuple,
    TupleStruct,
    Map,
    Struct,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Bool => "bool",
            Shape::Integer => "integer",
            Shape::Float => "float",
            Shape::Char => "char",
            Shape::Str => "string",
            Shape::Bytes => "bytes",
            Shape::Option => "option",
            Shape::Unit => "unit",
            Shape::UnitStruct => "unit struct",
            Shape::Enum => "enum",
            Shape::Seq => "sequence",
            Shape::Tuple => "tuple",
            Shape::TupleStruct => "tuple struct",
            Shape::Map => "map",
            Shape::Struct => "struct",
        })
    }
}
