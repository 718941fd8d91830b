//! Display value produced by the renderer.
//!
//! Built only from marker/kind names, tuples (unions), one-element lists
//! (arrays) and string-keyed maps (objects). How it becomes text is up to
//! the caller: JSON via `serde`, or the compact `Display` notation.
use std::fmt;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// `"Unknown"` or a leaf kind token.
    Name(&'static str),
    /// Union alternatives, in merge order.
    Tuple(Vec<Shape>),
    /// Array wrapper around the element shape.
    List(Box<Shape>),
    Map(IndexMap<String, Shape>),
}

impl Shape {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Shape::Name(n) => serde_json::Value::from(*n),
            Shape::Tuple(xs) => serde_json::Value::Array(xs.iter().map(Shape::to_json).collect()),
            Shape::List(x) => serde_json::Value::Array(vec![x.to_json()]),
            Shape::Map(m) => serde_json::Value::Object(
                m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()
            ),
        }
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Shape::Name(n) => serializer.serialize_str(n),
            Shape::Tuple(xs) => {
                let mut seq = serializer.serialize_seq(Some(xs.len()))?;
                for x in xs { seq.serialize_element(x)?; }
                seq.end()
            }
            Shape::List(x) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(x.as_ref())?;
                seq.end()
            }
            Shape::Map(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m { map.serialize_entry(k, v)?; }
                map.end()
            }
        }
    }
}

/// Compact notation: `'int'`, `('int', 'str')`, `['int']`, `{'a': 'int'}`.
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Name(n) => write!(f, "'{n}'"),
            Shape::Tuple(xs) => {
                f.write_str("(")?;
                write_joined(f, xs.iter())?;
                if xs.len() == 1 { f.write_str(",")?; }
                f.write_str(")")
            }
            Shape::List(x) => write!(f, "[{x}]"),
            Shape::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "'{}': {v}", k.replace('\\', "\\\\").replace('\'', "\\'"))?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_joined<'a>(f: &mut fmt::Formatter<'_>, xs: impl Iterator<Item = &'a Shape>) -> fmt::Result {
    for (i, x) in xs.enumerate() {
        if i > 0 { f.write_str(", ")?; }
        write!(f, "{x}")?;
    }
    Ok(())
}
