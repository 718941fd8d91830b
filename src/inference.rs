//! Structural type inference over parsed JSON.
//!
//! Walk a `serde_json::Value` once, classify every position, and unify the
//! shapes seen across sibling array elements into the smallest faithful
//! description (a `Ty`).
//!
//! Design goals:
//! - Closed sum type; every merge step matches exhaustively.
//! - Unions are flat and deduplicated; a one-arm union is never built.
//! - Object shapes merge key-by-key in lexicographic order → deterministic.
//! - No shared state; every call is a pure function of its input.
pub mod arr;
pub mod obj;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

pub use arr::infer_array;
pub use obj::{infer_object, merge_objects};

// ------------------------------ Type Tree --------------------------------- //

/// Field map of an object shape.
///
/// Equality ignores insertion order, so two objects with the same keys and
/// field types compare equal regardless of how their keys were laid out.
pub type Fields = IndexMap<String, Ty>;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum Ty {
    /// No information: an empty array, or a key missing from a merged object.
    Unknown,
    Leaf(Leaf),
    Array(Box<Ty>),
    Object(Fields),
    /// ≥ 2 distinct alternatives, none of which is itself a `Union`.
    Union(Vec<Ty>),
}

/// Runtime classification of a scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Leaf {
    Str,
    Int,
    Float,
    Bool,
    Null,
}

impl Leaf {
    pub fn of(v: &Value) -> Option<Self> {
        match v {
            Value::Null => Some(Leaf::Null),
            Value::Bool(_) => Some(Leaf::Bool),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Leaf::Int),
            Value::Number(_) => Some(Leaf::Float),
            Value::String(_) => Some(Leaf::Str),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Canonical short token used by the renderer.
    pub fn name(self) -> &'static str {
        match self {
            Leaf::Str => "str",
            Leaf::Int => "int",
            Leaf::Float => "float",
            Leaf::Bool => "bool",
            Leaf::Null => "NoneType",
        }
    }
}

impl Ty {
    pub fn is_unknown(&self) -> bool { matches!(self, Ty::Unknown) }
    pub fn is_object(&self) -> bool { matches!(self, Ty::Object(_)) }
}

// ------------------------------- Extract ---------------------------------- //

/// Infer the shape of one parsed JSON document. Total over all JSON values.
pub fn infer(v: &Value) -> Ty {
    match v {
        Value::Array(xs) => infer_array(xs),
        Value::Object(m) => Ty::Object(infer_object(m)),
        scalar => match Leaf::of(scalar) {
            Some(leaf) => Ty::Leaf(leaf),
            None => unreachable!("composite values are matched above"),
        },
    }
}

// ----------------------------- General merge ------------------------------ //

/// Unify an arbitrary list of shapes observed at the same position.
///
/// Objects collapse into one merged object that is always the last union arm;
/// everything else keeps first-seen order.
pub fn merge(tys: Vec<Ty>) -> Ty {
    let (objs, mut rest) = distribute(tys);
    match (objs.is_empty(), rest.is_empty()) {
        (true, true) => Ty::Unknown,
        (true, false) => {
            if rest.len() == 1 {
                rest.remove(0)
            } else {
                tracing::trace!(arms = rest.len(), "promoting to union");
                Ty::Union(rest)
            }
        }
        (false, true) => Ty::Object(merge_objects(objs)),
        (false, false) => {
            rest.push(Ty::Object(merge_objects(objs)));
            tracing::trace!(arms = rest.len(), "promoting to union with object arm");
            Ty::Union(rest)
        }
    }
}

/// Split shapes into object field maps and everything else, flattening union
/// arms back into the same partition.
///
/// The non-object bucket is deduplicated in first-seen order. When it held
/// more than one entry before deduplication, `Unknown` entries are dropped.
pub fn distribute(tys: Vec<Ty>) -> (Vec<Fields>, Vec<Ty>) {
    if tys.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let mut objs = Vec::new();
    let mut rest = Vec::new();
    let mut nested = Vec::new();
    for ty in tys {
        match ty {
            Ty::Object(fields) => objs.push(fields),
            Ty::Union(arms) => nested.extend(arms),
            other @ (Ty::Unknown | Ty::Leaf(_) | Ty::Array(_)) => rest.push(other),
        }
    }
    let (nested_objs, nested_rest) = distribute(nested);
    objs.extend(nested_objs);
    rest.extend(nested_rest);
    (objs, distinct(rest))
}

fn distinct(tys: Vec<Ty>) -> Vec<Ty> {
    let drop_unknown = tys.len() > 1;
    let mut out: Vec<Ty> = Vec::with_capacity(tys.len());
    for ty in tys {
        if drop_unknown && ty.is_unknown() {
            continue;
        }
        if !out.contains(&ty) {
            out.push(ty);
        }
    }
    out
}

/// Unify the shapes of sibling values: identical shapes short-circuit, pure
/// object lists go straight to the object merge, anything else is a general
/// merge. Returns `Unknown` for an empty list.
pub fn unify_siblings(tys: Vec<Ty>) -> Ty {
    let Some(first) = tys.first() else {
        return Ty::Unknown;
    };
    if tys.iter().all(|t| t == first) {
        return tys.into_iter().next().unwrap_or(Ty::Unknown);
    }
    if tys.iter().all(Ty::is_object) {
        let objs = tys
            .into_iter()
            .filter_map(|t| match t {
                Ty::Object(fields) => Some(fields),
                _ => None,
            })
            .collect();
        return Ty::Object(merge_objects(objs));
    }
    merge(tys)
}

// ------------------------------- Front API -------------------------------- //

/// Accumulates several documents and unifies them as if they were siblings
/// in one array.
#[derive(Debug, Default)]
pub struct Inference { observed: Vec<Ty> }

impl Inference {
    pub fn new() -> Self { Self::default() }

    pub fn observe_value(&mut self, v: &Value) {
        self.observed.push(infer(v));
    }

    pub fn len(&self) -> usize { self.observed.len() }

    pub fn is_empty(&self) -> bool { self.observed.is_empty() }

    pub fn solve(&self) -> Ty {
        tracing::debug!(documents = self.observed.len(), "solving");
        unify_siblings(self.observed.clone())
    }
}

pub fn infer_from_values<'a, I>(values: I) -> Ty
where
    I: IntoIterator<Item = &'a Value>
{
    unify_siblings(values.into_iter().map(infer).collect())
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn leaf(l: Leaf) -> Ty { Ty::Leaf(l) }

    fn object<const N: usize>(fields: [(&str, Ty); N]) -> Ty {
        Ty::Object(fields.into_iter().map(|(k, t)| (k.to_string(), t)).collect())
    }

    #[test]
    fn scalars_classify_by_discriminant() {
        assert_eq!(infer(&json!("a")), leaf(Leaf::Str));
        assert_eq!(infer(&json!(3)), leaf(Leaf::Int));
        assert_eq!(infer(&json!(u64::MAX)), leaf(Leaf::Int));
        assert_eq!(infer(&json!(-3)), leaf(Leaf::Int));
        assert_eq!(infer(&json!(3.5)), leaf(Leaf::Float));
        assert_eq!(infer(&json!(true)), leaf(Leaf::Bool));
        assert_eq!(infer(&json!(null)), leaf(Leaf::Null));
    }

    #[test]
    fn object_fields_are_inferred_without_merging() {
        let ty = infer(&json!({"a": 1, "b": [1, 2], "c": {"d": null}}));
        assert_eq!(ty, object([
            ("a", leaf(Leaf::Int)),
            ("b", Ty::Array(Box::new(leaf(Leaf::Int)))),
            ("c", object([("d", leaf(Leaf::Null))])),
        ]));
    }

    #[test]
    fn unknown_absorption() {
        assert_eq!(merge(vec![Ty::Unknown, Ty::Unknown]), Ty::Unknown);
        assert_eq!(merge(vec![leaf(Leaf::Int), Ty::Unknown]), leaf(Leaf::Int));
        assert_eq!(merge(vec![Ty::Unknown, leaf(Leaf::Int)]), leaf(Leaf::Int));
        assert_eq!(merge(vec![]), Ty::Unknown);
    }

    #[test]
    fn lone_unknown_survives_next_to_an_object() {
        // the remainder bucket has a single entry, so `Unknown` is kept
        let ty = merge(vec![Ty::Unknown, object([("a", leaf(Leaf::Int))])]);
        assert_eq!(ty, Ty::Union(vec![Ty::Unknown, object([("a", leaf(Leaf::Int))])]));
    }

    #[test]
    fn unions_are_flattened_and_deduplicated() {
        let u = Ty::Union(vec![leaf(Leaf::Int), leaf(Leaf::Str)]);
        let ty = merge(vec![u.clone(), leaf(Leaf::Bool), u]);
        assert_eq!(ty, Ty::Union(vec![leaf(Leaf::Bool), leaf(Leaf::Int), leaf(Leaf::Str)]));
    }

    #[test]
    fn union_object_arms_merge_with_direct_objects() {
        let u = Ty::Union(vec![leaf(Leaf::Str), object([("a", leaf(Leaf::Int))])]);
        let ty = merge(vec![object([("b", leaf(Leaf::Bool))]), u]);
        assert_eq!(ty, Ty::Union(vec![
            leaf(Leaf::Str),
            object([("a", leaf(Leaf::Int)), ("b", leaf(Leaf::Bool))]),
        ]));
    }

    #[test]
    fn only_objects_merge_into_a_single_object() {
        let ty = merge(vec![
            object([("a", leaf(Leaf::Int))]),
            object([("a", leaf(Leaf::Float))]),
        ]);
        assert_eq!(ty, object([("a", Ty::Union(vec![leaf(Leaf::Int), leaf(Leaf::Float)]))]));
    }

    #[test]
    fn single_remaining_arm_is_returned_bare() {
        assert_eq!(merge(vec![leaf(Leaf::Str), leaf(Leaf::Str)]), leaf(Leaf::Str));
    }

    #[test]
    fn inference_front_api_unifies_documents_as_siblings() {
        let mut inf = Inference::new();
        assert_eq!(inf.solve(), Ty::Unknown);
        inf.observe_value(&json!({"a": 1, "b": 2}));
        inf.observe_value(&json!({"a": 3}));
        assert_eq!(inf.len(), 2);
        assert_eq!(inf.solve(), object([("a", leaf(Leaf::Int)), ("b", leaf(Leaf::Int))]));
    }

    #[test]
    fn infer_from_values_matches_array_element() {
        let docs = [json!(1), json!("a"), json!(2)];
        let arr = json!([1, "a", 2]);
        assert_eq!(Ty::Array(Box::new(infer_from_values(docs.iter()))), infer(&arr));
    }

    #[test]
    fn repeated_inference_is_deterministic() {
        let v = json!([{"z": 1, "a": [1, "x"]}, {"m": null}, 4.5, "s"]);
        let first = infer(&v);
        for _ in 0..8 {
            assert_eq!(infer(&v), first);
            assert_eq!(
                serde_json::to_string(&infer(&v)).unwrap(),
                serde_json::to_string(&first).unwrap()
            );
        }
    }
}
