use std::collections::BTreeSet;
use serde_json::{Map, Value};
use super::{Fields, Ty};

/// Each key gets the shape of its own value; nothing is merged at this level.
pub fn infer_object(map: &Map<String, Value>) -> Fields {
    map.iter()
        .map(|(k, v)| (k.clone(), super::infer(v)))
        .collect()
}

/// Merge object shapes key-by-key.
///
/// The key set is the union of all inputs. Keys are visited in lexicographic
/// order; an input lacking a key contributes `Unknown` for it before the
/// collected shapes go through the general merge.
pub fn merge_objects(mut objs: Vec<Fields>) -> Fields {
    debug_assert!(!objs.is_empty(), "object merge needs at least one object");

    let keys: BTreeSet<String> = objs
        .iter()
        .flat_map(|o| o.keys().cloned())
        .collect();

    let mut out = Fields::with_capacity(keys.len());
    for key in keys {
        let column = objs
            .iter_mut()
            .map(|o| o.swap_remove(&key).unwrap_or(Ty::Unknown))
            .collect();
        out.insert(key, super::merge(column));
    }
    out
}
