use serde_json::Value;
use super::Ty;

/// Array shape: `Array(Unknown)` when empty, otherwise the unified shape of
/// all members.
pub fn infer_array(xs: &[Value]) -> Ty {
    if xs.is_empty() {
        return Ty::Array(Box::new(Ty::Unknown));
    }
    let items: Vec<Ty> = xs.iter().map(super::infer).collect();
    Ty::Array(Box::new(super::unify_siblings(items)))
}
