use crate::inference::Ty;
use crate::shape::Shape;

pub const UNKNOWN_MARKER: &str = "Unknown";

/// Lower a type tree into its display value. Union arms keep merge order;
/// object keys keep the tree's key order.
pub fn render(ty: &Ty) -> Shape {
    match ty {
        Ty::Unknown => Shape::Name(UNKNOWN_MARKER),
        Ty::Leaf(leaf) => Shape::Name(leaf.name()),
        Ty::Union(arms) => Shape::Tuple(arms.iter().map(render).collect()),
        Ty::Array(item) => Shape::List(Box::new(render(item))),
        Ty::Object(fields) => Shape::Map(
            fields.iter().map(|(k, t)| (k.clone(), render(t))).collect()
        ),
    }
}
