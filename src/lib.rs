//! Infer the structural shape of a JSON document.
//!
//! ```
//! use serde_json::json;
//! use json_shape::{infer, render};
//!
//! let shape = render(&infer(&json!([1, "a", 2])));
//! assert_eq!(shape.to_json(), json!([["int", "str"]]));
//! assert_eq!(shape.to_string(), "[('int', 'str')]");
//! ```
pub mod inference;
pub mod shape;
pub mod render;
pub mod error;
pub mod cli;

pub use inference::{infer, merge, Inference, Leaf, Ty};
pub use render::render;
pub use shape::Shape;
