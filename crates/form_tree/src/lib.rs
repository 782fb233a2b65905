//! Tree-structured form model.
//!
//! A [`FormTree`] is an arena of elements: generic containers, typed fields,
//! forms and buttons. Elements are addressed by [`ElementId`] and linked into
//! parent/child hierarchies that support dotted-path lookup, structural
//! cloning, and value propagation between composite fields and their children.
//!
//! # Example
//!
//! ```
//! use form_tree::{FieldConfig, FieldType, FormTree};
//! use serde_json::json;
//!
//! let mut tree = FormTree::new();
//! let form = tree.new_form(Some("profile"));
//! let name = tree.new_field(FieldConfig::named(FieldType::String, "name")).unwrap();
//! let tag = tree.new_field(FieldConfig::new(FieldType::String)).unwrap();
//! let tags = tree
//!     .new_field(FieldConfig::named(FieldType::Array, "tags").prototype(tag))
//!     .unwrap();
//! tree.add(form, &[name, tags]).unwrap();
//!
//! tree.set_value(form, json!({"name": "x", "tags": ["a", "b"]})).unwrap();
//!
//! assert_eq!(tree.value(tree.find_field(form, "name").unwrap()), Some(&json!("x")));
//! assert_eq!(tree.children(tags).len(), 2);
//! assert_eq!(tree.value(tree.children(tags)[1]), Some(&json!("b")));
//! assert_eq!(tree.path(tags), "profile.tags");
//! ```

pub mod choice;
pub mod config;
pub mod element;
pub mod errors;
pub mod field;
pub mod form;
pub mod key_path;
pub mod logging;
pub mod tree;
pub mod widget;

pub use choice::FieldOption;
pub use config::{Mode, TreeConfig};
pub use element::{ButtonData, ElementId, FormData, FrameData, Node, NodeKind};
pub use errors::{FormError, Result};
pub use field::{FieldConfig, FieldData, FieldType};
pub use key_path::KeyPath;
pub use tree::{ChildRef, Descendants, FormTree};
pub use widget::Widget;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
