//! Auto-vivifying chained reads and writes over JSON documents.
//!
//! Wrap a JSON object or array in a [`Session`] and walk it through [`View`]s.
//! Every field read on the way down that does not exist yet is created as an
//! empty mapping, and a freshly created mapping whose first access is an index
//! becomes a sequence instead.
//!
//! # Example
//!
//! ```
//! use easy_set::{easy_set, wrap};
//! use serde_json::json;
//!
//! // Single pass over a borrowed document.
//! let mut doc = json!({"z": "z"});
//! easy_set(&mut doc, |o| {
//!     o.at("a")?.at("b")?.set("c", json!(["final"]))
//! })
//! .unwrap();
//! assert_eq!(doc, json!({"z": "z", "a": {"b": {"c": ["final"]}}}));
//!
//! // Stand-alone session.
//! let mut session = wrap(json!({})).unwrap();
//! session.root().at("a").unwrap().set("b", "foo").unwrap();
//! session.root().at("a").unwrap().at("obj").unwrap().at("a").unwrap().set("b", "bar").unwrap();
//! assert_eq!(
//!     session.original(),
//!     json!({"a": {"b": "foo", "obj": {"a": {"b": "bar"}}}})
//! );
//! ```

pub mod cli;
pub mod cursor;
pub mod document;
pub mod error;
pub mod key;
pub mod options;
pub mod path;
pub mod pipeline;
pub mod session;
pub mod view;

pub use cursor::Cursor;
pub use document::{Container, ContainerId, ContainerKind, Document, Node, Sequence};
pub use error::EasySetError;
pub use options::{Options, ORIGINAL_FIELD};
pub use path::{format_path, parse_path, Path, PathError};
pub use pipeline::{apply_mutations, apply_mutations_with, easy_set, step, Handoff, Step};
pub use session::{wrap, Session};
pub use view::{Access, View};
