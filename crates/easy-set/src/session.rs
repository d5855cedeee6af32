//! Interception sessions.
//!
//! A [`Session`] owns one document and the cursor shared by every view
//! derived from it. Views borrow the session mutably, so cursor state can
//! never leak between two sessions or be driven by two views at once.

use serde_json::Value;

use crate::cursor::Cursor;
use crate::document::{Container, ContainerId, ContainerKind, Document, Node};
use crate::error::EasySetError;
use crate::key::is_numeric;
use crate::options::Options;
use crate::view::View;

#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) document: Document,
    pub(crate) cursor: Cursor,
    pub(crate) options: Options,
}

/// Begin an interception session over `root`.
///
/// # Errors
///
/// `NotAContainer` if `root` is not a JSON object or array.
///
/// # Example
///
/// ```
/// use easy_set::wrap;
/// use serde_json::json;
///
/// let mut session = wrap(json!({})).unwrap();
/// session.root().at("a").unwrap().set("b", "foo").unwrap();
/// session.root().at("a").unwrap().set("c", 1).unwrap();
/// assert_eq!(session.into_value(), json!({"a": {"b": "foo", "c": 1}}));
/// ```
pub fn wrap(root: Value) -> Result<Session, EasySetError> {
    Session::new(root)
}

impl Session {
    pub fn new(root: Value) -> Result<Self, EasySetError> {
        Self::with_options(root, Options::default())
    }

    pub fn with_options(root: Value, options: Options) -> Result<Self, EasySetError> {
        Ok(Self {
            document: Document::from_value(root)?,
            cursor: Cursor::new(),
            options,
        })
    }

    /// Intercepted view of the root container.
    pub fn root(&mut self) -> View<'_> {
        let root = self.document.root();
        View::new(self, root)
    }

    /// The unwrapped root, with every mutation made so far.
    pub fn original(&self) -> Value {
        self.document.to_value()
    }

    pub fn into_value(self) -> Value {
        self.document.into_value()
    }

    /// Read without materializing. See [`Document::lookup`].
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<Value> {
        self.document.lookup(path)
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Intercepted read of `field` on `container`.
    ///
    /// Returns the node now stored at the (possibly redirected) slot; absent
    /// fields come back as a freshly allocated empty mapping. On a sequence a
    /// non-index field is vivified as a detached property, so it is readable
    /// for the rest of the session but never exported.
    pub(crate) fn read(&mut self, container: ContainerId, field: &str) -> Node {
        let mut target = container;
        if let Some((owner, last_field)) = self.cursor.pending_conversion(field) {
            target = self.document.convert_to_sequence(owner, last_field);
        }

        let existing = self.document.container(target).get(field).cloned();
        self.cursor.record(target, field, existing.is_none());

        match existing {
            Some(Node::Scalar(Value::Null)) if self.options.vivify_null => self.vivify(target, field),
            Some(node) => node,
            None => self.vivify(target, field),
        }
    }

    /// Intercepted write of `field = value` on `container`.
    ///
    /// Numeric fields that are not indices land in a sequence's detached
    /// properties.
    pub(crate) fn write(
        &mut self,
        container: ContainerId,
        field: &str,
        value: Value,
    ) -> Result<(), EasySetError> {
        let mut target = container;
        if !is_numeric(field) {
            if self.document.container(target).kind() == ContainerKind::Sequence {
                return Err(EasySetError::invalid_key_kind(field));
            }
        } else if let Some((owner, last_field)) = self.cursor.pending_conversion(field) {
            target = self.document.convert_to_sequence(owner, last_field);
        }

        let node = self.document.import(value);
        self.document.container_mut(target).set(field, node);
        Ok(())
    }

    fn vivify(&mut self, container: ContainerId, field: &str) -> Node {
        let id = self.document.alloc(Container::mapping());
        self.document
            .container_mut(container)
            .set(field, Node::Container(id));
        tracing::trace!(
            container = container.index(),
            field,
            created = id.index(),
            "vivified empty mapping"
        );
        Node::Container(id)
    }
}
