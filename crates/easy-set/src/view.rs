//! Intercepted views.
//!
//! A [`View`] stands for one container of a session. Reading a field through
//! it auto-vivifies the field and hands back another view, so chains like
//! `root.at("a")?.at("b")?.index(2)?.set("c", 1)?` build the whole path on
//! the way down.

use serde_json::Value;

use crate::document::{ContainerId, ContainerKind, Node};
use crate::error::EasySetError;
use crate::path::{parse_path, PathError};
use crate::pipeline::Handoff;
use crate::session::Session;

pub struct View<'s> {
    session: &'s mut Session,
    container: ContainerId,
}

/// Result of an intercepted read.
pub enum Access<'s> {
    /// The field holds a container; keep chaining.
    View(View<'s>),
    /// The field holds a scalar, or the original root was requested.
    Value(Value),
}

impl<'s> Access<'s> {
    pub fn into_view(self) -> Option<View<'s>> {
        match self {
            Access::View(view) => Some(view),
            Access::Value(_) => None,
        }
    }

    /// The accessed value, exported if it is a container.
    pub fn into_value(self) -> Value {
        match self {
            Access::View(view) => view.to_value(),
            Access::Value(value) => value,
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self, Access::View(_))
    }
}

impl std::fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("container", &self.container)
            .field("kind", &self.kind())
            .finish()
    }
}

impl std::fmt::Debug for Access<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Access::View(view) => f.debug_tuple("View").field(view).finish(),
            Access::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl<'s> View<'s> {
    pub(crate) fn new(session: &'s mut Session, container: ContainerId) -> Self {
        Self { session, container }
    }

    pub fn id(&self) -> ContainerId {
        self.container
    }

    pub fn kind(&self) -> ContainerKind {
        self.session.document.container(self.container).kind()
    }

    /// Check for `field` without materializing it.
    pub fn has(&self, field: &str) -> bool {
        self.session.document.container(self.container).has(field)
    }

    /// Export the container this view stands for.
    pub fn to_value(&self) -> Value {
        self.session.document.export(self.container)
    }

    /// The unwrapped session root, with every mutation made so far.
    pub fn original(&self) -> Value {
        self.session.original()
    }

    /// Hand-off that makes the next pipeline step start at this container.
    pub fn handoff(&self) -> Handoff {
        Handoff::Container {
            origin: self.session.document.origin(),
            id: self.container,
        }
    }

    /// A shorter-lived view of the same container, leaving `self` usable.
    pub fn reborrow(&mut self) -> View<'_> {
        View::new(self.session, self.container)
    }

    /// Intercepted read of `field`.
    ///
    /// Absent fields are created as empty mappings. A field read right after
    /// its parent was created by the previous read decides that parent's
    /// kind: a numeric field turns it into a sequence. Reading a non-index
    /// field of a sequence creates a detached property that the exported
    /// JSON never shows.
    pub fn get(self, field: &str) -> Access<'s> {
        if field == self.session.options.original_field {
            return Access::Value(self.session.original());
        }
        match self.session.read(self.container, field) {
            Node::Container(id) => Access::View(View::new(self.session, id)),
            Node::Scalar(value) => Access::Value(value),
        }
    }

    /// Like [`View::get`], but the field must hold a container.
    ///
    /// # Errors
    ///
    /// `NotAContainer` if `field` holds a scalar.
    pub fn at(self, field: &str) -> Result<View<'s>, EasySetError> {
        match self.get(field) {
            Access::View(view) => Ok(view),
            Access::Value(_) => Err(EasySetError::not_a_container(field)),
        }
    }

    pub fn index(self, index: usize) -> Result<View<'s>, EasySetError> {
        self.at(&index.to_string())
    }

    /// Intercepted write of `field = value`.
    ///
    /// # Errors
    ///
    /// `InvalidKeyKind` when writing a non-numeric field onto a sequence. The
    /// container is left unchanged.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), EasySetError> {
        self.session.write(self.container, field, value.into())
    }

    pub fn set_index(&mut self, index: usize, value: impl Into<Value>) -> Result<(), EasySetError> {
        self.set(&index.to_string(), value)
    }

    /// Follow `path` with [`View::at`] for every segment.
    pub fn walk<S: AsRef<str>>(self, path: &[S]) -> Result<View<'s>, EasySetError> {
        let mut view = self;
        for field in path {
            view = view.at(field.as_ref())?;
        }
        Ok(view)
    }

    /// Walk to the parent of the last segment and write `value` there.
    ///
    /// # Errors
    ///
    /// `Path(UnexpectedEnd)` for an empty path, otherwise whatever the reads
    /// and the final write report.
    pub fn set_path<S: AsRef<str>>(
        &mut self,
        path: &[S],
        value: impl Into<Value>,
    ) -> Result<(), EasySetError> {
        let Some((last, parents)) = path.split_last() else {
            return Err(PathError::UnexpectedEnd.into());
        };
        let mut parent = self.reborrow().walk(parents)?;
        parent.set(last.as_ref(), value)
    }

    /// [`View::walk`] over a parsed path expression such as `a.b[2]`.
    pub fn at_path(self, expr: &str) -> Result<View<'s>, EasySetError> {
        let path = parse_path(expr)?;
        self.walk(&path)
    }

    /// [`View::set_path`] over a parsed path expression.
    ///
    /// # Example
    ///
    /// ```
    /// use easy_set::wrap;
    /// use serde_json::json;
    ///
    /// let mut session = wrap(json!({})).unwrap();
    /// session.root().assign("b.c[2].b", json!({})).unwrap();
    /// assert_eq!(session.into_value(), json!({"b": {"c": [null, null, {"b": {}}]}}));
    /// ```
    pub fn assign(&mut self, expr: &str, value: impl Into<Value>) -> Result<(), EasySetError> {
        let path = parse_path(expr)?;
        self.set_path(&path, value)
    }
}
