//! Cursor state of one interception session.

use crate::document::ContainerId;
use crate::key::is_numeric;

/// The most recent container/field pair touched by a read, and whether that
/// field was absent before the read created it.
///
/// Every read overwrites the whole cursor. Writes only consult it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    last: Option<(ContainerId, String)>,
    created: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, container: ContainerId, field: &str, created: bool) {
        self.last = Some((container, field.to_owned()));
        self.created = created;
    }

    pub fn last_container(&self) -> Option<ContainerId> {
        self.last.as_ref().map(|(id, _)| *id)
    }

    pub fn last_field(&self) -> Option<&str> {
        self.last.as_ref().map(|(_, field)| field.as_str())
    }

    pub fn last_created(&self) -> bool {
        self.created
    }

    /// The slot to reclassify as a sequence before `field` is accessed.
    ///
    /// Only a field the previous read just created qualifies, and only when
    /// the next access uses a numeric field.
    pub fn pending_conversion(&self, field: &str) -> Option<(ContainerId, &str)> {
        if !self.created || !is_numeric(field) {
            return None;
        }
        self.last.as_ref().map(|(id, last)| (*id, last.as_str()))
    }
}
