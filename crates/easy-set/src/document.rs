//! Arena-backed document model.
//!
//! Every container of a session lives in one arena and is addressed by a
//! [`ContainerId`]. A container's kind is the active variant of
//! [`Container`]; reclassifying a mapping as a sequence swaps that variant in
//! place, so every id (and every view holding it) keeps pointing at the same
//! slot.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::EasySetError;
use crate::key::parse_index;

static NEXT_ORIGIN: AtomicU64 = AtomicU64::new(1);

/// Address of a container inside one [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(usize);

impl ContainerId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Mapping,
    Sequence,
}

/// A value stored in a container slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `null`, a boolean, a number or a string.
    Scalar(Value),
    Container(ContainerId),
}

/// Sparse sequence storage.
///
/// Only assigned positions are stored. A position below `len` with no entry
/// is a hole. Fields that are not indices are kept as detached properties:
/// reads and writes see them, the exported array does not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    len: usize,
    items: BTreeMap<usize, Node>,
    properties: IndexMap<String, Node>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn item(&self, idx: usize) -> Option<&Node> {
        self.items.get(&idx)
    }

    /// Assigned positions in ascending order. Holes are skipped.
    pub fn items(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.items.iter().map(|(idx, node)| (*idx, node))
    }

    pub fn property(&self, name: &str) -> Option<&Node> {
        self.properties.get(name)
    }

    pub fn push(&mut self, node: Node) {
        self.insert(self.len, node);
    }

    fn insert(&mut self, idx: usize, node: Node) {
        self.len = self.len.max(idx.saturating_add(1));
        self.items.insert(idx, node);
    }
}

impl FromIterator<Node> for Sequence {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut seq = Sequence::new();
        for node in iter {
            seq.push(node);
        }
        seq
    }
}

/// One level of the nested structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    Mapping(IndexMap<String, Node>),
    Sequence(Sequence),
}

impl Container {
    pub fn mapping() -> Self {
        Container::Mapping(IndexMap::new())
    }

    pub fn sequence() -> Self {
        Container::Sequence(Sequence::new())
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::Mapping(_) => ContainerKind::Mapping,
            Container::Sequence(_) => ContainerKind::Sequence,
        }
    }

    /// Number of entries, or the sequence length including holes.
    pub fn len(&self) -> usize {
        match self {
            Container::Mapping(map) => map.len(),
            Container::Sequence(seq) => seq.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the node stored at `field`, detached sequence properties included.
    pub fn get(&self, field: &str) -> Option<&Node> {
        match self {
            Container::Mapping(map) => map.get(field),
            Container::Sequence(seq) => match parse_index(field) {
                Some(idx) => seq.item(idx),
                None => seq.property(field),
            },
        }
    }

    /// Get the node at `field` as the exported JSON shows it. Holes and
    /// detached properties read as absent.
    pub fn element(&self, field: &str) -> Option<&Node> {
        match self {
            Container::Mapping(map) => map.get(field),
            Container::Sequence(seq) => parse_index(field).and_then(|idx| seq.item(idx)),
        }
    }

    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Store `node` at `field`.
    ///
    /// On a sequence an index extends the length as needed and leaves holes
    /// below it. Any other field becomes a detached property.
    pub fn set(&mut self, field: &str, node: Node) {
        match self {
            Container::Mapping(map) => {
                map.insert(field.to_owned(), node);
            }
            Container::Sequence(seq) => match parse_index(field) {
                Some(idx) => seq.insert(idx, node),
                None => {
                    seq.properties.insert(field.to_owned(), node);
                }
            },
        }
    }
}

/// The container graph of one session.
#[derive(Debug, Clone)]
pub struct Document {
    origin: u64,
    containers: Vec<Container>,
    root: ContainerId,
}

impl Document {
    /// Import a JSON object or array as the root of a new document.
    ///
    /// # Errors
    ///
    /// `NotAContainer` if `root` is a scalar.
    pub fn from_value(root: Value) -> Result<Self, EasySetError> {
        if !matches!(root, Value::Object(_) | Value::Array(_)) {
            return Err(EasySetError::not_a_container(""));
        }
        let mut doc = Self {
            origin: NEXT_ORIGIN.fetch_add(1, Ordering::Relaxed),
            containers: Vec::new(),
            root: ContainerId(0),
        };
        match doc.import(root) {
            Node::Container(id) => doc.root = id,
            Node::Scalar(_) => return Err(EasySetError::not_a_container("")),
        }
        Ok(doc)
    }

    pub fn root(&self) -> ContainerId {
        self.root
    }

    /// Identifies this arena; ids minted by another document never match it.
    pub(crate) fn origin(&self) -> u64 {
        self.origin
    }

    pub fn contains(&self, id: ContainerId) -> bool {
        id.0 < self.containers.len()
    }

    /// Number of containers ever allocated, including unreachable ones.
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// The container `id`, or `None` if this arena never allocated it.
    pub fn get(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(id.0)
    }

    /// Only for ids minted by this document.
    pub(crate) fn container(&self, id: ContainerId) -> &Container {
        &self.containers[id.0]
    }

    pub(crate) fn container_mut(&mut self, id: ContainerId) -> &mut Container {
        &mut self.containers[id.0]
    }

    pub(crate) fn alloc(&mut self, container: Container) -> ContainerId {
        let id = ContainerId(self.containers.len());
        self.containers.push(container);
        id
    }

    /// Import a JSON value, allocating a container for every object and array.
    pub(crate) fn import(&mut self, value: Value) -> Node {
        match value {
            Value::Object(map) => {
                let entries: IndexMap<String, Node> =
                    map.into_iter().map(|(k, v)| (k, self.import(v))).collect();
                Node::Container(self.alloc(Container::Mapping(entries)))
            }
            Value::Array(arr) => {
                let items: Sequence = arr.into_iter().map(|v| self.import(v)).collect();
                Node::Container(self.alloc(Container::Sequence(items)))
            }
            scalar => Node::Scalar(scalar),
        }
    }

    /// Export the container `id` and everything below it. Holes become `null`
    /// and detached sequence properties are left out.
    pub(crate) fn export(&self, id: ContainerId) -> Value {
        match self.container(id) {
            Container::Mapping(map) => Value::Object(
                map.iter()
                    .map(|(k, node)| (k.clone(), self.export_node(node)))
                    .collect(),
            ),
            Container::Sequence(seq) => Value::Array(
                (0..seq.len())
                    .map(|idx| seq.item(idx).map_or(Value::Null, |node| self.export_node(node)))
                    .collect(),
            ),
        }
    }

    pub(crate) fn export_node(&self, node: &Node) -> Value {
        match node {
            Node::Scalar(value) => value.clone(),
            Node::Container(id) => self.export(*id),
        }
    }

    pub fn to_value(&self) -> Value {
        self.export(self.root)
    }

    pub fn into_value(self) -> Value {
        self.to_value()
    }

    /// Read the value at `path` without materializing anything.
    ///
    /// Follows the exported shape: missing fields, holes, detached sequence
    /// properties and paths running through scalars are `None`.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<Value> {
        let Some((last, parents)) = path.split_last() else {
            return Some(self.to_value());
        };
        let mut current = self.root;
        for field in parents {
            match self.container(current).element(field.as_ref())? {
                Node::Container(id) => current = *id,
                Node::Scalar(_) => return None,
            }
        }
        self.container(current)
            .element(last.as_ref())
            .map(|node| self.export_node(node))
    }

    /// Reclassify the container stored at `owner[field]` as a sequence and
    /// return its id.
    ///
    /// A mapping is converted in place: index keys become positions, other
    /// keys become detached properties. A sequence is left as is. Anything
    /// else is replaced by a new empty sequence.
    pub(crate) fn convert_to_sequence(&mut self, owner: ContainerId, field: &str) -> ContainerId {
        let existing = match self.container(owner).get(field) {
            Some(Node::Container(id)) => Some(*id),
            _ => None,
        };

        let Some(id) = existing else {
            let id = self.alloc(Container::sequence());
            self.container_mut(owner).set(field, Node::Container(id));
            tracing::debug!(owner = owner.0, field, container = id.0, "stored new sequence");
            return id;
        };

        let slot = self.container_mut(id);
        if let Container::Mapping(map) = &mut *slot {
            let mut seq = Sequence::new();
            for (key, node) in std::mem::take(map) {
                match parse_index(&key) {
                    Some(idx) => seq.insert(idx, node),
                    None => {
                        seq.properties.insert(key, node);
                    }
                }
            }
            if !seq.properties.is_empty() {
                tracing::warn!(
                    container = id.0,
                    detached = seq.properties.len(),
                    "non-index keys detached while converting mapping to sequence"
                );
            }
            *slot = Container::Sequence(seq);
            tracing::debug!(owner = owner.0, field, container = id.0, "converted mapping to sequence");
        }
        id
    }
}
