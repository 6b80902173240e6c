//! Node storage types
//!
//! Provides [`NodeId`] (a generation-checked arena index), [`Handle`] (a
//! node id proven to satisfy a class) and [`Node`] (the stored record).

use crate::attribute::Attributes;
use crate::class::NodeKind;
use crate::pak::Pak;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Arena index of a node
///
/// Ids of released nodes never resolve again: the slot's generation is
/// bumped on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Node id checked against class `T` when it was produced
///
/// Handles are produced by casts and queries. They are plain ids: a handle
/// to a node released later simply resolves to nothing.
pub struct Handle<T> {
    id: NodeId,
    _class: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    #[inline]
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            _class: PhantomData,
        }
    }

    /// Untyped id
    #[inline]
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> Debug for Handle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Handle<{}>({})", std::any::type_name::<T>(), self.id)
    }
}

impl<T> From<Handle<T>> for NodeId {
    fn from(handle: Handle<T>) -> Self {
        handle.id
    }
}

/// Stored node record
///
/// Structure (parent and children) is only changed through
/// [`Tree`](crate::Tree) so links stay consistent.
#[derive(Debug)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attributes: Attributes,
    pub(crate) pak: Option<Pak>,
    pub(crate) kind: Box<dyn NodeKind>,
}

impl Node {
    pub(crate) fn new(kind: Box<dyn NodeKind>, name: String) -> Self {
        Self {
            name,
            parent: None,
            children: Vec::new(),
            attributes: Attributes::new(),
            pak: None,
            kind,
        }
    }

    /// Node name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class tag of the payload
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &'static str {
        self.kind.identity()
    }

    /// Owning parent, `None` for roots
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Attribute store
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Backing-store handle
    #[inline]
    #[must_use]
    pub fn pak(&self) -> Option<&Pak> {
        self.pak.as_ref()
    }

    /// Payload
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &dyn NodeKind {
        self.kind.as_ref()
    }

    /// True if identity and name both match
    #[inline]
    #[must_use]
    pub fn matches(&self, identity: &str, name: &str) -> bool {
        self.identity() == identity && self.name == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::Object;

    #[test]
    fn node_id_display() {
        let id = NodeId {
            index: 3,
            generation: 1,
        };
        assert_eq!(id.to_string(), "#3v1");
    }

    #[test]
    fn handle_is_copy_and_compares_by_id() {
        let id = NodeId {
            index: 0,
            generation: 0,
        };
        let a: Handle<Object> = Handle::new(id);
        let b = a;
        assert_eq!(a, b);
        assert_eq!(NodeId::from(b), id);
        assert!(format!("{a:?}").contains("Object"));
    }

    #[test]
    fn new_node_is_detached() {
        let node = Node::new(Box::new(Object), "bus".to_string());
        assert_eq!(node.name(), "bus");
        assert_eq!(node.identity(), "Object");
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
        assert!(node.matches("Object", "bus"));
        assert!(!node.matches("Object", "cpu"));
    }
}
