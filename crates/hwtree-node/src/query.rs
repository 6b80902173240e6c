//! Casts and typed queries
//!
//! Every collecting query is built on [`Tree::walk`], a pre-order traversal
//! (node first, then children in insertion order), so `find_all`,
//! `enumerate` and `find_nth` always agree on order.
//!
//! # Matching rules
//! - Casts and collection use [`Class::accepts`], so abstract classes like
//!   [`Object`](crate::Object) match polymorphically
//! - Path lookup and name scans compare `identity()` to
//!   [`Class::IDENTIFIER`] exactly
//!
//! # Example
//! ```rust
//! use hwtree_node::{Port, Registry, System, Tree};
//! use std::sync::Arc;
//!
//! let mut tree = Tree::new(Arc::new(Registry::with_builtins()));
//! let root = tree.spawn(System, "SNES").id();
//! let port = tree.append_new::<Port>(root, "Controller Port 1").unwrap();
//!
//! assert_eq!(tree.find_all::<Port>(root).len(), 1);
//! assert_eq!(tree.find_by_path::<Port>(root, "Controller Port 1").map(|h| h.id()), Some(port));
//! ```

use crate::class::Class;
use crate::node::{Handle, Node, NodeId};
use crate::path::NodePath;
use crate::tree::Tree;

/// Pre-order traversal over a subtree
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

impl Tree {
    /// Iterate `root` and its descendants in pre-order
    ///
    /// A released `root` yields nothing.
    #[must_use]
    pub fn walk(&self, root: NodeId) -> PreOrder<'_> {
        let stack = if self.contains(root) { vec![root] } else { Vec::new() };
        PreOrder { tree: self, stack }
    }

    /// Collect nodes of the subtree matching `predicate`, in pre-order
    pub fn collect<F>(&self, root: NodeId, mut predicate: F) -> Vec<NodeId>
    where
        F: FnMut(&Node) -> bool,
    {
        self.walk(root)
            .filter(|&id| self.node(id).is_some_and(&mut predicate))
            .collect()
    }

    // ------------------------------------------------------------------
    // Casts
    // ------------------------------------------------------------------

    /// Typed handle to `id` if its payload belongs to class `T`
    #[must_use]
    pub fn cast<T: Class>(&self, id: NodeId) -> Option<Handle<T>> {
        let node = self.node(id)?;
        T::accepts(node.kind()).then(|| Handle::new(id))
    }

    /// True if `id` belongs to class `T`
    #[inline]
    #[must_use]
    pub fn is<T: Class>(&self, id: NodeId) -> bool {
        self.cast::<T>(id).is_some()
    }

    /// Borrow the payload behind a handle
    #[must_use]
    pub fn get<T: Class>(&self, handle: Handle<T>) -> Option<&T::View> {
        self.node(handle.id()).and_then(|node| T::view(node.kind()))
    }

    /// Mutably borrow the payload behind a handle
    pub fn get_mut<T: Class>(&mut self, handle: Handle<T>) -> Option<&mut T::View> {
        self.node_mut(handle.id())
            .and_then(|node| T::view_mut(node.kind.as_mut()))
    }

    // ------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------

    /// Lazily yield every node of class `T` in the subtree, in pre-order
    pub fn enumerate<T: Class>(&self, root: NodeId) -> impl Iterator<Item = Handle<T>> + '_ {
        self.walk(root).filter_map(|id| self.cast::<T>(id))
    }

    /// Every node of class `T` in the subtree, in pre-order
    #[must_use]
    pub fn find_all<T: Class>(&self, root: NodeId) -> Vec<Handle<T>> {
        self.enumerate::<T>(root).collect()
    }

    /// `index`-th node of class `T` in pre-order
    #[must_use]
    pub fn find_nth<T: Class>(&self, root: NodeId, index: usize) -> Option<Handle<T>> {
        self.enumerate::<T>(root).nth(index)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Resolve a `/`-separated name path below `root` to a `T`
    ///
    /// Intermediate segments descend into the first child with that name,
    /// whatever its class. The last segment must name a child whose identity
    /// is exactly `T::IDENTIFIER`.
    #[must_use]
    pub fn find_by_path<T: Class>(&self, root: NodeId, path: &str) -> Option<Handle<T>> {
        self.find_by_path_tagged(root, path, T::IDENTIFIER)
            .and_then(|id| self.cast::<T>(id))
    }

    /// [`Tree::find_by_path`] with the class given as a tag
    #[must_use]
    pub fn find_by_path_tagged(&self, root: NodeId, path: &str, identity: &str) -> Option<NodeId> {
        self.resolve(root, &NodePath::parse(path), identity)
    }

    /// Resolve an already-split path; the empty path never resolves
    #[must_use]
    pub fn resolve(&self, root: NodeId, path: &NodePath, identity: &str) -> Option<NodeId> {
        let (last, intermediate) = path.segments().split_last()?;
        let mut current = root;
        for segment in intermediate {
            current = self.child_named(current, segment)?;
        }
        self.find_child(current, identity, last)
    }

    fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.node(child).is_some_and(|node| node.name() == name))
    }

    /// First descendant of `root` that is a `T` named `name`
    ///
    /// Pre-order over descendants: `root` itself is never a candidate.
    #[must_use]
    pub fn scan_by_name<T: Class>(&self, root: NodeId, name: &str) -> Option<Handle<T>> {
        self.scan_by_name_tagged(root, name, T::IDENTIFIER)
            .and_then(|id| self.cast::<T>(id))
    }

    /// [`Tree::scan_by_name`] with the class given as a tag
    #[must_use]
    pub fn scan_by_name_tagged(&self, root: NodeId, name: &str, identity: &str) -> Option<NodeId> {
        self.walk(root)
            .skip(1)
            .find(|&id| self.node(id).is_some_and(|node| node.matches(identity, name)))
    }

    /// Topmost ancestor of `id` (itself for roots)
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.node(id).map(|_| id)?;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    /// Name path from the root of `id`'s tree down to `id`
    ///
    /// The root contributes no segment, so a root's path is empty.
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> Option<NodePath> {
        let mut segments = Vec::new();
        let mut node = self.node(id)?;
        while let Some(parent) = node.parent() {
            segments.push(node.name().to_string());
            node = self.node(parent)?;
        }
        segments.reverse();
        Some(NodePath::new(segments))
    }
}
