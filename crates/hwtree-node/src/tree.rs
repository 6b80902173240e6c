//! Node arena and tree mutation
//!
//! [`Tree`] owns every node. Children lists hold [`NodeId`]s and the parent
//! link is an index back-reference, so ownership is strictly top-down and
//! dropping the tree drops every node.
//!
//! # Structural rules
//! - A node has at most one parent and is never its own ancestor
//! - Siblings are unique by (identity, name): attaching a duplicate returns
//!   the existing child and leaves the tree unchanged
//! - Detaching a node releases its whole subtree; the detached node itself
//!   stays alive as a root until [`Tree::destroy`]
//!
//! Every attach and detach is reported to the tree's [`Platform`] exactly
//! once, after the change took effect.

use crate::attribute::{Attributes, FromValue, Value};
use crate::class::{Class, NodeKind};
use crate::config::TreeConfig;
use crate::error::NodeError;
use crate::kinds::Tracer;
use crate::node::{Handle, Node, NodeId};
use crate::pak::Pak;
use crate::platform::{Platform, TracingPlatform};
use crate::registry::{self, Registry};
use std::fmt::Display;
use std::sync::Arc;

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena owning a forest of nodes
#[derive(Debug)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    registry: Arc<Registry>,
    platform: Box<dyn Platform>,
    config: TreeConfig,
}

fn lookup(slots: &[Slot], id: NodeId) -> Option<&Node> {
    slots
        .get(id.index as usize)
        .filter(|slot| slot.generation == id.generation)
        .and_then(|slot| slot.node.as_ref())
}

impl Tree {
    /// Create empty tree building nodes from `registry`
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            registry,
            platform: Box::new(TracingPlatform),
            config: TreeConfig::default(),
        }
    }

    /// Create empty tree on the installed process-wide registry
    ///
    /// # Errors
    /// Returns [`NodeError::RegistryNotInstalled`] before [`registry::install`]
    pub fn from_global() -> Result<Self, NodeError> {
        registry::global()
            .map(Self::new)
            .ok_or(NodeError::RegistryNotInstalled)
    }

    /// Builder: replace the platform receiving hooks
    #[must_use]
    pub fn with_platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Box::new(platform);
        self
    }

    /// Builder: replace the loading options
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    /// Class registry used by [`Tree::create`] and unserialize
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Loading options
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a detached node of the class registered under `tag`
    ///
    /// # Errors
    /// Returns [`NodeError::UnknownClass`] if `tag` is not registered
    pub fn create(&mut self, tag: &str, name: impl Into<String>) -> Result<NodeId, NodeError> {
        let kind = self.registry.create(tag)?;
        Ok(self.insert(kind, name))
    }

    /// Store an already-built payload as a detached node
    pub fn insert(&mut self, kind: Box<dyn NodeKind>, name: impl Into<String>) -> NodeId {
        let node = Node::new(kind, name.into());
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        // Arena size is bounded by u32 ids.
        #[allow(clippy::cast_possible_truncation)]
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Store a payload of known class as a detached node
    pub fn spawn<T>(&mut self, kind: T, name: impl Into<String>) -> Handle<T>
    where
        T: Class + NodeKind,
    {
        Handle::new(self.insert(Box::new(kind), name))
    }

    /// Create a `T` and attach it at the back of `parent`
    ///
    /// When `parent` already has a `T` named `name`, that node is returned
    /// and nothing is created.
    ///
    /// # Errors
    /// Returns [`NodeError::StaleNode`] if `parent` was released
    pub fn append_new<T>(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, NodeError>
    where
        T: Class + NodeKind + Default,
    {
        self.attach_new::<T>(parent, name.into(), false)
    }

    /// Create a `T` and attach it at the front of `parent`
    ///
    /// # Errors
    /// Returns [`NodeError::StaleNode`] if `parent` was released
    pub fn prepend_new<T>(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, NodeError>
    where
        T: Class + NodeKind + Default,
    {
        self.attach_new::<T>(parent, name.into(), true)
    }

    fn attach_new<T>(&mut self, parent: NodeId, name: String, front: bool) -> Result<NodeId, NodeError>
    where
        T: Class + NodeKind + Default,
    {
        if !self.contains(parent) {
            return Err(NodeError::StaleNode(parent));
        }
        if let Some(existing) = self.find_child(parent, T::IDENTIFIER, &name) {
            return Ok(existing);
        }
        let child = self.insert(Box::new(T::default()), name);
        self.attach(parent, child, front)
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    /// Borrow a live node
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        lookup(&self.slots, id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn live_mut(&mut self, id: NodeId) -> Result<&mut Node, NodeError> {
        self.node_mut(id).ok_or(NodeError::StaleNode(id))
    }

    /// True if `id` refers to a live node
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Mutably borrow a node's payload
    pub fn kind_mut(&mut self, id: NodeId) -> Option<&mut dyn NodeKind> {
        self.node_mut(id).map(|node| node.kind.as_mut())
    }

    /// Rename a node
    ///
    /// # Errors
    /// - [`NodeError::StaleNode`] if `id` was released
    /// - [`NodeError::NameTaken`] if a sibling of the same class already
    ///   uses `name`
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), NodeError> {
        let name = name.into();
        let node = self.node(id).ok_or(NodeError::StaleNode(id))?;
        let taken = node
            .parent
            .and_then(|parent| self.find_child(parent, node.identity(), &name))
            .is_some_and(|sibling| sibling != id);
        if taken {
            return Err(NodeError::NameTaken { id, name });
        }
        self.live_mut(id)?.name = name;
        Ok(())
    }

    /// Number of live nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// True if no node is alive
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live nodes without a parent, in creation slot order
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let node = slot.node.as_ref()?;
                #[allow(clippy::cast_possible_truncation)]
                let id = NodeId {
                    index: index as u32,
                    generation: slot.generation,
                };
                node.parent.is_none().then_some(id)
            })
            .collect()
    }

    /// Parent of a node
    #[inline]
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// Children of a node in insertion order (empty when released)
    #[inline]
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or_default()
    }

    /// First direct child of `parent` with this identity and name
    #[must_use]
    pub fn find_child(&self, parent: NodeId, identity: &str, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.node(child).is_some_and(|node| node.matches(identity, name)))
    }

    /// True if `ancestor` is a proper ancestor of `id`
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Insert `child` as the first child of `parent`
    ///
    /// Returns the node now in the tree: `child`, or the existing sibling
    /// with the same identity and name.
    ///
    /// # Errors
    /// - [`NodeError::StaleNode`] if either id was released
    /// - [`NodeError::AlreadyAttached`] if `child` has another parent
    /// - [`NodeError::Cycle`] if `child` is `parent` or one of its ancestors
    pub fn attach_front(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, NodeError> {
        self.attach(parent, child, true)
    }

    /// Insert `child` as the last child of `parent`
    ///
    /// # Errors
    /// Same as [`Tree::attach_front`]
    pub fn attach_back(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, NodeError> {
        self.attach(parent, child, false)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, front: bool) -> Result<NodeId, NodeError> {
        if !self.contains(parent) {
            return Err(NodeError::StaleNode(parent));
        }
        let node = self.node(child).ok_or(NodeError::StaleNode(child))?;
        if let Some(existing) = self.find_child(parent, node.identity(), node.name()) {
            return Ok(existing);
        }
        if let Some(owner) = node.parent {
            return Err(NodeError::AlreadyAttached { child, parent: owner });
        }
        // A childless node cannot be above `parent`
        let branch = !node.children.is_empty();
        if child == parent || (branch && self.is_ancestor(child, parent)) {
            return Err(NodeError::Cycle { child, parent });
        }

        self.live_mut(child)?.parent = Some(parent);
        let siblings = &mut self.live_mut(parent)?.children;
        if front {
            siblings.insert(0, child);
        } else {
            siblings.push(child);
        }
        tracing::trace!("attached {} under {}", child, parent);

        if let Some(node) = lookup(&self.slots, child) {
            self.platform.attach(child, node);
        }
        Ok(child)
    }

    /// Remove `child` from `parent` and release its subtree
    ///
    /// `child` itself stays alive as a root. Returns `false` without change
    /// if `child` is not a direct child of `parent`.
    pub fn detach(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(parent_node) = self.node_mut(parent) else {
            return false;
        };
        let Some(position) = parent_node.children.iter().position(|&id| id == child) else {
            return false;
        };
        parent_node.children.remove(position);
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
        tracing::trace!("detached {} from {}", child, parent);

        if let Some(node) = lookup(&self.slots, child) {
            self.platform.detach(child, node);
        }
        self.clear(child);
        true
    }

    /// Detach and release every descendant of `id`
    ///
    /// Descendants are notified in pre-order: each node sees its detach hook
    /// while its own children are still attached.
    pub fn clear(&mut self, id: NodeId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let mut pending = std::mem::take(&mut node.children);
        pending.reverse();

        while let Some(child) = pending.pop() {
            if let Some(node) = self.node_mut(child) {
                node.parent = None;
            }
            if let Some(node) = lookup(&self.slots, child) {
                self.platform.detach(child, node);
            }
            if let Some(node) = self.node_mut(child) {
                pending.extend(std::mem::take(&mut node.children).into_iter().rev());
            }
            self.release(child);
        }
    }

    /// Detach `id` from its parent, clear it and release it
    ///
    /// Returns `false` if `id` was already released.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.node(id).map(Node::parent) else {
            return false;
        };
        match parent {
            Some(parent) => {
                self.detach(parent, id);
            }
            None => self.clear(id),
        }
        self.release(id);
        tracing::trace!("destroyed {}", id);
        true
    }

    fn release(&mut self, id: NodeId) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    /// Release a detached node that was never attached, without hooks
    pub(crate) fn discard(&mut self, id: NodeId) {
        self.clear(id);
        self.release(id);
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Attribute store of a node
    #[inline]
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> Option<&Attributes> {
        self.node(id).map(Node::attributes)
    }

    pub(crate) fn replace_attributes(&mut self, id: NodeId, attributes: Attributes) {
        if let Some(node) = self.node_mut(id) {
            node.attributes = attributes;
        }
    }

    /// Read attribute `name` as `T`, or `T::default()`
    #[must_use]
    pub fn attribute<T: FromValue>(&self, id: NodeId, name: &str) -> T {
        self.node(id)
            .map(|node| node.attributes.get::<T>(name))
            .unwrap_or_default()
    }

    /// True if attribute `name` exists and holds a `T`
    #[must_use]
    pub fn has_attribute<T: FromValue>(&self, id: NodeId, name: &str) -> bool {
        self.node(id).is_some_and(|node| node.attributes.has::<T>(name))
    }

    /// Set attribute `name`; a falsy value removes it
    ///
    /// Returns `false` if the node was released.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<Value>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.attributes.set(name, value);
                true
            }
            None => false,
        }
    }

    /// Set attribute `name` to the canonical string form of `value`
    pub fn set_attribute_string(&mut self, id: NodeId, name: &str, value: impl Display) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.attributes.set_string(name, value);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Backing store and tracing
    // ------------------------------------------------------------------

    /// Backing-store handle of a node
    #[must_use]
    pub fn pak(&self, id: NodeId) -> Option<Pak> {
        self.node(id).and_then(|node| node.pak.clone())
    }

    /// Replace the backing-store handle; `true` iff a handle was given
    pub fn set_pak(&mut self, id: NodeId, pak: Option<Pak>) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let given = pak.is_some();
        node.pak = pak;
        given
    }

    /// Forward a tracer message to the platform
    ///
    /// Returns `false` without forwarding if the tracer is released or
    /// disabled.
    pub fn log(&mut self, tracer: Handle<Tracer>, message: &str) -> bool {
        if !self.get(tracer).is_some_and(Tracer::is_enabled) {
            return false;
        }
        self.platform.log(tracer.id(), message);
        true
    }
}
