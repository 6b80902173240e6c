//! Merging node state between subtrees
//!
//! Copying walks the source subtree, pairs every source child with the first
//! destination child of the same identity and name, and overwrites the
//! destination's attributes and kind fields. Destination structure never
//! changes: unmatched source children are ignored and unmatched destination
//! children are kept.
//!
//! The merge is planned against shared borrows first and applied
//! afterwards, so source and destination may live in the same tree.

use crate::attribute::Attributes;
use crate::node::{Node, NodeId};
use crate::tree::Tree;

/// Persisted state of one node
#[derive(Debug, Clone)]
struct NodeState {
    attributes: Attributes,
    fields: Vec<(&'static str, String)>,
}

impl NodeState {
    fn capture(node: &Node) -> Self {
        Self {
            attributes: node.attributes().clone(),
            fields: node.kind().fields(),
        }
    }
}

fn plan(
    target: &Tree,
    destination: NodeId,
    origin: &Tree,
    source: NodeId,
    steps: &mut Vec<(NodeId, NodeState)>,
) {
    let mut pending = vec![(destination, source)];
    while let Some((destination, source)) = pending.pop() {
        let (Some(_), Some(node)) = (target.node(destination), origin.node(source)) else {
            continue;
        };
        steps.push((destination, NodeState::capture(node)));

        for &child in node.children().iter().rev() {
            let Some(child_node) = origin.node(child) else {
                continue;
            };
            if let Some(matched) = target.find_child(destination, child_node.identity(), child_node.name()) {
                pending.push((matched, child));
            }
        }
    }
}

impl Tree {
    /// Merge `source`'s subtree state into `destination`'s, within this tree
    ///
    /// Returns the number of destination nodes updated.
    pub fn copy(&mut self, destination: NodeId, source: NodeId) -> usize {
        let mut steps = Vec::new();
        plan(&*self, destination, &*self, source, &mut steps);
        self.apply(steps)
    }

    /// Merge a subtree of `other` into `destination`
    ///
    /// Used to apply a configuration parsed into a scratch tree to a live
    /// tree. Returns the number of destination nodes updated.
    pub fn copy_from(&mut self, destination: NodeId, other: &Tree, source: NodeId) -> usize {
        let mut steps = Vec::new();
        plan(&*self, destination, other, source, &mut steps);
        self.apply(steps)
    }

    /// Overwrite `destination`'s state with `source`'s if they are the same
    /// kind of node (identity and name match)
    ///
    /// Children are not visited. Returns `false` without change otherwise.
    pub fn load(&mut self, destination: NodeId, source: NodeId) -> bool {
        let (Some(target), Some(node)) = (self.node(destination), self.node(source)) else {
            return false;
        };
        if !target.matches(node.identity(), node.name()) {
            return false;
        }
        let state = NodeState::capture(node);
        self.apply(vec![(destination, state)]);
        true
    }

    fn apply(&mut self, steps: Vec<(NodeId, NodeState)>) -> usize {
        let count = steps.len();
        for (id, state) in steps {
            self.replace_attributes(id, state.attributes);
            let Some(kind) = self.kind_mut(id) else {
                continue;
            };
            for (key, text) in state.fields {
                if let Err(err) = kind.load_field(key, &text) {
                    tracing::warn!("ignoring field '{}' of {}: {}", key, id, err);
                }
            }
        }
        tracing::debug!("merged state into {} nodes", count);
        count
    }
}

#[cfg(test)]
mod tests {
    use crate::class::Object;
    use crate::kinds::{Boolean, Port, System};
    use crate::platform::NullPlatform;
    use crate::registry::Registry;
    use crate::tree::Tree;
    use std::sync::Arc;

    fn tree() -> Tree {
        Tree::new(Arc::new(Registry::with_builtins())).with_platform(NullPlatform)
    }

    #[test]
    fn copy_replaces_attributes_wholesale() {
        let mut tree = tree();
        let live = tree.spawn(System, "SNES").id();
        tree.set_attribute(live, "stale", "x");
        let config = tree.spawn(System, "SNES").id();
        tree.set_attribute(config, "fresh", "y");

        assert_eq!(tree.copy(live, config), 1);
        assert!(!tree.has_attribute::<String>(live, "stale"));
        assert_eq!(tree.attribute::<String>(live, "fresh"), "y");
    }

    #[test]
    fn copy_never_creates_nodes() {
        let mut tree = tree();
        let live = tree.spawn(System, "SNES").id();
        let kept = tree.append_new::<Port>(live, "Port 1").unwrap();
        let config = tree.spawn(System, "SNES").id();
        let matched = tree.append_new::<Port>(config, "Port 1").unwrap();
        tree.set_attribute(matched, "device", "Gamepad");
        tree.append_new::<Port>(config, "Port 2").unwrap();
        tree.append_new::<Object>(config, "Port 1").unwrap();

        let before = tree.len();
        assert_eq!(tree.copy(live, config), 2);
        assert_eq!(tree.len(), before);
        assert_eq!(tree.children(live), &[kept]);
        assert_eq!(tree.attribute::<String>(kept, "device"), "Gamepad");
    }

    #[test]
    fn copy_from_other_tree_syncs_settings() {
        let mut live = tree();
        let root = live.spawn(System, "SNES").id();
        let turbo = live.append_new::<Boolean>(root, "Turbo").unwrap();

        let mut scratch = tree();
        let text = "node: system\n  name: SNES\n  node: setting.boolean\n    name: Turbo\n    value: true\n    latch: true\n";
        let source = scratch.unserialize(text).unwrap().unwrap();

        assert_eq!(live.copy_from(root, &scratch, source), 2);
        let handle = live.cast::<Boolean>(turbo).unwrap();
        assert!(*live.get(handle).unwrap().latch());
    }

    #[test]
    fn load_requires_matching_node() {
        let mut tree = tree();
        let a = tree.spawn(System, "SNES").id();
        let b = tree.spawn(System, "SNES").id();
        let c = tree.spawn(System, "Genesis").id();
        tree.set_attribute(b, "region", "PAL");
        tree.set_attribute(c, "region", "NTSC");

        assert!(tree.load(a, b));
        assert_eq!(tree.attribute::<String>(a, "region"), "PAL");
        assert!(!tree.load(a, c));
        assert_eq!(tree.attribute::<String>(a, "region"), "PAL");
    }
}
