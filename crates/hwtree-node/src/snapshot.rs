//! Serde view of a subtree
//!
//! Unlike markup, a snapshot keeps every attribute with its type. It is an
//! export format only: nothing loads a tree back from it.

use crate::attribute::Attributes;
use crate::node::{Node, NodeId};
use crate::tree::Tree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recursive node snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Class tag
    pub identity: String,
    /// Node name
    pub name: String,
    /// Every attribute, typed
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Kind fields
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    /// Children in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    fn shell(node: &Node) -> Self {
        Self {
            identity: node.identity().to_string(),
            name: node.name().to_string(),
            attributes: node.attributes().clone(),
            fields: node
                .kind()
                .fields()
                .into_iter()
                .map(|(key, text)| (key.to_string(), text))
                .collect(),
            children: Vec::new(),
        }
    }

    /// Number of nodes in the snapshot
    #[must_use]
    pub fn count(&self) -> usize {
        let mut pending = vec![self];
        let mut count = 0;
        while let Some(snapshot) = pending.pop() {
            count += 1;
            pending.extend(&snapshot.children);
        }
        count
    }
}

impl Tree {
    /// Snapshot `id` and its subtree
    #[must_use]
    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.node(id)?;
        // Each frame: snapshot being filled, its node's children, next child
        let mut stack = vec![(NodeSnapshot::shell(node), node.children(), 0)];
        loop {
            let (_, children, next) = stack.last_mut()?;
            if let Some(child) = children.get(*next).copied() {
                *next += 1;
                if let Some(node) = self.node(child) {
                    stack.push((NodeSnapshot::shell(node), node.children(), 0));
                }
                continue;
            }
            let (done, _, _) = stack.pop()?;
            match stack.last_mut() {
                Some((parent, _, _)) => parent.children.push(done),
                None => return Some(done),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::kinds::{Natural, Port, System};
    use crate::platform::NullPlatform;
    use crate::registry::Registry;
    use crate::tree::Tree;
    use std::sync::Arc;

    #[test]
    fn snapshot_keeps_typed_attributes() {
        let mut tree = Tree::new(Arc::new(Registry::with_builtins())).with_platform(NullPlatform);
        let root = tree.spawn(System, "SNES").id();
        tree.set_attribute(root, "revision", 2_u64);
        tree.set_attribute(root, "region", "NTSC");
        let port = tree.append_new::<Port>(root, "Port 1").unwrap();
        tree.append_new::<Natural>(port, "Lines").unwrap();

        let snapshot = tree.snapshot(root).unwrap();
        assert_eq!(snapshot.count(), 3);
        assert_eq!(snapshot.attributes.len(), 2);
        assert_eq!(snapshot.children[0].children[0].fields["value"], "0");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["identity"], "system");
        assert_eq!(json["attributes"]["revision"]["type"], "natural");
        assert_eq!(json["attributes"]["revision"]["value"], 2);
        assert!(json["children"][0].get("attributes").is_none());

        let back: super::NodeSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
