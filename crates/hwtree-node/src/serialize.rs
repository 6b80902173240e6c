//! Structural markup serializer
//!
//! A node is written as a `node` block holding its name, its string-typed
//! attributes, its kind fields and its children, two spaces per level:
//!
//! ```text
//! node: system
//!   name: Super Famicom
//!   attribute
//!     name: region
//!     value: NTSC-J
//!   node: setting.boolean
//!     name: Fast PPU
//!     value: true
//!     latch: true
//! ```
//!
//! Loading recreates nodes through the tree's registry. A child block that
//! duplicates an existing sibling is merged into that sibling.

use crate::attribute::Attributes;
use crate::error::NodeError;
use crate::node::{Node, NodeId};
use crate::tree::Tree;
use hwtree_markup::{Document, Element, Writer};

/// Element holding a node block
pub const NODE: &str = "node";
/// Element holding the node name
pub const NAME: &str = "name";
/// Element holding one attribute
pub const ATTRIBUTE: &str = "attribute";
/// Element holding an attribute value
pub const VALUE: &str = "value";

fn is_reserved(name: &str) -> bool {
    matches!(name, NODE | NAME | ATTRIBUTE)
}

/// Everything of a node block except its children
fn write_header(writer: &mut Writer, node: &Node, depth: usize) {
    writer.line(depth, NODE, node.identity());
    writer.line(depth + 1, NAME, node.name());
    for (name, value) in node.attributes().strings() {
        writer.open(depth + 1, ATTRIBUTE);
        writer.line(depth + 2, NAME, name);
        writer.line(depth + 2, VALUE, value);
    }
    for (key, text) in node.kind().fields() {
        writer.line(depth + 1, key, &text);
    }
}

impl Tree {
    /// Render `id` and its subtree as markup
    ///
    /// Only string-typed attributes are persisted. A released node renders
    /// as the empty string.
    #[must_use]
    pub fn serialize(&self, id: NodeId) -> String {
        let mut writer = Writer::new();
        let mut pending = vec![(id, 0)];
        while let Some((id, depth)) = pending.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            write_header(&mut writer, node, depth);
            pending.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));
        }
        writer.finish()
    }

    /// Same as [`Tree::serialize`]
    #[inline]
    #[must_use]
    pub fn save(&self, id: NodeId) -> String {
        self.serialize(id)
    }

    /// Build a detached subtree from markup
    ///
    /// Returns `Ok(None)` when the text is empty, does not parse, or holds
    /// no top-level `node` block. On error nothing is left in the tree.
    ///
    /// # Errors
    /// - [`NodeError::UnknownClass`] for an unregistered tag, unless the
    ///   tree is configured to skip unknown classes
    /// - [`NodeError::TooDeep`] when nesting exceeds the configured limit
    pub fn unserialize(&mut self, text: &str) -> Result<Option<NodeId>, NodeError> {
        let document = match Document::parse(text) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!("ignoring unparsable markup: {}", err);
                return Ok(None);
            }
        };
        let Some(element) = document.get(NODE) else {
            if !document.is_empty() {
                tracing::warn!("markup has no top-level '{}' block", NODE);
            }
            return Ok(None);
        };

        let kind = match self.registry().create(element.value()) {
            Ok(kind) => kind,
            Err(err) if self.config().skip_unknown_classes => {
                tracing::warn!("skipping root: {}", err);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let root = self.insert(kind, element.text(NAME));
        if let Err(err) = self.build(root, element, 0) {
            self.discard(root);
            return Err(err);
        }
        tracing::debug!("unserialized {} ({} nodes)", root, self.walk(root).count());
        Ok(Some(root))
    }

    fn build(&mut self, id: NodeId, element: &Element, depth: usize) -> Result<(), NodeError> {
        self.apply_block(id, element);

        for block in element.find(NODE) {
            if depth >= self.config().max_depth {
                return Err(NodeError::TooDeep {
                    max: self.config().max_depth,
                });
            }
            let kind = match self.registry().create(block.value()) {
                Ok(kind) => kind,
                Err(err) if self.config().skip_unknown_classes => {
                    tracing::warn!("skipping block: {}", err);
                    continue;
                }
                Err(err) => return Err(err),
            };

            let fresh = self.insert(kind, block.text(NAME));
            let target = match self.attach_back(id, fresh) {
                Ok(target) => target,
                Err(err) => {
                    self.discard(fresh);
                    return Err(err);
                }
            };
            if target != fresh {
                self.discard(fresh);
            }
            self.build(target, block, depth + 1)?;
        }
        Ok(())
    }

    fn apply_block(&mut self, id: NodeId, element: &Element) {
        let attributes: Attributes = element
            .find(ATTRIBUTE)
            .map(|attribute| (attribute.text(NAME), attribute.text(VALUE)))
            .collect();
        self.replace_attributes(id, attributes);

        let Some(kind) = self.kind_mut(id) else {
            return;
        };
        for field in element.children().iter().filter(|child| !is_reserved(child.name())) {
            if let Err(err) = kind.load_field(field.name(), field.value()) {
                tracing::warn!("ignoring field '{}' of {}: {}", field.name(), id, err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::kinds::{Boolean, Port, System};
    use crate::platform::NullPlatform;
    use crate::registry::Registry;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn tree() -> Tree {
        Tree::new(Arc::new(Registry::with_builtins())).with_platform(NullPlatform)
    }

    #[test]
    fn serialize_layout() {
        let mut tree = tree();
        let root = tree.spawn(System, "SNES").id();
        tree.set_attribute(root, "region", "NTSC");
        tree.set_attribute(root, "revision", 2_u64);
        let port = tree.append_new::<Port>(root, "Controller Port 1").unwrap();
        tree.set_attribute(port, "type", "Controller");

        let expected = "\
node: system
  name: SNES
  attribute
    name: region
    value: NTSC
  node: port
    name: Controller Port 1
    attribute
      name: type
      value: Controller
";
        assert_eq!(tree.serialize(root), expected);
        assert_eq!(tree.save(root), expected);
    }

    #[test]
    fn serialize_writes_fields_before_children() {
        let mut tree = tree();
        let root = tree.create("setting.natural", "Lines").unwrap();
        tree.append_new::<Boolean>(root, "Overscan").unwrap();

        let text = tree.serialize(root);
        let value = text.find("  value: 0").unwrap();
        let child = text.find("  node: setting.boolean").unwrap();
        assert!(value < child);
    }

    #[test]
    fn round_trip() {
        let mut tree = tree();
        let root = tree.spawn(System, "SNES").id();
        tree.set_attribute(root, "notes", "line one\nline two");
        let port = tree.append_new::<Port>(root, "Expansion").unwrap();
        tree.set_attribute(port, "slot", "A");

        let text = tree.serialize(root);
        let copy = tree.unserialize(&text).unwrap().unwrap();
        assert_ne!(copy, root);
        assert_eq!(tree.serialize(copy), text);
        assert_eq!(tree.attribute::<String>(copy, "notes"), "line one\nline two");
    }

    #[test]
    fn empty_or_broken_markup_is_none() {
        let mut tree = tree();
        assert_eq!(tree.unserialize(""), Ok(None));
        assert_eq!(tree.unserialize("\tnode: system"), Ok(None));
        assert_eq!(tree.unserialize("system: x"), Ok(None));
        assert!(tree.is_empty());
    }

    #[test]
    fn unknown_class_errors_and_leaves_nothing() {
        let mut tree = tree();
        let text = "node: system\n  name: SNES\n  node: gpu\n    name: PPU\n";
        assert_eq!(tree.unserialize(text), Err(NodeError::UnknownClass("gpu".into())));
        assert!(tree.is_empty());
    }

    #[test]
    fn unknown_class_can_be_skipped() {
        let mut tree = tree().with_config(TreeConfig::default().with_skip_unknown_classes(true));
        let text = "node: system\n  name: SNES\n  node: gpu\n    name: PPU\n  node: port\n    name: P\n";
        let root = tree.unserialize(text).unwrap().unwrap();
        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.unserialize("node: gpu\n"), Ok(None));
    }

    #[test]
    fn nesting_limit() {
        let mut tree = tree().with_config(TreeConfig::default().with_max_depth(1));
        let ok = "node: Object\n  node: Object\n    name: a\n";
        assert!(tree.unserialize(ok).unwrap().is_some());

        let deep = "node: Object\n  node: Object\n    name: a\n    node: Object\n      name: b\n";
        assert_eq!(tree.unserialize(deep), Err(NodeError::TooDeep { max: 1 }));
    }

    #[test]
    fn duplicate_blocks_merge() {
        let mut tree = tree();
        let text = "\
node: system
  name: SNES
  node: port
    name: P
    attribute
      name: a
      value: 1
  node: port
    name: P
    attribute
      name: b
      value: 2
";
        let root = tree.unserialize(text).unwrap().unwrap();
        let children = tree.children(root).to_vec();
        assert_eq!(children.len(), 1);
        assert!(!tree.has_attribute::<String>(children[0], "a"));
        assert_eq!(tree.attribute::<String>(children[0], "b"), "2");
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn setting_fields_round_trip() {
        let mut tree = tree();
        let text = "node: setting.boolean\n  name: Turbo\n  value: true\n  latch: false\n";
        let id = tree.unserialize(text).unwrap().unwrap();
        let handle = tree.cast::<Boolean>(id).unwrap();
        let setting = tree.get(handle).unwrap();
        assert!(*setting.value());
        assert!(!*setting.latch());
        assert_eq!(tree.serialize(id), text);
    }

    #[test]
    fn bad_field_is_skipped() {
        let mut tree = tree();
        let text = "node: setting.natural\n  name: Lines\n  value: many\n";
        let id = tree.unserialize(text).unwrap().unwrap();
        assert!(tree.serialize(id).contains("value: 0"));
    }
}
