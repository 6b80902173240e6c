//! Command implementations
//!
//! Each command returns its output as text so `main` only prints.

use anyhow::{anyhow, Context, Result};
use hwtree_node::{NodeId, Registry, Tree, TreeConfig};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Read loading options from a TOML file
pub(crate) fn read_config(path: &Path) -> Result<TreeConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// Session state shared by every command
pub(crate) struct Session {
    registry: Arc<Registry>,
    config: TreeConfig,
}

impl Session {
    pub(crate) fn new(registry: Arc<Registry>, config: TreeConfig) -> Self {
        Self { registry, config }
    }

    fn tree(&self) -> Tree {
        Tree::new(Arc::clone(&self.registry)).with_config(self.config)
    }

    fn load(&self, tree: &mut Tree, path: &Path) -> Result<NodeId> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.load_text(tree, &text)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    fn load_text(&self, tree: &mut Tree, text: &str) -> Result<NodeId> {
        tree.unserialize(text)?
            .ok_or_else(|| anyhow!("no node markup found"))
    }

    /// Normalized markup of the file
    pub(crate) fn print(&self, path: &Path) -> Result<String> {
        let mut tree = self.tree();
        let root = self.load(&mut tree, path)?;
        Ok(tree.serialize(root))
    }

    /// Snapshot of the file as pretty JSON
    pub(crate) fn json(&self, path: &Path) -> Result<String> {
        let mut tree = self.tree();
        let root = self.load(&mut tree, path)?;
        let snapshot = tree
            .snapshot(root)
            .ok_or_else(|| anyhow!("root vanished while loading"))?;
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Markup of the node at `node_path` with class `class`
    pub(crate) fn find(&self, path: &Path, node_path: &str, class: &str) -> Result<String> {
        let mut tree = self.tree();
        let root = self.load(&mut tree, path)?;
        let id = tree
            .find_by_path_tagged(root, node_path, class)
            .ok_or_else(|| anyhow!("no {class} at '{node_path}'"))?;
        Ok(tree.serialize(id))
    }

    /// Path of the first descendant of class `class` named `name`
    pub(crate) fn scan(&self, path: &Path, name: &str, class: &str) -> Result<String> {
        let mut tree = self.tree();
        let root = self.load(&mut tree, path)?;
        let id = tree
            .scan_by_name_tagged(root, name, class)
            .ok_or_else(|| anyhow!("no {class} named '{name}'"))?;
        Ok(describe(&tree, id))
    }

    /// One line per node, optionally restricted to one class
    pub(crate) fn list(&self, path: &Path, class: Option<&str>) -> Result<String> {
        let mut tree = self.tree();
        let root = self.load(&mut tree, path)?;
        let ids = tree.collect(root, |node| class.map_or(true, |class| node.identity() == class));
        let mut output = String::new();
        for id in ids {
            writeln!(output, "{}", describe(&tree, id))?;
        }
        Ok(output)
    }

    /// Live markup with the config file's state merged in
    pub(crate) fn merge(&self, live: &Path, config: &Path) -> Result<String> {
        let mut tree = self.tree();
        let root = self.load(&mut tree, live)?;
        let mut scratch = self.tree();
        let source = self.load(&mut scratch, config)?;

        let merged = tree.copy_from(root, &scratch, source);
        tracing::info!("merged {} nodes from {}", merged, config.display());
        Ok(tree.serialize(root))
    }

    /// Registered class tags
    pub(crate) fn classes(&self) -> String {
        let mut output = String::new();
        for tag in self.registry.tags() {
            output.push_str(tag);
            output.push('\n');
        }
        output
    }
}

fn describe(tree: &Tree, id: NodeId) -> String {
    let identity = tree.node(id).map_or("?", |node| node.identity());
    let path = tree.path_of(id).map(|path| path.to_string()).unwrap_or_default();
    if path.is_empty() {
        format!("{identity} /")
    } else {
        format!("{identity} /{path}")
    }
}
