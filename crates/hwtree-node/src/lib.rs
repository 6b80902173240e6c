//! Hardware component node tree
//!
//! Every emulated system, port, peripheral and setting is a node in a typed,
//! introspectable tree that persists to markup.
//!
//! # Core Concepts
//!
//! - [`Tree`]: arena owning every node; all structural changes go through it
//! - [`NodeKind`]: run-time payload of a node, reporting its identity
//! - [`Class`]: compile-time descriptor used for casts and typed queries
//! - [`Registry`]: tag → factory map used to rebuild nodes from markup
//! - [`Attributes`]: name-ordered scalar values; falsy values are absent
//! - [`Platform`]: receiver of attach/detach notifications
//!
//! # Example
//!
//! ```rust
//! use hwtree_node::{Boolean, Port, Registry, System, Tree};
//! use std::sync::Arc;
//!
//! let mut tree = Tree::new(Arc::new(Registry::with_builtins()));
//! let root = tree.spawn(System, "Super Famicom").id();
//! let port = tree.append_new::<Port>(root, "Controller Port 1").unwrap();
//! tree.append_new::<Boolean>(port, "Turbo").unwrap();
//! tree.set_attribute(root, "region", "NTSC-J");
//!
//! let text = tree.serialize(root);
//! let copy = tree.unserialize(&text).unwrap().unwrap();
//! assert_eq!(tree.serialize(copy), text);
//! assert!(tree.find_by_path::<Boolean>(copy, "Controller Port 1/Turbo").is_some());
//! ```

#![warn(missing_docs)]

mod attribute;
mod class;
mod config;
mod copy;
mod error;
pub mod kinds;
mod node;
mod pak;
mod path;
mod platform;
mod query;
pub mod registry;
mod serialize;
mod snapshot;
mod tree;

pub use attribute::{Attributes, FromValue, Value};
pub use class::{Class, NodeKind, Object};
pub use config::{TreeConfig, DEFAULT_MAX_DEPTH};
pub use error::NodeError;
pub use kinds::{
    AnySetting, Boolean, Integer, Natural, Peripheral, Port, Real, Setting, SettingNode,
    SettingType, StringSetting, System, Tracer,
};
pub use node::{Handle, Node, NodeId};
pub use pak::Pak;
pub use path::{NodePath, SEPARATOR};
pub use platform::{NullPlatform, Platform, TracingPlatform};
pub use query::PreOrder;
pub use registry::{Factory, Registry};
pub use serialize::{ATTRIBUTE, NAME, NODE, VALUE};
pub use snapshot::NodeSnapshot;
pub use tree::Tree;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
