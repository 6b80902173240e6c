//! Testing utilities for hwtree workspace
//!
//! Shared fixture classes, a recording platform and tree builders.

#![allow(missing_docs)]

use hwtree_node::{
    declare_class, impl_class, Boolean, Class, Node, NodeError, NodeId, NodeKind, Peripheral, Platform,
    Port, Registry, System, Tree,
};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

/// Processor fixture persisting its clock as a kind field
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Cpu {
    pub frequency: u64,
}

impl_class!(Cpu, "CPU");

impl NodeKind for Cpu {
    fn identity(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        if self.frequency == 0 {
            return Vec::new();
        }
        vec![("frequency", self.frequency.to_string())]
    }

    fn load_field(&mut self, key: &str, text: &str) -> Result<(), NodeError> {
        if key == "frequency" {
            self.frequency = text.parse().unwrap_or_default();
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Memory;

declare_class!(Memory, "Memory");

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Video;

declare_class!(Video, "Video");

/// Built-in classes plus the fixtures
pub fn fixture_registry() -> Arc<Registry> {
    let mut registry = Registry::with_builtins();
    registry.register::<Cpu>().unwrap();
    registry.register::<Memory>().unwrap();
    registry.register::<Video>().unwrap();
    Arc::new(registry)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    Attach { id: NodeId, identity: String, name: String },
    Detach { id: NodeId, identity: String, name: String },
    Log { tracer: NodeId, message: String },
}

impl HookEvent {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Attach { id, .. } | Self::Detach { id, .. } => *id,
            Self::Log { tracer, .. } => *tracer,
        }
    }

    pub fn is_attach(&self) -> bool {
        matches!(self, Self::Attach { .. })
    }

    pub fn is_detach(&self) -> bool {
        matches!(self, Self::Detach { .. })
    }
}

/// Platform recording every hook; clones share the same log
#[derive(Debug, Default, Clone)]
pub struct RecordingPlatform {
    events: Arc<Mutex<Vec<HookEvent>>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HookEvent> {
        self.events.lock().clone()
    }

    pub fn attached(&self) -> Vec<NodeId> {
        self.events.lock().iter().filter(|e| e.is_attach()).map(HookEvent::id).collect()
    }

    pub fn detached(&self) -> Vec<NodeId> {
        self.events.lock().iter().filter(|e| e.is_detach()).map(HookEvent::id).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Platform for RecordingPlatform {
    fn attach(&mut self, id: NodeId, node: &Node) {
        self.events.lock().push(HookEvent::Attach {
            id,
            identity: node.identity().to_string(),
            name: node.name().to_string(),
        });
    }

    fn detach(&mut self, id: NodeId, node: &Node) {
        self.events.lock().push(HookEvent::Detach {
            id,
            identity: node.identity().to_string(),
            name: node.name().to_string(),
        });
    }

    fn log(&mut self, tracer: NodeId, message: &str) {
        self.events.lock().push(HookEvent::Log {
            tracer,
            message: message.to_string(),
        });
    }
}

/// Empty tree over the fixture registry with a recording platform
pub fn fixture_tree() -> (Tree, RecordingPlatform) {
    let platform = RecordingPlatform::new();
    let tree = Tree::new(fixture_registry()).with_platform(platform.clone());
    (tree, platform)
}

/// Ids of the sample console built by [`console`]
#[derive(Debug, Clone, Copy)]
pub struct Console {
    pub root: NodeId,
    pub cpu: NodeId,
    pub memory: NodeId,
    pub port: NodeId,
    pub gamepad: NodeId,
    pub turbo: NodeId,
    pub video: NodeId,
}

/// Build a small console:
///
/// ```text
/// system "Console"
///   CPU "Main"            (frequency 21477272)
///   Memory "WRAM"         (size "128 KiB")
///   port "Controller Port 1"
///     peripheral "Gamepad"
///       setting.boolean "Turbo"
///   Video "Screen"
/// ```
pub fn console(tree: &mut Tree) -> Console {
    let root = tree.spawn(System, "Console").id();
    tree.set_attribute(root, "region", "NTSC");

    let cpu = tree.insert(Box::new(Cpu { frequency: 21_477_272 }), "Main");
    let cpu = tree.attach_back(root, cpu).unwrap();
    let memory = tree.append_new::<Memory>(root, "WRAM").unwrap();
    tree.set_attribute(memory, "size", "128 KiB");

    let port = tree.insert(Box::new(Port::new("Controller", "Console")), "Controller Port 1");
    let port = tree.attach_back(root, port).unwrap();
    let gamepad = tree.append_new::<Peripheral>(port, "Gamepad").unwrap();
    let turbo = tree.append_new::<Boolean>(gamepad, "Turbo").unwrap();
    let video = tree.append_new::<Video>(root, "Screen").unwrap();

    Console {
        root,
        cpu,
        memory,
        port,
        gamepad,
        turbo,
        video,
    }
}
