//! Platform notification hooks
//!
//! The front end learns about tree changes through [`Platform`]. Hooks run
//! synchronously, after the structural change has taken effect, and only
//! receive a shared borrow of the affected node: they cannot mutate the tree
//! they are observing.

use crate::node::{Node, NodeId};
use std::fmt::Debug;

/// Receiver of tree notifications
pub trait Platform: Debug {
    /// Called once, right after `node` was inserted under a parent
    fn attach(&mut self, id: NodeId, node: &Node);

    /// Called once, right after `node` was removed from its parent and before
    /// its subtree is torn down
    fn detach(&mut self, id: NodeId, node: &Node);

    /// Message from a debugger tracer node
    fn log(&mut self, _tracer: NodeId, _message: &str) {}
}

/// Platform that reports hooks through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPlatform;

impl Platform for TracingPlatform {
    fn attach(&mut self, id: NodeId, node: &Node) {
        tracing::debug!("attach {} '{}' ({})", node.identity(), node.name(), id);
    }

    fn detach(&mut self, id: NodeId, node: &Node) {
        tracing::debug!("detach {} '{}' ({})", node.identity(), node.name(), id);
    }

    fn log(&mut self, tracer: NodeId, message: &str) {
        tracing::info!("[{}] {}", tracer, message);
    }
}

/// Platform that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlatform;

impl Platform for NullPlatform {
    fn attach(&mut self, _id: NodeId, _node: &Node) {}

    fn detach(&mut self, _id: NodeId, _node: &Node) {}
}
