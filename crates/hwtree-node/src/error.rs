//! Error types for the node tree
//!
//! Lookups, casts and attribute reads never fail: they return empty
//! results. Errors are reserved for:
//! - Registry misuse (unknown or duplicate classes)
//! - Structurally invalid tree mutations
//! - Setting values that cannot be accepted

use crate::node::NodeId;

/// Main node tree error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// No factory registered for the class tag
    #[error("unknown class: '{0}'")]
    UnknownClass(String),

    /// Class tag registered twice
    #[error("class already registered: '{0}'")]
    DuplicateClass(String),

    /// Factory produced a node whose identity differs from its tag
    #[error("factory for '{tag}' produced a node of class '{identity}'")]
    IdentityMismatch { tag: String, identity: String },

    /// Process-wide registry installed twice
    #[error("class registry already installed")]
    RegistryInstalled,

    /// Process-wide registry requested before installation
    #[error("class registry not installed")]
    RegistryNotInstalled,

    /// Handle refers to a released node
    #[error("stale node handle: {0}")]
    StaleNode(NodeId),

    /// Child already owned by another parent
    #[error("node {child} is already attached to {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    /// Attach would make a node its own ancestor
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },

    /// Rename would give two siblings the same class and name
    #[error("a sibling of {id} already uses the name '{name}'")]
    NameTaken { id: NodeId, name: String },

    /// Markup nests deeper than the configured limit
    #[error("markup nested deeper than {max} levels")]
    TooDeep { max: usize },

    /// Setting value outside the allowed list
    #[error("value '{value}' is not allowed")]
    ValueNotAllowed { value: String },

    /// Setting text that does not parse as the setting's type
    #[error("invalid value '{text}' for {identity}")]
    InvalidSettingValue {
        identity: &'static str,
        text: String,
    },
}

impl NodeError {
    /// Check if error comes from tree structure rather than data
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::StaleNode(_)
                | Self::AlreadyAttached { .. }
                | Self::Cycle { .. }
                | Self::NameTaken { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_error_display() {
        let err = NodeError::UnknownClass("gpu".to_string());
        assert_eq!(err.to_string(), "unknown class: 'gpu'");
    }

    #[test]
    fn node_error_is_structural() {
        assert!(NodeError::TooDeep { max: 4 }.to_string().contains("4 levels"));
        assert!(!NodeError::RegistryInstalled.is_structural());
        assert!(!NodeError::UnknownClass("x".into()).is_structural());
    }
}
