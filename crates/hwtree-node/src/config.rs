//! Tree configuration
//!
//! Controls how markup is loaded into a [`Tree`](crate::Tree). Loadable from
//! any serde format; the CLI reads it from TOML:
//!
//! ```toml
//! skip_unknown_classes = true
//! max_depth = 32
//! ```

use serde::{Deserialize, Serialize};

/// Default nesting limit for unserialize
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Loading options of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Skip node blocks whose class is not registered instead of failing
    pub skip_unknown_classes: bool,

    /// Deepest node nesting accepted by unserialize
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            skip_unknown_classes: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TreeConfig {
    /// Builder: skip unknown classes
    #[inline]
    #[must_use]
    pub fn with_skip_unknown_classes(mut self, skip: bool) -> Self {
        self.skip_unknown_classes = skip;
        self
    }

    /// Builder: set nesting limit
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
