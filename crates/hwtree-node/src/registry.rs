//! Class registry
//!
//! Maps class tags to factories so nodes can be built from markup where
//! only the tag is known.
//!
//! # Initialization
//! Registries are plain values built during startup. A process that wants a
//! shared registry installs one explicitly with [`install`]; nothing is
//! registered behind the caller's back.
//!
//! ```rust
//! use hwtree_node::{Registry, System};
//!
//! let mut registry = Registry::new();
//! registry.register::<System>().unwrap();
//! assert!(registry.contains("system"));
//! assert_eq!(registry.create("system").unwrap().identity(), "system");
//! ```

use crate::class::{construct, Class, NodeKind, Object};
use crate::error::NodeError;
use crate::kinds::{
    Boolean, Integer, Natural, Peripheral, Port, Real, StringSetting, System, Tracer,
};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Zero-argument node factory
pub type Factory = fn() -> Box<dyn NodeKind>;

static GLOBAL: OnceCell<Arc<Registry>> = OnceCell::new();

/// Tag → factory map, in registration order
#[derive(Debug, Default, Clone)]
pub struct Registry {
    classes: IndexMap<String, Factory>,
}

impl Registry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            classes: IndexMap::new(),
        }
    }

    /// Create registry with every built-in class
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    fn register_builtins(&mut self) {
        let builtins: [(&str, Factory); 10] = [
            (Object::IDENTIFIER, construct::<Object>),
            (System::IDENTIFIER, construct::<System>),
            (Peripheral::IDENTIFIER, construct::<Peripheral>),
            (Port::IDENTIFIER, construct::<Port>),
            (Boolean::IDENTIFIER, construct::<Boolean>),
            (Natural::IDENTIFIER, construct::<Natural>),
            (Integer::IDENTIFIER, construct::<Integer>),
            (Real::IDENTIFIER, construct::<Real>),
            (StringSetting::IDENTIFIER, construct::<StringSetting>),
            (Tracer::IDENTIFIER, construct::<Tracer>),
        ];
        for (tag, factory) in builtins {
            self.classes.insert(tag.to_string(), factory);
        }
    }

    /// Register a default-constructible class under its own tag
    ///
    /// # Errors
    /// Returns [`NodeError::DuplicateClass`] if the tag is taken
    pub fn register<T>(&mut self) -> Result<(), NodeError>
    where
        T: Class + NodeKind + Default,
    {
        self.register_with(T::IDENTIFIER, construct::<T>)
    }

    /// Register a factory under `tag`
    ///
    /// The factory is probed once so its product's identity can be checked
    /// against the tag.
    ///
    /// # Errors
    /// - [`NodeError::DuplicateClass`] if the tag is taken
    /// - [`NodeError::IdentityMismatch`] if the factory builds another class
    pub fn register_with(&mut self, tag: &str, factory: Factory) -> Result<(), NodeError> {
        if self.classes.contains_key(tag) {
            return Err(NodeError::DuplicateClass(tag.to_string()));
        }
        let identity = factory().identity();
        if identity != tag {
            return Err(NodeError::IdentityMismatch {
                tag: tag.to_string(),
                identity: identity.to_string(),
            });
        }
        tracing::debug!("registered class '{}'", tag);
        self.classes.insert(tag.to_string(), factory);
        Ok(())
    }

    /// Build a fresh payload for `tag`
    ///
    /// # Errors
    /// Returns [`NodeError::UnknownClass`] if nothing is registered for `tag`
    pub fn create(&self, tag: &str) -> Result<Box<dyn NodeKind>, NodeError> {
        self.classes
            .get(tag)
            .map(|factory| factory())
            .ok_or_else(|| NodeError::UnknownClass(tag.to_string()))
    }

    /// Check if a tag is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.classes.contains_key(tag)
    }

    /// Registered tags in registration order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Number of registered classes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Install the process-wide registry
///
/// Must run once during startup, before any [`global`] lookup.
///
/// # Errors
/// Returns [`NodeError::RegistryInstalled`] on a second call
pub fn install(registry: Registry) -> Result<Arc<Registry>, NodeError> {
    let registry = Arc::new(registry);
    GLOBAL
        .set(Arc::clone(&registry))
        .map_err(|_| NodeError::RegistryInstalled)?;
    tracing::debug!("installed class registry with {} classes", registry.len());
    Ok(registry)
}

/// The installed process-wide registry, if any
#[inline]
#[must_use]
pub fn global() -> Option<Arc<Registry>> {
    GLOBAL.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare_class;

    #[derive(Debug, Default)]
    struct Dsp;

    declare_class!(Dsp, "dsp");

    fn make_system() -> Box<dyn NodeKind> {
        Box::new(System)
    }

    #[test]
    fn registry_new_empty() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_with_builtins() {
        let registry = Registry::with_builtins();
        assert_eq!(registry.len(), 10);
        for tag in ["Object", "system", "peripheral", "port", "setting.boolean", "setting.string"] {
            assert!(registry.contains(tag), "missing {tag}");
        }
        assert_eq!(registry.tags().next(), Some("Object"));
    }

    #[test]
    fn registry_register_and_create() {
        let mut registry = Registry::new();
        registry.register::<Dsp>().unwrap();
        let kind = registry.create("dsp").unwrap();
        assert_eq!(kind.identity(), "dsp");
    }

    #[test]
    fn registry_rejects_duplicate() {
        let mut registry = Registry::new();
        registry.register::<Dsp>().unwrap();
        let result = registry.register::<Dsp>();
        assert_eq!(result, Err(NodeError::DuplicateClass("dsp".to_string())));
    }

    #[test]
    fn registry_rejects_identity_mismatch() {
        let mut registry = Registry::new();
        let result = registry.register_with("console", make_system);
        assert!(matches!(result, Err(NodeError::IdentityMismatch { .. })));
        assert!(!registry.contains("console"));
    }

    #[test]
    fn registry_unknown_tag() {
        let registry = Registry::with_builtins();
        let result = registry.create("gpu");
        assert!(matches!(result, Err(NodeError::UnknownClass(tag)) if tag == "gpu"));
    }
}
