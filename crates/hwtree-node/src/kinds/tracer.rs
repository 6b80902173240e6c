//! Debugger tracer nodes

use crate::error::NodeError;
use crate::{impl_class, Class, NodeKind};
use std::any::Any;

/// Debugger message channel of one component
///
/// Messages sent through [`Tree::log`](crate::Tree::log) reach the platform
/// only while the tracer is enabled. The component is set by whoever creates
/// the tracer and is not persisted; the enabled flag is.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tracer {
    component: String,
    enabled: bool,
}

impl_class!(Tracer, "debugger.tracer");

impl Tracer {
    /// Create a disabled tracer for `component`
    #[inline]
    #[must_use]
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            enabled: false,
        }
    }

    /// Builder: start enabled
    #[inline]
    #[must_use]
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Component the tracer reports for ("CPU", "APU", ...)
    #[inline]
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// True if messages are forwarded
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn forwarding on or off
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl NodeKind for Tracer {
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
        vec![("enabled", self.enabled.to_string())]
    }

    fn load_field(&mut self, key: &str, text: &str) -> Result<(), NodeError> {
        if key == "enabled" {
            self.enabled = text == "true";
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracer_starts_disabled() {
        let tracer = Tracer::new("CPU");
        assert_eq!(tracer.identity(), "debugger.tracer");
        assert_eq!(tracer.component(), "CPU");
        assert!(!tracer.is_enabled());
        assert!(Tracer::new("CPU").enabled().is_enabled());
    }

    #[test]
    fn tracer_persists_enabled_only() {
        let mut tracer = Tracer::new("CPU").enabled();
        assert_eq!(tracer.fields(), vec![("enabled", "true".to_string())]);

        tracer.load_field("enabled", "false").unwrap();
        assert!(!tracer.is_enabled());
        tracer.load_field("component", "APU").unwrap();
        assert_eq!(tracer.component(), "CPU");
    }
}
