//! Structural node classes

use crate::declare_class;

/// Root of one emulated machine
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct System;

declare_class!(System, "system");

/// Device plugged into a port (controller, cartridge, memory card, ...)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Peripheral;

declare_class!(Peripheral, "peripheral");

/// Connection point for peripherals
///
/// Port metadata is configured by the system that creates the port and is
/// not persisted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Port {
    port_type: String,
    family: String,
    hot_swappable: bool,
}

declare_class!(Port, "port");

impl Port {
    /// Create port accepting `port_type` devices of `family`
    #[inline]
    #[must_use]
    pub fn new(port_type: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            port_type: port_type.into(),
            family: family.into(),
            hot_swappable: false,
        }
    }

    /// Kind of device accepted ("Controller", "Cartridge", ...)
    #[inline]
    #[must_use]
    pub fn port_type(&self) -> &str {
        &self.port_type
    }

    /// Set the accepted device kind
    #[inline]
    pub fn set_port_type(&mut self, port_type: impl Into<String>) {
        self.port_type = port_type.into();
    }

    /// System family the port belongs to
    #[inline]
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Set the system family
    #[inline]
    pub fn set_family(&mut self, family: impl Into<String>) {
        self.family = family.into();
    }

    /// True if devices may be swapped while running
    #[inline]
    #[must_use]
    pub fn hot_swappable(&self) -> bool {
        self.hot_swappable
    }

    /// Mark the port hot-swappable
    #[inline]
    pub fn set_hot_swappable(&mut self, hot_swappable: bool) {
        self.hot_swappable = hot_swappable;
    }
}
