//! Setting node family
//!
//! A setting holds a `value` the user edits and a `latch`, the value the
//! running system actually uses. Dynamic settings latch on every write;
//! others latch when the owner calls [`SettingNode::set_latch`] (typically on
//! power cycle).
//!
//! Both are persisted as fields of the node's markup block:
//!
//! ```text
//! node: setting.boolean
//!   name: Fast Boot
//!   value: true
//!   latch: false
//! ```

use crate::class::{Class, NodeKind};
use crate::error::NodeError;
use std::any::Any;
use std::fmt::Debug;

/// Scalar type a setting can hold
pub trait SettingType: Clone + PartialEq + Debug + Default + Send + Sync + 'static {
    /// Class tag of `SettingNode<Self>`
    const IDENTIFIER: &'static str;

    /// Parse canonical text
    fn parse(text: &str) -> Option<Self>;

    /// Canonical text
    fn render(&self) -> String;
}

impl SettingType for bool {
    const IDENTIFIER: &'static str = "setting.boolean";

    fn parse(text: &str) -> Option<Self> {
        match text {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl SettingType for u64 {
    const IDENTIFIER: &'static str = "setting.natural";

    fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl SettingType for i64 {
    const IDENTIFIER: &'static str = "setting.integer";

    fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl SettingType for f64 {
    const IDENTIFIER: &'static str = "setting.real";

    fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl SettingType for String {
    const IDENTIFIER: &'static str = "setting.string";

    fn parse(text: &str) -> Option<Self> {
        Some(text.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

/// Type-erased view of any setting
pub trait Setting: Debug + 'static {
    /// Current value as text
    fn read_value(&self) -> String;

    /// Latched value as text
    fn read_latch(&self) -> String;

    /// Allowed values as text (empty when unrestricted)
    fn read_allowed_values(&self) -> Vec<String>;

    /// Parse and store a new value
    ///
    /// # Errors
    /// - [`NodeError::InvalidSettingValue`] if the text does not parse
    /// - [`NodeError::ValueNotAllowed`] if the value is not in the allowed list
    fn write_value(&mut self, text: &str) -> Result<(), NodeError>;

    /// Copy the value into the latch
    fn set_latch(&mut self);

    /// True if every write latches immediately
    fn is_dynamic(&self) -> bool;
}

/// Setting node holding a `T`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingNode<T: SettingType> {
    value: T,
    latch: T,
    allowed: Vec<T>,
    dynamic: bool,
}

/// `true`/`false` setting
pub type Boolean = SettingNode<bool>;
/// Unsigned setting
pub type Natural = SettingNode<u64>;
/// Signed setting
pub type Integer = SettingNode<i64>;
/// Floating point setting
pub type Real = SettingNode<f64>;
/// Text setting
pub type StringSetting = SettingNode<String>;

impl<T: SettingType> SettingNode<T> {
    /// Create setting with value and latch both set to `value`
    #[inline]
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            latch: value.clone(),
            value,
            allowed: Vec::new(),
            dynamic: false,
        }
    }

    /// Builder: restrict the accepted values
    #[inline]
    #[must_use]
    pub fn with_allowed_values(mut self, allowed: Vec<T>) -> Self {
        self.allowed = allowed;
        self
    }

    /// Builder: latch on every write
    #[inline]
    #[must_use]
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// Current value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Latched value
    #[inline]
    #[must_use]
    pub fn latch(&self) -> &T {
        &self.latch
    }

    /// Accepted values (empty when unrestricted)
    #[inline]
    #[must_use]
    pub fn allowed_values(&self) -> &[T] {
        &self.allowed
    }

    /// Replace the accepted values
    #[inline]
    pub fn set_allowed_values(&mut self, allowed: Vec<T>) {
        self.allowed = allowed;
    }

    /// Switch immediate latching on or off
    #[inline]
    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dynamic = dynamic;
    }

    /// Store a new value, latching it when dynamic
    ///
    /// # Errors
    /// Returns [`NodeError::ValueNotAllowed`] if an allowed list is set and
    /// does not contain `value`
    pub fn set_value(&mut self, value: T) -> Result<(), NodeError> {
        if !self.allowed.is_empty() && !self.allowed.contains(&value) {
            return Err(NodeError::ValueNotAllowed {
                value: value.render(),
            });
        }
        self.value = value;
        if self.dynamic {
            self.set_latch();
        }
        Ok(())
    }

    /// Copy the value into the latch
    #[inline]
    pub fn set_latch(&mut self) {
        self.latch = self.value.clone();
    }

    fn parse(text: &str) -> Result<T, NodeError> {
        T::parse(text).ok_or_else(|| NodeError::InvalidSettingValue {
            identity: T::IDENTIFIER,
            text: text.to_string(),
        })
    }
}

impl<T: SettingType> Setting for SettingNode<T> {
    fn read_value(&self) -> String {
        self.value.render()
    }

    fn read_latch(&self) -> String {
        self.latch.render()
    }

    fn read_allowed_values(&self) -> Vec<String> {
        self.allowed.iter().map(SettingType::render).collect()
    }

    fn write_value(&mut self, text: &str) -> Result<(), NodeError> {
        let value = Self::parse(text)?;
        self.set_value(value)
    }

    fn set_latch(&mut self) {
        SettingNode::set_latch(self);
    }

    fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

impl<T: SettingType> NodeKind for SettingNode<T> {
    fn identity(&self) -> &'static str {
        T::IDENTIFIER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_setting(&self) -> Option<&dyn Setting> {
        Some(self)
    }

    fn as_setting_mut(&mut self) -> Option<&mut dyn Setting> {
        Some(self)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![("value", self.value.render()), ("latch", self.latch.render())]
    }

    fn load_field(&mut self, key: &str, text: &str) -> Result<(), NodeError> {
        match key {
            "value" => self.write_value(text),
            "latch" => {
                self.latch = Self::parse(text)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl<T: SettingType> Class for SettingNode<T> {
    const IDENTIFIER: &'static str = T::IDENTIFIER;
    type View = Self;

    fn accepts(kind: &dyn NodeKind) -> bool {
        kind.as_any().is::<Self>()
    }

    fn view(kind: &dyn NodeKind) -> Option<&Self> {
        kind.as_any().downcast_ref::<Self>()
    }

    fn view_mut(kind: &mut dyn NodeKind) -> Option<&mut Self> {
        kind.as_any_mut().downcast_mut::<Self>()
    }
}

/// Abstract class of every setting, viewed as `dyn Setting`
///
/// No node has this identity, so tag-exact lookups (`find_by_path`,
/// `scan_by_name`) never match it; use casts and `find_all` instead.
#[derive(Debug, Clone, Copy)]
pub struct AnySetting;

impl Class for AnySetting {
    const IDENTIFIER: &'static str = "setting";
    type View = dyn Setting;

    fn accepts(kind: &dyn NodeKind) -> bool {
        kind.as_setting().is_some()
    }

    fn view(kind: &dyn NodeKind) -> Option<&Self::View> {
        kind.as_setting()
    }

    fn view_mut(kind: &mut dyn NodeKind) -> Option<&mut Self::View> {
        kind.as_setting_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::Object;

    #[test]
    fn identities_follow_value_type() {
        assert_eq!(Boolean::default().identity(), "setting.boolean");
        assert_eq!(Natural::IDENTIFIER, "setting.natural");
        assert_eq!(Integer::default().identity(), Integer::IDENTIFIER);
        assert_eq!(Real::IDENTIFIER, "setting.real");
        assert_eq!(StringSetting::default().identity(), "setting.string");
    }

    #[test]
    fn static_setting_latches_on_request() {
        let mut setting = Natural::new(2);
        setting.set_value(4).unwrap();
        assert_eq!(*setting.value(), 4);
        assert_eq!(*setting.latch(), 2);

        setting.set_latch();
        assert_eq!(*setting.latch(), 4);
    }

    #[test]
    fn dynamic_setting_latches_on_write() {
        let mut setting = Boolean::new(false).dynamic();
        setting.set_value(true).unwrap();
        assert!(*setting.latch());
        assert!(setting.is_dynamic());
    }

    #[test]
    fn allowed_values_are_enforced() {
        let mut setting = StringSetting::new("NTSC".to_string())
            .with_allowed_values(vec!["NTSC".to_string(), "PAL".to_string()]);

        assert!(setting.write_value("PAL").is_ok());
        let err = setting.write_value("SECAM").unwrap_err();
        assert_eq!(err, NodeError::ValueNotAllowed { value: "SECAM".into() });
        assert_eq!(setting.read_value(), "PAL");
        assert_eq!(setting.read_allowed_values(), vec!["NTSC", "PAL"]);
    }

    #[test]
    fn write_value_rejects_bad_text() {
        let mut setting = Integer::default();
        let err = setting.write_value("ten").unwrap_err();
        assert!(matches!(err, NodeError::InvalidSettingValue { identity: "setting.integer", .. }));
        assert_eq!(setting.read_value(), "0");
    }

    #[test]
    fn fields_round_trip() {
        let mut source = Real::new(1.5);
        source.set_value(2.25).unwrap();

        let mut target = Real::default();
        for (key, text) in source.fields() {
            target.load_field(key, &text).unwrap();
        }
        assert_eq!(target, source);
        assert!(target.load_field("unknown", "x").is_ok());
    }

    #[test]
    fn any_setting_accepts_only_settings() {
        let setting = Boolean::new(true);
        assert!(AnySetting::accepts(&setting));
        assert!(!AnySetting::accepts(&Object));
        assert_eq!(AnySetting::view(&setting).map(|s| s.read_value()), Some("true".to_string()));
    }
}
