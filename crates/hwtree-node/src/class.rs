//! Node classes
//!
//! Every node carries a payload implementing [`NodeKind`], which reports the
//! node's identity at run time. Types additionally implement [`Class`],
//! which exposes the same identity as an associated constant and tells the
//! query algorithms which payloads a type accepts.
//!
//! # Identity
//! - `NodeKind::identity()` answers "what is this node?" from an instance
//! - `Class::IDENTIFIER` answers the same question from a type
//!
//! [`declare_class!`](crate::declare_class) derives both from one literal so
//! they cannot drift apart.
//!
//! # Example
//! ```rust
//! use hwtree_node::{declare_class, Class, NodeKind};
//!
//! #[derive(Debug, Default)]
//! pub struct Cartridge;
//!
//! declare_class!(Cartridge, "cartridge");
//!
//! assert_eq!(Cartridge::IDENTIFIER, "cartridge");
//! assert_eq!(Cartridge.identity(), "cartridge");
//! ```

use crate::error::NodeError;
use crate::kinds::Setting;
use std::any::Any;
use std::fmt::Debug;

/// Run-time node payload
pub trait NodeKind: Any + Debug + 'static {
    /// Class tag of the concrete type
    fn identity(&self) -> &'static str;

    /// Upcast for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete type
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Setting view, for members of the setting family
    fn as_setting(&self) -> Option<&dyn Setting> {
        None
    }

    /// Mutable setting view
    fn as_setting_mut(&mut self) -> Option<&mut dyn Setting> {
        None
    }

    /// Type-specific persisted state as `(key, text)` pairs
    ///
    /// Keys must not collide with `name`, `attribute` or `node`.
    fn fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Restore one field previously produced by [`NodeKind::fields`]
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    /// Returns error if the text is not acceptable for the field
    fn load_field(&mut self, _key: &str, _text: &str) -> Result<(), NodeError> {
        Ok(())
    }
}

/// Compile-time class descriptor used by casts and queries
///
/// Concrete node types describe themselves (`View = Self`). Abstract
/// classes such as [`Object`] or [`AnySetting`](crate::kinds::AnySetting)
/// accept a whole family and expose it through a trait-object view.
pub trait Class: 'static {
    /// Class tag, equal to `identity()` of every instance of a concrete type
    const IDENTIFIER: &'static str;

    /// What a successful cast borrows
    type View: ?Sized;

    /// True if a node with this payload is a member of the class
    fn accepts(kind: &dyn NodeKind) -> bool;

    /// Borrow the payload as the class view
    fn view(kind: &dyn NodeKind) -> Option<&Self::View>;

    /// Mutably borrow the payload as the class view
    fn view_mut(kind: &mut dyn NodeKind) -> Option<&mut Self::View>;
}

/// Implement [`Class`] for a concrete payload type
///
/// Use this alone when the type implements [`NodeKind`] by hand.
#[macro_export]
macro_rules! impl_class {
    ($ty:ty, $name:literal) => {
        impl $crate::Class for $ty {
            const IDENTIFIER: &'static str = $name;
            type View = Self;

            fn accepts(kind: &dyn $crate::NodeKind) -> bool {
                kind.as_any().is::<Self>()
            }

            fn view(kind: &dyn $crate::NodeKind) -> Option<&Self> {
                kind.as_any().downcast_ref::<Self>()
            }

            fn view_mut(kind: &mut dyn $crate::NodeKind) -> Option<&mut Self> {
                kind.as_any_mut().downcast_mut::<Self>()
            }
        }
    };
}

/// Declare a plain node class: [`Class`] plus a default [`NodeKind`]
#[macro_export]
macro_rules! declare_class {
    ($ty:ty, $name:literal) => {
        $crate::impl_class!($ty, $name);

        impl $crate::NodeKind for $ty {
            fn identity(&self) -> &'static str {
                <Self as $crate::Class>::IDENTIFIER
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}

/// The plain node
///
/// As a cast target `Object` accepts every node, viewed as `dyn NodeKind`.
/// Path lookups still compare tags exactly, so `find_by_path::<Object>`
/// only finds nodes created as plain objects.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Object;

impl NodeKind for Object {
    fn identity(&self) -> &'static str {
        Self::IDENTIFIER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Class for Object {
    const IDENTIFIER: &'static str = "Object";
    type View = dyn NodeKind;

    fn accepts(_kind: &dyn NodeKind) -> bool {
        true
    }

    fn view(kind: &dyn NodeKind) -> Option<&Self::View> {
        Some(kind)
    }

    fn view_mut(kind: &mut dyn NodeKind) -> Option<&mut Self::View> {
        Some(kind)
    }
}

/// Factory used by the registry for a default-constructible class
pub(crate) fn construct<T: NodeKind + Default>() -> Box<dyn NodeKind> {
    Box::new(T::default())
}
