//! Backing-store handles
//!
//! A [`Pak`] is an opaque, shared reference to whatever archive a node's
//! content was loaded from. The tree only stores and hands it back.

use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Opaque shared backing-store handle
#[derive(Clone)]
pub struct Pak(Arc<dyn Any + Send + Sync>);

impl Pak {
    /// Wrap any archive value
    #[inline]
    #[must_use]
    pub fn new<T: Any + Send + Sync>(archive: T) -> Self {
        Self(Arc::new(archive))
    }

    /// Borrow the archive as `T`
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// True if both handles point at the same archive
    #[inline]
    #[must_use]
    pub fn same_archive(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Pak {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pak").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pak_downcast() {
        let pak = Pak::new(String::from("rom.sfc"));
        assert_eq!(pak.downcast_ref::<String>().map(String::as_str), Some("rom.sfc"));
        assert!(pak.downcast_ref::<u32>().is_none());
    }

    #[test]
    fn pak_clone_shares_archive() {
        let pak = Pak::new(7_u32);
        let copy = pak.clone();
        assert!(pak.same_archive(&copy));
        assert!(!pak.same_archive(&Pak::new(7_u32)));
    }
}
