//! Opaque content handles.
//!
//! A [`ContentHandle`] stands for whatever asset context the host uses to
//! load textures and fonts. The toolkit never looks inside it; it only passes
//! it down the tree and compares handles for identity.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A shared, identity-compared content context.
///
/// Clones compare equal to each other. Two handles created separately never
/// compare equal, even when they wrap equal values.
#[derive(Clone)]
pub struct ContentHandle {
    inner: Arc<dyn Any + Send + Sync>,
}

impl ContentHandle {
    /// Wrap a host content context.
    pub fn new<T: Any + Send + Sync>(context: T) -> Self {
        Self {
            inner: Arc::new(context),
        }
    }

    /// Wrap an already shared context. Handles made from clones of the same
    /// `Arc` compare equal.
    pub fn from_arc<T: Any + Send + Sync>(context: Arc<T>) -> Self {
        Self { inner: context }
    }

    /// Borrow the wrapped context as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Whether both handles refer to the same context.
    #[inline]
    pub fn same_as(&self, other: &ContentHandle) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl PartialEq for ContentHandle {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for ContentHandle {}

impl fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHandle({:p})", Arc::as_ptr(&self.inner))
    }
}
