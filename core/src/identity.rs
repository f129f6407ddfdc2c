use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Width of a rendered address: `0x` plus two hex digits per pointer byte.
pub const ADDRESS_WIDTH: usize = std::mem::size_of::<usize>() * 2 + 2;

// Tokens start well away from zero so they never collide with a null address.
static NEXT_TOKEN: AtomicUsize = AtomicUsize::new(0x1000);

/// Identity of a real (production) object while it holds a vended mock.
///
/// The registry only compares and prints identities; it never dereferences
/// them. A real type normally draws a fresh token with [`RealId::next`] in its
/// constructor and keeps it for its whole life, which survives Rust moves.
/// Values that are pinned or boxed may use their address via [`RealId::of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RealId(usize);

impl RealId {
    /// Allocate a process-unique identity token
    pub fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(std::mem::align_of::<usize>(), Ordering::Relaxed))
    }

    /// Identity derived from the address of a value
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Self::from_ptr(value as *const T)
    }

    /// Identity derived from a raw pointer. The pointer is never read.
    pub fn from_ptr<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>() as usize)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl From<usize> for RealId {
    fn from(raw: usize) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_address(f, self.0)
    }
}

/// Address of the allocation behind a mock handle.
///
/// Equal for every `Arc` that shares the allocation, whatever its pointee
/// type, so it identifies one mock across base and derived registries.
pub fn mock_address<T: ?Sized>(mock: &Arc<T>) -> usize {
    Arc::as_ptr(mock).cast::<()>() as usize
}

/// Render an address as fixed-width, zero-padded hexadecimal.
pub(crate) fn write_address(f: &mut impl fmt::Write, address: usize) -> fmt::Result {
    write!(f, "{address:#0width$x}", width = ADDRESS_WIDTH)
}
