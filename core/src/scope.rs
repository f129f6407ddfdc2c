use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};

use crate::diagnostics::TeardownReport;
use crate::registry::{with_state, Registry};
use crate::vendable::Vendable;

/// Test-side guard that keeps a registry, and every registry of its bases,
/// active for the guard's lifetime.
///
/// While a registry is active the test may queue mocks for it. When the last
/// guard covering a registry goes away the registry checks that every queued
/// mock was vended and every vended mock was destroyed, then resets so the
/// next test starts clean.
///
/// Problems found on drop are raised as a panic carrying the rendered
/// [`TeardownReport`] (or logged, when `panic_on_failure` is off or the
/// thread is already unwinding). Call [`ScopedVendor::finish`] to receive the
/// report instead.
///
/// ```rust
/// use std::sync::Arc;
/// use mock_vendor::{RealId, Registry, ScopedVendor, Vendable};
///
/// #[derive(Default)]
/// struct Counter(u32);
///
/// struct Meter;
///
/// impl Vendable for Meter {
///     type Mock = Counter;
///
///     fn nice_mock() -> Arc<Counter> {
///         Arc::new(Counter::default())
///     }
/// }
///
/// let vendor = ScopedVendor::<Meter>::new();
/// vendor.queue_mock(Arc::new(Counter(3)));
///
/// let id = RealId::next();
/// assert_eq!(Registry::<Meter>::vend(id).0, 3);
/// Registry::<Meter>::destroy(id);
///
/// assert!(vendor.finish().is_ok());
/// ```
#[must_use = "a scoped vendor checks its registries when it is dropped"]
pub struct ScopedVendor<V: Vendable> {
    entered: Vec<TypeId>,
    finished: bool,
    _vendable: PhantomData<fn() -> V>,
}

impl<V: Vendable> ScopedVendor<V> {
    /// Activate `V`'s registry and those of all its bases
    pub fn new() -> Self {
        let entered = with_state(|state| {
            state.ensure::<V>();
            let order = state.scope_order(TypeId::of::<V>());
            for ty in &order {
                state.enter_scope(*ty);
            }
            order
        });

        debug!(
            mock_type = V::type_name(),
            registries = entered.len(),
            "Scoped vendor created"
        );

        Self {
            entered,
            finished: false,
            _vendable: PhantomData,
        }
    }

    /// Queue a mock for the next real object of type `V`
    pub fn queue_mock(&self, mock: Arc<V::Mock>) -> &Self {
        Registry::<V>::queue_mock(mock);
        self
    }

    /// Queue several mocks, vended in iteration order
    pub fn queue_mocks<I>(&self, mocks: I) -> &Self
    where
        I: IntoIterator<Item = Arc<V::Mock>>,
    {
        for mock in mocks {
            Registry::<V>::queue_mock(mock);
        }
        self
    }

    /// Set the mock answering `V`'s static methods
    pub fn set_static_mock(&self, mock: Arc<V::Mock>) -> &Self {
        Registry::<V>::set_static_mock(mock);
        self
    }

    /// Number of registries this vendor keeps active, shared bases counted
    /// once per path
    pub fn registry_count(&self) -> usize {
        self.entered.len()
    }

    /// Tear down now and return what the consistency checks found
    pub fn finish(mut self) -> Result<(), TeardownReport> {
        let (report, _) = self.teardown();
        report.into_result()
    }

    fn teardown(&mut self) -> (TeardownReport, bool) {
        if self.finished {
            return (TeardownReport::new(), false);
        }
        self.finished = true;

        with_state(|state| {
            let mut report = TeardownReport::new();
            // Reverse order of entry keeps nested and shared accounting symmetric
            for ty in self.entered.iter().rev() {
                state.leave_scope(*ty, &mut report);
            }
            (report, state.config().panic_on_failure)
        })
    }
}

impl<V: Vendable> Default for ScopedVendor<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vendable> Drop for ScopedVendor<V> {
    fn drop(&mut self) {
        let (report, panic_on_failure) = self.teardown();
        if report.is_empty() {
            return;
        }

        if panic_on_failure && !thread::panicking() {
            panic!("{report}");
        }
        error!(mock_type = V::type_name(), "{report}");
    }
}
