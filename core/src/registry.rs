//! Per-type mock registries and the lock that guards them
//!
//! Every Real/Mock pair owns one registry: a FIFO queue of mocks waiting to
//! be vended, the map of live real objects to their mocks, an optional mock
//! for static methods, and a count of the scoped vendors keeping it active.
//! All registries live in one process-wide table behind a single lock. The
//! lock is taken once per public call; propagation through base links runs
//! on the already-locked state, so the lock never needs to be re-entrant.

use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::marker::PhantomData;
use std::mem;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use crate::config::VendorConfig;
use crate::diagnostics::{Failure, LeakedBinding, TeardownReport};
use crate::error::{Result, VendorError};
use crate::identity::{mock_address, RealId};
use crate::links::BaseLink;
use crate::vendable::{Bases, Vendable};

static STATE: LazyLock<Mutex<VendorState>> =
    LazyLock::new(|| Mutex::new(VendorState::new(load_config())));

fn load_config() -> VendorConfig {
    VendorConfig::from_env().unwrap_or_else(|err| {
        warn!(error = %err, "Falling back to default mock vendor configuration");
        VendorConfig::default()
    })
}

/// Run `f` under the registry lock.
///
/// Handles dropped by `f` are parked and released only after the lock is
/// gone, so a mock that verifies its expectations on drop never runs (or
/// panics) while the registry is locked.
pub(crate) fn with_state<R>(f: impl FnOnce(&mut VendorState) -> R) -> R {
    let (result, released) = {
        let mut state = STATE.lock();
        let result = f(&mut state);
        let released = mem::take(&mut state.released);
        (result, released)
    };
    drop(released);
    result
}

/// Replace the active configuration
pub fn configure(config: VendorConfig) {
    with_state(|state| state.config = config);
}

/// Snapshot of the active configuration
pub fn current_config() -> VendorConfig {
    with_state(|state| state.config.clone())
}

/// State left behind by a registry whose last scope just closed
pub(crate) struct Teardown {
    failures: Vec<Failure>,
    released: Box<dyn Any + Send>,
}

/// Operations that need no knowledge of the mock type
pub(crate) trait ErasedRegistry: Send {
    fn type_name(&self) -> &'static str;
    fn unbind(&mut self, id: RealId) -> Option<Box<dyn Any + Send>>;
    /// Move the binding at `from` to `to`; returns any binding displaced at `to`
    fn rebind(&mut self, from: RealId, to: RealId) -> Option<Box<dyn Any + Send>>;
    fn enter_scope(&mut self) -> usize;
    fn leave_scope(&mut self, leak_report_limit: usize) -> Option<Teardown>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub(crate) struct TypedRegistry<V: Vendable> {
    pending: VecDeque<Arc<V::Mock>>,
    instances: BTreeMap<RealId, Arc<V::Mock>>,
    static_mock: Option<Arc<V::Mock>>,
    scope_count: usize,
}

impl<V: Vendable> TypedRegistry<V> {
    fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            instances: BTreeMap::new(),
            static_mock: None,
            scope_count: 0,
        }
    }
}

impl<V: Vendable> ErasedRegistry for TypedRegistry<V> {
    fn type_name(&self) -> &'static str {
        V::type_name()
    }

    fn unbind(&mut self, id: RealId) -> Option<Box<dyn Any + Send>> {
        self.instances
            .remove(&id)
            .map(|mock| Box::new(mock) as Box<dyn Any + Send>)
    }

    fn rebind(&mut self, from: RealId, to: RealId) -> Option<Box<dyn Any + Send>> {
        let mock = self.instances.remove(&from)?;
        self.instances
            .insert(to, mock)
            .map(|displaced| Box::new(displaced) as Box<dyn Any + Send>)
    }

    fn enter_scope(&mut self) -> usize {
        self.scope_count += 1;
        self.scope_count
    }

    fn leave_scope(&mut self, leak_report_limit: usize) -> Option<Teardown> {
        if self.scope_count == 0 {
            warn!(
                mock_type = V::type_name(),
                "Scope left on a registry with no active scope"
            );
            return None;
        }

        self.scope_count -= 1;
        if self.scope_count > 0 {
            return None;
        }

        let mut failures = Vec::new();
        if !self.pending.is_empty() {
            failures.push(Failure::UnconsumedQueue {
                type_name: V::type_name(),
                count: self.pending.len(),
            });
        }
        if !self.instances.is_empty() {
            let bindings = self.instances.iter().map(|(real, mock)| LeakedBinding {
                real: *real,
                mock: mock_address(mock),
            });
            failures.push(Failure::leaked(V::type_name(), bindings, leak_report_limit));
        }

        // Cleared even when failures were found so later tests start clean
        let released = (
            mem::take(&mut self.pending),
            mem::take(&mut self.instances),
            self.static_mock.take(),
        );

        debug!(
            mock_type = V::type_name(),
            failures = failures.len(),
            "Registry scope closed"
        );

        Some(Teardown {
            failures,
            released: Box::new(released),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct RegistrySlot {
    registry: Box<dyn ErasedRegistry>,
    links: Vec<BaseLink>,
}

/// The process-wide table of registries
pub(crate) struct VendorState {
    config: VendorConfig,
    registries: HashMap<TypeId, RegistrySlot>,
    released: Vec<Box<dyn Any + Send>>,
}

impl VendorState {
    fn new(config: VendorConfig) -> Self {
        Self {
            config,
            registries: HashMap::new(),
            released: Vec::new(),
        }
    }

    /// Create `V`'s registry on first use and declare its bases
    pub(crate) fn ensure<V: Vendable>(&mut self) {
        let key = TypeId::of::<V>();
        if self.registries.contains_key(&key) {
            return;
        }

        self.registries.insert(
            key,
            RegistrySlot {
                registry: Box::new(TypedRegistry::<V>::new()),
                links: Vec::new(),
            },
        );

        let mut bases = Bases::<V>::new();
        V::declare_bases(&mut bases);
        for link in bases.into_links() {
            self.declare_link(link);
        }

        debug!(mock_type = V::type_name(), "Registry initialized");
    }

    fn typed<V: Vendable>(&self) -> Option<&TypedRegistry<V>> {
        self.registries
            .get(&TypeId::of::<V>())
            .and_then(|slot| slot.registry.as_any().downcast_ref())
    }

    fn typed_mut<V: Vendable>(&mut self) -> &mut TypedRegistry<V> {
        self.ensure::<V>();
        match self
            .registries
            .get_mut(&TypeId::of::<V>())
            .and_then(|slot| slot.registry.as_any_mut().downcast_mut())
        {
            Some(registry) => registry,
            None => unreachable!("registry slots are keyed by their own type"),
        }
    }

    pub(crate) fn links_of(&self, ty: TypeId) -> Vec<BaseLink> {
        self.registries
            .get(&ty)
            .map(|slot| slot.links.clone())
            .unwrap_or_default()
    }

    /// Add an edge unless the same ordered pair is already linked
    pub(crate) fn declare_link(&mut self, link: BaseLink) -> bool {
        (link.ensure_derived)(self);
        (link.ensure_base)(self);

        let Some(slot) = self.registries.get_mut(&link.derived) else {
            return false;
        };
        if slot.links.iter().any(|existing| existing.key() == link.key()) {
            return false;
        }

        debug!(
            derived = link.derived_name(),
            base = link.base_name(),
            "Base link declared"
        );
        slot.links.push(link);
        true
    }

    pub(crate) fn vend<V: Vendable>(&mut self, id: RealId) -> Arc<V::Mock> {
        let registry = self.typed_mut::<V>();
        let (mock, source) = match registry.pending.pop_front() {
            Some(mock) => (mock, "queued"),
            None => (V::nice_mock(), "default"),
        };

        debug!(
            mock_type = V::type_name(),
            real = %id,
            source,
            queued = registry.pending.len(),
            "Vending mock"
        );

        self.bind::<V>(id, Arc::clone(&mock));
        mock
    }

    /// Bind `mock` to `id` in `V`'s registry, then in every base registry
    pub(crate) fn bind<V: Vendable>(&mut self, id: RealId, mock: Arc<V::Mock>) {
        if let Some(displaced) = self.typed_mut::<V>().instances.insert(id, Arc::clone(&mock)) {
            self.released.push(Box::new(displaced));
        }

        for link in self.links_of(TypeId::of::<V>()) {
            (link.bind)(self, id, &mock);
        }
    }

    /// Forget `id` in registry `ty` and in every base registry
    pub(crate) fn unbind(&mut self, ty: TypeId, id: RealId) {
        let Some(slot) = self.registries.get_mut(&ty) else {
            return;
        };
        if let Some(mock) = slot.registry.unbind(id) {
            debug!(mock_type = slot.registry.type_name(), real = %id, "Mock destroyed");
            self.released.push(mock);
        }

        for link in self.links_of(ty) {
            self.unbind(link.base, id);
        }
    }

    /// Move the binding at `from` to `to` in registry `ty` and its bases
    pub(crate) fn rebind(&mut self, ty: TypeId, from: RealId, to: RealId) {
        if from == to {
            return;
        }
        let Some(slot) = self.registries.get_mut(&ty) else {
            return;
        };
        if let Some(displaced) = slot.registry.rebind(from, to) {
            self.released.push(displaced);
        }

        for link in self.links_of(ty) {
            self.rebind(link.base, from, to);
        }
    }

    pub(crate) fn lookup<V: Vendable>(&self, id: RealId) -> Result<Arc<V::Mock>> {
        self.typed::<V>()
            .and_then(|registry| registry.instances.get(&id))
            .cloned()
            .ok_or_else(|| VendorError::not_vended(V::type_name(), id))
    }

    /// `root` followed by every registry reachable through base links,
    /// depth-first in declaration order. Shared bases appear once per path.
    pub(crate) fn scope_order(&self, root: TypeId) -> Vec<TypeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(ty) = stack.pop() {
            order.push(ty);
            if let Some(slot) = self.registries.get(&ty) {
                stack.extend(slot.links.iter().rev().map(|link| link.base));
            }
        }
        order
    }

    pub(crate) fn enter_scope(&mut self, ty: TypeId) {
        if let Some(slot) = self.registries.get_mut(&ty) {
            let depth = slot.registry.enter_scope();
            debug!(mock_type = slot.registry.type_name(), depth, "Scope entered");
        }
    }

    pub(crate) fn leave_scope(&mut self, ty: TypeId, report: &mut TeardownReport) {
        let limit = self.config.leak_report_limit;
        let Some(slot) = self.registries.get_mut(&ty) else {
            return;
        };
        if let Some(teardown) = slot.registry.leave_scope(limit) {
            report.extend(teardown.failures);
            self.released.push(teardown.released);
        }
    }

    pub(crate) fn config(&self) -> &VendorConfig {
        &self.config
    }
}

/// Type-indexed access to one Real/Mock pair's registry.
///
/// `Registry::<V>` is never constructed; it only groups the operations a real
/// type's constructor, destructor and methods call.
pub struct Registry<V: Vendable>(PhantomData<fn() -> V>);

impl<V: Vendable> Registry<V> {
    /// Bind a mock to a newly constructed real object.
    ///
    /// Hands out the oldest queued mock, or a default permissive mock when
    /// nothing is queued, and installs the same handle in every base registry.
    pub fn vend(id: RealId) -> Arc<V::Mock> {
        with_state(|state| state.vend::<V>(id))
    }

    /// Forget the mock bound to a real object being dropped.
    ///
    /// Destroying an identity twice, or one that was never vended, is a no-op.
    pub fn destroy(id: RealId) {
        with_state(|state| state.unbind(TypeId::of::<V>(), id));
    }

    /// Move a binding from one identity to another without vending again
    pub fn rebind(from: RealId, to: RealId) {
        debug!(mock_type = V::type_name(), %from, %to, "Rebinding mock");
        with_state(|state| state.rebind(TypeId::of::<V>(), from, to));
    }

    /// The mock bound to `id`, or [`VendorError::NotVended`]
    pub fn try_mock(id: RealId) -> Result<Arc<V::Mock>> {
        with_state(|state| state.lookup::<V>(id))
    }

    /// The mock bound to `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` was never vended (or already destroyed) and strict
    /// lookups are enabled. Otherwise a disposable default mock is returned.
    pub fn mock(id: RealId) -> Arc<V::Mock> {
        let (found, strict) = with_state(|state| (state.lookup::<V>(id), state.config().strict_lookup));
        match found {
            Ok(mock) => mock,
            Err(err) if strict => panic!("{err}"),
            Err(err) => {
                warn!(error = %err, "Lookup without a vended mock; using a default mock");
                V::nice_mock()
            }
        }
    }

    /// Append a mock to the vending queue
    pub fn queue_mock(mock: Arc<V::Mock>) {
        with_state(|state| {
            let registry = state.typed_mut::<V>();
            if registry.scope_count == 0 {
                warn!(
                    mock_type = V::type_name(),
                    "Mock queued with no active scope; it will not be checked at teardown"
                );
            }
            registry.pending.push_back(mock);
            debug!(
                mock_type = V::type_name(),
                queued = registry.pending.len(),
                "Mock queued"
            );
        });
    }

    /// Set the mock used by the real type's static methods
    pub fn set_static_mock(mock: Arc<V::Mock>) {
        with_state(|state| {
            if let Some(previous) = state.typed_mut::<V>().static_mock.replace(mock) {
                state.released.push(Box::new(previous));
            }
        });
    }

    pub fn clear_static_mock() {
        with_state(|state| {
            if let Some(previous) = state.typed_mut::<V>().static_mock.take() {
                state.released.push(Box::new(previous));
            }
        });
    }

    /// The configured static mock, or a fresh default mock that nothing keeps
    pub fn static_mock() -> Arc<V::Mock> {
        with_state(|state| {
            state
                .typed::<V>()
                .and_then(|registry| registry.static_mock.clone())
        })
        .unwrap_or_else(V::nice_mock)
    }

    /// Open one scope on this registry only (bases are not touched)
    pub fn enter_scope() {
        with_state(|state| {
            state.ensure::<V>();
            state.enter_scope(TypeId::of::<V>());
        });
    }

    /// Close one scope on this registry only, returning the teardown findings
    /// if this was the last scope
    pub fn leave_scope() -> TeardownReport {
        with_state(|state| {
            let mut report = TeardownReport::new();
            state.leave_scope(TypeId::of::<V>(), &mut report);
            report
        })
    }

    pub fn is_bound(id: RealId) -> bool {
        with_state(|state| {
            state
                .typed::<V>()
                .is_some_and(|registry| registry.instances.contains_key(&id))
        })
    }

    pub fn bound_count() -> usize {
        with_state(|state| state.typed::<V>().map_or(0, |registry| registry.instances.len()))
    }

    pub fn queued_count() -> usize {
        with_state(|state| state.typed::<V>().map_or(0, |registry| registry.pending.len()))
    }

    pub fn scope_depth() -> usize {
        with_state(|state| state.typed::<V>().map_or(0, |registry| registry.scope_count))
    }

    pub fn has_static_mock() -> bool {
        with_state(|state| {
            state
                .typed::<V>()
                .is_some_and(|registry| registry.static_mock.is_some())
        })
    }
}
