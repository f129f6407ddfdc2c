//! The base-link graph
//!
//! A link is a directed edge from a derived type's registry to one of its
//! direct base types' registries. Vending, destroying and rebinding an
//! identity in the derived registry is replayed in every base registry,
//! depth-first and in declaration order. Each registry walks only its own
//! edges, so a three-level hierarchy needs two links and propagates through
//! both hops.
//!
//! Edges mirror a type hierarchy and are assumed acyclic.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::identity::RealId;
use crate::registry::{with_state, VendorState};
use crate::vendable::{Inherits, Vendable};

/// Edge from a derived registry to a base registry
#[derive(Clone, Copy)]
pub struct BaseLink {
    pub(crate) derived: TypeId,
    pub(crate) base: TypeId,
    derived_name: &'static str,
    base_name: &'static str,
    pub(crate) bind: fn(&mut VendorState, RealId, &dyn Any),
    pub(crate) ensure_derived: fn(&mut VendorState),
    pub(crate) ensure_base: fn(&mut VendorState),
}

impl BaseLink {
    /// Describe the edge `D -> B`
    pub fn new<D, B>() -> Self
    where
        D: Inherits<B>,
        B: Vendable,
    {
        Self {
            derived: TypeId::of::<D>(),
            base: TypeId::of::<B>(),
            derived_name: D::type_name(),
            base_name: B::type_name(),
            bind: bind_through::<D, B>,
            ensure_derived: VendorState::ensure::<D>,
            ensure_base: VendorState::ensure::<B>,
        }
    }

    /// Edges are identified by their ordered pair of endpoints
    pub fn key(&self) -> (TypeId, TypeId) {
        (self.derived, self.base)
    }

    pub fn derived_name(&self) -> &'static str {
        self.derived_name
    }

    pub fn base_name(&self) -> &'static str {
        self.base_name
    }
}

impl fmt::Debug for BaseLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseLink")
            .field("derived", &self.derived_name)
            .field("base", &self.base_name)
            .finish()
    }
}

impl PartialEq for BaseLink {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for BaseLink {}

/// Install the derived handle, upcast, in the base registry and keep walking
fn bind_through<D, B>(state: &mut VendorState, id: RealId, derived: &dyn Any)
where
    D: Inherits<B>,
    B: Vendable,
{
    match derived.downcast_ref::<Arc<D::Mock>>() {
        Some(mock) => state.bind::<B>(id, D::upcast(Arc::clone(mock))),
        None => tracing::error!(
            derived = D::type_name(),
            base = B::type_name(),
            real = %id,
            "Base link received a handle of the wrong mock type"
        ),
    }
}

/// Declare that `D` derives from `B` so that mocks vended for `D` also answer
/// lookups through `B`'s registry.
///
/// Declaring the same edge again is a no-op. Returns whether the edge was new.
pub fn declare_base_link<D, B>() -> bool
where
    D: Inherits<B>,
    B: Vendable,
{
    with_state(|state| state.declare_link(BaseLink::new::<D, B>()))
}

/// Names of the direct bases linked from `V`, in declaration order
pub fn base_links_of<V: Vendable>() -> Vec<&'static str> {
    with_state(|state| {
        state.ensure::<V>();
        state
            .links_of(TypeId::of::<V>())
            .iter()
            .map(BaseLink::base_name)
            .collect()
    })
}
