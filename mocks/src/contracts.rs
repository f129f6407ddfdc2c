//! Contract test helpers for vendable types
//!
//! Standardized checks that any Real/Mock pair, and any declared base link,
//! should pass. Each check opens its own scoped vendors and ends with a clean
//! teardown, so it can run inside a larger serialized test.

use std::sync::Arc;

use mock_vendor::{base_links_of, Inherits, RealId, Registry, ScopedVendor, Vendable};

use crate::assertions::{assert_bound, assert_clean_teardown, assert_same_mock, assert_unbound};

/// Run every single-type contract against `V`
pub fn check_vendable_contract<V: Vendable>(queued: Vec<Arc<V::Mock>>) {
    check_default_vend_contract::<V>();
    check_fifo_contract::<V>(queued);
    check_destroy_contract::<V>();
}

/// With nothing queued, vending succeeds and the object is tracked
pub fn check_default_vend_contract<V: Vendable>() {
    let vendor = ScopedVendor::<V>::new();
    let id = RealId::next();

    let vended = Registry::<V>::vend(id);
    assert_bound::<V>(id);
    assert_same_mock(&Registry::<V>::mock(id), &vended);

    Registry::<V>::destroy(id);
    assert_clean_teardown(vendor.finish());
}

/// Queued mocks come out in the order they went in
pub fn check_fifo_contract<V: Vendable>(queued: Vec<Arc<V::Mock>>) {
    let vendor = ScopedVendor::<V>::new();
    vendor.queue_mocks(queued.iter().cloned());

    let ids: Vec<RealId> = queued
        .iter()
        .map(|expected| {
            let id = RealId::next();
            assert_same_mock(&Registry::<V>::vend(id), expected);
            id
        })
        .collect();
    assert_eq!(Registry::<V>::queued_count(), 0, "Queue should be drained");

    for id in ids {
        Registry::<V>::destroy(id);
    }
    assert_clean_teardown(vendor.finish());
}

/// Destroying twice, or destroying an unknown identity, changes nothing
pub fn check_destroy_contract<V: Vendable>() {
    let vendor = ScopedVendor::<V>::new();
    let id = RealId::next();
    Registry::<V>::vend(id);

    Registry::<V>::destroy(id);
    Registry::<V>::destroy(id);
    Registry::<V>::destroy(RealId::next());
    assert_unbound::<V>(id);
    assert!(
        Registry::<V>::try_mock(id).is_err(),
        "Lookup after destroy should fail"
    );

    assert_clean_teardown(vendor.finish());
}

/// `D` declares `B` as a direct base and shares its mocks with it
pub fn check_direct_base_contract<D, B>()
where
    D: Inherits<B>,
    B: Vendable,
{
    assert!(
        base_links_of::<D>().contains(&B::type_name()),
        "{} should declare {} as a direct base",
        D::type_name(),
        B::type_name()
    );
    check_reachable_base_contract::<D, B>();
}

/// A mock vended for `D` answers lookups through `B`, directly or through
/// intermediate bases, until the `D` object is destroyed
pub fn check_reachable_base_contract<D: Vendable, B: Vendable>() {
    let vendor = ScopedVendor::<D>::new();
    let id = RealId::next();

    let vended = Registry::<D>::vend(id);
    assert_bound::<B>(id);
    assert_same_mock(&Registry::<B>::mock(id), &vended);

    Registry::<D>::destroy(id);
    assert_unbound::<D>(id);
    assert_unbound::<B>(id);
    assert_clean_teardown(vendor.finish());
}
