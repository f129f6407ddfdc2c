//! Custom assertion helpers for testing
//!
//! Provides specialized assertions for:
//! - Mock handle identity across base and derived registries
//! - Registry binding state
//! - Teardown reports with clear error messages

use std::sync::Arc;

use mock_vendor::{mock_address, Failure, RealId, Registry, TeardownReport, Vendable};

/// Assert two handles share one mock allocation, whatever their pointee types
pub fn assert_same_mock<T: ?Sized, U: ?Sized>(actual: &Arc<T>, expected: &Arc<U>) {
    assert_eq!(
        mock_address(actual),
        mock_address(expected),
        "Handles point at different mocks"
    );
}

/// Assert `id` has a mock bound in `V`'s registry
pub fn assert_bound<V: Vendable>(id: RealId) {
    assert!(
        Registry::<V>::is_bound(id),
        "Expected {id} to be bound in the {} registry",
        V::type_name()
    );
}

/// Assert `id` has no mock bound in `V`'s registry
pub fn assert_unbound<V: Vendable>(id: RealId) {
    assert!(
        !Registry::<V>::is_bound(id),
        "Expected {id} not to be bound in the {} registry",
        V::type_name()
    );
}

/// Assert a teardown found nothing wrong
pub fn assert_clean_teardown(result: Result<(), TeardownReport>) {
    if let Err(report) = result {
        panic!("Expected a clean teardown, got: {report}");
    }
}

/// Assert a teardown failed, returning the report for further checks
pub fn expect_teardown_failures(result: Result<(), TeardownReport>) -> TeardownReport {
    match result {
        Ok(()) => panic!("Expected teardown failures, but the teardown was clean"),
        Err(report) => report,
    }
}

/// Assert the report lists `id` among the leaked objects of `V`
pub fn assert_leak_reported<V: Vendable>(report: &TeardownReport, id: RealId) {
    let listed = report.for_type(V::type_name()).any(|failure| match failure {
        Failure::LeakedBindings { listed, .. } => listed.iter().any(|leak| leak.real == id),
        Failure::UnconsumedQueue { .. } => false,
    });
    assert!(
        listed,
        "Expected {id} to be reported as leaked by {}, got: {report}",
        V::type_name()
    );
}

/// Assert the report counts `remaining` unconsumed mocks for `V`
pub fn assert_unconsumed_reported<V: Vendable>(report: &TeardownReport, remaining: usize) {
    let found = report
        .for_type(V::type_name())
        .find(|failure| failure.is_unconsumed_queue())
        .map(Failure::count);
    assert_eq!(
        found,
        Some(remaining),
        "Unconsumed mock count for {} doesn't match, report: {report}",
        V::type_name()
    );
}
