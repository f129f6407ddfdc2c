//! Builders for configured mock handles
//!
//! Provides:
//! - One-shot configuration of a mockall mock into a shareable handle
//! - Batches of configured mocks, ready to queue in construction order

use std::marker::PhantomData;
use std::sync::Arc;

/// Helper to create configured mockall mocks.
///
/// Keeps the expectations for one mock in a dedicated block, separate from
/// the rest of the test.
///
/// ```
/// use mocks::{MockBuilder, MockObjD};
///
/// // from the closure parameter
/// let mock = MockBuilder::configure(|mock: &mut MockObjD| {
///     mock.expect_obj_d_func().times(1).return_const(());
/// });
///
/// // or from the builder generic
/// let other = MockBuilder::<MockObjD>::configure(|mock| {
///     mock.expect_obj_d_func().never();
/// });
/// # use mocks::ObjDBehavior;
/// # mock.obj_d_func();
/// # drop(other);
/// ```
pub struct MockBuilder<M: Default> {
    _mock: PhantomData<M>,
}

impl<M: Default> MockBuilder<M> {
    /// Create a mock and apply the given configuration to it
    pub fn configure(mock_config: impl FnOnce(&mut M)) -> Arc<M> {
        let mut mock = M::default();
        mock_config(&mut mock);
        Arc::new(mock)
    }

    /// Create `count` mocks, each configured with its position in the batch
    pub fn configure_each(count: usize, mut mock_config: impl FnMut(usize, &mut M)) -> Vec<Arc<M>> {
        (0..count)
            .map(|index| {
                let mut mock = M::default();
                mock_config(index, &mut mock);
                Arc::new(mock)
            })
            .collect()
    }
}
