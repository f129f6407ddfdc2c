//! Property-based testing strategies for registry lifecycles
//!
//! A lifecycle is a sequence of steps a test and its code under test could
//! take against one registry. [`LifecycleModel`] predicts what the teardown
//! check should report after replaying it.

use proptest::prelude::*;

/// One step against a single registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    /// The test queues a mock
    Queue,
    /// Code under test constructs a real object
    Construct,
    /// The oldest live object is dropped, if there is one
    DropOldest,
    /// The newest live object is leaked
    Leak,
}

pub fn lifecycle_step() -> impl Strategy<Value = LifecycleStep> {
    prop_oneof![
        3 => Just(LifecycleStep::Queue),
        3 => Just(LifecycleStep::Construct),
        2 => Just(LifecycleStep::DropOldest),
        1 => Just(LifecycleStep::Leak),
    ]
}

pub fn lifecycle(max_steps: usize) -> impl Strategy<Value = Vec<LifecycleStep>> {
    prop::collection::vec(lifecycle_step(), 0..=max_steps)
}

/// Tags for mocks that are told apart by value
pub fn mock_tags(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..10_000, 1..=max_len)
}

/// Expected registry state after replaying a lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleModel {
    /// Mocks queued and not yet vended
    pub queued: usize,
    /// Objects constructed and neither dropped nor leaked
    pub live: usize,
    /// Objects that will never be dropped
    pub leaked: usize,
    /// Objects that received a queued mock rather than a default one
    pub vended_from_queue: usize,
}

impl LifecycleModel {
    pub fn replay(steps: &[LifecycleStep]) -> Self {
        let mut model = Self::default();
        for step in steps {
            model.apply(*step);
        }
        model
    }

    pub fn apply(&mut self, step: LifecycleStep) {
        match step {
            LifecycleStep::Queue => self.queued += 1,
            LifecycleStep::Construct => {
                if self.queued > 0 {
                    self.queued -= 1;
                    self.vended_from_queue += 1;
                }
                self.live += 1;
            }
            LifecycleStep::DropOldest => self.live = self.live.saturating_sub(1),
            LifecycleStep::Leak => {
                if self.live > 0 {
                    self.live -= 1;
                    self.leaked += 1;
                }
            }
        }
    }

    /// Failures the teardown should report once live objects are dropped
    pub fn expected_failures(&self) -> usize {
        usize::from(self.queued > 0) + usize::from(self.leaked > 0)
    }
}
