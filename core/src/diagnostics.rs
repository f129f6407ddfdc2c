//! Teardown failures and their bounded rendering
//!
//! When a registry's scope count drops to zero it checks two things: every
//! queued mock was vended, and every vended mock was destroyed. Each problem
//! becomes a [`Failure`]; the failures of one scoped vendor's teardown are
//! gathered into a [`TeardownReport`].

use std::fmt::{self, Write};
use thiserror::Error;

use crate::identity::{write_address, RealId};

/// A real object that was vended but never destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeakedBinding {
    pub real: RealId,
    /// Address of the mock allocation bound to `real`
    pub mock: usize,
}

/// One problem found by the teardown consistency check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// More mocks were queued than real objects were constructed
    UnconsumedQueue { type_name: &'static str, count: usize },
    /// Real objects were constructed but never destroyed
    LeakedBindings {
        type_name: &'static str,
        count: usize,
        listed: Vec<LeakedBinding>,
        truncated: bool,
    },
}

impl Failure {
    /// Build a leak failure listing at most `limit` of the given bindings
    pub fn leaked<I>(type_name: &'static str, bindings: I, limit: usize) -> Self
    where
        I: ExactSizeIterator<Item = LeakedBinding>,
    {
        let count = bindings.len();
        let listed: Vec<_> = bindings.take(limit).collect();
        let truncated = count > listed.len();
        Self::LeakedBindings {
            type_name,
            count,
            listed,
            truncated,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Failure::UnconsumedQueue { type_name, .. } => type_name,
            Failure::LeakedBindings { type_name, .. } => type_name,
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Failure::UnconsumedQueue { count, .. } => *count,
            Failure::LeakedBindings { count, .. } => *count,
        }
    }

    pub fn is_unconsumed_queue(&self) -> bool {
        matches!(self, Failure::UnconsumedQueue { .. })
    }

    pub fn is_leak(&self) -> bool {
        matches!(self, Failure::LeakedBindings { .. })
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::UnconsumedQueue { type_name, count } => write!(
                f,
                "Failure to consume all queued mocks for {type_name} - {count} remaining"
            ),
            Failure::LeakedBindings {
                type_name,
                count,
                listed,
                truncated,
            } => {
                write!(
                    f,
                    "Not all {type_name} mock instances were destroyed - {count} remaining"
                )?;
                for binding in listed {
                    write!(f, "\n   Real: {}   Mock: ", binding.real)?;
                    write_address(f, binding.mock)?;
                }
                if *truncated {
                    write!(f, "\n    More...")?;
                }
                Ok(())
            }
        }
    }
}

/// Failures gathered while one scoped vendor tore down its registries
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("Mock vendor teardown found {} failure(s){}", .failures.len(), render_failures(.failures))]
pub struct TeardownReport {
    failures: Vec<Failure>,
}

fn render_failures(failures: &[Failure]) -> String {
    let mut rendered = String::new();
    for failure in failures {
        // Writing into a String cannot fail
        let _ = write!(rendered, "\n{failure}");
    }
    rendered
}

impl TeardownReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    pub fn extend(&mut self, failures: impl IntoIterator<Item = Failure>) {
        self.failures.extend(failures);
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.failures
    }

    /// Failures reported for one mock type
    pub fn for_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Failure> + 'a {
        self.failures
            .iter()
            .filter(move |failure| failure.type_name() == type_name)
    }

    pub fn unconsumed_queues(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(|failure| failure.is_unconsumed_queue())
    }

    pub fn leaks(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(|failure| failure.is_leak())
    }

    /// `Ok` when nothing was found, otherwise the report itself
    pub fn into_result(self) -> Result<(), TeardownReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}
