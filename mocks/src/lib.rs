//! Sample vendable hierarchy and test utilities for the mock vendor
//!
//! This crate provides:
//! - Real-type stand-ins `ObjA` to `ObjH` wired to the vendor
//! - Behavior traits and their mockall mocks
//! - Permissive default mocks
//! - A builder for configured mocks, assertion helpers and contract checks
//! - Property-based testing strategies for registry lifecycles

pub mod assertions;
pub mod behaviors;
pub mod builders;
pub mod contracts;
pub mod fixtures;
pub mod generators;
pub mod objects;

pub use assertions::*;
pub use behaviors::*;
pub use builders::*;
pub use contracts::*;
pub use fixtures::*;
pub use generators::*;
pub use objects::*;
