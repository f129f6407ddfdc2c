//! Mock Vendor Core Library
//!
//! This crate hands pre-configured mocks to real objects as they are
//! constructed, so a test can set expectations on objects it never builds
//! itself. Every real type has a registry; a test queues mocks in it, the
//! real type's constructor takes the next one, its methods forward to it, and
//! its `Drop` gives it back. Mocks vended for a derived type are installed in
//! every base type's registry as well, so a call made through a base answers
//! from the same mock.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`vendable`] - The [`Vendable`] and [`Inherits`] traits real types implement
//! - [`registry`] - Per-type registries: vend, destroy, rebind, look up
//! - [`links`] - Base links and their propagation
//! - [`scope`] - [`ScopedVendor`], the test-side guard with teardown checks
//! - [`diagnostics`] - Teardown failures and their rendering
//! - [`identity`] - Real-object identities and mock addresses
//! - [`error`] - Error types and result handling
//! - [`config`] - Layered configuration
//! - [`telemetry`] - Test logging setup
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use mock_vendor::{RealId, Registry, ScopedVendor, Vendable};
//!
//! pub trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct Fixed(u64);
//!
//! impl Clock for Fixed {
//!     fn now(&self) -> u64 {
//!         self.0
//!     }
//! }
//!
//! // The production type, reduced to forwarding
//! struct SystemClock {
//!     id: RealId,
//! }
//!
//! impl SystemClock {
//!     fn new() -> Self {
//!         let id = RealId::next();
//!         Registry::<SystemClock>::vend(id);
//!         Self { id }
//!     }
//!
//!     fn now(&self) -> u64 {
//!         Registry::<SystemClock>::mock(self.id).now()
//!     }
//! }
//!
//! impl Drop for SystemClock {
//!     fn drop(&mut self) {
//!         Registry::<SystemClock>::destroy(self.id);
//!     }
//! }
//!
//! impl Vendable for SystemClock {
//!     type Mock = dyn Clock;
//!
//!     fn nice_mock() -> Arc<dyn Clock> {
//!         Arc::new(Fixed(0))
//!     }
//! }
//!
//! let vendor = ScopedVendor::<SystemClock>::new();
//! vendor.queue_mock(Arc::new(Fixed(42)));
//!
//! let clock = SystemClock::new();
//! assert_eq!(clock.now(), 42);
//! drop(clock);
//!
//! vendor.finish().unwrap();
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod identity;
pub mod links;
pub mod registry;
pub mod scope;
pub mod telemetry;
pub mod vendable;

#[cfg(test)]
mod testing;

// Re-export commonly used types at the crate root for convenience
pub use config::{LogFormat, LoggingConfig, VendorConfig, DEFAULT_LEAK_REPORT_LIMIT};
pub use diagnostics::{Failure, LeakedBinding, TeardownReport};
pub use error::{Result, VendorError};
pub use identity::{mock_address, RealId, ADDRESS_WIDTH};
pub use links::{base_links_of, declare_base_link, BaseLink};
pub use registry::{configure, current_config, Registry};
pub use scope::ScopedVendor;
pub use telemetry::init_test_logging;
pub use vendable::{Bases, Inherits, Vendable};

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
