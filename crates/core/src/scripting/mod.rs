//! Loading generator scripts across the plugin boundary.
//!
//! Scripts run in a child Python interpreter hosting an embedded bridge
//! program; the rest of the adapter only sees [`executor::ScriptModule`].

pub mod executor;
pub mod python;
pub mod registry;
pub mod subprocess;

#[cfg(any(test, feature = "testing"))]
pub mod memory;
