#![deny(unsafe_code)]

//! Shared test utilities for the panelgate workspace.
//!
//! Provides reusable fixtures, config builders, and tracing helpers so that
//! individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! panelgate-test-utils = { workspace = true }
//! ```

pub mod config;
#[cfg(unix)]
pub mod fake_binary;
pub mod mock_panel;
pub mod tracing_setup;
