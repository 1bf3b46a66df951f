#![deny(unsafe_code)]

//! Panelgate core client library.
//!
//! Provides one client contract over the two generations of the hosting
//! panel's RPC surface (the unified UAPI interface and the older API 2
//! interface), backed by either local command execution or an authenticated
//! HTTP endpoint. Callers pick a transport once at construction and invoke
//! operations uniformly afterwards.

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future — the standard return type for async
/// trait methods that require dynamic dispatch (`dyn Trait`).
///
/// Native `async fn` in traits (stable since Rust 1.75) produces opaque return
/// types that are **not** object-safe. Traits consumed via `Box<dyn Trait>` or
/// `&dyn Trait` must return a concrete `Pin<Box<dyn Future>>` instead. This
/// alias keeps those signatures readable.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Client facade over a chosen transport.
pub mod client;
/// Per-call execution context (deadline).
pub mod context;
/// Response envelope shapes and decoding for both API generations.
pub mod envelope;
/// Error taxonomy for all client operations.
pub mod error;
/// Host-environment probe for construction-time transport selection.
pub mod host;
/// Typed call-site bindings for individual panel operations.
pub mod ops;
/// Transport trait and the local/remote implementations.
pub mod transport;

pub use client::PanelClient;
pub use context::CallContext;
pub use error::PanelError;
pub use host::HostIdentity;
pub use transport::{Args, Generation, Transport};
