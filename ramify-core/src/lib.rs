//! # ramify-core
//!
//! Core types for the ramify route dispatch engine.
//!
//! This crate has minimal dependencies and holds everything a route tree is
//! built from, without the tree itself:
//!
//! - **Patterns**: [`PathPattern`] compiles path templates (`/users/:id`)
//!   into anchored matchers and concatenates them for nested routes.
//! - **Methods**: [`Method`] is the fixed method enumeration plus the
//!   synthetic `ALL` slot.
//! - **Requests**: [`RequestDescriptor`] is what dispatch reads from a
//!   request; [`Params`] is what it extracts.
//! - **Handlers**: [`Middleware`] is the single handler shape, with
//!   [`Chain`] and [`Next`] for running a selected chain.
//!
//! # Error Types
//!
//! - [`RamifyError`] - Top-level error type
//! - [`PatternError`] - Malformed path templates
//! - [`MethodError`] - Unknown method names
//! - [`DecodeError`] - Percent-decoding failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod method;
mod middleware;
mod pattern;
mod request;

// Re-exports
pub use context::{Redirect, ServeFile};
pub use error::{BoxError, DecodeError, MethodError, PatternError, RamifyError};
pub use method::Method;
pub use middleware::{
    BoxFuture, Chain, DynMiddleware, FnMiddleware, Handler, Middleware, Next, SyncFnMiddleware,
    from_fn, from_sync_fn, handler,
};
pub use pattern::{IntoPathPattern, PathPattern, PatternOptions};
pub use request::{Params, Request, RequestDescriptor};

/// Re-exported so callers can pass pre-compiled patterns without adding the
/// dependency themselves.
pub use regex::Regex;
