//! # ramify-std
//!
//! The route tree and dispatch engine for ramify.
//!
//! This crate provides:
//! - **Route tree**: [`RouteNode`], [`Router`], [`RouterBuilder`]
//! - **Dispatch**: [`Dispatch`], [`DispatchResult`], [`RouteMatch`]
//! - **Built-in handlers**: redirects and static assets ([`handlers`])
//! - **Standard hooks**: Logging, Tracing ([`hooks`])
//! - **Testing helpers**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use ramify_core;

// Modules
pub mod dispatch;
pub mod handlers;
pub mod hooks;
pub mod node;
pub mod router;
pub mod testing;

pub use dispatch::{Dispatch, DispatchOptions, DispatchResult, MatchKind, RouteMatch};
pub use node::{ANY_DOMAIN, RouteNode};
pub use router::{Router, RouterBuilder};
