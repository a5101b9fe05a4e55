//! # ramify - Hierarchical Path and Domain Dispatch
//!
//! `ramify` decides which chain of handlers runs for an HTTP request. Routes
//! form a tree: each node has a path template, an optional domain, chains
//! per method and before-hooks that apply to everything below it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ramify::prelude::*;
//!
//! let mut router = Router::new();
//! router.root_mut().before(chain![LoggingMiddleware]);
//!
//! let users = router.route("/users/:id")?;
//! users.before(chain![Authenticate]);
//! users.get(chain![ShowUser]).delete(chain![DeleteUser]);
//! users.nest("/posts/:post")?.get(chain![ShowPost]);
//!
//! router.route("/old-home")?.redirect("/");
//! router.route("/assets/*")?.static_root("public", Some("/assets"), FsAssets);
//!
//! // Per request:
//! if let Some(matched) = router.dispatch(&ctx).matched() {
//!     matched.run(&mut ctx).await?;
//! }
//! ```
//!
//! ## Matching Order
//!
//! Nodes are tried depth-first in registration order. A node is selected
//! when its domain accepts the host, its pattern matches the whole path and
//! it has a chain to run; the first such node wins.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use ramify_core::{
    // Error types
    BoxError,
    // Handlers
    BoxFuture,
    Chain,
    DecodeError,
    DynMiddleware,
    FnMiddleware,
    Handler,
    // Methods
    Method,
    MethodError,
    Middleware,
    Next,
    // Requests
    Params,
    // Patterns
    PathPattern,
    PatternError,
    PatternOptions,
    RamifyError,
    // Context capabilities
    Redirect,
    Regex,
    Request,
    RequestDescriptor,
    ServeFile,
    SyncFnMiddleware,
    from_fn,
    from_sync_fn,
    handler,
};

// Route tree and dispatch
pub use ramify_std::{
    ANY_DOMAIN, Dispatch, DispatchOptions, DispatchResult, MatchKind, RouteMatch, RouteNode,
    Router, RouterBuilder,
};

/// Built-in redirect and static-asset handlers.
pub mod handlers {
    #![allow(clippy::wildcard_imports)]
    pub use ramify_std::handlers::*;
}

/// Standard hook implementations.
pub mod hooks {
    #![allow(clippy::wildcard_imports)]
    pub use ramify_std::hooks::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use ramify_std::testing::*;
}

/// Build a handler list from middleware values.
///
/// Each value is normalized with [`handler`], so struct middleware and
/// closures wrapped by [`from_fn`] or [`from_sync_fn`] can be mixed.
///
/// ```rust,ignore
/// node.get(chain![Authenticate, from_sync_fn(|ctx: &mut Ctx| { ... }), ShowUser]);
/// ```
#[macro_export]
macro_rules! chain {
    ($($middleware:expr),* $(,)?) => {
        ::std::vec![$($crate::handler($middleware)),*]
    };
}

/// Prelude module - common imports for ramify.
///
/// # Usage
///
/// ```rust,ignore
/// use ramify::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Chain, Dispatch, DispatchResult, Handler, Method, Middleware, Next, Params,
        Redirect, RequestDescriptor, RouteMatch, RouteNode, Router, ServeFile, chain, from_fn,
        from_sync_fn, handler,
        hooks::{LoggingMiddleware, TracingMiddleware},
    };

    #[cfg(feature = "fs")]
    pub use crate::handlers::FsAssets;
}
