//! The application-level route tree.

use crate::{
    dispatch::{Dispatch, DispatchOptions, DispatchResult},
    node::RouteNode,
};
use ramify_core::{PathPattern, PatternError, PatternOptions, RequestDescriptor};

/// Owns the root of a route tree.
///
/// The root has an empty path and no handlers of its own; routes are added
/// below it with [`route`](Router::route). Before-hooks set on the root apply
/// to every route. Once built, a router can be shared behind an `Arc` and
/// dispatched against from any number of tasks.
///
/// # Example
///
/// ```rust,ignore
/// let mut router = Router::new();
/// router.root_mut().before(chain![LoggingMiddleware]);
/// router.route("/users/:id")?.get(chain![ShowUser]);
///
/// match router.dispatch(&request) {
///     DispatchResult::Matched(m) => m.run(&mut ctx).await?,
///     DispatchResult::NotFound => not_found(&mut ctx),
/// }
/// ```
#[derive(Debug)]
pub struct Router<C> {
    root: RouteNode<C>,
    options: DispatchOptions,
}

impl<C> Router<C> {
    /// Create a router with default options. Use [`RouterBuilder`] to
    /// change them.
    pub fn new() -> Self {
        RouterBuilder::new().build()
    }

    /// Add a top-level route for `path` and return it for configuration.
    pub fn route(&mut self, path: &str) -> Result<&mut RouteNode<C>, PatternError> {
        self.root.nest(path)
    }

    /// The root node.
    pub fn root(&self) -> &RouteNode<C> {
        &self.root
    }

    /// Mutable access to the root node.
    pub fn root_mut(&mut self) -> &mut RouteNode<C> {
        &mut self.root
    }

    /// The dispatch options.
    pub fn options(&self) -> DispatchOptions {
        self.options
    }
}

impl<C> Default for Router<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Dispatch<C> for Router<C> {
    fn dispatch(&self, request: &dyn RequestDescriptor) -> DispatchResult<C> {
        self.root.dispatch_with(request, self.options)
    }
}

/// Builder for [`Router`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RouterBuilder {
    patterns: PatternOptions,
    dispatch: DispatchOptions,
}

impl RouterBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match route paths case-sensitively.
    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.patterns = self.patterns.sensitive(sensitive);
        self
    }

    /// Treat trailing slashes as significant.
    pub fn strict(mut self, strict: bool) -> Self {
        self.patterns = self.patterns.strict(strict);
        self
    }

    /// Enable the host-in-path domain fallback.
    pub fn legacy_host_in_path(mut self, enabled: bool) -> Self {
        self.dispatch = self.dispatch.legacy_host_in_path(enabled);
        self
    }

    /// Build the router.
    pub fn build<C>(self) -> Router<C> {
        Router {
            root: RouteNode::from_pattern(PathPattern::root(self.patterns)),
            options: self.dispatch,
        }
    }
}
