//! Route tree nodes and their configuration operations.
//!
//! A [`RouteNode`] owns its children outright; there are no back-pointers.
//! Configuration takes `&mut self` and dispatch takes `&self`, so the
//! borrow checker keeps the two phases apart.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut api = RouteNode::new("/api")?;
//! api.before(chain![Auth]);
//!
//! let users = api.nest("/users/:id")?;
//! users.get(chain![ShowUser]).delete(chain![DeleteUser]);
//! ```

use crate::handlers::{AssetSender, RedirectTo, StaticFiles};
use ramify_core::{
    Handler, IntoPathPattern, Method, MethodError, PathPattern, PatternError, PatternOptions,
    Redirect, RequestDescriptor, handler,
};
use std::{collections::HashMap, fmt, path::PathBuf};

/// The domain filter that accepts every hostname.
pub const ANY_DOMAIN: &str = "*";

/// A node in the route tree.
pub struct RouteNode<C> {
    pub(crate) domain: String,
    pub(crate) pattern: PathPattern,
    pub(crate) methods: HashMap<Method, Vec<Handler<C>>>,
    pub(crate) redirect: Option<Vec<Handler<C>>>,
    pub(crate) static_files: Option<Vec<Handler<C>>>,
    pub(crate) before: Vec<Handler<C>>,
    pub(crate) children: Vec<RouteNode<C>>,
}

impl<C> RouteNode<C> {
    /// Create a node for a path template (or pre-compiled pattern) with
    /// default compile options.
    pub fn new(path: impl IntoPathPattern) -> Result<Self, PatternError> {
        Self::with_options(path, PatternOptions::default())
    }

    /// Create a node with explicit compile options.
    pub fn with_options(
        path: impl IntoPathPattern,
        options: PatternOptions,
    ) -> Result<Self, PatternError> {
        Ok(Self::from_pattern(path.into_path_pattern(options)?))
    }

    /// Create a node bound to a domain.
    pub fn with_domain(
        path: impl IntoPathPattern,
        domain: impl Into<String>,
    ) -> Result<Self, PatternError> {
        let mut node = Self::new(path)?;
        node.domain = domain.into();
        Ok(node)
    }

    /// Create a node from an already compiled pattern.
    pub fn from_pattern(pattern: PathPattern) -> Self {
        Self {
            domain: ANY_DOMAIN.to_string(),
            pattern,
            methods: HashMap::new(),
            redirect: None,
            static_files: None,
            before: Vec::new(),
            children: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Method registration
    // ------------------------------------------------------------------------

    /// Register the chain for `method`, replacing any earlier registration.
    pub fn on(
        &mut self,
        method: Method,
        handlers: impl IntoIterator<Item = Handler<C>>,
    ) -> &mut Self {
        self.methods.insert(method, handlers.into_iter().collect());
        self
    }

    /// Register the chain for a method given by name, in any case.
    pub fn register(
        &mut self,
        method: &str,
        handlers: impl IntoIterator<Item = Handler<C>>,
    ) -> Result<&mut Self, MethodError> {
        let method = method.parse::<Method>()?;
        Ok(self.on(method, handlers))
    }

    /// Register the `GET` chain.
    pub fn get(&mut self, handlers: impl IntoIterator<Item = Handler<C>>) -> &mut Self {
        self.on(Method::Get, handlers)
    }

    /// Register the `POST` chain.
    pub fn post(&mut self, handlers: impl IntoIterator<Item = Handler<C>>) -> &mut Self {
        self.on(Method::Post, handlers)
    }

    /// Register the `PUT` chain.
    pub fn put(&mut self, handlers: impl IntoIterator<Item = Handler<C>>) -> &mut Self {
        self.on(Method::Put, handlers)
    }

    /// Register the `PATCH` chain.
    pub fn patch(&mut self, handlers: impl IntoIterator<Item = Handler<C>>) -> &mut Self {
        self.on(Method::Patch, handlers)
    }

    /// Register the `DELETE` chain.
    pub fn delete(&mut self, handlers: impl IntoIterator<Item = Handler<C>>) -> &mut Self {
        self.on(Method::Delete, handlers)
    }

    /// Register the `HEAD` chain.
    pub fn head(&mut self, handlers: impl IntoIterator<Item = Handler<C>>) -> &mut Self {
        self.on(Method::Head, handlers)
    }

    /// Register the `OPTIONS` chain.
    pub fn options(&mut self, handlers: impl IntoIterator<Item = Handler<C>>) -> &mut Self {
        self.on(Method::Options, handlers)
    }

    /// Register the fallback chain used when no chain exists for the
    /// request's method.
    pub fn all(&mut self, handlers: impl IntoIterator<Item = Handler<C>>) -> &mut Self {
        self.on(Method::All, handlers)
    }

    // ------------------------------------------------------------------------
    // Node configuration
    // ------------------------------------------------------------------------

    /// Restrict this node to a hostname. `"*"` accepts any host.
    pub fn set_domain(&mut self, domain: impl Into<String>) -> &mut Self {
        self.domain = domain.into();
        self
    }

    /// Set the hooks run ahead of any chain selected at or below this node.
    ///
    /// Replaces the previous hooks; calling it twice keeps only the second set.
    pub fn before(&mut self, handlers: impl IntoIterator<Item = Handler<C>>) -> &mut Self {
        self.before = handlers.into_iter().collect();
        self
    }

    /// Add a child whose path is this node's path followed by `suffix`.
    ///
    /// The child starts with no hooks and no handlers, and is returned for
    /// further configuration.
    pub fn nest(&mut self, suffix: &str) -> Result<&mut RouteNode<C>, PatternError> {
        let child = RouteNode::from_pattern(self.pattern.concat(suffix)?);
        let index = self.children.len();
        self.children.push(child);
        Ok(&mut self.children[index])
    }

    /// Redirect every request matching this node's path to `target`,
    /// whatever its method.
    pub fn redirect(&mut self, target: impl Into<String>) -> &mut Self
    where
        C: Redirect + Send + 'static,
    {
        self.redirect = Some(vec![handler(RedirectTo::new(target))]);
        self
    }

    /// Serve static assets below `root` for `GET` and `HEAD` requests.
    ///
    /// `strip` is removed from the request path before it is resolved
    /// against `root`. Missing assets and other methods fall through to the
    /// next handler.
    pub fn static_root<S>(
        &mut self,
        root: impl Into<PathBuf>,
        strip: Option<&str>,
        sender: S,
    ) -> &mut Self
    where
        C: RequestDescriptor + Send + 'static,
        S: AssetSender<C>,
    {
        let files = StaticFiles::new(root, sender).strip_prefix(strip);
        self.static_files = Some(vec![handler(files)]);
        self
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// The domain filter.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The compiled path pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// The chain registered for `method`, if any.
    pub fn handlers(&self, method: Method) -> Option<&[Handler<C>]> {
        self.methods.get(&method).map(Vec::as_slice)
    }

    /// The before-hooks.
    pub fn before_hooks(&self) -> &[Handler<C>] {
        &self.before
    }

    /// The nested routes, in registration order.
    pub fn children(&self) -> &[RouteNode<C>] {
        &self.children
    }

    /// Mutable access to the nested routes.
    pub fn children_mut(&mut self) -> &mut [RouteNode<C>] {
        &mut self.children
    }

    /// Whether this node redirects.
    pub fn is_redirect(&self) -> bool {
        self.redirect.is_some()
    }

    /// Whether this node serves static assets.
    pub fn is_static(&self) -> bool {
        self.static_files.is_some()
    }

    /// Whether any chain is registered on this node itself.
    pub fn has_handlers(&self) -> bool {
        self.redirect.is_some() || self.static_files.is_some() || !self.methods.is_empty()
    }
}

impl<C> fmt::Debug for RouteNode<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<_> = self.methods.keys().map(Method::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("RouteNode")
            .field("domain", &self.domain)
            .field("pattern", &self.pattern)
            .field("methods", &methods)
            .field("redirect", &self.redirect.is_some())
            .field("static", &self.static_files.is_some())
            .field("before", &self.before.len())
            .field("children", &self.children)
            .finish()
    }
}
