//! # Dispatch Engine
//!
//! Selects the handler chain for a request by walking the route tree.
//!
//! For each node, in order:
//!
//! 1. **Domain gate**: a node bound to a domain is skipped unless the
//!    request hostname equals it. Hostnames are compared ignoring ASCII
//!    case. Its children are still searched.
//! 2. **Path test**: the whole request path must match the node's pattern.
//! 3. **Handler existence**: a node whose path matches is only selected when
//!    it has a `REDIRECT`, `STATIC`, exact-method or `ALL` chain, in that
//!    priority order.
//! 4. **Nested descent**: otherwise children are tried in registration
//!    order; the first that matches wins.
//!
//! The selected chain is prefixed with the before-hooks of every node on the
//! way down, outermost first. Dispatch only reads the tree, so any number of
//! dispatches may run concurrently against a shared tree.

use crate::node::{ANY_DOMAIN, RouteNode};
use ramify_core::{Chain, Handler, Method, Params, RequestDescriptor};
use std::fmt;

/// Options that change how dispatch filters nodes.
///
/// The domain gate always compares hostnames ignoring ASCII case, so
/// `Example.COM` reaches a node bound to `example.com`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOptions {
    /// Also accept a domain-bound node when the request path contains the
    /// request hostname. Default: `false`.
    pub legacy_host_in_path: bool,
}

impl DispatchOptions {
    /// Create the default options.
    pub const fn new() -> Self {
        Self {
            legacy_host_in_path: false,
        }
    }

    /// Enable or disable the host-in-path domain fallback.
    pub const fn legacy_host_in_path(mut self, enabled: bool) -> Self {
        self.legacy_host_in_path = enabled;
        self
    }
}

/// Which slot of the matched node supplied the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The node's redirect chain.
    Redirect,
    /// The node's static-asset chain.
    Static,
    /// The chain registered for the request's own method.
    Method(Method),
    /// The `ALL` fallback chain.
    All,
}

/// A successful dispatch.
pub struct RouteMatch<C> {
    /// Before-hooks from the root down, followed by the selected chain.
    pub chain: Chain<C>,
    /// Values bound from the path. `None` for redirect and static matches,
    /// which are selected before parameters are extracted.
    pub params: Option<Params>,
    /// Where the selected chain came from.
    pub kind: MatchKind,
}

impl<C> RouteMatch<C> {
    /// Run the chain against `ctx`.
    pub async fn run(&self, ctx: &mut C) -> Result<(), ramify_core::BoxError>
    where
        C: 'static,
    {
        self.chain.run(ctx).await
    }
}

impl<C> Clone for RouteMatch<C> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
            params: self.params.clone(),
            kind: self.kind,
        }
    }
}

impl<C> PartialEq for RouteMatch<C> {
    fn eq(&self, other: &Self) -> bool {
        self.chain == other.chain && self.params == other.params && self.kind == other.kind
    }
}

impl<C> fmt::Debug for RouteMatch<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("chain", &self.chain)
            .field("params", &self.params)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Result of dispatching a request.
pub enum DispatchResult<C> {
    /// A chain was selected.
    Matched(RouteMatch<C>),
    /// No node accepted the request.
    NotFound,
}

impl<C> DispatchResult<C> {
    /// Returns true if a chain was selected.
    pub fn is_matched(&self) -> bool {
        matches!(self, DispatchResult::Matched(_))
    }

    /// Returns the match, if any.
    pub fn matched(self) -> Option<RouteMatch<C>> {
        match self {
            DispatchResult::Matched(m) => Some(m),
            DispatchResult::NotFound => None,
        }
    }
}

impl<C> Clone for DispatchResult<C> {
    fn clone(&self) -> Self {
        match self {
            DispatchResult::Matched(m) => DispatchResult::Matched(m.clone()),
            DispatchResult::NotFound => DispatchResult::NotFound,
        }
    }
}

impl<C> PartialEq for DispatchResult<C> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DispatchResult::Matched(a), DispatchResult::Matched(b)) => a == b,
            (DispatchResult::NotFound, DispatchResult::NotFound) => true,
            _ => false,
        }
    }
}

impl<C> fmt::Debug for DispatchResult<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchResult::Matched(m) => f.debug_tuple("Matched").field(m).finish(),
            DispatchResult::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Something requests can be dispatched against.
pub trait Dispatch<C> {
    /// Select the chain for `request`.
    fn dispatch(&self, request: &dyn RequestDescriptor) -> DispatchResult<C>;

    /// Check whether any chain would be selected for `request`.
    fn contains(&self, request: &dyn RequestDescriptor) -> bool {
        self.dispatch(request).is_matched()
    }
}

struct Selection<'n, C> {
    handlers: &'n [Handler<C>],
    kind: MatchKind,
    captures: Option<Vec<Option<String>>>,
    node: &'n RouteNode<C>,
}

impl<C> RouteNode<C> {
    /// Dispatch with explicit options.
    pub fn dispatch_with(
        &self,
        request: &dyn RequestDescriptor,
        options: DispatchOptions,
    ) -> DispatchResult<C> {
        let method = request.method().parse::<Method>().ok();
        let mut hooks = Vec::new();

        let Some(selection) = self.find(request, method, options, &mut hooks) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                method = %request.method(),
                host = %request.hostname(),
                path = %request.path(),
                "no route matched"
            );
            return DispatchResult::NotFound;
        };

        // Hooks were collected on the way back up, innermost first.
        let chain: Chain<C> = hooks
            .iter()
            .rev()
            .flat_map(|before| before.iter())
            .chain(selection.handlers)
            .cloned()
            .collect();
        let params = selection
            .captures
            .map(|captures| selection.node.pattern.bind(captures));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = %request.method(),
            path = %request.path(),
            pattern = %selection.node.pattern.as_regex().as_str(),
            kind = ?selection.kind,
            handlers = chain.len(),
            "route matched"
        );

        DispatchResult::Matched(RouteMatch {
            chain,
            params,
            kind: selection.kind,
        })
    }

    fn find<'n>(
        &'n self,
        request: &dyn RequestDescriptor,
        method: Option<Method>,
        options: DispatchOptions,
        hooks: &mut Vec<&'n [Handler<C>]>,
    ) -> Option<Selection<'n, C>> {
        if self.accepts_host(request, options) {
            if let Some(selection) = self.select(request.path(), method) {
                hooks.push(&self.before);
                return Some(selection);
            }
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(domain = %self.domain, host = %request.hostname(), "domain rejected");
        }

        for child in &self.children {
            if let Some(selection) = child.find(request, method, options, hooks) {
                hooks.push(&self.before);
                return Some(selection);
            }
        }
        None
    }

    fn select(&self, path: &str, method: Option<Method>) -> Option<Selection<'_, C>> {
        let captures = self.pattern.exec(path)?;

        if let Some(redirect) = &self.redirect {
            return Some(self.selection(redirect, MatchKind::Redirect, None));
        }
        if let Some(files) = &self.static_files {
            return Some(self.selection(files, MatchKind::Static, None));
        }

        let exact = method
            .filter(|m| !m.is_all())
            .and_then(|m| self.methods.get(&m).map(|handlers| (handlers, MatchKind::Method(m))));
        let found = exact
            .or_else(|| self.methods.get(&Method::All).map(|handlers| (handlers, MatchKind::All)))
            .map(|(handlers, kind)| self.selection(handlers, kind, Some(captures)));

        #[cfg(feature = "tracing")]
        if found.is_none() {
            tracing::trace!(
                pattern = %self.pattern.as_regex().as_str(),
                "path matched but no handler registered"
            );
        }
        found
    }

    fn selection<'n>(
        &'n self,
        handlers: &'n [Handler<C>],
        kind: MatchKind,
        captures: Option<Vec<Option<String>>>,
    ) -> Selection<'n, C> {
        Selection {
            handlers,
            kind,
            captures,
            node: self,
        }
    }

    fn accepts_host(&self, request: &dyn RequestDescriptor, options: DispatchOptions) -> bool {
        if self.domain == ANY_DOMAIN {
            return true;
        }
        let host = request.hostname();
        self.domain.eq_ignore_ascii_case(host)
            || (options.legacy_host_in_path && request.path().contains(host))
    }
}

impl<C> Dispatch<C> for RouteNode<C> {
    fn dispatch(&self, request: &dyn RequestDescriptor) -> DispatchResult<C> {
        self.dispatch_with(request, DispatchOptions::default())
    }
}
