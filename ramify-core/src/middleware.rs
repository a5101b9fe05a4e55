//! # Handler Layer (Middleware)
//!
//! Every handler a route stores has the same shape: it receives the request
//! context and a [`Next`] continuation, and decides whether to call the rest
//! of the chain.
//!
//! # Handler Shapes
//!
//! Whatever shape a handler is written in, it is normalized once, at
//! registration time, into a [`Handler`]:
//!
//! 1. **Struct implementation**: `impl Middleware<Ctx> for MyHandler`
//! 2. **Async closure**: [`from_fn`] with a closure returning a boxed future
//! 3. **Sync closure**: [`from_sync_fn`], which always continues the chain
//!
//! The dispatch engine never looks at the shape again after normalization.

use crate::error::BoxError;
use std::{fmt, future::Future, pin::Pin, sync::Arc};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A handler in a route chain.
///
/// This trait uses native `async fn` for zero-cost static dispatch.
/// Chains store handlers through [`DynMiddleware`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a middleware for context `{C}`",
    label = "missing `Middleware<{C}>` implementation",
    note = "Implement `Middleware<{C}>`, or wrap a closure with `from_fn` / `from_sync_fn`."
)]
pub trait Middleware<C>: Send + Sync + 'static {
    /// Handle the request, optionally running the remainder of the chain.
    fn call<'a>(
        &'a self,
        ctx: &'a mut C,
        next: Next<'a, C>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send + 'a;
}

/// Dynamic object-safe version of [`Middleware`].
pub trait DynMiddleware<C>: Send + Sync + 'static {
    /// Handle the request (dynamic dispatch version).
    fn call_dyn<'a>(&'a self, ctx: &'a mut C, next: Next<'a, C>)
    -> BoxFuture<'a, Result<(), BoxError>>;
}

// Blanket implementation: any Middleware is a DynMiddleware.
impl<C, T: Middleware<C>> DynMiddleware<C> for T {
    fn call_dyn<'a>(
        &'a self,
        ctx: &'a mut C,
        next: Next<'a, C>,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(self.call(ctx, next))
    }
}

/// A normalized, shareable handler.
pub type Handler<C> = Arc<dyn DynMiddleware<C>>;

/// Normalize a middleware into a [`Handler`].
pub fn handler<C, M>(middleware: M) -> Handler<C>
where
    C: Send + 'static,
    M: Middleware<C>,
{
    Arc::new(middleware)
}

// ============================================================================
// Continuation
// ============================================================================

/// The remainder of a chain, handed to each handler.
pub struct Next<'a, C> {
    rest: &'a [Handler<C>],
}

impl<'a, C> Next<'a, C> {
    /// A continuation over `handlers`.
    pub fn new(handlers: &'a [Handler<C>]) -> Self {
        Self { rest: handlers }
    }

    /// A continuation that does nothing.
    pub fn empty() -> Self {
        Self { rest: &[] }
    }

    /// Number of handlers still to run.
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    /// Run the remaining handlers.
    pub fn run<'b>(self, ctx: &'b mut C) -> BoxFuture<'b, Result<(), BoxError>>
    where
        'a: 'b,
        C: 'static,
    {
        match self.rest.split_first() {
            Some((head, tail)) => head.call_dyn(ctx, Next { rest: tail }),
            None => Box::pin(async { Ok(()) }),
        }
    }
}

impl<C> fmt::Debug for Next<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.rest.len())
            .finish()
    }
}

// ============================================================================
// Chains
// ============================================================================

/// An ordered list of handlers.
pub struct Chain<C> {
    handlers: Vec<Handler<C>>,
}

impl<C> Chain<C> {
    /// Create a chain from handlers.
    pub fn new(handlers: Vec<Handler<C>>) -> Self {
        Self { handlers }
    }

    /// Run the chain from the first handler.
    pub fn run<'a>(&'a self, ctx: &'a mut C) -> BoxFuture<'a, Result<(), BoxError>>
    where
        C: 'static,
    {
        Next::new(&self.handlers).run(ctx)
    }

    /// The handlers in order.
    pub fn handlers(&self) -> &[Handler<C>] {
        &self.handlers
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Consume the chain, returning its handlers.
    pub fn into_handlers(self) -> Vec<Handler<C>> {
        self.handlers
    }

    /// Whether `handler` is the handler at `index` (by identity).
    pub fn is_at(&self, index: usize, handler: &Handler<C>) -> bool {
        self.handlers
            .get(index)
            .is_some_and(|h| Arc::ptr_eq(h, handler))
    }
}

impl<C> Clone for Chain<C> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<C> Default for Chain<C> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

/// Chains compare equal when they hold the same handlers, by identity, in
/// the same order.
impl<C> PartialEq for Chain<C> {
    fn eq(&self, other: &Self) -> bool {
        self.handlers.len() == other.handlers.len()
            && self
                .handlers
                .iter()
                .zip(&other.handlers)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

impl<C> fmt::Debug for Chain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("len", &self.handlers.len())
            .finish()
    }
}

impl<C> FromIterator<Handler<C>> for Chain<C> {
    fn from_iter<I: IntoIterator<Item = Handler<C>>>(iter: I) -> Self {
        Self {
            handlers: iter.into_iter().collect(),
        }
    }
}

impl<C> From<Vec<Handler<C>>> for Chain<C> {
    fn from(handlers: Vec<Handler<C>>) -> Self {
        Self { handlers }
    }
}

// ============================================================================
// Closure adaptors
// ============================================================================

/// Middleware backed by an async closure. Built by [`from_fn`].
pub struct FnMiddleware<F>(F);

impl<C, F> Middleware<C> for FnMiddleware<F>
where
    C: Send + 'static,
    F: for<'a> Fn(&'a mut C, Next<'a, C>) -> BoxFuture<'a, Result<(), BoxError>>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        ctx: &'a mut C,
        next: Next<'a, C>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send + 'a {
        (self.0)(ctx, next)
    }
}

/// Wrap an async closure as middleware.
///
/// # Example
///
/// ```rust,ignore
/// let auth = from_fn(|ctx: &mut Ctx, next| {
///     Box::pin(async move {
///         if !ctx.is_authorized() {
///             return Err("unauthorized".into());
///         }
///         next.run(ctx).await
///     })
/// });
/// ```
pub fn from_fn<C, F>(f: F) -> FnMiddleware<F>
where
    C: Send + 'static,
    F: for<'a> Fn(&'a mut C, Next<'a, C>) -> BoxFuture<'a, Result<(), BoxError>>
        + Send
        + Sync
        + 'static,
{
    FnMiddleware(f)
}

/// Middleware backed by a synchronous closure. Built by [`from_sync_fn`].
pub struct SyncFnMiddleware<F>(F);

impl<C, F> Middleware<C> for SyncFnMiddleware<F>
where
    C: Send + 'static,
    F: Fn(&mut C) -> Result<(), BoxError> + Send + Sync + 'static,
{
    async fn call<'a>(&'a self, ctx: &'a mut C, next: Next<'a, C>) -> Result<(), BoxError> {
        (self.0)(ctx)?;
        next.run(ctx).await
    }
}

/// Wrap a synchronous closure as middleware. The chain always continues
/// unless the closure fails.
pub fn from_sync_fn<C, F>(f: F) -> SyncFnMiddleware<F>
where
    C: Send + 'static,
    F: Fn(&mut C) -> Result<(), BoxError> + Send + Sync + 'static,
{
    SyncFnMiddleware(f)
}
