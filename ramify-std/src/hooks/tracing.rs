//! Span instrumentation for chains.

use ramify_core::{BoxError, Middleware, Next, RequestDescriptor};

#[cfg(feature = "tracing")]
use tracing::Instrument;

/// Trait for contexts that carry distributed tracing identifiers.
///
/// Implementing this lets [`TracingMiddleware`] link its span to a parent
/// span propagated with the request (e.g. from HTTP headers).
pub trait Traceable {
    /// Return the Trace ID if available (e.g. "4bf92f3577b34da6a3ce929d0e0e4736").
    fn trace_id(&self) -> Option<&str> {
        None
    }

    /// Return the Span ID of the parent span if available.
    fn span_id(&self) -> Option<&str> {
        None
    }
}

/// A wrapper that runs a handler, and everything after it, inside a
/// `tracing` span.
///
/// Registered as a before-hook it covers the whole selected chain.
pub struct TracingMiddleware<M> {
    inner: M,
    name: &'static str,
}

impl<M> TracingMiddleware<M> {
    /// Wrap `inner` in a span called `name`.
    pub const fn new(inner: M, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The span name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<M: Clone> Clone for TracingMiddleware<M> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<C, M> Middleware<C> for TracingMiddleware<M>
where
    C: RequestDescriptor + Traceable + Send + 'static,
    M: Middleware<C>,
{
    #[cfg(feature = "tracing")]
    async fn call<'a>(&'a self, ctx: &'a mut C, next: Next<'a, C>) -> Result<(), BoxError> {
        let span = match ctx.trace_id() {
            Some(trace_id) => tracing::info_span!(
                "request",
                handler = %self.name,
                method = %ctx.method(),
                path = %ctx.path(),
                trace_id = %trace_id,
                span_id = %ctx.span_id().unwrap_or(""),
            ),
            None => tracing::info_span!(
                "request",
                handler = %self.name,
                method = %ctx.method(),
                path = %ctx.path(),
            ),
        };

        self.inner.call(ctx, next).instrument(span).await
    }

    #[cfg(not(feature = "tracing"))]
    async fn call<'a>(&'a self, ctx: &'a mut C, next: Next<'a, C>) -> Result<(), BoxError> {
        self.inner.call(ctx, next).await
    }
}
