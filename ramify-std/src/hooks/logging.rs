//! Logging hook for request observation.

use ramify_core::{BoxError, Middleware, Next, RequestDescriptor};

/// A hook that logs each request passing through a chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl<C: RequestDescriptor + Send + 'static> Middleware<C> for LoggingMiddleware {
    async fn call<'a>(&'a self, ctx: &'a mut C, next: Next<'a, C>) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::info!(
                method = %ctx.method(),
                host = %ctx.hostname(),
                path = %ctx.path(),
                "handling request"
            );
        }
        let result = next.run(&mut *ctx).await;
        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::warn!(path = %ctx.path(), error = %err, "request failed");
        }
        result
    }
}
