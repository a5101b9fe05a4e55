//! Redirect handler installed by [`RouteNode::redirect`](crate::RouteNode::redirect).

use ramify_core::{BoxError, Middleware, Next, Redirect};

/// Redirects every request to a fixed location and ends the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTo {
    target: String,
}

impl RedirectTo {
    /// Create a redirect to `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// The redirect location.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl<C: Redirect + Send + 'static> Middleware<C> for RedirectTo {
    async fn call<'a>(&'a self, ctx: &'a mut C, _next: Next<'a, C>) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(location = %self.target, "redirecting");
        ctx.redirect(&self.target);
        Ok(())
    }
}
