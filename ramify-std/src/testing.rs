//! Testing utilities for ramify.
//!
//! This module provides helpers for testing routes and handlers without a
//! host framework.
//!
//! # Features
//!
//! - [`TestContext`]: An in-memory request context implementing every
//!   context capability the built-in handlers need
//! - [`RecordingMiddleware`]: A handler that records that it ran
//! - [`StubAssets`]: An asset sender backed by a fixed list of paths

use crate::{
    handlers::{Asset, AssetSender, Served},
    hooks::tracing::Traceable,
};
use ramify_core::{BoxError, Middleware, Next, Params, Redirect, RequestDescriptor, ServeFile};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Test Context
// ============================================================================

/// An in-memory request context.
///
/// # Example
///
/// ```rust,ignore
/// let mut ctx = TestContext::get("/users/42");
/// let matched = router.dispatch(&ctx).matched().unwrap();
/// ctx.params = matched.params.clone();
/// matched.run(&mut ctx).await?;
/// assert_eq!(ctx.trail, ["auth", "show_user"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestContext {
    /// Request method.
    pub method: String,
    /// Request hostname.
    pub hostname: String,
    /// Request path.
    pub path: String,
    /// Bound route parameters, if the test stores them.
    pub params: Option<Params>,
    /// Names pushed by [`RecordingMiddleware`], in execution order.
    pub trail: Vec<&'static str>,
    /// The location passed to [`Redirect::redirect`], if any.
    pub redirected_to: Option<String>,
    /// The file passed to [`ServeFile::serve_file`] or served by
    /// [`StubAssets`], if any.
    pub served: Option<PathBuf>,
    /// Trace identifiers for [`Traceable`].
    pub trace: Option<(String, String)>,
}

impl TestContext {
    /// Create a context for a request.
    pub fn new(method: &str, hostname: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            hostname: hostname.to_string(),
            path: path.to_string(),
            ..Self::default()
        }
    }

    /// Create a `GET` request for `localhost`.
    pub fn get(path: &str) -> Self {
        Self::new("GET", "localhost", path)
    }

    /// Attach trace identifiers.
    pub fn with_trace(mut self, trace_id: &str, span_id: &str) -> Self {
        self.trace = Some((trace_id.to_string(), span_id.to_string()));
        self
    }
}

impl RequestDescriptor for TestContext {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> &str {
        &self.method
    }
}

impl Redirect for TestContext {
    fn redirect(&mut self, location: &str) {
        self.redirected_to = Some(location.to_string());
    }
}

impl ServeFile for TestContext {
    fn serve_file(&mut self, file: &Path) {
        self.served = Some(file.to_path_buf());
    }
}

impl Traceable for TestContext {
    fn trace_id(&self) -> Option<&str> {
        self.trace.as_ref().map(|(trace, _)| trace.as_str())
    }

    fn span_id(&self) -> Option<&str> {
        self.trace.as_ref().map(|(_, span)| span.as_str())
    }
}

// ============================================================================
// Recording Middleware
// ============================================================================

/// A handler that pushes its name onto [`TestContext::trail`].
///
/// Clones share a call counter, so a test can keep one clone and inspect it
/// after the chain ran.
#[derive(Debug, Clone)]
pub struct RecordingMiddleware {
    name: &'static str,
    calls: Arc<AtomicUsize>,
    terminal: bool,
}

impl RecordingMiddleware {
    /// Create a recorder that continues the chain.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: Arc::new(AtomicUsize::new(0)),
            terminal: false,
        }
    }

    /// Create a recorder that ends the chain.
    pub fn terminal(name: &'static str) -> Self {
        Self {
            terminal: true,
            ..Self::new(name)
        }
    }

    /// The recorded name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the number of times this recorder ran.
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Middleware<TestContext> for RecordingMiddleware {
    async fn call<'a>(
        &'a self,
        ctx: &'a mut TestContext,
        next: Next<'a, TestContext>,
    ) -> Result<(), BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ctx.trail.push(self.name);
        if self.terminal {
            return Ok(());
        }
        next.run(ctx).await
    }
}

// ============================================================================
// Stub Assets
// ============================================================================

/// An asset sender that knows a fixed set of asset paths.
///
/// Served assets are recorded in [`TestContext::served`] as resolved below
/// the root.
#[derive(Debug, Clone, Default)]
pub struct StubAssets {
    paths: HashSet<String>,
    failing: bool,
}

impl StubAssets {
    /// Create a sender that knows `paths`.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            failing: false,
        }
    }

    /// Create a sender that fails every delivery.
    pub fn failing() -> Self {
        Self {
            paths: HashSet::new(),
            failing: true,
        }
    }
}

impl AssetSender<TestContext> for StubAssets {
    async fn send<'a>(
        &'a self,
        ctx: &'a mut TestContext,
        asset: &'a Asset,
    ) -> Result<Served, BoxError> {
        if self.failing {
            return Err("asset store unavailable".into());
        }
        match asset.resolve() {
            Some(file) if self.paths.contains(&asset.path) => {
                ctx.served = Some(file);
                Ok(Served::Sent)
            }
            _ => Ok(Served::NotFound),
        }
    }
}
