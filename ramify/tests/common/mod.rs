#![allow(dead_code)]

use ramify::{
    DispatchResult, Handler, RouteMatch, handler,
    testing::{RecordingMiddleware, TestContext},
};

// ============================================================================
// Handlers
// ============================================================================

/// A recorder plus the normalized handler that wraps a clone of it.
pub fn recorder(name: &'static str) -> (RecordingMiddleware, Handler<TestContext>) {
    let recorder = RecordingMiddleware::new(name);
    let handle = handler(recorder.clone());
    (recorder, handle)
}

pub fn record(name: &'static str) -> Handler<TestContext> {
    handler(RecordingMiddleware::new(name))
}

pub fn terminal(name: &'static str) -> Handler<TestContext> {
    handler(RecordingMiddleware::terminal(name))
}

// ============================================================================
// Requests
// ============================================================================

pub fn request(method: &str, path: &str) -> TestContext {
    TestContext::new(method, "example.com", path)
}

pub fn on_host(method: &str, host: &str, path: &str) -> TestContext {
    TestContext::new(method, host, path)
}

/// Unwrap a dispatch result, naming the request on failure.
pub fn expect_match(
    result: DispatchResult<TestContext>,
    ctx: &TestContext,
) -> RouteMatch<TestContext> {
    match result {
        DispatchResult::Matched(matched) => matched,
        DispatchResult::NotFound => panic!("expected {} {} to match", ctx.method, ctx.path),
    }
}

/// Run a matched chain against `ctx`, storing the bound params first.
pub async fn run(matched: &RouteMatch<TestContext>, ctx: &mut TestContext) {
    ctx.params = matched.params.clone();
    matched.run(ctx).await.unwrap();
}
