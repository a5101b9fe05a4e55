mod common;

use common::{expect_match, record, recorder, request, run, terminal};
use ramify::{
    Chain, Dispatch, DispatchResult, MatchKind, Method, Router, from_sync_fn,
    testing::{RecordingMiddleware, StubAssets, TestContext},
};

#[tokio::test]
async fn test_hooks_run_root_to_leaf() {
    let (a, b, c) = (record("A"), record("B"), record("C"));
    let mut router: Router<TestContext> = Router::new();
    router.root_mut().before(vec![a.clone()]);
    let child = router.route("/child").unwrap();
    child.before(vec![b.clone()]);
    child.get(vec![c.clone()]);

    let mut ctx = request("GET", "/child");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    assert_eq!(matched.chain, Chain::new(vec![a, b, c]));

    run(&matched, &mut ctx).await;
    assert_eq!(ctx.trail, ["A", "B", "C"]);
}

#[tokio::test]
async fn test_hooks_from_every_level() {
    let mut router: Router<TestContext> = Router::new();
    router.root_mut().before(vec![record("root")]);
    let api = router.route("/api").unwrap();
    api.before(vec![record("api")]);
    let v1 = api.nest("/v1").unwrap();
    v1.before(vec![record("v1")]);
    v1.nest("/items")
        .unwrap()
        .before(vec![record("items")])
        .get(vec![record("list")]);

    let mut ctx = request("GET", "/api/v1/items");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    run(&matched, &mut ctx).await;
    assert_eq!(ctx.trail, ["root", "api", "v1", "items", "list"]);
}

#[test]
fn test_redirect_outranks_static_and_methods() {
    let mut router: Router<TestContext> = Router::new();
    let node = router.route("/page").unwrap();
    node.get(vec![record("get")]);
    node.static_root("public", None, StubAssets::new(["/page"]));
    assert_eq!(
        router.dispatch(&request("GET", "/page")).matched().map(|m| m.kind),
        Some(MatchKind::Static)
    );

    router.root_mut().children_mut()[0].redirect("/elsewhere");
    assert_eq!(
        router.dispatch(&request("GET", "/page")).matched().map(|m| m.kind),
        Some(MatchKind::Redirect)
    );
    assert_eq!(
        router.dispatch(&request("DELETE", "/page")).matched().map(|m| m.kind),
        Some(MatchKind::Redirect)
    );
}

#[tokio::test]
async fn test_redirect_keeps_before_hooks() {
    let mut router: Router<TestContext> = Router::new();
    let old = router.route("/old").unwrap();
    old.before(vec![record("hook")]);
    old.redirect("/new");

    let mut ctx = request("POST", "/old");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    assert!(matched.params.is_none());
    run(&matched, &mut ctx).await;

    assert_eq!(ctx.trail, ["hook"]);
    assert_eq!(ctx.redirected_to.as_deref(), Some("/new"));
}

#[test]
fn test_sibling_without_handler_falls_through() {
    let (_, second) = recorder("second");
    let mut router: Router<TestContext> = Router::new();
    router.route("/a/:id").unwrap().post(vec![record("first")]);
    router.route("/a/:id").unwrap().get(vec![second.clone()]);

    let ctx = request("GET", "/a/42");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    assert_eq!(matched.chain, Chain::new(vec![second]));
    assert_eq!(matched.params.unwrap().get("id"), Some("42"));
}

#[test]
fn test_path_match_alone_is_not_a_match() {
    let mut router: Router<TestContext> = Router::new();
    router.route("/empty").unwrap();
    router.route("/posts").unwrap().post(vec![record("create")]);

    assert_eq!(router.dispatch(&request("GET", "/empty")), DispatchResult::NotFound);
    assert_eq!(router.dispatch(&request("GET", "/posts")), DispatchResult::NotFound);
    assert!(router.contains(&request("POST", "/posts")));
}

#[test]
fn test_first_sibling_wins() {
    let (first, second) = (record("first"), record("second"));
    let mut router: Router<TestContext> = Router::new();
    router.route("/items/:id").unwrap().get(vec![first.clone()]);
    router.route("/items/new").unwrap().get(vec![second]);

    let ctx = request("GET", "/items/new");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    assert_eq!(matched.chain, Chain::new(vec![first]));
}

#[test]
fn test_exact_method_before_all() {
    let (get, all) = (record("get"), record("all"));
    let mut router: Router<TestContext> = Router::new();
    router
        .route("/thing")
        .unwrap()
        .all(vec![all.clone()])
        .get(vec![get.clone()]);

    let got = router.dispatch(&request("get", "/thing")).matched().unwrap();
    assert_eq!(got.kind, MatchKind::Method(Method::Get));
    assert_eq!(got.chain, Chain::new(vec![get]));

    let other = router.dispatch(&request("PATCH", "/thing")).matched().unwrap();
    assert_eq!(other.kind, MatchKind::All);
    assert_eq!(other.chain, Chain::new(vec![all]));
}

#[tokio::test]
async fn test_before_replaces_previous_hooks() {
    let mut router: Router<TestContext> = Router::new();
    router
        .route("/x")
        .unwrap()
        .before(vec![record("first")])
        .before(vec![record("second")])
        .get(vec![record("handler")]);

    let mut ctx = request("GET", "/x");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    run(&matched, &mut ctx).await;
    assert_eq!(ctx.trail, ["second", "handler"]);
}

#[test]
fn test_dispatch_is_idempotent() {
    let mut router: Router<TestContext> = Router::new();
    router.root_mut().before(vec![record("root")]);
    router
        .route("/users/:id")
        .unwrap()
        .get(vec![record("show")]);

    let ctx = request("GET", "/users/5");
    let first = router.dispatch(&ctx);
    let second = router.dispatch(&ctx);
    assert!(first.is_matched());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_hook_can_halt_the_chain() {
    let mut router: Router<TestContext> = Router::new();
    let admin = router.route("/admin").unwrap();
    admin.before(vec![terminal("deny")]);
    admin.get(vec![record("dashboard")]);

    let mut ctx = request("GET", "/admin");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    run(&matched, &mut ctx).await;
    assert_eq!(ctx.trail, ["deny"]);
}

#[tokio::test]
async fn test_closure_handlers() {
    let mut router: Router<TestContext> = Router::new();
    router.route("/sync").unwrap().get(ramify::chain![
        from_sync_fn(|ctx: &mut TestContext| {
            ctx.trail.push("sync");
            Ok(())
        }),
        RecordingMiddleware::new("after"),
    ]);

    let mut ctx = request("GET", "/sync");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    run(&matched, &mut ctx).await;
    assert_eq!(ctx.trail, ["sync", "after"]);
    assert_eq!(matched.chain.len(), 2);
}
