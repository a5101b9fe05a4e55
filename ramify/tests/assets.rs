mod common;

use common::{expect_match, record, request, run};
use ramify::{
    Dispatch, MatchKind, Router,
    testing::{StubAssets, TestContext},
};
use std::path::Path;

fn asset_router() -> Router<TestContext> {
    let mut router = Router::new();
    router.root_mut().before(vec![record("log")]);
    router
        .route("/assets/*")
        .unwrap()
        .static_root("public", Some("/assets"), StubAssets::new(["/css/site.css", "/a b.txt"]));
    router.route("/assets/*").unwrap().all(vec![record("missing")]);
    router.route("/home").unwrap().redirect("/");
    router
}

#[tokio::test]
async fn test_static_asset_is_served() {
    let router = asset_router();
    let mut ctx = request("GET", "/assets/css/site.css");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    assert_eq!(matched.kind, MatchKind::Static);

    run(&matched, &mut ctx).await;
    assert_eq!(ctx.served.as_deref(), Some(Path::new("public/css/site.css")));
    assert_eq!(ctx.trail, ["log"]);
}

#[tokio::test]
async fn test_static_path_is_normalized_and_decoded() {
    let router = asset_router();

    let mut dotted = request("GET", "/assets/img/../css/./site.css");
    let matched = expect_match(router.dispatch(&dotted), &dotted);
    run(&matched, &mut dotted).await;
    assert_eq!(dotted.served.as_deref(), Some(Path::new("public/css/site.css")));

    let mut encoded = request("HEAD", "/assets/a%20b.txt");
    let matched = expect_match(router.dispatch(&encoded), &encoded);
    run(&matched, &mut encoded).await;
    assert_eq!(encoded.served.as_deref(), Some(Path::new("public/a b.txt")));
}

#[tokio::test]
async fn test_static_node_shadows_later_siblings() {
    // The static chain is selected for the path, so a missing asset ends
    // with the static handler rather than reaching the sibling.
    let router = asset_router();
    let mut ctx = request("GET", "/assets/nope.css");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    run(&matched, &mut ctx).await;

    assert!(ctx.served.is_none());
    assert_eq!(ctx.trail, ["log"]);
}

#[tokio::test]
async fn test_static_ignores_write_methods() {
    let router = asset_router();
    let mut ctx = request("PUT", "/assets/css/site.css");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    run(&matched, &mut ctx).await;
    assert!(ctx.served.is_none());
}

#[tokio::test]
async fn test_redirect_route() {
    let router = asset_router();
    let mut ctx = request("GET", "/home");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    run(&matched, &mut ctx).await;

    assert_eq!(ctx.redirected_to.as_deref(), Some("/"));
    assert_eq!(ctx.trail, ["log"]);
}

#[cfg(feature = "fs")]
#[tokio::test]
async fn test_fs_assets_through_router() {
    use ramify::handlers::FsAssets;

    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
    let mut router: Router<TestContext> = Router::new();
    router
        .route("/src/*")
        .unwrap()
        .static_root(&root, Some("/src"), FsAssets);

    let mut ctx = request("GET", "/src/lib.rs");
    let matched = expect_match(router.dispatch(&ctx), &ctx);
    run(&matched, &mut ctx).await;
    assert_eq!(ctx.served, Some(root.join("lib.rs")));
}
