//! Static asset handler installed by
//! [`RouteNode::static_root`](crate::RouteNode::static_root).
//!
//! The handler only prepares the asset path; delivering the asset is up to
//! an [`AssetSender`]. Requests it cannot serve continue down the chain:
//!
//! - methods other than `GET` and `HEAD`
//! - assets the sender reports as missing
//! - sender failures

use ramify_core::{BoxError, DecodeError, Method, Middleware, Next, RequestDescriptor};
use std::{
    borrow::Cow,
    future::Future,
    path::{Component, Path, PathBuf},
};

/// An asset lookup handed to an [`AssetSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// The configured root directory, or a single file.
    pub root: PathBuf,
    /// The request path after prefix stripping, normalization and decoding.
    pub path: String,
}

impl Asset {
    /// Resolve the asset below its root.
    ///
    /// Returns `None` when the path would leave the root.
    pub fn resolve(&self) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        for component in Path::new(self.path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}

/// Outcome of an asset delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// The asset was delivered; the chain ends here.
    Sent,
    /// No such asset; the chain continues.
    NotFound,
}

/// Delivers static assets for a context.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot deliver assets for context `{C}`",
    label = "missing `AssetSender<{C}>` implementation"
)]
pub trait AssetSender<C>: Send + Sync + 'static {
    /// Deliver `asset`, or report that it does not exist.
    fn send<'a>(
        &'a self,
        ctx: &'a mut C,
        asset: &'a Asset,
    ) -> impl Future<Output = Result<Served, BoxError>> + Send + 'a;
}

/// Serves assets below a root for `GET` and `HEAD` requests.
pub struct StaticFiles<S> {
    root: PathBuf,
    strip: Option<String>,
    sender: S,
}

impl<S> StaticFiles<S> {
    /// Serve assets below `root` through `sender`.
    pub fn new(root: impl Into<PathBuf>, sender: S) -> Self {
        Self {
            root: root.into(),
            strip: None,
            sender,
        }
    }

    /// Remove the first occurrence of `prefix` from request paths before
    /// resolving them. An empty prefix is ignored.
    pub fn strip_prefix(mut self, prefix: Option<&str>) -> Self {
        self.strip = prefix.filter(|p| !p.is_empty()).map(str::to_string);
        self
    }

    /// The configured root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build the asset lookup for a request path.
    pub fn asset_for(&self, request_path: &str) -> Asset {
        let stripped = match &self.strip {
            Some(prefix) => request_path.replacen(prefix.as_str(), "", 1),
            None => request_path.to_string(),
        };
        let normalized = normalize_path(&stripped);
        let path = match decode_path(&normalized) {
            Ok(decoded) => decoded.into_owned(),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_err, "keeping undecodable asset path");
                normalized.clone()
            }
        };

        Asset {
            root: self.root.clone(),
            path,
        }
    }
}

impl<C, S> Middleware<C> for StaticFiles<S>
where
    C: RequestDescriptor + Send + 'static,
    S: AssetSender<C>,
{
    async fn call<'a>(&'a self, ctx: &'a mut C, next: Next<'a, C>) -> Result<(), BoxError> {
        let readable = ctx
            .method()
            .parse::<Method>()
            .is_ok_and(|method| method.is_read_only());
        if !readable {
            return next.run(ctx).await;
        }

        let asset = self.asset_for(ctx.path());
        match self.sender.send(ctx, &asset).await {
            Ok(Served::Sent) => Ok(()),
            Ok(Served::NotFound) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %asset.path, "asset not found");
                next.run(ctx).await
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %asset.path, error = %_err, "asset delivery failed");
                next.run(ctx).await
            }
        }
    }
}

/// Percent-decode a path.
///
/// Fails when the decoded bytes are not UTF-8; callers serving assets keep
/// the raw text in that case.
pub fn decode_path(text: &str) -> Result<Cow<'_, str>, DecodeError> {
    urlencoding::decode(text).map_err(|source| DecodeError::InvalidUtf8 {
        text: text.to_string(),
        source,
    })
}

/// Lexically normalize a `/`-separated path.
///
/// Repeated separators and `.` segments are removed and `..` consumes the
/// previous segment. `..` never climbs above the start of the path. A
/// trailing separator is kept.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let trailing = path.len() > 1 && path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if absolute {
        normalized.insert(0, '/');
    }
    if trailing && !segments.is_empty() {
        normalized.push('/');
    }
    if normalized.is_empty() {
        normalized.push('.');
    }
    normalized
}

// ============================================================================
// Filesystem sender
// ============================================================================

/// Sends assets from the local filesystem through the context's
/// [`ServeFile`](ramify_core::ServeFile) capability.
///
/// When the root is itself a file, that file is served for every request.
#[cfg(feature = "fs")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssets;

#[cfg(feature = "fs")]
impl<C> AssetSender<C> for FsAssets
where
    C: ramify_core::ServeFile + Send + 'static,
{
    async fn send<'a>(&'a self, ctx: &'a mut C, asset: &'a Asset) -> Result<Served, BoxError> {
        let root = tokio::fs::metadata(&asset.root).await?;
        let file = if root.is_file() {
            asset.root.clone()
        } else {
            let Some(candidate) = asset.resolve() else {
                return Ok(Served::NotFound);
            };
            match tokio::fs::metadata(&candidate).await {
                Ok(meta) if meta.is_file() => candidate,
                _ => return Ok(Served::NotFound),
            }
        };

        ctx.serve_file(&file);
        Ok(Served::Sent)
    }
}
