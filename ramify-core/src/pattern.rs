//! # Path Pattern Compiler
//!
//! Turns a path template into an anchored regular expression plus the
//! ordered list of parameter names it captures.
//!
//! # Template Syntax
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `:name` | Named parameter, one or more non-delimiter characters |
//! | `:name(\d+)` | Named parameter with a custom pattern |
//! | `(\d+)` | Unnamed group, named by its index (`"0"`, `"1"`, ...) |
//! | `*` | Unnamed wildcard matching anything, named by index |
//! | `?` / `*` / `+` | Optional / zero-or-more / one-or-more modifiers |
//! | `\c` | Escaped literal character |
//!
//! The delimiter of a parameter is the `/` or `.` directly before it, and is
//! optional together with an optional parameter: `/user/:id?` matches both
//! `/user` and `/user/42`.
//!
//! Patterns are always anchored at both ends. By default they are
//! case-insensitive and accept one optional trailing slash; see
//! [`PatternOptions`].
//!
//! # Pre-compiled Patterns
//!
//! A [`Regex`] can be used directly as a pattern. It passes through
//! unchanged with no parameter names, so its captures are exposed
//! positionally.

use crate::{error::PatternError, request::Params};
use regex::{Regex, RegexBuilder};
use std::{fmt, sync::LazyLock};

/// Tokenizer for templates.
///
/// Groups: 1 escaped char, 2 prefix, 3 name, 4 custom pattern,
/// 5 unnamed group, 6 modifier, 7 asterisk.
static PATH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(\\.)",
        r"|([/.])?(?:(?::([A-Za-z0-9_]+)(?:\(((?:\\.|[^\\()])+)\))?",
        r"|\(((?:\\.|[^\\()])+)\))([+*?])?|(\*))",
    ))
    .expect("template tokenizer is a valid regex")
});

/// Options controlling how templates compile.
///
/// Nested routes inherit the options of the pattern they extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternOptions {
    /// Match letter case exactly. Default: `false`.
    pub sensitive: bool,
    /// Treat a trailing slash as significant. Default: `false`.
    pub strict: bool,
}

impl PatternOptions {
    /// Create the default options (case-insensitive, lenient trailing slash).
    pub const fn new() -> Self {
        Self {
            sensitive: false,
            strict: false,
        }
    }

    /// Set case sensitivity.
    pub const fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    /// Set trailing-slash strictness.
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[derive(Debug, Clone)]
enum Source {
    /// Compiled from a template; nesting recompiles the joined template.
    Template(String),
    /// Built from a raw regex; `body` is the expression without its end anchor.
    Raw { body: String },
}

/// An immutable compiled path pattern.
#[derive(Clone)]
pub struct PathPattern {
    regex: Regex,
    names: Vec<String>,
    source: Source,
    options: PatternOptions,
}

impl PathPattern {
    /// Compile a template with default options.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ramify_core::PathPattern;
    ///
    /// let pattern = PathPattern::compile("/users/:id").unwrap();
    /// assert_eq!(pattern.param_names(), ["id"]);
    /// assert!(pattern.is_match("/users/42"));
    /// assert!(!pattern.is_match("/users/42/posts"));
    /// ```
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        Self::compile_with(template, PatternOptions::default())
    }

    /// Compile a template with explicit options.
    pub fn compile_with(template: &str, options: PatternOptions) -> Result<Self, PatternError> {
        let compiled = Fragment::parse(template, 0);
        let expr = format!("^{}", compiled.anchored(options.strict));
        let regex = RegexBuilder::new(&expr)
            .case_insensitive(!options.sensitive)
            .build()
            .map_err(|source| PatternError::Compile {
                template: template.to_string(),
                source,
            })?;

        Ok(Self {
            regex,
            names: compiled.names,
            source: Source::Template(template.to_string()),
            options,
        })
    }

    /// Wrap a pre-compiled regex. No parameter names are attached.
    pub fn from_regex(regex: Regex) -> Self {
        let body = strip_end_anchor(regex.as_str()).to_string();
        Self {
            regex,
            names: Vec::new(),
            source: Source::Raw { body },
            options: PatternOptions::default(),
        }
    }

    /// The pattern for the root of a route tree: the empty template.
    pub fn root(options: PatternOptions) -> Self {
        Self::compile_with("", options).expect("the empty template always compiles")
    }

    /// Produce the pattern for `self` followed by `suffix`.
    ///
    /// Parameter names are this pattern's followed by the suffix's, and the
    /// compile options carry over. Concatenation is associative, so nested
    /// routes can keep extending the result.
    pub fn concat(&self, suffix: &str) -> Result<Self, PatternError> {
        match &self.source {
            Source::Template(template) => {
                Self::compile_with(&format!("{template}{suffix}"), self.options)
            }
            Source::Raw { body } => self.concat_raw(body, suffix),
        }
    }

    fn concat_raw(&self, body: &str, suffix: &str) -> Result<Self, PatternError> {
        let parent_captures = self.capture_count();
        let child = Fragment::parse(suffix, parent_captures);

        let names = match (self.names.is_empty(), child.names.is_empty()) {
            (_, true) => self.names.clone(),
            (false, false) => self.names.iter().cloned().chain(child.names).collect(),
            // Name the parent's positional captures so names and captures stay aligned.
            (true, false) => (0..parent_captures)
                .map(|index| index.to_string())
                .chain(child.names)
                .collect(),
        };

        let wrap = |expr: &str| {
            if self.options.sensitive {
                format!("(?:{body}){expr}")
            } else {
                format!("(?:{body})(?i:{expr})")
            }
        };
        let joined = wrap(&child.expr);

        // The trailing slash has to be dropped inside the group, before `close`
        // appends the optional one.
        let open = match child.expr.strip_suffix('/') {
            Some(stripped) if !self.options.strict && !child.expr.ends_with("\\/") => {
                wrap(stripped)
            }
            _ => joined.clone(),
        };
        let expr = Fragment::close(open, self.options.strict);

        let regex = Regex::new(&expr).map_err(|source| PatternError::Compile {
            template: format!("{}{suffix}", self.regex.as_str()),
            source,
        })?;

        Ok(Self {
            regex,
            names,
            source: Source::Raw { body: joined },
            options: self.options,
        })
    }

    /// The ordered parameter names. Empty for raw-regex patterns.
    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    /// The template this pattern was compiled from, if any.
    pub fn template(&self) -> Option<&str> {
        match &self.source {
            Source::Template(template) => Some(template),
            Source::Raw { .. } => None,
        }
    }

    /// The compile options.
    pub fn options(&self) -> PatternOptions {
        self.options
    }

    /// The underlying regex.
    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    /// Number of capture groups, excluding the implicit whole-match group.
    pub fn capture_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }

    /// Whether `path` matches the pattern in its entirety.
    pub fn is_match(&self, path: &str) -> bool {
        self.exec(path).is_some()
    }

    /// Match `path` and return the captured values in order.
    ///
    /// The first match must span the whole path; a pattern that only matches
    /// a prefix (possible with raw regexes) is rejected. Optional groups that
    /// did not participate yield `None`.
    pub fn exec(&self, path: &str) -> Option<Vec<Option<String>>> {
        let captures = self.regex.captures(path)?;
        let whole = captures.get(0)?;
        if whole.start() != 0 || whole.end() != path.len() {
            return None;
        }

        Some(
            captures
                .iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// Bind captured values to parameter names.
    ///
    /// With names, values are bound by position; without, the raw captures
    /// are kept positionally.
    pub fn bind(&self, captures: Vec<Option<String>>) -> Params {
        if self.names.is_empty() {
            Params::Positional(captures)
        } else {
            Params::Named(self.names.iter().cloned().zip(captures).collect())
        }
    }

    /// Match and bind in one step.
    pub fn params(&self, path: &str) -> Option<Params> {
        self.exec(path).map(|captures| self.bind(captures))
    }
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathPattern")
            .field("regex", &self.regex.as_str())
            .field("names", &self.names)
            .field("template", &self.template())
            .finish()
    }
}

impl From<Regex> for PathPattern {
    fn from(regex: Regex) -> Self {
        Self::from_regex(regex)
    }
}

/// Conversion into a [`PathPattern`], used wherever a route path is accepted.
pub trait IntoPathPattern {
    /// Compile (or pass through) with the given options.
    fn into_path_pattern(self, options: PatternOptions) -> Result<PathPattern, PatternError>;
}

impl IntoPathPattern for &str {
    fn into_path_pattern(self, options: PatternOptions) -> Result<PathPattern, PatternError> {
        PathPattern::compile_with(self, options)
    }
}

impl IntoPathPattern for String {
    fn into_path_pattern(self, options: PatternOptions) -> Result<PathPattern, PatternError> {
        PathPattern::compile_with(&self, options)
    }
}

impl IntoPathPattern for &String {
    fn into_path_pattern(self, options: PatternOptions) -> Result<PathPattern, PatternError> {
        PathPattern::compile_with(self, options)
    }
}

impl IntoPathPattern for Regex {
    fn into_path_pattern(self, _options: PatternOptions) -> Result<PathPattern, PatternError> {
        Ok(PathPattern::from_regex(self))
    }
}

impl IntoPathPattern for PathPattern {
    fn into_path_pattern(self, _options: PatternOptions) -> Result<PathPattern, PatternError> {
        Ok(self)
    }
}

// ============================================================================
// Template compilation
// ============================================================================

/// A parameter token parsed out of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Param {
    name: String,
    prefix: Option<char>,
    optional: bool,
    repeat: bool,
    partial: bool,
    pattern: String,
}

/// An unanchored expression compiled from a template.
struct Fragment {
    expr: String,
    names: Vec<String>,
}

impl Fragment {
    /// Compile `template`, numbering unnamed groups from `first_index`.
    fn parse(template: &str, first_index: usize) -> Self {
        let mut expr = String::new();
        let mut names = Vec::new();
        let mut literal = String::new();
        let mut next_index = first_index;
        let mut index = 0;

        for caps in PATH_TOKEN.captures_iter(template) {
            let Some(whole) = caps.get(0) else { continue };
            literal.push_str(&template[index..whole.start()]);
            index = whole.end();

            if let Some(escaped) = caps.get(1) {
                literal.push_str(&escaped.as_str()[1..]);
                continue;
            }

            let next = template[index..].chars().next();
            let prefix = caps.get(2).and_then(|m| m.as_str().chars().next());
            let modifier = caps.get(6).map(|m| m.as_str());
            let asterisk = caps.get(7).is_some();

            if !literal.is_empty() {
                expr.push_str(&regex::escape(&literal));
                literal.clear();
            }

            let name = match caps.get(3) {
                Some(name) => name.as_str().to_string(),
                None => {
                    let name = next_index.to_string();
                    next_index += 1;
                    name
                }
            };
            let delimiter = prefix.unwrap_or('/');
            let pattern = match caps.get(4).or_else(|| caps.get(5)) {
                Some(custom) => escape_group(custom.as_str()),
                None if asterisk => ".*".to_string(),
                None => format!("[^{}]+?", regex::escape(&delimiter.to_string())),
            };

            let param = Param {
                name,
                prefix,
                optional: matches!(modifier, Some("?") | Some("*")),
                repeat: matches!(modifier, Some("+") | Some("*")),
                partial: prefix.is_some() && next.is_some() && next != prefix,
                pattern,
            };
            expr.push_str(&param.expr());
            names.push(param.name);
        }

        literal.push_str(&template[index..]);
        if !literal.is_empty() {
            expr.push_str(&regex::escape(&literal));
        }

        Self { expr, names }
    }

    /// The expression with its end anchor applied.
    fn anchored(&self, strict: bool) -> String {
        Self::close(self.expr.clone(), strict)
    }

    fn close(mut expr: String, strict: bool) -> String {
        if strict {
            expr.push('$');
        } else {
            if expr.ends_with('/') && !expr.ends_with("\\/") {
                expr.pop();
            }
            expr.push_str("/?$");
        }
        expr
    }
}

impl Param {
    fn expr(&self) -> String {
        let prefix = self
            .prefix
            .map(|p| regex::escape(&p.to_string()))
            .unwrap_or_default();
        let mut capture = format!("(?:{})", self.pattern);

        if self.repeat {
            capture = format!("{capture}(?:{prefix}{capture})*");
        }

        if self.optional {
            if self.partial {
                format!("{prefix}({capture})?")
            } else {
                format!("(?:{prefix}({capture}))?")
            }
        } else {
            format!("{prefix}({capture})")
        }
    }
}

/// Escape characters in a custom group that would otherwise open groups or
/// anchors, leaving existing escapes untouched.
fn escape_group(group: &str) -> String {
    let mut out = String::with_capacity(group.len());
    let mut chars = group.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '=' | '!' | ':' | '$' | '/' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Remove an unescaped trailing `$` from a regex source.
fn strip_end_anchor(expr: &str) -> &str {
    match expr.strip_suffix('$') {
        Some(rest) if rest.chars().rev().take_while(|c| *c == '\\').count() % 2 == 0 => rest,
        _ => expr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pattern: &PathPattern, path: &str) -> Option<Vec<Option<String>>> {
        pattern.exec(path)
    }

    fn some(items: &[&str]) -> Vec<Option<String>> {
        items.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn test_literal_template() {
        let pattern = PathPattern::compile("/about").unwrap();
        assert!(pattern.param_names().is_empty());
        assert!(pattern.is_match("/about"));
        assert!(pattern.is_match("/about/"));
        assert!(pattern.is_match("/ABOUT"));
        assert!(!pattern.is_match("/about/us"));
        assert!(!pattern.is_match("/abou"));
    }

    #[test]
    fn test_named_parameters_in_order() {
        let pattern = PathPattern::compile("/users/:user/posts/:post").unwrap();
        assert_eq!(pattern.param_names(), ["user", "post"]);
        assert_eq!(
            values(&pattern, "/users/ada/posts/7"),
            Some(some(&["ada", "7"]))
        );
        assert_eq!(values(&pattern, "/users/ada/posts"), None);
    }

    #[test]
    fn test_parameter_stops_at_delimiter() {
        let pattern = PathPattern::compile("/files/:name.:ext").unwrap();
        assert_eq!(pattern.param_names(), ["name", "ext"]);
        assert_eq!(
            values(&pattern, "/files/report.pdf"),
            Some(some(&["report", "pdf"]))
        );
    }

    #[test]
    fn test_custom_parameter_pattern() {
        let pattern = PathPattern::compile(r"/orders/:id(\d+)").unwrap();
        assert!(pattern.is_match("/orders/12"));
        assert!(!pattern.is_match("/orders/abc"));
    }

    #[test]
    fn test_optional_parameter() {
        let pattern = PathPattern::compile("/items/:id?").unwrap();
        assert_eq!(values(&pattern, "/items"), Some(vec![None]));
        assert_eq!(values(&pattern, "/items/3"), Some(some(&["3"])));
    }

    #[test]
    fn test_repeated_parameter() {
        let pattern = PathPattern::compile("/docs/:path+").unwrap();
        assert_eq!(values(&pattern, "/docs/a/b/c"), Some(some(&["a/b/c"])));
        assert!(!pattern.is_match("/docs"));

        let pattern = PathPattern::compile("/docs/:path*").unwrap();
        assert_eq!(values(&pattern, "/docs"), Some(vec![None]));
    }

    #[test]
    fn test_wildcard_and_unnamed_groups_are_indexed() {
        let pattern = PathPattern::compile("/assets/*").unwrap();
        assert_eq!(pattern.param_names(), ["0"]);
        assert_eq!(
            values(&pattern, "/assets/css/site.css"),
            Some(some(&["css/site.css"]))
        );

        let pattern = PathPattern::compile(r"/v(\d+)/:name/(\w+)").unwrap();
        assert_eq!(pattern.param_names(), ["0", "name", "1"]);
    }

    #[test]
    fn test_escaped_characters_are_literal() {
        let pattern = PathPattern::compile(r"/price\:usd").unwrap();
        assert!(pattern.param_names().is_empty());
        assert!(pattern.is_match("/price:usd"));
    }

    #[test]
    fn test_regex_metacharacters_in_literals() {
        let pattern = PathPattern::compile("/a.b/c+d").unwrap();
        assert!(pattern.is_match("/a.b/c+d"));
        assert!(!pattern.is_match("/axb/ccd"));
    }

    #[test]
    fn test_strict_and_sensitive_options() {
        let options = PatternOptions::new().strict(true).sensitive(true);
        let pattern = PathPattern::compile_with("/Home", options).unwrap();
        assert!(pattern.is_match("/Home"));
        assert!(!pattern.is_match("/Home/"));
        assert!(!pattern.is_match("/home"));
    }

    #[test]
    fn test_invalid_custom_group_is_an_error() {
        let err = PathPattern::compile("/:id([)").unwrap_err();
        assert_eq!(err.template(), "/:id([)");
    }

    #[test]
    fn test_raw_regex_passes_through() {
        let regex = Regex::new(r"^/raw/(\d+)$").unwrap();
        let pattern = PathPattern::from(regex.clone());
        assert!(pattern.param_names().is_empty());
        assert_eq!(pattern.as_regex().as_str(), regex.as_str());
        assert_eq!(
            pattern.params("/raw/5"),
            Some(Params::Positional(some(&["5"])))
        );
    }

    #[test]
    fn test_raw_regex_prefix_match_is_rejected() {
        let pattern = PathPattern::from_regex(Regex::new("/raw").unwrap());
        assert!(pattern.is_match("/raw"));
        assert!(!pattern.is_match("/raw/extra"));
        assert!(!pattern.is_match("/x/raw"));
    }

    #[test]
    fn test_concat_templates() {
        let parent = PathPattern::compile("/users/:user").unwrap();
        let child = parent.concat("/posts/:post").unwrap();
        assert_eq!(child.template(), Some("/users/:user/posts/:post"));
        assert_eq!(child.param_names(), ["user", "post"]);
        assert!(child.is_match("/users/1/posts/2"));
        assert!(!child.is_match("/users/1"));
    }

    #[test]
    fn test_concat_is_associative() {
        let base = PathPattern::compile("/a/:x").unwrap();
        let left = base.concat("/b/:y").unwrap().concat("/c/:z").unwrap();
        let right = base.concat("/b/:y/c/:z").unwrap();
        assert_eq!(left.param_names(), right.param_names());
        assert_eq!(
            left.exec("/a/1/b/2/c/3"),
            right.exec("/a/1/b/2/c/3")
        );
    }

    #[test]
    fn test_concat_keeps_options() {
        let options = PatternOptions::new().sensitive(true);
        let parent = PathPattern::compile_with("/API", options).unwrap();
        let child = parent.concat("/v1").unwrap();
        assert_eq!(child.options(), options);
        assert!(child.is_match("/API/v1"));
        assert!(!child.is_match("/api/v1"));
    }

    #[test]
    fn test_concat_raw_parent_without_child_params() {
        let parent = PathPattern::from_regex(Regex::new(r"^/r/(\d+)$").unwrap());
        let child = parent.concat("/info").unwrap();
        assert!(child.param_names().is_empty());
        assert_eq!(
            child.params("/r/9/info"),
            Some(Params::Positional(some(&["9"])))
        );
        assert!(!child.is_match("/r/9"));
    }

    #[test]
    fn test_concat_raw_parent_with_trailing_slash_suffix() {
        let parent = PathPattern::from_regex(Regex::new(r"^/v/(\d+)$").unwrap());
        let child = parent.concat("/items/").unwrap();
        assert!(child.is_match("/v/1/items"));
        assert!(child.is_match("/v/1/items/"));
        assert!(child.is_match("/v/1/ITEMS"));
        assert!(!child.is_match("/v/1/items//"));

        // Same answer as a template parent.
        let template = PathPattern::compile("/v/:n").unwrap().concat("/items/").unwrap();
        assert_eq!(template.is_match("/v/1/items"), child.is_match("/v/1/items"));

        // Further nesting still sees the suffix as written.
        let deeper = child.concat("more").unwrap();
        assert!(deeper.is_match("/v/1/items/more"));
        assert!(!deeper.is_match("/v/1/itemsmore"));

        let parent = PathPattern {
            options: PatternOptions::default().strict(true),
            ..PathPattern::from_regex(Regex::new(r"^/v/(\d+)$").unwrap())
        };
        let child = parent.concat("/items/").unwrap();
        assert!(child.is_match("/v/1/items/"));
        assert!(!child.is_match("/v/1/items"));
    }

    #[test]
    fn test_concat_raw_parent_with_child_params() {
        let parent = PathPattern::from_regex(Regex::new(r"^/r/(\d+)").unwrap());
        let child = parent.concat("/items/:item").unwrap();
        assert_eq!(child.param_names(), ["0", "item"]);

        let params = child.params("/r/9/items/hat").unwrap();
        assert_eq!(params.get("0"), Some("9"));
        assert_eq!(params.get("item"), Some("hat"));

        // Nested again from the composed pattern.
        let grandchild = child.concat("/:size").unwrap();
        assert_eq!(grandchild.param_names(), ["0", "item", "size"]);
        assert_eq!(
            grandchild.params("/r/9/items/hat/xl").unwrap().get("size"),
            Some("xl")
        );
    }

    #[test]
    fn test_empty_template_is_root() {
        let root = PathPattern::root(PatternOptions::default());
        assert!(root.is_match(""));
        assert!(root.is_match("/"));
        assert!(!root.is_match("/a"));
    }

    #[test]
    fn test_escape_group_keeps_existing_escapes() {
        assert_eq!(escape_group(r"\d+"), r"\d+");
        assert_eq!(escape_group("a/b"), r"a\/b");
        assert_eq!(escape_group(r"\(x"), r"\(x");
    }

    #[test]
    fn test_strip_end_anchor() {
        assert_eq!(strip_end_anchor("^/a$"), "^/a");
        assert_eq!(strip_end_anchor(r"^/a\$"), r"^/a\$");
        assert_eq!(strip_end_anchor("^/a"), "^/a");
    }
}
