//! Request descriptors and bound route parameters.

/// The parts of an incoming request the dispatch engine looks at.
///
/// Host frameworks implement this for their own request or context types.
pub trait RequestDescriptor {
    /// The request hostname, without port.
    fn hostname(&self) -> &str;

    /// The request path, without query string.
    fn path(&self) -> &str;

    /// The request method name, in any case.
    fn method(&self) -> &str;
}

impl<T: RequestDescriptor + ?Sized> RequestDescriptor for &T {
    fn hostname(&self) -> &str {
        (**self).hostname()
    }

    fn path(&self) -> &str {
        (**self).path()
    }

    fn method(&self) -> &str {
        (**self).method()
    }
}

impl<T: RequestDescriptor + ?Sized> RequestDescriptor for &mut T {
    fn hostname(&self) -> &str {
        (**self).hostname()
    }

    fn path(&self) -> &str {
        (**self).path()
    }

    fn method(&self) -> &str {
        (**self).method()
    }
}

/// An owned request descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    hostname: String,
    path: String,
}

impl Request {
    /// Create a descriptor from its parts.
    pub fn new(
        method: impl Into<String>,
        hostname: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            hostname: hostname.into(),
            path: path.into(),
        }
    }
}

impl RequestDescriptor for Request {
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

/// Parameter values extracted from a matched path.
///
/// `Named` is produced when the pattern declares parameter names; a raw
/// regex pattern without names produces `Positional`. Values of optional
/// groups that did not participate in the match are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    /// Values keyed by parameter name, in declaration order.
    Named(Vec<(String, Option<String>)>),
    /// Raw capture values in order.
    Positional(Vec<Option<String>>),
}

impl Params {
    /// Look up a named value. When a name repeats, the last one wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Params::Named(pairs) => pairs
                .iter()
                .rev()
                .find(|(key, _)| key == name)
                .and_then(|(_, value)| value.as_deref()),
            Params::Positional(_) => None,
        }
    }

    /// Look up a value by position.
    pub fn get_index(&self, index: usize) -> Option<&str> {
        match self {
            Params::Named(pairs) => pairs.get(index).and_then(|(_, value)| value.as_deref()),
            Params::Positional(values) => values.get(index).and_then(|value| value.as_deref()),
        }
    }

    /// Number of captured values.
    pub fn len(&self) -> usize {
        match self {
            Params::Named(pairs) => pairs.len(),
            Params::Positional(values) => values.len(),
        }
    }

    /// Whether no values were captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether values are keyed by name.
    pub fn is_named(&self) -> bool {
        matches!(self, Params::Named(_))
    }

    /// Iterate over the names, if any.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let pairs: &[(String, Option<String>)] = match self {
            Params::Named(pairs) => pairs,
            Params::Positional(_) => &[],
        };
        pairs.iter().map(|(key, _)| key.as_str())
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::Positional(Vec::new())
    }
}
