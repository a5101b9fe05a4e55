//! HTTP method enumeration.
//!
//! The set is fixed at compile time: every method a Node-style HTTP stack
//! recognizes, plus the synthetic [`Method::All`] used as a method-agnostic
//! fallback slot on a route.

use crate::error::MethodError;
use std::{fmt, str::FromStr};

macro_rules! methods {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)+) => {
        /// A request method, or the synthetic `ALL` fallback.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Method {
            $($(#[$doc])* $variant,)+
        }

        impl Method {
            /// Every supported method, `ALL` last.
            pub const VARIANTS: &'static [Method] = &[$(Method::$variant,)+];

            /// The canonical upper-case name.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Method::$variant => $name,)+
                }
            }
        }
    };
}

methods! {
    /// `ACL`
    Acl => "ACL",
    /// `BIND`
    Bind => "BIND",
    /// `CHECKOUT`
    Checkout => "CHECKOUT",
    /// `CONNECT`
    Connect => "CONNECT",
    /// `COPY`
    Copy => "COPY",
    /// `DELETE`
    Delete => "DELETE",
    /// `GET`
    Get => "GET",
    /// `HEAD`
    Head => "HEAD",
    /// `LINK`
    Link => "LINK",
    /// `LOCK`
    Lock => "LOCK",
    /// `M-SEARCH`
    MSearch => "M-SEARCH",
    /// `MERGE`
    Merge => "MERGE",
    /// `MKACTIVITY`
    MkActivity => "MKACTIVITY",
    /// `MKCALENDAR`
    MkCalendar => "MKCALENDAR",
    /// `MKCOL`
    MkCol => "MKCOL",
    /// `MOVE`
    Move => "MOVE",
    /// `NOTIFY`
    Notify => "NOTIFY",
    /// `OPTIONS`
    Options => "OPTIONS",
    /// `PATCH`
    Patch => "PATCH",
    /// `POST`
    Post => "POST",
    /// `PROPFIND`
    PropFind => "PROPFIND",
    /// `PROPPATCH`
    PropPatch => "PROPPATCH",
    /// `PURGE`
    Purge => "PURGE",
    /// `PUT`
    Put => "PUT",
    /// `REBIND`
    Rebind => "REBIND",
    /// `REPORT`
    Report => "REPORT",
    /// `SEARCH`
    Search => "SEARCH",
    /// `SOURCE`
    Source => "SOURCE",
    /// `SUBSCRIBE`
    Subscribe => "SUBSCRIBE",
    /// `TRACE`
    Trace => "TRACE",
    /// `UNBIND`
    Unbind => "UNBIND",
    /// `UNLINK`
    Unlink => "UNLINK",
    /// `UNLOCK`
    Unlock => "UNLOCK",
    /// `UNSUBSCRIBE`
    Unsubscribe => "UNSUBSCRIBE",
    /// Synthetic fallback: matches any method without a dedicated chain.
    All => "ALL",
}

impl Method {
    /// Whether this is the synthetic `ALL` slot.
    pub const fn is_all(&self) -> bool {
        matches!(self, Method::All)
    }

    /// Whether static assets may be served for this method.
    pub const fn is_read_only(&self) -> bool {
        matches!(self, Method::Get | Method::Head)
    }
}

impl FromStr for Method {
    type Err = MethodError;

    /// Parses a method name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::VARIANTS
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| MethodError::Unsupported(s.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
