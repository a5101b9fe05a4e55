//! Standard before-hooks.

pub mod logging;
pub mod tracing;

pub use self::logging::LoggingMiddleware;
pub use self::tracing::{Traceable, TracingMiddleware};
