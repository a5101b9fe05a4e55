//! Context capabilities required by the built-in handlers.
//!
//! The host framework owns the context type. Routes only need a few
//! operations from it, expressed as small traits so that a context can opt
//! into exactly the built-in handlers it uses.

use std::path::Path;

/// Issues a redirect response.
///
/// Required by routes configured with a redirect target.
pub trait Redirect {
    /// Redirect the current request to `location`.
    fn redirect(&mut self, location: &str);
}

impl<T: Redirect + ?Sized> Redirect for &mut T {
    fn redirect(&mut self, location: &str) {
        (**self).redirect(location)
    }
}

impl<T: Redirect + ?Sized> Redirect for Box<T> {
    fn redirect(&mut self, location: &str) {
        (**self).redirect(location)
    }
}

/// Delivers a file from disk as the response body.
///
/// Required by the filesystem asset sender. Reading and streaming the file
/// is left to the host.
pub trait ServeFile {
    /// Respond with the contents of `file`.
    fn serve_file(&mut self, file: &Path);
}

impl<T: ServeFile + ?Sized> ServeFile for &mut T {
    fn serve_file(&mut self, file: &Path) {
        (**self).serve_file(file)
    }
}
