//! Unified error type.

use std::fmt;

/// The error type surfaced by dependency resolution.
///
/// Application-level failures (bad input, missing records) belong in the
/// response a handler writes, not here. Infrastructure failures (bind,
/// accept, parse) stay on the server's side of the seam. What remains is
/// the one thing this crate itself can fail at: a handler declared a
/// dependency that cannot be supplied for the current request.
///
/// A resolution failure is never caught or downgraded by the wrapping
/// layer — it fails the wrapped handler's future, and the server decides
/// what an errored handler means for the connection.
#[derive(Debug)]
pub enum Error {
    /// No value of the requested type is registered in the container or
    /// present in the request scope.
    Unresolved {
        /// Type name of the dependency that could not be supplied.
        dependency: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved { dependency } => {
                write!(f, "unresolved dependency: {dependency}")
            }
        }
    }
}

impl std::error::Error for Error {}
