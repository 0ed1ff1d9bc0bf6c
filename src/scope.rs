//! Per-request resolution scope.
//!
//! A [`Scope`] is created fresh for every invocation of a wrapped handler
//! and discarded when resolution finishes. It carries exactly the three
//! values the server supplies for one request — the request, the response
//! handle, and the continuation — plus the long-lived container, and it is
//! the sole source a handler's declared parameters are drawn from. Nothing
//! request-scoped is ever stored on the container, so interleaved requests
//! cannot observe each other's values.

use std::any::type_name;
use std::ops::Deref;
use std::sync::Arc;

use crate::container::Container;
use crate::error::Error;
use crate::outgoing::Outgoing;
use crate::registry::Next;
use crate::request::Request;

/// The per-request bundle of resolvable values.
pub struct Scope {
    req: Request,
    res: Outgoing,
    next: Next,
    container: Arc<Container>,
}

impl Scope {
    pub fn new(req: Request, res: Outgoing, next: Next, container: Arc<Container>) -> Self {
        Self {
            req,
            res,
            next,
            container,
        }
    }

    pub fn request(&self) -> &Request {
        &self.req
    }

    pub fn outgoing(&self) -> &Outgoing {
        &self.res
    }

    pub fn next(&self) -> &Next {
        &self.next
    }

    pub fn container(&self) -> &Container {
        &self.container
    }
}

// ── Resolve ───────────────────────────────────────────────────────────────────

/// A value a handler can declare as a parameter.
///
/// Implemented for the three per-request values ([`Request`], [`Outgoing`],
/// [`Next`]) and for [`Dep<T>`], which pulls a registered value from the
/// container. Implement it on your own types to build richer extractors:
///
/// ```rust
/// use seam::{Error, Resolve, Scope};
///
/// /// The request's bearer token, if any.
/// struct Bearer(String);
///
/// impl Resolve for Bearer {
///     fn resolve(scope: &Scope) -> Result<Self, Error> {
///         scope
///             .request()
///             .header("authorization")
///             .and_then(|v| v.strip_prefix("Bearer "))
///             .map(|token| Bearer(token.to_owned()))
///             .ok_or(Error::Unresolved { dependency: "Bearer" })
///     }
/// }
/// ```
pub trait Resolve: Sized + Send + 'static {
    fn resolve(scope: &Scope) -> Result<Self, Error>;
}

impl Resolve for Request {
    fn resolve(scope: &Scope) -> Result<Self, Error> {
        Ok(scope.req.clone())
    }
}

impl Resolve for Outgoing {
    fn resolve(scope: &Scope) -> Result<Self, Error> {
        Ok(scope.res.clone())
    }
}

impl Resolve for Next {
    fn resolve(scope: &Scope) -> Result<Self, Error> {
        Ok(scope.next.clone())
    }
}

// ── Dep ───────────────────────────────────────────────────────────────────────

/// A dependency registered in the container.
///
/// `Dep<T>` resolves to a shared handle on the `T` registered via
/// [`Container::register`]; it derefs to `T`. Resolution fails with
/// [`Error::Unresolved`] if no `T` was registered — before the handler
/// body runs.
pub struct Dep<T>(pub Arc<T>);

impl<T: Send + Sync + 'static> Resolve for Dep<T> {
    fn resolve(scope: &Scope) -> Result<Self, Error> {
        scope.container.get::<T>().map(Dep).ok_or(Error::Unresolved {
            dependency: type_name::<T>(),
        })
    }
}

impl<T> Deref for Dep<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> Clone for Dep<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Dep, Resolve, Scope};
    use crate::container::Container;
    use crate::method::Method;
    use crate::outgoing::Outgoing;
    use crate::registry::Next;
    use crate::request::Request;

    #[test]
    fn triple_resolves_from_the_scope() {
        let scope = Scope::new(
            Request::new(Method::Get, "/x"),
            Outgoing::new(),
            Next::noop(),
            Arc::new(Container::new()),
        );

        let req = Request::resolve(&scope).unwrap();
        assert_eq!(req.path(), "/x");

        // the resolved Outgoing is a handle on the scope's response
        let res = Outgoing::resolve(&scope).unwrap();
        res.status(418);
        assert_eq!(scope.outgoing().status_code(), 418);

        assert!(Next::resolve(&scope).is_ok());
    }

    #[test]
    fn dep_derefs_to_the_registered_value() {
        struct Limits {
            max: usize,
        }

        let container = Arc::new(Container::new());
        container.register(Limits { max: 8 });
        let scope = Scope::new(
            Request::new(Method::Get, "/"),
            Outgoing::new(),
            Next::noop(),
            container,
        );

        let limits = Dep::<Limits>::resolve(&scope).unwrap();
        assert_eq!(limits.max, 8);
    }

    #[test]
    fn dep_fails_without_a_registration() {
        struct Pool;
        let scope = Scope::new(
            Request::new(Method::Get, "/"),
            Outgoing::new(),
            Next::noop(),
            Arc::new(Container::new()),
        );
        assert!(Dep::<Pool>::resolve(&scope).is_err());
    }
}
