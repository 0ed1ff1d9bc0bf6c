//! Handler traits and the dependency-resolving adapter.
//!
//! # From declared parameters to the server's shape
//!
//! A server stores handlers of one fixed shape, `(Request, Outgoing, Next)`
//! returning a future ([`RawHandler`]). Application handlers declare what
//! they actually want:
//!
//! ```text
//! async fn create_user(req: Request, res: Outgoing, db: Dep<Pool>) { … }  ← user writes this
//!        ↓ app.post("/users", create_user)
//! Handlers::into_wrapped                       ← one RawHandler per handler
//!        ↓ stored in the server's tables
//! raw.call(req, res, next)  at request time
//!        ↓ fresh Scope { req, res, next } + the shared container
//! container.invoke(&handler, scope)            ← resolves each parameter, runs the body
//! ```
//!
//! The per-request cost is one `Scope`, one clone per parameter, and one
//! boxed future — negligible next to network I/O.
//!
//! # Return values
//!
//! A handler's return value is deliberately discarded. Handlers talk to
//! the client through [`Outgoing`](crate::Outgoing) and to the rest of the
//! chain through [`Next`](crate::Next); a returned value would have no one
//! to receive it. (Returning `Result<(), E>` still reads naturally — the
//! `Err` is dropped, so surface failures on the response instead.)

use std::future::Future;
use std::sync::Arc;

use crate::container::Container;
use crate::registry::{BoxFuture, RawHandler};
use crate::scope::{Resolve, Scope};

/// Implemented for every function usable as an injected handler.
///
/// Automatically satisfied for `async fn`s and closures of zero to five
/// parameters where every parameter type implements [`Resolve`]. The `M`
/// parameter is a compiler-facing marker for the parameter list; you never
/// name it.
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impls below can satisfy it, which keeps the dispatch surface
/// stable across versions.
pub trait Handler<M>: private::Sealed<M> + Send + Sync + 'static {
    #[doc(hidden)]
    fn call(&self, scope: Scope) -> BoxFuture;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed<M> {}
}

macro_rules! impl_handler {
    ($($param:ident),*) => {
        impl<F, Fut, R, $($param,)*> private::Sealed<($($param,)*)> for F
        where
            F: Fn($($param),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: Send + 'static,
            $($param: Resolve,)*
        {
        }

        impl<F, Fut, R, $($param,)*> Handler<($($param,)*)> for F
        where
            F: Fn($($param),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: Send + 'static,
            $($param: Resolve,)*
        {
            #[allow(non_snake_case, unused_variables)]
            fn call(&self, scope: Scope) -> BoxFuture {
                // Resolve every parameter before the body runs; the first
                // failure fails the whole invocation, untouched.
                $(
                    let $param = match <$param as Resolve>::resolve(&scope) {
                        Ok(value) => value,
                        Err(e) => return Box::pin(std::future::ready(Err(e))),
                    };
                )*
                let fut = (self)($($param),*);
                Box::pin(async move {
                    let _ = fut.await;
                    Ok(())
                })
            }
        }
    };
}

impl_handler!();
impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);
impl_handler!(A1, A2, A3, A4);
impl_handler!(A1, A2, A3, A4, A5);

// ── Handler lists ─────────────────────────────────────────────────────────────

/// One registration call can install several handlers — `(auth, audit,
/// get_user)` runs left to right, exactly as the server orders them.
///
/// Implemented for a single handler and for tuples of two to four.
pub trait Handlers<M> {
    /// Wraps each handler into the server's native shape, in order.
    fn into_wrapped(self, container: &Arc<Container>) -> Vec<RawHandler>;
}

impl<H, M> Handlers<(M,)> for H
where
    H: Handler<M>,
    M: 'static,
{
    fn into_wrapped(self, container: &Arc<Container>) -> Vec<RawHandler> {
        vec![wrap(self, Arc::clone(container))]
    }
}

macro_rules! impl_handlers {
    ($(($h:ident, $m:ident, $idx:tt)),+) => {
        impl<$($h, $m,)+> Handlers<($(($m,),)+)> for ($($h,)+)
        where
            $($h: Handler<$m>, $m: 'static,)+
        {
            fn into_wrapped(self, container: &Arc<Container>) -> Vec<RawHandler> {
                vec![$(wrap(self.$idx, Arc::clone(container)),)+]
            }
        }
    };
}

impl_handlers!((H1, M1, 0), (H2, M2, 1));
impl_handlers!((H1, M1, 0), (H2, M2, 1), (H3, M3, 2));
impl_handlers!((H1, M1, 0), (H2, M2, 1), (H3, M3, 2), (H4, M4, 3));

// ── The adapter ───────────────────────────────────────────────────────────────

/// The dependency-resolving adapter: one handler in, one [`RawHandler`]
/// out. Each invocation builds a fresh [`Scope`] from that request's
/// triple and delegates to the container.
pub(crate) fn wrap<H, M>(handler: H, container: Arc<Container>) -> RawHandler
where
    H: Handler<M>,
    M: 'static,
{
    let handler = Arc::new(handler);
    RawHandler::new(move |req, res, next| {
        let scope = Scope::new(req, res, next, Arc::clone(&container));
        container.invoke(handler.as_ref(), scope)
    })
}
