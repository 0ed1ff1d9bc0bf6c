//! The server-side registration contract.
//!
//! This crate does not ship a server. It wires one: [`Registry`] is the
//! server's half of the seam — the finite set of named registration entry
//! points the configurator can reach. A server implements `Registry`;
//! [`configure`](crate::configure) wraps it.
//!
//! Two calling shapes exist, modelled as two methods rather than one
//! variadic signature:
//!
//! - **routed** — a leading [`RouteSpec`] plus an ordered list of handlers
//! - **unrouted** — an ordered list of handlers only, against a
//!   [`Stage`]
//!
//! Handlers cross the seam in the server's native shape, [`RawHandler`]:
//! a function of `(Request, Outgoing, Next)` returning a future. What the
//! server does with them afterwards — routing tables, middleware stacks,
//! ordering — is entirely its own business.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::hook::{Hook, Stage};
use crate::method::Method;
use crate::outgoing::Outgoing;
use crate::request::Request;

/// A heap-allocated, type-erased future that resolves when a handler
/// finishes — or fails before the body runs, if a dependency could not
/// be resolved.
pub type BoxFuture = Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'static>>;

type RawHandlerFn = dyn Fn(Request, Outgoing, Next) -> BoxFuture + Send + Sync + 'static;

/// A handler in the server's native three-argument shape, ready to be
/// stored in routing or middleware tables.
///
/// Cheap to clone (one `Arc`), safe to invoke from concurrent requests.
#[derive(Clone)]
pub struct RawHandler(Arc<RawHandlerFn>);

impl RawHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Request, Outgoing, Next) -> BoxFuture + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invokes the handler for one request.
    pub fn call(&self, req: Request, res: Outgoing, next: Next) -> BoxFuture {
        (self.0.as_ref())(req, res, next)
    }
}

impl fmt::Debug for RawHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawHandler")
    }
}

// ── Next ──────────────────────────────────────────────────────────────────────

/// The continuation: runs the rest of the handler chain for this request.
///
/// Cloning is cheap (one `Arc`). A handler that does not call
/// [`Next::run`] ends the chain — the response as accumulated so far is
/// what the server writes.
#[derive(Clone)]
pub struct Next(Arc<dyn Fn() -> BoxFuture + Send + Sync + 'static>);

impl Next {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> BoxFuture + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// A continuation that does nothing — the tail of a handler chain.
    pub fn noop() -> Self {
        Self::new(|| Box::pin(std::future::ready(Ok(()))))
    }

    /// Runs the remainder of the chain.
    pub fn run(&self) -> BoxFuture {
        (self.0.as_ref())()
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Next")
    }
}

// ── RouteSpec ─────────────────────────────────────────────────────────────────

/// The leading argument of a routed registration.
///
/// Forwarded to the server unchanged — path syntax (`{id}`, `:id`, globs)
/// is the server's router's dialect, not this crate's.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RouteSpec {
    /// An exact path or path pattern.
    Path(String),
    /// A prefix under which the handlers apply.
    Prefix(String),
}

impl From<&str> for RouteSpec {
    fn from(path: &str) -> Self {
        Self::Path(path.to_owned())
    }
}

impl From<String> for RouteSpec {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// The registration surface a server exposes to
/// [`configure`](crate::configure).
pub trait Registry {
    /// Routed registration: handlers for one method + route pair.
    fn route(&mut self, method: Method, spec: RouteSpec, handlers: Vec<RawHandler>);

    /// Unrouted registration: handlers that run for every request at
    /// `stage`.
    fn apply(&mut self, stage: Stage, handlers: Vec<RawHandler>);

    /// Whether this server implements the given registration hook.
    ///
    /// Registrations against unsupported hooks are skipped silently — a
    /// server is not required to implement every verb in [`Method::ALL`].
    fn supports(&self, hook: Hook) -> bool {
        let _ = hook;
        true
    }
}
