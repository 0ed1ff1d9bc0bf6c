//! The configurator.
//!
//! [`configure`] is the crate's entry point: give it a server (anything
//! implementing [`Registry`]) and get back an [`Injected`] handle whose
//! registration surface matches the server's, except that every handler
//! registered through it is swapped for its dependency-resolving adapter
//! before delegation.
//!
//! The original registration operations are captured at configuration time
//! — `Injected` owns the server — and delegation preserves the server's
//! contract exactly: same route spec, same handler count, same order.
//! Hooks the server does not expose are skipped silently; the underlying
//! server may not support every verb.
//!
//! Configuring an already-configured server is harmless. `Injected`'s own
//! [`Registry`] impl delegates raw handlers untouched, so nesting wraps a
//! handler exactly once.

use std::sync::Arc;

use tracing::debug;

use crate::container::Container;
use crate::handler::Handlers;
use crate::hook::{Hook, Stage};
use crate::method::Method;
use crate::registry::{RawHandler, Registry, RouteSpec};

/// Wires `server`'s registration hooks to a fresh [`Container`].
pub fn configure<R: Registry>(server: R) -> Injected<R> {
    configure_with(server, Arc::new(Container::new()))
}

/// Wires `server`'s registration hooks to an existing container.
///
/// Use this to share one container across servers, or to register
/// dependencies before configuration. The container is also reachable
/// afterwards through [`Injected::container`].
pub fn configure_with<R: Registry>(server: R, container: Arc<Container>) -> Injected<R> {
    for hook in Hook::all() {
        if server.supports(hook) {
            debug!(hook = %hook, "registration hook wired for injection");
        }
    }
    Injected {
        inner: server,
        container,
    }
}

/// A server whose registration surface resolves handler dependencies.
///
/// Register handlers through the typed methods ([`on`](Injected::on),
/// [`pre`](Injected::pre), [`apply`](Injected::apply), and the verb
/// shorthands), then unwrap the server with
/// [`into_inner`](Injected::into_inner) to start it.
pub struct Injected<R> {
    inner: R,
    container: Arc<Container>,
}

impl<R: Registry> Injected<R> {
    /// The container in use — register application dependencies here.
    pub fn container(&self) -> Arc<Container> {
        Arc::clone(&self.container)
    }

    /// The underlying server.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Unwraps the underlying server, typically to start it.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Registers pre-routing handlers (the `pre` stage).
    pub fn pre<M>(self, handlers: impl Handlers<M>) -> Self {
        self.stage(Stage::Pre, handlers)
    }

    /// Registers every-request handlers (the `use` stage).
    ///
    /// Named `apply` because `use` is a keyword.
    pub fn apply<M>(self, handlers: impl Handlers<M>) -> Self {
        self.stage(Stage::Use, handlers)
    }

    fn stage<M>(mut self, stage: Stage, handlers: impl Handlers<M>) -> Self {
        let hook = Hook::Stage(stage);
        if !self.inner.supports(hook) {
            debug!(hook = %hook, "server does not expose hook, registration skipped");
            return self;
        }
        let wrapped = handlers.into_wrapped(&self.container);
        self.inner.apply(stage, wrapped);
        self
    }

    /// Registers routed handlers for a method + route pair. Returns `self`
    /// so registrations chain naturally.
    ///
    /// The route spec is forwarded to the server unchanged.
    pub fn on<M>(
        mut self,
        method: Method,
        spec: impl Into<RouteSpec>,
        handlers: impl Handlers<M>,
    ) -> Self {
        let hook = Hook::Verb(method);
        if !self.inner.supports(hook) {
            debug!(hook = %hook, "server does not expose hook, registration skipped");
            return self;
        }
        let wrapped = handlers.into_wrapped(&self.container);
        self.inner.route(method, spec.into(), wrapped);
        self
    }

    pub fn get<M>(self, spec: impl Into<RouteSpec>, handlers: impl Handlers<M>) -> Self {
        self.on(Method::Get, spec, handlers)
    }

    pub fn post<M>(self, spec: impl Into<RouteSpec>, handlers: impl Handlers<M>) -> Self {
        self.on(Method::Post, spec, handlers)
    }

    pub fn put<M>(self, spec: impl Into<RouteSpec>, handlers: impl Handlers<M>) -> Self {
        self.on(Method::Put, spec, handlers)
    }

    pub fn patch<M>(self, spec: impl Into<RouteSpec>, handlers: impl Handlers<M>) -> Self {
        self.on(Method::Patch, spec, handlers)
    }

    pub fn delete<M>(self, spec: impl Into<RouteSpec>, handlers: impl Handlers<M>) -> Self {
        self.on(Method::Delete, spec, handlers)
    }
}

/// Raw pass-through, preserving the server's contract verbatim.
///
/// Handlers arriving already in the server's native shape need no
/// resolution; delegating them untouched is what makes nested
/// configuration wrap exactly once.
impl<R: Registry> Registry for Injected<R> {
    fn route(&mut self, method: Method, spec: RouteSpec, handlers: Vec<RawHandler>) {
        self.inner.route(method, spec, handlers);
    }

    fn apply(&mut self, stage: Stage, handlers: Vec<RawHandler>) {
        self.inner.apply(stage, handlers);
    }

    fn supports(&self, hook: Hook) -> bool {
        self.inner.supports(hook)
    }
}
