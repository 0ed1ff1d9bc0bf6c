//! # seam
//!
//! Dependency injection for HTTP handler registration. Nothing more.
//! Nothing less.
//!
//! ## The contract
//!
//! Your server owns sockets, routing, and the request lifecycle. Your
//! handlers own application logic. seam owns the seam between them: it
//! takes a server's registration surface and hands back the same surface,
//! except that every handler you register declares the values it needs —
//! the request, the response handle, the continuation, anything in the
//! [`Container`] — and receives them resolved, per request, when it runs.
//!
//! What the server keeps owning — seam intentionally ignores:
//!
//! - **Route matching** — the route spec is forwarded unchanged; `{id}`
//!   vs `:id` is the server's router's dialect
//! - **HTTP semantics** — parsing, status lines, keep-alive
//! - **Handler ordering** — chains run exactly as registered
//!
//! What's left for seam — the only part that changes between applications:
//!
//! - Wiring every registration hook the server exposes to one shared
//!   injection [`Container`]
//! - Resolving each handler's declared parameters, exactly once per request
//! - Staying out of the way of failures — an unresolvable dependency fails
//!   the handler's future, loudly, before the body runs
//!
//! ## Quick start
//!
//! ```rust
//! use seam::{configure, Dep, Method, Next, Outgoing, Request};
//! # use seam::{RawHandler, Registry, RouteSpec, Stage};
//! # #[derive(Default)]
//! # struct Server { routes: Vec<(Method, RouteSpec, Vec<RawHandler>)> }
//! # impl Registry for Server {
//! #     fn route(&mut self, m: Method, s: RouteSpec, hs: Vec<RawHandler>) {
//! #         self.routes.push((m, s, hs));
//! #     }
//! #     fn apply(&mut self, _stage: Stage, _handlers: Vec<RawHandler>) {}
//! # }
//! struct Pool;
//!
//! async fn get_user(req: Request, res: Outgoing, _db: Dep<Pool>) {
//!     let id = req.param("id").unwrap_or("unknown");
//!     // real app: _db.query(...)
//!     res.json(format!(r#"{{"id":"{id}"}}"#).into_bytes());
//! }
//!
//! async fn trace(_req: Request, next: Next) {
//!     // runs before routing, for every request
//!     let _ = next.run().await;
//! }
//!
//! let app = configure(Server::default());
//! app.container().register(Pool);
//!
//! let app = app
//!     .pre(trace)
//!     .get("/users/{id}", get_user);
//! # let _server = app.into_inner();
//! ```
//!
//! The server is anything implementing [`Registry`] — two registration
//! shapes (routed and unrouted) plus a [`supports`](Registry::supports)
//! probe. Hooks the server does not expose are skipped silently; the rest
//! behave exactly as before, except the handlers stored in the server's
//! tables are the dependency-resolving wrappers.

mod container;
mod error;
mod handler;
mod hook;
mod inject;
mod method;
mod outgoing;
mod registry;
mod request;
mod scope;

pub use container::Container;
pub use error::Error;
pub use handler::{Handler, Handlers};
pub use hook::{Hook, Stage};
pub use inject::{Injected, configure, configure_with};
pub use method::Method;
pub use outgoing::Outgoing;
pub use registry::{BoxFuture, Next, RawHandler, Registry, RouteSpec};
pub use request::Request;
pub use scope::{Dep, Resolve, Scope};
