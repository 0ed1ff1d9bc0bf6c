//! End-to-end tests of the configurator against a recording fake server.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use seam::{
    Container, Dep, Error, Hook, Method, Next, Outgoing, RawHandler, Registry, Request, RouteSpec,
    Stage, configure, configure_with,
};

/// Records every registration verbatim, the way a real server would fill
/// its routing and middleware tables.
#[derive(Default)]
struct FakeServer {
    routed: Vec<(Method, RouteSpec, Vec<RawHandler>)>,
    staged: Vec<(Stage, Vec<RawHandler>)>,
    missing: Vec<Hook>,
}

impl FakeServer {
    fn without(hooks: &[Hook]) -> Self {
        Self {
            missing: hooks.to_vec(),
            ..Self::default()
        }
    }
}

impl Registry for FakeServer {
    fn route(&mut self, method: Method, spec: RouteSpec, handlers: Vec<RawHandler>) {
        self.routed.push((method, spec, handlers));
    }

    fn apply(&mut self, stage: Stage, handlers: Vec<RawHandler>) {
        self.staged.push((stage, handlers));
    }

    fn supports(&self, hook: Hook) -> bool {
        !self.missing.contains(&hook)
    }
}

async fn noop() {}

#[test]
fn unrouted_registration_wraps_each_handler() {
    let server = configure(FakeServer::default())
        .apply((noop, noop, noop))
        .into_inner();

    assert_eq!(server.staged.len(), 1);
    let (stage, handlers) = &server.staged[0];
    assert_eq!(*stage, Stage::Use);
    assert_eq!(handlers.len(), 3);
}

#[test]
fn pre_registers_against_the_pre_stage() {
    let server = configure(FakeServer::default()).pre(noop).into_inner();
    assert_eq!(server.staged.len(), 1);
    assert_eq!(server.staged[0].0, Stage::Pre);
}

#[test]
fn routed_registration_forwards_spec_unchanged() {
    let server = configure(FakeServer::default())
        .on(Method::Get, "/users/{id}", noop)
        .into_inner();

    assert_eq!(server.routed.len(), 1);
    let (method, spec, handlers) = &server.routed[0];
    assert_eq!(*method, Method::Get);
    assert_eq!(*spec, RouteSpec::Path("/users/{id}".to_owned()));
    assert_eq!(handlers.len(), 1);
}

#[test]
fn unsupported_hook_is_skipped_silently() {
    let fake = FakeServer::without(&[Hook::Verb(Method::Mkcol), Hook::Stage(Stage::Pre)]);
    let server = configure(fake)
        .on(Method::Mkcol, "/dav", noop)
        .pre(noop)
        .get("/ok", noop)
        .into_inner();

    assert!(server.staged.is_empty());
    assert_eq!(server.routed.len(), 1);
    assert_eq!(server.routed[0].0, Method::Get);
}

#[test]
fn default_containers_are_created_and_independent() {
    struct Marker;

    let a = configure(FakeServer::default());
    let b = configure(FakeServer::default());
    a.container().register(Marker);

    assert!(a.container().get::<Marker>().is_some());
    assert!(b.container().get::<Marker>().is_none());
}

#[tokio::test]
async fn wrapped_handler_receives_the_request_triple() {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler = {
        let hits = Arc::clone(&hits);
        move |req: Request, res: Outgoing, next: Next| {
            let hits = Arc::clone(&hits);
            async move {
                assert_eq!(req.path(), "/ping");
                assert_eq!(req.header("x-request-id"), Some("42"));
                res.status(204);
                let _ = next.run().await;
                hits.fetch_add(1, Ordering::SeqCst);
            }
        }
    };

    let server = configure(FakeServer::default())
        .get("/ping", handler)
        .into_inner();
    let raw = &server.routed[0].2[0];

    let reached_tail = Arc::new(AtomicBool::new(false));
    let tail = {
        let reached = Arc::clone(&reached_tail);
        Next::new(move || {
            reached.store(true, Ordering::SeqCst);
            Box::pin(std::future::ready(Ok(())))
        })
    };

    let req = Request::new(Method::Get, "/ping").with_header("x-request-id", "42");
    let res = Outgoing::new();
    raw.call(req, res.clone(), tail).await.unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(res.status_code(), 204);
    assert!(reached_tail.load(Ordering::SeqCst));
}

#[tokio::test]
async fn container_dependency_resolves_into_the_handler() {
    struct Greeting {
        salutation: &'static str,
    }

    let handler = |greeting: Dep<Greeting>, res: Outgoing| async move {
        res.text(greeting.salutation);
    };

    let container = Arc::new(Container::new());
    container.register(Greeting { salutation: "hello" });

    let server = configure_with(FakeServer::default(), Arc::clone(&container))
        .get("/greet", handler)
        .into_inner();

    let res = Outgoing::new();
    server.routed[0].2[0]
        .call(Request::new(Method::Get, "/greet"), res.clone(), Next::noop())
        .await
        .unwrap();

    assert_eq!(res.body(), b"hello");
}

#[tokio::test]
async fn unresolved_dependency_fails_before_the_body_runs() {
    struct Pool;

    let hits = Arc::new(AtomicUsize::new(0));
    let handler = {
        let hits = Arc::clone(&hits);
        move |_db: Dep<Pool>| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
            }
        }
    };

    let server = configure(FakeServer::default())
        .get("/db", handler)
        .into_inner();

    let err = server.routed[0].2[0]
        .call(Request::new(Method::Get, "/db"), Outgoing::new(), Next::noop())
        .await
        .unwrap_err();

    let Error::Unresolved { dependency } = err;
    assert!(dependency.contains("Pool"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn handler_lists_run_in_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let tag = |name: &'static str| {
        let order = Arc::clone(&order);
        move |_req: Request| {
            let order = Arc::clone(&order);
            async move {
                order.lock().unwrap().push(name);
            }
        }
    };

    let server = configure(FakeServer::default())
        .apply((tag("first"), tag("second")))
        .into_inner();

    for raw in &server.staged[0].1 {
        raw.call(Request::new(Method::Get, "/"), Outgoing::new(), Next::noop())
            .await
            .unwrap();
    }

    assert_eq!(*order.lock().unwrap(), ["first", "second"]);
}

#[tokio::test]
async fn nested_configuration_wraps_exactly_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler = {
        let hits = Arc::clone(&hits);
        move |_req: Request| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
            }
        }
    };

    let once = configure(FakeServer::default());
    let server = configure(once).apply(handler).into_inner().into_inner();

    assert_eq!(server.staged.len(), 1);
    assert_eq!(server.staged[0].1.len(), 1);

    server.staged[0].1[0]
        .call(Request::new(Method::Get, "/"), Outgoing::new(), Next::noop())
        .await
        .unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
