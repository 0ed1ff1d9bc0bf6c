//! Minimal seam example — a toy HTTP/1.1 server wired through `configure`.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/healthz
//!   curl http://localhost:3000/users/42

use std::collections::HashMap;
use std::sync::Arc;

use seam::{
    BoxFuture, Dep, Hook, Method, Next, Outgoing, RawHandler, Registry, Request, RouteSpec, Stage,
    configure,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn};

// ── A toy server ──────────────────────────────────────────────────────────────
//
// seam does not ship a server; it wires one. This toy implements just
// enough of `Registry` to route GET requests and run a `use` stage — a
// real project would back this with its framework of choice.

#[derive(Default)]
struct Toy {
    stack: Vec<RawHandler>,
    routes: HashMap<Method, matchit::Router<Vec<RawHandler>>>,
}

impl Registry for Toy {
    fn route(&mut self, method: Method, spec: RouteSpec, handlers: Vec<RawHandler>) {
        let path = match spec {
            RouteSpec::Path(p) => p,
            RouteSpec::Prefix(p) => format!("{p}/{{*rest}}"),
        };
        self.routes
            .entry(method)
            .or_default()
            .insert(&path, handlers)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
    }

    fn apply(&mut self, _stage: Stage, handlers: Vec<RawHandler>) {
        self.stack.extend(handlers);
    }

    fn supports(&self, hook: Hook) -> bool {
        matches!(hook, Hook::Stage(Stage::Use) | Hook::Verb(Method::Get))
    }
}

impl Toy {
    async fn handle(&self, req: Request) -> Outgoing {
        let res = Outgoing::new();
        let path = req.path().to_owned();

        let matched = self.routes.get(&req.method()).and_then(|router| {
            router.at(&path).ok().map(|m| {
                let params: Vec<(String, String)> = m
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                (m.value.clone(), params)
            })
        });

        match matched {
            Some((route_handlers, params)) => {
                let mut req = req;
                for (key, value) in &params {
                    req = req.with_param(key, value);
                }
                let mut chain = self.stack.clone();
                chain.extend(route_handlers);
                if let Err(e) = run(Arc::new(chain), 0, req, res.clone()).await {
                    warn!(error = %e, "handler chain failed");
                    res.status(500);
                    res.text("internal error");
                }
            }
            None => res.status(404),
        }
        res
    }
}

/// Runs `chain[index..]` as a middleware chain: each handler receives a
/// `Next` that continues with the rest.
fn run(chain: Arc<Vec<RawHandler>>, index: usize, req: Request, res: Outgoing) -> BoxFuture {
    let Some(handler) = chain.get(index).cloned() else {
        return Box::pin(std::future::ready(Ok(())));
    };
    let next = {
        let chain = Arc::clone(&chain);
        let req = req.clone();
        let res = res.clone();
        Next::new(move || run(Arc::clone(&chain), index + 1, req.clone(), res.clone()))
    };
    handler.call(req, res, next)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

struct Greeting {
    salutation: &'static str,
}

async fn trace_requests(req: Request, next: Next) {
    info!(method = %req.method(), path = req.path(), "request");
    let _ = next.run().await;
}

async fn healthz(res: Outgoing) {
    res.text("ok");
}

async fn get_user(req: Request, res: Outgoing, greeting: Dep<Greeting>) {
    let id = req.param("id").unwrap_or("unknown");
    res.json(format!(r#"{{"greeting":"{} user {}"}}"#, greeting.salutation, id).into_bytes());
}

// ── Wiring and serving ────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = configure(Toy::default());
    app.container().register(Greeting { salutation: "hello" });

    let app = app
        .apply(trace_requests)
        .get("/healthz", healthz)
        .get("/users/{id}", get_user);

    let toy = Arc::new(app.into_inner());

    let listener = TcpListener::bind("127.0.0.1:3000").await.expect("bind");
    info!("toy server listening on 127.0.0.1:3000");

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("accept error: {e}");
                continue;
            }
        };
        let toy = Arc::clone(&toy);
        tokio::spawn(async move {
            if let Err(e) = serve(toy, stream).await {
                error!("connection error: {e}");
            }
        });
    }
}

/// One connection, one request — headers only, no body. Enough to
/// demonstrate the wiring; not enough to call an HTTP server.
async fn serve(toy: Arc<Toy>, stream: TcpStream) -> std::io::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    let Some(line) = lines.next_line().await? else {
        return Ok(());
    };
    let mut parts = line.split_whitespace();
    let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
        return Ok(());
    };
    let Ok(method) = method.parse::<Method>() else {
        let res = Outgoing::new();
        res.status(405);
        return res.write_to(&mut write).await;
    };

    let mut req = Request::new(method, path);
    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            req = req.with_header(name.trim(), value.trim());
        }
    }

    let res = toy.handle(req).await;
    res.write_to(&mut write).await
}
