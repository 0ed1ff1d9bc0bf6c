//! Outgoing HTTP response handle.
//!
//! Unlike a value-returning response type, [`Outgoing`] is a shared handle:
//! every handler in a chain sees the same response-in-progress, which is
//! what lets a middleware set a header and a later route handler set the
//! body. The server writes the accumulated response to the wire once the
//! chain finishes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Clone)]
struct Parts {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

/// The response being built for one request.
///
/// Cloning returns another handle to the same response. Defaults to
/// `200 OK` with no headers and an empty body.
///
/// ```rust
/// use seam::Outgoing;
///
/// let res = Outgoing::new();
/// res.status(201);
/// res.header("location", "/users/42");
/// res.json(br#"{"id":42}"#.to_vec());
/// ```
#[derive(Clone)]
pub struct Outgoing {
    inner: Arc<Mutex<Parts>>,
}

impl Outgoing {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Parts {
                status: 200,
                headers: Vec::new(),
                body: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Parts> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self, code: u16) {
        self.lock().status = code;
    }

    pub fn status_code(&self) -> u16 {
        self.lock().status
    }

    pub fn header(&self, name: &str, value: &str) {
        self.lock()
            .headers
            .push((name.to_owned(), value.to_owned()));
    }

    /// The body as accumulated so far.
    pub fn body(&self) -> Vec<u8> {
        self.lock().body.clone()
    }

    /// Sets an `application/json` body.
    ///
    /// Pass bytes from your serialiser directly — no intermediate
    /// allocation: `serde_json::to_vec(&user).unwrap()` or
    /// `format!(r#"{{"id":{id}}}"#).into_bytes()`.
    pub fn json(&self, body: Vec<u8>) {
        self.set_body("application/json", body);
    }

    /// Sets a `text/plain; charset=utf-8` body.
    pub fn text(&self, body: impl Into<String>) {
        self.set_body("text/plain; charset=utf-8", body.into().into_bytes());
    }

    /// Sets a raw body with an explicit content type.
    pub fn bytes(&self, content_type: &str, body: Vec<u8>) {
        self.set_body(content_type, body);
    }

    fn set_body(&self, content_type: &str, body: Vec<u8>) {
        let mut parts = self.lock();
        parts
            .headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case("content-type"));
        parts
            .headers
            .push(("content-type".to_owned(), content_type.to_owned()));
        parts.body = body;
    }

    /// Serialises the accumulated response as HTTP/1.1.
    ///
    /// For servers that speak the wire themselves; framework-backed
    /// servers will read the parts out through the accessors instead.
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> std::io::Result<()> {
        let parts = self.lock().clone();
        writer
            .write_all(format!("HTTP/1.1 {} {}\r\n", parts.status, reason(parts.status)).as_bytes())
            .await?;
        writer
            .write_all(format!("content-length: {}\r\n", parts.body.len()).as_bytes())
            .await?;
        // the length line above is authoritative; drop any caller-set copy
        for (name, value) in parts
            .headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("content-length"))
        {
            writer
                .write_all(format!("{name}: {value}\r\n").as_bytes())
                .await?;
        }
        writer.write_all(b"\r\n").await?;
        writer.write_all(&parts.body).await?;
        writer.flush().await
    }
}

impl Default for Outgoing {
    fn default() -> Self {
        Self::new()
    }
}

fn reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        422 => "Unprocessable Content",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::Outgoing;

    #[test]
    fn clones_share_one_response() {
        let res = Outgoing::new();
        let other = res.clone();
        other.status(204);
        other.header("x-trace", "1");
        assert_eq!(res.status_code(), 204);
    }

    #[test]
    fn setting_a_body_replaces_the_content_type() {
        let res = Outgoing::new();
        res.text("hello");
        res.json(b"{}".to_vec());
        assert_eq!(res.body(), b"{}");
    }

    #[tokio::test]
    async fn caller_set_content_length_is_not_duplicated() {
        let res = Outgoing::new();
        res.header("content-length", "999");
        res.text("hi");

        let mut wire = Vec::new();
        res.write_to(&mut wire).await.unwrap();

        let wire = String::from_utf8(wire).unwrap();
        assert_eq!(wire.matches("content-length").count(), 1);
        assert!(wire.contains("content-length: 2\r\n"));
    }

    #[tokio::test]
    async fn writes_http1_wire_format() {
        let res = Outgoing::new();
        res.status(201);
        res.header("location", "/users/42");
        res.text("created");

        let mut wire = Vec::new();
        res.write_to(&mut wire).await.unwrap();

        let wire = String::from_utf8(wire).unwrap();
        assert!(wire.starts_with("HTTP/1.1 201 Created\r\n"));
        assert!(wire.contains("content-length: 7\r\n"));
        assert!(wire.contains("location: /users/42\r\n"));
        assert!(wire.ends_with("\r\ncreated"));
    }
}
