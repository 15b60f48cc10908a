//! Request pipeline
//!
//! Every request walks an ordered list of stages. A stage either mutates
//! the pending response headers and lets the request continue, or
//! produces the response and short-circuits the rest of the list. When
//! every stage declines, the pipeline falls back to 404.

pub mod security;
pub mod static_files;

use crate::config::Config;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderMap;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;

pub use security::SecurityHeaders;
pub use static_files::StaticFiles;

/// Request context shared by the stages
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub is_head: bool,
}

/// What a stage did with the request
pub enum StageOutcome {
    /// The stage mutated the pending response (or declined); the request
    /// continues to the next stage.
    Continue,
    /// The stage produced the response; remaining stages are skipped.
    Respond(Response<Full<Bytes>>),
}

/// One stage of the pipeline, dispatched in order
pub enum Stage {
    SecurityHeaders(SecurityHeaders),
    StaticFiles(StaticFiles),
}

impl Stage {
    async fn run(&self, ctx: &RequestContext<'_>, pending: &mut HeaderMap) -> StageOutcome {
        match self {
            Self::SecurityHeaders(headers) => {
                headers.apply(pending);
                StageOutcome::Continue
            }
            Self::StaticFiles(files) => match files.try_serve(ctx).await {
                Some(response) => StageOutcome::Respond(response),
                None => StageOutcome::Continue,
            },
        }
    }
}

/// The ordered stage list, built once at startup and shared across
/// requests. No per-request state survives a dispatch.
pub struct Pipeline {
    stages: Vec<Stage>,
    access_log: bool,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            stages: vec![
                Stage::SecurityHeaders(SecurityHeaders::new()),
                Stage::StaticFiles(StaticFiles::new(&config.static_root)),
            ],
            access_log: config.access_log,
        }
    }

    /// Dispatch one request through the stages.
    ///
    /// Generic over the request body type: no stage reads the body.
    pub async fn handle<B>(
        &self,
        req: Request<B>,
        peer_addr: SocketAddr,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let ctx = RequestContext {
            method: &method,
            path: &path,
            is_head: method == Method::HEAD,
        };

        let mut pending = HeaderMap::new();
        let mut response = None;

        for stage in &self.stages {
            match stage.run(&ctx, &mut pending).await {
                StageOutcome::Continue => {}
                StageOutcome::Respond(resp) => {
                    response = Some(resp);
                    break;
                }
            }
        }

        // No stage claimed the request
        let mut response = response.unwrap_or_else(http::build_404_response);

        // Pending headers decorate whatever response leaves the pipeline,
        // the 404 fallback included
        for (name, value) in &pending {
            response.headers_mut().insert(name.clone(), value.clone());
        }

        if self.access_log {
            let body_bytes = response
                .headers()
                .get("content-length")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            logger::log_access(
                &peer_addr,
                &method,
                &path,
                response.status().as_u16(),
                body_bytes,
            );
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::path::{Path, PathBuf};

    fn fixture_root(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("hardhat-pipeline-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn pipeline_for(root: &Path) -> Pipeline {
        Pipeline::new(&Config {
            port: "3000".to_string(),
            static_root: root.to_string_lossy().into_owned(),
            access_log: false,
        })
    }

    fn get_request(path: &str) -> Request<()> {
        Request::builder().uri(path).body(()).unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    #[tokio::test]
    async fn miss_falls_through_to_404_with_security_headers() {
        let root = fixture_root("miss");
        let pipeline = pipeline_for(&root);

        let resp = pipeline.handle(get_request("/nope"), peer()).await.unwrap();

        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["content-length"], "13");
        assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
        assert_eq!(resp.headers()["x-frame-options"], "SAMEORIGIN");
        assert_eq!(resp.headers()["cross-origin-resource-policy"], "same-origin");
    }

    #[tokio::test]
    async fn serves_index_byte_exact_with_security_headers() {
        let root = fixture_root("hit");
        std::fs::write(root.join("index.html"), b"<h1>exact bytes</h1>").unwrap();
        let pipeline = pipeline_for(&root);

        let resp = pipeline.handle(get_request("/"), peer()).await.unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<h1>exact bytes</h1>");
    }

    #[tokio::test]
    async fn repeated_requests_are_identical() {
        let root = fixture_root("idempotent");
        std::fs::write(root.join("index.html"), b"stable").unwrap();
        let pipeline = pipeline_for(&root);

        let first = pipeline.handle(get_request("/"), peer()).await.unwrap();
        let second = pipeline.handle(get_request("/"), peer()).await.unwrap();

        assert_eq!(first.status(), second.status());
        assert_eq!(first.headers(), second.headers());
        let first_body = first.into_body().collect().await.unwrap().to_bytes();
        let second_body = second.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(first_body, second_body);
    }

    #[tokio::test]
    async fn post_falls_through_to_404() {
        let root = fixture_root("post");
        std::fs::write(root.join("index.html"), b"home").unwrap();
        let pipeline = pipeline_for(&root);

        let req = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(())
            .unwrap();
        let resp = pipeline.handle(req, peer()).await.unwrap();

        assert_eq!(resp.status(), 404);
        assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    }
}
