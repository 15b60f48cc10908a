//! Static file stage
//!
//! Resolves request paths against the asset root and serves matching
//! files. Anything the stage cannot serve is a decline, not an error, so
//! the request falls through to the pipeline's 404.

use super::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use std::path::PathBuf;
use tokio::fs;

const INDEX_FILE: &str = "index.html";

pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Attempt to serve the request, or decline with `None`.
    pub async fn try_serve(&self, ctx: &RequestContext<'_>) -> Option<Response<Full<Bytes>>> {
        // File reads only; other methods fall through
        if !matches!(*ctx.method, Method::GET | Method::HEAD) {
            return None;
        }

        let (content, content_type) = self.load(ctx.path).await?;
        Some(http::build_file_response(content, content_type, ctx.is_head))
    }

    /// Load the file a request path points at, if any.
    ///
    /// Files are read per request; nothing is cached or indexed at
    /// startup.
    async fn load(&self, path: &str) -> Option<(Vec<u8>, &'static str)> {
        // Names with spaces or non-ASCII characters arrive percent-encoded
        // on the wire; sequences that decode to invalid UTF-8 are declined
        let decoded = match urlencoding::decode(path) {
            Ok(p) => p,
            Err(e) => {
                logger::log_warning(&format!("Invalid percent-encoding in path '{path}': {e}"));
                return None;
            }
        };

        // Remove leading slash and prevent directory traversal
        let clean_path = decoded.trim_start_matches('/').replace("..", "");
        let mut file_path = self.root.join(&clean_path);

        let root_canonical = match self.root.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                logger::log_warning(&format!(
                    "Static root not found or inaccessible '{}': {e}",
                    self.root.display()
                ));
                return None;
            }
        };

        // Directory requests (the bare root included) get the index file
        if file_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
            file_path = file_path.join(INDEX_FILE);
        }

        // Misses are routine (404), no logging
        let file_canonical = file_path.canonicalize().ok()?;
        if !file_canonical.starts_with(&root_canonical) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {path} -> {}",
                file_canonical.display()
            ));
            return None;
        }
        if !file_canonical.is_file() {
            return None;
        }

        match fs::read(&file_canonical).await {
            Ok(content) => {
                let content_type =
                    mime::content_type_for(file_canonical.extension().and_then(|e| e.to_str()));
                Some((content, content_type))
            }
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to read file '{}': {e}",
                    file_canonical.display()
                ));
                None
            }
        }
    }
}
