//! Mapping request targets onto files under the served root.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};

use crate::parser::HttpRequest;
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::mime::content_type_for;
use crate::server::response::HttpResponse;

/// Serves files from a single root directory.
#[derive(Debug, Clone)]
pub struct FileResponder {
    root: PathBuf,
    default_document: String,
}

impl FileResponder {
    /// Create a responder for `root`, serving `default_document` for `/`.
    pub fn new(root: impl Into<PathBuf>, default_document: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_document: default_document.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.root.clone(), config.default_document.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a request target to a path under the root.
    ///
    /// Query and fragment are dropped and the rest is percent-decoded. `/`
    /// and any target ending in `/` map to the default document. Any `..`
    /// segment is rejected with [`Error::PathTraversal`]. This is purely
    /// lexical; symlinks are checked in [`FileResponder::load`].
    pub fn resolve(&self, target: &str) -> Result<PathBuf, Error> {
        let path = target
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or_default();

        let Some(relative) = path.strip_prefix('/') else {
            return Err(Error::NotFound(target.to_string()));
        };

        let decoded = urlencoding::decode(relative)
            .map_err(|_| Error::NotFound(target.to_string()))?;

        let mut resolved = self.root.clone();
        for segment in decoded.split('/') {
            if segment.is_empty() || segment == "." {
                continue;
            }
            if segment.contains(|c: char| c == '\\' || c == '\0') {
                return Err(Error::PathTraversal(target.to_string()));
            }

            // A segment must stay a single plain name on every platform
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(name)), None) => resolved.push(name),
                _ => return Err(Error::PathTraversal(target.to_string())),
            }
        }

        if matches!(decoded.rsplit('/').next(), Some("" | ".")) {
            resolved.push(&self.default_document);
        }

        Ok(resolved)
    }

    /// Read the file a request target points at.
    ///
    /// Returns the file bytes and their content type. The file must
    /// canonicalize to a location inside the canonical root, so symlinks
    /// leading out of the root are rejected too.
    pub async fn load(&self, target: &str) -> Result<(Vec<u8>, &'static str), Error> {
        let path = self.resolve(target)?;

        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|e| io_error(e, target))?;
        let canonical = tokio::fs::canonicalize(&path)
            .await
            .map_err(|e| io_error(e, target))?;
        if !canonical.starts_with(&root) {
            return Err(Error::PathTraversal(target.to_string()));
        }

        let body = tokio::fs::read(&canonical)
            .await
            .map_err(|e| io_error(e, target))?;

        Ok((body, content_type_for(&path.to_string_lossy())))
    }

    /// Build the response for a GET request.
    ///
    /// Every failure becomes the same generic 404.
    pub async fn respond(&self, request: &HttpRequest) -> HttpResponse {
        match self.load(&request.path).await {
            Ok((body, content_type)) => HttpResponse::file(body, content_type),
            Err(e @ Error::NotFound(_)) => {
                debug!("{e}");
                HttpResponse::not_found()
            }
            Err(e) => {
                warn!("{e}");
                HttpResponse::not_found()
            }
        }
    }
}

fn io_error(e: std::io::Error, target: &str) -> Error {
    match e.kind() {
        ErrorKind::PermissionDenied => Error::PermissionDenied(target.to_string()),
        ErrorKind::NotFound => Error::NotFound(target.to_string()),
        _ => Error::NotFound(format!("{target} ({e})")),
    }
}
