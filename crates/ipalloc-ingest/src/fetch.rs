//! Source retrieval.
//!
//! Every source is fetched independently on the rayon pool. A failure is
//! recorded against its source and never aborts the others. Cancellation
//! is checked before each fetch starts; fetches already running complete.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::source::{SourceKind, SourceLocation, SourceSpec};

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared "stop before the next fetch" signal.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Retrieves the text behind a location.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, location: &SourceLocation) -> Result<String>;
}

/// Fetches URLs over HTTP and reads paths from disk.
pub struct HttpFetcher {
    client: Client,
    retries: u32,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, retries: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IngestError::Network {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client, retries })
    }

    fn get(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, concat!("ipalloc/", env!("CARGO_PKG_VERSION")))
            .send()
            .map_err(|e| IngestError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().map_err(|e| IngestError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(decode_text(bytes.to_vec()))
    }

    fn get_with_retry(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.get(url) {
                Ok(body) => return Ok(body),
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    warn!(url, attempt, error = %err, "retrying fetch");
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl SourceFetcher for HttpFetcher {
    fn fetch(&self, location: &SourceLocation) -> Result<String> {
        match location {
            SourceLocation::Url(url) => self.get_with_retry(url),
            SourceLocation::Path(path) => read_path(path),
        }
    }
}

/// Reads local paths only; URLs are rejected. Useful for offline runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl SourceFetcher for FileFetcher {
    fn fetch(&self, location: &SourceLocation) -> Result<String> {
        match location {
            SourceLocation::Path(path) => read_path(path),
            SourceLocation::Url(url) => Err(IngestError::Network {
                url: url.clone(),
                message: "remote sources are disabled".to_string(),
            }),
        }
    }
}

fn read_path(path: &std::path::Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_text(bytes))
}

/// UTF-8 when valid, otherwise Windows-1252, the superset of the Latin-1
/// used by manual statistics files.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

/// Body of a successfully fetched source.
#[derive(Debug, Clone)]
pub struct FetchedSource {
    pub kind: SourceKind,
    pub location: SourceLocation,
    pub body: String,
    pub elapsed: Duration,
}

/// Result of fetching one source.
#[derive(Debug)]
pub struct FetchOutcome {
    pub spec: SourceSpec,
    pub result: Result<FetchedSource>,
}

/// Fetches all sources concurrently; output order matches `sources`.
pub fn fetch_all(
    fetcher: &dyn SourceFetcher,
    sources: &[SourceSpec],
    cancel: &CancelFlag,
) -> Vec<FetchOutcome> {
    sources
        .par_iter()
        .map(|spec| FetchOutcome {
            spec: spec.clone(),
            result: fetch_one(fetcher, spec, cancel),
        })
        .collect()
}

fn fetch_one(
    fetcher: &dyn SourceFetcher,
    spec: &SourceSpec,
    cancel: &CancelFlag,
) -> Result<FetchedSource> {
    if cancel.is_cancelled() {
        return Err(IngestError::Cancelled {
            source_name: spec.kind.name().to_string(),
        });
    }
    let start = Instant::now();
    debug!(source = %spec.kind, location = %spec.location, "fetching");
    match fetcher.fetch(&spec.location) {
        Ok(body) => {
            let elapsed = start.elapsed();
            info!(
                source = %spec.kind,
                bytes = body.len(),
                elapsed_ms = elapsed.as_millis(),
                "fetched source"
            );
            Ok(FetchedSource {
                kind: spec.kind,
                location: spec.location.clone(),
                body,
                elapsed,
            })
        }
        Err(err) => {
            warn!(source = %spec.kind, error = %err, "fetch failed");
            Err(err)
        }
    }
}
