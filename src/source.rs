//! Volume source access: fetching volume bytes over HTTP or from disk.
//!
//! The controller only sees the [`VolumeFetcher`] trait, so tests can
//! script delivery timing and payloads. [`HttpFetcher`] is the real
//! implementation: absolute URLs go over HTTP, relative URLs resolve
//! against a configured base origin, and anything else is read as a
//! local file path.

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::FetchError;

/// Fetches the raw bytes of a volume addressed by URL.
///
/// Implementations must be callable from a worker thread; the single
/// asynchronous operation in the viewer is built on top of this.
pub trait VolumeFetcher: Send + Sync {
    /// Fetch the payload at `url`, blocking until done.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Production fetcher: HTTP(S) via `reqwest`, plus local files.
pub struct HttpFetcher {
    base_origin: Option<String>,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    pub fn new(base_origin: Option<String>, timeout: Option<Duration>) -> Self {
        Self {
            base_origin: base_origin.filter(|s| !s.trim().is_empty()),
            timeout,
        }
    }

    /// Resolve a possibly-relative URL against the configured base origin.
    ///
    /// Absolute `http(s)://` URLs pass through unchanged. Rooted paths
    /// (`/volumes/a.nii`) are joined to the base origin when one is
    /// configured; with no base origin they are treated as local paths.
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        if let Some(base) = &self.base_origin {
            if url.starts_with('/') {
                return format!("{}{}", base.trim_end_matches('/'), url);
            }
        }
        url.to_string()
    }

    fn fetch_http(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let bytes = response
            .bytes()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

impl VolumeFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let resolved = self.resolve(url);
        log::debug!("fetching volume from {resolved:?}");
        if resolved.starts_with("http://") || resolved.starts_with("https://") {
            self.fetch_http(&resolved)
        } else {
            fs::read(&resolved).map_err(|e| FetchError::File(format!("{resolved:?}: {e}")))
        }
    }
}

/// Write a fetched payload to disk, for the diagnostic "download
/// original file" action.
pub fn save_payload(path: &Path, bytes: &[u8]) -> Result<(), FetchError> {
    fs::write(path, bytes).map_err(|e| FetchError::File(format!("{path:?}: {e}")))
}

/// Derive a display name from a volume URL (final path segment).
pub fn display_name_from_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let segment = trimmed
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("volume");
    // Strip any query string.
    segment.split('?').next().unwrap_or(segment).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_url_passthrough() {
        let f = HttpFetcher::new(Some("https://pacs.example.org".into()), None);
        assert_eq!(
            f.resolve("https://other.example.org/a.nii"),
            "https://other.example.org/a.nii"
        );
    }

    #[test]
    fn test_resolve_relative_against_base() {
        let f = HttpFetcher::new(Some("https://pacs.example.org/".into()), None);
        assert_eq!(
            f.resolve("/volumes/test.nii"),
            "https://pacs.example.org/volumes/test.nii"
        );
    }

    #[test]
    fn test_resolve_without_base_keeps_path() {
        let f = HttpFetcher::new(None, None);
        assert_eq!(f.resolve("/tmp/scan.nii.gz"), "/tmp/scan.nii.gz");
        assert_eq!(f.resolve("scan.nii"), "scan.nii");
    }

    #[test]
    fn test_blank_base_origin_is_ignored() {
        let f = HttpFetcher::new(Some("   ".into()), None);
        assert_eq!(f.resolve("/volumes/test.nii"), "/volumes/test.nii");
    }

    #[test]
    fn test_fetch_missing_file_is_error() {
        let f = HttpFetcher::new(None, None);
        let err = f.fetch("/definitely/not/a/file.nii").unwrap_err();
        assert!(matches!(err, FetchError::File(_)));
    }

    #[test]
    fn test_display_name_from_url() {
        assert_eq!(
            display_name_from_url("https://x.org/volumes/test.nii?token=1"),
            "test.nii"
        );
        assert_eq!(display_name_from_url("/volumes/head.nii.gz"), "head.nii.gz");
        assert_eq!(display_name_from_url(""), "volume");
    }
}
