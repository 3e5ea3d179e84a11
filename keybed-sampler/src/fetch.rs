//! Sample byte sources
//!
//! [`HttpFetcher`] downloads with a blocking reqwest client and is meant to
//! run on the loader thread. [`FileFetcher`] reads from disk, for a base URL
//! that points at a local sample directory.

use crate::error::LoadError;
use std::time::Duration;

const USER_AGENT: &str = concat!("keybed/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of raw sample file bytes
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError>;
}

impl<F: AssetFetcher + ?Sized> AssetFetcher for Box<F> {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        (**self).fetch(location)
    }
}

/// Blocking HTTP(S) fetcher
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, LoadError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| LoadError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let http_err = |source| LoadError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(http_err)?;
        Ok(bytes.to_vec())
    }
}

/// Reads sample files from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl AssetFetcher for FileFetcher {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        let path = location.strip_prefix("file://").unwrap_or(location);
        std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })
    }
}

/// Whether a base URL names a remote location
pub fn is_remote(base_url: &str) -> bool {
    base_url.starts_with("http://") || base_url.starts_with("https://")
}

/// Pick a fetcher for a base URL: HTTP for http(s), the filesystem otherwise
pub fn fetcher_for(base_url: &str) -> Result<Box<dyn AssetFetcher>, LoadError> {
    if is_remote(base_url) {
        Ok(Box::new(HttpFetcher::new()?))
    } else {
        Ok(Box::new(FileFetcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://tonejs.github.io/audio/salamander/"));
        assert!(is_remote("http://localhost:8000/"));
        assert!(!is_remote("/home/user/samples"));
        assert!(!is_remote("file:///home/user/samples"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FileFetcher
            .fetch("file:///nonexistent/keybed/C4.mp3")
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
