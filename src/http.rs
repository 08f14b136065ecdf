//! Resource fetching over HTTP(S) with native-tls, plus local files.
//!
//! Icon fonts and stylesheets are usually served from a CDN, but `file://`
//! URLs and bare paths are accepted too so a checked-out icon set can be
//! used offline.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use url::Url;

use crate::loader::ResourceFetcher;

/// Upper bound for a downloaded font body.
pub const MAX_FONT_SIZE: u64 = 20 * 1024 * 1024;

/// Upper bound for a downloaded stylesheet body.
pub const MAX_STYLESHEET_SIZE: u64 = 5 * 1024 * 1024;

/// Timeout applied to a whole request, connect through body.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("icon-lens/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while fetching a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid resource location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("request to {location} failed: {source}")]
    Transport {
        location: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{location} exceeds the {limit} byte limit")]
    TooLarge { location: String, limit: u64 },

    #[error("{location} is not valid UTF-8")]
    Utf8 { location: String },
}

/// Where a resource location points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(Url),
    Local(PathBuf),
}

/// Classify a configured resource location.
///
/// `http`/`https` URLs are fetched remotely; `file://` URLs, bare paths and
/// Windows drive paths (`C:\...`) are read from disk.
pub fn parse_location(location: &str) -> Result<Location, FetchError> {
    let invalid = |reason: String| FetchError::InvalidLocation {
        location: location.to_string(),
        reason,
    };

    if location.trim().is_empty() {
        return Err(invalid("location is empty".to_string()));
    }

    match Url::parse(location) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(Location::Remote(url)),
            "file" => url
                .to_file_path()
                .map(Location::Local)
                .map_err(|_| invalid("file URL does not name a local path".to_string())),
            // A one-letter scheme is a drive letter, not a protocol
            scheme if scheme.len() == 1 => Ok(Location::Local(PathBuf::from(location))),
            scheme => Err(invalid(format!("unsupported scheme '{scheme}'"))),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Ok(Location::Local(PathBuf::from(location)))
        }
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// Create a new HTTP agent configured with native-tls.
///
/// Uses the system's TLS library and root certificates, with a global
/// request timeout so a stalled CDN cannot hang a reload forever.
pub fn agent() -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(REQUEST_TIMEOUT))
        .build()
        .into()
}

/// Fetcher backed by a ureq agent and the local filesystem.
pub struct HttpFetcher {
    agent: Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self { agent: agent() }
    }

    fn fetch_remote(&self, url: &Url, limit: u64) -> Result<Vec<u8>, FetchError> {
        let location = url.as_str();
        log::debug!("GET {}", location);

        let response = self
            .agent
            .get(location)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| FetchError::Transport {
                location: location.to_string(),
                source: Box::new(e),
            })?;

        response
            .into_body()
            .with_config()
            .limit(limit)
            .read_to_vec()
            .map_err(|e| match e {
                ureq::Error::BodyExceedsLimit(_) => FetchError::TooLarge {
                    location: location.to_string(),
                    limit,
                },
                other => FetchError::Transport {
                    location: location.to_string(),
                    source: Box::new(other),
                },
            })
    }

    fn fetch_local(&self, path: &std::path::Path, limit: u64) -> Result<Vec<u8>, FetchError> {
        let location = path.display().to_string();
        log::debug!("Reading {}", location);

        let io_error = |source| FetchError::Io {
            location: location.clone(),
            source,
        };
        let file = std::fs::File::open(path).map_err(io_error)?;

        // Read one byte past the limit to detect oversize files without trusting metadata
        let mut bytes = Vec::new();
        file.take(limit + 1)
            .read_to_end(&mut bytes)
            .map_err(io_error)?;
        if bytes.len() as u64 > limit {
            return Err(FetchError::TooLarge { location, limit });
        }
        Ok(bytes)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch_bytes(&self, location: &str, limit: u64) -> Result<Vec<u8>, FetchError> {
        match parse_location(location)? {
            Location::Remote(url) => self.fetch_remote(&url, limit),
            Location::Local(path) => self.fetch_local(&path, limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_remote_locations() {
        assert!(matches!(
            parse_location("https://cdn.example.com/icons.woff2"),
            Ok(Location::Remote(_))
        ));
        assert!(matches!(
            parse_location("http://localhost:8080/style.css?v=3"),
            Ok(Location::Remote(_))
        ));
    }

    #[test]
    fn test_parse_local_locations() {
        assert_eq!(
            parse_location("assets/icons.ttf").unwrap(),
            Location::Local(PathBuf::from("assets/icons.ttf"))
        );
        assert_eq!(
            parse_location("/srv/icons/style.css").unwrap(),
            Location::Local(PathBuf::from("/srv/icons/style.css"))
        );
        assert_eq!(
            parse_location("C:\\icons\\font.ttf").unwrap(),
            Location::Local(PathBuf::from("C:\\icons\\font.ttf"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_file_url() {
        assert_eq!(
            parse_location("file:///srv/icons/font.woff").unwrap(),
            Location::Local(PathBuf::from("/srv/icons/font.woff"))
        );
    }

    #[test]
    fn test_parse_rejects_unsupported() {
        assert!(matches!(
            parse_location("ftp://example.com/icons.ttf"),
            Err(FetchError::InvalidLocation { .. })
        ));
        assert!(matches!(
            parse_location("   "),
            Err(FetchError::InvalidLocation { .. })
        ));
    }

    #[test]
    fn test_fetch_local_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("style.css");
        std::fs::write(&path, ".icon-home:before{content:\"\\e901\"}").unwrap();

        let fetcher = HttpFetcher::new();
        let text = fetcher
            .fetch_text(path.to_str().unwrap(), MAX_STYLESHEET_SIZE)
            .expect("local fetch should succeed");
        assert!(text.contains("icon-home"));
    }

    #[test]
    fn test_fetch_local_enforces_limit() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("big.bin");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        let fetcher = HttpFetcher::new();
        let location = path.to_str().unwrap();
        assert!(matches!(
            fetcher.fetch_bytes(location, 63),
            Err(FetchError::TooLarge { limit: 63, .. })
        ));
        assert_eq!(fetcher.fetch_bytes(location, 64).unwrap().len(), 64);
    }

    #[test]
    fn test_fetch_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("absent.ttf");
        let fetcher = HttpFetcher::new();
        assert!(matches!(
            fetcher.fetch_bytes(path.to_str().unwrap(), MAX_FONT_SIZE),
            Err(FetchError::Io { .. })
        ));
    }

    #[test]
    fn test_fetch_text_rejects_binary() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("style.css");
        std::fs::write(&path, [0xffu8, 0xfe, 0x00]).unwrap();

        let fetcher = HttpFetcher::new();
        assert!(matches!(
            fetcher.fetch_text(path.to_str().unwrap(), MAX_STYLESHEET_SIZE),
            Err(FetchError::Utf8 { .. })
        ));
    }
}
