//! Content source interface
//!
//! The core is agnostic to where item content lives: a raw-file HTTP
//! endpoint or a local directory tree. Only the sync executor's retry
//! policy cares about the failure class, so fetch errors keep their status
//! taxonomy (`NotFound` / `Server` / `Timeout` / `Network`).

use std::path::PathBuf;
use std::time::Duration;

use walkdir::WalkDir;

use crate::error::{PacksyncError, Result};

/// Per-request timeout for remote fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A location content can be fetched from.
pub trait ContentSource {
    /// Fetch the content bytes at a source-relative path.
    fn fetch(&self, path: &str) -> Result<Vec<u8>>;

    /// List files under a directory path, relative to it, when the source
    /// supports directory listings. `Ok(None)` means unsupported; callers
    /// fall back to fetching known marker files.
    fn list(&self, path: &str) -> Result<Option<Vec<String>>>;
}

/// Raw-file HTTP GET source (e.g. a raw.githubusercontent.com base URL).
pub struct HttpSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(FETCH_TIMEOUT)
            .build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl ContentSource for HttpSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url_for(path);
        match self.agent.get(&url).call() {
            Ok(response) => {
                let mut bytes = Vec::new();
                use std::io::Read;
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|e| PacksyncError::FetchNetwork {
                        path: path.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(bytes)
            }
            Err(ureq::Error::Status(status, _)) => {
                if status == 404 {
                    Err(PacksyncError::FetchNotFound {
                        path: path.to_string(),
                    })
                } else if (500..600).contains(&status) {
                    Err(PacksyncError::FetchServer {
                        path: path.to_string(),
                        status,
                    })
                } else {
                    Err(PacksyncError::FetchNetwork {
                        path: path.to_string(),
                        reason: format!("status {status}"),
                    })
                }
            }
            Err(ureq::Error::Transport(transport)) => {
                if has_timeout_source(&transport) {
                    Err(PacksyncError::FetchTimeout {
                        path: path.to_string(),
                    })
                } else {
                    Err(PacksyncError::FetchNetwork {
                        path: path.to_string(),
                        reason: transport.to_string(),
                    })
                }
            }
        }
    }

    fn list(&self, _path: &str) -> Result<Option<Vec<String>>> {
        // Raw-file endpoints have no directory listings.
        Ok(None)
    }
}

/// Timeouts surface from the io layer as `TimedOut`, or as `WouldBlock` on
/// platforms where a socket read deadline renders as EAGAIN. Walk the error
/// source chain for the io kind instead of matching display text.
fn has_timeout_source(err: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(io) = err.downcast_ref::<std::io::Error>() {
        return matches!(
            io.kind(),
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
        );
    }
    err.source().is_some_and(has_timeout_source)
}

/// Local directory tree source (a checked-out content repository).
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for DirSource {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.root.join(path);
        std::fs::read(&full).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PacksyncError::FetchNotFound {
                    path: path.to_string(),
                }
            } else {
                PacksyncError::FetchNetwork {
                    path: path.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }

    fn list(&self, path: &str) -> Result<Option<Vec<String>>> {
        let full = self.root.join(path);
        if !full.is_dir() {
            return Err(PacksyncError::FetchNotFound {
                path: path.to_string(),
            });
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(&full).follow_links(true) {
            let entry = entry.map_err(|e| PacksyncError::FetchNetwork {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_file() {
                let rel = entry
                    .path()
                    .strip_prefix(&full)
                    .unwrap_or(entry.path())
                    .to_string_lossy()
                    .replace('\\', "/");
                files.push(rel);
            }
        }
        files.sort();
        Ok(Some(files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dir_source_fetch() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("docs")).unwrap();
        std::fs::write(temp.path().join("docs/notes.md"), "hello").unwrap();

        let source = DirSource::new(temp.path());
        assert_eq!(source.fetch("docs/notes.md").unwrap(), b"hello");
        assert!(matches!(
            source.fetch("docs/gone.md").unwrap_err(),
            PacksyncError::FetchNotFound { .. }
        ));
    }

    #[test]
    fn test_dir_source_lists_recursively() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("skills/search/data")).unwrap();
        std::fs::write(temp.path().join("skills/search/SKILL.md"), "x").unwrap();
        std::fs::write(temp.path().join("skills/search/data/stops.txt"), "y").unwrap();

        let source = DirSource::new(temp.path());
        let files = source.list("skills/search").unwrap().unwrap();
        assert_eq!(files, ["SKILL.md", "data/stops.txt"]);
    }

    #[derive(Debug)]
    struct WrappedIo(std::io::Error);

    impl std::fmt::Display for WrappedIo {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "transport: {}", self.0)
        }
    }

    impl std::error::Error for WrappedIo {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_timeout_detected_through_source_chain() {
        let timed_out = WrappedIo(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "read timed out",
        ));
        assert!(has_timeout_source(&timed_out));

        // Socket read deadlines can render as EAGAIN on Linux.
        let would_block = WrappedIo(std::io::Error::new(
            std::io::ErrorKind::WouldBlock,
            "Resource temporarily unavailable",
        ));
        assert!(has_timeout_source(&would_block));

        let refused = WrappedIo(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert!(!has_timeout_source(&refused));
    }

    #[test]
    fn test_http_source_has_no_listing() {
        let source = HttpSource::new("https://example.invalid/raw/");
        assert!(source.list("skills/search").unwrap().is_none());
        assert_eq!(
            source.url_for("/docs/notes.md"),
            "https://example.invalid/raw/docs/notes.md"
        );
    }
}
