use std::fmt;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::CatalogError;

/// Where the song list text is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// Treat `http://` and `https://` strings as URLs, anything else as a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            CatalogSource::Url(trimmed.to_string())
        } else {
            CatalogSource::File(PathBuf::from(trimmed))
        }
    }

    /// Retrieve the raw resource text. A single attempt is made.
    pub fn fetch(&self) -> Result<String, CatalogError> {
        match self {
            CatalogSource::File(path) => {
                debug!(path = %path.display(), "reading song list");
                fs::read_to_string(path).map_err(|source| CatalogError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
            CatalogSource::Url(url) => {
                debug!(url, "fetching song list");
                let transport = |source: reqwest::Error| CatalogError::Transport {
                    url: url.clone(),
                    source,
                };
                let response = reqwest::blocking::get(url).map_err(transport)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status {
                        status: status.as_u16(),
                        reason: status.canonical_reason().unwrap_or_default().to_string(),
                    });
                }
                response.text().map_err(transport)
            }
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => write!(f, "{url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{ErrorKind, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Answer a single request on `listener` with `response` and return the
    /// request head that was received.
    fn serve_once(listener: &TcpListener, response: &'static str) -> thread::JoinHandle<String> {
        let listener = listener.try_clone().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = stream.read(&mut buf).unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        })
    }

    #[test]
    fn error_status_is_reported_once_without_retry() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = serve_once(
            &listener,
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );

        let source = CatalogSource::Url(format!("http://{addr}/SongList.txt"));
        let err = crate::catalog::load_catalog(&source).unwrap_err();
        assert!(matches!(err, CatalogError::Status { status: 404, .. }));
        assert_eq!(err.to_string(), "Failed to fetch songs: 404 Not Found");

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /SongList.txt"));
        listener.set_nonblocking(true).unwrap();
        let second = listener.accept().map(|_| ()).unwrap_err();
        assert_eq!(second.kind(), ErrorKind::WouldBlock);
    }

    #[test]
    fn successful_response_body_is_returned() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = serve_once(
            &listener,
            "HTTP/1.1 200 OK\r\nContent-Length: 25\r\nConnection: close\r\n\r\nTitle|Artist\nJolene|Dolly",
        );

        let text = CatalogSource::Url(format!("http://{addr}/list")).fetch().unwrap();
        assert_eq!(text, "Title|Artist\nJolene|Dolly");
        server.join().unwrap();
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let err = CatalogSource::Url(format!("http://{addr}/SongList.txt"))
            .fetch()
            .unwrap_err();
        assert!(matches!(err, CatalogError::Transport { .. }));
    }

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert_eq!(
            CatalogSource::parse("https://example.com/SongList.txt"),
            CatalogSource::Url("https://example.com/SongList.txt".into())
        );
        assert_eq!(
            CatalogSource::parse("public/SongList.txt"),
            CatalogSource::File(PathBuf::from("public/SongList.txt"))
        );
    }
}
