use std::io::Read;

use thiserror::Error;

use crate::models::{SearchResult, ThumbItem};

/// Errors from talking to the clip backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(Box<ureq::Error>),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read response body: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => ApiError::Status(code),
            other => ApiError::Network(Box::new(other)),
        }
    }
}

/// Client for the clip-search backend.
#[derive(Clone)]
pub struct ClipClient {
    base_url: String,
}

impl ClipClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full-text search over subtitle lines.
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let url = format!("{}/search?q={}", self.base_url, urlencode(query));
        let response = ureq::get(&url).call()?;
        let results: Vec<SearchResult> = serde_json::from_reader(response.into_reader())?;
        Ok(results)
    }

    /// Frame timestamps starting at `from_ms` for an episode.
    pub fn thumbs(
        &self,
        season: &str,
        episode: &str,
        from_ms: i64,
    ) -> Result<Vec<ThumbItem>, ApiError> {
        let url = format!("{}/thumbs/{}/{}/{}", self.base_url, season, episode, from_ms);
        let response = ureq::get(&url).call()?;
        let thumbs: Vec<ThumbItem> = serde_json::from_reader(response.into_reader())?;
        Ok(thumbs)
    }

    /// Render `start..end` of an episode as a GIF, optionally captioned.
    pub fn gif(
        &self,
        season: &str,
        episode: &str,
        start_ms: i64,
        end_ms: i64,
        text: Option<&str>,
    ) -> Result<Vec<u8>, ApiError> {
        let mut url = format!(
            "{}/gif/{}/{}/{}/{}",
            self.base_url, season, episode, start_ms, end_ms
        );
        if let Some(text) = text {
            url.push_str(&format!("?text={}", urlencode(text)));
        }
        let response = ureq::get(&url).call()?;
        let mut bytes = Vec::new();
        response.into_reader().read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Reachability check for the setup wizard. Any HTTP status counts:
    /// a response of whatever kind proves the server is there.
    pub fn ping(&self) -> Result<(), ApiError> {
        let url = format!("{}/search?q={}", self.base_url, urlencode("test"));
        match ureq::get(&url).call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(_, _)) => Ok(()),
            Err(err) => Err(ApiError::Network(Box::new(err))),
        }
    }
}

fn urlencode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                result.push('%');
                result.push_str(&format!("{:02X}", byte));
            }
        }
    }
    result
}

#[cfg(test)]
pub(crate) mod stub {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Minimal HTTP server for tests. Each route is a request-path prefix
    /// mapped to a canned status and body; unmatched paths get a 404. Every
    /// connection is closed after one response.
    pub fn serve(routes: Vec<(&'static str, u16, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };

                let mut buf = Vec::new();
                let mut byte = [0u8; 1];
                while !buf.ends_with(b"\r\n\r\n") {
                    match stream.read(&mut byte) {
                        Ok(1) => buf.push(byte[0]),
                        _ => break,
                    }
                }

                let request = String::from_utf8_lossy(&buf);
                let path = request.split_whitespace().nth(1).unwrap_or("/");

                let (status, body) = routes
                    .iter()
                    .find(|(prefix, _, _)| path.starts_with(prefix))
                    .map(|(_, status, body)| (*status, body.clone()))
                    .unwrap_or((404, String::new()));

                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    500 => "Internal Server Error",
                    _ => "",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        base
    }
}
