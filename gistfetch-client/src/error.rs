//! Error types for gistfetch-client.

use thiserror::Error;

/// All errors that can arise while talking to the gist API.
///
/// Every variant carries the URL that was requested.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The response body could not be read or decoded.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    pub(crate) fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => ClientError::Status {
                url: url.to_string(),
                status,
            },
            ureq::Error::Transport(transport) => ClientError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            },
        }
    }
}
