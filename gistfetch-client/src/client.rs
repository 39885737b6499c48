//! Blocking HTTP client for the GitHub gist API.

use std::io::Read;
use std::time::Duration;

use gistfetch_core::{Gist, GistFile, OwnerName};

use crate::error::ClientError;
use crate::source::GistSource;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ACCEPT_LISTING: &str = "application/vnd.github.v3+json";
const ACCEPT_RAW: &str = "application/vnd.github.raw";

/// Anonymous client for `GET /users/{owner}/gists` and raw file URLs.
pub struct GistClient {
    api_base: String,
    agent: ureq::Agent,
}

impl GistClient {
    /// Client against the public GitHub API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Client against another API root (GitHub Enterprise, test servers).
    pub fn with_base_url(api_base: &str) -> Self {
        Self::with_options(api_base, DEFAULT_TIMEOUT)
    }

    pub fn with_options(api_base: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("gistfetch/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            agent,
        }
    }

    /// Listing URL for `owner`.
    pub fn gists_url(&self, owner: &OwnerName) -> String {
        format!("{}/users/{}/gists", self.api_base, owner)
    }

    fn get(&self, url: &str, accept: &str) -> Result<ureq::Response, ClientError> {
        tracing::debug!("GET {url}");
        self.agent
            .get(url)
            .set("Accept", accept)
            .call()
            .map_err(|e| ClientError::from_ureq(url, e))
    }
}

impl Default for GistClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GistSource for GistClient {
    fn fetch_gists(&self, owner: &OwnerName) -> Result<Vec<Gist>, ClientError> {
        let url = self.gists_url(owner);
        let gists: Vec<Gist> = self
            .get(&url, ACCEPT_LISTING)?
            .into_json()
            .map_err(|source| ClientError::Decode {
                url: url.clone(),
                source,
            })?;
        tracing::info!("listed {} gists for {owner}", gists.len());
        Ok(gists)
    }

    /// Reads the whole body; unlike `Response::into_string` there is no size cap.
    fn fetch_raw(&self, file: &GistFile) -> Result<String, ClientError> {
        let mut bytes = Vec::new();
        self.get(&file.raw_url, ACCEPT_RAW)?
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|source| ClientError::Decode {
                url: file.raw_url.clone(),
                source,
            })?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!("{} is not valid UTF-8; replacing invalid bytes", file.raw_url);
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gists_url_is_templated_with_owner() {
        let client = GistClient::new();
        let owner = OwnerName::parse("octocat").unwrap();
        assert_eq!(
            client.gists_url(&owner),
            "https://api.github.com/users/octocat/gists"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let client = GistClient::with_base_url("http://127.0.0.1:8080/");
        let owner = OwnerName::parse("octocat").unwrap();
        assert_eq!(
            client.gists_url(&owner),
            "http://127.0.0.1:8080/users/octocat/gists"
        );
    }
}
