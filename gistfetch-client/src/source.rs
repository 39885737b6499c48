//! The seam between the sync pipeline and wherever gists come from.

use gistfetch_core::{Gist, GistFile, OwnerName};

use crate::error::ClientError;

/// A provider of gist listings and raw file contents.
pub trait GistSource {
    /// List the owner's gists, in the order the provider returns them.
    fn fetch_gists(&self, owner: &OwnerName) -> Result<Vec<Gist>, ClientError>;

    /// Fetch the raw text of one gist file.
    fn fetch_raw(&self, file: &GistFile) -> Result<String, ClientError>;
}

impl<S: GistSource + ?Sized> GistSource for &S {
    fn fetch_gists(&self, owner: &OwnerName) -> Result<Vec<Gist>, ClientError> {
        (**self).fetch_gists(owner)
    }

    fn fetch_raw(&self, file: &GistFile) -> Result<String, ClientError> {
        (**self).fetch_raw(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl GistSource for Failing {
        fn fetch_gists(&self, _owner: &OwnerName) -> Result<Vec<Gist>, ClientError> {
            Err(ClientError::Status {
                url: "https://api.github.com/users/octocat/gists".to_string(),
                status: 404,
            })
        }

        fn fetch_raw(&self, file: &GistFile) -> Result<String, ClientError> {
            Err(ClientError::Status {
                url: file.raw_url.clone(),
                status: 404,
            })
        }
    }

    #[test]
    fn references_are_sources_too() {
        fn listing_fails<S: GistSource>(source: S, owner: &OwnerName) -> bool {
            source.fetch_gists(owner).is_err()
        }
        let owner = OwnerName::parse("octocat").unwrap();
        assert!(listing_fails(&Failing, &owner));
    }
}
