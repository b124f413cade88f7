use reqwest::StatusCode;

/// A failed request against the Hacker News API.
///
/// These are fatal to a run: callers propagate them instead of retrying.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to fetch {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Hacker News API returned {status} for {url}")]
    Status { url: String, status: StatusCode },

    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }
}
