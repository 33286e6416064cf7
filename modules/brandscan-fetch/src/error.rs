use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Transport-level failures. HTTP error statuses are not represented here;
/// a 404 or 500 is a valid `FetchResult`, not a `FetchError`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Too many redirects: {0}")]
    TooManyRedirects(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.url().map(|u| u.to_string()).unwrap_or_default())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}
