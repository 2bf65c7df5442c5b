use thiserror::Error;

/// Failure of a single call to an upstream provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Upstream returned not found (404): {url}")]
    NotFound { url: String },

    #[error("Upstream timed out: {url}")]
    Timeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    Network { url: String, message: String },

    #[error("Upstream returned error status {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Failed to parse upstream response: {message} (URL: {url})")]
    Parse { url: String, message: String },

    #[error("Upstream rejected request: {message} (URL: {url})")]
    Rejected { url: String, message: String },

    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl UpstreamError {
    /// True when the provider answered but had no such record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::NotFound { .. })
    }

    pub fn not_found(url: impl Into<String>) -> Self {
        Self::NotFound { url: url.into() }
    }

    /// Classify a reqwest failure for `url`.
    pub fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            return Self::Timeout {
                url: url.to_string(),
            };
        }
        if let Some(status) = err.status() {
            if status == reqwest::StatusCode::NOT_FOUND {
                return Self::not_found(url);
            }
            return Self::Status {
                status: status.as_u16(),
                url: url.to_string(),
            };
        }
        if err.is_decode() {
            return Self::Parse {
                url: url.to_string(),
                message: err.to_string(),
            };
        }
        Self::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Request-level failure reported to callers of the feed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Game not found")]
    NotFound,

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream timed out: {0}")]
    UpstreamTimeout(String),
}

impl FeedError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// HTTP status category for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            FeedError::InvalidRequest(_) => 400,
            FeedError::NotFound => 404,
            FeedError::UpstreamUnavailable(_) | FeedError::UpstreamTimeout(_) => 500,
        }
    }
}

impl From<UpstreamError> for FeedError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound { .. } => FeedError::NotFound,
            UpstreamError::Timeout { url } => FeedError::UpstreamTimeout(url),
            other => FeedError::UpstreamUnavailable(other.to_string()),
        }
    }
}
