#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("{target} still rate limited (HTTP 429) after {retries} retries")]
    RateLimitExhausted { target: &'static str, retries: u32 },

    #[error("{target} returned HTTP {status}")]
    Http { target: &'static str, status: u16 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl CollectorError {
    /// HTTP status behind the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CollectorError::RateLimitExhausted { .. } => Some(429),
            CollectorError::Http { status, .. } => Some(*status),
            CollectorError::Transport(e) => e.status().map(|s| s.as_u16()),
            CollectorError::Configuration(_) => None,
        }
    }
}
