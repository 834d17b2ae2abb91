//! Error taxonomy shared by the poller, the resolver and the playback path.
//!
//! None of these escape a component: the poller turns them into
//! `TrackListState::Failed`, the resolver into a fallback handle and the
//! playback controller into `PlaybackStatus::Unavailable`.

/// Result type alias for fetch and playback operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Transport failure: DNS, refused connection, timeout, truncated body.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// Malformed JSON, a listing entry without a title, or a playlist
    /// descriptor without any stream line.
    #[error("parse error: {0}")]
    Parse(String),

    /// The playback subsystem rejected the resolved URL.
    #[error("playback error: {0}")]
    Playback(String),
}

impl Error {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return Self::Http(status.as_u16());
        }
        if e.is_timeout() {
            return Self::Network("request timed out".to_string());
        }
        if e.is_decode() {
            return Self::Parse(e.to_string());
        }
        Self::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_human_readable() {
        assert_eq!(Error::Http(503).to_string(), "HTTP error: status 503");
        assert_eq!(
            Error::network("connection refused").to_string(),
            "network error: connection refused"
        );
    }

    #[test]
    fn test_json_error_maps_to_parse() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(Error::from(err), Error::Parse(_)));
    }
}
