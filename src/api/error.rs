use std::fmt;

/// API errors with user-friendly messages.
#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (connection, timeout, DNS)
    Network(String),
    /// HTTP error response (4xx, 5xx)
    HttpStatus(u16, String),
    /// Successful response whose body was empty or JSON `null`
    EmptyPayload,
    /// Failed to parse a non-empty response
    Parse(String),
}

impl ApiError {
    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(details) => {
                if details.contains("timed out") {
                    "Request timed out. Please try again.".into()
                } else if details.contains("dns") || details.contains("resolve") {
                    "Network error: Could not reach server.".into()
                } else {
                    format!("Network error: {details}")
                }
            }
            Self::HttpStatus(429, _) => "Rate limited. Please wait a moment.".into(),
            Self::HttpStatus(404, _) => "Item not found.".into(),
            Self::HttpStatus(500..=599, _) => "Server error. Please try again later.".into(),
            Self::HttpStatus(code, msg) => format!("HTTP error {code}: {msg}"),
            Self::EmptyPayload => "Item not available.".into(),
            Self::Parse(details) => format!("Failed to parse response: {details}"),
        }
    }

    /// Why a single item fetch failing this way gets the item dropped.
    pub const fn drop_reason(&self) -> DropReason {
        match self {
            Self::Network(_) | Self::HttpStatus(..) => DropReason::NetworkUnavailable,
            Self::EmptyPayload => DropReason::EmptyPayload,
            Self::Parse(_) => DropReason::Malformed,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network("request timed out".into())
        } else if err.is_connect() {
            Self::Network("connection failed".into())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::HttpStatus(
                status.as_u16(),
                status.canonical_reason().unwrap_or("").into(),
            )
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Why an item was pruned from a parent batch or a child expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    NetworkUnavailable,
    EmptyPayload,
    /// Body was present but did not decode as an item.
    Malformed,
    /// Record exists upstream but is deleted or dead.
    Moderated,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NetworkUnavailable => "network unavailable",
            Self::EmptyPayload => "empty payload",
            Self::Malformed => "malformed payload",
            Self::Moderated => "moderated",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_reasons() {
        assert_eq!(
            ApiError::Network("boom".into()).drop_reason(),
            DropReason::NetworkUnavailable
        );
        assert_eq!(
            ApiError::HttpStatus(404, String::new()).drop_reason(),
            DropReason::NetworkUnavailable
        );
        assert_eq!(ApiError::EmptyPayload.drop_reason(), DropReason::EmptyPayload);
        assert_eq!(
            ApiError::Parse("expected value".into()).drop_reason(),
            DropReason::Malformed
        );
    }

    #[test]
    fn user_messages() {
        assert_eq!(
            ApiError::HttpStatus(429, String::new()).user_message(),
            "Rate limited. Please wait a moment."
        );
        assert_eq!(
            ApiError::Network("request timed out".into()).to_string(),
            "Request timed out. Please try again."
        );
        assert_eq!(
            ApiError::HttpStatus(418, "I'm a teapot".into()).user_message(),
            "HTTP error 418: I'm a teapot"
        );
    }
}
