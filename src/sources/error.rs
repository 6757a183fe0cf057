/// Shown when the failure carries no message of its own
pub const FALLBACK_MESSAGE: &str = "Failed to load properties. Please try again.";

/// Why a request to the property service failed
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}")]
    Status { status: u16, message: Option<String> },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("fetch task ended unexpectedly: {0}")]
    Task(String),
}

impl FetchError {
    /// Text for the user: the server's own message when it sent one
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }

    pub fn from_status(status: u16, body: &str) -> Self {
        FetchError::Status {
            status,
            message: message_from_body(body),
        }
    }
}

/// Pull `message` (or `error`) out of a JSON error body
pub fn message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_body_message() {
        let err = FetchError::from_status(400, r#"{"message":"Invalid price range"}"#);
        assert_eq!(err.user_message(), "Invalid price range");
    }

    #[test]
    fn test_error_key_is_used_when_message_missing() {
        let err = FetchError::from_status(500, r#"{"error":"Database unavailable"}"#);
        assert_eq!(err.user_message(), "Database unavailable");
    }

    #[test]
    fn test_falls_back_without_body_message() {
        for body in ["", "<html>Bad Gateway</html>", r#"{"message":"  "}"#, r#"{"code":7}"#] {
            let err = FetchError::from_status(502, body);
            assert_eq!(err.user_message(), FALLBACK_MESSAGE, "body: {}", body);
        }
    }

    #[test]
    fn test_malformed_body_uses_fallback() {
        let err: FetchError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(matches!(err, FetchError::Malformed(_)));
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }
}
