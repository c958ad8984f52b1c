use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("You must be logged in to perform this action")]
    MissingToken,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Builds a `Status` error from a non-success response, keeping the
    /// server's `error` field when the body carries one.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or(body);
        ClientError::Status { status, message }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
