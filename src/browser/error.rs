// src/browser/error.rs

use thiserror::Error;

pub type BrowserResult<T> = Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    /// Driver not reachable or session could not be created.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("http error: {0}")]
    Http(String),

    /// Error payload returned by the WebDriver endpoint.
    #[error("webdriver error: {error}: {message}")]
    WebDriver { error: String, message: String },

    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// Element handle no longer attached to the page.
    #[error("stale element: {0}")]
    StaleElement(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("javascript error: {0}")]
    JavaScript(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("session closed")]
    SessionClosed,
}

impl From<reqwest::Error> for BrowserError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BrowserError::Timeout(e.to_string())
        } else if e.is_connect() {
            BrowserError::ConnectionFailed(e.to_string())
        } else {
            BrowserError::Http(e.to_string())
        }
    }
}

impl From<serde_json::Error> for BrowserError {
    fn from(e: serde_json::Error) -> Self {
        BrowserError::InvalidResponse(e.to_string())
    }
}
