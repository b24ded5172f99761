use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Export download failed: {0}")]
    Download(String),
}

pub type Result<T> = std::result::Result<T, PortalError>;
