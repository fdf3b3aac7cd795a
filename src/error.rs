use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Catalog API {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Parse(err.to_string())
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
