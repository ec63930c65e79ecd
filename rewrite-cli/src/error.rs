use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] hls_rewrite::ManifestError),

    #[error("Initialization failed: {0}")]
    Initialization(String),
}
