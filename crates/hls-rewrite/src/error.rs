use reqwest::StatusCode;

/// Errors surfaced while acquiring or parsing a manifest.
///
/// Rewriting itself is total over any parsed playlist and cannot fail;
/// everything here happens before the pipeline runs, except [`Url`] which
/// can also surface when resolving rewritten URIs against a base.
///
/// [`Url`]: ManifestError::Url
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch manifest, server returned status code {0}")]
    StatusCode(StatusCode),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to parse manifest: {0}")]
    Parse(String),

    #[error("Expected a multivariant manifest, got a media playlist")]
    ExpectedMultiVariant,

    #[error("Expected a media playlist, got a multivariant manifest")]
    ExpectedMedia,
}
