// Manifest acquisition: resolves a source into raw bytes and hands them to
// the m3u8 parser. One-shot, no retries, no partial results.

use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;
use m3u8_rs::Playlist;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;
use url::Url;

use crate::config::FetchConfig;
use crate::error::ManifestError;

/// Where the manifest bytes come from.
pub enum ManifestSource {
    /// Fetch over HTTP(S).
    Url(Url),
    /// Read from the local filesystem.
    File(PathBuf),
    /// Drain an arbitrary byte stream.
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

impl ManifestSource {
    pub fn from_reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }
}

impl fmt::Debug for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Reader(_) => f.debug_tuple("Reader").field(&"..").finish(),
        }
    }
}

impl From<Url> for ManifestSource {
    fn from(url: Url) -> Self {
        Self::Url(url)
    }
}

impl From<PathBuf> for ManifestSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

#[derive(Debug)]
pub(crate) struct LoadedManifest {
    pub playlist: Playlist,
    /// The remote URL the manifest was fetched from, when it was.
    pub source_url: Option<Url>,
}

/// Acquires the manifest bytes and parses them into a playlist.
pub(crate) async fn load(
    source: ManifestSource,
    config: &FetchConfig,
) -> Result<LoadedManifest, ManifestError> {
    let (bytes, source_url) = match source {
        ManifestSource::Url(url) => (fetch_remote(&url, config).await?, Some(url)),
        ManifestSource::File(path) => {
            debug!(path = %path.display(), "Reading manifest from file");
            (Bytes::from(tokio::fs::read(&path).await?), None)
        }
        ManifestSource::Reader(mut reader) => {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).await?;
            debug!(bytes = buf.len(), "Read manifest from byte stream");
            (Bytes::from(buf), None)
        }
    };

    let playlist = m3u8_rs::parse_playlist_res(&bytes)
        .map_err(|e| ManifestError::Parse(format!("{e}")))?;
    Ok(LoadedManifest {
        playlist,
        source_url,
    })
}

async fn fetch_remote(url: &Url, config: &FetchConfig) -> Result<Bytes, ManifestError> {
    let client = config.create_client()?;
    debug!(url = %url, "Fetching manifest");
    let response = client.get(url.clone()).send().await?;
    if !response.status().is_success() {
        return Err(ManifestError::StatusCode(response.status()));
    }
    Ok(response.bytes().await?)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const MASTER: &str = "#EXTM3U\n\
        #EXT-X-VERSION:3\n\
        #EXT-X-STREAM-INF:BANDWIDTH=1212000\n\
        manifest_1.m3u8\n";

    const MEDIA: &str = "#EXTM3U\n\
        #EXT-X-VERSION:3\n\
        #EXT-X-TARGETDURATION:10\n\
        #EXTINF:10.000,\n\
        manifest_1_00001.ts\n\
        #EXT-X-ENDLIST\n";

    #[tokio::test]
    async fn reader_source_parses_master_playlist() {
        let source = ManifestSource::from_reader(Cursor::new(MASTER.as_bytes().to_vec()));
        let loaded = load(source, &FetchConfig::default()).await.unwrap();
        assert!(matches!(loaded.playlist, Playlist::MasterPlaylist(_)));
        assert!(loaded.source_url.is_none());
    }

    #[tokio::test]
    async fn reader_source_parses_media_playlist() {
        let source = ManifestSource::from_reader(Cursor::new(MEDIA.as_bytes().to_vec()));
        let loaded = load(source, &FetchConfig::default()).await.unwrap();
        assert!(matches!(loaded.playlist, Playlist::MediaPlaylist(_)));
    }

    #[tokio::test]
    async fn missing_file_surfaces_an_io_error() {
        let source = ManifestSource::File(PathBuf::from("/nonexistent/manifest.m3u8"));
        let err = load(source, &FetchConfig::default()).await.unwrap_err();
        assert!(matches!(err, ManifestError::Io(_)));
    }
}
