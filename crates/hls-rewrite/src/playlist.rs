// Playlist facades: fetch-and-rewrite construction plus accessors over the
// rewritten document. Serialization is delegated to the parser's formatter.

use std::fmt;

use m3u8_rs::{MasterPlaylist, MediaPlaylist, Playlist};
use url::Url;

use crate::config::FetchConfig;
use crate::error::ManifestError;
use crate::fetch::{self, ManifestSource};
use crate::transform::{RewriteOptions, UriRewriter};
use crate::walker;

/// Base used to resolve relative URIs of manifests that were not fetched
/// from a URL (file and byte-stream sources).
const PLACEHOLDER_BASE: &str = "https://fakeurl.com/";

fn base_url(source_url: Option<&Url>) -> Result<Url, ManifestError> {
    match source_url {
        // The manifest's own directory.
        Some(url) => url.join(".").map_err(ManifestError::from),
        None => Url::parse(PLACEHOLDER_BASE).map_err(ManifestError::from),
    }
}

/// A multivariant manifest whose variant and alternate-media URIs have been
/// rewritten through the transform pipeline.
#[derive(Debug)]
pub struct MultiVariantManifest {
    playlist: MasterPlaylist,
    source_url: Option<Url>,
}

impl MultiVariantManifest {
    /// Acquires, parses, and rewrites a multivariant manifest.
    ///
    /// Fails with [`ManifestError::ExpectedMultiVariant`] when the source
    /// turns out to hold a media playlist.
    pub async fn fetch(
        source: ManifestSource,
        options: RewriteOptions,
    ) -> Result<Self, ManifestError> {
        Self::fetch_with_config(source, options, &FetchConfig::default()).await
    }

    pub async fn fetch_with_config(
        source: ManifestSource,
        options: RewriteOptions,
        config: &FetchConfig,
    ) -> Result<Self, ManifestError> {
        let loaded = fetch::load(source, config).await?;
        let mut playlist = match loaded.playlist {
            Playlist::MasterPlaylist(playlist) => playlist,
            Playlist::MediaPlaylist(_) => return Err(ManifestError::ExpectedMultiVariant),
        };
        let mut rewriter = UriRewriter::new(options);
        walker::rewrite_multi_variant(&mut playlist, &mut rewriter);
        Ok(Self {
            playlist,
            source_url: loaded.source_url,
        })
    }

    /// Rewritten variant-stream URIs, in playlist order.
    pub fn stream_uris(&self) -> Vec<String> {
        self.playlist
            .variants
            .iter()
            .map(|v| v.uri.clone())
            .collect()
    }

    /// Rewritten alternate-media URIs, in playlist order. Entries without a
    /// URI attribute are absent.
    pub fn alternative_uris(&self) -> Vec<String> {
        self.playlist
            .alternatives
            .iter()
            .filter_map(|a| a.uri.clone())
            .collect()
    }

    /// Variant URIs resolved against the manifest's own directory when it
    /// was fetched from a URL, else against a fixed placeholder base.
    pub fn stream_urls(&self) -> Result<Vec<Url>, ManifestError> {
        let base = base_url(self.source_url.as_ref())?;
        self.playlist
            .variants
            .iter()
            .map(|v| base.join(&v.uri).map_err(ManifestError::from))
            .collect()
    }

    pub fn playlist(&self) -> &MasterPlaylist {
        &self.playlist
    }

    pub fn source_url(&self) -> Option<&Url> {
        self.source_url.as_ref()
    }
}

impl fmt::Display for MultiVariantManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = Vec::new();
        self.playlist.write_to(&mut out).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&out))
    }
}

/// A media playlist whose segment URIs have been rewritten through the
/// transform pipeline.
#[derive(Debug)]
pub struct MediaManifest {
    playlist: MediaPlaylist,
    source_url: Option<Url>,
}

impl MediaManifest {
    /// Acquires, parses, and rewrites a media playlist.
    ///
    /// Fails with [`ManifestError::ExpectedMedia`] when the source turns out
    /// to hold a multivariant manifest.
    pub async fn fetch(
        source: ManifestSource,
        options: RewriteOptions,
    ) -> Result<Self, ManifestError> {
        Self::fetch_with_config(source, options, &FetchConfig::default()).await
    }

    pub async fn fetch_with_config(
        source: ManifestSource,
        options: RewriteOptions,
        config: &FetchConfig,
    ) -> Result<Self, ManifestError> {
        let loaded = fetch::load(source, config).await?;
        let mut playlist = match loaded.playlist {
            Playlist::MediaPlaylist(playlist) => playlist,
            Playlist::MasterPlaylist(_) => return Err(ManifestError::ExpectedMedia),
        };
        let mut rewriter = UriRewriter::new(options);
        walker::rewrite_media(&mut playlist, &mut rewriter);
        Ok(Self {
            playlist,
            source_url: loaded.source_url,
        })
    }

    /// Rewritten segment URIs, in playlist order.
    pub fn segment_uris(&self) -> Vec<String> {
        self.playlist
            .segments
            .iter()
            .map(|s| s.uri.clone())
            .collect()
    }

    /// Segment URIs resolved against the manifest's own directory when it
    /// was fetched from a URL, else against a fixed placeholder base.
    pub fn segment_urls(&self) -> Result<Vec<Url>, ManifestError> {
        let base = base_url(self.source_url.as_ref())?;
        self.playlist
            .segments
            .iter()
            .map(|s| base.join(&s.uri).map_err(ManifestError::from))
            .collect()
    }

    pub fn playlist(&self) -> &MediaPlaylist {
        &self.playlist
    }

    pub fn source_url(&self) -> Option<&Url> {
        self.source_url.as_ref()
    }
}

impl fmt::Display for MediaManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = Vec::new();
        self.playlist.write_to(&mut out).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&out))
    }
}

/// A manifest of either kind, detected at parse time.
#[derive(Debug)]
pub enum Manifest {
    MultiVariant(MultiVariantManifest),
    Media(MediaManifest),
}

impl Manifest {
    /// Acquires whichever playlist kind the source holds and rewrites it.
    pub async fn fetch(
        source: ManifestSource,
        options: RewriteOptions,
    ) -> Result<Self, ManifestError> {
        Self::fetch_with_config(source, options, &FetchConfig::default()).await
    }

    pub async fn fetch_with_config(
        source: ManifestSource,
        options: RewriteOptions,
        config: &FetchConfig,
    ) -> Result<Self, ManifestError> {
        let loaded = fetch::load(source, config).await?;
        let mut rewriter = UriRewriter::new(options);
        match loaded.playlist {
            Playlist::MasterPlaylist(mut playlist) => {
                walker::rewrite_multi_variant(&mut playlist, &mut rewriter);
                Ok(Self::MultiVariant(MultiVariantManifest {
                    playlist,
                    source_url: loaded.source_url,
                }))
            }
            Playlist::MediaPlaylist(mut playlist) => {
                walker::rewrite_media(&mut playlist, &mut rewriter);
                Ok(Self::Media(MediaManifest {
                    playlist,
                    source_url: loaded.source_url,
                }))
            }
        }
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultiVariant(manifest) => manifest.fmt(f),
            Self::Media(manifest) => manifest.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::params::QueryParams;

    const MULTI_VARIANT_WITH_QUERY: &str = "#EXTM3U\n\
        #EXT-X-VERSION:3\n\
        #EXT-X-STREAM-INF:BANDWIDTH=1212000,RESOLUTION=1024x458\n\
        manifest_1.m3u8?type=asdf\n\
        #EXT-X-STREAM-INF:BANDWIDTH=2424000,RESOLUTION=1024x458\n\
        manifest_2.m3u8?type=asdf\n";

    const MULTI_VARIANT_TRAVERSAL: &str = "#EXTM3U\n\
        #EXT-X-VERSION:3\n\
        #EXT-X-STREAM-INF:BANDWIDTH=1212000\n\
        ../../manifest_1.m3u8?x=1\n";

    const MULTI_VARIANT_DEMUXED: &str = "#EXTM3U\n\
        #EXT-X-VERSION:3\n\
        #EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID=\"audio\",NAME=\"English\",DEFAULT=YES,AUTOSELECT=YES,LANGUAGE=\"en\",URI=\"audio.m3u8\"\n\
        #EXT-X-STREAM-INF:BANDWIDTH=1212000,AUDIO=\"audio\"\n\
        manifest_1.m3u8\n";

    const MEDIA_WITH_QUERY: &str = "#EXTM3U\n\
        #EXT-X-VERSION:3\n\
        #EXT-X-TARGETDURATION:10\n\
        #EXT-X-MEDIA-SEQUENCE:1\n\
        #EXTINF:10.000,\n\
        manifest_1_00001.ts?type=asdf\n\
        #EXTINF:10.000,\n\
        manifest_1_00002.ts?type=asdf\n\
        #EXTINF:10.000,\n\
        manifest_1_00003.ts?type=asdf\n\
        #EXT-X-ENDLIST\n";

    fn reader(manifest: &str) -> ManifestSource {
        ManifestSource::from_reader(Cursor::new(manifest.as_bytes().to_vec()))
    }

    fn static_params(pairs: &[(&str, &str)]) -> RewriteOptions {
        RewriteOptions::new().with_params(pairs.iter().copied().collect::<QueryParams>())
    }

    #[tokio::test]
    async fn multivariant_static_params() {
        let manifest =
            MultiVariantManifest::fetch(reader(MULTI_VARIANT_WITH_QUERY), static_params(&[("hej", "hopp")]))
                .await
                .unwrap();

        assert_eq!(
            manifest.stream_uris(),
            [
                "manifest_1.m3u8?type=asdf&hej=hopp",
                "manifest_2.m3u8?type=asdf&hej=hopp"
            ]
        );

        let urls = manifest.stream_urls().unwrap();
        assert_eq!(
            urls[0].as_str(),
            "https://fakeurl.com/manifest_1.m3u8?type=asdf&hej=hopp"
        );

        let text = manifest.to_string();
        assert!(text.starts_with("#EXTM3U"));
        assert!(
            text.lines()
                .any(|line| line == "manifest_1.m3u8?type=asdf&hej=hopp")
        );
    }

    #[tokio::test]
    async fn multivariant_rewrites_alternatives_after_variants() {
        let manifest = MultiVariantManifest::fetch(
            reader(MULTI_VARIANT_DEMUXED),
            static_params(&[("token", "abc")]),
        )
        .await
        .unwrap();

        assert_eq!(manifest.stream_uris(), ["manifest_1.m3u8?token=abc"]);
        assert_eq!(manifest.alternative_uris(), ["audio.m3u8?token=abc"]);
        assert!(manifest.to_string().contains("URI=\"audio.m3u8?token=abc\""));
    }

    #[tokio::test]
    async fn multivariant_chroot_strips_traversal() {
        let options = RewriteOptions::new().with_chroot(true);
        let manifest = MultiVariantManifest::fetch(reader(MULTI_VARIANT_TRAVERSAL), options)
            .await
            .unwrap();
        assert_eq!(manifest.stream_uris(), ["manifest_1.m3u8?x=1"]);
    }

    #[tokio::test]
    async fn media_prepend_applies_after_generator_merge() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let recorded = seen.clone();
        let mut n = 0u32;
        let options = RewriteOptions::new()
            .with_params_fn(move |uri| {
                recorded.lock().unwrap().push(uri.to_owned());
                let params = QueryParams::from_iter([("n", n.to_string())]);
                n += 1;
                params
            })
            .with_prepend(Url::parse("https://prepend.com/hej/").unwrap());

        let manifest = MediaManifest::fetch(reader(MEDIA_WITH_QUERY), options)
            .await
            .unwrap();

        assert_eq!(
            manifest.segment_uris(),
            [
                "https://prepend.com/hej/manifest_1_00001.ts?type=asdf&n=0",
                "https://prepend.com/hej/manifest_1_00002.ts?type=asdf&n=1",
                "https://prepend.com/hej/manifest_1_00003.ts?type=asdf&n=2"
            ]
        );
        // The generator saw the pre-merge URIs, not the prepended ones.
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            [
                "manifest_1_00001.ts?type=asdf",
                "manifest_1_00002.ts?type=asdf",
                "manifest_1_00003.ts?type=asdf"
            ]
        );
    }

    #[tokio::test]
    async fn media_manifest_from_file_source() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), MEDIA_WITH_QUERY).unwrap();

        let manifest = MediaManifest::fetch(
            ManifestSource::File(file.path().to_path_buf()),
            static_params(&[("hej", "hopp")]),
        )
        .await
        .unwrap();

        assert_eq!(
            manifest.segment_uris()[0],
            "manifest_1_00001.ts?type=asdf&hej=hopp"
        );
        let urls = manifest.segment_urls().unwrap();
        assert_eq!(
            urls[0].as_str(),
            "https://fakeurl.com/manifest_1_00001.ts?type=asdf&hej=hopp"
        );
    }

    #[tokio::test]
    async fn kind_mismatch_is_rejected() {
        let err = MultiVariantManifest::fetch(reader(MEDIA_WITH_QUERY), RewriteOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ManifestError::ExpectedMultiVariant));

        let err = MediaManifest::fetch(reader(MULTI_VARIANT_WITH_QUERY), RewriteOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ManifestError::ExpectedMedia));
    }

    #[tokio::test]
    async fn manifest_detects_kind() {
        let manifest = Manifest::fetch(reader(MULTI_VARIANT_WITH_QUERY), RewriteOptions::new())
            .await
            .unwrap();
        assert!(matches!(manifest, Manifest::MultiVariant(_)));

        let manifest = Manifest::fetch(reader(MEDIA_WITH_QUERY), RewriteOptions::new())
            .await
            .unwrap();
        assert!(matches!(manifest, Manifest::Media(_)));
    }

    #[test]
    fn base_url_is_source_directory_or_placeholder() {
        let source = Url::parse("https://example.com/hls/slate/manifest.m3u8").unwrap();
        assert_eq!(
            base_url(Some(&source)).unwrap().as_str(),
            "https://example.com/hls/slate/"
        );
        assert_eq!(base_url(None).unwrap().as_str(), PLACEHOLDER_BASE);
    }
}
