//! Fetches a multivariant manifest, appends an auth token to every variant
//! URI, then does the same for the first media playlist it references.

use hls_rewrite::{ManifestSource, MediaManifest, MultiVariantManifest, QueryParams, RewriteOptions};
use url::Url;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let params = QueryParams::from_iter([("token", "TOKEN")]);

    let source = ManifestSource::Url(Url::parse(
        "https://demo.example.com/hls/slate/manifest.m3u8",
    )?);
    let multi_variant = MultiVariantManifest::fetch(
        source,
        RewriteOptions::new().with_params(params.clone()),
    )
    .await?;
    println!("{multi_variant}");

    let media_url = multi_variant.stream_urls()?.remove(0);
    let media = MediaManifest::fetch(
        ManifestSource::Url(media_url),
        RewriteOptions::new().with_params(params),
    )
    .await?;
    println!("{media}");

    Ok(())
}
