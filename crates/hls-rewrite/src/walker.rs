// Walks the item collections of a parsed playlist and rewrites each item's
// URI in place. Order and item count are preserved exactly as parsed.

use m3u8_rs::{AlternativeMedia, MasterPlaylist, MediaPlaylist, MediaSegment, VariantStream};
use tracing::debug;

use crate::transform::UriRewriter;

/// One capability over every playlist item kind: a mutable `uri` attribute.
///
/// Alternate-media entries may omit the URI (e.g. closed-caption renditions);
/// such items are skipped by the walker and never reach the pipeline.
pub trait UriItem {
    fn uri(&self) -> Option<&str>;
    fn set_uri(&mut self, uri: String);
}

impl UriItem for VariantStream {
    fn uri(&self) -> Option<&str> {
        Some(&self.uri)
    }

    fn set_uri(&mut self, uri: String) {
        self.uri = uri;
    }
}

impl UriItem for AlternativeMedia {
    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    fn set_uri(&mut self, uri: String) {
        self.uri = Some(uri);
    }
}

impl UriItem for MediaSegment {
    fn uri(&self) -> Option<&str> {
        Some(&self.uri)
    }

    fn set_uri(&mut self, uri: String) {
        self.uri = uri;
    }
}

fn rewrite_items<'a, T, I>(items: I, rewriter: &mut UriRewriter) -> usize
where
    T: UriItem + 'a,
    I: IntoIterator<Item = &'a mut T>,
{
    let mut count = 0;
    for item in items {
        let current = match item.uri() {
            Some(uri) => uri.to_owned(),
            None => continue,
        };
        item.set_uri(rewriter.rewrite(&current));
        count += 1;
    }
    count
}

/// Rewrites every variant-stream URI, then every alternate-media URI.
///
/// The ordering is part of the contract: a per-URI generator sees variant
/// items before alternate items.
pub fn rewrite_multi_variant(playlist: &mut MasterPlaylist, rewriter: &mut UriRewriter) {
    let variants = rewrite_items(&mut playlist.variants, rewriter);
    let alternatives = rewrite_items(&mut playlist.alternatives, rewriter);
    debug!(variants, alternatives, "Rewrote multivariant manifest URIs");
}

/// Rewrites every segment URI of a media playlist, in playlist order.
pub fn rewrite_media(playlist: &mut MediaPlaylist, rewriter: &mut UriRewriter) {
    let segments = rewrite_items(&mut playlist.segments, rewriter);
    debug!(segments, "Rewrote media playlist URIs");
}
