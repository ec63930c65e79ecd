// URI transform pipeline: parameter merge, base-URL prepend, named-parameter
// removal, and path-traversal stripping, applied per item in that order.

use std::fmt;

use tracing::trace;
use url::Url;

use crate::params::QueryParams;

/// Splits a URI into its path part and the query after the first `?`.
fn split_uri(uri: &str) -> (&str, Option<&str>) {
    match uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (uri, None),
    }
}

/// Appends `incoming` to the query string of `uri`.
///
/// Existing entries are never overwritten: duplicates end up as separate
/// entries, all existing pairs first, then the incoming ones in their own
/// insertion order. The reassembled URI always carries a `?`, even when the
/// resulting query is empty.
pub fn merge_params(uri: &str, incoming: &QueryParams) -> String {
    let (path, query) = split_uri(uri);
    let mut params = query.map(QueryParams::parse).unwrap_or_default();
    params.append_all(incoming);
    format!("{path}?{params}")
}

/// Prepends `base` to `uri` by literal string concatenation.
///
/// This is intentionally not URL resolution: an already-absolute `uri` is
/// concatenated onto the base as-is, reproducing the reference behavior.
pub fn prepend_base(uri: &str, base: &Url) -> String {
    format!("{}{uri}", base.as_str())
}

/// Removes every query entry whose key appears in `names`.
///
/// A URI without a query part is returned unchanged.
pub fn remove_named(uri: &str, names: &[String]) -> String {
    let (path, query) = split_uri(uri);
    let Some(query) = query else {
        return uri.to_owned();
    };
    let mut params = QueryParams::parse(query);
    for name in names {
        params.remove_all(name);
    }
    format!("{path}?{params}")
}

/// Removes every literal `../` sequence from the path part of `uri`.
///
/// Textual substitution only, not path normalization; the query part is left
/// untouched.
pub fn strip_traversal(uri: &str) -> String {
    let (path, query) = split_uri(uri);
    let stripped = path.replace("../", "");
    match query {
        Some(query) => format!("{stripped}?{query}"),
        None => stripped,
    }
}

/// Where the merged parameters come from: a fixed set applied to every item,
/// or a generator invoked once per item with the item's pre-merge URI.
pub enum ParamsSource {
    Static(QueryParams),
    Generator(Box<dyn FnMut(&str) -> QueryParams + Send>),
}

impl ParamsSource {
    pub fn generator(f: impl FnMut(&str) -> QueryParams + Send + 'static) -> Self {
        Self::Generator(Box::new(f))
    }

    fn resolve(&mut self, uri: &str) -> QueryParams {
        match self {
            Self::Static(params) => params.clone(),
            Self::Generator(f) => f(uri),
        }
    }
}

impl fmt::Debug for ParamsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(params) => f.debug_tuple("Static").field(params).finish(),
            Self::Generator(_) => f.debug_tuple("Generator").field(&"..").finish(),
        }
    }
}

impl From<QueryParams> for ParamsSource {
    fn from(params: QueryParams) -> Self {
        Self::Static(params)
    }
}

/// Per-session rewriting configuration. Every stage is independently
/// optional; the default value leaves URIs untouched.
#[derive(Debug, Default)]
pub struct RewriteOptions {
    /// Parameters appended to every item URI.
    pub params: Option<ParamsSource>,
    /// Base URL prepended (literal concatenation) after the merge.
    pub prepend: Option<Url>,
    /// Parameter names stripped from every item URI after the prepend.
    pub remove: Vec<String>,
    /// Strip `../` traversal sequences from URI paths as the final stage.
    pub chroot: bool,
}

impl RewriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = Some(ParamsSource::Static(params));
        self
    }

    pub fn with_params_fn(mut self, f: impl FnMut(&str) -> QueryParams + Send + 'static) -> Self {
        self.params = Some(ParamsSource::generator(f));
        self
    }

    pub fn with_prepend(mut self, base: Url) -> Self {
        self.prepend = Some(base);
        self
    }

    pub fn with_remove(mut self, name: impl Into<String>) -> Self {
        self.remove.push(name.into());
        self
    }

    pub fn with_chroot(mut self, enabled: bool) -> Self {
        self.chroot = enabled;
        self
    }
}

/// Applies the transform pipeline to one URI at a time.
///
/// The stage order is fixed: merge, prepend, remove, chroot. A disabled
/// stage is skipped entirely and leaves the URI byte-identical.
pub struct UriRewriter {
    options: RewriteOptions,
}

impl UriRewriter {
    pub fn new(options: RewriteOptions) -> Self {
        Self { options }
    }

    pub fn rewrite(&mut self, uri: &str) -> String {
        // The generator observes the pre-merge URI, before any stage runs.
        let mut out = match self.options.params.as_mut() {
            Some(source) => merge_params(uri, &source.resolve(uri)),
            None => uri.to_owned(),
        };
        if let Some(base) = &self.options.prepend {
            out = prepend_base(&out, base);
        }
        if !self.options.remove.is_empty() {
            out = remove_named(&out, &self.options.remove);
        }
        if self.options.chroot {
            out = strip_traversal(&out);
        }
        trace!(from = uri, to = %out, "Rewrote URI");
        out
    }
}
