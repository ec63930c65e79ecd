use std::fmt;

/// An ordered multimap of query parameters.
///
/// Unlike a plain key/value map, duplicate keys are kept as separate entries
/// and insertion order is preserved. Parsing and serialization are purely
/// textual: values are never URL-decoded or re-encoded, so a pre-encoded
/// value such as `a=%7E` survives a round trip byte-for-byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string (the part after `?`).
    ///
    /// Best-effort: empty chunks are skipped, a chunk without `=` becomes a
    /// key with an empty value. Everything else is taken verbatim.
    pub fn parse(query: &str) -> Self {
        let mut pairs = Vec::new();
        for chunk in query.split('&') {
            if chunk.is_empty() {
                continue;
            }
            match chunk.split_once('=') {
                Some((key, value)) => pairs.push((key.to_owned(), value.to_owned())),
                None => pairs.push((chunk.to_owned(), String::new())),
            }
        }
        Self { pairs }
    }

    /// Appends a pair at the end. Existing entries with the same key are kept.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Appends every pair of `other` after the existing entries, preserving
    /// the insertion order of both sets.
    pub fn append_all(&mut self, other: &QueryParams) {
        self.pairs.extend(other.pairs.iter().cloned());
    }

    /// Removes every entry whose key equals `key`.
    pub fn remove_all(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// First value recorded for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for QueryParams {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.pairs
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}
