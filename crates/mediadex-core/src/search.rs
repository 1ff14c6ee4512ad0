//! Token search over catalog urls.

use crate::catalog::CatalogEntry;

/// Lazy iterator over the urls of matching entries, in catalog order.
///
/// Cloning yields an independent iterator, so a result set can be walked again.
pub struct Matches<'a, T> {
    entries: std::slice::Iter<'a, CatalogEntry>,
    tokens: &'a [T],
}

impl<T> Clone for Matches<'_, T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            tokens: self.tokens,
        }
    }
}

impl<'a, T: AsRef<str>> Iterator for Matches<'a, T> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let tokens = self.tokens;
        self.entries
            .by_ref()
            .find(|entry| matches_all(&entry.url, tokens))
            .map(|entry| entry.url.as_str())
    }
}

fn matches_all<T: AsRef<str>>(url: &str, tokens: &[T]) -> bool {
    tokens.iter().all(|token| url.contains(token.as_ref()))
}

/// Urls of entries containing every token (case-sensitive substring match).
/// No tokens matches everything.
pub fn search<'a, T: AsRef<str>>(entries: &'a [CatalogEntry], tokens: &'a [T]) -> Matches<'a, T> {
    Matches {
        entries: entries.iter(),
        tokens,
    }
}
