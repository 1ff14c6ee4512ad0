//! In-memory listing pages for walker tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{FetchError, PageSource};

/// Serves fixed HTML by absolute location; anything else is a 404.
#[derive(Debug, Default)]
pub(crate) struct StaticPages {
    pages: HashMap<String, Vec<u8>>,
    fetches: AtomicUsize,
}

impl StaticPages {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a listing page whose anchors are `label == href` for every entry.
    pub(crate) fn listing(mut self, location: &str, entries: &[&str]) -> Self {
        self.pages
            .insert(location.to_string(), listing_html(entries).into_bytes());
        self
    }

    /// Add a page with an arbitrary body.
    pub(crate) fn raw(mut self, location: &str, body: &[u8]) -> Self {
        self.pages.insert(location.to_string(), body.to_vec());
        self
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl PageSource for StaticPages {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.pages
            .get(location)
            .cloned()
            .ok_or_else(|| FetchError::Http {
                location: location.to_string(),
                code: 404,
            })
    }
}

/// Render a listing page the way common file servers do, parent link included.
pub(crate) fn listing_html(entries: &[&str]) -> String {
    let mut html = String::from(
        "<html><body><h1>Index</h1><pre>\n<a href=\"../\">Parent directory/</a>\n",
    );
    for entry in entries {
        html.push_str(&format!("<a href=\"{entry}\">{entry}</a>\n"));
    }
    html.push_str("</pre></body></html>");
    html
}
