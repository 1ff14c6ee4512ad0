//! Split a listing page's anchors into sub-directories and media files.

use crate::config::MediadexConfig;
use crate::listing::Anchor;

/// Anchors of one page, partitioned. Both lists keep document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified<'a> {
    /// Relative directory segments, trailing `/` included.
    pub descend: Vec<&'a str>,
    /// File labels whose name mentions a recognized extension.
    pub leaf: Vec<&'a str>,
}

#[derive(Debug, Clone)]
pub struct AnchorClassifier {
    extensions: Vec<String>,
    parent_sentinel: String,
}

impl AnchorClassifier {
    pub fn new(extensions: Vec<String>, parent_sentinel: impl Into<String>) -> Self {
        Self {
            extensions: extensions.into_iter().filter(|e| !e.is_empty()).collect(),
            parent_sentinel: parent_sentinel.into(),
        }
    }

    pub fn from_config(cfg: &MediadexConfig) -> Self {
        Self::new(cfg.extensions.clone(), cfg.parent_sentinel.clone())
    }

    pub fn classify<'a>(&self, anchors: &'a [Anchor]) -> Classified<'a> {
        Classified {
            descend: self.descend_candidates(anchors),
            leaf: self.leaf_candidates(anchors),
        }
    }

    pub fn descend_candidates<'a>(&self, anchors: &'a [Anchor]) -> Vec<&'a str> {
        anchors
            .iter()
            .filter(|a| a.is_trusted())
            .map(|a| a.label.as_str())
            .filter(|label| label.ends_with('/') && *label != self.parent_sentinel)
            .collect()
    }

    pub fn leaf_candidates<'a>(&self, anchors: &'a [Anchor]) -> Vec<&'a str> {
        anchors
            .iter()
            .filter(|a| a.is_trusted())
            .map(|a| a.label.as_str())
            .filter(|label| label.contains('.') && self.mentions_extension(label))
            .collect()
    }

    // Containment, not suffix: "talk.mp4.part" and "webm-notes.txt" both match.
    fn mentions_extension(&self, label: &str) -> bool {
        self.extensions.iter().any(|ext| label.contains(ext.as_str()))
    }
}

impl Default for AnchorClassifier {
    fn default() -> Self {
        Self::from_config(&MediadexConfig::default())
    }
}
