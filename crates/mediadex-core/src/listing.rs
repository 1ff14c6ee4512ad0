//! Anchor extraction from directory listing HTML.

use scraper::{Html, Selector};
use std::sync::LazyLock;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("BUG: hardcoded CSS selector 'a' is invalid"));

/// One `<a>` element of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Text content of the element.
    pub label: String,
    /// The `href` attribute, if any.
    pub target: Option<String>,
}

impl Anchor {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: Some(target.into()),
        }
    }

    /// Server-generated entries link to themselves: label and href are identical.
    /// Decorative and navigation links ("Parent directory", sort headers) are not.
    pub fn is_trusted(&self) -> bool {
        self.target.as_deref() == Some(self.label.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("listing is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Parse a listing page body into its anchors, in document order.
pub fn parse_anchors(body: &[u8]) -> Result<Vec<Anchor>, ListingError> {
    let html = std::str::from_utf8(body)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&ANCHOR_SELECTOR)
        .map(|element| Anchor {
            label: element.text().collect(),
            target: element.value().attr("href").map(str::to_owned),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_in_document_order() {
        let html = br#"<html><body>
            <a href="../">Parent directory/</a>
            <a href="2019/">2019/</a>
            <a href="2020/">2020/</a>
            <a href="?C=M;O=A">Last modified</a>
        </body></html>"#;
        let anchors = parse_anchors(html).unwrap();
        assert_eq!(anchors.len(), 4);
        assert_eq!(anchors[1], Anchor::new("2019/", "2019/"));
        assert_eq!(anchors[2], Anchor::new("2020/", "2020/"));
        assert!(!anchors[0].is_trusted());
        assert!(anchors[1].is_trusted());
        assert!(!anchors[3].is_trusted());
    }

    #[test]
    fn anchor_without_href_is_untrusted() {
        let anchors = parse_anchors(b"<a name=\"top\">top</a>").unwrap();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].target, None);
        assert!(!anchors[0].is_trusted());
    }

    #[test]
    fn entities_are_decoded_in_label_and_target() {
        let anchors = parse_anchors(b"<a href=\"a&amp;b.mp4\">a&amp;b.mp4</a>").unwrap();
        assert_eq!(anchors[0], Anchor::new("a&b.mp4", "a&b.mp4"));
        assert!(anchors[0].is_trusted());
    }

    #[test]
    fn empty_page_has_no_anchors() {
        assert!(parse_anchors(b"<html><body><p>empty</p></body></html>")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = parse_anchors(&[0x3c, 0x61, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ListingError::InvalidUtf8(_)));
    }
}
