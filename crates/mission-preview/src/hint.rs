//! Classification of scanned values before any network access.

use std::sync::LazyLock;

use regex::Regex;

/// Path ending in a known image extension, with an optional query.
static IMAGE_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(png|jpe?g|gif|webp|bmp|svg)(\?.*)?$").expect("Invalid image path regex")
});

static HTTP_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("Invalid http url regex"));

/// What to do with a scanned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    /// Already an image; preview it without fetching.
    Image,
    /// A web address worth fetching.
    Fetch,
    Unknown,
}

/// Direct image reference: a `data:image/` URI or a path ending in an image
/// extension.
pub fn is_image_reference(value: &str) -> bool {
    value.starts_with("data:image/") || IMAGE_PATH_REGEX.is_match(value)
}

pub fn is_http_url(value: &str) -> bool {
    HTTP_URL_REGEX.is_match(value)
}

pub fn classify(value: &str) -> Hint {
    if is_image_reference(value) {
        Hint::Image
    } else if is_http_url(value) {
        Hint::Fetch
    } else {
        Hint::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_references() {
        assert!(is_image_reference("https://cdn.example/qr.PNG"));
        assert!(is_image_reference("/pixel/intro.webp?v=2"));
        assert!(is_image_reference("data:image/png;base64,AAAA"));
        assert!(!is_image_reference("https://example.com/page"));
        assert!(!is_image_reference("https://example.com/png"));
    }

    #[test]
    fn classification() {
        assert_eq!(classify("https://example.com/a.jpeg"), Hint::Image);
        assert_eq!(classify("HTTP://example.com/"), Hint::Fetch);
        assert_eq!(classify("3,9,8"), Hint::Unknown);
        assert_eq!(classify("ftp://example.com/file"), Hint::Unknown);
    }
}
