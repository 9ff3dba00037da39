//! Image extraction from HTML.
//!
//! Strategies run in a fixed order and the first one that yields a usable
//! candidate wins:
//!
//! 1. embedded preview-service data blob (`previewService.pushData(... "url":"...")`)
//! 2. Open Graph `og:image`
//! 3. meta refresh target
//! 4. first `<img src>`
//! 5. bare absolute image URL anywhere in the markup
//!
//! Extraction is best-effort and pure; callers decide what to do with the
//! candidate.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};
use url::Url;

static PREVIEW_SERVICE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)previewService\.pushData\(.*?"url"\s*:\s*"([^"]+)""#)
        .expect("Invalid preview service regex")
});

static OG_IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)property=["']og:image["'][^>]*content=["']([^"']+)["']"#)
        .expect("Invalid og:image regex")
});

static META_REFRESH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)http-equiv=["']refresh["'][^>]*content=["'][^;]+;\s*url=([^"']+)["']"#)
        .expect("Invalid meta refresh regex")
});

static IMG_SRC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).expect("Invalid img src regex")
});

static BARE_IMAGE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^"'\s>]+\.(png|jpe?g|gif|webp|bmp|svg)(\?[^"'\s>]*)?"#)
        .expect("Invalid bare image url regex")
});

/// One extraction strategy: returns the raw (still encoded) candidate.
pub type Strategy = fn(&str) -> Option<&str>;

/// Strategies in priority order.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("preview-service", preview_service_blob),
    ("og-image", og_image),
    ("meta-refresh", meta_refresh),
    ("img-src", img_src),
    ("bare-url", bare_image_url),
];

fn first_group<'h>(regex: &Regex, html: &'h str) -> Option<&'h str> {
    regex
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn preview_service_blob(html: &str) -> Option<&str> {
    first_group(&PREVIEW_SERVICE_REGEX, html)
}

pub fn og_image(html: &str) -> Option<&str> {
    first_group(&OG_IMAGE_REGEX, html)
}

pub fn meta_refresh(html: &str) -> Option<&str> {
    first_group(&META_REFRESH_REGEX, html)
}

pub fn img_src(html: &str) -> Option<&str> {
    first_group(&IMG_SRC_REGEX, html)
}

pub fn bare_image_url(html: &str) -> Option<&str> {
    BARE_IMAGE_URL_REGEX.find(html).map(|m| m.as_str())
}

/// Undo the HTML and JavaScript escaping commonly found around embedded URLs.
pub fn decode_candidate(value: &str) -> String {
    value
        .replace("&amp;", "&")
        .replace("\\u002F", "/")
        .replace("\\u002f", "/")
        .replace("\\/", "/")
}

/// First candidate image URL in `html`, decoded and resolved against `base`.
///
/// A candidate that cannot be resolved is skipped in favour of the next
/// strategy.
pub fn extract_image(html: &str, base: &Url) -> Option<String> {
    for (name, strategy) in STRATEGIES {
        let Some(raw) = strategy(html) else {
            continue;
        };
        let decoded = decode_candidate(raw);
        match base.join(&decoded) {
            Ok(resolved) => {
                debug!(strategy = name, url = %resolved, "extracted preview candidate");
                return Some(resolved.into());
            }
            Err(err) => {
                trace!(strategy = name, candidate = %decoded, error = %err, "unresolvable candidate");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://qr.example.com/scan/abc").unwrap()
    }

    #[test]
    fn preview_service_blob_spans_lines() {
        let html = "<script>previewService.pushData({\n  \"id\": 1,\n  \"url\" : \"https:\\/\\/img.example.com\\/a.png\"\n});</script>";
        assert_eq!(
            preview_service_blob(html),
            Some("https:\\/\\/img.example.com\\/a.png")
        );
        assert_eq!(
            extract_image(html, &base()).as_deref(),
            Some("https://img.example.com/a.png")
        );
    }

    #[test]
    fn og_image_is_case_insensitive() {
        let html = r#"<META PROPERTY="og:image" CONTENT="/og/card.jpg">"#;
        assert_eq!(og_image(html), Some("/og/card.jpg"));
    }

    #[test]
    fn meta_refresh_target() {
        let html = r#"<meta http-equiv="refresh" content="0; url=https://cdn.example.com/q.gif">"#;
        assert_eq!(meta_refresh(html), Some("https://cdn.example.com/q.gif"));
    }

    #[test]
    fn first_img_src() {
        let html = r#"<p><img alt="x" src='pics/one.webp'><img src="two.png"></p>"#;
        assert_eq!(img_src(html), Some("pics/one.webp"));
        assert_eq!(
            extract_image(html, &base()).as_deref(),
            Some("https://qr.example.com/scan/pics/one.webp")
        );
    }

    #[test]
    fn bare_url_in_script() {
        let html = r#"<script>var u = "https://i.example.com/x/y.jpeg?w=200&h=1";</script>"#;
        assert_eq!(
            bare_image_url(html),
            Some("https://i.example.com/x/y.jpeg?w=200&h=1")
        );
    }

    #[test]
    fn decode_escapes() {
        assert_eq!(
            decode_candidate("https:\\u002F\\u002Fa.example\\/b.png?x=1&amp;y=2"),
            "https://a.example/b.png?x=1&y=2"
        );
    }

    #[test]
    fn nothing_to_extract() {
        assert_eq!(extract_image("<html><body>hello</body></html>", &base()), None);
    }
}
