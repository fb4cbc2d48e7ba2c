//! Text helpers for rendering notifications.

use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Percent-encoding (RFC 3986 unreserved set only)
// ---------------------------------------------------------------------------

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

/// Percent-encode every byte outside the RFC 3986 unreserved set.
///
/// Reserved characters such as `/`, `:`, `?`, `&` and `=` are escaped too, so
/// the result is safe as a single path segment or query value.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        if is_unreserved(b) {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// `true` for an absolute `http://` or `https://` URL with a host and no
/// whitespace or control characters.
pub fn is_http_url(input: &str) -> bool {
    let rest = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !input.chars().any(|c| c.is_whitespace() || c.is_control())
        }
        None => false,
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tag stripping
// ---------------------------------------------------------------------------

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new("<[^>]*>").expect("tag pattern is valid"))
}

/// Plain-text fallback for an HTML body: every `<...>` run is removed.
///
/// Best effort only. Content of `<style>` blocks and entities are left as-is;
/// this is not an HTML parser or sanitiser.
pub fn strip_tags(html: &str) -> String {
    tag_pattern().replace_all(html, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reserved_and_space() {
        assert_eq!(
            percent_encode("arn:aws:bedrock:model/x y"),
            "arn%3Aaws%3Abedrock%3Amodel%2Fx%20y"
        );
        assert_eq!(percent_encode("a-b.c_d~e"), "a-b.c_d~e");
    }

    #[test]
    fn encodes_multibyte_utf8() {
        assert_eq!(percent_encode("é"), "%C3%A9");
    }

    #[test]
    fn strips_tags_keeps_text() {
        assert_eq!(
            strip_tags("<p>Base <b>0.7000</b></p>\n<a href=\"x\">Approve</a>"),
            "Base 0.7000\nApprove"
        );
        assert_eq!(strip_tags("no tags here"), "no tags here");
    }

    #[test]
    fn escapes_html() {
        assert_eq!(escape_html("<a&b>\"'"), "&lt;a&amp;b&gt;&quot;&#39;");
    }

    #[test]
    fn http_url_check() {
        assert!(is_http_url("https://api.example.com/prod"));
        assert!(is_http_url("http://localhost:8080"));
        assert!(!is_http_url("javascript:alert(1)"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("https://api.example.com/a b"));
        assert!(!is_http_url("ftp://api.example.com"));
    }
}
