// src/backend/utils/sanitize.rs
// Text and URL checks applied to untrusted content before it is accepted.

use url::Url;

const MAILTO_PREFIX: &str = "mailto:";
const TEL_PREFIX: &str = "tel:";

/// Removes ASCII control characters (U+0000..=U+001F, U+007F) and trims whitespace.
pub fn sanitize_plain_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(*c, '\u{0000}'..='\u{001F}' | '\u{007F}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// True when `value` parses as an absolute URL with the `https` scheme.
pub fn is_valid_https_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => url.scheme() == "https",
        Err(_) => false,
    }
}

/// Accepts hash anchors (`#about`), site-relative paths (`/#about`),
/// `mailto:`/`tel:` with a payload, and absolute http(s) URLs.
pub fn is_valid_href(value: &str) -> bool {
    if let Some(fragment) = value.strip_prefix('#') {
        return !fragment.is_empty();
    }
    if value.starts_with('/') {
        return true;
    }
    if let Some(address) = value.strip_prefix(MAILTO_PREFIX) {
        return !address.is_empty();
    }
    if let Some(number) = value.strip_prefix(TEL_PREFIX) {
        return !number.is_empty();
    }
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "https" | "http"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_control_characters_and_trims() {
        assert_eq!(sanitize_plain_text("  Ada\u{0000} Love\u{007F}lace\n "), "Ada Lovelace");
        assert_eq!(sanitize_plain_text("\t\r\n"), "");
    }

    #[test]
    fn keeps_non_ascii_text() {
        assert_eq!(sanitize_plain_text(" Hi, I’m —. "), "Hi, I’m —.");
    }

    #[test]
    fn https_check_rejects_other_schemes() {
        assert!(is_valid_https_url("https://example.com/a.png"));
        assert!(!is_valid_https_url("http://example.com/a.png"));
        assert!(!is_valid_https_url("//example.com/a.png"));
        assert!(!is_valid_https_url(""));
    }

    #[test]
    fn href_rules() {
        assert!(is_valid_href("#home"));
        assert!(!is_valid_href("#"));
        assert!(is_valid_href("/"));
        assert!(is_valid_href("/#about"));
        assert!(is_valid_href("mailto:test@example.com"));
        assert!(!is_valid_href("mailto:"));
        assert!(is_valid_href("tel:+1234567890"));
        assert!(!is_valid_href("tel:"));
        assert!(is_valid_href("http://example.com"));
        assert!(is_valid_href("https://example.com/x?y=1"));
        assert!(!is_valid_href("javascript:alert(1)"));
        assert!(!is_valid_href("ftp://example.com"));
        assert!(!is_valid_href("about"));
    }
}
