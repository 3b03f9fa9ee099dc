//! Input sanitizers. Every sanitizer is idempotent: applying it to its own
//! output changes nothing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Character references left untouched by [`escape`]
static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);")
        .expect("entity pattern is valid")
});

pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

pub fn lowercase(value: &str) -> String {
    value.to_lowercase()
}

/// Replace markup-significant characters with HTML character references.
///
/// An `&` that already starts a character reference is kept as is, so an
/// escaped value is never escaped twice.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (idx, c) in value.char_indices() {
        match c {
            '&' if ENTITY.is_match(&value[idx..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;&#x2F;script&gt;"
        );
        assert_eq!(escape("Tom & Jerry"), "Tom &amp; Jerry");
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn test_escape_is_idempotent() {
        let samples = [
            "<b>\"quoted\"</b>",
            "Fish & Chips",
            "O'Brien / Sons",
            "&amp; already",
            "a && b",
            "&#169; 2024",
        ];
        for sample in samples {
            let once = escape(sample);
            assert_eq!(escape(&once), once, "re-escaping {:?}", sample);
        }
    }

    #[test]
    fn test_trim_is_idempotent() {
        let once = trim("  Austen \n");
        assert_eq!(once, "Austen");
        assert_eq!(trim(&once), once);
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(lowercase("Reader@Example.ORG"), "reader@example.org");
    }
}
