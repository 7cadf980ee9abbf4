//! Best-effort HTML stripping for display.
//!
//! Removes `<script>` blocks, inline `on*=` event-handler attributes, and
//! `<iframe>` blocks. This is NOT a security boundary: it is a regex
//! filter, not an HTML parser. Anything actually rendered as HTML must go
//! through an allow-list sanitizer instead.

use regex::Regex;

/// Strips the obvious script-injection vectors from chat content.
pub struct DisplaySanitizer {
    script: Regex,
    event_handler: Regex,
    iframe: Regex,
}

impl DisplaySanitizer {
    /// Creates a sanitizer.
    pub fn new() -> Self {
        Self {
            script: Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>")
                .expect("built-in script pattern is valid"),
            event_handler: Regex::new(r#"(?i)\son\w+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
                .expect("built-in event-handler pattern is valid"),
            iframe: Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe\s*>")
                .expect("built-in iframe pattern is valid"),
        }
    }

    /// Returns `content` with script blocks, inline event handlers, and
    /// iframe blocks removed. Everything else passes through unchanged.
    pub fn sanitize(&self, content: &str) -> String {
        let without_scripts = self.script.replace_all(content, "");
        let without_handlers = self.event_handler.replace_all(&without_scripts, "");
        self.iframe.replace_all(&without_handlers, "").into_owned()
    }
}

impl Default for DisplaySanitizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitizer() -> DisplaySanitizer {
        DisplaySanitizer::new()
    }

    #[test]
    fn strips_script_blocks() {
        let out = sanitizer().sanitize("hello <script>alert('x')</script> world");
        assert_eq!(out, "hello  world");
    }

    #[test]
    fn strips_script_blocks_case_insensitively() {
        let out = sanitizer().sanitize("<SCRIPT src=\"evil.js\">payload</SCRIPT>ok");
        assert_eq!(out, "ok");
    }

    #[test]
    fn strips_multiline_scripts() {
        let out = sanitizer().sanitize("a<script>\nline1\nline2\n</script>b");
        assert_eq!(out, "ab");
    }

    #[test]
    fn strips_event_handlers() {
        let out = sanitizer().sanitize(r#"<img src="x" onerror="alert(1)">"#);
        assert_eq!(out, r#"<img src="x">"#);
    }

    #[test]
    fn strips_single_quoted_handlers() {
        let out = sanitizer().sanitize("<div onclick='go()'>hi</div>");
        assert_eq!(out, "<div>hi</div>");
    }

    #[test]
    fn strips_iframes() {
        let out = sanitizer().sanitize("before<iframe src=\"a\">inner</iframe>after");
        assert_eq!(out, "beforeafter");
    }

    #[test]
    fn plain_text_passes_through() {
        let text = "see you tomorrow at 3pm <3";
        assert_eq!(sanitizer().sanitize(text), text);
    }

    #[test]
    fn other_markup_is_kept() {
        let text = "<b>bold</b> and <i>italic</i>";
        assert_eq!(sanitizer().sanitize(text), text);
    }

    #[test]
    fn sanitize_is_idempotent() {
        let inputs = [
            "hello <script>alert('x')</script> world",
            r#"<img src="x" onerror="alert(1)">"#,
            "a<iframe src=\"b\">c</iframe>d",
            "plain text stays plain",
        ];
        for input in inputs {
            let once = sanitizer().sanitize(input);
            let twice = sanitizer().sanitize(&once);
            assert_eq!(once, twice, "not idempotent for: {input}");
        }
    }
}
