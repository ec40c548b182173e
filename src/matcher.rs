//! Bounded-window detection of link and e-mail spans.
//!
//! A matcher only ever sees the text of one visual line.

use std::sync::{Arc, LazyLock};

use regex::Regex;

/// Bare URLs: a protocol or `www.` prefix, link characters, and a final word
/// character or `/` so that sentence punctuation stays outside the link.
pub const LINK_PATTERN: &str = r"\b(https?://|ftp://|www\.)[\w\d\._/\-~%@()+:?&=#!]*[\w\d/]";

/// E-mail addresses with a 2–6 letter lowercase top-level domain.
pub const MAIL_PATTERN: &str = r"\b[\w\d\.\-]+@[\w\d\.\-]+\.[a-z]{2,6}\b";

static LINK_MATCHER: LazyLock<Arc<SpanMatcher>> = LazyLock::new(|| {
    let regex = Regex::new(LINK_PATTERN).expect("link pattern compiles");
    Arc::new(SpanMatcher::from_regex(regex).with_balanced_parentheses())
});

static MAIL_MATCHER: LazyLock<Arc<SpanMatcher>> = LazyLock::new(|| {
    let regex = Regex::new(MAIL_PATTERN).expect("mail pattern compiles");
    Arc::new(SpanMatcher::from_regex(regex))
});

/// Errors that can occur when building a matcher from a custom pattern.
#[derive(Debug, Clone)]
pub enum PatternError {
    /// A required argument was missing or empty.
    InvalidArgument(&'static str),
    /// The pattern is not a valid regular expression.
    InvalidPattern(regex::Error),
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(name) => write!(f, "missing required argument: {}", name),
            Self::InvalidPattern(e) => write!(f, "invalid pattern: {}", e),
        }
    }
}

impl std::error::Error for PatternError {}

impl From<regex::Error> for PatternError {
    fn from(e: regex::Error) -> Self {
        Self::InvalidPattern(e)
    }
}

/// Location of a detected span, in absolute document offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanMatch {
    pub offset: usize,
    pub length: usize,
}

impl SpanMatch {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// The text a matcher may look at, with its position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextWindow<'a> {
    pub text: &'a str,
    pub start_offset: usize,
}

impl<'a> TextWindow<'a> {
    pub fn new(text: &'a str, start_offset: usize) -> Self {
        Self { text, start_offset }
    }

    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.len()
    }

    /// Text of an absolute range inside the window.
    pub fn slice(&self, span: SpanMatch) -> &'a str {
        let start = span.offset - self.start_offset;
        &self.text[start..start + span.length]
    }
}

/// A compiled span pattern. Immutable once built, so one instance is shared by
/// every generator and rendering thread.
#[derive(Debug, Clone)]
pub struct SpanMatcher {
    regex: Regex,
    balance_parentheses: bool,
}

impl SpanMatcher {
    /// Compiles a custom pattern.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::InvalidArgument("pattern"));
        }
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    pub fn from_regex(regex: Regex) -> Self {
        Self {
            regex,
            balance_parentheses: false,
        }
    }

    /// Lets a match absorb trailing `)` characters that close a `(` inside it.
    pub fn with_balanced_parentheses(mut self) -> Self {
        self.balance_parentheses = true;
        self
    }

    /// The shared default link matcher.
    pub fn link() -> Arc<SpanMatcher> {
        Arc::clone(&LINK_MATCHER)
    }

    /// The shared default e-mail matcher.
    pub fn mail() -> Arc<SpanMatcher> {
        Arc::clone(&MAIL_MATCHER)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Finds the first span starting at or after the absolute offset `from`.
    ///
    /// Word boundaries see the window text before `from`, so resuming a scan in
    /// the middle of a word never produces a match there.
    pub fn find_next(&self, window: TextWindow<'_>, from: usize) -> Option<SpanMatch> {
        if from > window.end_offset() {
            return None;
        }
        let mut start = from.saturating_sub(window.start_offset);
        while !window.text.is_char_boundary(start) {
            start += 1;
        }

        let found = self.regex.find_at(window.text, start)?;
        let mut end = found.end();
        if self.balance_parentheses {
            end = extend_over_closing_parens(window.text, found.start(), end);
        }

        log::trace!(
            "Span {:?} at {} in window starting at {}",
            &window.text[found.start()..end],
            found.start(),
            window.start_offset
        );

        Some(SpanMatch {
            offset: window.start_offset + found.start(),
            length: end - found.start(),
        })
    }

    /// The span starting exactly at `offset`, if any.
    pub fn match_at(&self, window: TextWindow<'_>, offset: usize) -> Option<SpanMatch> {
        self.find_next(window, offset)
            .filter(|span| span.offset == offset)
    }
}

/// Extends `start..end` over `)` characters that balance an unclosed `(`.
fn extend_over_closing_parens(text: &str, start: usize, mut end: usize) -> usize {
    let matched = &text[start..end];
    let mut open = matched.matches('(').count();
    let closed = matched.matches(')').count();
    open = open.saturating_sub(closed);

    while open > 0 && text[end..].starts_with(')') {
        end += 1;
        open -= 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_link(text: &str) -> Option<&str> {
        let window = TextWindow::new(text, 0);
        SpanMatcher::link()
            .find_next(window, 0)
            .map(|span| window.slice(span))
    }

    fn find_mail(text: &str) -> Option<&str> {
        let window = TextWindow::new(text, 0);
        SpanMatcher::mail()
            .find_next(window, 0)
            .map(|span| window.slice(span))
    }

    #[test]
    fn test_link_stops_before_trailing_word() {
        let window = TextWindow::new("visit http://example.com/page today", 0);
        let span = SpanMatcher::link().find_next(window, 0).unwrap();
        assert_eq!(span, SpanMatch { offset: 6, length: 23 });
        assert_eq!(window.slice(span), "http://example.com/page");
    }

    #[test]
    fn test_link_protocols() {
        assert_eq!(find_link("get https://a.io/x"), Some("https://a.io/x"));
        assert_eq!(
            find_link("ftp://files.example.org/pub/"),
            Some("ftp://files.example.org/pub/")
        );
        assert_eq!(find_link("mailto://nope"), None);
        assert_eq!(find_link("gopher://old.example"), None);
    }

    #[test]
    fn test_link_excludes_sentence_punctuation() {
        assert_eq!(find_link("see www.example.com."), Some("www.example.com"));
        assert_eq!(find_link("(www.example.com)"), Some("www.example.com"));
        assert_eq!(find_link("is it http://a.com/?"), Some("http://a.com/"));
    }

    #[test]
    fn test_link_keeps_inner_and_balanced_parens() {
        assert_eq!(
            find_link("http://example.com/a(b)c done"),
            Some("http://example.com/a(b)c")
        );
        assert_eq!(
            find_link("see http://en.wikipedia.org/wiki/Rust_(language)."),
            Some("http://en.wikipedia.org/wiki/Rust_(language)")
        );
        assert_eq!(
            find_link("(see http://en.wikipedia.org/wiki/Rust_(language))"),
            Some("http://en.wikipedia.org/wiki/Rust_(language)")
        );
    }

    #[test]
    fn test_link_requires_word_boundary() {
        assert_eq!(find_link("xwww.example.com"), None);
        assert_eq!(find_link("xhttp://example.com"), None);
        assert_eq!(find_link("x http://example.com"), Some("http://example.com"));
    }

    #[test]
    fn test_mail() {
        assert_eq!(find_mail("contact me@example.com now"), Some("me@example.com"));
        assert_eq!(
            find_mail("first.last@sub-domain.example.org"),
            Some("first.last@sub-domain.example.org")
        );
        assert_eq!(find_mail("a@b.c"), None);
        assert_eq!(find_mail("me@example.COM"), None);
        assert_eq!(find_mail("me@example.toolong"), None);
    }

    #[test]
    fn test_find_next_uses_absolute_offsets() {
        let text = "one http://a.com two http://b.com";
        let window = TextWindow::new(text, 100);
        let matcher = SpanMatcher::link();

        let first = matcher.find_next(window, 100).unwrap();
        assert_eq!(first.offset, 104);
        let second = matcher.find_next(window, first.end()).unwrap();
        assert_eq!(window.slice(second), "http://b.com");
        assert_eq!(matcher.find_next(window, second.end()), None);
        assert_eq!(matcher.find_next(window, 500), None);
    }

    #[test]
    fn test_resuming_mid_word_does_not_match() {
        let text = "awww.example.com";
        let window = TextWindow::new(text, 0);
        assert_eq!(SpanMatcher::link().find_next(window, 1), None);
    }

    #[test]
    fn test_match_at_requires_exact_offset() {
        let window = TextWindow::new("go www.a.com", 0);
        let matcher = SpanMatcher::link();
        assert_eq!(matcher.match_at(window, 0), None);
        assert_eq!(
            matcher.match_at(window, 3),
            Some(SpanMatch { offset: 3, length: 9 })
        );
    }

    #[test]
    fn test_find_next_skips_into_char_boundary() {
        let window = TextWindow::new("é www.a.com", 0);
        let span = SpanMatcher::link().find_next(window, 1).unwrap();
        assert_eq!(span.offset, 3);
    }

    #[test]
    fn test_custom_pattern() {
        let matcher = SpanMatcher::new(r"\bTICKET-\d+\b").unwrap();
        let window = TextWindow::new("fixes TICKET-42.", 0);
        let span = matcher.find_next(window, 0).unwrap();
        assert_eq!(window.slice(span), "TICKET-42");
        assert_eq!(matcher.pattern(), r"\bTICKET-\d+\b");
    }

    #[test]
    fn test_custom_pattern_errors() {
        assert!(matches!(
            SpanMatcher::new(""),
            Err(PatternError::InvalidArgument("pattern"))
        ));
        let err = SpanMatcher::new("(unclosed").unwrap_err();
        assert!(matches!(err, PatternError::InvalidPattern(_)));
        assert!(err.to_string().starts_with("invalid pattern"));
    }

    #[test]
    fn test_default_matchers_are_shared() {
        assert!(Arc::ptr_eq(&SpanMatcher::link(), &SpanMatcher::link()));
        assert!(Arc::ptr_eq(&SpanMatcher::mail(), &SpanMatcher::mail()));
    }
}
