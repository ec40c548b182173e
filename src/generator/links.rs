//! Clickable links for URLs and e-mail addresses found in the text.
//!
//! Both detectors share one scanning and construction algorithm and differ only
//! in the [`TargetScheme`] that turns matched text into a navigation target.

use std::sync::{Arc, LazyLock};

use url::Url;

use super::{GenerationContext, InlineElement, VisualLineElementGenerator};
use crate::document::VisualLine;
use crate::freezable::{freeze_and_return, get_frozen_clone};
use crate::highlighting::HighlightingColor;
use crate::matcher::{PatternError, SpanMatch, SpanMatcher};

static DEFAULT_LINK_STYLE: LazyLock<Arc<HighlightingColor>> =
    LazyLock::new(|| Arc::new(freeze_and_return(HighlightingColor::link_default())));

/// How matched text becomes a navigation target.
#[derive(Debug, Clone, Copy)]
pub enum TargetScheme {
    /// Web links; a bare `www.` host gets an `http://` prefix.
    Hyperlink,
    /// E-mail addresses, prefixed with `mailto:`.
    Mail,
    /// Caller-supplied derivation. Returning `None` leaves the text unlinked.
    Custom(fn(&str) -> Option<String>),
}

impl TargetScheme {
    pub fn derive(&self, matched: &str) -> Option<String> {
        match self {
            Self::Hyperlink => {
                if matched.starts_with("www.") {
                    Some(format!("http://{}", matched))
                } else {
                    Some(matched.to_string())
                }
            }
            Self::Mail => Some(format!("mailto:{}", matched)),
            Self::Custom(derive) => derive(matched),
        }
    }
}

/// Result of the most recent scan within the current pass.
#[derive(Debug, Clone, Copy)]
struct ScanCache {
    line: VisualLine,
    from: usize,
    next: Option<SpanMatch>,
}

impl ScanCache {
    /// The cached answer is valid for any query between the scan start and the
    /// span it found: the text in between is known to hold no match.
    fn answer(&self, line: VisualLine, start_offset: usize) -> Option<Option<SpanMatch>> {
        if self.line != line || start_offset < self.from {
            return None;
        }
        match self.next {
            Some(span) if start_offset <= span.offset => Some(Some(span)),
            Some(_) => None,
            None => Some(None),
        }
    }
}

/// Turns matched spans into clickable [`InlineElement`]s.
#[derive(Debug, Clone)]
pub struct LinkElementGenerator {
    matcher: Arc<SpanMatcher>,
    scheme: TargetScheme,
    style: Arc<HighlightingColor>,
    require_control_for_click: bool,
    scan: Option<ScanCache>,
}

impl Default for LinkElementGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkElementGenerator {
    /// Detects `http://`, `https://`, `ftp://` and `www.` links.
    pub fn new() -> Self {
        Self::with_matcher(SpanMatcher::link(), TargetScheme::Hyperlink)
    }

    /// Detects e-mail addresses and links them with `mailto:`.
    pub fn mail() -> Self {
        Self::with_matcher(SpanMatcher::mail(), TargetScheme::Mail)
    }

    pub fn with_matcher(matcher: Arc<SpanMatcher>, scheme: TargetScheme) -> Self {
        Self {
            matcher,
            scheme,
            style: Arc::clone(&DEFAULT_LINK_STYLE),
            require_control_for_click: true,
            scan: None,
        }
    }

    /// Uses a custom pattern in place of the built-in one.
    pub fn with_pattern(pattern: &str, scheme: TargetScheme) -> Result<Self, PatternError> {
        let matcher = SpanMatcher::new(pattern)?;
        Ok(Self::with_matcher(Arc::new(matcher), scheme))
    }

    /// Sets the style carried by produced elements. A mutable style is frozen
    /// into a private copy; the caller's instance is left alone.
    pub fn with_style(mut self, style: &Arc<HighlightingColor>) -> Self {
        self.style = get_frozen_clone(style);
        self
    }

    pub fn matcher(&self) -> &Arc<SpanMatcher> {
        &self.matcher
    }

    pub fn scheme(&self) -> TargetScheme {
        self.scheme
    }

    pub fn style(&self) -> &Arc<HighlightingColor> {
        &self.style
    }

    /// Click policy pulled from the options at the start of the last pass.
    pub fn require_control_for_click(&self) -> bool {
        self.require_control_for_click
    }

    fn next_span(
        &mut self,
        context: &GenerationContext<'_>,
        start_offset: usize,
    ) -> Option<SpanMatch> {
        let line = context.visual_line();
        if let Some(answer) = self.scan.and_then(|cache| cache.answer(line, start_offset)) {
            return answer;
        }

        let next = self.matcher.find_next(context.window(), start_offset);
        self.scan = Some(ScanCache {
            line,
            from: start_offset,
            next,
        });
        next
    }
}

impl VisualLineElementGenerator for LinkElementGenerator {
    fn start_generation(&mut self, context: &GenerationContext<'_>) {
        self.require_control_for_click = context.options().require_control_for_hyperlink_click();
        self.scan = None;
    }

    fn first_interested_offset(
        &mut self,
        context: &GenerationContext<'_>,
        start_offset: usize,
    ) -> Option<usize> {
        let line = context.visual_line();
        if start_offset >= line.end_offset {
            return None;
        }
        let offset = self.next_span(context, start_offset)?.offset;
        log::trace!("{:?} generator interested at {}", self.scheme, offset);
        Some(offset)
    }

    fn construct_element(
        &mut self,
        context: &GenerationContext<'_>,
        offset: usize,
    ) -> Option<InlineElement> {
        // Always re-match: the line may have changed since the offset was reported.
        let window = context.window();
        let span = self.matcher.match_at(window, offset)?;
        let matched = window.slice(span);

        let Some(target) = self.scheme.derive(matched) else {
            log::debug!("No target derived from {:?} at {}", matched, offset);
            return None;
        };
        if let Err(e) = Url::parse(&target) {
            log::debug!("Rejected link target {:?} at {}: {}", target, offset, e);
            return None;
        }

        log::debug!("Constructed link to {} at {}..{}", target, span.offset, span.end());
        Some(InlineElement {
            offset: span.offset,
            length: span.length,
            navigate_uri: target,
            require_control_for_click: self.require_control_for_click,
            style: Arc::clone(&self.style),
        })
    }

    fn finish_generation(&mut self) {
        self.scan = None;
    }
}
