//! The contract between the line renderer and span detectors.
//!
//! For each visual line the renderer repeatedly asks every registered generator
//! for the next offset it cares about, renders plain text up to the nearest one,
//! and then asks the owning generator to build an inline element there.

use std::sync::Arc;

use crate::document::{TextSource, VisualLine};
use crate::freezable::get_frozen_clone;
use crate::highlighting::HighlightingColor;
use crate::matcher::TextWindow;
use crate::options::TextEditorOptions;

pub mod links;

pub use links::{LinkElementGenerator, TargetScheme};

/// Everything a generator may read during one pass over a visual line.
pub struct GenerationContext<'a> {
    document: &'a dyn TextSource,
    visual_line: VisualLine,
    options: Arc<TextEditorOptions>,
}

impl<'a> GenerationContext<'a> {
    /// Creates a context reading a frozen snapshot of `options`. An already
    /// frozen instance is shared rather than copied.
    ///
    /// A visual line reaching past the end of the document is cut back to it.
    pub fn new(
        document: &'a dyn TextSource,
        visual_line: VisualLine,
        options: &Arc<TextEditorOptions>,
    ) -> Self {
        let length = document.text_length();
        let visual_line = if visual_line.end_offset > length {
            log::debug!(
                "Visual line {}..{} clamped to document length {}",
                visual_line.start_offset,
                visual_line.end_offset,
                length
            );
            VisualLine::new(visual_line.start_offset.min(length), length)
        } else {
            visual_line
        };
        Self {
            document,
            visual_line,
            options: get_frozen_clone(options),
        }
    }

    pub fn document(&self) -> &'a dyn TextSource {
        self.document
    }

    pub fn visual_line(&self) -> VisualLine {
        self.visual_line
    }

    pub fn options(&self) -> &Arc<TextEditorOptions> {
        &self.options
    }

    /// Text of the visual line. Nothing past its end is ever read.
    pub fn window(&self) -> TextWindow<'a> {
        let line = self.visual_line;
        let segment = self.document.get_text(line.start_offset, line.len());
        TextWindow::new(segment.as_str(), line.start_offset)
    }
}

/// An inline element replacing a run of source text.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineElement {
    /// Absolute document offset of the replaced text.
    pub offset: usize,
    /// Number of document bytes the element consumes.
    pub length: usize,
    pub navigate_uri: String,
    pub require_control_for_click: bool,
    pub style: Arc<HighlightingColor>,
}

impl InlineElement {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Whether a click with the given Control state should follow the link.
    pub fn navigates_on_click(&self, control_held: bool) -> bool {
        !self.require_control_for_click || control_held
    }

    /// The source text the element stands for.
    pub fn text<'a>(&self, context: &GenerationContext<'a>) -> &'a str {
        context.document().get_text(self.offset, self.length).as_str()
    }
}

/// A detector that replaces sub-ranges of a visual line with inline elements.
pub trait VisualLineElementGenerator {
    /// Called once before a pass over `context.visual_line()`.
    fn start_generation(&mut self, _context: &GenerationContext<'_>) {}

    /// The first offset in `[start_offset, visual_line.end_offset)` at which this
    /// generator wants to construct an element.
    fn first_interested_offset(
        &mut self,
        context: &GenerationContext<'_>,
        start_offset: usize,
    ) -> Option<usize>;

    /// Builds the element starting at `offset`, or `None` to leave the text as is.
    fn construct_element(
        &mut self,
        context: &GenerationContext<'_>,
        offset: usize,
    ) -> Option<InlineElement>;

    /// Called once after the pass.
    fn finish_generation(&mut self) {}
}
