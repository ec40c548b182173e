//! Drives the element generators over visual lines.

use std::ops::Range;
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::document::{TextDocument, TextSource, VisualLine};
use crate::freezable::get_frozen_clone;
use crate::generator::{
    GenerationContext, InlineElement, LinkElementGenerator, VisualLineElementGenerator,
};
use crate::options::TextEditorOptions;

/// One piece of a rendered visual line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineSegment {
    /// Source text rendered as is, in absolute document offsets.
    Text(Range<usize>),
    /// Source text replaced by a generated element.
    Element(InlineElement),
}

/// The built-in generators enabled by `options`: links first, then e-mail.
pub fn default_generators(
    options: &TextEditorOptions,
) -> Vec<Box<dyn VisualLineElementGenerator>> {
    let mut generators: Vec<Box<dyn VisualLineElementGenerator>> = Vec::new();
    if options.enable_hyperlinks() {
        generators.push(Box::new(LinkElementGenerator::new()));
    }
    if options.enable_email_hyperlinks() {
        generators.push(Box::new(LinkElementGenerator::mail()));
    }
    generators
}

/// Splits visual lines into plain text and generated elements.
pub struct VisualLineBuilder {
    generators: Vec<Box<dyn VisualLineElementGenerator>>,
}

impl VisualLineBuilder {
    /// Generators are consulted in order when several want the same offset.
    pub fn new(generators: Vec<Box<dyn VisualLineElementGenerator>>) -> Self {
        Self { generators }
    }

    pub fn from_options(options: &TextEditorOptions) -> Self {
        Self::new(default_generators(options))
    }

    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    pub fn build(&mut self, context: &GenerationContext<'_>) -> Vec<LineSegment> {
        let line = context.visual_line();
        let window = context.window();
        let mut segments = Vec::new();
        let mut interested = vec![None; self.generators.len()];

        for generator in &mut self.generators {
            generator.start_generation(context);
        }

        let mut offset = line.start_offset;
        while offset < line.end_offset {
            let mut next = line.end_offset;
            for (generator, slot) in self.generators.iter_mut().zip(interested.iter_mut()) {
                *slot = generator
                    .first_interested_offset(context, offset)
                    .filter(|&o| o >= offset && o < line.end_offset);
                if let Some(o) = *slot {
                    next = next.min(o);
                }
            }

            if next > offset {
                push_text(&mut segments, offset..next);
                offset = next;
                continue;
            }

            let mut element = None;
            for (generator, slot) in self.generators.iter_mut().zip(&interested) {
                if *slot == Some(offset)
                    && let Some(constructed) = generator.construct_element(context, offset)
                    && constructed.length > 0
                {
                    element = Some(constructed);
                    break;
                }
            }

            match element {
                Some(element) => {
                    offset = element.end().min(line.end_offset);
                    segments.push(LineSegment::Element(element));
                }
                None => {
                    // Nobody could build an element here; render one character.
                    let step = window.text[offset - line.start_offset..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                    push_text(&mut segments, offset..offset + step);
                    offset += step;
                }
            }
        }

        for generator in &mut self.generators {
            generator.finish_generation();
        }

        log::trace!(
            "Built line {}..{} into {} segments",
            line.start_offset,
            line.end_offset,
            segments.len()
        );
        segments
    }
}

fn push_text(segments: &mut Vec<LineSegment>, range: Range<usize>) {
    if let Some(LineSegment::Text(last)) = segments.last_mut()
        && last.end == range.start
    {
        last.end = range.end;
        return;
    }
    segments.push(LineSegment::Text(range));
}

/// Renders a single visual line with the built-in generators.
pub fn render_line(
    document: &dyn TextSource,
    line: VisualLine,
    options: &Arc<TextEditorOptions>,
) -> Vec<LineSegment> {
    let context = GenerationContext::new(document, line, options);
    VisualLineBuilder::from_options(context.options()).build(&context)
}

/// Renders every line of `document`.
///
/// The options are frozen once and shared by all workers; each worker owns its
/// generators.
pub fn render_document(
    document: &TextDocument,
    options: &Arc<TextEditorOptions>,
) -> Vec<Vec<LineSegment>> {
    let snapshot = get_frozen_clone(options);
    let lines: Vec<VisualLine> = document.visual_lines().collect();
    log::debug!("Rendering {} lines", lines.len());

    #[cfg(not(target_arch = "wasm32"))]
    let iter = lines.par_iter();
    #[cfg(target_arch = "wasm32")]
    let iter = lines.iter();

    iter.map(|&line| render_line(document, line, &snapshot))
        .collect()
}

/// Writes segments as Markdown-style text, with elements as `[text](uri)`.
pub fn to_markup(document: &dyn TextSource, segments: &[LineSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            LineSegment::Text(range) => {
                out.push_str(document.get_text(range.start, range.len()).as_str());
            }
            LineSegment::Element(element) => {
                let text = document.get_text(element.offset, element.length).as_str();
                out.push('[');
                out.push_str(text);
                out.push_str("](");
                out.push_str(&element.navigate_uri);
                out.push(')');
            }
        }
    }
    out
}
