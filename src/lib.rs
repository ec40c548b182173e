use std::sync::Arc;

pub mod document;
pub mod freezable;
pub mod generator;
pub mod highlighting;
pub mod matcher;
pub mod options;
pub mod rendering;

pub use document::{TextDocument, TextSource, VisualLine};
pub use freezable::{CloneMutable, Freezable, FrozenList, FrozenMutationError};
pub use generator::{
    GenerationContext, InlineElement, LinkElementGenerator, VisualLineElementGenerator,
};
pub use highlighting::HighlightingColor;
pub use matcher::{SpanMatch, SpanMatcher};
pub use options::TextEditorOptions;
pub use rendering::{LineSegment, VisualLineBuilder};

#[cfg(test)]
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Renders `text` line by line and returns the result as Markdown-style markup,
/// with every generated element written as `[text](uri)`. Line terminators,
/// including `\r\n`, are kept as they appear in the input.
///
/// # Examples
///
/// ```rust
/// let markup = textview::linkify("mail me@example.com", None);
/// assert_eq!(markup, "mail [me@example.com](mailto:me@example.com)");
/// ```
///
/// # Arguments
///
/// * `text` - The document text
/// * `options` - Optional editor options (defaults to default options)
pub fn linkify(text: &str, options: Option<TextEditorOptions>) -> String {
    let document = TextDocument::new(text);
    let options = Arc::new(freezable::freeze_and_return(options.unwrap_or_default()));
    let mut output = String::with_capacity(text.len());
    for (line, segments) in rendering::render_document(&document, &options)
        .iter()
        .enumerate()
    {
        output.push_str(&rendering::to_markup(&document, segments));
        output.push_str(document.line_terminator(line).unwrap_or_default());
    }
    output
}
