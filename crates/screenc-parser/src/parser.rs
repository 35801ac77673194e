//! Builds the node tree from scanned markup.

use log::debug;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lexer::{Markup, PositionedMarkup},
    node::SourceNode,
    span::Span,
};

/// Maps byte offsets to 1-based line numbers.
#[derive(Debug)]
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { line_starts }
    }

    pub(crate) fn line(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }
}

struct TreeBuilder {
    lines: LineIndex,
    open: Vec<SourceNode>,
    root: Option<SourceNode>,
    diagnostics: DiagnosticCollector,
    elements: usize,
}

impl TreeBuilder {
    fn new(source: &str) -> Self {
        Self {
            lines: LineIndex::new(source),
            open: Vec::new(),
            root: None,
            diagnostics: DiagnosticCollector::new(),
            elements: 0,
        }
    }

    fn push(&mut self, item: PositionedMarkup<'_>) {
        let span = item.span;
        match item.markup {
            Markup::Instruction | Markup::Comment => {}
            Markup::Text(text) => match self.open.last_mut() {
                Some(node) => node.push_text(&text),
                None if text.trim().is_empty() => {}
                None => self.diagnostics.emit(
                    Diagnostic::error("text outside the root element")
                        .with_code(ErrorCode::E100)
                        .with_label(span, ErrorCode::E100.description())
                        .with_help("place text inside an element"),
                ),
            },
            Markup::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                if self.open.is_empty()
                    && let Some(root) = &self.root
                {
                    self.diagnostics.emit(
                        Diagnostic::error("document has more than one root element")
                            .with_code(ErrorCode::E100)
                            .with_label(span, "second root element")
                            .with_secondary_label(root.span(), "first root element"),
                    );
                    return;
                }

                self.elements += 1;
                let node = SourceNode::new(
                    name.to_string(),
                    attributes,
                    span,
                    self.lines.line(span.start()),
                );
                if self_closing {
                    self.close(node);
                } else {
                    self.open.push(node);
                }
            }
            Markup::EndTag { name } => self.end_tag(name, span),
        }
    }

    fn end_tag(&mut self, name: &str, span: Span) {
        let Some(node) = self.open.pop() else {
            self.diagnostics.emit(
                Diagnostic::error(format!("closing tag `</{name}>` has no matching start tag"))
                    .with_code(ErrorCode::E100)
                    .with_label(span, ErrorCode::E100.description()),
            );
            return;
        };

        if node.tag() != name {
            self.diagnostics.emit(
                Diagnostic::error(format!(
                    "closing tag `</{name}>` does not match `<{}>`",
                    node.tag()
                ))
                .with_code(ErrorCode::E102)
                .with_label(span, ErrorCode::E102.description())
                .with_secondary_label(node.span(), "element opened here"),
            );
        }
        self.close(node);
    }

    /// Attaches a finished element to its parent, or makes it the root.
    fn close(&mut self, node: SourceNode) {
        match self.open.last_mut() {
            Some(parent) => parent.push_child(node),
            None => self.root = Some(node),
        }
    }

    fn finish(mut self, source_len: usize) -> Result<SourceNode, ParseError> {
        for node in self.open.drain(..).rev() {
            self.diagnostics.emit(
                Diagnostic::error(format!("element `<{}>` is never closed", node.tag()))
                    .with_code(ErrorCode::E101)
                    .with_label(node.span(), ErrorCode::E101.description())
                    .with_help(format!("add `</{}>`", node.tag())),
            );
        }

        self.diagnostics.finish()?;
        let Some(root) = self.root else {
            return Err(Diagnostic::error("document has no root element")
                .with_code(ErrorCode::E101)
                .with_label(Span::new(source_len..source_len), ErrorCode::E101.description())
                .into());
        };

        debug!(root = root.tag(), elements = self.elements; "Loaded document");
        Ok(root)
    }
}

/// Turns scanned markup into a single-rooted node tree.
pub(crate) fn build_tree(
    source: &str,
    items: Vec<PositionedMarkup<'_>>,
) -> Result<SourceNode, ParseError> {
    let mut builder = TreeBuilder::new(source);
    for item in items {
        builder.push(item);
    }
    builder.finish(source.len())
}
