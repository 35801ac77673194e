//! The attributed node tree handed to the compiler.

use crate::span::Span;

/// An attribute as written on a start tag, with entities decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: String,
    span: Span,
    value_span: Span,
}

impl Attribute {
    pub(crate) fn new(name: String, value: String, span: Span, value_span: Span) -> Self {
        Self {
            name,
            value,
            span,
            value_span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Span of the whole `Name="value"` pair.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Span of the value between the quotes.
    pub fn value_span(&self) -> Span {
        self.value_span
    }
}

/// An element of the source document.
///
/// Attributes keep document order. `text` is the concatenation of the
/// element's own character data and CDATA, skipping whitespace-only runs;
/// it is `None` when nothing remains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceNode {
    tag: String,
    attributes: Vec<Attribute>,
    text: Option<String>,
    children: Vec<SourceNode>,
    span: Span,
    line: usize,
}

impl SourceNode {
    pub(crate) fn new(tag: String, attributes: Vec<Attribute>, span: Span, line: usize) -> Self {
        Self {
            tag,
            attributes,
            text: None,
            children: Vec::new(),
            span,
            line,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Looks up an attribute by exact name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[SourceNode] {
        &self.children
    }

    /// Span of the start tag.
    pub fn span(&self) -> Span {
        self.span
    }

    /// 1-based line of the start tag.
    pub fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    pub(crate) fn push_child(&mut self, child: SourceNode) {
        self.children.push(child);
    }
}
