//! Arena storage for the element tree.
//!
//! Elements refer to their parent and children by [`ElementId`]. Detached
//! subtrees stay in the arena until the session ends.

use screenc_parser::Span;

use screenc_core::artifact::ShowValue;

use super::{Graphic, GraphicKind};
use crate::{config::SetTargetPolicy, error::ErrorKind, expr::Value};

/// Index of an element in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

/// A node of the screen tree.
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) tag: String,
    pub(crate) name: Option<String>,
    /// `None` until set; unset offsets count as zero when drawing.
    pub(crate) top: Option<i32>,
    pub(crate) left: Option<i32>,
    pub(crate) graphic: Option<Graphic>,
    pub(crate) value: Option<Value>,
    /// `Some("")` records the value under the element's own name.
    pub(crate) show_value: Option<String>,
    /// Values the bare clauses of a `Set` recorded under `ShowValue`.
    pub(crate) recorded: Vec<ShowValue>,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) line: usize,
    pub(crate) span: Span,
}

impl Element {
    pub(crate) fn new(
        tag: impl Into<String>,
        graphic: Option<Graphic>,
        parent: Option<ElementId>,
        line: usize,
        span: Span,
    ) -> Self {
        Self {
            tag: tag.into(),
            name: None,
            top: None,
            left: None,
            graphic,
            value: None,
            show_value: None,
            recorded: Vec::new(),
            parent,
            children: Vec::new(),
            line,
            span,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn graphic(&self) -> Option<&Graphic> {
        self.graphic.as_ref()
    }

    pub(crate) fn kind(&self) -> Option<&GraphicKind> {
        self.graphic.as_ref().map(|g| &g.kind)
    }

    /// Width of the graphic, 0 for plain containers.
    pub fn width(&self) -> i32 {
        self.graphic.as_ref().map_or(0, |g| g.width)
    }

    pub fn height(&self) -> i32 {
        self.graphic.as_ref().map_or(0, |g| g.height)
    }

    /// Returns the value record `ShowValue` asks for, keyed by the
    /// `ShowValue` name or, when that is empty, by `Name`.
    pub(crate) fn show_record(&self) -> Option<Result<ShowValue, ErrorKind>> {
        let show = self.show_value.as_ref()?;
        let name = if show.is_empty() {
            self.name.clone().unwrap_or_default()
        } else {
            show.clone()
        };
        Some(match self.value.as_ref().and_then(Value::to_data) {
            Some(data) => Ok(ShowValue::new(name, data)),
            None => Err(ErrorKind::ShowValueWithoutValue(name)),
        })
    }
}

/// Owns every element built during one compile.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Element>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stores `element` without attaching it to its parent's children.
    pub(crate) fn alloc(&mut self, element: Element) -> ElementId {
        self.nodes.push(element);
        ElementId(self.nodes.len() - 1)
    }

    /// Iterates every element id in allocation order, attached or not.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> {
        (0..self.nodes.len()).map(ElementId)
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    pub(crate) fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub(crate) fn clear_children(&mut self, id: ElementId) {
        self.nodes[id.0].children.clear();
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes[id.0].parent
    }

    /// Returns every element below `id` in pre-order, excluding `id`.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Finds the descendants of `scope` named `name`, in pre-order.
    pub fn find_named(
        &self,
        scope: ElementId,
        name: &str,
        policy: SetTargetPolicy,
    ) -> Vec<ElementId> {
        let mut matches = self
            .descendants(scope)
            .into_iter()
            .filter(|id| self.get(*id).name() == Some(name));
        match policy {
            SetTargetPolicy::AllMatches => matches.collect(),
            SetTargetPolicy::FirstMatch => matches.next().into_iter().collect(),
        }
    }

    /// Makes `dst` a deep copy of `src`.
    ///
    /// `dst` keeps its tag and parent. Its previous children are detached
    /// and replaced by fresh copies of `src`'s children.
    pub(crate) fn clone_into(&mut self, src: ElementId, dst: ElementId) {
        let source = self.get(src).clone();
        {
            let target = self.get_mut(dst);
            target.name = source.name;
            target.top = source.top;
            target.left = source.left;
            target.graphic = source.graphic;
            target.value = source.value;
            target.show_value = source.show_value;
            target.recorded = source.recorded;
            target.line = source.line;
            target.span = source.span;
            target.children.clear();
        }

        for child in source.children {
            let template = self.get(child);
            let copy = Element::new(
                template.tag.clone(),
                None,
                Some(dst),
                template.line,
                template.span,
            );
            let copy = self.alloc(copy);
            self.clone_into(child, copy);
            self.append_child(dst, copy);
        }
    }
}
