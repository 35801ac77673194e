//! The element tree a document is built into.
//!
//! Every [`Element`] carries at most one [`Graphic`], the behavior selected
//! by its tag. Elements live in a [`Tree`] arena and refer to each other by
//! [`ElementId`].

mod attributes;
mod graphic;
mod tree;

pub(crate) use attributes::{AttrScope, parse_multiple};
pub use graphic::{
    CanvasLayout, ColorDecl, Declaration, Graphic, GraphicKind, GridLayout, HotSpotArea,
    ImageContent, LineShape, SetTarget, Shape, Spots, TextRun,
};
pub use tree::{Element, ElementId, Tree};
