//! screenc Core Types and Definitions
//!
//! This crate provides the foundational types shared by the screenc parser,
//! compiler and CLI. It includes:
//!
//! - **Geometry**: Integer pixel geometry ([`geometry`] module)
//! - **Colors**: Opaque and translucent RGBA colors with CSS parsing ([`color::Color`])
//! - **Color depth**: Packed pixel formats and the quantizer ([`depth`] module)
//! - **Draw**: The raster surface, [`draw::Rasterizer`] and [`draw::TextMeasurer`]
//!   capabilities and the default software backend ([`draw`] module)
//! - **Artifacts**: Finished images and their metadata records ([`artifact`] module)

pub mod artifact;
pub mod color;
pub mod depth;
pub mod draw;
pub mod geometry;
