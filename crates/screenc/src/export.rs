//! Turns compiled images into the files firmware consumes.

mod binary;
mod header;

use indexmap::IndexMap;
use log::{debug, info};

use screenc_core::{
    artifact::{NamedBitmap, ShowValue},
    color::Color,
};

use crate::{config::NameStyle, error::ScreenError};

/// The exported screen file and the header describing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// C header text of guarded macros.
    pub header: String,
    /// Packed images, concatenated in production order.
    pub binary: Vec<u8>,
}

pub(crate) fn export(
    images: &[NamedBitmap],
    colors: &IndexMap<String, Color>,
    values: &[ShowValue],
    style: NameStyle,
) -> Result<Export, ScreenError> {
    info!(images = images.len(), colors = colors.len(), values = values.len(); "Exporting screens");

    let binary = binary::write_binary(images);
    debug!(bytes = binary.len(); "Binary written");

    let header = header::write_header(images, colors, values, style)?;
    debug!(bytes = header.len(); "Header written");

    Ok(Export { header, binary })
}
