//! The binary screen file: every packed image back to back.

use screenc_core::artifact::NamedBitmap;

/// Concatenates the packed pixel buffers of `images` in order.
pub(crate) fn write_binary(images: &[NamedBitmap]) -> Vec<u8> {
    let total = images.iter().map(NamedBitmap::byte_size).sum();
    let mut out = Vec::with_capacity(total);
    for image in images {
        out.extend_from_slice(image.packed());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use screenc_core::{artifact::DrawResults, color::Color, depth::ColorDepth};

    fn filled(name: &str, color: Color, depth: ColorDepth) -> NamedBitmap {
        let mut results = DrawResults::new(2, 1);
        results.surface.blend(0, 0, color);
        results.surface.blend(1, 0, color);
        NamedBitmap::new(name, results, 2, depth, None)
    }

    #[test]
    fn test_images_are_concatenated_in_order() {
        let images = [
            filled("a", Color::rgb(0xFF, 0, 0), ColorDepth::Color8bpp),
            filled("b", Color::rgb(0, 0, 0xFF), ColorDepth::Color24bpp),
        ];
        let binary = write_binary(&images);
        assert_eq!(
            binary,
            vec![0xE0, 0xE0, 0x00, 0x00, 0xFF, 0x00, 0x00, 0xFF]
        );
    }

    #[test]
    fn test_no_images_is_empty() {
        assert!(write_binary(&[]).is_empty());
    }
}
