//! CLI logic for the screenc screen compiler.
//!
//! Compiles one screen document and writes the binary screen file, its C
//! header and optionally a PNG preview of every screen.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};

use screenc::{Compilation, ScreenBuilder, ScreenError};

/// Returns `explicit`, or the input path with `extension`.
fn output_path(explicit: Option<&String>, input: &Path, extension: &str) -> PathBuf {
    explicit
        .map(PathBuf::from)
        .unwrap_or_else(|| input.with_extension(extension))
}

fn write_previews(compilation: &Compilation, dir: &Path) -> Result<(), ScreenError> {
    fs::create_dir_all(dir)?;
    for image in compilation.images() {
        let path = dir.join(format!("{}.png", image.name()));
        let buffer = image::RgbaImage::from_raw(image.width(), image.height(), image.preview())
            .ok_or_else(|| {
                io::Error::other(format!("preview of '{}' has the wrong size", image.name()))
            })?;
        buffer
            .save(&path)
            .map_err(|err| io::Error::other(format!("{}: {err}", path.display())))?;
        debug!(path = path.display().to_string(); "Preview written");
    }
    Ok(())
}

/// Run the screenc CLI application
///
/// Compiles the input document and writes the header and binary next to it
/// unless other paths are given.
///
/// # Errors
///
/// Returns `ScreenError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Document loading errors
/// - Compile errors
pub fn run(args: &Args) -> Result<(), ScreenError> {
    let input = Path::new(&args.input);
    let header_path = output_path(args.header.as_ref(), input, "h");
    let binary_path = output_path(args.binary.as_ref(), input, "bin");
    info!(
        input_path = args.input,
        header_path = header_path.display().to_string(),
        binary_path = binary_path.display().to_string();
        "Processing screens"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let builder = ScreenBuilder::new(app_config);
    let compilation = builder.compile_path(input)?;
    let export = builder.export(&compilation)?;

    fs::write(&header_path, &export.header)?;
    fs::write(&binary_path, &export.binary)?;
    info!(
        screens = compilation.images().len(),
        bytes = export.binary.len();
        "Screens exported successfully"
    );

    if let Some(dir) = &args.preview_dir {
        write_previews(&compilation, Path::new(dir))?;
        info!(preview_dir = dir; "Previews written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_paths() {
        let input = Path::new("screens/main.xml");
        assert_eq!(
            output_path(None, input, "h"),
            PathBuf::from("screens/main.h")
        );
        let explicit = "out/screen.bin".to_string();
        assert_eq!(
            output_path(Some(&explicit), input, "bin"),
            PathBuf::from("out/screen.bin")
        );
    }
}
