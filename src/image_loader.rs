//! Loading photographs into BGR matrices
//!
//! Decoding goes through the `image` crate so that the analyzer only needs
//! OpenCV for processing. Every decoded image is converted to 8-bit BGR,
//! which is what [`Analyzer`](crate::Analyzer) expects.
//!
//! ## Supported Formats
//!
//! JPEG, PNG, GIF (first frame), WebP, TIFF, BMP, ICO, TGA, OpenEXR, PNM,
//! QOI, DDS and Radiance HDR.

use std::path::Path;

use image::{DynamicImage, ImageReader};
use opencv::{
    core::{Mat, Vec3b},
    prelude::*,
};

use crate::error::{AnalysisError, Result};

/// Load an image file as an 8-bit BGR matrix
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if the extension is unknown, the
/// file cannot be opened or decoding fails.
///
/// # Example
///
/// ```rust,no_run
/// use banana_scan::image_loader::load_image;
/// use opencv::prelude::*;
/// use std::path::Path;
///
/// let mat = load_image(Path::new("bananas.jpg"))?;
/// println!("Loaded image: {}x{}", mat.cols(), mat.rows());
/// # Ok::<(), banana_scan::AnalysisError>(())
/// ```
pub fn load_image(path: &Path) -> Result<Mat> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(is_supported_extension);
    if !supported {
        return Err(AnalysisError::ImageLoadError {
            message: format!("Unknown image format for file: {}", path.display()),
            source: None,
        });
    }

    let reader = ImageReader::open(path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;
    let decoded = reader.decode().map_err(|e| {
        AnalysisError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    dynamic_to_bgr_mat(decoded)
}

/// Decode an in-memory encoded image (format guessed from its content)
pub fn load_image_from_memory(bytes: &[u8]) -> Result<Mat> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AnalysisError::image_load("Failed to decode image from memory", e))?;
    dynamic_to_bgr_mat(decoded)
}

fn dynamic_to_bgr_mat(decoded: DynamicImage) -> Result<Mat> {
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    rgb_to_bgr_mat(rgb.as_raw(), width as i32, height as i32)
}

/// Convert a packed RGB byte buffer to an owned OpenCV BGR matrix
fn rgb_to_bgr_mat(rgb_data: &[u8], width: i32, height: i32) -> Result<Mat> {
    let expected = width as usize * height as usize * 3;
    if width <= 0 || height <= 0 || rgb_data.len() != expected {
        return Err(AnalysisError::invalid_image(format!(
            "{}x{} RGB image needs {} bytes, got {}",
            width,
            height,
            expected,
            rgb_data.len()
        )));
    }

    let pixels: Vec<Vec3b> = rgb_data
        .chunks_exact(3)
        .map(|rgb| Vec3b::from([rgb[2], rgb[1], rgb[0]]))
        .collect();

    Mat::new_rows_cols_with_data(height, width, &pixels)
        .and_then(|borrowed| borrowed.try_clone())
        .map_err(|e| AnalysisError::opencv("BGR matrix creation", e))
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp", "ico", "tga", "exr", "pbm",
        "pgm", "ppm", "pnm", "qoi", "dds", "hdr",
    ]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
