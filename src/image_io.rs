use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::errors::{Result, TongueScanError};

/// Raster extensions accepted for batch input
const SUPPORTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// Represents a decoded input image with its metadata
pub struct InputImage {
    pub image: RgbImage,
    pub path: PathBuf,
    pub filename: String,
}

/// Get all supported image files from a directory (recursively)
pub fn get_image_files_in_dir<P: AsRef<Path>>(dir_path: P) -> Result<Vec<PathBuf>> {
    let dir_path = dir_path.as_ref();

    if !dir_path.exists() {
        return Err(TongueScanError::InvalidPath(dir_path.to_path_buf()));
    }

    if !dir_path.is_dir() {
        return Err(TongueScanError::Config(format!(
            "{} is not a directory",
            dir_path.display()
        )));
    }

    let mut image_files = Vec::new();
    find_image_files_recursive(dir_path, &mut image_files)?;

    Ok(image_files)
}

/// Helper function to recursively search for supported image files
fn find_image_files_recursive(dir_path: &Path, result: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir_path)?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            // Recursively search subdirectories
            find_image_files_recursive(&path, result)?;
        } else if path.is_file() {
            if let Some(ext) = path.extension() {
                let ext = ext.to_ascii_lowercase();
                if SUPPORTED_EXTENSIONS.iter().any(|s| ext == *s) {
                    result.push(path);
                }
            }
        }
    }

    Ok(())
}

/// Load an image from disk ensuring RGB format.
///
/// Fails with the decode error variant when the file cannot be parsed as a
/// supported raster image.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<InputImage> {
    let path = path.as_ref();

    // Get filename without extension
    let filename = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| TongueScanError::InvalidPath(path.to_path_buf()))?
        .to_string();

    let img = image::open(path).map_err(TongueScanError::Decode)?;

    // Convert to RGB
    let rgb_img = img.to_rgb8();

    Ok(InputImage {
        image: rgb_img,
        path: path.to_path_buf(),
        filename,
    })
}

/// Decode an image from a raw encoded byte buffer (e.g. an upload).
///
/// A corrupt, empty, or unrecognized buffer yields the decode error variant;
/// no partial result is produced.
pub fn load_image_from_bytes(bytes: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(bytes).map_err(TongueScanError::Decode)?;
    Ok(img.to_rgb8())
}
