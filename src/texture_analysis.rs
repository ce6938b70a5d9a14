// src/texture_analysis.rs - Surface irregularity from Laplacian response
// variance over the whole frame

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Classification result for the tongue surface texture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureFeature {
    pub complexity: f64,
    pub has_teeth_marks: bool,
    pub features: Vec<String>,
    pub description: String,
}

/// Variance of the 3x3 Laplacian response over interior pixels.
///
/// Kernel [0,1,0; 1,-4,1; 0,1,0], the second-derivative complexity measure.
/// Returns 0.0 when the image is too small for the kernel.
pub fn laplacian_variance(image: &GrayImage) -> f64 {
    let (width, height) = (image.width() as i64, image.height() as i64);
    if width < 3 || height < 3 {
        return 0.0;
    }

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0u64;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = image.get_pixel(x as u32, y as u32).0[0] as f64;
            let top = image.get_pixel(x as u32, (y - 1) as u32).0[0] as f64;
            let bottom = image.get_pixel(x as u32, (y + 1) as u32).0[0] as f64;
            let left = image.get_pixel((x - 1) as u32, y as u32).0[0] as f64;
            let right = image.get_pixel((x + 1) as u32, y as u32).0[0] as f64;

            let response = top + bottom + left + right - 4.0 * center;
            sum += response;
            sum_sq += response * response;
            count += 1;
        }
    }

    if count == 0 {
        return 0.0;
    }

    let n = count as f64;
    let mean = sum / n;
    let variance = (sum_sq / n) - (mean * mean);
    variance.max(0.0)
}

/// Qualitative tags and tooth-mark flag for a complexity score
pub fn classify_texture(complexity: f64, config: &Config) -> (Vec<&'static str>, bool) {
    if complexity > config.texture_pronounced_threshold {
        (vec!["pronounced texture", "possible tooth-marks or cracks"], true)
    } else if complexity > config.texture_mild_threshold {
        (vec!["mild texture"], false)
    } else {
        (vec!["smooth surface"], false)
    }
}

/// Analyze the surface texture of the full intensity image.
///
/// Total over any decoded image; a uniform frame scores zero complexity and
/// reads as a smooth surface.
pub fn analyze_texture(gray: &GrayImage, config: &Config) -> TextureFeature {
    let complexity = laplacian_variance(gray);
    let (tags, has_teeth_marks) = classify_texture(complexity, config);

    let features: Vec<String> = tags.iter().map(|tag| tag.to_string()).collect();
    let description = features.join(", ");

    TextureFeature {
        complexity,
        has_teeth_marks,
        features,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use image::Luma;

    fn checkerboard(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn flat_image_has_zero_complexity() {
        let config = Config::default();
        let gray = GrayImage::from_pixel(32, 32, Luma([128]));
        let feature = analyze_texture(&gray, &config);

        assert_approx_eq!(feature.complexity, 0.0);
        assert!(!feature.has_teeth_marks);
        assert_eq!(feature.features, vec!["smooth surface".to_string()]);
        assert_eq!(feature.description, "smooth surface");
    }

    #[test]
    fn checkerboard_reads_as_pronounced_texture() {
        let config = Config::default();
        let feature = analyze_texture(&checkerboard(32, 32), &config);

        assert!(feature.complexity > config.texture_pronounced_threshold);
        assert!(feature.has_teeth_marks);
        assert_eq!(
            feature.features,
            vec![
                "pronounced texture".to_string(),
                "possible tooth-marks or cracks".to_string()
            ]
        );
        assert_eq!(feature.description, "pronounced texture, possible tooth-marks or cracks");
    }

    #[test]
    fn classification_cut_points() {
        let config = Config::default();

        let (tags, flag) = classify_texture(250.0, &config);
        assert_eq!(tags, vec!["pronounced texture", "possible tooth-marks or cracks"]);
        assert!(flag);

        let (tags, flag) = classify_texture(150.0, &config);
        assert_eq!(tags, vec!["mild texture"]);
        assert!(!flag);

        let (tags, flag) = classify_texture(50.0, &config);
        assert_eq!(tags, vec!["smooth surface"]);
        assert!(!flag);

        // The cut points themselves fall to the calmer band
        let (tags, _) = classify_texture(200.0, &config);
        assert_eq!(tags, vec!["mild texture"]);
        let (tags, _) = classify_texture(100.0, &config);
        assert_eq!(tags, vec!["smooth surface"]);
    }

    #[test]
    fn tiny_image_scores_zero() {
        assert_approx_eq!(laplacian_variance(&GrayImage::from_pixel(2, 2, Luma([77]))), 0.0);
    }
}
