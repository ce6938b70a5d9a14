// src/pipeline.rs - Decode, dispatch the four analyzers, aggregate

use std::path::Path;

use image::RgbImage;

use crate::coating_analysis::analyze_coating;
use crate::color_analysis::analyze_tongue_color;
use crate::config::Config;
use crate::errors::Result;
use crate::feature_extraction::{aggregate_features, FeatureRecord};
use crate::image_io::{load_image, load_image_from_bytes, InputImage};
use crate::image_utils::rgb_to_gray;
use crate::output::{append_summary_csv, write_feature_json};
use crate::shape_analysis::analyze_shape;
use crate::texture_analysis::analyze_texture;

/// Run the four analyzers over a decoded image and aggregate their results.
///
/// Total over any successfully decoded image. The analyzers are pure
/// functions of the shared read-only buffers and have no data dependency on
/// each other, so they are dispatched concurrently; aggregation is the join
/// point.
pub fn extract_features(image: &RgbImage, config: &Config) -> FeatureRecord {
    let gray = rgb_to_gray(image);

    let ((tongue_color, coating), (shape, texture)) = rayon::join(
        || {
            rayon::join(
                || analyze_tongue_color(image),
                || analyze_coating(&gray, config),
            )
        },
        || {
            rayon::join(
                || analyze_shape(&gray, config),
                || analyze_texture(&gray, config),
            )
        },
    );

    aggregate_features(tongue_color, coating, shape, texture)
}

/// Extract features from an image file on disk
pub fn extract_features_from_path<P: AsRef<Path>>(
    path: P,
    config: &Config,
) -> Result<FeatureRecord> {
    let input = load_image(path)?;
    Ok(extract_features(&input.image, config))
}

/// Extract features from a raw encoded byte buffer (e.g. an upload)
pub fn extract_features_from_bytes(bytes: &[u8], config: &Config) -> Result<FeatureRecord> {
    let image = load_image_from_bytes(bytes)?;
    Ok(extract_features(&image, config))
}

/// Process a single input image: extract features and write the JSON record
/// and summary CSV row into the output directory.
pub fn process_image(input_image: InputImage, config: &Config, debug: bool) -> Result<FeatureRecord> {
    let InputImage {
        image,
        path: _,
        filename,
    } = input_image;

    let record = extract_features(&image, config);

    if debug {
        println!("Analyzer metrics for {}:", filename);
        println!(
            "  Color means: hue {:.2}, saturation {:.2}, brightness {:.2} -> {}",
            record.tongue_color.hue,
            record.tongue_color.saturation,
            record.tongue_color.brightness,
            record.tongue_color.class
        );
        println!(
            "  Coating: edge density {:.4}, intensity std-dev {:.2} -> {}, {}",
            record.coating.edge_density,
            record.coating.texture_variance,
            record.coating.color,
            record.coating.thickness
        );
        println!(
            "  Shape: circularity {:.4}, area {:.1} -> {}",
            record.shape.circularity, record.shape.area, record.shape.class
        );
        println!(
            "  Texture: complexity {:.2}, tooth-marks {}",
            record.texture.complexity, record.texture.has_teeth_marks
        );
    }

    write_feature_json(&record, &config.output_base_dir, &filename)?;
    append_summary_csv(&record, &config.output_base_dir, &filename)?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::extract_features;
    use crate::coating_analysis::CoatingThickness;
    use crate::color_analysis::TongueColorClass;
    use crate::config::Config;
    use crate::shape_analysis::TongueShapeClass;
    use image::{Rgb, RgbImage};

    #[test]
    fn flat_image_yields_all_default_branches() {
        let config = Config::default();
        let image = RgbImage::from_pixel(64, 64, Rgb([200, 169, 169]));

        let record = extract_features(&image, &config);

        assert_eq!(record.tongue_color.class, TongueColorClass::PaleWhite);
        assert_eq!(record.coating.thickness, CoatingThickness::Thin);
        assert_eq!(record.shape.class, TongueShapeClass::Normal);
        assert!(!record.texture.has_teeth_marks);
        assert_eq!(record.summary.split("; ").count(), 4);
    }

    #[test]
    fn extraction_is_idempotent() {
        let config = Config::default();
        let image = RgbImage::from_pixel(48, 48, Rgb([150, 80, 90]));

        let first = extract_features(&image, &config);
        let second = extract_features(&image, &config);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
