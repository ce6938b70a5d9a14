// src/feature_extraction.rs - The externally visible feature record and its
// aggregation

use serde::{Deserialize, Serialize};

use crate::coating_analysis::CoatingFeature;
use crate::color_analysis::ColorFeature;
use crate::shape_analysis::ShapeFeature;
use crate::texture_analysis::TextureFeature;

/// Delimiter between the four summary fragments
pub const SUMMARY_DELIMITER: &str = "; ";

/// Aggregate of the four analyzer outputs plus a generated one-line summary.
///
/// This is the sole externally visible output of the extractor: an immutable
/// value object serializing to the flat JSON mapping the downstream prompt
/// and web layers read field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub tongue_color: ColorFeature,
    pub coating: CoatingFeature,
    pub shape: ShapeFeature,
    pub texture: TextureFeature,
    pub summary: String,
}

/// Merge the four feature objects into one record. No additional
/// computation beyond the summary string.
pub fn aggregate_features(
    tongue_color: ColorFeature,
    coating: CoatingFeature,
    shape: ShapeFeature,
    texture: TextureFeature,
) -> FeatureRecord {
    let summary = generate_summary(&tongue_color, &coating, &shape, &texture);

    FeatureRecord {
        tongue_color,
        coating,
        shape,
        texture,
        summary,
    }
}

/// Build the one-line summary: four labeled fragments in fixed order
/// (body color, coating, shape, surface), joined by the fixed delimiter.
pub fn generate_summary(
    tongue_color: &ColorFeature,
    coating: &CoatingFeature,
    shape: &ShapeFeature,
    texture: &TextureFeature,
) -> String {
    let fragments = [
        format!("body color: {}", tongue_color.class),
        format!("coating: {}", coating.description),
        format!("shape: {}", shape.description),
        format!("surface: {}", texture.description),
    ];

    fragments.join(SUMMARY_DELIMITER)
}
