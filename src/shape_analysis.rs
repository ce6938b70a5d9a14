// src/shape_analysis.rs - Gross tongue body shape from the largest external
// contour of the edge map

use std::f64::consts::PI;
use std::fmt;

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::edges::canny;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Gross tongue body shape classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TongueShapeClass {
    #[serde(rename = "round/plump")]
    RoundPlump,
    #[serde(rename = "elongated/thin")]
    ElongatedThin,
    #[serde(rename = "normal")]
    Normal,
}

impl TongueShapeClass {
    pub fn label(&self) -> &'static str {
        match self {
            TongueShapeClass::RoundPlump => "round/plump",
            TongueShapeClass::ElongatedThin => "elongated/thin",
            TongueShapeClass::Normal => "normal",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TongueShapeClass::RoundPlump => "round and plump tongue body",
            TongueShapeClass::ElongatedThin => "elongated and thin tongue body",
            TongueShapeClass::Normal => "normal size and shape",
        }
    }
}

impl fmt::Display for TongueShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification result for the tongue body shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeFeature {
    #[serde(rename = "type")]
    pub class: TongueShapeClass,
    pub circularity: f64,
    pub area: f64,
    pub description: String,
}

impl ShapeFeature {
    /// Fallback when the edge map yields no contour at all. A valid outcome,
    /// not an error.
    pub fn default_normal() -> Self {
        ShapeFeature {
            class: TongueShapeClass::Normal,
            circularity: 0.0,
            area: 0.0,
            description: TongueShapeClass::Normal.description().to_string(),
        }
    }
}

/// One arm of the shape decision list
struct ShapeRule {
    class: TongueShapeClass,
    matches: fn(f64, &Config) -> bool,
}

/// Ordered decision list over circularity with normal as the terminal arm
const SHAPE_DECISION_LIST: &[ShapeRule] = &[
    ShapeRule {
        class: TongueShapeClass::RoundPlump,
        matches: |circularity, config| circularity > config.circularity_round_threshold,
    },
    ShapeRule {
        class: TongueShapeClass::ElongatedThin,
        matches: |circularity, config| circularity < config.circularity_elongated_threshold,
    },
    ShapeRule {
        class: TongueShapeClass::Normal,
        matches: |_circularity, _config| true,
    },
];

/// Classify the tongue shape from contour circularity
pub fn classify_tongue_shape(circularity: f64, config: &Config) -> TongueShapeClass {
    SHAPE_DECISION_LIST
        .iter()
        .find(|rule| (rule.matches)(circularity, config))
        .map(|rule| rule.class)
        .unwrap_or(TongueShapeClass::Normal)
}

/// Enclosed area of a closed contour (shoelace formula)
pub fn contour_area(points: &[(f64, f64)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let n = points.len();
    let mut twice_area = 0.0;

    for i in 0..n {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % n];
        twice_area += x1 * y2 - x2 * y1;
    }

    twice_area.abs() / 2.0
}

/// Perimeter of a closed contour (wraps around to the first point)
pub fn contour_perimeter(points: &[(f64, f64)]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let n = points.len();
    let mut perimeter = 0.0;

    for i in 0..n {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % n];

        let dx = x2 - x1;
        let dy = y2 - y1;
        perimeter += (dx * dx + dy * dy).sqrt();
    }

    perimeter
}

/// Circularity of the shape (4π * Area / Perimeter²).
/// 1.0 for a perfect circle, < 1.0 for other shapes, 0.0 when the perimeter
/// is degenerate.
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    if perimeter <= 0.0 {
        return 0.0;
    }

    (4.0 * PI * area) / (perimeter * perimeter)
}

/// External contours of the edge map, as floating point point lists
fn external_contours(edges: &GrayImage) -> Vec<Vec<(f64, f64)>> {
    find_contours::<i32>(edges)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .map(|contour| {
            contour
                .points
                .iter()
                .map(|p| (p.x as f64, p.y as f64))
                .collect()
        })
        .collect()
}

/// Analyze the gross tongue shape from the full intensity image (the whole
/// silhouette matters, so no crop here).
///
/// Total over any decoded image: a frame with no detectable contour returns
/// the normal default.
pub fn analyze_shape(gray: &GrayImage, config: &Config) -> ShapeFeature {
    if gray.width() < 3 || gray.height() < 3 {
        return ShapeFeature::default_normal();
    }

    let edges = canny(gray, config.canny_low_threshold, config.canny_high_threshold);
    let contours = external_contours(&edges);

    if contours.is_empty() {
        return ShapeFeature::default_normal();
    }

    // Select the contour of maximum enclosed area (assumed to be the tongue
    // body)
    let mut largest: &Vec<(f64, f64)> = &contours[0];
    let mut largest_area = contour_area(largest);

    for contour in contours.iter().skip(1) {
        let area = contour_area(contour);
        if area > largest_area {
            largest_area = area;
            largest = contour;
        }
    }

    let perimeter = contour_perimeter(largest);
    let circularity = circularity(largest_area, perimeter);
    let class = classify_tongue_shape(circularity, config);

    ShapeFeature {
        class,
        circularity,
        area: largest_area,
        description: class.description().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use image::Luma;
    use imageproc::drawing::draw_filled_circle_mut;

    #[test]
    fn unit_square_area_and_perimeter() {
        let square = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        assert_approx_eq!(contour_area(&square), 1.0);
        assert_approx_eq!(contour_perimeter(&square), 4.0);
    }

    #[test]
    fn degenerate_contours_have_zero_measures() {
        assert_approx_eq!(contour_area(&[(3.0, 4.0)]), 0.0);
        assert_approx_eq!(contour_perimeter(&[(3.0, 4.0)]), 0.0);
        assert_approx_eq!(contour_area(&[]), 0.0);
    }

    #[test]
    fn perfect_circle_has_unit_circularity() {
        let r = 10.0f64;
        assert_approx_eq!(circularity(PI * r * r, 2.0 * PI * r), 1.0);
    }

    #[test]
    fn zero_perimeter_guard() {
        assert_approx_eq!(circularity(100.0, 0.0), 0.0);
    }

    #[test]
    fn shape_decision_list_cut_points() {
        let config = Config::default();
        assert_eq!(classify_tongue_shape(0.9, &config), TongueShapeClass::RoundPlump);
        assert_eq!(classify_tongue_shape(0.7, &config), TongueShapeClass::Normal);
        assert_eq!(classify_tongue_shape(0.3, &config), TongueShapeClass::ElongatedThin);
        // Boundaries belong to the normal band
        assert_eq!(classify_tongue_shape(0.8, &config), TongueShapeClass::Normal);
        assert_eq!(classify_tongue_shape(0.6, &config), TongueShapeClass::Normal);
    }

    #[test]
    fn filled_disk_classifies_round_plump() {
        let config = Config::default();
        let mut gray = GrayImage::new(200, 200);
        draw_filled_circle_mut(&mut gray, (100, 100), 60, Luma([255]));

        let feature = analyze_shape(&gray, &config);

        assert_eq!(feature.class, TongueShapeClass::RoundPlump);
        assert!(
            feature.circularity > 0.8 && feature.circularity < 1.15,
            "disk circularity should be close to 1.0, was {}",
            feature.circularity
        );
        // Shoelace area of the traced boundary should be near the true disk
        // area, within digitization slack
        let expected = PI * 60.0 * 60.0;
        assert!(
            (feature.area - expected).abs() / expected < 0.15,
            "disk area {} too far from expected {}",
            feature.area,
            expected
        );
    }

    #[test]
    fn blank_image_returns_normal_default() {
        let config = Config::default();
        let gray = GrayImage::new(100, 100);

        let feature = analyze_shape(&gray, &config);

        assert_eq!(feature.class, TongueShapeClass::Normal);
        assert_approx_eq!(feature.circularity, 0.0);
        assert_approx_eq!(feature.area, 0.0);
        assert_eq!(feature.description, "normal size and shape");
    }

    #[test]
    fn class_serializes_to_slash_label() {
        let json = serde_json::to_string(&TongueShapeClass::RoundPlump).unwrap();
        assert_eq!(json, "\"round/plump\"");
    }
}
