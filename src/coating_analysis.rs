// src/coating_analysis.rs - Coating thickness/color from edge density and
// brightness statistics over the central crop

use std::fmt;

use image::GrayImage;
use imageproc::edges::canny;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::image_utils::{central_crop_region, crop_gray, intensity_std_dev, mean_intensity};

/// Coating thickness classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoatingThickness {
    Thick,
    Thin,
    ThinWhite,
}

impl CoatingThickness {
    pub fn label(&self) -> &'static str {
        match self {
            CoatingThickness::Thick => "thick",
            CoatingThickness::Thin => "thin",
            CoatingThickness::ThinWhite => "thin-white",
        }
    }
}

impl fmt::Display for CoatingThickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coating color classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoatingColor {
    White,
    PaleYellow,
    Yellow,
}

impl CoatingColor {
    pub fn label(&self) -> &'static str {
        match self {
            CoatingColor::White => "white",
            CoatingColor::PaleYellow => "pale-yellow",
            CoatingColor::Yellow => "yellow",
        }
    }
}

impl fmt::Display for CoatingColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification result for the tongue coating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoatingFeature {
    pub thickness: CoatingThickness,
    pub color: CoatingColor,
    pub edge_density: f64,
    pub texture_variance: f64,
    pub description: String,
}

/// One arm of the thickness decision list
struct ThicknessRule {
    class: CoatingThickness,
    matches: fn(f64, f64, &Config) -> bool,
}

/// Ordered decision list over (edge density, intensity std-dev); first match
/// wins, with the intermediate thin-white coating as the terminal arm.
const THICKNESS_DECISION_LIST: &[ThicknessRule] = &[
    ThicknessRule {
        class: CoatingThickness::Thick,
        matches: |density, std_dev, config| {
            density > config.coating_edge_density_thick || std_dev > config.coating_std_dev_thick
        },
    },
    ThicknessRule {
        class: CoatingThickness::Thin,
        matches: |density, std_dev, config| {
            density < config.coating_edge_density_thin && std_dev < config.coating_std_dev_thin
        },
    },
    ThicknessRule {
        class: CoatingThickness::ThinWhite,
        matches: |_density, _std_dev, _config| true,
    },
];

/// One arm of the coating color decision list
struct CoatingColorRule {
    class: CoatingColor,
    matches: fn(f64, &Config) -> bool,
}

/// Ordered decision list over mean crop brightness; darker coatings read as
/// more yellow.
const COATING_COLOR_DECISION_LIST: &[CoatingColorRule] = &[
    CoatingColorRule {
        class: CoatingColor::White,
        matches: |brightness, config| brightness > config.coating_white_brightness,
    },
    CoatingColorRule {
        class: CoatingColor::PaleYellow,
        matches: |brightness, config| brightness > config.coating_pale_yellow_brightness,
    },
    CoatingColorRule {
        class: CoatingColor::Yellow,
        matches: |_brightness, _config| true,
    },
];

/// Classify coating thickness from edge density and intensity std-dev
pub fn classify_coating_thickness(
    edge_density: f64,
    std_dev: f64,
    config: &Config,
) -> CoatingThickness {
    THICKNESS_DECISION_LIST
        .iter()
        .find(|rule| (rule.matches)(edge_density, std_dev, config))
        .map(|rule| rule.class)
        .unwrap_or(CoatingThickness::ThinWhite)
}

/// Classify coating color from mean crop brightness
pub fn classify_coating_color(brightness: f64, config: &Config) -> CoatingColor {
    COATING_COLOR_DECISION_LIST
        .iter()
        .find(|rule| (rule.matches)(brightness, config))
        .map(|rule| rule.class)
        .unwrap_or(CoatingColor::Yellow)
}

/// Fraction of edge pixels in an edge map. 0.0 for an empty map.
pub fn edge_pixel_density(edges: &GrayImage) -> f64 {
    let total = (edges.width() * edges.height()) as f64;
    if total == 0.0 {
        return 0.0;
    }

    let edge_count = edges.pixels().filter(|p| p.0[0] > 0).count();
    edge_count as f64 / total
}

/// Analyze the tongue coating over the central crop of the intensity image.
///
/// Total over any decoded image; a crop too small for gradient estimation
/// contributes zero edge density and classifies through the defaults.
pub fn analyze_coating(gray: &GrayImage, config: &Config) -> CoatingFeature {
    let region = central_crop_region(gray.width(), gray.height());
    let center = crop_gray(gray, &region);

    let edge_density = if center.width() >= 3 && center.height() >= 3 {
        let edges = canny(
            &center,
            config.canny_low_threshold,
            config.canny_high_threshold,
        );
        edge_pixel_density(&edges)
    } else {
        0.0
    };

    let std_dev = intensity_std_dev(&center);
    let brightness = mean_intensity(&center);

    let thickness = classify_coating_thickness(edge_density, std_dev, config);
    let color = classify_coating_color(brightness, config);

    CoatingFeature {
        thickness,
        color,
        edge_density,
        texture_variance: std_dev,
        description: format!("{}, {}", color.label(), thickness.label()),
    }
}
