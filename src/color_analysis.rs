// src/color_analysis.rs - Tongue body color classification from HSV statistics

use std::fmt;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::image_utils::{central_crop_region, mean_hsv_over_region};

/// Tongue body color classes.
///
/// Serialized with the flat labels the downstream prompt layer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TongueColorClass {
    PaleWhite,
    DeepCrimson,
    Red,
    Purple,
    PaleRed,
}

impl TongueColorClass {
    pub fn label(&self) -> &'static str {
        match self {
            TongueColorClass::PaleWhite => "pale-white",
            TongueColorClass::DeepCrimson => "deep-crimson",
            TongueColorClass::Red => "red",
            TongueColorClass::Purple => "purple",
            TongueColorClass::PaleRed => "pale-red",
        }
    }

    /// Fixed textual description keyed by classification
    pub fn description(&self) -> &'static str {
        match self {
            TongueColorClass::PaleWhite => {
                "pale tongue body, possibly indicating qi and blood deficiency"
            }
            TongueColorClass::DeepCrimson => {
                "deep crimson tongue body, suggesting pronounced heat"
            }
            TongueColorClass::Red => "reddish tongue body, possibly indicating a heat pattern",
            TongueColorClass::Purple => {
                "bluish purple tongue body, possibly indicating blood stasis"
            }
            TongueColorClass::PaleRed => "pale red and moist tongue body, a healthy presentation",
        }
    }
}

impl fmt::Display for TongueColorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification result for the tongue body color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorFeature {
    #[serde(rename = "type")]
    pub class: TongueColorClass,
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
    pub description: String,
}

/// One arm of the color decision list
struct ColorRule {
    class: TongueColorClass,
    matches: fn(f64, f64, f64) -> bool,
}

/// Ordered decision list over (hue, saturation, brightness) means; the first
/// matching rule wins. Order encodes clinical priority: deep-crimson must be
/// tested before red, which it would otherwise shadow. The terminal arm is
/// the reference-normal classification.
const COLOR_DECISION_LIST: &[ColorRule] = &[
    ColorRule {
        class: TongueColorClass::PaleWhite,
        matches: |_h, s, v| v > 180.0 && s < 60.0,
    },
    ColorRule {
        class: TongueColorClass::DeepCrimson,
        matches: |h, s, v| h < 20.0 && s > 100.0 && v < 150.0,
    },
    ColorRule {
        class: TongueColorClass::Red,
        matches: |h, s, _v| h < 15.0 && s > 70.0,
    },
    ColorRule {
        class: TongueColorClass::Purple,
        matches: |h, _s, _v| (120.0..150.0).contains(&h),
    },
    ColorRule {
        class: TongueColorClass::PaleRed,
        matches: |_h, _s, _v| true,
    },
];

/// Classify the tongue body color from HSV channel means
pub fn classify_tongue_color(hue: f64, saturation: f64, brightness: f64) -> TongueColorClass {
    COLOR_DECISION_LIST
        .iter()
        .find(|rule| (rule.matches)(hue, saturation, brightness))
        .map(|rule| rule.class)
        .unwrap_or(TongueColorClass::PaleRed)
}

/// Analyze the tongue body color over the central crop of the image.
///
/// Total over any decoded image; a degenerate crop falls through to the
/// reference-normal classification.
pub fn analyze_tongue_color(image: &RgbImage) -> ColorFeature {
    let region = central_crop_region(image.width(), image.height());
    let (hue, saturation, brightness) = mean_hsv_over_region(image, &region);
    let class = classify_tongue_color(hue, saturation, brightness);

    ColorFeature {
        class,
        hue,
        saturation,
        brightness,
        description: class.description().to_string(),
    }
}
