// src/config.rs - Runtime configuration with all classification thresholds

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{Result, TongueScanError};

/// Configuration for TongueScanR.
///
/// The classification cut points are empirically chosen constants carried
/// over from the clinical rule set. They are exposed here so deployments can
/// tune them, but the defaults are the reference behavior.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_input_path")]
    pub input_path: String,

    #[serde(default = "default_output_base_dir")]
    pub output_base_dir: String,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,

    // Edge detection thresholds (8-bit intensity scale), shared by the
    // coating and shape analyzers
    #[serde(default = "default_canny_low_threshold")]
    pub canny_low_threshold: f32,

    #[serde(default = "default_canny_high_threshold")]
    pub canny_high_threshold: f32,

    // Coating thickness cut points
    #[serde(default = "default_coating_edge_density_thick")]
    pub coating_edge_density_thick: f64,

    #[serde(default = "default_coating_edge_density_thin")]
    pub coating_edge_density_thin: f64,

    #[serde(default = "default_coating_std_dev_thick")]
    pub coating_std_dev_thick: f64,

    #[serde(default = "default_coating_std_dev_thin")]
    pub coating_std_dev_thin: f64,

    // Coating color cut points on mean crop brightness
    #[serde(default = "default_coating_white_brightness")]
    pub coating_white_brightness: f64,

    #[serde(default = "default_coating_pale_yellow_brightness")]
    pub coating_pale_yellow_brightness: f64,

    // Shape circularity cut points
    #[serde(default = "default_circularity_round_threshold")]
    pub circularity_round_threshold: f64,

    #[serde(default = "default_circularity_elongated_threshold")]
    pub circularity_elongated_threshold: f64,

    // Surface texture complexity cut points (Laplacian response variance)
    #[serde(default = "default_texture_pronounced_threshold")]
    pub texture_pronounced_threshold: f64,

    #[serde(default = "default_texture_mild_threshold")]
    pub texture_mild_threshold: f64,
}

fn default_input_path() -> String {
    "./input".to_string()
}

fn default_output_base_dir() -> String {
    "./output".to_string()
}

fn default_parallel() -> bool {
    true
}

fn default_canny_low_threshold() -> f32 {
    50.0
}

fn default_canny_high_threshold() -> f32 {
    150.0
}

fn default_coating_edge_density_thick() -> f64 {
    0.15
}

fn default_coating_edge_density_thin() -> f64 {
    0.05
}

fn default_coating_std_dev_thick() -> f64 {
    40.0
}

fn default_coating_std_dev_thin() -> f64 {
    20.0
}

fn default_coating_white_brightness() -> f64 {
    150.0
}

fn default_coating_pale_yellow_brightness() -> f64 {
    100.0
}

fn default_circularity_round_threshold() -> f64 {
    0.8
}

fn default_circularity_elongated_threshold() -> f64 {
    0.6
}

fn default_texture_pronounced_threshold() -> f64 {
    200.0
}

fn default_texture_mild_threshold() -> f64 {
    100.0
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TongueScanError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            TongueScanError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(config)
    }

    /// Create default configuration
    pub fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_base_dir: default_output_base_dir(),
            use_parallel: true,
            canny_low_threshold: 50.0,
            canny_high_threshold: 150.0,
            coating_edge_density_thick: 0.15,
            coating_edge_density_thin: 0.05,
            coating_std_dev_thick: 40.0,
            coating_std_dev_thin: 20.0,
            coating_white_brightness: 150.0,
            coating_pale_yellow_brightness: 100.0,
            circularity_round_threshold: 0.8,
            circularity_elongated_threshold: 0.6,
            texture_pronounced_threshold: 200.0,
            texture_mild_threshold: 100.0,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Check input path exists
        let input_path = PathBuf::from(&self.input_path);
        if !input_path.exists() {
            return Err(TongueScanError::InvalidPath(input_path));
        }

        if self.canny_low_threshold <= 0.0 {
            return Err(TongueScanError::Config(
                "canny_low_threshold must be > 0.0".to_string(),
            ));
        }

        if self.canny_high_threshold < self.canny_low_threshold {
            return Err(TongueScanError::Config(
                "canny_high_threshold must be >= canny_low_threshold".to_string(),
            ));
        }

        if self.coating_edge_density_thick <= 0.0 || self.coating_edge_density_thick > 1.0 {
            return Err(TongueScanError::Config(
                "coating_edge_density_thick must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.coating_edge_density_thin <= 0.0
            || self.coating_edge_density_thin >= self.coating_edge_density_thick
        {
            return Err(TongueScanError::Config(
                "coating_edge_density_thin must be > 0.0 and < coating_edge_density_thick"
                    .to_string(),
            ));
        }

        if self.coating_std_dev_thin <= 0.0 || self.coating_std_dev_thin >= self.coating_std_dev_thick
        {
            return Err(TongueScanError::Config(
                "coating_std_dev_thin must be > 0.0 and < coating_std_dev_thick".to_string(),
            ));
        }

        if self.coating_pale_yellow_brightness <= 0.0
            || self.coating_pale_yellow_brightness >= self.coating_white_brightness
        {
            return Err(TongueScanError::Config(
                "coating_pale_yellow_brightness must be > 0.0 and < coating_white_brightness"
                    .to_string(),
            ));
        }

        if self.circularity_elongated_threshold <= 0.0
            || self.circularity_elongated_threshold >= self.circularity_round_threshold
        {
            return Err(TongueScanError::Config(
                "circularity_elongated_threshold must be > 0.0 and < circularity_round_threshold"
                    .to_string(),
            ));
        }

        if self.texture_mild_threshold <= 0.0
            || self.texture_mild_threshold >= self.texture_pronounced_threshold
        {
            return Err(TongueScanError::Config(
                "texture_mild_threshold must be > 0.0 and < texture_pronounced_threshold"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TongueScanError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn empty_toml_yields_reference_defaults() {
        let config: Config = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.canny_low_threshold, 50.0);
        assert_eq!(config.canny_high_threshold, 150.0);
        assert_eq!(config.coating_white_brightness, 150.0);
        assert_eq!(config.coating_pale_yellow_brightness, 100.0);
        assert_eq!(config.texture_pronounced_threshold, 200.0);
        assert_eq!(config.texture_mild_threshold, 100.0);
        assert_eq!(config.circularity_round_threshold, 0.8);
        assert_eq!(config.circularity_elongated_threshold, 0.6);
        assert!(config.use_parallel);
    }

    #[test]
    fn partial_toml_overrides_single_field() {
        let config: Config =
            toml::from_str("canny_low_threshold = 30.0").expect("partial config should parse");
        assert_eq!(config.canny_low_threshold, 30.0);
        assert_eq!(config.canny_high_threshold, 150.0);
    }

    #[test]
    fn validate_rejects_inverted_canny_thresholds() {
        let mut config = Config::default();
        config.input_path = ".".to_string();
        config.canny_low_threshold = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_texture_thresholds() {
        let mut config = Config::default();
        config.input_path = ".".to_string();
        config.texture_mild_threshold = 300.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_defaults_with_existing_input() {
        let mut config = Config::default();
        config.input_path = ".".to_string();
        assert!(config.validate().is_ok());
    }
}
