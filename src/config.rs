//! Star field parameters and their TOML representation
//!
//! A stimulus file looks like:
//!
//! ```toml
//! [field]
//! star_count = 200
//! angular_radius_deg = [0.5, 1.0]
//! shell_radius = 10.0
//! color = ["#ffffff", 0x00ff00]
//! seed = 42
//! primitive = "sphere"
//!
//! [animation]
//! rotate_rate_deg_hz = 36.0
//!
//! [animation.oscillation]
//! rate_hz = 0.5
//! max_angle_deg = 30.0
//! ```
//!
//! Values are not checked against each other; see [`crate::geometry::build_primitives`]
//! for what happens with inconsistent input.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::geometry::{Color, PrimitiveKind};

/// Everything needed to (re)build the set of star primitives,
/// apart from the star positions themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarFieldParams {
    pub star_count: usize,
    /// Angular radius per star in degrees, indexed cyclically
    pub angular_radius_deg: Vec<f64>,
    /// Distance from the viewpoint to the virtual shell
    pub shell_radius: f64,
    /// Star colors, indexed cyclically
    pub color: Vec<Color>,
    /// Opaque value recorded for audit only
    pub seed: Option<u64>,
    pub primitive: PrimitiveKind,
}

impl Default for StarFieldParams {
    fn default() -> Self {
        StarFieldParams {
            star_count: 100,
            angular_radius_deg: vec![0.5],
            shell_radius: 10.0,
            color: vec![Color::WHITE],
            seed: None,
            primitive: PrimitiveKind::Sphere,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillationConfig {
    pub rate_hz: f64,
    pub max_angle_deg: f64,
}

/// Animation applied right after the field is built
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub rotate_rate_deg_hz: Option<f64>,
    pub oscillation: Option<OscillationConfig>,
}

/// Top-level stimulus description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StimulusConfig {
    pub field: StarFieldParams,
    pub animation: AnimationConfig,
}

impl StimulusConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("Failed to parse stimulus config")
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read stimulus config: {}",
                path.as_ref().display()
            )
        })?;
        Self::from_toml_str(&text)
            .with_context(|| format!("in config file {}", path.as_ref().display()))
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize stimulus config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let text = r##"
            [field]
            star_count = 200
            angular_radius_deg = [0.5, 1.0]
            shell_radius = 12.5
            color = ["#ffffff", 0x00ff00]
            seed = 42
            primitive = "disc"

            [animation]
            rotate_rate_deg_hz = 36.0

            [animation.oscillation]
            rate_hz = 0.5
            max_angle_deg = 30.0
        "##;
        let config = StimulusConfig::from_toml_str(text).expect("parsing config");
        assert_eq!(config.field.star_count, 200);
        assert_eq!(config.field.angular_radius_deg, vec![0.5, 1.0]);
        assert_eq!(config.field.shell_radius, 12.5);
        assert_eq!(config.field.color, vec![Color::WHITE, Color::GREEN]);
        assert_eq!(config.field.seed, Some(42));
        assert_eq!(config.field.primitive, PrimitiveKind::Disc);
        assert_eq!(config.animation.rotate_rate_deg_hz, Some(36.0));
        let osc = config.animation.oscillation.unwrap();
        assert_eq!(osc.rate_hz, 0.5);
        assert_eq!(osc.max_angle_deg, 30.0);
    }

    #[test]
    fn test_missing_sections_default() {
        let config = StimulusConfig::from_toml_str("[field]\nstar_count = 3\n").unwrap();
        assert_eq!(config.field.star_count, 3);
        assert_eq!(config.field.shell_radius, 10.0);
        assert_eq!(config.field.color, vec![Color::WHITE]);
        assert_eq!(config.animation, AnimationConfig::default());
    }

    #[test]
    fn test_bad_color_rejected() {
        let err = StimulusConfig::from_toml_str("[field]\ncolor = [\"#12\"]\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = StimulusConfig::default();
        config.field.seed = Some(7);
        config.animation.oscillation = Some(OscillationConfig {
            rate_hz: 1.0,
            max_angle_deg: 15.0,
        });
        let text = config.to_toml_string().unwrap();
        let parsed = StimulusConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_file() {
        let err = StimulusConfig::from_toml_file("/nonexistent/stimulus.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read stimulus config"));
    }
}
