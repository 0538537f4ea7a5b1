use crate::chart::{ChartOptions, PieChart};
use crate::color::HexColor;
use crate::error::ChartError;
use crate::gesture::FLING_VELOCITY_DOWNSCALE;
use crate::layout::LayoutConfig;
use crate::model::{DEFAULT_PIE_SCALE, HighlightStrength, Label, fraction_from_score};
use crate::motion::{AUTO_CENTER_DURATION, FLING_DECELERATION, MotionOptions};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    pub highlight_strength: HighlightStrength,
    pub auto_center_in_slice: bool,
    pub fling_velocity_downscale: i32,
    pub auto_center_duration_ms: u64,
    pub fling_deceleration: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            highlight_strength: HighlightStrength::default(),
            auto_center_in_slice: false,
            fling_velocity_downscale: FLING_VELOCITY_DOWNSCALE,
            auto_center_duration_ms: AUTO_CENTER_DURATION.as_millis() as u64,
            fling_deceleration: FLING_DECELERATION,
        }
    }
}

impl ChartConfig {
    pub fn options(&self) -> Result<ChartOptions, ChartError> {
        let motion = MotionOptions {
            fling_velocity_downscale: self.fling_velocity_downscale,
            auto_center_duration: Duration::from_millis(self.auto_center_duration_ms),
            fling_deceleration: self.fling_deceleration,
        };
        motion.validate()?;

        Ok(ChartOptions {
            highlight_strength: self.highlight_strength,
            auto_center_in_slice: self.auto_center_in_slice,
            motion,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SliceConfig {
    pub label: Label,
    /// Score on a `0..=pie_scale` scale.
    pub value: f32,
    pub slice_color: HexColor,
    pub item_color: HexColor,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub chart: ChartConfig,
    pub layout: LayoutConfig,
    pub pie_scale: f32,
    pub slices: Vec<SliceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chart: ChartConfig::default(),
            layout: LayoutConfig::default(),
            pie_scale: DEFAULT_PIE_SCALE,
            slices: Vec::new(),
        }
    }
}

impl Config {
    /// Builds a chart holding every configured slice. Slices with a value that does not map
    /// onto a valid fraction are skipped.
    pub fn build_chart(&self) -> Result<PieChart, ConfigError> {
        let mut chart = PieChart::new(self.chart.options()?)?;

        for slice in &self.slices {
            let fraction = fraction_from_score(slice.value, self.pie_scale);
            if let Err(e) = chart.add_item(
                slice.label.clone(),
                fraction,
                *slice.slice_color,
                *slice.item_color,
            ) {
                log::warn!("Skipping slice '{}': {}", slice.label, e);
            }
        }

        Ok(chart)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid chart settings: {0}")]
    Invalid(#[from] ChartError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "nennig", "lifewheel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("LIFEWHEEL")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_from_str(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// The user's config, or the bundled default when there is none or it cannot be read.
pub fn load_or_default() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        return default_config();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            default_config()
        }
    }
}

fn default_config() -> Config {
    load_from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
        log::error!("Bundled config is invalid: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TextPosition;

    #[test]
    fn test_bundled_config_parses() {
        let config = load_from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.slices.len(), 6);
        assert_eq!(config.layout.text_position, TextPosition::Left);

        let chart = config.build_chart().unwrap();
        assert_eq!(chart.items().len(), 6);
        assert_eq!(chart.items()[0].label().as_str(), "Sleeping");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = load_from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pie_scale, 10.0);
        assert_eq!(config.chart.options(), Ok(ChartOptions::default()));
    }

    #[test]
    fn test_slice_values_map_to_fractions() {
        let config = load_from_str(
            r##"
            pie_scale = 4

            [[slices]]
            label = "Work"
            value = 1
            slice_color = "#ff0000"
            item_color = "#ff8888"

            [[slices]]
            label = "Play"
            value = 9
            slice_color = "#00f"
            item_color = "#8888ffcc"
            "##,
        )
        .unwrap();

        let chart = config.build_chart().unwrap();
        let fractions: Vec<f32> = chart.items().iter().map(|it| it.fraction()).collect();
        assert_eq!(fractions, vec![0.25, 1.0]);
        assert_eq!(chart.items()[1].item_color().alpha, 0xcc);
    }

    #[test]
    fn test_zero_value_slice_is_skipped() {
        let config = load_from_str(
            r##"
            [[slices]]
            label = "Nothing"
            value = 0
            slice_color = "#000000"
            item_color = "#000000"
            "##,
        )
        .unwrap();

        let chart = config.build_chart().unwrap();
        assert!(chart.items().is_empty());
    }

    #[test]
    fn test_invalid_chart_settings() {
        let negative = load_from_str(
            r#"
            [chart]
            highlight_strength = -0.5
            "#,
        );
        assert!(matches!(negative, Err(ConfigError::Config(_))));

        let config = load_from_str(
            r#"
            [chart]
            fling_velocity_downscale = 0
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.build_chart(),
            Err(ConfigError::Invalid(ChartError::ZeroDownscale))
        ));

        let config = load_from_str(
            r#"
            [chart]
            fling_deceleration = 1e-300
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.build_chart(),
            Err(ConfigError::Invalid(ChartError::InvalidDeceleration(_)))
        ));
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let result = load_from_str(
            r##"
            [[slices]]
            label = "Work"
            value = 5
            slice_color = "red"
            item_color = "#ffffff"
            "##,
        );
        assert!(result.is_err());

        let result = load_from_str(
            r##"
            [[slices]]
            label = "Work"
            value = 5
            slice_color = "aébcd"
            item_color = "#ffffff"
            "##,
        );
        assert!(matches!(result, Err(ConfigError::Config(_))));
    }

    #[test]
    fn test_chart_options_follow_config() {
        let config = load_from_str(
            r#"
            [chart]
            auto_center_in_slice = false
            auto_center_duration_ms = 400
            highlight_strength = 1.5
            "#,
        )
        .unwrap();

        let options = config.chart.options().unwrap();
        assert!(!options.auto_center_in_slice);
        assert_eq!(options.motion.auto_center_duration, Duration::from_millis(400));
        assert_eq!(*options.highlight_strength, 1.5);
        assert_eq!(
            options.motion.fling_velocity_downscale,
            FLING_VELOCITY_DOWNSCALE
        );
    }
}
