//! Display configuration.
//!
//! These structs are deserialized with `serde` through the `config` crate, so
//! the pattern, frame rate and overlay can come from a TOML file and be
//! overridden with `COLOR_CYCLE_*` environment variables.

use crate::color::{ColorParseError, HexColor, TextColor};
use crate::pattern::Pattern;
use crate::types::{PatternError, StepDuration};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix for environment overrides, e.g. `COLOR_CYCLE_AUTOPLAY=false`.
pub const ENV_PREFIX: &str = "COLOR_CYCLE";

/// Top-level configuration for a color display.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// How often the scheduler re-evaluates while playing.
    #[serde(default)]
    pub frame_rate: FrameRate,

    /// Start playing as soon as the display opens.
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,

    /// Text drawn over the background.
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// The steps of the initial pattern, in cycle order.
    #[serde(default = "default_pattern")]
    pub pattern: Vec<StepConfig>,

    /// Where to write logs. Logging is off when unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Redraw cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameRate {
    /// ~60 frames per second.
    #[default]
    High,
    /// ~30 frames per second.
    Medium,
    /// ~10 frames per second. Plenty for steps of a second or more.
    Low,
    /// A user-defined rate.
    Custom { fps: u32 },
}

impl FrameRate {
    /// Frames per second, never zero.
    pub fn fps(&self) -> u32 {
        match self {
            FrameRate::High => 60,
            FrameRate::Medium => 30,
            FrameRate::Low => 10,
            FrameRate::Custom { fps } => (*fps).max(1),
        }
    }

    /// Time between two ticks.
    pub fn interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps() as u64)
    }
}

/// Overlay text settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OverlayConfig {
    /// Text to show. `{color}` is replaced with the current hex value.
    #[serde(default)]
    pub text: String,

    /// `"auto"` for black/white contrast, or a `#rrggbb` color.
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

impl OverlayConfig {
    /// Parses [`text_color`](Self::text_color).
    pub fn text_color(&self) -> Result<TextColor, ConfigError> {
        let raw = self.text_color.trim();
        if raw.eq_ignore_ascii_case("auto") {
            return Ok(TextColor::Auto);
        }
        raw.parse()
            .map(TextColor::Custom)
            .map_err(|source| ConfigError::InvalidTextColor { source })
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            text_color: default_text_color(),
        }
    }
}

/// One configured step.
#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    /// `#rrggbb` color.
    pub color: String,
    /// Seconds the step stays active. Clamped to at least 0.1.
    pub duration: f32,
}

/// Errors raised while loading or interpreting configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The file or environment could not be read or deserialized.
    Source(config::ConfigError),
    /// A pattern step has an unparseable color.
    InvalidColor {
        index: usize,
        source: ColorParseError,
    },
    /// The overlay text color is neither `auto` nor a hex color.
    InvalidTextColor { source: ColorParseError },
    /// The pattern does not fit.
    Pattern(PatternError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Source(err) => write!(f, "failed to load configuration: {}", err),
            ConfigError::InvalidColor { index, source } => {
                write!(f, "pattern step {} has an invalid color: {}", index + 1, source)
            }
            ConfigError::InvalidTextColor { source } => {
                write!(f, "overlay text color is invalid: {}", source)
            }
            ConfigError::Pattern(err) => write!(f, "invalid pattern: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Source(err) => Some(err),
            ConfigError::InvalidColor { source, .. } => Some(source),
            ConfigError::InvalidTextColor { source } => Some(source),
            ConfigError::Pattern(err) => Some(err),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Source(err)
    }
}

impl From<PatternError> for ConfigError {
    fn from(err: PatternError) -> Self {
        ConfigError::Pattern(err)
    }
}

impl DisplayConfig {
    /// Loads configuration from an optional TOML file and the environment.
    ///
    /// Environment variables use the `COLOR_CYCLE_` prefix and `__` to reach
    /// nested keys, e.g. `COLOR_CYCLE_OVERLAY__TEXT`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parses a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Builds the configured pattern.
    pub fn build_pattern<const N: usize>(&self) -> Result<Pattern<N>, ConfigError> {
        let mut pattern = Pattern::new();
        for (index, step) in self.pattern.iter().enumerate() {
            let color: HexColor = step
                .color
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidColor { index, source })?;
            pattern.push(color, StepDuration::from_secs_f32(step.duration))?;
        }
        Ok(pattern)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::default(),
            autoplay: default_autoplay(),
            overlay: OverlayConfig::default(),
            pattern: default_pattern(),
            log_file: None,
        }
    }
}

// --- Default value functions for serde ---

fn default_autoplay() -> bool {
    true
}

fn default_text_color() -> String {
    "auto".to_string()
}

fn default_pattern() -> Vec<StepConfig> {
    vec![
        StepConfig {
            color: "#ff0000".to_string(),
            duration: 5.0,
        },
        StepConfig {
            color: "#ffffff".to_string(),
            duration: 5.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{RED, WHITE};

    #[test]
    fn frame_rate_intervals() {
        assert_eq!(FrameRate::High.interval(), Duration::from_micros(16_666));
        assert_eq!(FrameRate::Low.interval(), Duration::from_millis(100));
        assert_eq!(FrameRate::Custom { fps: 0 }.fps(), 1);
    }

    #[test]
    fn default_config_builds_red_white_pattern() {
        let pattern = DisplayConfig::default().build_pattern::<4>().unwrap();

        assert_eq!(pattern.len(), 2);
        assert_eq!(pattern.steps()[0].color, RED);
        assert_eq!(pattern.steps()[1].color, WHITE);
        assert_eq!(pattern.cycle_millis(), 10_000);
    }

    #[test]
    fn text_color_accepts_auto_in_any_case() {
        let overlay = OverlayConfig {
            text: String::new(),
            text_color: " AUTO ".to_string(),
        };
        assert_eq!(overlay.text_color().unwrap(), TextColor::Auto);
    }

    #[test]
    fn text_color_rejects_garbage() {
        let overlay = OverlayConfig {
            text: String::new(),
            text_color: "purple".to_string(),
        };
        assert!(matches!(
            overlay.text_color(),
            Err(ConfigError::InvalidTextColor { .. })
        ));
    }
}
