use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BloomcamConfig {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub trigger: TriggerConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DetectorConfig {
    /// Polling period for detection cycles, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Detector variant to request (the lightweight "tiny" mode by default)
    #[serde(default = "default_detector_variant")]
    pub variant: DetectorVariant,

    /// Face localization confidence threshold, distinct from the smile threshold
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TriggerConfig {
    /// Minimum happiness score that qualifies as a smile (strict comparison)
    #[serde(default = "default_smile_threshold")]
    pub smile_threshold: f32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AudioConfig {
    /// Playback volume for the background track (0.0 - 1.0)
    #[serde(default = "default_audio_volume")]
    pub volume: f32,

    /// Whether the background track loops
    #[serde(default = "default_audio_looped")]
    pub looped: bool,

    /// Label of the background track asset
    #[serde(default = "default_audio_track")]
    pub track: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UiConfig {
    /// Startup strategy: gesture-gated with a permission overlay, or immediate
    #[serde(default = "default_startup_mode")]
    pub startup: StartupMode,

    /// Fade duration before the permission overlay is detached from layout, in milliseconds
    #[serde(default = "default_overlay_fade_ms")]
    pub overlay_fade_ms: u64,

    /// Fade duration before the smile hint is detached from layout, in milliseconds
    #[serde(default = "default_hint_fade_ms")]
    pub hint_fade_ms: u64,

    /// Delay after the enable gesture before the smile hint is revealed, in milliseconds
    #[serde(default = "default_hint_reveal_delay_ms")]
    pub hint_reveal_delay_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    /// Event bus capacity
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,
}

/// Front-end startup strategy over the one trigger core.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StartupMode {
    /// Wait for an explicit enable gesture, show the permission overlay and smile hint
    Gesture,
    /// Start the camera as soon as the detector is bootstrapped, no gesture or hint
    Immediate,
}

/// Detection mode requested from the expression source.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DetectorVariant {
    /// Fast, lightweight detection suited to a 100 ms cadence
    Tiny,
    /// Full-accuracy detection
    Full,
}

impl BloomcamConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("bloomcam.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Add environment variables with BLOOMCAM_ prefix
            .add_source(Environment::with_prefix("BLOOMCAM").separator("__"))
            .build()?;

        let config: BloomcamConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detector.poll_interval_ms == 0 {
            return Err(ConfigError::Message(
                "Detector poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.detector.score_threshold) {
            return Err(ConfigError::Message(
                "Detector score_threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        if !(0.0..1.0).contains(&self.trigger.smile_threshold) {
            return Err(ConfigError::Message(
                "Trigger smile_threshold must be in the range [0.0, 1.0)".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(ConfigError::Message(
                "Audio volume must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.system.event_bus_capacity == 0 {
            return Err(ConfigError::Message(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Serialize the configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for BloomcamConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            trigger: TriggerConfig::default(),
            audio: AudioConfig::default(),
            ui: UiConfig::default(),
            system: SystemConfig::default(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            variant: default_detector_variant(),
            score_threshold: default_score_threshold(),
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            smile_threshold: default_smile_threshold(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: default_audio_volume(),
            looped: default_audio_looped(),
            track: default_audio_track(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            startup: default_startup_mode(),
            overlay_fade_ms: default_overlay_fade_ms(),
            hint_fade_ms: default_hint_fade_ms(),
            hint_reveal_delay_ms: default_hint_reveal_delay_ms(),
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            event_bus_capacity: default_event_bus_capacity(),
        }
    }
}

// Default value functions
fn default_poll_interval_ms() -> u64 {
    100
}
fn default_detector_variant() -> DetectorVariant {
    DetectorVariant::Tiny
}
fn default_score_threshold() -> f32 {
    0.5
}
fn default_smile_threshold() -> f32 {
    0.5
}
fn default_audio_volume() -> f32 {
    0.5
}
fn default_audio_looped() -> bool {
    true
}
fn default_audio_track() -> String {
    "bg-music".to_string()
}
fn default_startup_mode() -> StartupMode {
    StartupMode::Gesture
}
fn default_overlay_fade_ms() -> u64 {
    500
}
fn default_hint_fade_ms() -> u64 {
    500
}
fn default_hint_reveal_delay_ms() -> u64 {
    600
}
fn default_event_bus_capacity() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_trigger_contract() {
        let config = BloomcamConfig::default();

        assert_eq!(config.detector.poll_interval_ms, 100);
        assert_eq!(config.detector.variant, DetectorVariant::Tiny);
        assert_eq!(config.trigger.smile_threshold, 0.5);
        assert_eq!(config.audio.volume, 0.5);
        assert!(config.audio.looped);
        assert_eq!(config.ui.startup, StartupMode::Gesture);
        assert_eq!(config.ui.overlay_fade_ms, 500);
        assert_eq!(config.ui.hint_fade_ms, 500);
        assert_eq!(config.ui.hint_reveal_delay_ms, 600);

        config.validate().unwrap();
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = BloomcamConfig::load_from_file("/nonexistent/bloomcam.toml").unwrap();
        assert_eq!(config.detector.poll_interval_ms, 100);
        assert_eq!(config.trigger.smile_threshold, 0.5);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[detector]\npoll_interval_ms = 250\n\n[ui]\nstartup = \"immediate\"\n"
        )
        .unwrap();

        let config = BloomcamConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.detector.poll_interval_ms, 250);
        assert_eq!(config.ui.startup, StartupMode::Immediate);
        // untouched sections keep their defaults
        assert_eq!(config.audio.volume, 0.5);
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let mut config = BloomcamConfig::default();
        config.trigger.smile_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = BloomcamConfig::default();
        config.detector.poll_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = BloomcamConfig::default();
        config.audio.volume = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_round_trip() {
        let config = BloomcamConfig::default();
        let rendered = config.to_toml().unwrap();
        let parsed: BloomcamConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.detector.poll_interval_ms, config.detector.poll_interval_ms);
        assert_eq!(parsed.ui.startup, config.ui.startup);
    }
}
