//! Rig settings with persistence
//!
//! Settings are read from the path given on the command line, or from
//! `~/.config/stride/settings.toml` when none is given.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use stride_core::TimeConfig;
use stride_locomotion::{FootstepConfig, LocomotionConfig};
use tracing::info;

/// All settings for a headless run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrideSettings {
    pub locomotion: LocomotionConfig,
    pub footsteps: FootstepConfig,
    pub time: TimeConfig,
    pub simulation: SimulationSettings,
}

impl StrideSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stride"))
    }

    /// Get the default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings, falling back to defaults only when no file exists.
    ///
    /// A file that exists but cannot be read, parsed, or validated is an
    /// error; a misconfigured rig must not start with silent defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => {
                    info!("Could not determine config directory, using default settings");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            info!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        let settings = Self::from_toml(&content)
            .with_context(|| format!("Invalid settings in {:?}", path))?;
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.locomotion.validate()?;
        settings.time.validate()?;
        settings.simulation.validate()?;
        Ok(settings)
    }

    /// Save settings to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Headless host loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Height above the floor the rig spawns at
    pub spawn_height: f32,
    /// Real time between host frames in seconds
    pub frame_delta: f32,
    /// Inject one long frame (a pause or hitch) of this many seconds halfway through
    pub hitch_seconds: Option<f32>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            spawn_height: 0.5,
            frame_delta: 1.0 / 72.0,
            hitch_seconds: None,
        }
    }
}

impl SimulationSettings {
    fn validate(&self) -> anyhow::Result<()> {
        if !(self.frame_delta.is_finite() && self.frame_delta > 0.0) {
            anyhow::bail!("simulation.frame_delta must be > 0, got {}", self.frame_delta);
        }
        if !self.spawn_height.is_finite() {
            anyhow::bail!("simulation.spawn_height must be finite");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_locomotion::TurnStyle;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = StrideSettings::from_toml("").unwrap();
        assert_eq!(settings.locomotion, LocomotionConfig::default());
        assert_eq!(settings.simulation.hitch_seconds, None);
    }

    #[test]
    fn test_sections_override_defaults() {
        let settings = StrideSettings::from_toml(
            r#"
            [locomotion]
            turn_style = "smooth"
            sprint_speed = 7.5

            [footsteps]
            distance_per_step = 1.5
            seed = 3
            "#,
        )
        .unwrap();
        assert_eq!(settings.locomotion.turn_style, TurnStyle::Smooth);
        assert_eq!(settings.locomotion.sprint_speed, 7.5);
        assert_eq!(settings.footsteps.distance_per_step, 1.5);
        assert_eq!(settings.footsteps.seed, Some(3));
    }

    #[test]
    fn test_unknown_turn_style_is_fatal() {
        let result = StrideSettings::from_toml("[locomotion]\nturn_style = \"teleport\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_are_fatal() {
        let result = StrideSettings::from_toml("[locomotion]\nsnap_turn_threshold = 2.0");
        assert!(result.is_err());

        let result = StrideSettings::from_toml("[simulation]\nframe_delta = 0.0");
        assert!(result.is_err());
    }

    #[test]
    fn test_stalling_time_settings_are_fatal() {
        for section in [
            "[time]\nfixed_timestep = 0.0",
            "[time]\ntime_scale = 0.0",
            "[time]\nmax_delta_time = 0.0",
        ] {
            let result = StrideSettings::from_toml(section);
            assert!(result.is_err(), "accepted {section:?}");
        }
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("stride-settings-that-does-not-exist.toml");
        let settings = StrideSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.locomotion, LocomotionConfig::default());
    }

    #[test]
    fn test_settings_round_trip_through_toml() {
        let settings = StrideSettings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed = StrideSettings::from_toml(&text).unwrap();
        assert_eq!(parsed.locomotion, settings.locomotion);
        assert_eq!(parsed.footsteps, settings.footsteps);
    }
}
