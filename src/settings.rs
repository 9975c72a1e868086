//! Game tuning and preferences
//!
//! Physics constants, scoring values and opponent timing for both rule
//! sets. Loaded from JSON (a file natively, LocalStorage on the web);
//! every field falls back to its default when missing.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::PhysicsParams;

/// Errors loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings JSON invalid: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Pool table tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub physics: PhysicsParams,
    /// Cushion inset from the table edge
    pub margin: f32,
    pub ball_radius: f32,
    pub pocket_capture_radius: f32,
    pub pocket_pull_radius: f32,
    /// Cue ball speed (pixels/tick) at power 100
    pub max_shot_speed: f32,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            physics: PhysicsParams::pool(),
            margin: 20.0,
            ball_radius: 10.0,
            pocket_capture_radius: 20.0,
            pocket_pull_radius: 30.0,
            max_shot_speed: 16.0,
        }
    }
}

/// Carrom board tuning and scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarromSettings {
    pub physics: PhysicsParams,
    pub margin: f32,
    pub coin_radius: f32,
    pub striker_radius: f32,
    pub pocket_capture_radius: f32,
    pub pocket_pull_radius: f32,
    /// Striker speed (pixels/tick) at power 100
    pub max_shot_speed: f32,
    pub light_value: u32,
    pub dark_value: u32,
    pub queen_value: u32,
    /// Subtracted from the shooter's score when the striker is pocketed
    pub striker_penalty: u32,
    /// Baseline distance from the cushion, as a fraction of board height
    pub baseline_inset: f32,
    /// Half-length of the baseline, as a fraction of board width
    pub baseline_half_length: f32,
}

impl Default for CarromSettings {
    fn default() -> Self {
        Self {
            physics: PhysicsParams::carrom(),
            margin: 20.0,
            coin_radius: 11.0,
            striker_radius: 15.0,
            pocket_capture_radius: 24.0,
            pocket_pull_radius: 36.0,
            max_shot_speed: 16.0,
            light_value: 20,
            dark_value: 10,
            queen_value: 50,
            striker_penalty: 10,
            baseline_inset: 0.15,
            baseline_half_length: 0.3,
        }
    }
}

/// Computer opponent timing and strength
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentSettings {
    /// Ticks between the turn starting and the opponent picking a target
    pub think_delay_ticks: u32,
    /// Ticks the aim is shown before the shot is taken
    pub aim_delay_ticks: u32,
    pub min_power: f32,
    pub max_power: f32,
}

impl Default for OpponentSettings {
    fn default() -> Self {
        Self {
            think_delay_ticks: 30,
            aim_delay_ticks: 45,
            min_power: 55.0,
            max_power: 75.0,
        }
    }
}

/// All tuning for one engine instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the opponent's power jitter
    pub seed: u64,
    pub pool: PoolSettings,
    pub carrom: CarromSettings,
    pub opponent: OpponentSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_7AB1E,
            pool: PoolSettings::default(),
            carrom: CarromSettings::default(),
            opponent: OpponentSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON, logging any validation warnings
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        for warning in settings.validate() {
            log::warn!("settings: {}", warning);
        }
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Load from `path`, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Human-readable warnings for values the physics cannot work with
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();

        fn check_physics(w: &mut Vec<String>, label: &str, p: &PhysicsParams) {
            if !(p.friction > 0.0 && p.friction < 1.0) {
                w.push(format!("{label}.friction {} outside (0, 1); discs never stop", p.friction));
            }
            if !(0.0..=1.0).contains(&p.wall_restitution) {
                w.push(format!(
                    "{label}.wall_restitution {} outside 0..1; cushions add energy",
                    p.wall_restitution
                ));
            }
            if p.rest_epsilon <= 0.0 {
                w.push(format!("{label}.rest_epsilon must be > 0"));
            }
        }

        fn check_pocket(w: &mut Vec<String>, label: &str, capture: f32, pull: f32, margin: f32, radius: f32) {
            if capture >= pull {
                w.push(format!("{label}: pocket capture radius {capture} >= pull radius {pull}"));
            }
            // A disc wedged into a corner sits radius*sqrt(2) from the corner pocket
            if capture <= radius * std::f32::consts::SQRT_2 {
                w.push(format!(
                    "{label}: capture radius {capture} too small to reach a disc of radius {radius} in a corner"
                ));
            }
            if margin < 0.0 {
                w.push(format!("{label}: negative margin {margin}"));
            }
        }

        check_physics(&mut w, "pool.physics", &self.pool.physics);
        check_physics(&mut w, "carrom.physics", &self.carrom.physics);
        check_pocket(
            &mut w,
            "pool",
            self.pool.pocket_capture_radius,
            self.pool.pocket_pull_radius,
            self.pool.margin,
            self.pool.ball_radius,
        );
        check_pocket(
            &mut w,
            "carrom",
            self.carrom.pocket_capture_radius,
            self.carrom.pocket_pull_radius,
            self.carrom.margin,
            self.carrom.striker_radius.max(self.carrom.coin_radius),
        );
        if self.pool.ball_radius <= 0.0 || self.carrom.coin_radius <= 0.0 || self.carrom.striker_radius <= 0.0 {
            w.push("disc radii must be > 0".into());
        }
        let o = &self.opponent;
        if o.min_power > o.max_power {
            w.push(format!("opponent.min_power ({}) greater than max_power ({})", o.min_power, o.max_power));
        }
        if o.min_power < 0.0 || o.max_power > 100.0 {
            w.push("opponent power range must lie within 0..=100".into());
        }
        w
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "disc_table_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Stored settings ignored: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_empty());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "carrom": { "queen_value": 40 } }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.carrom.queen_value, 40);
        assert_eq!(settings.carrom.light_value, 20);
        assert_eq!(settings.pool.ball_radius, 10.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.pool.max_shot_speed = 20.0;
        settings.carrom.physics.friction = 0.99;
        let json = settings.to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back.pool.max_shot_speed, 20.0);
        assert_eq!(back.carrom.physics.friction, 0.99);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load_from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
        assert_eq!(Settings::load_or_default("/definitely/not/here.json").seed, Settings::default().seed);
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut settings = Settings::default();
        settings.pool.physics.friction = 1.2;
        settings.carrom.pocket_capture_radius = 40.0;
        settings.opponent.min_power = 90.0;
        let warnings = settings.validate();
        assert!(warnings.iter().any(|w| w.contains("pool.physics.friction")));
        assert!(warnings.iter().any(|w| w.contains("carrom: pocket capture radius")));
        assert!(warnings.iter().any(|w| w.contains("min_power")));
    }
}
