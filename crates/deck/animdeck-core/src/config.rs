//! Deck configuration.

use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::preset::PresetId;

/// Runtime knobs for a deck. Every field has a default, so an empty JSON
/// object is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Status poll cadence.
    pub poll_interval_ms: u32,
    /// Preset started when the deck is mounted; `None` starts empty.
    pub initial_preset: Option<String>,
    /// Multiplier applied by the speed-up shortcut.
    pub speed_up_factor: f64,
    /// Multiplier applied by the slow-down shortcut.
    pub speed_down_factor: f64,
    /// Timeline fraction used by the seek shortcut.
    pub seek_shortcut_fraction: f64,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            initial_preset: Some(PresetId::Reveal.as_str().to_string()),
            speed_up_factor: 2.0,
            speed_down_factor: 0.5,
            seek_shortcut_fraction: 0.5,
        }
    }
}

impl DeckConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, DeckError> {
        let cfg: DeckConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), DeckError> {
        if self.poll_interval_ms == 0 {
            return Err(DeckError::config("poll_interval_ms must be > 0"));
        }
        for (name, v) in [
            ("speed_up_factor", self.speed_up_factor),
            ("speed_down_factor", self.speed_down_factor),
            ("seek_shortcut_fraction", self.seek_shortcut_fraction),
        ] {
            if !v.is_finite() {
                return Err(DeckError::config(format!("{name} must be finite")));
            }
        }
        if let Some(id) = &self.initial_preset {
            id.parse::<PresetId>()
                .map_err(|e| DeckError::config(format!("initial_preset: {e}")))?;
        }
        Ok(())
    }

    /// The initial preset, already validated.
    pub fn initial(&self) -> Option<PresetId> {
        self.initial_preset.as_deref().and_then(|s| s.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = DeckConfig::from_json("{}").unwrap();
        assert_eq!(cfg, DeckConfig::default());
        assert_eq!(cfg.initial(), Some(PresetId::Reveal));
    }

    #[test]
    fn partial_override() {
        let cfg =
            DeckConfig::from_json(r#"{"poll_interval_ms": 50, "initial_preset": "svg-css"}"#)
                .unwrap();
        assert_eq!(cfg.poll_interval_ms, 50);
        assert_eq!(cfg.initial(), Some(PresetId::SvgCss));
        assert_eq!(cfg.speed_up_factor, 2.0);
    }

    #[test]
    fn null_initial_preset_starts_empty() {
        let cfg = DeckConfig::from_json(r#"{"initial_preset": null}"#).unwrap();
        assert_eq!(cfg.initial(), None);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(DeckConfig::from_json(r#"{"poll_interval_ms": 0}"#).is_err());
        assert!(DeckConfig::from_json(r#"{"initial_preset": "nope"}"#).is_err());
        assert!(DeckConfig::from_json("not json").is_err());
        let cfg = DeckConfig {
            speed_up_factor: f64::NAN,
            ..DeckConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
