//! Error types for the animation deck.

use serde::{Deserialize, Serialize};

/// Every failure the deck reports. All of them are recoverable: the caller
/// logs the error and the page keeps running.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DeckError {
    /// Selection named an identifier that is not in the preset catalog.
    #[error("Unknown preset: {id}")]
    UnknownPreset { id: String },

    /// The preset's target element is absent from the rendering surface.
    #[error("Target element '{target_id}' not found for preset {preset}")]
    UnresolvableTarget { preset: String, target_id: String },

    /// The target exists but lacks geometry the preset needs.
    #[error("Preset {preset} needs '{attribute}' on its target")]
    MissingGeometry { preset: String, attribute: String },

    /// The animation engine refused a command.
    #[error("Playback error: {reason}")]
    Playback { reason: String },

    /// Configuration could not be parsed or failed validation.
    #[error("Config error: {reason}")]
    Config { reason: String },
}

impl DeckError {
    pub fn playback(reason: impl Into<String>) -> Self {
        Self::Playback {
            reason: reason.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Whether the page can carry on after this error.
    ///
    /// Only configuration errors stop a deck from being built at all.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config { .. })
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownPreset { .. } => "preset",
            Self::UnresolvableTarget { .. } | Self::MissingGeometry { .. } => "target",
            Self::Playback { .. } => "playback",
            Self::Config { .. } => "config",
        }
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_failures_are_recoverable() {
        let unknown = DeckError::UnknownPreset {
            id: "bogus".to_string(),
        };
        assert!(unknown.is_recoverable());
        assert_eq!(unknown.category(), "preset");

        let missing = DeckError::UnresolvableTarget {
            preset: "reveal".to_string(),
            target_id: "erasable-image".to_string(),
        };
        assert!(missing.is_recoverable());
        assert_eq!(missing.category(), "target");

        assert!(!DeckError::config("bad").is_recoverable());
    }

    #[test]
    fn messages_name_the_offender() {
        let err = DeckError::UnresolvableTarget {
            preset: "svg-circle-radius".to_string(),
            target_id: "svg-circle".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("svg-circle"));
        assert!(msg.contains("svg-circle-radius"));
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err: DeckError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.category(), "config");
    }
}
