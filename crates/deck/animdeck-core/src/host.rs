//! Contracts the deck consumes from its host platform.
//!
//! The host owns interpolation, timing and compositing. The deck only
//! constructs effects, issues transport commands and reads timing state back.
//! Adapters (browser, headless) implement these traits.

use serde::{Deserialize, Serialize};

use crate::error::DeckError;
use crate::keyframes::EffectSpec;
use crate::preset::PresetId;

/// Lifecycle stage of a session, named as the platform reports it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    Idle,
    Running,
    Paused,
    Finished,
}

impl PlayState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl From<&str> for PlayState {
    fn from(s: &str) -> Self {
        match s {
            "running" => Self::Running,
            "paused" => Self::Paused,
            "finished" => Self::Finished,
            _ => Self::Idle,
        }
    }
}

/// Notifications a session raises on its own.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionEvent {
    Finished,
    Canceled,
}

/// Read access to the geometry of a target element.
pub trait TargetElement {
    /// Stable element identifier.
    fn id(&self) -> String;
    /// Numeric attribute value, if present and parseable.
    fn attribute_f64(&self, name: &str) -> Option<f64>;
    /// Total length of a path-like element.
    fn total_length(&self) -> Option<f64>;
}

/// One playable animation bound to one target for its whole lifetime.
pub trait PlaybackSession {
    fn play(&mut self) -> Result<(), DeckError>;
    fn pause(&mut self) -> Result<(), DeckError>;
    fn reverse(&mut self) -> Result<(), DeckError>;
    /// Drop timing state; the target reverts to its pre-animation look.
    fn cancel(&mut self);
    /// Jump to the end appropriate to the current direction.
    fn finish(&mut self) -> Result<(), DeckError>;

    fn set_current_time(&mut self, time_ms: f64);
    fn set_playback_rate(&mut self, rate: f64);

    fn play_state(&self) -> PlayState;
    /// `None` until the session has been played or seeked, and after cancel.
    fn current_time(&self) -> Option<f64>;
    fn duration_ms(&self) -> f64;
    fn playback_rate(&self) -> f64;

    /// Notifications raised since the previous call.
    fn take_events(&mut self) -> Vec<SessionEvent>;
}

/// The rendering surface plus the platform animation engine.
pub trait AnimationHost {
    type Target: TargetElement;
    type Session: PlaybackSession;

    fn resolve_target(&self, id: &str) -> Option<Self::Target>;

    /// Construct an effect on `target` and wrap it in a playable session.
    fn create_session(
        &mut self,
        target: &Self::Target,
        effect: EffectSpec,
    ) -> Result<Self::Session, DeckError>;

    /// Remove the "selected" marker from every preset selector.
    fn clear_selection(&mut self);

    /// Mark the selector for `preset` as selected.
    fn mark_selected(&mut self, preset: PresetId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_state_names_match_platform() {
        for s in [
            PlayState::Idle,
            PlayState::Running,
            PlayState::Paused,
            PlayState::Finished,
        ] {
            assert_eq!(PlayState::from(s.name()), s);
        }
        assert_eq!(PlayState::from("pending"), PlayState::Idle);
        assert_eq!(
            serde_json::to_string(&PlayState::Finished).unwrap(),
            "\"finished\""
        );
    }
}
