//! Animation deck core (engine-agnostic)
//!
//! Preset animations, a single active playback session, transport controls
//! and a polled status readout. Interpolation and timing belong to the host
//! platform, reached through the traits in [`host`]. [`headless`] provides an
//! in-memory host for tests and native runs; the wasm crate provides the
//! browser one.

pub mod config;
pub mod control;
pub mod deck;
pub mod error;
pub mod factory;
pub mod headless;
pub mod host;
pub mod keyframes;
pub mod manager;
pub mod preset;
pub mod status;

// Re-exports for consumers (adapters)
pub use config::DeckConfig;
pub use control::{Command, ControlSurface, FixedSession, SessionSource};
pub use deck::{Deck, Tick};
pub use error::DeckError;
pub use factory::{create_session, effect_for};
pub use headless::{HeadlessHost, HeadlessSession, HeadlessTarget, SceneElement};
pub use host::{AnimationHost, PlayState, PlaybackSession, SessionEvent, TargetElement};
pub use keyframes::{EffectSpec, EffectTiming, FillMode, Keyframe, PropertyValue};
pub use manager::{SessionManager, SessionReader};
pub use preset::{lookup, Preset, PresetId};
pub use status::{
    format_mm_ss, NullReadout, ReadoutSurface, StatusPoller, StatusReadout, StatusSnapshot,
};
