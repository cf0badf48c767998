//! Preset catalog: the fixed set of named animations and their targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeckError;

/// Identifier of a pre-authored animation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PresetId {
    /// Horizontal clip-path wipe on an image.
    #[serde(rename = "reveal")]
    Reveal,
    /// Rectangle corner radius grows until the square becomes a circle.
    #[serde(rename = "svg-rect-round", alias = "svg-rect")]
    SvgRectRound,
    /// Path stroke is drawn from nothing to complete.
    #[serde(rename = "svg-path-draw", alias = "svg-path")]
    SvgPathDraw,
    /// Circle radius grows from 10 to 80.
    #[serde(rename = "svg-circle-radius", alias = "svg-circle")]
    SvgCircleRadius,
    /// Fill colour, opacity and scale together.
    #[serde(rename = "svg-css")]
    SvgCss,
    /// Translate and full rotation.
    #[serde(rename = "svg-transform")]
    SvgTransform,
}

impl PresetId {
    /// Catalog order.
    pub const ALL: [PresetId; 6] = [
        PresetId::Reveal,
        PresetId::SvgRectRound,
        PresetId::SvgPathDraw,
        PresetId::SvgCircleRadius,
        PresetId::SvgCss,
        PresetId::SvgTransform,
    ];

    /// Canonical identifier.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reveal => "reveal",
            Self::SvgRectRound => "svg-rect-round",
            Self::SvgPathDraw => "svg-path-draw",
            Self::SvgCircleRadius => "svg-circle-radius",
            Self::SvgCss => "svg-css",
            Self::SvgTransform => "svg-transform",
        }
    }

    /// Identifier of the element this preset animates.
    #[inline]
    pub fn target_id(&self) -> &'static str {
        match self {
            Self::Reveal => "erasable-image",
            Self::SvgRectRound => "svg-rect",
            Self::SvgPathDraw => "svg-path",
            Self::SvgCircleRadius => "svg-circle",
            Self::SvgCss => "svg-css-rect",
            Self::SvgTransform => "svg-transform-rect",
        }
    }

    #[inline]
    pub fn preset(&self) -> Preset {
        Preset {
            id: *self,
            target_id: self.target_id(),
        }
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetId {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reveal" => Ok(Self::Reveal),
            "svg-rect-round" | "svg-rect" => Ok(Self::SvgRectRound),
            "svg-path-draw" | "svg-path" => Ok(Self::SvgPathDraw),
            "svg-circle-radius" | "svg-circle" => Ok(Self::SvgCircleRadius),
            "svg-css" => Ok(Self::SvgCss),
            "svg-transform" => Ok(Self::SvgTransform),
            other => Err(DeckError::UnknownPreset {
                id: other.to_string(),
            }),
        }
    }
}

/// Immutable catalog entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Preset {
    pub id: PresetId,
    pub target_id: &'static str,
}

/// Look up a preset by identifier, rejecting anything outside the catalog.
pub fn lookup(id: &str) -> Result<Preset, DeckError> {
    id.parse::<PresetId>().map(|p| p.preset())
}
