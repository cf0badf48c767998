//! Animation Factory: preset + target → effect → session.
//!
//! Pure with respect to deck state; it never touches the active slot.

use crate::error::DeckError;
use crate::host::{AnimationHost, TargetElement};
use crate::keyframes::{EffectSpec, EffectTiming, FillMode, Keyframe};
use crate::preset::PresetId;

pub const DEFAULT_DURATION_MS: f64 = 2000.0;
pub const TRANSFORM_DURATION_MS: f64 = 3000.0;

fn timing(duration_ms: f64) -> EffectTiming {
    EffectTiming {
        duration_ms,
        fill: FillMode::Forwards,
    }
}

fn geometry(
    preset: PresetId,
    attribute: &str,
    value: Option<f64>,
) -> Result<f64, DeckError> {
    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| DeckError::MissingGeometry {
            preset: preset.as_str().to_string(),
            attribute: attribute.to_string(),
        })
}

/// Build the keyframe pair and timing for `preset` on `target`.
pub fn effect_for<T: TargetElement + ?Sized>(
    preset: PresetId,
    target: &T,
) -> Result<EffectSpec, DeckError> {
    let spec = match preset {
        PresetId::Reveal => EffectSpec {
            from: Keyframe::new().with("clipPath", "inset(0 100% 0 0)"),
            to: Keyframe::new().with("clipPath", "inset(0 0% 0 0)"),
            timing: timing(DEFAULT_DURATION_MS),
        },
        PresetId::SvgRectRound => {
            let width = geometry(preset, "width", target.attribute_f64("width"))?;
            let height = geometry(preset, "height", target.attribute_f64("height"))?;
            let max_radius = width.min(height) / 2.0;
            EffectSpec {
                from: Keyframe::new().with("rx", 0.0).with("ry", 0.0),
                to: Keyframe::new()
                    .with("rx", max_radius)
                    .with("ry", max_radius),
                timing: timing(DEFAULT_DURATION_MS),
            }
        }
        PresetId::SvgPathDraw => {
            let length = geometry(preset, "total-length", target.total_length())?;
            EffectSpec {
                from: Keyframe::new().with("strokeDashoffset", length),
                to: Keyframe::new().with("strokeDashoffset", 0.0),
                timing: timing(DEFAULT_DURATION_MS),
            }
        }
        PresetId::SvgCircleRadius => EffectSpec {
            from: Keyframe::new().with("r", 10.0),
            to: Keyframe::new().with("r", 80.0),
            timing: timing(DEFAULT_DURATION_MS),
        },
        PresetId::SvgCss => EffectSpec {
            from: Keyframe::new()
                .with("fill", "rgba(156, 39, 176, 1)")
                .with("opacity", 0.5)
                .with("transform", "scale(0.5)"),
            to: Keyframe::new()
                .with("fill", "rgba(33, 150, 243, 1)")
                .with("opacity", 1.0)
                .with("transform", "scale(1)"),
            timing: timing(DEFAULT_DURATION_MS),
        },
        PresetId::SvgTransform => EffectSpec {
            from: Keyframe::new().with("transform", "translate(0px, 0px) rotate(0deg)"),
            to: Keyframe::new().with("transform", "translate(50px, 50px) rotate(360deg)"),
            timing: timing(TRANSFORM_DURATION_MS),
        },
    };
    Ok(spec)
}

/// Build a playable session for `preset` on `target`. The session is not
/// started.
pub fn create_session<H: AnimationHost>(
    host: &mut H,
    preset: PresetId,
    target: &H::Target,
) -> Result<H::Session, DeckError> {
    let effect = effect_for(preset, target)?;
    host.create_session(target, effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframes::PropertyValue;

    struct Geometry {
        width: Option<f64>,
        height: Option<f64>,
        length: Option<f64>,
    }

    impl TargetElement for Geometry {
        fn id(&self) -> String {
            "t".into()
        }
        fn attribute_f64(&self, name: &str) -> Option<f64> {
            match name {
                "width" => self.width,
                "height" => self.height,
                _ => None,
            }
        }
        fn total_length(&self) -> Option<f64> {
            self.length
        }
    }

    const BARE: Geometry = Geometry {
        width: None,
        height: None,
        length: None,
    };

    #[test]
    fn every_preset_fills_forwards() {
        let target = Geometry {
            width: Some(120.0),
            height: Some(80.0),
            length: Some(300.0),
        };
        for preset in PresetId::ALL {
            let spec = effect_for(preset, &target).unwrap();
            assert_eq!(spec.timing.fill, FillMode::Forwards);
            let expected = if preset == PresetId::SvgTransform {
                3000.0
            } else {
                2000.0
            };
            assert_eq!(spec.timing.duration_ms, expected, "{preset}");
        }
    }

    #[test]
    fn rect_round_targets_half_the_short_side() {
        let target = Geometry {
            width: Some(120.0),
            height: Some(80.0),
            length: None,
        };
        let spec = effect_for(PresetId::SvgRectRound, &target).unwrap();
        assert_eq!(spec.to.get("rx"), Some(&PropertyValue::Number(40.0)));
        assert_eq!(spec.to.get("ry"), Some(&PropertyValue::Number(40.0)));
        assert_eq!(spec.from.get("rx"), Some(&PropertyValue::Number(0.0)));
    }

    #[test]
    fn path_draw_starts_at_full_length() {
        let target = Geometry {
            width: None,
            height: None,
            length: Some(512.5),
        };
        let spec = effect_for(PresetId::SvgPathDraw, &target).unwrap();
        assert_eq!(
            spec.from.get("strokeDashoffset"),
            Some(&PropertyValue::Number(512.5))
        );
        assert_eq!(
            spec.to.get("strokeDashoffset"),
            Some(&PropertyValue::Number(0.0))
        );
    }

    #[test]
    fn missing_geometry_is_reported() {
        let err = effect_for(PresetId::SvgRectRound, &BARE).unwrap_err();
        assert!(matches!(
            err,
            DeckError::MissingGeometry { ref attribute, .. } if attribute == "width"
        ));
        assert!(effect_for(PresetId::SvgPathDraw, &BARE).is_err());
        // Presets that need no geometry work on any element.
        assert!(effect_for(PresetId::SvgCircleRadius, &BARE).is_ok());
    }
}
