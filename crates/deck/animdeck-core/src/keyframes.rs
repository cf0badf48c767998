//! Two-keyframe effect model and linear sampling.
//!
//! Property names use the scripting spelling (`clipPath`, `strokeDashoffset`),
//! so adapters can hand them straight to the platform engine.

use serde::{Deserialize, Serialize};

/// A keyframe property value: a plain number or a CSS-style literal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Number(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

impl PropertyValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            PropertyValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One keyframe: ordered property/value pairs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub props: Vec<(String, PropertyValue)>,
}

impl Keyframe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.props.push((name.to_string(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.props
            .iter()
            .find_map(|(k, v)| if k == name { Some(v) } else { None })
    }
}

/// Whether effect values persist outside the active interval.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    None,
    Forwards,
    Backwards,
    Both,
}

impl FillMode {
    #[inline]
    pub fn fills_forwards(&self) -> bool {
        matches!(self, Self::Forwards | Self::Both)
    }

    #[inline]
    pub fn fills_backwards(&self) -> bool {
        matches!(self, Self::Backwards | Self::Both)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Forwards => "forwards",
            Self::Backwards => "backwards",
            Self::Both => "both",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectTiming {
    pub duration_ms: f64,
    pub fill: FillMode,
}

/// Start/end keyframe pair interpolated linearly over `timing.duration_ms`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub from: Keyframe,
    pub to: Keyframe,
    pub timing: EffectTiming,
}

impl EffectSpec {
    /// Property names animated by this effect, in keyframe order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.from.props.iter().map(|(k, _)| k.as_str())
    }

    /// Value of `property` at `progress` (0 = start keyframe, 1 = end keyframe).
    pub fn sample(&self, property: &str, progress: f64) -> Option<PropertyValue> {
        let a = self.from.get(property)?;
        let b = self.to.get(property)?;
        Some(interpolate(a, b, progress))
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn interpolate(a: &PropertyValue, b: &PropertyValue, t: f64) -> PropertyValue {
    match (a, b) {
        (PropertyValue::Number(x), PropertyValue::Number(y)) => {
            PropertyValue::Number(lerp(*x, *y, t))
        }
        (PropertyValue::Text(x), PropertyValue::Text(y)) => {
            let (skel_a, nums_a) = split_numbers(x);
            let (skel_b, nums_b) = split_numbers(y);
            if skel_a == skel_b && nums_a.len() == nums_b.len() {
                let nums: Vec<f64> = nums_a
                    .iter()
                    .zip(&nums_b)
                    .map(|(p, q)| lerp(*p, *q, t))
                    .collect();
                PropertyValue::Text(fill_template(&skel_a, &nums))
            } else {
                discrete(a, b, t)
            }
        }
        _ => discrete(a, b, t),
    }
}

fn discrete(a: &PropertyValue, b: &PropertyValue, t: f64) -> PropertyValue {
    if t < 0.5 {
        a.clone()
    } else {
        b.clone()
    }
}

const SLOT: char = '\u{1}';

/// Split a literal into a skeleton (numbers replaced by a slot marker) and
/// the numbers in order.
fn split_numbers(s: &str) -> (String, Vec<f64>) {
    let chars: Vec<char> = s.chars().collect();
    let mut skel = String::with_capacity(s.len());
    let mut nums = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next_is_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        if c.is_ascii_digit() || ((c == '-' || c == '.') && next_is_digit) {
            let start = i;
            let mut seen_dot = c == '.';
            i += 1;
            while i < chars.len() {
                let d = chars[i];
                if d.is_ascii_digit() {
                    i += 1;
                } else if d == '.' && !seen_dot {
                    seen_dot = true;
                    i += 1;
                } else {
                    break;
                }
            }
            let text: String = chars[start..i].iter().collect();
            match text.parse::<f64>() {
                Ok(n) => {
                    nums.push(n);
                    skel.push(SLOT);
                }
                Err(_) => skel.push_str(&text),
            }
        } else {
            skel.push(c);
            i += 1;
        }
    }
    (skel, nums)
}

fn fill_template(skel: &str, nums: &[f64]) -> String {
    let mut out = String::with_capacity(skel.len() + nums.len() * 4);
    let mut it = nums.iter();
    for c in skel.chars() {
        if c == SLOT {
            if let Some(n) = it.next() {
                out.push_str(&format_number(*n));
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Render with at most four decimals and no trailing zeros.
pub(crate) fn format_number(v: f64) -> String {
    let r = (v * 10_000.0).round() / 10_000.0;
    if r == r.trunc() {
        format!("{}", r as i64)
    } else {
        format!("{r}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(from: Keyframe, to: Keyframe) -> EffectSpec {
        EffectSpec {
            from,
            to,
            timing: EffectTiming {
                duration_ms: 1000.0,
                fill: FillMode::Forwards,
            },
        }
    }

    #[test]
    fn numbers_interpolate_linearly() {
        let s = spec(Keyframe::new().with("r", 10.0), Keyframe::new().with("r", 80.0));
        assert_eq!(s.sample("r", 0.0), Some(PropertyValue::Number(10.0)));
        assert_eq!(s.sample("r", 0.5), Some(PropertyValue::Number(45.0)));
        assert_eq!(s.sample("r", 1.0), Some(PropertyValue::Number(80.0)));
        assert_eq!(s.sample("cx", 0.5), None);
    }

    #[test]
    fn matching_templates_interpolate_per_number() {
        let s = spec(
            Keyframe::new().with("clipPath", "inset(0 100% 0 0)"),
            Keyframe::new().with("clipPath", "inset(0 0% 0 0)"),
        );
        assert_eq!(
            s.sample("clipPath", 0.25),
            Some(PropertyValue::from("inset(0 75% 0 0)"))
        );

        let s = spec(
            Keyframe::new().with("transform", "translate(0px, 0px) rotate(0deg)"),
            Keyframe::new().with("transform", "translate(50px, 50px) rotate(360deg)"),
        );
        assert_eq!(
            s.sample("transform", 0.5),
            Some(PropertyValue::from("translate(25px, 25px) rotate(180deg)"))
        );
    }

    #[test]
    fn mismatched_templates_switch_at_midpoint() {
        let s = spec(
            Keyframe::new().with("display", "none"),
            Keyframe::new().with("display", "block"),
        );
        assert_eq!(s.sample("display", 0.49), Some(PropertyValue::from("none")));
        assert_eq!(s.sample("display", 0.5), Some(PropertyValue::from("block")));
    }

    #[test]
    fn split_handles_signs_and_decimals() {
        let (skel, nums) = split_numbers("translate(-12.5px, .5px)");
        assert_eq!(nums, vec![-12.5, 0.5]);
        assert_eq!(fill_template(&skel, &nums), "translate(-12.5px, 0.5px)");
    }

    #[test]
    fn number_formatting_trims() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.75), "0.75");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
    }
}
