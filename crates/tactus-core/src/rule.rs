//! Per-matcher rule configuration.
//!
//! `Default` is the static rule of each matcher. Override single fields with
//! struct-update syntax:
//!
//! ```rust
//! use tactus_core::TapRule;
//!
//! let rule = TapRule {
//!     threshold: 4.0,
//!     ..TapRule::default()
//! };
//! assert_eq!(rule.duration, 250.0);
//! ```
//!
//! With the `serde` feature a partial document deserializes over the same
//! defaults, so every field a rule declares is always present.

use crate::Direction;

/// Fields every rule shares.
pub trait Rule {
    /// Event identifier; also the matcher's identity inside a pool.
    fn event(&self) -> &str;
    /// Carried for configuration parity; no matcher repeats yet.
    fn repeat(&self) -> Option<u32>;
}

macro_rules! impl_rule {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Rule for $ty {
                fn event(&self) -> &str {
                    &self.event
                }
                fn repeat(&self) -> Option<u32> {
                    self.repeat
                }
            }
        )*
    };
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TapRule {
    pub event: String,
    pub repeat: Option<u32>,
    /// Reserved for multi-tap, ms between taps.
    pub interval: f64,
    /// Longest press that still counts as a tap, ms.
    pub duration: f64,
    /// Reserved for multi-tap.
    pub taps: u32,
    /// Travel must stay below this many pixels.
    pub threshold: f32,
    pub pointers: u32,
    /// Reserved for multi-tap, px between taps.
    pub tolerance: f32,
}

impl Default for TapRule {
    fn default() -> Self {
        Self {
            event: "TAP".into(),
            repeat: None,
            interval: 250.0,
            duration: 250.0,
            taps: 1,
            threshold: 10.0,
            pointers: 1,
            tolerance: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PressRule {
    pub event: String,
    pub repeat: Option<u32>,
    /// Fire from a timer when the pointer goes quiet before `time` elapses.
    pub auto: bool,
    /// Hold time, ms.
    pub time: f64,
    pub threshold: f32,
    pub pointers: u32,
}

impl Default for PressRule {
    fn default() -> Self {
        Self {
            event: "PRESS".into(),
            repeat: None,
            auto: false,
            time: 251.0,
            threshold: 10.0,
            pointers: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanRule {
    pub event: String,
    pub repeat: Option<u32>,
    /// Travel needed before the pan confirms, px.
    pub threshold: f32,
    pub pointers: u32,
    pub direction: Direction,
}

impl Default for PanRule {
    fn default() -> Self {
        Self {
            event: "PAN".into(),
            repeat: None,
            threshold: 10.0,
            pointers: 1,
            direction: Direction::ALL,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SwipeRule {
    pub event: String,
    pub repeat: Option<u32>,
    pub threshold: f32,
    pub pointers: u32,
    /// Minimum average speed, px/ms.
    pub velocity: f32,
    pub direction: Direction,
}

impl Default for SwipeRule {
    fn default() -> Self {
        Self {
            event: "SWIPE".into(),
            repeat: None,
            threshold: 10.0,
            pointers: 1,
            velocity: 0.3,
            direction: Direction::ALL,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FocusBlurRule {
    pub event: String,
    pub repeat: Option<u32>,
    pub focus: String,
    pub blur: String,
}

impl Default for FocusBlurRule {
    fn default() -> Self {
        Self {
            event: "FOCUSBLUR".into(),
            repeat: None,
            focus: "FOCUS".into(),
            blur: "BLUR".into(),
        }
    }
}

impl_rule!(TapRule, PressRule, PanRule, SwipeRule, FocusBlurRule);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_update_keeps_defaults() {
        let rule = PressRule {
            auto: true,
            ..PressRule::default()
        };
        assert!(rule.auto);
        assert_eq!(rule.time, 251.0);
        assert_eq!(rule.event(), "PRESS");
        assert_eq!(rule.repeat(), None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(SwipeRule::default().velocity, 0.3);
        assert_eq!(PanRule::default().direction, Direction::ALL);
        assert_eq!(TapRule::default().threshold, 10.0);
        assert_eq!(FocusBlurRule::default().focus, "FOCUS");
    }
}
