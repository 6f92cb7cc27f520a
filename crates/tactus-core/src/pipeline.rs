//! Turns raw samples into [`InputData`] relative to the session anchor.

use crate::{Direction, InputData, RawSample, SampleKind, Vec2};

/// How a delta vector maps onto [`Direction`] bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DirectionPolicy {
    /// Only the dominant axis contributes a bit; vertical wins ties.
    Mutex,
    /// Each axis contributes independently, up to one bit per axis.
    #[default]
    Tolerant,
}

impl DirectionPolicy {
    pub fn classify(self, delta: Vec2) -> Direction {
        match self {
            DirectionPolicy::Tolerant => horizontal(delta.x) | vertical(delta.y),
            DirectionPolicy::Mutex => {
                if delta.x.abs() > delta.y.abs() {
                    horizontal(delta.x)
                } else {
                    vertical(delta.y)
                }
            }
        }
    }
}

fn horizontal(dx: f32) -> Direction {
    if dx > 0.0 {
        Direction::RIGHT
    } else if dx < 0.0 {
        Direction::LEFT
    } else {
        Direction::NONE
    }
}

fn vertical(dy: f32) -> Direction {
    if dy > 0.0 {
        Direction::DOWN
    } else if dy < 0.0 {
        Direction::UP
    } else {
        Direction::NONE
    }
}

/// Derives one [`InputData`] from `raw`.
///
/// A start sample yields a record with zeroed kinematics that should become
/// the new anchor. Any other sample is measured against `anchor`.
///
/// # Panics
///
/// When `raw` is not a start sample and there is no anchor: the sample
/// source delivered a continuation without opening a session first.
pub fn derive(anchor: Option<&InputData>, raw: &RawSample, policy: DirectionPolicy) -> InputData {
    let mut data = InputData::from_sample(raw);
    if raw.kind == SampleKind::Start {
        return data;
    }
    let Some(anchor) = anchor else {
        panic!(
            "{:?} sample at t={} derived without a session anchor",
            raw.kind, raw.timestamp
        );
    };
    data.duration = data.time - anchor.time;
    data.delta = Vec2::delta(anchor.center, data.center);
    data.distance = Vec2::distance(anchor.center, data.center);
    data.bearing = -Vec2::bearing(anchor.center, data.center);
    data.direction = policy.classify(data.delta);
    data
}

/// Keeps the anchor and the previous sample of the current session.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    anchor: Option<InputData>,
    last: Option<(f64, Vec2)>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<&InputData> {
        self.anchor.as_ref()
    }

    pub fn derive(&mut self, raw: &RawSample, policy: DirectionPolicy) -> InputData {
        let mut data = derive(self.anchor.as_ref(), raw, policy);
        data.speed = match self.last {
            Some((time, center)) if raw.kind != SampleKind::Start && data.time > time => {
                Vec2::distance(center, data.center) / (data.time - time) as f32
            }
            _ => 0.0,
        };
        self.last = Some((data.time, data.center));
        if raw.kind == SampleKind::Start {
            self.anchor = Some(data.clone());
        }
        data
    }

    pub fn clear(&mut self) {
        self.anchor = None;
        self.last = None;
    }
}
