use crate::{Direction, ElementPath, EventStatus, GestureKind, PointerKind, RawSample, Vec2};

/// One enriched sample, built fresh by the derivation pipeline for every raw
/// sample and handed to each matcher of a dispatch cycle.
///
/// Kinematic fields are relative to the session anchor, not to the previous
/// sample; only `speed` is a frame-to-frame value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputData {
    pub path: ElementPath,
    /// Milliseconds on the host's clock.
    pub time: f64,
    /// Gestures recognised for this sample so far.
    pub gesture: GestureKind,
    pub pointer: PointerKind,
    pub status: EventStatus,
    pub delta: Vec2,
    /// Radians, counter-clockwise positive with +y pointing down the screen.
    pub bearing: f32,
    pub direction: Direction,
    pub distance: f32,
    /// Milliseconds since the anchor.
    pub duration: f64,
    pub center: Vec2,
    /// Pixels per millisecond between the previous and this sample.
    pub speed: f32,
    // Multi-pointer and stylus fields; filled by hosts that have them.
    pub angle: f32,
    pub diameter: f32,
    pub pressure: f32,
    pub tilt: Vec2,
}

impl InputData {
    /// Copies what the raw sample knows; kinematics are left zeroed.
    pub fn from_sample(raw: &RawSample) -> Self {
        Self {
            path: raw.path.clone(),
            time: raw.timestamp,
            pointer: raw.pointer,
            status: raw.kind.into(),
            center: raw.center,
            pressure: raw.pressure,
            tilt: raw.tilt,
            ..Default::default()
        }
    }

    /// Average speed since the anchor in px/ms, zero when no time has passed.
    pub fn velocity(&self) -> f32 {
        if self.duration > 0.0 {
            self.distance / self.duration as f32
        } else {
            0.0
        }
    }
}
