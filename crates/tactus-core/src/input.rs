use smallvec::SmallVec;

use crate::{EventStatus, Vec2};

/// Opaque handle for a host element. The host decides what the number means.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Elements under the pointer, most specific first.
pub type ElementPath = SmallVec<[ElementId; 8]>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PointerKind {
    #[default]
    Unknown,
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SampleKind {
    /// Pointer down; opens a session.
    Start,
    Move,
    /// Pointer up.
    End,
    Cancel,
}

impl From<SampleKind> for EventStatus {
    fn from(kind: SampleKind) -> Self {
        match kind {
            SampleKind::Start => EventStatus::START,
            SampleKind::Move => EventStatus::MOVE,
            SampleKind::End => EventStatus::END,
            SampleKind::Cancel => EventStatus::CANCEL,
        }
    }
}

/// One raw pointer sample as delivered by the host.
#[derive(Clone, Debug)]
pub struct RawSample {
    pub kind: SampleKind,
    pub pointer: PointerKind,
    /// Milliseconds on the host's clock.
    pub timestamp: f64,
    pub center: Vec2,
    pub path: ElementPath,
    pub pressure: f32,
    pub tilt: Vec2,
    consumed: bool,
}

impl RawSample {
    pub fn new(kind: SampleKind, center: Vec2, timestamp: f64) -> Self {
        Self {
            kind,
            pointer: PointerKind::Unknown,
            timestamp,
            center,
            path: ElementPath::new(),
            pressure: 0.0,
            tilt: Vec2::ZERO,
            consumed: false,
        }
    }

    pub fn start(x: f32, y: f32, timestamp: f64) -> Self {
        Self::new(SampleKind::Start, Vec2::new(x, y), timestamp)
    }

    pub fn moved(x: f32, y: f32, timestamp: f64) -> Self {
        Self::new(SampleKind::Move, Vec2::new(x, y), timestamp)
    }

    pub fn end(x: f32, y: f32, timestamp: f64) -> Self {
        Self::new(SampleKind::End, Vec2::new(x, y), timestamp)
    }

    pub fn cancel(x: f32, y: f32, timestamp: f64) -> Self {
        Self::new(SampleKind::Cancel, Vec2::new(x, y), timestamp)
    }

    pub fn with_path(mut self, path: impl IntoIterator<Item = ElementId>) -> Self {
        self.path = path.into_iter().collect();
        self
    }

    pub fn with_pointer(mut self, pointer: PointerKind) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_pressure(mut self, pressure: f32, tilt: Vec2) -> Self {
        self.pressure = pressure;
        self.tilt = tilt;
        self
    }

    /// Side channel telling later watchers that this sample is taken.
    pub fn mark_consumed(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}
