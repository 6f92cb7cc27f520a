pub use crate::config::{BlockMode, WatcherConfig};
pub use crate::data::InputData;
pub use crate::emitter::{EventTable, Handler, event_name, handler};
pub use crate::error::GestureError;
pub use crate::geometry::Vec2;
pub use crate::input::{ElementId, ElementPath, PointerKind, RawSample, SampleKind};
pub use crate::matcher::{
    FocusBlurMatcher, Matcher, PanMatcher, PressMatcher, SwipeMatcher, TapMatcher,
};
pub use crate::pipeline::DirectionPolicy;
pub use crate::rule::{FocusBlurRule, PanRule, PressRule, Rule, SwipeRule, TapRule};
pub use crate::source::{Channel, ElementTree, SampleSource, WatcherKey};
pub use crate::status::{Direction, EventStatus, GestureKind, ProcessStatus};
pub use crate::timer::{Timer, TimerHandle};
pub use crate::watcher::{Services, Watcher};
