//! # Matchers
//!
//! A matcher is one recogniser. The watcher feeds it every [`InputData`] of a
//! session through [`Matcher::match_input`] and folds the returned
//! [`ProcessStatus`] values:
//!
//! - `WAIT` — undecided, keep sending samples.
//! - `ACTIVE` — this matcher owns the rest of the session.
//! - `HANDLED` — the sample was consumed; later matchers don't see it.
//! - `END` / `CANCEL` — the session is over for the whole pool.
//!
//! Matchers in the element pool run in registration order and the first
//! `ACTIVE` or `HANDLED` wins. Global matchers (focus/blur) all run on every
//! sample they receive.
//!
//! Event naming is shared through [`Emission`]: a matcher using its default
//! event name emits phase and direction suffixed variants next to the base
//! name, a renamed matcher only emits its custom name.

mod focus_blur;
mod pan;
mod press;
mod swipe;
mod tap;

pub use focus_blur::FocusBlurMatcher;
pub use pan::PanMatcher;
pub use press::PressMatcher;
pub use swipe::SwipeMatcher;
pub use tap::TapMatcher;

use std::rc::Rc;

use smallvec::SmallVec;

use crate::{
    Direction, ElementId, ElementTree, EventStatus, EventTable, InputData, ProcessStatus, Timer,
    event_name,
};

/// Everything a matcher may touch besides its own state.
pub struct Session<'a> {
    /// Element the owning watcher is attached to.
    pub element: ElementId,
    pub events: &'a EventTable,
    pub timer: &'a Rc<dyn Timer>,
    pub tree: &'a dyn ElementTree,
}

pub trait Matcher {
    /// Identifier, unique within a pool.
    fn event(&self) -> &str;

    /// Global matchers see every sample of the host, not only this element's.
    fn is_global(&self) -> bool {
        false
    }

    /// Evaluates one sample. May OR a gesture bit into `data` before emitting.
    fn match_input(&mut self, session: &Session<'_>, data: &mut InputData) -> ProcessStatus;

    /// Clears per-session state and cancels pending callbacks. Idempotent.
    fn reset(&mut self);

    /// Every event name this matcher can ever emit.
    fn event_names(&self) -> Vec<String>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// The base event fires once, on the END sample.
    Instant,
    /// The base event fires on every matching sample.
    Continuous,
}

/// Event naming shared by the rule-driven matchers.
#[derive(Clone, Debug)]
pub struct Emission {
    mode: MatchMode,
    event: String,
    default_event: bool,
}

impl Emission {
    /// `event` is the rule's name; empty or equal to `default` selects the
    /// suffixed naming scheme.
    pub fn new(mode: MatchMode, event: &str, default: &str) -> Self {
        let default_event = event.is_empty() || event == default;
        Self {
            mode,
            event: if default_event { default } else { event }.to_string(),
            default_event,
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    /// Names fired for `data`, in firing order: `extra` suffixes, the phase
    /// suffix, then the base name.
    pub fn fired_names(&self, data: &InputData, extra: &[&str]) -> SmallVec<[String; 4]> {
        let mut names = SmallVec::new();
        if !self.default_event {
            names.push(self.event.clone());
            return names;
        }
        for suffix in extra {
            names.push(event_name(&self.event, suffix));
        }
        names.push(event_name(&self.event, data.status.suffix()));
        if self.mode == MatchMode::Continuous || data.status == EventStatus::END {
            names.push(self.event.clone());
        }
        names
    }

    pub fn emit(&self, events: &EventTable, data: &InputData, extra: &[&str]) {
        for name in self.fired_names(data, extra) {
            events.emit(&name, data);
        }
    }

    /// Every name reachable with samples in `phases` and `directions` bits.
    pub fn names(&self, phases: EventStatus, directions: Direction) -> Vec<String> {
        if !self.default_event {
            return vec![self.event.clone()];
        }
        let mut names: Vec<String> = directions
            .suffixes()
            .map(|s| event_name(&self.event, s))
            .collect();
        for phase in phases.iter() {
            names.push(event_name(&self.event, phase.suffix()));
        }
        if self.mode == MatchMode::Continuous || phases.contains(EventStatus::END) {
            names.push(self.event.clone());
        }
        names
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: EventStatus) -> InputData {
        InputData {
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_instant_base_fires_on_end_only() {
        let e = Emission::new(MatchMode::Instant, "TAP", "TAP");
        assert_eq!(
            e.fired_names(&sample(EventStatus::MOVE), &[]).to_vec(),
            vec!["TAP_MOVE"]
        );
        assert_eq!(
            e.fired_names(&sample(EventStatus::END), &["LEFT"]).to_vec(),
            vec!["TAP_LEFT", "TAP_END", "TAP"]
        );
    }

    #[test]
    fn test_continuous_base_fires_every_time() {
        let e = Emission::new(MatchMode::Continuous, "", "PAN");
        assert_eq!(e.event(), "PAN");
        assert_eq!(
            e.fired_names(&sample(EventStatus::START), &[]).to_vec(),
            vec!["PAN_START", "PAN"]
        );
    }

    #[test]
    fn test_custom_name_has_no_suffixes() {
        let e = Emission::new(MatchMode::Continuous, "drag", "PAN");
        assert_eq!(
            e.fired_names(&sample(EventStatus::MOVE), &["RIGHT"]).to_vec(),
            vec!["drag"]
        );
        assert_eq!(e.names(EventStatus::all(), Direction::ALL), vec!["drag"]);
    }

    #[test]
    fn test_static_names() {
        let e = Emission::new(MatchMode::Instant, "SWIPE", "SWIPE");
        assert_eq!(
            e.names(EventStatus::END, Direction::HORIZONTAL),
            vec!["SWIPE_LEFT", "SWIPE_RIGHT", "SWIPE_END", "SWIPE"]
        );
    }
}
