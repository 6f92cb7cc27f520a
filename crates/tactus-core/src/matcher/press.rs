use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{
    Direction, EventStatus, GestureKind, InputData, PressRule, ProcessStatus, Rule, Timer,
    TimerHandle,
    matcher::{Emission, MatchMode, Matcher, Session},
};

/// Stationary hold for at least `rule.time` ms.
///
/// Without `auto` the press fires on the first sample that arrives after the
/// hold time. With `auto` every non-terminal sample re-arms a deferred
/// callback for the remaining hold time that fires with the last seen sample,
/// so the press also fires when the pointer stays perfectly still. The next
/// sample after a deferred fire reports `HANDLED` so the press keeps the
/// session.
pub struct PressMatcher {
    rule: PressRule,
    emission: Emission,
    // Shared with the deferred callback, which clears it when it fires.
    anchor: Rc<RefCell<Option<InputData>>>,
    // Set by the deferred callback; the next sample claims the session.
    fired: Rc<Cell<bool>>,
    pending: Option<Pending>,
}

struct Pending {
    handle: TimerHandle,
    timer: Rc<dyn Timer>,
}

impl Default for PressMatcher {
    fn default() -> Self {
        Self::new(PressRule::default())
    }
}

impl PressMatcher {
    pub fn new(rule: PressRule) -> Self {
        let emission = Emission::new(MatchMode::Instant, rule.event(), "PRESS");
        Self {
            rule,
            emission,
            anchor: Rc::default(),
            fired: Rc::default(),
            pending: None,
        }
    }

    pub fn rule(&self) -> &PressRule {
        &self.rule
    }

    pub fn is_anchored(&self) -> bool {
        self.anchor.borrow().is_some()
    }

    /// A deferred auto-fire is scheduled.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn clear_timer(&mut self) {
        if let Some(p) = self.pending.take() {
            p.timer.cancel(p.handle);
        }
    }

    fn arm(&mut self, session: &Session<'_>, data: &InputData) {
        self.clear_timer();
        let events = session.events.clone();
        let emission = self.emission.clone();
        let anchor = Rc::clone(&self.anchor);
        let fired = Rc::clone(&self.fired);
        let mut last = data.clone();
        let delay = self.rule.time - data.duration;
        let handle = session.timer.schedule(
            delay,
            Box::new(move || {
                if anchor.borrow_mut().take().is_none() {
                    return;
                }
                fired.set(true);
                last.gesture |= GestureKind::PRESS;
                last.status = EventStatus::END;
                log::trace!("press auto-fire at t={}", last.time);
                emission.emit(&events, &last, &[]);
            }),
        );
        self.pending = Some(Pending {
            handle,
            timer: Rc::clone(session.timer),
        });
    }
}

impl Matcher for PressMatcher {
    fn event(&self) -> &str {
        self.emission.event()
    }

    fn match_input(&mut self, session: &Session<'_>, data: &mut InputData) -> ProcessStatus {
        if data.status.contains(EventStatus::START) {
            *self.anchor.borrow_mut() = Some(data.clone());
            self.fired.set(false);
        }
        if self.fired.replace(false) {
            self.pending = None;
            return ProcessStatus::HANDLED | ProcessStatus::settle(data.status);
        }
        if self.is_anchored() && data.distance < self.rule.threshold {
            if !data.status.contains(EventStatus::CANCEL) && data.duration > self.rule.time {
                self.clear_timer();
                data.gesture |= GestureKind::PRESS;
                self.emission.emit(session.events, data, &[]);
                self.anchor.borrow_mut().take();
                return ProcessStatus::HANDLED | ProcessStatus::settle(data.status);
            }
            if self.rule.auto && !data.status.is_terminal() {
                self.arm(session, data);
            }
        } else if !data.status.is_terminal() {
            // Left the threshold: never fire with an older sample.
            self.clear_timer();
        }
        if data.status.is_terminal() {
            self.clear_timer();
            return ProcessStatus::END;
        }
        ProcessStatus::WAIT
    }

    fn reset(&mut self) {
        self.anchor.borrow_mut().take();
        self.fired.set(false);
        self.clear_timer();
    }

    fn event_names(&self) -> Vec<String> {
        self.emission
            .names(EventStatus::MOVE | EventStatus::END, Direction::NONE)
    }
}

impl Drop for PressMatcher {
    fn drop(&mut self) {
        self.clear_timer();
    }
}
