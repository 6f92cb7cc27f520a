use smallvec::SmallVec;

use crate::{
    EventStatus, GestureKind, InputData, PanRule, ProcessStatus, Rule,
    matcher::{Emission, MatchMode, Matcher, Session},
};

/// Continuous drag. Confirms once travel exceeds `rule.threshold` in an
/// allowed direction, then reports every sample until the session ends.
pub struct PanMatcher {
    rule: PanRule,
    emission: Emission,
    // Held until the pan confirms, then emitted retroactively as the START.
    anchor: Option<InputData>,
}

impl Default for PanMatcher {
    fn default() -> Self {
        Self::new(PanRule::default())
    }
}

impl PanMatcher {
    pub fn new(rule: PanRule) -> Self {
        let emission = Emission::new(MatchMode::Continuous, rule.event(), "PAN");
        Self {
            rule,
            emission,
            anchor: None,
        }
    }

    pub fn rule(&self) -> &PanRule {
        &self.rule
    }

    /// True until the pan of the current session has confirmed.
    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }
}

impl Matcher for PanMatcher {
    fn event(&self) -> &str {
        self.emission.event()
    }

    fn match_input(&mut self, session: &Session<'_>, data: &mut InputData) -> ProcessStatus {
        if data.status.contains(EventStatus::START) {
            self.anchor = Some(data.clone());
        }
        let confirmed = self.anchor.is_none() || data.distance > self.rule.threshold;
        if confirmed
            && !data.status.is_empty()
            && data.direction.intersects(self.rule.direction)
        {
            data.gesture |= GestureKind::PAN;
            if let Some(mut anchor) = self.anchor.take() {
                anchor.gesture |= GestureKind::PAN;
                self.emission.emit(session.events, &anchor, &[]);
            }
            let directions: SmallVec<[&str; 2]> = data.direction.suffixes().collect();
            self.emission.emit(session.events, data, &directions);
            return ProcessStatus::HANDLED | ProcessStatus::settle(data.status);
        }
        ProcessStatus::idle(data.status)
    }

    fn reset(&mut self) {
        self.anchor = None;
    }

    fn event_names(&self) -> Vec<String> {
        self.emission.names(EventStatus::all(), self.rule.direction)
    }
}
