use crate::{
    Direction, EventStatus, GestureKind, InputData, ProcessStatus, Rule, TapRule,
    matcher::{Emission, MatchMode, Matcher, Session},
};

/// Short, nearly stationary press-and-release.
pub struct TapMatcher {
    rule: TapRule,
    emission: Emission,
    anchor: Option<InputData>,
}

impl Default for TapMatcher {
    fn default() -> Self {
        Self::new(TapRule::default())
    }
}

impl TapMatcher {
    pub fn new(rule: TapRule) -> Self {
        let emission = Emission::new(MatchMode::Instant, rule.event(), "TAP");
        Self {
            rule,
            emission,
            anchor: None,
        }
    }

    pub fn rule(&self) -> &TapRule {
        &self.rule
    }

    /// Start sample of the current session, if this matcher saw it.
    pub fn anchor(&self) -> Option<&InputData> {
        self.anchor.as_ref()
    }
}

impl Matcher for TapMatcher {
    fn event(&self) -> &str {
        self.emission.event()
    }

    fn match_input(&mut self, session: &Session<'_>, data: &mut InputData) -> ProcessStatus {
        if data.status.contains(EventStatus::START) {
            self.anchor = Some(data.clone());
        }
        if data.status.contains(EventStatus::END)
            && data.distance < self.rule.threshold
            && data.duration < self.rule.duration
        {
            data.gesture |= GestureKind::TAP;
            self.emission.emit(session.events, data, &[]);
            return ProcessStatus::HANDLED | ProcessStatus::END;
        }
        ProcessStatus::idle(data.status)
    }

    fn reset(&mut self) {
        self.anchor = None;
    }

    fn event_names(&self) -> Vec<String> {
        self.emission.names(EventStatus::END, Direction::NONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawSample;
    use crate::matcher::testing::Harness;

    #[test]
    fn test_quick_release_taps() {
        let mut h = Harness::new();
        let mut tap = TapMatcher::default();
        h.listen(&tap.event_names());

        assert_eq!(h.feed(&mut tap, RawSample::start(0.0, 0.0, 0.0)), ProcessStatus::WAIT);
        assert!(tap.anchor().is_some());
        let status = h.feed(&mut tap, RawSample::end(5.0, 3.0, 100.0));
        assert_eq!(status, ProcessStatus::HANDLED | ProcessStatus::END);
        assert_eq!(h.take(), vec!["TAP_END", "TAP"]);
    }

    #[test]
    fn test_slow_or_far_release_is_dead() {
        let mut h = Harness::new();
        let mut tap = TapMatcher::default();
        h.listen(&tap.event_names());

        h.feed(&mut tap, RawSample::start(0.0, 0.0, 0.0));
        assert_eq!(h.feed(&mut tap, RawSample::end(2.0, 0.0, 400.0)), ProcessStatus::END);

        h.feed(&mut tap, RawSample::start(0.0, 0.0, 1000.0));
        assert_eq!(h.feed(&mut tap, RawSample::moved(30.0, 0.0, 1010.0)), ProcessStatus::WAIT);
        assert_eq!(h.feed(&mut tap, RawSample::end(30.0, 0.0, 1020.0)), ProcessStatus::END);

        h.feed(&mut tap, RawSample::start(0.0, 0.0, 2000.0));
        assert_eq!(h.feed(&mut tap, RawSample::cancel(0.0, 0.0, 2010.0)), ProcessStatus::END);
        assert!(h.take().is_empty());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut h = Harness::new();
        let mut tap = TapMatcher::new(TapRule {
            event: "click".into(),
            ..TapRule::default()
        });
        h.feed(&mut tap, RawSample::start(0.0, 0.0, 0.0));
        tap.reset();
        assert!(tap.anchor().is_none());
        tap.reset();
        assert!(tap.anchor().is_none());
        assert_eq!(tap.event_names(), vec!["click"]);
    }
}
