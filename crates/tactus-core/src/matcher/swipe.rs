use smallvec::SmallVec;

use crate::{
    EventStatus, GestureKind, InputData, ProcessStatus, Rule, SwipeRule,
    matcher::{Emission, MatchMode, Matcher, Session},
};

/// Fast flick, judged on the release sample only.
pub struct SwipeMatcher {
    rule: SwipeRule,
    emission: Emission,
}

impl Default for SwipeMatcher {
    fn default() -> Self {
        Self::new(SwipeRule::default())
    }
}

impl SwipeMatcher {
    pub fn new(rule: SwipeRule) -> Self {
        let emission = Emission::new(MatchMode::Instant, rule.event(), "SWIPE");
        Self { rule, emission }
    }

    pub fn rule(&self) -> &SwipeRule {
        &self.rule
    }
}

impl Matcher for SwipeMatcher {
    fn event(&self) -> &str {
        self.emission.event()
    }

    fn match_input(&mut self, session: &Session<'_>, data: &mut InputData) -> ProcessStatus {
        if data.status.contains(EventStatus::END)
            && data.distance > self.rule.threshold
            && data.direction.intersects(self.rule.direction)
            && data.velocity() > self.rule.velocity
        {
            data.gesture |= GestureKind::SWIPE;
            let directions: SmallVec<[&str; 2]> = data.direction.suffixes().collect();
            self.emission.emit(session.events, data, &directions);
            return ProcessStatus::HANDLED | ProcessStatus::END;
        }
        ProcessStatus::idle(data.status)
    }

    fn reset(&mut self) {}

    fn event_names(&self) -> Vec<String> {
        self.emission.names(EventStatus::END, self.rule.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawSample;
    use crate::matcher::testing::Harness;

    #[test]
    fn test_fast_release_swipes() {
        let mut h = Harness::new();
        let mut swipe = SwipeMatcher::default();
        h.listen(&swipe.event_names());

        assert_eq!(h.feed(&mut swipe, RawSample::start(0.0, 0.0, 0.0)), ProcessStatus::WAIT);
        assert_eq!(h.feed(&mut swipe, RawSample::moved(0.0, 30.0, 40.0)), ProcessStatus::WAIT);
        // 80px in 100ms = 0.8 px/ms
        let status = h.feed(&mut swipe, RawSample::end(0.0, 80.0, 100.0));
        assert_eq!(status, ProcessStatus::HANDLED | ProcessStatus::END);
        assert_eq!(h.take(), vec!["SWIPE_DOWN", "SWIPE_END", "SWIPE"]);
    }

    #[test]
    fn test_slow_release_does_not_swipe() {
        let mut h = Harness::new();
        let mut swipe = SwipeMatcher::default();
        h.listen(&swipe.event_names());

        h.feed(&mut swipe, RawSample::start(0.0, 0.0, 0.0));
        // 50px in 1000ms = 0.05 px/ms
        assert_eq!(h.feed(&mut swipe, RawSample::end(50.0, 0.0, 1000.0)), ProcessStatus::END);
        assert!(h.take().is_empty());
    }

    #[test]
    fn test_zero_duration_release_does_not_swipe() {
        let mut h = Harness::new();
        let mut swipe = SwipeMatcher::default();
        h.listen(&swipe.event_names());

        h.feed(&mut swipe, RawSample::start(0.0, 0.0, 5.0));
        assert_eq!(h.feed(&mut swipe, RawSample::end(90.0, 0.0, 5.0)), ProcessStatus::END);
        assert!(h.take().is_empty());
    }

    #[test]
    fn test_cancel_ends_without_firing() {
        let mut h = Harness::new();
        let mut swipe = SwipeMatcher::default();
        h.listen(&swipe.event_names());

        h.feed(&mut swipe, RawSample::start(0.0, 0.0, 0.0));
        assert_eq!(h.feed(&mut swipe, RawSample::cancel(90.0, 0.0, 20.0)), ProcessStatus::END);
        assert!(h.take().is_empty());
    }
}
