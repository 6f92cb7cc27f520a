use crate::{
    FocusBlurRule, InputData, ProcessStatus, Rule,
    matcher::{Matcher, Session},
};

/// Global matcher tracking whether samples land inside the watched element.
///
/// Emits the focus event when a sample path first contains the element and
/// the blur event on the next sample whose path does not; the blur also ends
/// the global pool. Sample phase is ignored.
pub struct FocusBlurMatcher {
    rule: FocusBlurRule,
    status: ProcessStatus,
}

impl Default for FocusBlurMatcher {
    fn default() -> Self {
        Self::new(FocusBlurRule::default())
    }
}

impl FocusBlurMatcher {
    pub fn new(rule: FocusBlurRule) -> Self {
        Self {
            rule,
            status: ProcessStatus::NONE,
        }
    }

    pub fn is_focused(&self) -> bool {
        self.status == ProcessStatus::ACTIVE
    }
}

impl Matcher for FocusBlurMatcher {
    fn event(&self) -> &str {
        self.rule.event()
    }

    fn is_global(&self) -> bool {
        true
    }

    fn match_input(&mut self, session: &Session<'_>, data: &mut InputData) -> ProcessStatus {
        if session.tree.path_contains(&data.path, session.element) {
            if self.status == ProcessStatus::NONE {
                self.status = ProcessStatus::ACTIVE;
                session.events.emit(&self.rule.focus, data);
            }
        } else if self.status == ProcessStatus::ACTIVE {
            self.status = ProcessStatus::END;
            session.events.emit(&self.rule.blur, data);
        }
        self.status
    }

    fn reset(&mut self) {
        self.status = ProcessStatus::NONE;
    }

    fn event_names(&self) -> Vec<String> {
        vec![self.rule.focus.clone(), self.rule.blur.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::testing::Harness;
    use crate::{ElementId, RawSample};

    #[test]
    fn test_focus_then_blur() {
        let mut h = Harness::new();
        let mut fb = FocusBlurMatcher::default();
        h.listen(&fb.event_names());

        let inside = [ElementId(7), ElementId(1), ElementId(0)];
        let outside = [ElementId(9), ElementId(0)];

        let status = h.feed(&mut fb, RawSample::start(0.0, 0.0, 0.0).with_path(inside));
        assert_eq!(status, ProcessStatus::ACTIVE);
        assert!(fb.is_focused());
        // still inside: no second focus
        h.feed(&mut fb, RawSample::end(0.0, 0.0, 10.0).with_path(inside));
        assert_eq!(h.take(), vec!["FOCUS"]);

        let status = h.feed(&mut fb, RawSample::start(5.0, 5.0, 100.0).with_path(outside));
        assert_eq!(status, ProcessStatus::END);
        assert_eq!(h.take(), vec!["BLUR"]);

        fb.reset();
        fb.reset();
        assert!(!fb.is_focused());
        let status = h.feed(&mut fb, RawSample::start(5.0, 5.0, 200.0).with_path(outside));
        assert_eq!(status, ProcessStatus::NONE);
        assert!(h.take().is_empty());
    }
}
