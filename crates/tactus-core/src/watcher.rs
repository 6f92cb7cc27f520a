//! # Watcher
//!
//! One gesture session per element. A watcher owns two matcher pools:
//!
//! - the element pool, started by a start sample on the element and fed the
//!   continuation samples of that session;
//! - the global pool (focus/blur), which keeps receiving start samples from
//!   anywhere in the host until one of its matchers ends it.
//!
//! ```rust
//! use std::rc::Rc;
//! use tactus_core::*;
//!
//! # struct NoTimer;
//! # impl Timer for NoTimer {
//! #     fn schedule(&self, _: f64, _: Box<dyn FnOnce()>) -> TimerHandle { TimerHandle::default() }
//! #     fn cancel(&self, _: TimerHandle) {}
//! # }
//! let services = Services::new(Rc::new(NoTimer), Rc::new(Detached));
//! let mut watcher = Watcher::new(
//!     WatcherKey::default(),
//!     ElementId(1),
//!     WatcherConfig::default(),
//!     services,
//! );
//! watcher.add(Box::new(TapMatcher::default())).unwrap();
//!
//! let taps = Rc::new(std::cell::Cell::new(0));
//! let counter = taps.clone();
//! watcher.on("TAP", handler(move |_| counter.set(counter.get() + 1)));
//!
//! watcher.handle(&mut RawSample::start(0.0, 0.0, 0.0));
//! watcher.handle(&mut RawSample::end(3.0, 2.0, 90.0));
//! assert_eq!(taps.get(), 1);
//! ```

use std::rc::Rc;

use crate::{
    BlockMode, Channel, ComposedPath, ElementId, ElementTree, EventStatus, EventTable,
    GestureError, Handler, InputData, Matcher, Pipeline, ProcessStatus, RawSample, SampleKind,
    SampleSource, Session, Timer, WatcherConfig, WatcherKey,
};

/// Host collaborators a watcher talks to.
#[derive(Clone)]
pub struct Services {
    pub timer: Rc<dyn Timer>,
    pub source: Rc<dyn SampleSource>,
    pub tree: Rc<dyn ElementTree>,
}

impl Services {
    pub fn new(timer: Rc<dyn Timer>, source: Rc<dyn SampleSource>) -> Self {
        Self {
            timer,
            source,
            tree: Rc::new(ComposedPath),
        }
    }

    pub fn with_tree(mut self, tree: Rc<dyn ElementTree>) -> Self {
        self.tree = tree;
        self
    }
}

pub struct Watcher {
    key: WatcherKey,
    element: ElementId,
    config: WatcherConfig,
    services: Services,
    status: ProcessStatus,
    status_global: ProcessStatus,
    pipeline: Pipeline,
    matchers: Vec<Box<dyn Matcher>>,
    matchers_global: Vec<Box<dyn Matcher>>,
    // Index into `matchers` of the matcher that owns the session.
    active: Option<usize>,
    events: EventTable,
}

impl Watcher {
    pub fn new(
        key: WatcherKey,
        element: ElementId,
        config: WatcherConfig,
        services: Services,
    ) -> Self {
        Self {
            key,
            element,
            config,
            services,
            status: ProcessStatus::NONE,
            status_global: ProcessStatus::NONE,
            pipeline: Pipeline::new(),
            matchers: Vec::new(),
            matchers_global: Vec::new(),
            active: None,
            events: EventTable::new(),
        }
    }

    pub fn key(&self) -> WatcherKey {
        self.key
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Takes effect from the next sample.
    pub fn update_config(&mut self, config: WatcherConfig) {
        self.config = config;
    }

    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    pub fn status_global(&self) -> ProcessStatus {
        self.status_global
    }

    /// Event identifier of the matcher that owns the current session.
    pub fn active_matcher(&self) -> Option<&str> {
        self.active.map(|i| self.matchers[i].event())
    }

    pub fn events(&self) -> &EventTable {
        &self.events
    }

    /// Registers a matcher in its pool. A second matcher with the same event
    /// identifier in the same pool is rejected; the first one stays.
    pub fn add(&mut self, matcher: Box<dyn Matcher>) -> Result<(), GestureError> {
        if matcher.is_global() && !self.config.global {
            log::warn!(
                "global matcher `{}` on {:?} stays idle until `global` is set",
                matcher.event(),
                self.element
            );
        }
        let pool = if matcher.is_global() {
            &mut self.matchers_global
        } else {
            &mut self.matchers
        };
        if pool.iter().any(|m| m.event() == matcher.event()) {
            log::warn!("trying to add a second matcher for event `{}`", matcher.event());
            return Err(GestureError::DuplicateMatcher {
                event: matcher.event().to_string(),
            });
        }
        pool.push(matcher);
        Ok(())
    }

    /// Unregisters the matcher with event identifier `event`. A live pool is
    /// reset first.
    pub fn remove(&mut self, global: bool, event: &str) -> Result<Box<dyn Matcher>, GestureError> {
        let pool = if global {
            &self.matchers_global
        } else {
            &self.matchers
        };
        let Some(index) = pool.iter().position(|m| m.event() == event) else {
            log::error!("no matcher registered for event `{event}`");
            return Err(GestureError::UnknownMatcher {
                event: event.to_string(),
            });
        };
        if global {
            if self.status_global.is_live() {
                self.reset_global();
            }
            Ok(self.matchers_global.remove(index))
        } else {
            if self.status.is_live() {
                self.reset();
            }
            Ok(self.matchers.remove(index))
        }
    }

    pub fn matcher_count(&self) -> usize {
        self.matchers.len() + self.matchers_global.len()
    }

    /// Every event name the registered matchers can emit, registration order.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for m in self.matchers.iter().chain(&self.matchers_global) {
            for name in m.event_names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Registers `handler` under each space separated name.
    pub fn on(&self, names: &str, handler: Handler) {
        self.events.on(names, handler);
    }

    pub fn off(&self, names: &str, handler: &Handler) -> Result<(), GestureError> {
        self.events.off(names, handler)
    }

    /// Entry point for samples aimed at the element and for continuation
    /// samples of a running session.
    pub fn handle(&mut self, sample: &mut RawSample) {
        if sample.is_consumed() {
            // Another watcher took this gesture.
            if self.status.is_live() {
                self.reset();
            }
            return;
        }
        if !self.config.block.contains(BlockMode::SELF) {
            let starting = sample.kind == SampleKind::Start;
            if starting {
                if !self.status.is_live() {
                    log::debug!("session start on {:?}", self.element);
                    self.services.source.subscribe(self.key, Channel::Continuation);
                    self.status = ProcessStatus::START;
                }
                if self.config.global
                    && !self.matchers_global.is_empty()
                    && !self.status_global.is_live()
                {
                    self.services.source.subscribe(self.key, Channel::GlobalStart);
                    self.status_global = ProcessStatus::START;
                }
            }
            if starting || self.status.is_pending() {
                self.trigger(sample, true);
            }
        }
        if self.config.block.contains(BlockMode::OTHERS) {
            sample.mark_consumed();
        }
    }

    /// Entry point for start samples seen through the global subscription.
    pub fn handle_global(&mut self, sample: &mut RawSample) {
        self.trigger(sample, false);
    }

    fn trigger(&mut self, sample: &mut RawSample, own: bool) {
        let mut data = self.pipeline.derive(sample, self.config.direction);
        log::trace!("{:?} {:?} -> {:?}", self.element, data.status, data.center);

        if self.status_global.is_live() {
            let status = self.run_global(&mut data);
            self.status_global = status;
            if status.is_finished() {
                self.reset_global();
            }
        }

        // A start elsewhere only concerns the global pool.
        if data.status.contains(EventStatus::START) && !own {
            return;
        }
        if !self.status.is_live() {
            return;
        }

        let status = self.run_scoped(&mut data);
        if status.contains(ProcessStatus::HANDLED) && self.config.block.contains(BlockMode::ONCE) {
            sample.mark_consumed();
        }
        // Nothing left waiting: the session is over even without END.
        if status.is_finished() || !status.is_pending() {
            self.reset();
            return;
        }
        self.status = status;
    }

    fn run_global(&mut self, data: &mut InputData) -> ProcessStatus {
        let session = Session {
            element: self.element,
            events: &self.events,
            timer: &self.services.timer,
            tree: self.services.tree.as_ref(),
        };
        self.matchers_global
            .iter_mut()
            .fold(ProcessStatus::NONE, |acc, m| acc | m.match_input(&session, data))
    }

    fn run_scoped(&mut self, data: &mut InputData) -> ProcessStatus {
        let session = Session {
            element: self.element,
            events: &self.events,
            timer: &self.services.timer,
            tree: self.services.tree.as_ref(),
        };
        if let Some(i) = self.active {
            return self.matchers[i].match_input(&session, data);
        }
        let mut status = ProcessStatus::NONE;
        for (i, matcher) in self.matchers.iter_mut().enumerate() {
            status |= matcher.match_input(&session, data);
            if status.contains(ProcessStatus::ACTIVE) {
                log::debug!("{:?} locked to `{}`", self.element, matcher.event());
                self.active = Some(i);
                break;
            }
            if status.contains(ProcessStatus::HANDLED) {
                break;
            }
        }
        // The losers of the session drop their state and pending callbacks.
        if let Some(winner) = self.active {
            for (i, matcher) in self.matchers.iter_mut().enumerate() {
                if i != winner {
                    matcher.reset();
                }
            }
        }
        status
    }

    /// Ends the element session: resets every element matcher, drops the
    /// active lock and the continuation subscription.
    pub fn reset(&mut self) {
        self.services
            .source
            .unsubscribe(self.key, Channel::Continuation);
        for m in &mut self.matchers {
            m.reset();
        }
        self.active = None;
        self.status = ProcessStatus::NONE;
    }

    pub fn reset_global(&mut self) {
        self.services
            .source
            .unsubscribe(self.key, Channel::GlobalStart);
        for m in &mut self.matchers_global {
            m.reset();
        }
        self.status_global = ProcessStatus::NONE;
    }

    /// Tears the watcher down: cancels pending callbacks, detaches every
    /// subscription, drops all matchers and handlers.
    pub fn destroy(&mut self) {
        log::debug!("destroying watcher on {:?}", self.element);
        self.reset();
        self.reset_global();
        self.matchers.clear();
        self.matchers_global.clear();
        self.events.clear();
        self.pipeline.clear();
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        if self.status.is_live() {
            self.reset();
        }
        if self.status_global.is_live() {
            self.reset_global();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use super::*;
    use crate::timer::testing::ManualTimer;
    use crate::*;

    #[derive(Default)]
    struct Recorder {
        subs: RefCell<HashSet<Channel>>,
    }

    impl SampleSource for Recorder {
        fn subscribe(&self, _: WatcherKey, channel: Channel) {
            self.subs.borrow_mut().insert(channel);
        }
        fn unsubscribe(&self, _: WatcherKey, channel: Channel) {
            self.subs.borrow_mut().remove(&channel);
        }
    }

    fn watcher(config: WatcherConfig) -> (Watcher, Rc<Recorder>) {
        let source = Rc::new(Recorder::default());
        let services = Services::new(Rc::new(ManualTimer::default()), source.clone());
        (
            Watcher::new(WatcherKey::default(), ElementId(1), config, services),
            source,
        )
    }

    #[test]
    fn test_duplicate_matcher_is_rejected() {
        let (mut w, _) = watcher(WatcherConfig::default());
        w.add(Box::new(TapMatcher::default())).unwrap();
        let err = w
            .add(Box::new(TapMatcher::new(TapRule {
                threshold: 1.0,
                ..TapRule::default()
            })))
            .unwrap_err();
        assert_eq!(err, GestureError::DuplicateMatcher { event: "TAP".into() });
        assert_eq!(w.matcher_count(), 1);
        // same identifier in the other pool is fine
        w.add(Box::new(FocusBlurMatcher::default())).unwrap();
        assert_eq!(w.matcher_count(), 2);
    }

    #[test]
    fn test_session_subscribes_and_unsubscribes() {
        let (mut w, source) = watcher(WatcherConfig::default());
        w.add(Box::new(TapMatcher::default())).unwrap();

        w.handle(&mut RawSample::start(0.0, 0.0, 0.0));
        assert_eq!(w.status(), ProcessStatus::WAIT);
        assert!(source.subs.borrow().contains(&Channel::Continuation));

        w.handle(&mut RawSample::end(1.0, 0.0, 50.0));
        assert_eq!(w.status(), ProcessStatus::NONE);
        assert!(source.subs.borrow().is_empty());
    }

    #[test]
    fn test_global_pool_requires_global_flag() {
        let (mut w, source) = watcher(WatcherConfig::default());
        w.add(Box::new(FocusBlurMatcher::default())).unwrap();
        w.handle(&mut RawSample::start(0.0, 0.0, 0.0).with_path([ElementId(1)]));
        assert_eq!(w.status_global(), ProcessStatus::NONE);
        assert!(!source.subs.borrow().contains(&Channel::GlobalStart));
    }

    #[test]
    fn test_global_matcher_runs_once_flag_is_set() {
        let (mut w, _) = watcher(WatcherConfig::default());
        w.add(Box::new(FocusBlurMatcher::default())).unwrap();
        let focused = Rc::new(std::cell::Cell::new(0));
        let f = focused.clone();
        w.on("FOCUS", handler(move |_| f.set(f.get() + 1)));

        w.handle(&mut RawSample::start(0.0, 0.0, 0.0).with_path([ElementId(1)]));
        assert_eq!(focused.get(), 0);

        w.update_config(WatcherConfig {
            global: true,
            ..WatcherConfig::default()
        });
        w.handle(&mut RawSample::start(0.0, 0.0, 10.0).with_path([ElementId(1)]));
        assert_eq!(focused.get(), 1);
    }

    #[test]
    fn test_remove_resets_live_pool() {
        let (mut w, source) = watcher(WatcherConfig::default());
        w.add(Box::new(TapMatcher::default())).unwrap();
        w.add(Box::new(PanMatcher::default())).unwrap();
        w.handle(&mut RawSample::start(0.0, 0.0, 0.0));
        w.handle(&mut RawSample::moved(40.0, 0.0, 10.0));
        assert_eq!(w.active_matcher(), Some("PAN"));

        let removed = w.remove(false, "PAN").unwrap();
        assert_eq!(removed.event(), "PAN");
        assert_eq!(w.active_matcher(), None);
        assert_eq!(w.status(), ProcessStatus::NONE);
        assert!(source.subs.borrow().is_empty());
        assert!(matches!(
            w.remove(false, "PAN"),
            Err(GestureError::UnknownMatcher { event }) if event == "PAN"
        ));
    }

    #[test]
    fn test_block_self_ignores_own_samples() {
        let (mut w, _) = watcher(WatcherConfig {
            block: BlockMode::SELF,
            ..WatcherConfig::default()
        });
        w.add(Box::new(TapMatcher::default())).unwrap();
        let mut s = RawSample::start(0.0, 0.0, 0.0);
        w.handle(&mut s);
        assert_eq!(w.status(), ProcessStatus::NONE);
        assert!(!s.is_consumed());
    }

    #[test]
    fn test_destroy_clears_everything() {
        let (mut w, source) = watcher(WatcherConfig {
            global: true,
            ..WatcherConfig::default()
        });
        w.add(Box::new(PressMatcher::new(PressRule {
            auto: true,
            ..PressRule::default()
        })))
        .unwrap();
        w.add(Box::new(FocusBlurMatcher::default())).unwrap();
        w.on("PRESS", handler(|_| {}));
        w.handle(&mut RawSample::start(0.0, 0.0, 0.0).with_path([ElementId(1)]));
        assert_eq!(source.subs.borrow().len(), 2);

        w.destroy();
        assert!(source.subs.borrow().is_empty());
        assert_eq!(w.matcher_count(), 0);
        assert!(w.events().is_empty());
        assert_eq!(w.status(), ProcessStatus::NONE);
        assert_eq!(w.status_global(), ProcessStatus::NONE);
    }
}
