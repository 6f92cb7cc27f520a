use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use slotmap::SlotMap;
use smallvec::SmallVec;
use tactus_core::{
    Channel, ComposedPath, ElementId, ElementTree, RawSample, SampleKind, Services, Watcher,
    WatcherConfig, WatcherKey,
};

use crate::{HostId, Subscriptions, TimerQueue, root};

type WatcherCell = Rc<RefCell<Watcher>>;

/// Routes raw samples of one document or window to its watchers.
///
/// `Host` is a cheap handle; clones share the same state. Event handlers that
/// need the host should capture a [`WeakHost`] to avoid a reference cycle
/// through the watcher's handler table.
#[derive(Clone)]
pub struct Host {
    inner: Rc<HostInner>,
}

/// Non-owning [`Host`] handle.
#[derive(Clone)]
pub struct WeakHost {
    inner: Weak<HostInner>,
}

impl WeakHost {
    pub fn upgrade(&self) -> Option<Host> {
        self.inner.upgrade().map(|inner| Host { inner })
    }
}

struct HostInner {
    id: HostId,
    timers: Rc<TimerQueue>,
    tree: Rc<dyn ElementTree>,
    subscriptions: Rc<Subscriptions>,
    watchers: RefCell<SlotMap<WatcherKey, WatcherCell>>,
    by_element: RefCell<HashMap<ElementId, SmallVec<[WatcherKey; 2]>>>,
    shared: RefCell<HashMap<ElementId, WatcherKey>>,
    // Unwatched while a dispatch was running.
    doomed: RefCell<Vec<WatcherKey>>,
    depth: Cell<usize>,
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Host {
    pub fn new() -> Self {
        Self::with_tree(Rc::new(ComposedPath))
    }

    /// Host whose focus/blur containment checks go through `tree`.
    pub fn with_tree(tree: Rc<dyn ElementTree>) -> Self {
        Self {
            inner: Rc::new(HostInner {
                id: HostId::next(),
                timers: Rc::new(TimerQueue::new()),
                tree,
                subscriptions: Rc::new(Subscriptions::new()),
                watchers: RefCell::new(SlotMap::with_key()),
                by_element: RefCell::new(HashMap::new()),
                shared: RefCell::new(HashMap::new()),
                doomed: RefCell::new(Vec::new()),
                depth: Cell::new(0),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakHost {
        WeakHost {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn id(&self) -> HostId {
        self.inner.id
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.inner.timers
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.inner.subscriptions
    }

    pub fn watcher_count(&self) -> usize {
        self.inner.watchers.borrow().len()
    }

    /// Whether the root listener suppressing default move handling is
    /// installed for this host.
    pub fn suppresses_default_move(&self) -> bool {
        root::is_installed(self.inner.id)
    }

    /// Watcher for `element`. With `config.share` set, an existing shared
    /// watcher of the element is returned as is and `config` is ignored.
    pub fn watch(&self, element: ElementId, config: WatcherConfig) -> WatcherKey {
        let inner = &self.inner;
        if config.share {
            if let Some(&key) = inner.shared.borrow().get(&element) {
                log::debug!("reusing shared watcher for {element:?}");
                return key;
            }
        }
        let share = config.share;
        let services = Services::new(inner.timers.clone(), inner.subscriptions.clone())
            .with_tree(Rc::clone(&inner.tree));
        let key = inner.watchers.borrow_mut().insert_with_key(|key| {
            Rc::new(RefCell::new(Watcher::new(key, element, config, services)))
        });
        inner
            .by_element
            .borrow_mut()
            .entry(element)
            .or_default()
            .push(key);
        if share {
            inner.shared.borrow_mut().insert(element, key);
        }
        if root::retain(inner.id) {
            log::debug!("installing root listener for {:?}", inner.id);
        }
        key
    }

    /// Runs `f` on the watcher. `None` if the key is gone or the watcher is
    /// in the middle of handling a sample.
    pub fn with_watcher<R>(&self, key: WatcherKey, f: impl FnOnce(&mut Watcher) -> R) -> Option<R> {
        let cell = self.inner.watchers.borrow().get(key).cloned()?;
        let Ok(mut watcher) = cell.try_borrow_mut() else {
            log::warn!("watcher {key:?} is busy");
            return None;
        };
        Some(f(&mut watcher))
    }

    pub fn watchers_for(&self, element: ElementId) -> SmallVec<[WatcherKey; 2]> {
        self.inner
            .by_element
            .borrow()
            .get(&element)
            .cloned()
            .unwrap_or_default()
    }

    /// Destroys the watcher and forgets it. Inside a dispatch or a timer
    /// callback the teardown waits until the outermost one returns. Returns
    /// false for an unknown key.
    pub fn unwatch(&self, key: WatcherKey) -> bool {
        let inner = &self.inner;
        if !inner.watchers.borrow().contains_key(key) {
            return false;
        }
        if inner.depth.get() > 0 {
            let mut doomed = inner.doomed.borrow_mut();
            if !doomed.contains(&key) {
                doomed.push(key);
            }
            return true;
        }
        self.teardown(key);
        true
    }

    fn teardown(&self, key: WatcherKey) {
        let inner = &self.inner;
        let Some(cell) = inner.watchers.borrow_mut().remove(key) else {
            return;
        };
        let element = {
            let mut watcher = cell.borrow_mut();
            watcher.destroy();
            watcher.element()
        };
        if let Some(keys) = inner.by_element.borrow_mut().get_mut(&element) {
            keys.retain(|k| *k != key);
        }
        inner.by_element.borrow_mut().retain(|_, keys| !keys.is_empty());
        inner.shared.borrow_mut().retain(|_, k| *k != key);
        inner.subscriptions.forget(key);
        if root::release(inner.id) {
            log::debug!("removing root listener for {:?}", inner.id);
        }
    }

    fn enter(&self) {
        self.inner.depth.set(self.inner.depth.get() + 1);
    }

    fn leave(&self) {
        let depth = self.inner.depth.get() - 1;
        self.inner.depth.set(depth);
        if depth == 0 {
            let doomed = std::mem::take(&mut *self.inner.doomed.borrow_mut());
            for key in doomed {
                self.teardown(key);
            }
        }
    }

    /// Fires timers due by `now` (host milliseconds).
    pub fn advance(&self, now: f64) -> usize {
        self.enter();
        let fired = self.inner.timers.advance_to(now);
        self.leave();
        fired
    }

    /// Routes one raw sample. Timers due by the sample timestamp fire first.
    ///
    /// Start samples go to the watchers of each element on the path, most
    /// specific first, then to every watcher with a running global pool that
    /// has not seen the sample yet. Other samples go to the watchers with a
    /// running session, in the order the sessions started. Returns whether a
    /// watcher consumed the sample.
    pub fn dispatch(&self, mut sample: RawSample) -> bool {
        self.enter();
        self.inner.timers.advance_to(sample.timestamp);
        log::trace!("dispatch {:?} at {}", sample.kind, sample.timestamp);

        match sample.kind {
            SampleKind::Start => {
                let mut seen: SmallVec<[WatcherKey; 8]> = SmallVec::new();
                let path = sample.path.clone();
                for element in path {
                    for key in self.watchers_for(element) {
                        seen.push(key);
                        self.deliver(key, |w| w.handle(&mut sample));
                    }
                }
                for key in self.inner.subscriptions.subscribers(Channel::GlobalStart) {
                    if !seen.contains(&key) {
                        self.deliver(key, |w| w.handle_global(&mut sample));
                    }
                }
            }
            SampleKind::Move | SampleKind::End | SampleKind::Cancel => {
                for key in self.inner.subscriptions.subscribers(Channel::Continuation) {
                    self.deliver(key, |w| w.handle(&mut sample));
                }
            }
        }

        self.leave();
        sample.is_consumed()
    }

    fn deliver(&self, key: WatcherKey, f: impl FnOnce(&mut Watcher)) {
        if self.inner.doomed.borrow().contains(&key) {
            return;
        }
        let Some(cell) = self.inner.watchers.borrow().get(key).cloned() else {
            return;
        };
        match cell.try_borrow_mut() {
            Ok(mut watcher) => f(&mut watcher),
            // A handler dispatched into its own watcher.
            Err(_) => log::warn!("skipping re-entrant delivery to {key:?}"),
        }
    }
}

impl Drop for HostInner {
    fn drop(&mut self) {
        log::debug!("tearing down host {:?}", self.id);
        for (_, cell) in self.watchers.get_mut().drain() {
            if let Ok(mut watcher) = cell.try_borrow_mut() {
                watcher.destroy();
            }
        }
        self.timers.clear();
        root::forget(self.id);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tactus_core::*;

    use super::*;

    const INNER: ElementId = ElementId(2);
    const OUTER: ElementId = ElementId(1);

    fn record(host: &Host, key: WatcherKey, log: &Rc<RefCell<Vec<String>>>, prefix: &str) {
        host.with_watcher(key, |w| {
            for name in w.event_names() {
                let log = log.clone();
                let tag = format!("{prefix}:{name}");
                w.on(&name, handler(move |_| log.borrow_mut().push(tag.clone())));
            }
        })
        .unwrap();
    }

    fn gestures(host: &Host, key: WatcherKey) {
        host.with_watcher(key, |w| {
            w.add(Box::new(TapMatcher::default())).unwrap();
            w.add(Box::new(PanMatcher::default())).unwrap();
        })
        .unwrap();
    }

    #[test]
    fn test_shared_watcher_is_reused() {
        let host = Host::new();
        let a = host.watch(INNER, WatcherConfig::default());
        let b = host.watch(INNER, WatcherConfig::default());
        assert_eq!(a, b);
        let c = host.watch(
            INNER,
            WatcherConfig {
                share: false,
                ..WatcherConfig::default()
            },
        );
        assert_ne!(a, c);
        assert_eq!(host.watcher_count(), 2);
        assert_eq!(host.watchers_for(INNER).len(), 2);
    }

    #[test]
    fn test_tap_through_dispatch() {
        let host = Host::new();
        let key = host.watch(INNER, WatcherConfig::default());
        gestures(&host, key);
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&host, key, &log, "in");

        host.dispatch(RawSample::start(0.0, 0.0, 0.0).with_path([INNER, OUTER]));
        assert!(host.subscriptions().is_subscribed(key, Channel::Continuation));
        // the release lands outside the element; continuation still routes it
        host.dispatch(RawSample::end(2.0, 2.0, 80.0).with_path([OUTER]));
        assert_eq!(*log.borrow(), vec!["in:TAP_END", "in:TAP"]);
        assert!(host.subscriptions().is_empty());
    }

    #[test]
    fn test_inner_watcher_blocks_outer_once() {
        let host = Host::new();
        let inner = host.watch(
            INNER,
            WatcherConfig {
                block: BlockMode::ONCE,
                ..WatcherConfig::default()
            },
        );
        let outer = host.watch(OUTER, WatcherConfig::default());
        gestures(&host, inner);
        gestures(&host, outer);
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&host, inner, &log, "in");
        record(&host, outer, &log, "out");

        assert!(!host.dispatch(RawSample::start(0.0, 0.0, 0.0).with_path([INNER, OUTER])));
        assert!(host.dispatch(RawSample::end(1.0, 0.0, 50.0).with_path([INNER, OUTER])));
        assert_eq!(*log.borrow(), vec!["in:TAP_END", "in:TAP"]);
        assert_eq!(host.with_watcher(outer, |w| w.status()), Some(ProcessStatus::NONE));
    }

    #[test]
    fn test_focus_blur_across_elements() {
        let host = Host::new();
        let config = WatcherConfig {
            global: true,
            ..WatcherConfig::default()
        };
        let key = host.watch(INNER, config);
        host.with_watcher(key, |w| w.add(Box::new(FocusBlurMatcher::default())))
            .unwrap()
            .unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&host, key, &log, "in");

        host.dispatch(RawSample::start(0.0, 0.0, 0.0).with_path([INNER]));
        host.dispatch(RawSample::end(0.0, 0.0, 10.0).with_path([INNER]));
        assert!(host.subscriptions().is_subscribed(key, Channel::GlobalStart));

        host.dispatch(RawSample::start(50.0, 0.0, 100.0).with_path([ElementId(9)]));
        assert_eq!(*log.borrow(), vec!["in:FOCUS", "in:BLUR"]);
        assert!(!host.subscriptions().is_subscribed(key, Channel::GlobalStart));
    }

    #[test]
    fn test_press_auto_fires_on_advance() {
        let host = Host::new();
        let key = host.watch(INNER, WatcherConfig::default());
        host.with_watcher(key, |w| {
            w.add(Box::new(PressMatcher::new(PressRule {
                auto: true,
                ..PressRule::default()
            })))
        })
        .unwrap()
        .unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&host, key, &log, "in");

        host.dispatch(RawSample::start(0.0, 0.0, 1000.0).with_path([INNER]));
        assert_eq!(host.timers().pending(), 1);
        assert_eq!(host.advance(1300.0), 1);
        assert_eq!(*log.borrow(), vec!["in:PRESS_END", "in:PRESS"]);
    }

    #[test]
    fn test_unwatch_from_handler_is_deferred() {
        let host = Host::new();
        let key = host.watch(INNER, WatcherConfig::default());
        gestures(&host, key);
        let weak = host.downgrade();
        host.with_watcher(key, |w| {
            w.on(
                "TAP",
                handler(move |_| {
                    if let Some(host) = weak.upgrade() {
                        assert!(host.unwatch(key));
                    }
                }),
            )
        })
        .unwrap();

        host.dispatch(RawSample::start(0.0, 0.0, 0.0).with_path([INNER]));
        host.dispatch(RawSample::end(0.0, 0.0, 10.0).with_path([INNER]));
        assert_eq!(host.watcher_count(), 0);
        assert!(!host.unwatch(key));
        assert!(!host.suppresses_default_move());
    }

    #[test]
    fn test_root_listener_follows_watchers() {
        let host = Host::new();
        assert!(!host.suppresses_default_move());
        let a = host.watch(INNER, WatcherConfig::default());
        let b = host.watch(OUTER, WatcherConfig::default());
        assert!(host.suppresses_default_move());
        host.unwatch(a);
        assert!(host.suppresses_default_move());
        host.unwatch(b);
        assert!(!host.suppresses_default_move());
    }

    #[test]
    fn test_drop_tears_down() {
        let host = Host::new();
        let id = host.id();
        let key = host.watch(INNER, WatcherConfig::default());
        host.with_watcher(key, |w| {
            w.add(Box::new(PressMatcher::new(PressRule {
                auto: true,
                ..PressRule::default()
            })))
        })
        .unwrap()
        .unwrap();
        host.dispatch(RawSample::start(0.0, 0.0, 0.0).with_path([INNER]));
        drop(host);
        assert!(!root::is_installed(id));
    }
}
