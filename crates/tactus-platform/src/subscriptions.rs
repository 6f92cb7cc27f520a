use std::cell::RefCell;

use smallvec::SmallVec;
use tactus_core::{Channel, SampleSource, WatcherKey};

/// Host-side subscriber lists, one per channel, in subscription order.
#[derive(Default)]
pub struct Subscriptions {
    continuation: RefCell<Vec<WatcherKey>>,
    global_start: RefCell<Vec<WatcherKey>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, channel: Channel) -> &RefCell<Vec<WatcherKey>> {
        match channel {
            Channel::Continuation => &self.continuation,
            Channel::GlobalStart => &self.global_start,
        }
    }

    /// Snapshot, so delivery can change the lists.
    pub fn subscribers(&self, channel: Channel) -> SmallVec<[WatcherKey; 8]> {
        self.list(channel).borrow().iter().copied().collect()
    }

    pub fn is_subscribed(&self, watcher: WatcherKey, channel: Channel) -> bool {
        self.list(channel).borrow().contains(&watcher)
    }

    pub fn len(&self, channel: Channel) -> usize {
        self.list(channel).borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.continuation.borrow().is_empty() && self.global_start.borrow().is_empty()
    }

    /// Drops `watcher` from both channels.
    pub fn forget(&self, watcher: WatcherKey) {
        self.continuation.borrow_mut().retain(|k| *k != watcher);
        self.global_start.borrow_mut().retain(|k| *k != watcher);
    }
}

impl SampleSource for Subscriptions {
    fn subscribe(&self, watcher: WatcherKey, channel: Channel) {
        let mut list = self.list(channel).borrow_mut();
        if !list.contains(&watcher) {
            list.push(watcher);
        }
    }

    fn unsubscribe(&self, watcher: WatcherKey, channel: Channel) {
        self.list(channel).borrow_mut().retain(|k| *k != watcher);
    }
}
