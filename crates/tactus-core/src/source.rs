use slotmap::new_key_type;

use crate::ElementId;

new_key_type! {
    /// Host-assigned identity of a [`Watcher`](crate::Watcher).
    pub struct WatcherKey;
}

/// Host-level subscriptions a watcher adds and removes while a session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Move, end and cancel samples anywhere in the host, added when a
    /// session starts on the watched element.
    Continuation,
    /// Start samples anywhere in the host, added while the global pool runs.
    GlobalStart,
}

/// Subscribe/unsubscribe side of the raw sample source.
pub trait SampleSource {
    /// Subscribing twice to the same channel is a no-op.
    fn subscribe(&self, watcher: WatcherKey, channel: Channel);
    fn unsubscribe(&self, watcher: WatcherKey, channel: Channel);
}

/// Containment test over element paths, used by focus/blur.
pub trait ElementTree {
    fn path_contains(&self, path: &[ElementId], element: ElementId) -> bool;
}

/// Treats the sample path as the complete ancestor chain.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComposedPath;

impl ElementTree for ComposedPath {
    fn path_contains(&self, path: &[ElementId], element: ElementId) -> bool {
        path.contains(&element)
    }
}

/// Sample source for a watcher that is driven directly, without a host.
#[derive(Clone, Copy, Debug, Default)]
pub struct Detached;

impl SampleSource for Detached {
    fn subscribe(&self, _: WatcherKey, _: Channel) {}
    fn unsubscribe(&self, _: WatcherKey, _: Channel) {}
}
