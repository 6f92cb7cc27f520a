//! Host context for tactus watchers.
//!
//! A [`Host`] stands for one document or window. It owns the watchers created
//! through it, the subscription lists they register on ([`Subscriptions`]),
//! the deferred-callback queue press auto-fire uses ([`TimerQueue`]) and the
//! root listener reference count ([`root`]).
//!
//! ```rust
//! use tactus_core::*;
//! use tactus_platform::Host;
//!
//! let host = Host::new();
//! let button = host.watch(ElementId(3), WatcherConfig::default());
//! host.with_watcher(button, |w| {
//!     w.add(Box::new(TapMatcher::default())).unwrap();
//!     w.on("TAP", handler(|d| println!("tap at {:?}", d.center)));
//! });
//!
//! host.dispatch(RawSample::start(10.0, 10.0, 0.0).with_path([ElementId(3)]));
//! host.dispatch(RawSample::end(11.0, 10.0, 80.0).with_path([ElementId(3)]));
//! ```

pub mod host;
pub mod root;
pub mod subscriptions;
pub mod timers;

pub use host::*;
pub use root::HostId;
pub use subscriptions::*;
pub use timers::*;
