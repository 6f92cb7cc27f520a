//! # Samples, Matchers, and Watchers
//!
//! Tactus turns a stream of pointer samples on an element into named gesture
//! events. There are three main pieces:
//!
//! - `Pipeline` — derives an `InputData` (delta, distance, duration,
//!   direction, bearing) for each raw sample, relative to the sample that
//!   opened the session.
//! - `Matcher` — one recogniser each for tap, press, pan, swipe and
//!   focus/blur.
//! - `Watcher` — owns the matchers of an element, routes samples to them and
//!   decides which one wins the gesture.
//!
//! ## Events
//!
//! Handlers are registered by name on the watcher:
//!
//! ```rust,ignore
//! watcher.on("TAP PRESS", handler(|data| log::info!("at {:?}", data.center)));
//! watcher.on("PAN_MOVE", handler(|data| log::info!("{:?}", data.delta)));
//! ```
//!
//! A matcher using its default name emits the base name plus phase and
//! direction suffixed variants:
//!
//! - instant matchers (tap, press, swipe) fire `TAP_END` then `TAP` on the
//!   release; a press that fires while the pointer is still down fires
//!   `PRESS_MOVE`.
//! - the pan fires `PAN` on every sample next to `PAN_START`, `PAN_MOVE`,
//!   `PAN_END`, `PAN_CANCEL` and one of `PAN_UP`, `PAN_DOWN`, `PAN_LEFT`,
//!   `PAN_RIGHT` per direction of travel.
//!
//! A matcher given a custom event name in its rule only fires that name.
//!
//! ## Arbitration
//!
//! Element matchers run in registration order. The first one returning
//! `ACTIVE` owns the rest of the session; the first one returning `HANDLED`
//! consumes the sample. Register the more specific recognisers first.
//!
//! ## Host collaborators
//!
//! The watcher never talks to a windowing system. It needs a `Timer` (press
//! auto-fire), a `SampleSource` to subscribe to continuation samples and an
//! `ElementTree` for focus/blur containment. `tactus-platform` provides all
//! three.

pub mod config;
pub mod data;
pub mod emitter;
pub mod error;
pub mod geometry;
pub mod input;
pub mod matcher;
pub mod pipeline;
pub mod prelude;
pub mod rule;
pub mod source;
pub mod status;
pub mod timer;
pub mod watcher;

pub use config::*;
pub use data::*;
pub use emitter::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use matcher::*;
pub use pipeline::*;
pub use rule::*;
pub use source::*;
pub use status::*;
pub use timer::*;
pub use watcher::*;
