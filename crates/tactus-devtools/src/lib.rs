use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tactus_core::{Direction, EventStatus, Handler, Watcher, WatcherKey, handler};

/// One emitted event as seen by the inspector.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceEntry {
    pub name: String,
    pub time: f64,
    pub status: EventStatus,
    pub direction: Direction,
    pub distance: f32,
}

#[derive(Default)]
struct Trace {
    entries: Vec<TraceEntry>,
    counts: BTreeMap<String, usize>,
}

/// Records every event the attached watchers emit.
///
/// Clones share the same trace, so the inspector can be captured by the code
/// that prints it while the watchers keep feeding it.
#[derive(Clone, Default)]
pub struct Inspector {
    trace: Rc<RefCell<Trace>>,
    attached: Rc<RefCell<HashMap<WatcherKey, Vec<(String, Handler)>>>>,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a recorder under every name the watcher's matchers can emit.
    /// Matchers added afterwards are not covered; attach again to pick them up.
    pub fn attach(&self, watcher: &Watcher) {
        self.detach(watcher);
        let mut registered = Vec::new();
        for name in watcher.event_names() {
            let trace = self.trace.clone();
            let tag = name.clone();
            let h = handler(move |data| {
                let mut t = trace.borrow_mut();
                *t.counts.entry(tag.clone()).or_insert(0) += 1;
                t.entries.push(TraceEntry {
                    name: tag.clone(),
                    time: data.time,
                    status: data.status,
                    direction: data.direction,
                    distance: data.distance,
                });
            });
            watcher.on(&name, h.clone());
            registered.push((name, h));
        }
        log::debug!(
            "inspector attached to {:?} ({} names)",
            watcher.element(),
            registered.len()
        );
        self.attached.borrow_mut().insert(watcher.key(), registered);
    }

    pub fn detach(&self, watcher: &Watcher) {
        let Some(registered) = self.attached.borrow_mut().remove(&watcher.key()) else {
            return;
        };
        for (name, h) in registered {
            // The watcher may have been destroyed since.
            let _ = watcher.off(&name, &h);
        }
    }

    pub fn entries(&self) -> Vec<TraceEntry> {
        self.trace.borrow().entries.clone()
    }

    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.trace.borrow().counts.clone()
    }

    pub fn len(&self) -> usize {
        self.trace.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.borrow().entries.is_empty()
    }

    pub fn clear(&self) {
        let mut t = self.trace.borrow_mut();
        t.entries.clear();
        t.counts.clear();
    }

    /// `NAME@time` for every recorded event, space separated.
    pub fn summary(&self) -> String {
        self.trace
            .borrow()
            .entries
            .iter()
            .map(|e| format!("{}@{}", e.name, e.time))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Text overlay for an [`Inspector`].
pub struct Hud {
    pub enabled: bool,
    /// Most frequent names listed on the counts line.
    pub top: usize,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            enabled: true,
            top: 3,
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn lines(&self, inspector: &Inspector) -> Vec<String> {
        if !self.enabled {
            return Vec::new();
        }
        let mut lines = vec![format!("events: {}", inspector.len())];
        if let Some(last) = inspector.trace.borrow().entries.last() {
            let dirs: Vec<&str> = last.direction.suffixes().collect();
            lines.push(format!(
                "last: {} @{:.0}ms d={:.1} {}",
                last.name,
                last.time,
                last.distance,
                if dirs.is_empty() {
                    "-".to_string()
                } else {
                    dirs.join("|")
                }
            ));
        }
        let mut counts: Vec<(String, usize)> = inspector.counts().into_iter().collect();
        // Stable: ties keep name order.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        if !counts.is_empty() {
            let top = counts
                .iter()
                .take(self.top)
                .map(|(name, n)| format!("{name} x{n}"))
                .collect::<Vec<_>>()
                .join("  |  ");
            lines.push(format!("top: {top}"));
        }
        lines
    }
}
