use std::cell::{Cell, RefCell};

use slotmap::SlotMap;
use tactus_core::{Timer, TimerHandle};
use web_time::Instant;

struct Entry {
    deadline: f64,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

/// Deferred callbacks on the host clock (milliseconds).
///
/// Nothing runs on its own: the host drives the queue with [`advance_to`]
/// (sample timestamps) or [`poll`] (wall time elapsed since the previous
/// poll, added on top of the queue clock). Both move the same clock, so a host
/// can mix them.
///
/// [`advance_to`]: TimerQueue::advance_to
/// [`poll`]: TimerQueue::poll
pub struct TimerQueue {
    now: Cell<f64>,
    seq: Cell<u64>,
    pending: RefCell<SlotMap<TimerHandle, Entry>>,
    last_poll: Cell<Instant>,
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0.0),
            seq: Cell::new(0),
            pending: RefCell::new(SlotMap::with_key()),
            last_poll: Cell::new(Instant::now()),
        }
    }

    pub fn now(&self) -> f64 {
        self.now.get()
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.pending
            .borrow()
            .values()
            .map(|e| e.deadline)
            .min_by(f64::total_cmp)
    }

    /// Fires every callback due at `now`, earliest deadline first and in
    /// scheduling order on ties. Callbacks may schedule or cancel; anything
    /// they schedule that falls due before `now` fires in the same call.
    /// The clock never moves backwards. Returns the number fired.
    pub fn advance_to(&self, now: f64) -> usize {
        let target = now.max(self.now.get());
        let mut fired = 0;
        loop {
            let due = self
                .pending
                .borrow()
                .iter()
                .filter(|(_, e)| e.deadline <= target)
                .min_by(|(_, a), (_, b)| a.deadline.total_cmp(&b.deadline).then(a.seq.cmp(&b.seq)))
                .map(|(k, _)| k);
            let Some(key) = due else { break };
            // Release the borrow before running user code.
            let entry = self.pending.borrow_mut().remove(key);
            if let Some(entry) = entry {
                self.now.set(entry.deadline.max(self.now.get()));
                (entry.callback)();
                fired += 1;
            }
        }
        self.now.set(target);
        if fired > 0 {
            log::trace!("timer queue fired {fired} callback(s) at {target}");
        }
        fired
    }

    /// Advances the clock by the wall time elapsed since the previous poll
    /// (or since the queue was created).
    pub fn poll(&self) -> usize {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_poll.replace(now));
        self.advance_to(self.now.get() + elapsed.as_secs_f64() * 1000.0)
    }

    /// Drops every pending callback without running it.
    pub fn clear(&self) {
        let dropped = std::mem::take(&mut *self.pending.borrow_mut());
        drop(dropped);
    }
}

impl Timer for TimerQueue {
    fn schedule(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.pending.borrow_mut().insert(Entry {
            deadline: self.now.get() + delay_ms.max(0.0),
            seq,
            callback,
        })
    }

    fn cancel(&self, handle: TimerHandle) {
        self.pending.borrow_mut().remove(handle);
    }
}
