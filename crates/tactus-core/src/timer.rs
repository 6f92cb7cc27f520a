use slotmap::new_key_type;

new_key_type! {
    /// Identifies one scheduled callback.
    pub struct TimerHandle;
}

/// Host timer facility. Only press auto-fire schedules anything.
pub trait Timer {
    /// Runs `callback` once, `delay_ms` from now, unless cancelled first.
    fn schedule(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle;
    /// Cancelling an unknown or already fired handle does nothing.
    fn cancel(&self, handle: TimerHandle);
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};

    use slotmap::SlotMap;

    use super::*;

    /// Minimal deterministic timer for unit tests.
    #[derive(Default)]
    pub struct ManualTimer {
        now: Cell<f64>,
        pending: RefCell<SlotMap<TimerHandle, (f64, Box<dyn FnOnce()>)>>,
    }

    impl ManualTimer {
        pub fn pending(&self) -> usize {
            self.pending.borrow().len()
        }

        pub fn advance_to(&self, now: f64) {
            self.now.set(now);
            loop {
                let due = self
                    .pending
                    .borrow()
                    .iter()
                    .filter(|(_, (deadline, _))| *deadline <= now)
                    .min_by(|a, b| a.1.0.total_cmp(&b.1.0))
                    .map(|(k, _)| k);
                let Some(key) = due else { break };
                let entry = self.pending.borrow_mut().remove(key);
                if let Some((_, callback)) = entry {
                    callback();
                }
            }
        }
    }

    impl Timer for ManualTimer {
        fn schedule(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle {
            let deadline = self.now.get() + delay_ms.max(0.0);
            self.pending.borrow_mut().insert((deadline, callback))
        }

        fn cancel(&self, handle: TimerHandle) {
            self.pending.borrow_mut().remove(handle);
        }
    }
}
