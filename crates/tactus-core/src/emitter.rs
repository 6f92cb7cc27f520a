use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{GestureError, InputData};

pub type Handler = Rc<dyn Fn(&InputData)>;

/// Wraps a closure as a [`Handler`]. Keep the returned value around to
/// remove it again with [`EventTable::off`].
pub fn handler(f: impl Fn(&InputData) + 'static) -> Handler {
    Rc::new(f)
}

/// `PAN` + `MOVE` -> `PAN_MOVE`.
pub fn event_name(base: &str, suffix: &str) -> String {
    format!("{base}_{suffix}")
}

/// Splits a space separated list such as `"TAP PAN_END"`.
pub fn split_event_names(names: &str) -> impl Iterator<Item = &str> {
    names.split_whitespace()
}

/// Named handler registry, shared by a watcher and its matchers.
///
/// Cloning yields another handle to the same table. Handlers run in
/// registration order; the same handler may be registered twice.
#[derive(Clone, Default)]
pub struct EventTable(Rc<RefCell<HashMap<String, Vec<Handler>>>>);

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, names: &str, handler: Handler) {
        let mut table = self.0.borrow_mut();
        for name in split_event_names(names) {
            table
                .entry(name.to_string())
                .or_default()
                .push(Rc::clone(&handler));
        }
    }

    /// Removes the first registration of `handler` under each name.
    ///
    /// A name the handler was never registered under is logged and skipped;
    /// the remaining names are still processed.
    pub fn off(&self, names: &str, handler: &Handler) -> Result<(), GestureError> {
        let mut missing = Vec::new();
        let mut table = self.0.borrow_mut();
        for name in split_event_names(names) {
            let list = table.get_mut(name);
            let index = list
                .as_ref()
                .and_then(|l| l.iter().position(|h| Rc::ptr_eq(h, handler)));
            match (list, index) {
                (Some(list), Some(index)) => {
                    list.remove(index);
                    if list.is_empty() {
                        table.remove(name);
                    }
                }
                _ => {
                    log::error!("handler can't be removed from `{name}`: not registered");
                    missing.push(name.to_string());
                }
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(GestureError::HandlerNotRegistered { events: missing })
        }
    }

    /// Runs every handler registered under exactly `name`. Unknown names are
    /// a no-op.
    ///
    /// Handlers run on a snapshot of the list, so a handler may call
    /// [`on`](Self::on) or [`off`](Self::off) without affecting the current
    /// round.
    pub fn emit(&self, name: &str, data: &InputData) {
        let snapshot: Vec<Handler> = match self.0.borrow().get(name) {
            Some(list) => list.clone(),
            None => return,
        };
        for h in snapshot {
            h(data);
        }
    }

    pub fn handler_count(&self, name: &str) -> usize {
        self.0.borrow().get(name).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl std::fmt::Debug for EventTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.0.borrow();
        let mut names: Vec<_> = table.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        names.sort_unstable();
        f.debug_map().entries(names).finish()
    }
}
