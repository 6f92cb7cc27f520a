//! Reference counts for the root listener each host installs while it has at
//! least one watcher. The listener suppresses the platform's default handling
//! of pointer moves (scrolling, text selection) so drags reach the matchers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HOST: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static ROOT_LISTENERS: RefCell<HashMap<HostId, usize>> = RefCell::new(HashMap::new());
}

/// Identity of one host document or window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HostId(u64);

impl HostId {
    pub fn next() -> Self {
        HostId(NEXT_HOST.fetch_add(1, Ordering::Relaxed))
    }
}

/// Adds a reference. Returns true when this installed the listener.
pub fn retain(host: HostId) -> bool {
    ROOT_LISTENERS.with(|m| {
        let mut m = m.borrow_mut();
        let count = m.entry(host).or_insert(0);
        *count += 1;
        *count == 1
    })
}

/// Drops a reference. Returns true when this removed the listener.
pub fn release(host: HostId) -> bool {
    ROOT_LISTENERS.with(|m| {
        let mut m = m.borrow_mut();
        match m.get_mut(&host) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                m.remove(&host);
                true
            }
            None => false,
        }
    })
}

/// Removes the listener regardless of the count.
pub fn forget(host: HostId) {
    ROOT_LISTENERS.with(|m| {
        m.borrow_mut().remove(&host);
    });
}

pub fn is_installed(host: HostId) -> bool {
    count(host) > 0
}

pub fn count(host: HostId) -> usize {
    ROOT_LISTENERS.with(|m| m.borrow().get(&host).copied().unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_installs_last_removes() {
        let host = HostId::next();
        assert!(!is_installed(host));
        assert!(retain(host));
        assert!(!retain(host));
        assert_eq!(count(host), 2);
        assert!(!release(host));
        assert!(release(host));
        assert!(!is_installed(host));
        // unbalanced release is ignored
        assert!(!release(host));
    }

    #[test]
    fn test_hosts_are_independent() {
        let (a, b) = (HostId::next(), HostId::next());
        assert_ne!(a, b);
        retain(a);
        assert!(!is_installed(b));
        forget(a);
        assert!(!is_installed(a));
    }
}
