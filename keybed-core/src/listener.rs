//! Scoped event listener registration
//!
//! A `ListenerRegistry` maps a topic (the physical key a piano key listens
//! for, or a scroll container) to the owners that listen on it. Registering
//! returns a `ListenerGuard`; the registration lives exactly as long as the
//! guard, so dropping a component, or replacing its guard when a binding
//! changes, always unregisters it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

pub type ListenerId = u64;

struct Entry<T, O> {
    topic: T,
    owner: O,
}

struct Inner<T, O> {
    next_id: ListenerId,
    entries: BTreeMap<ListenerId, Entry<T, O>>,
}

/// Registry of listeners keyed by topic
///
/// Single-threaded by construction: all registrations and dispatches happen
/// on the UI event loop.
pub struct ListenerRegistry<T, O> {
    inner: Rc<RefCell<Inner<T, O>>>,
}

impl<T, O> Default for ListenerRegistry<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, O> Clone for ListenerRegistry<T, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, O> ListenerRegistry<T, O> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                next_id: 0,
                entries: BTreeMap::new(),
            })),
        }
    }

    /// Number of live registrations
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }
}

impl<T: PartialEq + 'static, O: Clone + 'static> ListenerRegistry<T, O> {
    /// Register `owner` for `topic`; unregistered when the guard drops
    #[must_use = "the listener is removed as soon as the guard is dropped"]
    pub fn register(&self, topic: T, owner: O) -> ListenerGuard {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.insert(id, Entry { topic, owner });

        let weak: Weak<RefCell<Inner<T, O>>> = Rc::downgrade(&self.inner);
        ListenerGuard {
            id,
            release: Some(Box::new(move |id| {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().entries.remove(&id);
                }
            })),
        }
    }

    /// Owners listening on `topic`, in registration order
    pub fn owners_for(&self, topic: &T) -> Vec<O> {
        self.inner
            .borrow()
            .entries
            .values()
            .filter(|entry| entry.topic == *topic)
            .map(|entry| entry.owner.clone())
            .collect()
    }

    /// Whether anyone listens on `topic`
    pub fn has_listeners(&self, topic: &T) -> bool {
        self.inner
            .borrow()
            .entries
            .values()
            .any(|entry| entry.topic == *topic)
    }
}

/// Live registration in a `ListenerRegistry`
pub struct ListenerGuard {
    id: ListenerId,
    release: Option<Box<dyn FnOnce(ListenerId)>>,
}

impl ListenerGuard {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(self.id);
        }
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_drop_unregisters() {
        let registry: ListenerRegistry<String, usize> = ListenerRegistry::new();
        let guard = registry.register("q".to_string(), 12);
        assert_eq!(registry.owners_for(&"q".to_string()), vec![12]);

        drop(guard);
        assert!(registry.is_empty());
        assert!(!registry.has_listeners(&"q".to_string()));
    }

    #[test]
    fn test_guard_outliving_registry() {
        let registry: ListenerRegistry<&'static str, ()> = ListenerRegistry::new();
        let guard = registry.register("wheel", ());
        drop(registry);
        // Releasing against a dropped registry is a no-op
        drop(guard);
    }

    #[test]
    fn test_topics_are_independent() {
        let registry: ListenerRegistry<&'static str, u8> = ListenerRegistry::new();
        let _a = registry.register("a", 1);
        let _b = registry.register("b", 2);
        let _a2 = registry.register("a", 3);
        assert_eq!(registry.owners_for(&"a"), vec![1, 3]);
        assert_eq!(registry.owners_for(&"b"), vec![2]);
        assert_eq!(registry.len(), 3);
    }
}
