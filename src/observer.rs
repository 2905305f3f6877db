//! Observable state holder
//!
//! Holds an immutable snapshot and tells subscribers whenever a new one is
//! set. The UI layer subscribes instead of polling the session.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: T,
    listeners: Vec<(u64, Listener<T>)>,
    next_id: u64,
}

/// Single-threaded observable value. Clones share the same state.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Handle returned by `subscribe`
pub struct Subscription<T> {
    id: u64,
    inner: Weak<RefCell<Inner<T>>>,
}

impl<T> Subscription<T> {
    /// Stop receiving updates. Safe to call after the observable is gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Current snapshot
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Replace the snapshot and notify subscribers
    pub fn set(&self, value: T) {
        let listeners: Vec<Listener<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
        };
        // Listeners may call get/subscribe, so no borrow is held here
        let snapshot = self.get();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Derive the next snapshot from the current one. `f` runs on a copy,
    /// so it may touch this observable itself.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let current = self.get();
        self.set(f(&current));
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription<T> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        Subscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscribers_see_new_snapshots() {
        let state = Observable::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = state.subscribe(move |v| sink.borrow_mut().push(*v));

        state.set(2);
        state.update(|v| v + 10);
        assert_eq!(*seen.borrow(), vec![2, 12]);
        assert_eq!(state.get(), 12);

        sub.unsubscribe();
        state.set(99);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn test_listener_can_read_state() {
        let state = Observable::new(String::from("a"));
        let reader = state.clone();
        let matched = Rc::new(Cell::new(false));
        let flag = Rc::clone(&matched);
        let _sub = state.subscribe(move |v| flag.set(reader.get() == *v));
        state.set("b".into());
        assert!(matched.get());
    }

    #[test]
    fn test_update_closure_can_reenter() {
        let state = Observable::new(1);
        let handle = state.clone();
        state.update(|v| {
            handle.set(v + 100);
            handle.update(|inner| inner + 1);
            v + 1
        });
        assert_eq!(state.get(), 2);
    }

    #[test]
    fn test_unsubscribe_after_drop() {
        let state = Observable::new(0);
        let sub = state.subscribe(|_| {});
        drop(state);
        sub.unsubscribe();
    }
}
