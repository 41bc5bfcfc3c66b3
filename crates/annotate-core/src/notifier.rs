// File: crates/annotate-core/src/notifier.rs
// Summary: Viewport change notifications with RAII subscriptions.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportChange {
    Pan,
    Zoom,
    Resize,
    Fit,
}

type Handler = Rc<dyn Fn(ViewportChange)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.handlers.iter().any(|(h, _)| *h == id)
    }
}

/// Fan-out point for viewport changes. Cloning shares the same subscriber list.
#[derive(Clone, Default)]
pub struct ViewportNotifier {
    registry: Rc<RefCell<Registry>>,
}

impl ViewportNotifier {
    pub fn new() -> Self { Self::default() }

    /// Register `handler`; it stays registered until the returned handle is dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(ViewportChange) + 'static,
    {
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.handlers.push((id, Rc::new(handler)));
        Subscription { registry: Rc::downgrade(&self.registry), id }
    }

    /// Deliver `change` to current subscribers; returns how many were invoked.
    ///
    /// Handlers run without the registry borrowed, so they may subscribe or drop
    /// subscriptions. A subscriber released mid-dispatch is not invoked afterwards.
    pub fn emit(&self, change: ViewportChange) -> usize {
        let snapshot: Vec<(u64, Handler)> = self.registry.borrow().handlers.clone();
        let mut invoked = 0;
        for (id, handler) in snapshot {
            if !self.registry.borrow().contains(id) { continue; }
            handler(change);
            invoked += 1;
        }
        invoked
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

impl fmt::Debug for ViewportNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportNotifier").field("subscribers", &self.subscriber_count()).finish()
    }
}

/// Live registration with a [`ViewportNotifier`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Subscription {
    /// False once the notifier itself is gone.
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().map(|r| r.borrow().contains(self.id)).unwrap_or(false)
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(reg) = self.registry.upgrade() {
            reg.borrow_mut().handlers.retain(|(id, _)| *id != self.id);
        }
    }
}
