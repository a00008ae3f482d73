//! Viewport resize delivery.
//!
//! Semantics:
//! - Callbacks run on the thread that calls [`ResizeBus::emit`], in subscription order.
//! - A [`ResizeSubscription`] deregisters its callback when dropped or cancelled.
//! - Subscribing or cancelling from inside a callback takes effect on the next emit.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type ResizeCallback = Rc<RefCell<Box<dyn FnMut()>>>;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ResizeOptions {
    /// Invoke the callback once, synchronously, at subscription time.
    pub trigger_on_insert: bool,
}

#[derive(Default)]
struct ResizeState {
    entries: Vec<(u64, ResizeCallback)>,
    next_id: u64,
}

#[derive(Clone, Default)]
pub struct ResizeBus {
    state: Rc<RefCell<ResizeState>>,
}

impl ResizeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        callback: impl FnMut() + 'static,
        options: ResizeOptions,
    ) -> ResizeSubscription {
        let callback: ResizeCallback = Rc::new(RefCell::new(Box::new(callback)));
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.entries.push((id, Rc::clone(&callback)));
            id
        };
        if options.trigger_on_insert {
            let mut callback = callback.borrow_mut();
            (*callback)();
        }
        ResizeSubscription {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    /// Deliver one resize notification to every live subscriber.
    pub fn emit(&self) {
        let callbacks: Vec<ResizeCallback> = self
            .state
            .borrow()
            .entries
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        log::trace!("resize emitted to {} subscriber(s)", callbacks.len());
        for callback in callbacks {
            // A callback that re-enters emit from inside itself is skipped.
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (*callback)();
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().entries.len()
    }
}

#[must_use = "dropping the subscription deregisters the callback"]
pub struct ResizeSubscription {
    id: u64,
    state: Weak<RefCell<ResizeState>>,
}

impl ResizeSubscription {
    pub fn cancel(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
        self.state = Weak::new();
    }

    pub fn is_active(&self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let state = state.borrow();
        state.entries.iter().any(|(id, _)| *id == self.id)
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::{ResizeBus, ResizeOptions};
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<usize>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, move || inner.set(inner.get() + 1))
    }

    #[test]
    fn no_initial_call_without_trigger_on_insert() {
        let bus = ResizeBus::new();
        let (count, callback) = counter();
        let _sub = bus.subscribe(callback, ResizeOptions::default());
        assert_eq!(count.get(), 0);
        bus.emit();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn trigger_on_insert_calls_once_at_subscribe() {
        let bus = ResizeBus::new();
        let (count, callback) = counter();
        let _sub = bus.subscribe(
            callback,
            ResizeOptions {
                trigger_on_insert: true,
            },
        );
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn dropping_subscription_deregisters() {
        let bus = ResizeBus::new();
        let (count, callback) = counter();
        let sub = bus.subscribe(callback, ResizeOptions::default());
        assert!(sub.is_active());
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        bus.emit();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn subscription_outliving_bus_is_inert() {
        let bus = ResizeBus::new();
        let (_count, callback) = counter();
        let mut sub = bus.subscribe(callback, ResizeOptions::default());
        drop(bus);
        assert!(!sub.is_active());
        sub.cancel();
    }
}
