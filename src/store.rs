//! Observable state cell.
//!
//! Every update swaps in a fresh `Rc`, so subscribers can diff by pointer
//! identity, and readers holding an older snapshot keep seeing it unchanged.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Rc<dyn Fn(&Rc<T>)>;

pub struct Store<T> {
    state: RefCell<Rc<T>>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber<T>)>>,
    next_id: Cell<u64>,
}

impl<T> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            state: RefCell::new(Rc::new(initial)),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> Rc<T> {
        Rc::clone(&self.state.borrow())
    }

    /// Replace the state with `update(current)` and notify subscribers.
    pub fn set_state(&self, update: impl FnOnce(&T) -> T) {
        let next = {
            let current = self.state.borrow();
            Rc::new(update(&current))
        };
        *self.state.borrow_mut() = Rc::clone(&next);

        let subscribers: Vec<Subscriber<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect();
        for subscriber in subscribers {
            subscriber(&next);
        }
    }

    pub fn subscribe(&self, subscriber: impl Fn(&Rc<T>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .borrow_mut()
            .retain(|(existing, _)| *existing != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state.borrow())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
