//! Target-keyed multicast event handlers.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::{
    event::Event,
    node::{NodeRef, Widget},
    state::NodeId,
};

/// A registered event handler. Returning true consumes the event.
pub type Handler = Box<dyn FnMut(&Event) -> bool>;

/// One registration: the target's identity, a weak handle used to detect the
/// target's destruction, and the handler itself.
struct Entry {
    target: NodeId,
    node: Weak<RefCell<dyn Widget>>,
    handler: Handler,
}

/// A multicast handler table keyed by node identity.
///
/// Handlers registered against the same target dispatch in registration
/// order, and the first one to consume an event short-circuits the rest.
/// Entries hold only a weak reference to their target: registrations for
/// nodes that have been dropped are pruned on the next registration or
/// emission, so a destroyed target can never be dispatched to.
#[derive(Default)]
pub struct Signals {
    entries: Vec<Entry>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler against a target node.
    pub fn on<F>(&mut self, target: &NodeRef, handler: F)
    where
        F: FnMut(&Event) -> bool + 'static,
    {
        self.prune();
        let id = target.borrow().state().id();
        self.entries.push(Entry {
            target: id,
            node: Rc::downgrade(target),
            handler: Box::new(handler),
        });
    }

    /// Invoke the target's handlers in registration order. The first handler
    /// returning true stops dispatch and the call returns true; if none
    /// consume the event, returns false.
    pub fn emit(&mut self, target: NodeId, event: &Event) -> bool {
        self.prune();
        for entry in self.entries.iter_mut().filter(|e| e.target == target) {
            if (entry.handler)(event) {
                return true;
            }
        }
        false
    }

    /// Purge every registration for a target.
    pub fn remove_by_target(&mut self, target: NodeId) {
        self.entries.retain(|e| e.target != target);
    }

    /// The number of live registrations.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.node.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop registrations whose target no longer exists.
    fn prune(&mut self) {
        self.entries.retain(|e| e.node.strong_count() > 0);
    }
}
