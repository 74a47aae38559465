//! Shared child storage and the single-child Bin container.

use geom::{Axis, SizeRequest};

use crate::node::{Children, NodeRef, Widget};
use crate::state::NodeState;

/// Ordered child storage shared by the sequence-backed containers (Flex and
/// Stack). Iteration hands out cloned handles, so callers never see the
/// storage shape.
#[derive(Default)]
pub(crate) struct ChildSeq {
    children: Vec<NodeRef>,
}

impl ChildSeq {
    pub fn push(&mut self, child: NodeRef) {
        self.children.push(child);
    }

    pub fn pop(&mut self) -> Option<NodeRef> {
        self.children.pop()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<NodeRef> {
        self.children.get(idx).cloned()
    }

    /// Children in insertion order.
    pub fn forward(&self) -> Children<'_> {
        Box::new(self.children.iter().cloned())
    }

    /// Children in reverse insertion order.
    pub fn reverse(&self) -> Children<'_> {
        Box::new(self.children.iter().rev().cloned())
    }
}

/// A container holding exactly one optional child. Size, layout, and events
/// forward to the child when present; an empty Bin reports a zero size
/// request.
pub struct Bin {
    state: NodeState,
    child: Option<NodeRef>,
}

impl Bin {
    pub fn new() -> Self {
        Self {
            state: NodeState::default(),
            child: None,
        }
    }

    pub fn with_child(child: NodeRef) -> Self {
        let mut bin = Self::new();
        bin.set_child(Some(child));
        bin
    }

    /// Replace the child, invalidating cached size requests.
    pub fn set_child(&mut self, child: Option<NodeRef>) {
        self.child = child;
        self.state.invalidate_size();
    }

    pub fn child(&self) -> Option<NodeRef> {
        self.child.clone()
    }
}

impl Default for Bin {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Bin {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, axis: Axis, prospective: Option<i32>) -> SizeRequest {
        match &self.child {
            Some(child) => child.borrow_mut().get_preferred_size(axis, prospective),
            None => SizeRequest::ZERO,
        }
    }

    fn arrange(&mut self) {
        if let Some(child) = &self.child {
            child.borrow_mut().allocate_region(self.state.region());
        }
    }

    fn children(&self) -> Children<'_> {
        Box::new(self.child.iter().cloned())
    }
}
