//! Overlay container: all children occupy the same region.

use geom::{Axis, SizeRequest};

use crate::container::ChildSeq;
use crate::node::{Children, NodeRef, Widget};
use crate::state::NodeState;

/// A stack of overlays. Children render bottom-to-top in insertion order,
/// so the last child added is drawn topmost; events dispatch in the reverse
/// order, so the topmost overlay responds first.
pub struct Stack {
    state: NodeState,
    children: ChildSeq,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            state: NodeState::default(),
            children: ChildSeq::default(),
        }
    }

    /// Push a child onto the top of the stack.
    pub fn add_child(&mut self, child: NodeRef) {
        self.children.push(child);
        self.state.invalidate_size();
    }

    /// Remove and return the topmost child. Popping an empty stack is a
    /// programmer error.
    pub fn pop_child(&mut self) -> NodeRef {
        let child = self.children.pop().expect("pop_child on an empty Stack");
        self.state.invalidate_size();
        child
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The child at `idx`, counting from the bottom.
    pub fn child(&self, idx: usize) -> Option<NodeRef> {
        self.children.get(idx)
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Stack {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, axis: Axis, prospective: Option<i32>) -> SizeRequest {
        self.children
            .forward()
            .map(|c| c.borrow_mut().get_preferred_size(axis, prospective))
            .fold(SizeRequest::ZERO, |acc, sr| acc.max(sr))
    }

    fn arrange(&mut self) {
        let region = self.state.region();
        for child in self.children.forward() {
            child.borrow_mut().allocate_region(region);
        }
    }

    fn children(&self) -> Children<'_> {
        self.children.forward()
    }

    fn event_children(&self) -> Children<'_> {
        self.children.reverse()
    }
}
