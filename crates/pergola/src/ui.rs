//! The engine context: active layout roots, scissor stack, signal registry,
//! and the event pump.

use std::rc::Rc;

use geom::{Axis, Region, Size};
use tracing::{debug, trace};

use crate::{
    Result,
    event::{Event, EventSource},
    node::{NodeRef, deliver_event},
    render::{Backend, Render, ScissorStack},
    signal::Signals,
    text::TextMetrics,
};

/// The engine context. Owns the backend strategy, the LIFO stack of active
/// layout roots (nested modal UIs), the scissor stack, and the signal
/// registry. One layout cycle is a full bottom-up preferred-size pass
/// followed by a full top-down allocation pass; the two never interleave.
pub struct Ui {
    backend: Box<dyn Backend>,
    layouts: Vec<NodeRef>,
    scissors: ScissorStack,
    signals: Signals,
    surface: Size,
}

impl Ui {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        let surface = backend.size();
        Self {
            scissors: ScissorStack::new(surface),
            backend,
            layouts: Vec::new(),
            signals: Signals::new(),
            surface,
        }
    }

    /// The current surface size in layout units.
    pub fn surface(&self) -> Size {
        self.surface
    }

    /// The backend's text measurement strategy, for constructing Text
    /// widgets that measure in the backend's units.
    pub fn metrics(&self) -> Rc<dyn TextMetrics> {
        self.backend.metrics()
    }

    /// The signal registry.
    pub fn signals(&mut self) -> &mut Signals {
        &mut self.signals
    }

    /// Register an event handler against a target node.
    pub fn on<F>(&mut self, target: &NodeRef, handler: F)
    where
        F: FnMut(&Event) -> bool + 'static,
    {
        self.signals.on(target, handler);
    }

    /// Push a new root, laying it out against the current surface. The new
    /// root becomes the active layout; roots below keep rendering
    /// underneath it.
    pub fn push_layout(&mut self, root: NodeRef) {
        layout_root(&root, self.surface);
        self.layouts.push(root);
        trace!(depth = self.layouts.len(), "push_layout");
    }

    /// Pop the active root. Popping with no active layout is a programmer
    /// error.
    pub fn pop_layout(&mut self) -> NodeRef {
        let root = self
            .layouts
            .pop()
            .expect("pop_layout on an empty layout stack");
        trace!(depth = self.layouts.len(), "pop_layout");
        root
    }

    /// The active root, if any.
    pub fn active_root(&self) -> Option<NodeRef> {
        self.layouts.last().cloned()
    }

    /// The number of stacked layouts.
    pub fn layout_depth(&self) -> usize {
        self.layouts.len()
    }

    /// Narrow the clip rectangle; intersects with the current scissor.
    pub fn push_scissor(&mut self, region: Region) {
        self.scissors.push(region);
    }

    /// Restore the previous clip rectangle.
    pub fn pop_scissor(&mut self) {
        self.scissors.pop();
    }

    /// The active clip rectangle; the full surface when nothing is pushed.
    pub fn scissor(&self) -> Region {
        self.scissors.current()
    }

    /// Re-seed the surface size after a host resize and lay every stacked
    /// root out again.
    pub fn resize(&mut self, w: i32, h: i32) {
        debug!(w, h, "surface resize");
        self.surface = Size::new(w, h);
        self.scissors.set_surface(self.surface);
        for root in &self.layouts {
            layout_root(root, self.surface);
        }
    }

    /// Run a fresh layout cycle for every stacked root, picking up any tree
    /// mutations made by event handlers.
    pub fn relayout(&mut self) {
        for root in &self.layouts {
            layout_root(root, self.surface);
        }
    }

    /// Draw every stacked root bottom-to-top and flush the backend.
    pub fn render_frame(&mut self) -> Result<()> {
        self.backend.reset()?;
        let roots: Vec<NodeRef> = self.layouts.clone();
        {
            let mut r = Render::new(&mut *self.backend, &mut self.scissors);
            for root in &roots {
                root.borrow_mut().render(&mut r)?;
            }
        }
        self.backend.flush()
    }

    /// Route an event to the active root. Resize events re-seed the surface
    /// instead. Returns true if some handler consumed the event.
    pub fn dispatch(&mut self, event: &Event) -> bool {
        if let Event::Resize(sz) = event {
            self.resize(sz.w, sz.h);
            return true;
        }
        match self.layouts.last().cloned() {
            Some(root) => deliver_event(&root, event, &mut self.signals),
            None => false,
        }
    }

    /// One pump iteration: relayout, render, wait for an event, dispatch.
    /// Returns false when there is nothing left to pump: no active layout,
    /// or an exhausted source. Apps running a modal loop with their own exit
    /// condition call this directly and pop their layout when done.
    pub fn pump_once(&mut self, source: &mut dyn EventSource) -> Result<bool> {
        if self.layouts.is_empty() {
            return Ok(false);
        }
        self.relayout();
        self.render_frame()?;
        match source.next() {
            Some(event) => {
                self.dispatch(&event);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drive the blocking event loop until the layout stack empties or the
    /// source is exhausted.
    pub fn pump_events(&mut self, source: &mut dyn EventSource) -> Result<()> {
        while self.pump_once(source)? {}
        Ok(())
    }
}

/// Drop cached size requests across a subtree ahead of a layout cycle, so
/// mutations made since the last cycle are picked up even in nodes whose
/// ancestors changed under them.
fn invalidate_tree(node: &NodeRef) {
    node.borrow_mut().state_mut().invalidate_size();
    let children: Vec<NodeRef> = node.borrow().children().collect();
    for child in &children {
        invalidate_tree(child);
    }
}

/// One full layout cycle for a root: bottom-up size negotiation, then
/// top-down allocation at the surface origin. Width is clamped to
/// `max(min(avail, nat), min)` per axis; the expand flags promote the root
/// to the full surface.
pub(crate) fn layout_root(root: &NodeRef, avail: Size) {
    invalidate_tree(root);
    let mut node = root.borrow_mut();
    let srw = node.get_preferred_size(Axis::Horizontal, None);
    let w = if node.state().expands(Axis::Horizontal) {
        avail.w.max(srw.min)
    } else {
        srw.min.max(srw.nat.min(avail.w))
    };
    let srh = node.get_preferred_size(Axis::Vertical, Some(w));
    let h = if node.state().expands(Axis::Vertical) {
        avail.h.max(srh.min)
    } else {
        srh.min.max(srh.nat.min(avail.h))
    };
    node.allocate_region(Region::new(0, 0, w, h));
}
