//! The widget contract and the wrapper operations shared by every node.

use std::cell::RefCell;
use std::rc::Rc;

use geom::{Axis, Region, SizeRequest};

use crate::{Result, event::Event, render::Render, signal::Signals, state::NodeState};

/// A shared handle to a widget. The tree is single-threaded; parents own
/// their children through these handles, and the layout stack and signal
/// registry may hold additional references.
pub type NodeRef = Rc<RefCell<dyn Widget>>;

/// An abstract cursor over a container's children. Storage shape (plain
/// sequence, single slot, grid entries) stays hidden from dispatch code.
pub type Children<'a> = Box<dyn Iterator<Item = NodeRef> + 'a>;

/// Wrap a widget into a shared tree handle.
pub fn node<W: Widget + 'static>(widget: W) -> Rc<RefCell<W>> {
    Rc::new(RefCell::new(widget))
}

/// The contract every widget implements.
///
/// The provided methods are wrappers enforcing common behavior: margin
/// bookkeeping, the per-axis size-request cache, zero-clamping of allocated
/// regions, and recursive rendering. Widgets implement the hook methods
/// (`measure`, `arrange`, `draw`, `handle_event`, `children`) and leave the
/// wrappers alone.
pub trait Widget {
    /// The node's common state.
    fn state(&self) -> &NodeState;

    /// Mutable access to the node's common state.
    fn state_mut(&mut self) -> &mut NodeState;

    /// Widget-specific size computation for one axis, content box only.
    /// `prospective` is a candidate cross-axis size: `Some(width)` when a
    /// height query wants height-for-width (wrapped text), `None` when the
    /// cross axis is unconstrained. Width queries always pass `None`.
    fn measure(&mut self, axis: Axis, prospective: Option<i32>) -> SizeRequest {
        let _ = (axis, prospective);
        SizeRequest::ZERO
    }

    /// Widget-specific reaction to a newly assigned region. Containers
    /// subdivide `state().region()` among their children here.
    fn arrange(&mut self) {}

    /// Draw this widget's own content within `state().region()`. Child
    /// rendering is handled by the `render` wrapper.
    fn draw(&mut self, r: &mut Render<'_>) -> Result<()> {
        let _ = r;
        Ok(())
    }

    /// Widget-specific event handling. Returning true consumes the event and
    /// stops propagation.
    fn handle_event(&mut self, event: &Event) -> bool {
        let _ = event;
        false
    }

    /// Children in layout and render order. Leaves return an empty cursor.
    fn children(&self) -> Children<'_> {
        Box::new(std::iter::empty())
    }

    /// Children in event-dispatch order. Stack reverses this so the topmost
    /// overlay responds first.
    fn event_children(&self) -> Children<'_> {
        self.children()
    }

    /// Report the preferred size for an axis, serving repeated queries from
    /// the cache. A cached request is returned unchanged as long as it was
    /// computed against the same prospective cross-axis size and no
    /// intervening mutation invalidated it. The widget's own `measure`
    /// result is grown by the margin on the queried axis before caching.
    fn get_preferred_size(&mut self, axis: Axis, prospective: Option<i32>) -> SizeRequest {
        if let Some(sr) = self.state().cached(axis, prospective) {
            return sr;
        }
        let sr = self.measure(axis, prospective);
        debug_assert!(sr.min <= sr.nat, "measure returned min > nat");
        let sr = sr.grown_by(self.state().margin().along(axis));
        self.state_mut().cache_store(axis, prospective, sr);
        sr
    }

    /// Assign a screen region to this node. The margin is subtracted and the
    /// result clamped at zero size: running out of space is a layout
    /// condition, not an error. The post-margin region is stored as the
    /// node's own region, then `arrange` runs to place children.
    fn allocate_region(&mut self, region: Region) {
        debug_assert!(
            region.w >= 0 && region.h >= 0,
            "negative-size region {region:?} passed to allocate_region"
        );
        let inner = region.shrunk_by(&self.state().margin()).clamped();
        self.state_mut().set_region(inner);
        self.arrange();
    }

    /// Render this node and its children. Children draw after (on top of)
    /// their parent, in `children` order.
    fn render(&mut self, r: &mut Render<'_>) -> Result<()> {
        self.draw(r)?;
        for child in self.children() {
            child.borrow_mut().render(r)?;
        }
        Ok(())
    }
}

/// Offer an event to a subtree: registered signal handlers for the node
/// first, then the widget's own `handle_event`, then children in
/// event-dispatch order. The first consumer stops propagation and the call
/// returns true.
///
/// No `RefCell` borrow is held while signal handlers run, so a handler may
/// freely borrow the node it is registered on.
pub fn deliver_event(target: &NodeRef, event: &Event, signals: &mut Signals) -> bool {
    let id = target.borrow().state().id();
    if signals.emit(id, event) {
        return true;
    }
    if target.borrow_mut().handle_event(event) {
        return true;
    }
    let children: Vec<NodeRef> = target.borrow().event_children().collect();
    for child in children {
        if deliver_event(&child, event, signals) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::Margin;

    struct Fixed {
        state: NodeState,
        size: SizeRequest,
        measures: u32,
    }

    impl Fixed {
        fn new(n: i32) -> Self {
            Self {
                state: NodeState::default(),
                size: SizeRequest::fixed(n),
                measures: 0,
            }
        }
    }

    impl Widget for Fixed {
        fn state(&self) -> &NodeState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut NodeState {
            &mut self.state
        }

        fn measure(&mut self, _axis: Axis, _prospective: Option<i32>) -> SizeRequest {
            self.measures += 1;
            self.size
        }
    }

    #[test]
    fn preferred_size_is_cached() {
        let mut w = Fixed::new(4);
        let a = w.get_preferred_size(Axis::Horizontal, None);
        let b = w.get_preferred_size(Axis::Horizontal, None);
        assert_eq!(a, b);
        assert_eq!(w.measures, 1);

        // A different prospective size misses the cache.
        w.get_preferred_size(Axis::Horizontal, Some(10));
        assert_eq!(w.measures, 2);

        // Invalidation forces recomputation.
        w.state_mut().invalidate_size();
        w.get_preferred_size(Axis::Horizontal, Some(10));
        assert_eq!(w.measures, 3);
    }

    #[test]
    fn margin_round_trip() {
        for m in [0, 1, 3, 7] {
            let mut w = Fixed::new(10);
            w.state_mut().set_margin(Margin::uniform(m));
            let sr = w.get_preferred_size(Axis::Horizontal, None);
            assert_eq!(sr, SizeRequest::fixed(10 + 2 * m));
        }
    }

    #[test]
    fn allocation_subtracts_margin_and_clamps() {
        let mut w = Fixed::new(4);
        w.state_mut().set_margin(Margin::uniform(2));
        w.allocate_region(Region::new(0, 0, 10, 10));
        assert_eq!(w.state().region(), Region::new(2, 2, 6, 6));

        // A region smaller than the margin clamps to zero size.
        w.allocate_region(Region::new(0, 0, 3, 3));
        let r = w.state().region();
        assert_eq!((r.w, r.h), (0, 0));
    }
}
