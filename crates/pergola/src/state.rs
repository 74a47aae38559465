use std::sync::atomic::{AtomicU64, Ordering};

use geom::{Axis, Margin, Region, SizeRequest};

static CURRENT_ID: AtomicU64 = AtomicU64::new(0);

/// A process-unique ID for a node. Identity keys the signal registry, so ids
/// are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cross-axis alignment of a child within its container.
///
/// Resolved per child: `align_self` if set, else the container's
/// `align_items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Defer to the container's `align_items`.
    #[default]
    Unset,
    /// Place at the leading edge.
    Start,
    /// Place at the trailing edge.
    End,
    /// Center within the available cross size.
    Center,
    /// Fill the available cross size.
    Stretch,
}

/// Placement of leftover main-axis space when no child flexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    /// Surplus after the last child.
    #[default]
    Start,
    /// Surplus split before the first and after the last child.
    Center,
    /// Surplus before the first child.
    End,
}

/// One cached size request, keyed by the prospective cross-axis size it was
/// computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheSlot {
    prospective: Option<i32>,
    sr: SizeRequest,
}

/// State common to every widget: margin, flex weight, alignment, expansion
/// hints, the per-axis size-request cache, and the last allocated region.
/// Each widget keeps a `NodeState` and offers it up through
/// `Widget::state()`.
#[derive(Debug)]
pub struct NodeState {
    id: NodeId,
    margin: Margin,
    flex_grow: i32,
    align_self: Align,
    expand_h: bool,
    expand_v: bool,
    cache: [Option<CacheSlot>; 2],
    region: Region,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            id: NodeId(CURRENT_ID.fetch_add(1, Ordering::Relaxed)),
            margin: Margin::default(),
            flex_grow: 1,
            align_self: Align::Unset,
            expand_h: false,
            expand_v: false,
            cache: [None, None],
            region: Region::default(),
        }
    }
}

impl NodeState {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn margin(&self) -> Margin {
        self.margin
    }

    /// Set the margin, invalidating cached size requests.
    pub fn set_margin(&mut self, margin: Margin) {
        self.margin = margin;
        self.invalidate_size();
    }

    pub fn flex_grow(&self) -> i32 {
        self.flex_grow
    }

    /// Set the flex-grow weight. Must be non-negative.
    pub fn set_flex_grow(&mut self, weight: i32) {
        assert!(weight >= 0, "flex_grow must be non-negative");
        self.flex_grow = weight;
    }

    pub fn align_self(&self) -> Align {
        self.align_self
    }

    pub fn set_align_self(&mut self, align: Align) {
        self.align_self = align;
    }

    pub fn expand_h(&self) -> bool {
        self.expand_h
    }

    pub fn expand_v(&self) -> bool {
        self.expand_v
    }

    pub fn set_expand(&mut self, h: bool, v: bool) {
        self.expand_h = h;
        self.expand_v = v;
    }

    /// The expansion hint along an axis.
    pub fn expands(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.expand_h,
            Axis::Vertical => self.expand_v,
        }
    }

    /// The region this node was last allocated, after margin subtraction.
    /// Rendering and hit-testing use this.
    pub fn region(&self) -> Region {
        self.region
    }

    pub(crate) fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    /// Drop both cached size requests. Called whenever margin, children, or
    /// content change.
    pub fn invalidate_size(&mut self) {
        self.cache = [None, None];
    }

    /// The cached request for an axis, if it was computed against the same
    /// prospective cross-axis size.
    pub(crate) fn cached(&self, axis: Axis, prospective: Option<i32>) -> Option<SizeRequest> {
        self.cache[cache_index(axis)]
            .filter(|slot| slot.prospective == prospective)
            .map(|slot| slot.sr)
    }

    pub(crate) fn cache_store(&mut self, axis: Axis, prospective: Option<i32>, sr: SizeRequest) {
        self.cache[cache_index(axis)] = Some(CacheSlot { prospective, sr });
    }
}

fn cache_index(axis: Axis) -> usize {
    match axis {
        Axis::Horizontal => 0,
        Axis::Vertical => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = NodeState::default();
        let b = NodeState::default();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn cache_keyed_by_prospective() {
        let mut s = NodeState::default();
        s.cache_store(Axis::Vertical, Some(10), SizeRequest::fixed(3));
        assert_eq!(
            s.cached(Axis::Vertical, Some(10)),
            Some(SizeRequest::fixed(3))
        );
        assert_eq!(s.cached(Axis::Vertical, Some(11)), None);
        assert_eq!(s.cached(Axis::Vertical, None), None);
        assert_eq!(s.cached(Axis::Horizontal, Some(10)), None);

        s.invalidate_size();
        assert_eq!(s.cached(Axis::Vertical, Some(10)), None);
    }

    #[test]
    fn margin_change_invalidates() {
        let mut s = NodeState::default();
        s.cache_store(Axis::Horizontal, None, SizeRequest::fixed(5));
        s.set_margin(Margin::uniform(1));
        assert_eq!(s.cached(Axis::Horizontal, None), None);
    }
}
