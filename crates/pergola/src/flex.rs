//! Flexbox-style row/column layout.

use geom::{Axis, Region, SizeRequest};

use crate::container::ChildSeq;
use crate::node::{Children, NodeRef, Widget};
use crate::state::{Align, Justify, NodeState};

/// Distribute `available` space along the main axis.
///
/// Every child receives at least its minimum. With room to spare, each child
/// gets its natural size plus a share of the surplus proportional to its
/// flex weight; with too little room, children shrink from natural toward
/// minimum in proportion to their slack. Distribution uses the
/// remaining-weight scheme, so the result fills `available` exactly whenever
/// the totals allow it. If `available` is below the sum of minimums, every
/// child is clamped at its minimum and the total overflows `available`.
pub(crate) fn distribute_main(requests: &[SizeRequest], weights: &[i32], available: i32) -> Vec<i32> {
    debug_assert_eq!(requests.len(), weights.len());
    let mut sizes: Vec<i32> = requests.iter().map(|r| r.nat).collect();
    let sum_nat: i32 = sizes.iter().sum();

    if available >= sum_nat {
        let total_flex: i32 = weights.iter().sum();
        if total_flex > 0 {
            let mut extra = available - sum_nat;
            let mut flex_left = total_flex;
            for (size, &weight) in sizes.iter_mut().zip(weights) {
                if weight <= 0 {
                    continue;
                }
                let share = (i64::from(extra) * i64::from(weight) / i64::from(flex_left)) as i32;
                *size += share;
                extra -= share;
                flex_left -= weight;
            }
        }
        // With no flex weight, the surplus is placed by justify at offset
        // time instead.
    } else {
        let mut deficit = sum_nat - available;
        let mut slack_left: i32 = requests.iter().map(|r| r.slack()).sum();
        for (size, request) in sizes.iter_mut().zip(requests) {
            if slack_left <= 0 || deficit <= 0 {
                break;
            }
            let slack = request.slack();
            if slack <= 0 {
                continue;
            }
            let take = (i64::from(deficit) * i64::from(slack) / i64::from(slack_left)) as i32;
            let take = take.min(slack).min(deficit);
            *size -= take;
            deficit -= take;
            slack_left -= slack;
        }
        // Any deficit left here means available < sum of minimums: children
        // stay at minimum and the container overflows.
    }
    sizes
}

/// Where the main-axis surplus goes when no child flexes.
pub(crate) fn justify_offset(justify: Justify, leftover: i32) -> i32 {
    if leftover <= 0 {
        return 0;
    }
    match justify {
        Justify::Start => 0,
        Justify::Center => leftover / 2,
        Justify::End => leftover,
    }
}

/// A child's cross-axis alignment: its own if set, else the container's.
pub(crate) fn resolve_align(child: Align, container: Align) -> Align {
    match child {
        Align::Unset => container,
        other => other,
    }
}

/// Cross-axis placement: (offset, size) within `available`. Stretch and the
/// expand hint fill the available space; everything else takes the natural
/// size, clamped, and is positioned by alignment.
pub(crate) fn cross_placement(align: Align, expand: bool, nat: i32, available: i32) -> (i32, i32) {
    if align == Align::Stretch || expand {
        return (0, available);
    }
    let size = nat.min(available);
    let offset = match align {
        Align::End => available - size,
        Align::Center => (available - size) / 2,
        _ => 0,
    };
    (offset, size)
}

/// A flexbox-style container without wrapping: lays its children out in a
/// row or a column, allocates extra space according to each child's flex
/// weight, and aligns on the cross axis like the CSS properties of the same
/// names.
pub struct Flex {
    state: NodeState,
    children: ChildSeq,
    horz: bool,
    justify_items: Justify,
    align_items: Align,
}

impl Flex {
    /// A horizontal flex container.
    pub fn row() -> Self {
        Self::new(true)
    }

    /// A vertical flex container.
    pub fn column() -> Self {
        Self::new(false)
    }

    fn new(horz: bool) -> Self {
        let mut state = NodeState::default();
        state.set_expand(true, true);
        Self {
            state,
            children: ChildSeq::default(),
            horz,
            justify_items: Justify::Start,
            align_items: Align::Unset,
        }
    }

    pub fn with_justify(mut self, justify: Justify) -> Self {
        self.justify_items = justify;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align_items = align;
        self
    }

    /// Append a child, invalidating cached size requests.
    pub fn add_child(&mut self, child: NodeRef) {
        self.children.push(child);
        self.state.invalidate_size();
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn main_axis(&self) -> Axis {
        if self.horz {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    /// Main-axis requests for all children. Height queries carry the
    /// prospective width so wrapped text reports height-for-width.
    fn main_requests(&self, prospective: Option<i32>) -> Vec<SizeRequest> {
        let main = self.main_axis();
        let pw = if main == Axis::Vertical { prospective } else { None };
        self.children
            .forward()
            .map(|c| c.borrow_mut().get_preferred_size(main, pw))
            .collect()
    }

    fn weights(&self) -> Vec<i32> {
        self.children
            .forward()
            .map(|c| c.borrow().state().flex_grow())
            .collect()
    }
}

impl Widget for Flex {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, axis: Axis, prospective: Option<i32>) -> SizeRequest {
        let main = self.main_axis();
        if axis == main {
            self.main_requests(prospective)
                .into_iter()
                .fold(SizeRequest::ZERO, |acc, sr| acc.add(sr))
        } else if main == Axis::Horizontal
            && axis == Axis::Vertical
            && let Some(width) = prospective
        {
            // Height-for-width in a row: lay out the main axis at the
            // candidate width, then ask each child for its height at its
            // laid-out width.
            let requests = self.main_requests(None);
            let sizes = distribute_main(&requests, &self.weights(), width);
            self.children
                .forward()
                .zip(sizes)
                .map(|(c, w)| c.borrow_mut().get_preferred_size(Axis::Vertical, Some(w)))
                .fold(SizeRequest::ZERO, |acc, sr| acc.max(sr))
        } else {
            self.children
                .forward()
                .map(|c| c.borrow_mut().get_preferred_size(axis, prospective))
                .fold(SizeRequest::ZERO, |acc, sr| acc.max(sr))
        }
    }

    fn arrange(&mut self) {
        let region = self.state.region();
        let main = self.main_axis();
        let cross = main.cross();
        let main_avail = region.len(main);
        let cross_avail = region.len(cross);

        let prospective = if main == Axis::Vertical {
            Some(region.w)
        } else {
            None
        };
        let requests = self.main_requests(prospective);
        let weights = self.weights();
        let sizes = distribute_main(&requests, &weights, main_avail);

        let used: i32 = sizes.iter().sum();
        let flexed = weights.iter().sum::<i32>() > 0;
        let mut offset = if flexed {
            0
        } else {
            justify_offset(self.justify_items, main_avail - used)
        };

        for (i, child) in self.children.forward().enumerate() {
            let main_size = sizes[i];
            let mut c = child.borrow_mut();
            let cross_pw = if cross == Axis::Vertical {
                Some(main_size)
            } else {
                None
            };
            let cross_nat = c.get_preferred_size(cross, cross_pw).nat;
            let align = resolve_align(c.state().align_self(), self.align_items);
            let expand = c.state().expands(cross);
            let (cross_off, cross_size) = cross_placement(align, expand, cross_nat, cross_avail);

            let child_region = if self.horz {
                Region::new(
                    region.tl.x + offset,
                    region.tl.y + cross_off,
                    main_size,
                    cross_size,
                )
            } else {
                Region::new(
                    region.tl.x + cross_off,
                    region.tl.y + offset,
                    cross_size,
                    main_size,
                )
            };
            c.allocate_region(child_region.clamped());
            offset += main_size;
        }
    }

    fn children(&self) -> Children<'_> {
        self.children.forward()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_fill_with_flex() {
        let requests = vec![SizeRequest::new(0, 10), SizeRequest::new(0, 10)];
        let sizes = distribute_main(&requests, &[1, 2], 50);
        assert_eq!(sizes.iter().sum::<i32>(), 50);
        assert_eq!(sizes, vec![20, 30]);
    }

    #[test]
    fn zero_weight_children_get_no_surplus() {
        let requests = vec![SizeRequest::new(0, 10), SizeRequest::new(0, 10)];
        let sizes = distribute_main(&requests, &[0, 1], 40);
        assert_eq!(sizes, vec![10, 30]);
    }

    #[test]
    fn no_flex_keeps_naturals() {
        let requests = vec![SizeRequest::fixed(10); 3];
        let sizes = distribute_main(&requests, &[0, 0, 0], 50);
        assert_eq!(sizes, vec![10, 10, 10]);
    }

    #[test]
    fn shrink_proportional_to_slack() {
        let requests = vec![SizeRequest::new(5, 20), SizeRequest::new(5, 20)];
        let sizes = distribute_main(&requests, &[0, 0], 20);
        assert_eq!(sizes, vec![10, 10]);
    }

    #[test]
    fn shrink_clamps_at_minimum() {
        let requests = vec![SizeRequest::new(5, 10), SizeRequest::new(8, 9)];
        // Less room than the sum of minimums: both clamp, total overflows.
        let sizes = distribute_main(&requests, &[0, 0], 10);
        assert_eq!(sizes, vec![5, 8]);
    }

    #[test]
    fn justify_offsets() {
        assert_eq!(justify_offset(Justify::Start, 20), 0);
        assert_eq!(justify_offset(Justify::Center, 20), 10);
        assert_eq!(justify_offset(Justify::End, 20), 20);
        assert_eq!(justify_offset(Justify::Center, 0), 0);
    }

    #[test]
    fn cross_placement_rules() {
        // Stretch and expand fill.
        assert_eq!(cross_placement(Align::Stretch, false, 4, 10), (0, 10));
        assert_eq!(cross_placement(Align::Unset, true, 4, 10), (0, 10));
        // Otherwise natural size, positioned by alignment.
        assert_eq!(cross_placement(Align::Unset, false, 4, 10), (0, 4));
        assert_eq!(cross_placement(Align::Start, false, 4, 10), (0, 4));
        assert_eq!(cross_placement(Align::Center, false, 4, 10), (3, 4));
        assert_eq!(cross_placement(Align::End, false, 4, 10), (6, 4));
        // Natural size clamps to the available cross space.
        assert_eq!(cross_placement(Align::Center, false, 12, 10), (0, 10));
    }

    proptest! {
        #[test]
        fn distribution_fills_exactly_when_possible(
            naturals in proptest::collection::vec(0i32..100, 1..8),
            weights in proptest::collection::vec(0i32..5, 8),
            available in 0i32..500,
        ) {
            let requests: Vec<SizeRequest> =
                naturals.iter().map(|&n| SizeRequest::new(0, n)).collect();
            let weights = &weights[..requests.len()];
            let sizes = distribute_main(&requests, weights, available);
            let total: i32 = sizes.iter().sum();
            let sum_nat: i32 = naturals.iter().sum();

            if available >= sum_nat && weights.iter().sum::<i32>() > 0 {
                // Exact fill.
                prop_assert_eq!(total, available);
            } else if available < sum_nat {
                // All slack (min is 0), so shrinking reaches available exactly.
                prop_assert_eq!(total, available.max(0));
            }
            for (size, r) in sizes.iter().zip(&requests) {
                prop_assert!(*size >= r.min);
            }
        }
    }
}
