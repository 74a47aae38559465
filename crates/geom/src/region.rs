use crate::{Axis, Margin, Point, Size};

/// A rectangle with a location: the concrete screen area a widget has been
/// allocated and must render within. Width and height are always >= 0 for a
/// region produced by layout; intermediate arithmetic may pass through
/// negative values, which `clamped` resolves.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Region {
    /// Top-left corner.
    pub tl: Point,
    pub w: i32,
    pub h: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// The size of this region, ignoring location.
    pub fn size(&self) -> Size {
        Size {
            w: self.w,
            h: self.h,
        }
    }

    /// The position along an axis.
    pub fn pos(&self, axis: Axis) -> i32 {
        self.tl.along(axis)
    }

    /// The extent along an axis.
    pub fn len(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.w,
            Axis::Vertical => self.h,
        }
    }

    /// True if the region has no area.
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// One past the right edge.
    pub fn right(&self) -> i32 {
        self.tl.x + self.w
    }

    /// One past the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.tl.y + self.h
    }

    /// Does this region contain the point?
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x && p.x < self.right() && p.y >= self.tl.y && p.y < self.bottom()
    }

    /// Does this region completely contain the other?
    pub fn contains_region(&self, other: &Self) -> bool {
        other.tl.x >= self.tl.x
            && other.tl.y >= self.tl.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The intersection of two regions, if they overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x = self.tl.x.max(other.tl.x);
        let y = self.tl.y.max(other.tl.y);
        let w = self.right().min(other.right()) - x;
        let h = self.bottom().min(other.bottom()) - y;
        if w <= 0 || h <= 0 {
            None
        } else {
            Some(Self::new(x, y, w, h))
        }
    }

    /// A copy with negative width/height clamped to zero.
    pub fn clamped(&self) -> Self {
        Self {
            tl: self.tl,
            w: self.w.max(0),
            h: self.h.max(0),
        }
    }

    /// Shrink the region by a margin on all four sides. The result may have
    /// negative width or height; callers clamp.
    pub fn shrunk_by(&self, m: &Margin) -> Self {
        Self::new(
            self.tl.x + m.left,
            self.tl.y + m.top,
            self.w - m.left - m.right,
            self.h - m.top - m.bottom,
        )
    }
}

impl From<(i32, i32, i32, i32)> for Region {
    fn from(v: (i32, i32, i32, i32)) -> Self {
        Self::new(v.0, v.1, v.2, v.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn intersect() {
        let r = Region::new(5, 5, 10, 10);
        assert_eq!(r.intersect(&r), Some(r));
        assert_eq!(
            r.intersect(&Region::new(0, 0, 7, 7)),
            Some(Region::new(5, 5, 2, 2))
        );
        assert_eq!(
            r.intersect(&Region::new(8, 8, 20, 20)),
            Some(Region::new(8, 8, 7, 7))
        );
        assert_eq!(r.intersect(&Region::new(0, 0, 5, 5)), None);
        assert_eq!(r.intersect(&Region::new(15, 5, 5, 5)), None);
        assert_eq!(r.intersect(&Region::new(6, 6, 0, 5)), None);
    }

    #[test]
    fn contains() {
        let r = Region::new(2, 2, 4, 4);
        assert!(r.contains_point(Point::new(2, 2)));
        assert!(r.contains_point(Point::new(5, 5)));
        assert!(!r.contains_point(Point::new(6, 6)));
        assert!(r.contains_region(&Region::new(3, 3, 2, 2)));
        assert!(!r.contains_region(&Region::new(3, 3, 4, 4)));
    }

    #[test]
    fn shrink() {
        let r = Region::new(0, 0, 10, 10);
        let m = Margin::new(1, 2, 3, 4);
        assert_eq!(r.shrunk_by(&m), Region::new(4, 1, 4, 6));

        // Oversized margins go negative and clamp to an empty region.
        let m = Margin::uniform(6);
        assert_eq!(r.shrunk_by(&m).clamped(), Region::new(6, 6, 0, 0));
    }

    proptest! {
        #[test]
        fn intersect_commutes(
            ax in -50i32..50, ay in -50i32..50, aw in 0i32..50, ah in 0i32..50,
            bx in -50i32..50, by in -50i32..50, bw in 0i32..50, bh in 0i32..50,
        ) {
            let a = Region::new(ax, ay, aw, ah);
            let b = Region::new(bx, by, bw, bh);
            prop_assert_eq!(a.intersect(&b), b.intersect(&a));
        }

        #[test]
        fn intersect_contained(
            ax in -50i32..50, ay in -50i32..50, aw in 0i32..50, ah in 0i32..50,
            bx in -50i32..50, by in -50i32..50, bw in 0i32..50, bh in 0i32..50,
        ) {
            let a = Region::new(ax, ay, aw, ah);
            let b = Region::new(bx, by, bw, bh);
            if let Some(i) = a.intersect(&b) {
                prop_assert!(a.contains_region(&i));
                prop_assert!(b.contains_region(&i));
                prop_assert!(!i.is_empty());
            }
        }
    }
}
