/// A (minimum, natural) size pair a widget reports for one axis during the
/// bottom-up size-negotiation pass. `min <= nat` always holds.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct SizeRequest {
    /// The smallest extent the widget can be usefully allocated.
    pub min: i32,
    /// The extent the widget would occupy given free space.
    pub nat: i32,
}

impl SizeRequest {
    pub const ZERO: Self = Self { min: 0, nat: 0 };

    pub fn new(min: i32, nat: i32) -> Self {
        debug_assert!(min <= nat, "size request {min} > {nat}");
        Self { min, nat }
    }

    /// A request whose minimum and natural sizes coincide.
    pub fn fixed(n: i32) -> Self {
        Self { min: n, nat: n }
    }

    /// Component-wise sum, for main-axis accumulation.
    pub fn add(&self, other: Self) -> Self {
        Self {
            min: self.min + other.min,
            nat: self.nat + other.nat,
        }
    }

    /// Component-wise maximum, for cross-axis accumulation.
    pub fn max(&self, other: Self) -> Self {
        Self {
            min: self.min.max(other.min),
            nat: self.nat.max(other.nat),
        }
    }

    /// Grow both components by a fixed amount, e.g. a margin.
    pub fn grown_by(&self, n: i32) -> Self {
        Self {
            min: self.min + n,
            nat: self.nat + n,
        }
    }

    /// The natural size slack above the minimum.
    pub fn slack(&self) -> i32 {
        self.nat - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate() {
        let a = SizeRequest::new(2, 5);
        let b = SizeRequest::new(3, 4);
        assert_eq!(a.add(b), SizeRequest::new(5, 9));
        assert_eq!(a.max(b), SizeRequest::new(3, 5));
        assert_eq!(a.grown_by(2), SizeRequest::new(4, 7));
        assert_eq!(a.slack(), 3);
        assert_eq!(SizeRequest::fixed(7), SizeRequest::new(7, 7));
    }
}
