//! Draw primitives, the backend strategy trait, and scissor clipping.

use std::rc::Rc;

use geom::{Point, Region, Size};

use crate::{Result, image::Tile, style::StyledRun, text::TextMetrics};

/// The trait implemented by rendering backends. One backend is selected at
/// startup; everything above this trait is backend-independent. Character
/// grid backends use 1x1 cells as layout units, pixel backends use pixels.
pub trait Backend {
    /// Current surface size in layout units.
    fn size(&self) -> Size;

    /// The text measurement strategy matching this backend's units.
    fn metrics(&self) -> Rc<dyn TextMetrics>;

    /// Clear the surface ahead of a frame.
    fn reset(&mut self) -> Result<()>;

    /// Fill a rectangle with a character.
    fn fill(&mut self, region: Region, ch: char, fg: Option<crate::style::Color>) -> Result<()>;

    /// Output a styled run sequence starting at `origin`.
    fn text_run(&mut self, origin: Point, runs: &[StyledRun]) -> Result<()>;

    /// Draw an image into a region.
    fn image(&mut self, region: Region, tile: &Tile) -> Result<()>;

    /// Flush buffered output to the device.
    fn flush(&mut self) -> Result<()>;
}

/// A stack of clip rectangles. Pushing intersects the new rectangle with the
/// current top, so nested scissors only ever narrow; with the stack empty
/// the scissor is the full surface.
pub struct ScissorStack {
    surface: Region,
    stack: Vec<Region>,
}

impl ScissorStack {
    pub fn new(surface: Size) -> Self {
        Self {
            surface: surface.region(),
            stack: Vec::new(),
        }
    }

    /// Re-seed the surface rectangle after a host resize.
    pub fn set_surface(&mut self, surface: Size) {
        self.surface = surface.region();
    }

    /// Push a clip rectangle, narrowed to the current scissor. A disjoint
    /// rectangle degenerates to zero size rather than failing.
    pub fn push(&mut self, region: Region) {
        let clipped = region
            .intersect(&self.current())
            .unwrap_or(Region::new(region.tl.x, region.tl.y, 0, 0));
        self.stack.push(clipped);
    }

    /// Pop the top scissor. Popping an empty stack is a programmer error.
    pub fn pop(&mut self) -> Region {
        self.stack.pop().expect("pop on an empty scissor stack")
    }

    /// The active clip rectangle.
    pub fn current(&self) -> Region {
        self.stack.last().copied().unwrap_or(self.surface)
    }
}

/// A per-frame draw handle: forwards primitives to the backend after
/// clipping them against the active scissor.
pub struct Render<'a> {
    backend: &'a mut dyn Backend,
    scissors: &'a mut ScissorStack,
}

impl<'a> Render<'a> {
    pub fn new(backend: &'a mut dyn Backend, scissors: &'a mut ScissorStack) -> Self {
        Self { backend, scissors }
    }

    /// The backend's text metrics.
    pub fn metrics(&self) -> Rc<dyn TextMetrics> {
        self.backend.metrics()
    }

    /// The active clip rectangle.
    pub fn scissor(&self) -> Region {
        self.scissors.current()
    }

    /// Narrow the scissor for nested drawing.
    pub fn push_scissor(&mut self, region: Region) {
        self.scissors.push(region);
    }

    pub fn pop_scissor(&mut self) {
        self.scissors.pop();
    }

    /// Fill a rectangle, clipped to the scissor.
    pub fn fill(&mut self, region: Region, ch: char, fg: Option<crate::style::Color>) -> Result<()> {
        match region.intersect(&self.scissors.current()) {
            Some(clipped) => self.backend.fill(clipped, ch, fg),
            None => Ok(()),
        }
    }

    /// Draw an image, clipped to the scissor.
    pub fn image(&mut self, region: Region, tile: &Tile) -> Result<()> {
        match region.intersect(&self.scissors.current()) {
            Some(clipped) => self.backend.image(clipped, tile),
            None => Ok(()),
        }
    }

    /// Output one line of styled runs starting at `origin`, dropping
    /// characters outside the scissor.
    pub fn text_run(&mut self, origin: Point, runs: &[StyledRun]) -> Result<()> {
        let scissor = self.scissors.current();
        let metrics = self.backend.metrics();
        let line_h = metrics.line_height();
        if origin.y >= scissor.bottom() || origin.y + line_h <= scissor.tl.y {
            return Ok(());
        }

        let mut x = origin.x;
        let mut out_x = None;
        let mut out: Vec<StyledRun> = Vec::new();
        let mut buf = [0u8; 4];
        'runs: for run in runs {
            let mut kept = String::new();
            for ch in run.text.chars() {
                let cw = metrics.width(ch.encode_utf8(&mut buf));
                if x >= scissor.right() {
                    if !kept.is_empty() {
                        out.push(StyledRun::new(kept, run.fg));
                    }
                    break 'runs;
                }
                // Keep any character at least partially inside the scissor.
                if x + cw > scissor.tl.x {
                    if out_x.is_none() {
                        out_x = Some(x);
                    }
                    kept.push(ch);
                }
                x += cw;
            }
            if !kept.is_empty() {
                out.push(StyledRun::new(kept, run.fg));
            }
        }

        match out_x {
            Some(ox) => self.backend.text_run(Point::new(ox, origin.y), &out),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissor_push_intersects_with_parent() {
        let mut s = ScissorStack::new(Size::new(100, 50));
        assert_eq!(s.current(), Region::new(0, 0, 100, 50));

        s.push(Region::new(10, 10, 50, 20));
        assert_eq!(s.current(), Region::new(10, 10, 50, 20));

        // A child scissor wider than its parent is narrowed.
        s.push(Region::new(0, 0, 100, 100));
        assert_eq!(s.current(), Region::new(10, 10, 50, 20));
        s.pop();

        // A disjoint scissor degenerates to zero size.
        s.push(Region::new(90, 40, 10, 10));
        assert_eq!(s.current().size(), Size::new(0, 0));

        s.pop();
        s.pop();
        assert_eq!(s.current(), Region::new(0, 0, 100, 50));
    }

    #[test]
    #[should_panic(expected = "empty scissor stack")]
    fn scissor_pop_empty_panics() {
        let mut s = ScissorStack::new(Size::new(10, 10));
        s.pop();
    }
}
