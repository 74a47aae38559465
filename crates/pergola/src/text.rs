//! Text widget: markup-styled lines, optional wrapping and ellipsizing.

use std::ops::Range;
use std::rc::Rc;

use geom::{Axis, Point, SizeRequest};
use unicode_width::UnicodeWidthStr;

use crate::{
    Result,
    node::Widget,
    render::Render,
    state::NodeState,
    style::{StyledRun, parse_markup, plain_text},
};

/// Text measurement and line breaking in the backend's layout units. The
/// character-grid backend measures in cells; a pixel backend substitutes
/// font metrics.
pub trait TextMetrics {
    /// Visual width of a single-line string.
    fn width(&self, text: &str) -> i32;

    /// Height of one line.
    fn line_height(&self) -> i32;

    /// Break one logical line into wrapped lines no wider than `width`,
    /// returned as byte ranges into `text`. Breaks fall at token boundaries
    /// where possible.
    fn wrap(&self, text: &str, width: i32) -> Vec<Range<usize>>;
}

/// Cell-based metrics for the character grid: every line is one cell high
/// and widths follow Unicode column conventions.
pub struct CellMetrics;

impl TextMetrics for CellMetrics {
    fn width(&self, text: &str) -> i32 {
        text.width() as i32
    }

    fn line_height(&self) -> i32 {
        1
    }

    fn wrap(&self, text: &str, width: i32) -> Vec<Range<usize>> {
        let width = width.max(1) as usize;
        let mut ranges = Vec::new();
        let mut cursor = 0;
        for line in textwrap::wrap(text, width) {
            let line: &str = &line;
            if line.is_empty() {
                ranges.push(cursor..cursor);
                continue;
            }
            let start = text[cursor..]
                .find(line)
                .map_or(cursor, |p| cursor + p);
            ranges.push(start..start + line.len());
            cursor = start + line.len();
        }
        if ranges.is_empty() {
            ranges.push(0..0);
        }
        ranges
    }
}

/// Wrapped output for one width, recomputed when the width changes.
struct Wrapped {
    width: i32,
    lines: Vec<Vec<StyledRun>>,
}

/// A leaf widget displaying styled text parsed from markup.
///
/// Without wrapping, the widget reports its unwrapped extents and the draw
/// path can ellipsize overlong lines. With wrapping, lines break at token
/// boundaries against the prospective or allocated width, and the wrapped
/// extents drive size negotiation.
pub struct Text {
    state: NodeState,
    lines: Vec<Vec<StyledRun>>,
    wrap_text: bool,
    ellipsize: bool,
    metrics: Rc<dyn TextMetrics>,
    wrapped: Option<Wrapped>,
}

impl Text {
    pub fn new(markup: &str) -> Self {
        let mut text = Self {
            state: NodeState::default(),
            lines: Vec::new(),
            wrap_text: false,
            ellipsize: false,
            metrics: Rc::new(CellMetrics),
            wrapped: None,
        };
        text.set_text(markup);
        text
    }

    /// Use the given measurement strategy instead of cell metrics.
    pub fn with_metrics(mut self, metrics: Rc<dyn TextMetrics>) -> Self {
        self.metrics = metrics;
        self.wrapped = None;
        self.state.invalidate_size();
        self
    }

    /// Enable line wrapping.
    pub fn with_wrap(mut self) -> Self {
        self.set_wrap_text(true);
        self
    }

    /// Enable ellipsizing of overlong lines.
    pub fn with_ellipsize(mut self) -> Self {
        self.set_ellipsize(true);
        self
    }

    /// Replace the content, invalidating size and wrap caches.
    pub fn set_text(&mut self, markup: &str) {
        self.lines = split_lines(&parse_markup(markup));
        self.wrapped = None;
        self.state.invalidate_size();
    }

    pub fn set_wrap_text(&mut self, wrap: bool) {
        self.wrap_text = wrap;
        self.wrapped = None;
        self.state.invalidate_size();
    }

    pub fn set_ellipsize(&mut self, ellipsize: bool) {
        self.ellipsize = ellipsize;
    }

    /// The widest logical line, unwrapped.
    fn unwrapped_width(&self) -> i32 {
        self.lines
            .iter()
            .map(|l| line_width(&*self.metrics, l))
            .max()
            .unwrap_or(0)
    }

    /// Recompute the wrap cache if the width changed.
    fn wrap_to(&mut self, width: i32) {
        if self.wrapped.as_ref().is_some_and(|w| w.width == width) {
            return;
        }
        let mut lines = Vec::new();
        for line in &self.lines {
            let plain = plain_text(line);
            for range in self.metrics.wrap(&plain, width) {
                lines.push(slice_runs(line, range));
            }
        }
        self.wrapped = Some(Wrapped { width, lines });
    }
}

impl Widget for Text {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, axis: Axis, prospective: Option<i32>) -> SizeRequest {
        match axis {
            Axis::Horizontal => {
                let w = self.unwrapped_width();
                if self.wrap_text {
                    SizeRequest::new(0, w)
                } else {
                    SizeRequest::fixed(w)
                }
            }
            Axis::Vertical => {
                let line_h = self.metrics.line_height();
                if self.wrap_text && let Some(width) = prospective {
                    self.wrap_to(width);
                    let n = self.wrapped.as_ref().map_or(0, |w| w.lines.len());
                    SizeRequest::fixed(n as i32 * line_h)
                } else {
                    SizeRequest::fixed(self.lines.len() as i32 * line_h)
                }
            }
        }
    }

    fn arrange(&mut self) {
        if self.wrap_text {
            self.wrap_to(self.state.region().w);
        }
    }

    fn draw(&mut self, r: &mut Render<'_>) -> Result<()> {
        let region = self.state.region();
        if region.is_empty() {
            return Ok(());
        }
        let metrics = self.metrics.clone();
        let line_h = metrics.line_height();
        if self.wrap_text {
            self.wrap_to(region.w);
        }
        let lines = match (&self.wrapped, self.wrap_text) {
            (Some(w), true) => &w.lines,
            _ => &self.lines,
        };
        for (i, line) in lines.iter().enumerate() {
            let y = region.tl.y + i as i32 * line_h;
            if y >= region.bottom() {
                break;
            }
            let origin = Point::new(region.tl.x, y);
            if !self.wrap_text
                && self.ellipsize
                && line_width(&*metrics, line) > region.w
            {
                let shortened = ellipsized(&*metrics, line, region.w);
                r.text_run(origin, &shortened)?;
            } else {
                r.text_run(origin, line)?;
            }
        }
        Ok(())
    }
}

/// Sum of run widths on one line.
fn line_width(metrics: &dyn TextMetrics, line: &[StyledRun]) -> i32 {
    line.iter().map(|r| metrics.width(&r.text)).sum()
}

/// Split parsed runs into logical lines at newlines.
fn split_lines(runs: &[StyledRun]) -> Vec<Vec<StyledRun>> {
    if runs.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![Vec::new()];
    for run in runs {
        for (i, part) in run.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if !part.is_empty()
                && let Some(line) = lines.last_mut()
            {
                line.push(StyledRun::new(part, run.fg));
            }
        }
    }
    lines
}

/// Extract the byte range from a run sequence, preserving styles.
fn slice_runs(runs: &[StyledRun], range: Range<usize>) -> Vec<StyledRun> {
    let mut out = Vec::new();
    let mut offset = 0;
    for run in runs {
        let len = run.text.len();
        let start = range.start.saturating_sub(offset).min(len);
        let end = range.end.saturating_sub(offset).min(len);
        if start < end {
            out.push(StyledRun::new(&run.text[start..end], run.fg));
        }
        offset += len;
    }
    out
}

/// Truncate a line to `width` and append an ellipsis.
fn ellipsized(metrics: &dyn TextMetrics, line: &[StyledRun], width: i32) -> Vec<StyledRun> {
    const DOTS: &str = "..";
    let keep_width = (width - metrics.width(DOTS)).max(0);
    let mut out = Vec::new();
    let mut used = 0;
    let mut buf = [0u8; 4];
    'runs: for run in line {
        let mut kept = String::new();
        for ch in run.text.chars() {
            let cw = metrics.width(ch.encode_utf8(&mut buf));
            if used + cw > keep_width {
                if !kept.is_empty() {
                    out.push(StyledRun::new(kept, run.fg));
                }
                break 'runs;
            }
            kept.push(ch);
            used += cw;
        }
        if !kept.is_empty() {
            out.push(StyledRun::new(kept, run.fg));
        }
    }
    out.push(StyledRun::plain(DOTS));
    out
}
