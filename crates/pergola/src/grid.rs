//! Two-dimensional track-based layout.

use geom::{Axis, Point, Region, Size, SizeRequest};

use crate::flex::distribute_main;
use crate::node::{Children, NodeRef, Widget};
use crate::state::NodeState;

/// One column or row: its resolved size and offset, the size request
/// accumulated from the children touching it, and its flex weight.
#[derive(Debug, Clone, Copy, Default)]
struct TrackInfo {
    size: i32,
    offset: i32,
    sr: SizeRequest,
    flex_grow: i32,
}

/// A grid child: its cell position, its span in cells, and the widget.
struct GridEntry {
    pos: Point,
    span: Size,
    widget: NodeRef,
}

/// A container that lays children out on a grid of columns and rows.
/// Children occupy rectangular cell spans; each track is sized from the
/// children touching it and participates in surplus distribution through
/// its own flex weight.
pub struct Grid {
    state: NodeState,
    entries: Vec<GridEntry>,
    cols: Vec<TrackInfo>,
    rows: Vec<TrackInfo>,
    tracks_dirty: bool,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            state: NodeState::default(),
            entries: Vec::new(),
            cols: Vec::new(),
            rows: Vec::new(),
            tracks_dirty: false,
        }
    }

    /// Place a child at cell `(x, y)` spanning `w` columns and `h` rows.
    pub fn add_child(&mut self, child: NodeRef, x: i32, y: i32, w: i32, h: i32) {
        assert!(x >= 0 && y >= 0, "grid position ({x}, {y}) must be non-negative");
        assert!(w >= 1 && h >= 1, "grid span ({w}, {h}) must be at least 1x1");
        self.entries.push(GridEntry {
            pos: Point::new(x, y),
            span: Size::new(w, h),
            widget: child,
        });
        self.tracks_dirty = true;
        self.state.invalidate_size();
    }

    /// Mutable access to one track's flex weight. Exactly one of `x`/`y` is
    /// -1: `x >= 0` selects a column, `y >= 0` selects a row.
    pub fn track_flex_grow(&mut self, x: i32, y: i32) -> &mut i32 {
        self.init_track_info();
        assert!(
            (x == -1) != (y == -1),
            "track_flex_grow selects exactly one of column/row"
        );
        if x >= 0 {
            &mut self.cols[x as usize].flex_grow
        } else {
            &mut self.rows[y as usize].flex_grow
        }
    }

    /// The number of (columns, rows) declared by child spans.
    pub fn track_counts(&self) -> (usize, usize) {
        let mut nc = 0;
        let mut nr = 0;
        for e in &self.entries {
            nc = nc.max((e.pos.x + e.span.w) as usize);
            nr = nr.max((e.pos.y + e.span.h) as usize);
        }
        (nc, nr)
    }

    /// Rebuild the track vectors to cover every child span. Flex weights
    /// already set on existing tracks are preserved; new tracks default to
    /// no flex.
    fn init_track_info(&mut self) {
        if !self.tracks_dirty {
            return;
        }
        let (nc, nr) = self.track_counts();
        self.cols.resize(nc, TrackInfo::default());
        self.rows.resize(nr, TrackInfo::default());
        self.tracks_dirty = false;
    }

    fn tracks(&mut self, axis: Axis) -> &mut Vec<TrackInfo> {
        match axis {
            Axis::Horizontal => &mut self.cols,
            Axis::Vertical => &mut self.rows,
        }
    }

    /// A child's cell range along one axis: (first track, span).
    fn cell_range(entry: &GridEntry, axis: Axis) -> (usize, usize) {
        (
            entry.pos.along(axis) as usize,
            entry.span.along(axis) as usize,
        )
    }

    /// Accumulate per-track size requests along one axis. Non-spanning
    /// children contribute directly to their track; spanning children then
    /// top up their spanned tracks so the union always satisfies the span's
    /// request. `prospectives` carries a per-child prospective cross size
    /// for height queries.
    fn compute_track_requests(&mut self, axis: Axis, prospectives: Option<&[i32]>) {
        for track in self.tracks(axis).iter_mut() {
            track.sr = SizeRequest::ZERO;
        }

        let child_srs: Vec<SizeRequest> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let pw = prospectives.map(|p| p[i]);
                e.widget.borrow_mut().get_preferred_size(axis, pw)
            })
            .collect();

        // Non-spanning children first, so spanning children top up against
        // the settled single-track demands.
        for (entry, sr) in self.entries.iter().zip(&child_srs) {
            let (first, span) = Self::cell_range(entry, axis);
            if span == 1 {
                let track = match axis {
                    Axis::Horizontal => &mut self.cols[first],
                    Axis::Vertical => &mut self.rows[first],
                };
                track.sr = track.sr.max(*sr);
            }
        }
        for (entry, sr) in self.entries.iter().zip(&child_srs) {
            let (first, span) = Self::cell_range(entry, axis);
            if span > 1 {
                let tracks = match axis {
                    Axis::Horizontal => &mut self.cols[first..first + span],
                    Axis::Vertical => &mut self.rows[first..first + span],
                };
                top_up_span(tracks, *sr);
            }
        }

        for track in self.tracks(axis).iter_mut() {
            track.sr = SizeRequest::new(track.sr.min, track.sr.nat.max(track.sr.min));
        }
    }

    /// Resolve track sizes along one axis with the flex surplus/shrink rule.
    fn layout_tracks(&mut self, axis: Axis, available: i32) {
        let tracks = self.tracks(axis);
        let requests: Vec<SizeRequest> = tracks.iter().map(|t| t.sr).collect();
        let weights: Vec<i32> = tracks.iter().map(|t| t.flex_grow).collect();
        let sizes = distribute_main(&requests, &weights, available);
        for (track, size) in tracks.iter_mut().zip(sizes) {
            track.size = size;
        }
    }

    /// Assign each track's offset as the prefix sum of preceding tracks.
    fn set_track_offsets(&mut self, axis: Axis, base: i32) {
        let mut acc = base;
        for track in self.tracks(axis).iter_mut() {
            track.offset = acc;
            acc += track.size;
        }
    }

    /// The union region of the tracks under a cell span.
    fn tracks_region(&self, x: usize, y: usize, w: usize, h: usize) -> Region {
        assert!(x + w <= self.cols.len() && y + h <= self.rows.len());
        let left = self.cols[x].offset;
        let top = self.rows[y].offset;
        let lc = &self.cols[x + w - 1];
        let lr = &self.rows[y + h - 1];
        Region::new(left, top, lc.offset + lc.size - left, lr.offset + lr.size - top)
    }

    /// Column widths summed under each child's span, for height-for-width
    /// queries.
    fn span_widths(&self) -> Vec<i32> {
        self.entries
            .iter()
            .map(|e| {
                let (first, span) = Self::cell_range(e, Axis::Horizontal);
                self.cols[first..first + span].iter().map(|t| t.size).sum()
            })
            .collect()
    }
}

/// Grow the spanned tracks until their request sums cover `sr`. The deficit
/// is split evenly, remainder to the leading tracks.
fn top_up_span(tracks: &mut [TrackInfo], sr: SizeRequest) {
    let n = tracks.len() as i32;
    let min_deficit = sr.min - tracks.iter().map(|t| t.sr.min).sum::<i32>();
    if min_deficit > 0 {
        for (i, track) in tracks.iter_mut().enumerate() {
            let add = min_deficit / n + i32::from((i as i32) < min_deficit % n);
            track.sr.min += add;
        }
    }
    let nat_deficit = sr.nat - tracks.iter().map(|t| t.sr.nat).sum::<i32>();
    if nat_deficit > 0 {
        for (i, track) in tracks.iter_mut().enumerate() {
            let add = nat_deficit / n + i32::from((i as i32) < nat_deficit % n);
            track.sr.nat += add;
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Grid {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, axis: Axis, prospective: Option<i32>) -> SizeRequest {
        self.init_track_info();
        match axis {
            Axis::Horizontal => {
                self.compute_track_requests(Axis::Horizontal, None);
                self.cols
                    .iter()
                    .fold(SizeRequest::ZERO, |acc, t| acc.add(t.sr))
            }
            Axis::Vertical => {
                self.compute_track_requests(Axis::Horizontal, None);
                let prospectives = prospective.map(|width| {
                    self.layout_tracks(Axis::Horizontal, width);
                    self.span_widths()
                });
                self.compute_track_requests(Axis::Vertical, prospectives.as_deref());
                self.rows
                    .iter()
                    .fold(SizeRequest::ZERO, |acc, t| acc.add(t.sr))
            }
        }
    }

    fn arrange(&mut self) {
        self.init_track_info();
        if self.entries.is_empty() {
            return;
        }
        let region = self.state.region();

        self.compute_track_requests(Axis::Horizontal, None);
        self.layout_tracks(Axis::Horizontal, region.w);
        self.set_track_offsets(Axis::Horizontal, region.tl.x);

        let widths = self.span_widths();
        self.compute_track_requests(Axis::Vertical, Some(&widths));
        self.layout_tracks(Axis::Vertical, region.h);
        self.set_track_offsets(Axis::Vertical, region.tl.y);

        for entry in &self.entries {
            let r = self.tracks_region(
                entry.pos.x as usize,
                entry.pos.y as usize,
                entry.span.w as usize,
                entry.span.h as usize,
            );
            entry.widget.borrow_mut().allocate_region(r.clamped());
        }
    }

    fn children(&self) -> Children<'_> {
        Box::new(self.entries.iter().map(|e| e.widget.clone()))
    }
}
