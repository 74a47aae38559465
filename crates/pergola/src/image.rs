//! Image widget and the tile catalog collaborator.

use geom::{Axis, Size, SizeRequest};

use crate::{Error, Result, node::Widget, render::Render, state::NodeState};

/// A resolved drawable: an opaque handle plus intrinsic dimensions in
/// layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Backend-opaque drawable handle.
    pub id: u64,
    /// Intrinsic dimensions.
    pub size: Size,
}

/// Resolves tile and file identifiers to drawables. Loading and decoding
/// live behind this trait; the engine only needs intrinsic dimensions and a
/// handle to pass back to the backend at draw time.
pub trait TileCatalog {
    /// Resolve a tile id.
    fn tile(&self, id: u64) -> Option<Tile>;

    /// Resolve an image file path.
    fn file(&self, path: &str) -> Option<Tile>;
}

/// A leaf widget displaying a tile or image file.
pub struct Image {
    state: NodeState,
    tile: Option<Tile>,
    shrink_h: bool,
    shrink_v: bool,
}

impl Image {
    pub fn new() -> Self {
        Self {
            state: NodeState::default(),
            tile: None,
            shrink_h: false,
            shrink_v: false,
        }
    }

    /// Allow compression below the intrinsic size per axis: the minimum for
    /// a shrinkable axis drops to zero while the natural size stays
    /// intrinsic.
    pub fn with_shrink(mut self, h: bool, v: bool) -> Self {
        self.shrink_h = h;
        self.shrink_v = v;
        self.state.invalidate_size();
        self
    }

    /// Display a tile from the catalog. A missing tile is a content error
    /// surfaced to the caller; layout is unaffected until one resolves.
    pub fn set_tile(&mut self, catalog: &dyn TileCatalog, id: u64) -> Result<()> {
        let tile = catalog
            .tile(id)
            .ok_or_else(|| Error::Invalid(format!("unknown tile {id}")))?;
        self.tile = Some(tile);
        self.state.invalidate_size();
        Ok(())
    }

    /// Display an image file resolved through the catalog.
    pub fn set_file(&mut self, catalog: &dyn TileCatalog, path: &str) -> Result<()> {
        let tile = catalog
            .file(path)
            .ok_or_else(|| Error::Invalid(format!("unknown image file {path}")))?;
        self.tile = Some(tile);
        self.state.invalidate_size();
        Ok(())
    }

    pub fn tile(&self) -> Option<Tile> {
        self.tile
    }

    fn shrinks(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.shrink_h,
            Axis::Vertical => self.shrink_v,
        }
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Image {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, axis: Axis, _prospective: Option<i32>) -> SizeRequest {
        let nat = self.tile.map_or(0, |t| t.size.along(axis));
        if self.shrinks(axis) {
            SizeRequest::new(0, nat)
        } else {
            SizeRequest::fixed(nat)
        }
    }

    fn draw(&mut self, r: &mut Render<'_>) -> Result<()> {
        if let Some(tile) = self.tile {
            let region = self.state.region();
            if !region.is_empty() {
                r.image(region, &tile)?;
            }
        }
        Ok(())
    }
}
