//! Test utilities: a probe widget with a fixed size request that records
//! draw and event order into a shared log.

use std::cell::RefCell;
use std::rc::Rc;

use geom::{Axis, SizeRequest};

use crate::{
    Result,
    event::Event,
    node::{Widget, node},
    render::Render,
    state::NodeState,
};

/// A shared log of probe activity, in call order.
pub type Log = Rc<RefCell<Vec<String>>>;

/// Create an empty activity log.
pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// A leaf widget for tests: reports a configured size request per axis,
/// and records rendering and event delivery.
pub struct Probe {
    /// Common node state.
    pub state: NodeState,
    /// Name recorded into the log.
    pub name: String,
    horz: SizeRequest,
    vert: SizeRequest,
    /// Whether `handle_event` consumes events.
    pub consume: bool,
    log: Option<Log>,
}

impl Probe {
    pub fn new(name: &str, horz: SizeRequest, vert: SizeRequest) -> Self {
        Self {
            state: NodeState::default(),
            name: name.into(),
            horz,
            vert,
            consume: false,
            log: None,
        }
    }

    /// Attach a shared activity log.
    pub fn with_log(mut self, log: &Log) -> Self {
        self.log = Some(log.clone());
        self
    }

    /// Consume every event offered.
    pub fn consuming(mut self) -> Self {
        self.consume = true;
        self
    }

    fn record(&self, what: &str) {
        if let Some(log) = &self.log {
            log.borrow_mut().push(format!("{}:{}", what, self.name));
        }
    }
}

impl Widget for Probe {
    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn measure(&mut self, axis: Axis, _prospective: Option<i32>) -> SizeRequest {
        match axis {
            Axis::Horizontal => self.horz,
            Axis::Vertical => self.vert,
        }
    }

    fn draw(&mut self, _r: &mut Render<'_>) -> Result<()> {
        self.record("draw");
        Ok(())
    }

    fn handle_event(&mut self, _event: &Event) -> bool {
        self.record("event");
        self.consume
    }
}

/// A probe with a fixed width and height.
pub fn probe(name: &str, w: i32, h: i32) -> Rc<RefCell<Probe>> {
    node(Probe::new(
        name,
        SizeRequest::fixed(w),
        SizeRequest::fixed(h),
    ))
}

/// A probe with distinct minimum and natural sizes per axis.
pub fn probe_minmax(name: &str, horz: (i32, i32), vert: (i32, i32)) -> Rc<RefCell<Probe>> {
    node(Probe::new(
        name,
        SizeRequest::new(horz.0, horz.1),
        SizeRequest::new(vert.0, vert.1),
    ))
}
