//! Abstracted input events routed through the widget tree.

pub mod key;
pub mod mouse;

use geom::Size;

/// The event types that drive an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keystroke.
    Key(key::Key),
    /// A mouse action.
    Mouse(mouse::MouseEvent),
    /// The host surface changed size.
    Resize(Size),
}

/// An emitter polled by the event pump to retrieve events. Returning `None`
/// means the source is exhausted and the pump should stop.
pub trait EventSource {
    /// Retrieve the next event, blocking until one is available.
    fn next(&mut self) -> Option<Event>;
}
