//! Rendering backends: a crossterm-backed character grid and an in-memory
//! canvas for tests. Both implement the `Backend` strategy trait; the core
//! never branches on which one is active.

pub mod term;

pub use term::{TermBackend, TermEvents};
pub use test::{Canvas, ScriptedEvents, TestBackend};
