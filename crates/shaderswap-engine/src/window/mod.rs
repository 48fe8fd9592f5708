//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single output window, and wires them to
//! the drawing context.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
