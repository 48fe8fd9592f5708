//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime loop and the
//! programs built on it: the application trait and the per-frame context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
