//! shaderswap engine crate.
//!
//! Acquires a hardware-accelerated drawing context on a verified backend and
//! lets a program install its own precompiled shaders around a single
//! full-surface texture copy, restoring the previous shaders afterwards.

pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod shader;
pub mod time;
pub mod window;
