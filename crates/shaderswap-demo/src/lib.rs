//! Demo programs for the shaderswap engine.
//!
//! Every binary opens one fixed-size window, fills one streaming texture and
//! draws it each frame with its own precompiled shaders installed for the copy
//! only. The binaries differ only in their [`Variant`].

mod app;
pub mod fill;
pub mod variant;

use anyhow::Result;
use winit::dpi::PhysicalSize;

use shaderswap_engine::device::GpuInit;
use shaderswap_engine::logging::{init_logging, LoggingConfig};
use shaderswap_engine::window::{Runtime, RuntimeConfig};

pub use app::ShaderDemo;
pub use fill::Pattern;
pub use variant::{EmbeddedShader, FillSchedule, Variant};

pub const WINDOW_WIDTH: u32 = 640;
pub const WINDOW_HEIGHT: u32 = 480;

/// Runs `variant` until its window is closed.
pub fn run(variant: Variant) -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu_init = GpuInit::default();
    log::info!(
        "{}: requiring the {:?} backend",
        variant.title,
        gpu_init.required_backend
    );

    let config = RuntimeConfig {
        title: variant.title.to_string(),
        size: PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT),
    };

    Runtime::run(config, gpu_init, ShaderDemo::new(variant))
}
