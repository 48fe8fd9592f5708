use anyhow::Result;
use winit::event::WindowEvent;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the runtime.
///
/// Any error returned from a callback stops the loop and is returned from
/// `Runtime::run`.
pub trait App {
    /// Called once, after the drawing context exists and before the first
    /// frame. Shaders and textures are created here.
    fn on_start(&mut self, gpu: &mut Gpu<'_>) -> Result<()> {
        let _ = gpu;
        Ok(())
    }

    /// Called for window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;

    /// Called once before the drawing context is dropped.
    fn on_exit(&mut self, gpu: &mut Gpu<'_>) {
        let _ = gpu;
    }
}
