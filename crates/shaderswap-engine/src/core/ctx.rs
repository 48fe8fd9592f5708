use anyhow::{Context, Result};
use winit::window::Window;

use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::render::{draw_frame, ShaderScopedTarget, StreamingTexture};
use crate::shader::{ProgramRestore, ShaderKind, ShaderProgram};
use crate::time::FrameTime;

use super::app::AppControl;

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Draws `texture` over the whole window with `programs` installed for the
    /// copy only, then presents.
    ///
    /// A lost or outdated surface skips the frame; running out of memory is an
    /// error.
    pub fn draw_with_shader(
        &mut self,
        programs: &[&ShaderProgram],
        texture: &StreamingTexture,
    ) -> Result<AppControl> {
        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(anyhow::anyhow!("surface is out of memory")),
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        Ok(AppControl::Continue)
                    }
                };
            }
        };

        let before = ShaderKind::ALL.map(|kind| self.gpu.active_shader(kind));

        let mut target = SurfaceTarget {
            gpu: &mut *self.gpu,
            window: self.window,
            frame: Some(frame),
        };
        draw_frame(&mut target, programs, texture)
            .with_context(|| format!("frame {} failed", self.time.frame_index))?;

        debug_assert_eq!(
            before,
            ShaderKind::ALL.map(|kind| self.gpu.active_shader(kind)),
            "shader slots changed across a frame"
        );

        Ok(AppControl::Continue)
    }
}

/// The window surface seen through the shader-scoped draw capability.
struct SurfaceTarget<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    window: &'a Window,
    frame: Option<GpuFrame>,
}

impl ShaderScopedTarget for SurfaceTarget<'_, '_> {
    type Program = ShaderProgram;
    type Texture = StreamingTexture;
    type Saved = ProgramRestore;

    fn install_shader(&mut self, program: &ShaderProgram) -> Result<ProgramRestore> {
        Ok(self.gpu.install_shader(program)?)
    }

    fn restore_shader(&mut self, saved: ProgramRestore) -> Result<()> {
        Ok(self.gpu.restore_shader(saved)?)
    }

    fn copy_full(&mut self, texture: &StreamingTexture) -> Result<()> {
        let frame = self.frame.as_mut().context("frame was already presented")?;
        self.gpu.copy_to_frame(frame, texture)
    }

    fn flush(&mut self) -> Result<()> {
        let frame = self.frame.as_mut().context("frame was already presented")?;
        self.gpu.flush(frame);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let frame = self.frame.take().context("frame was already presented")?;
        self.window.pre_present_notify();
        self.gpu.present(frame);
        Ok(())
    }
}
