use anyhow::{Context, Result};

use shaderswap_engine::core::{App, AppControl, FrameCtx};
use shaderswap_engine::device::Gpu;
use shaderswap_engine::render::StreamingTexture;
use shaderswap_engine::shader::ShaderProgram;

use crate::variant::{FillSchedule, Variant};
use crate::{WINDOW_HEIGHT, WINDOW_WIDTH};

/// GPU resources created once the drawing context exists.
struct Resources {
    programs: Vec<ShaderProgram>,
    texture: StreamingTexture,
}

/// Draws one streaming texture per frame with the variant's shaders scoped
/// around the copy.
pub struct ShaderDemo {
    variant: Variant,
    resources: Option<Resources>,
}

impl ShaderDemo {
    pub fn new(variant: Variant) -> Self {
        Self { variant, resources: None }
    }
}

impl App for ShaderDemo {
    fn on_start(&mut self, gpu: &mut Gpu<'_>) -> Result<()> {
        let programs = self
            .variant
            .shaders
            .iter()
            .map(|s| {
                gpu.create_shader(s.kind, s.label, s.bytes)
                    .with_context(|| format!("creating {} shader `{}`", s.kind, s.label))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut texture = gpu
            .create_streaming_texture(WINDOW_WIDTH, WINDOW_HEIGHT)
            .context("creating streaming texture")?;

        if self.variant.schedule == FillSchedule::Once {
            self.variant.pattern.fill(&mut texture.lock(gpu.queue()), 0);
        }

        log::info!(
            "{}: {} on {:?}, {:?} fill",
            self.variant.title,
            gpu.id(),
            gpu.backend(),
            self.variant.schedule
        );
        for program in &programs {
            log::info!(
                "  {} shader `{}` ({}, {})",
                program.kind(),
                program.label(),
                program.id(),
                program.context()
            );
        }
        self.resources = Some(Resources { programs, texture });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let res = self
            .resources
            .as_mut()
            .context("frame requested before resources were created")?;

        if self.variant.schedule == FillSchedule::EveryFrame {
            self.variant
                .pattern
                .fill(&mut res.texture.lock(ctx.gpu.queue()), ctx.time.frame_index);
        }

        let programs: Vec<&ShaderProgram> = res.programs.iter().collect();
        ctx.draw_with_shader(&programs, &res.texture)
    }

    fn on_exit(&mut self, gpu: &mut Gpu<'_>) {
        if let Some(res) = self.resources.take() {
            for program in res.programs {
                gpu.release_shader(program);
            }
        }
    }
}
