use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::render::{BlitRenderer, RenderCtx, RenderTarget, StreamingTexture};
use crate::shader::{
    ContextId, ProgramRestore, ShaderBlob, ShaderError, ShaderId, ShaderKind, ShaderProgram,
    ShaderSlots,
};

use super::{surface, verify_adapter, GpuFrame, GpuInit, SurfaceErrorAction};

/// The drawing context: a hardware-accelerated surface bound to one window.
///
/// - creates and stores Adapter/Device/Queue on a verified backend
/// - creates and configures the Surface (swapchain)
/// - holds the active custom shader per kind and the copy renderer
pub struct Gpu<'w> {
    id: ContextId,

    /// Surface bound to the window.
    ///
    /// Surface lifetime is tied to the window; the window must outlive the `Gpu`.
    surface: wgpu::Surface<'w>,

    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    shaders: ShaderSlots<Arc<wgpu::ShaderModule>>,
    blit: BlitRenderer,
}

impl<'w> Gpu<'w> {
    /// Creates a drawing context bound to a window.
    ///
    /// Fails if the adapter does not run on `init.required_backend` or is not
    /// hardware accelerated when that is required. No retry is attempted.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let GpuInit {
            backend_hint,
            required_backend,
            require_hardware,
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: backend_hint,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .with_context(|| format!("no GPU adapter for backends {backend_hint:?}"))?;

        let info = adapter.get_info();
        log::info!(
            "adapter `{}` on {:?} ({:?}, driver {} {})",
            info.name,
            info.backend,
            info.device_type,
            info.driver,
            info.driver_info
        );
        verify_adapter(required_backend, require_hardware, info.backend, info.device_type)
            .context("drawing context rejected")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("shaderswap device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .context("no supported surface formats")?;
        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        let id = ContextId::next();
        let blit = BlitRenderer::new(&device);
        log::debug!("{id} ready: {}x{} {format:?}", size.width, size.height);

        Ok(Self {
            id,
            surface,
            adapter,
            device,
            queue,
            config,
            size,
            shaders: ShaderSlots::new(id),
            blit,
        })
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Backend the context actually runs on.
    pub fn backend(&self) -> wgpu::Backend {
        self.adapter.get_info().backend
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface after a resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    // ── shaders ───────────────────────────────────────────────────────────

    /// Compiles a precompiled SPIR-V blob into a program owned by the caller.
    pub fn create_shader(
        &self,
        kind: ShaderKind,
        label: &str,
        bytes: &[u8],
    ) -> Result<ShaderProgram, ShaderError> {
        let blob = ShaderBlob::parse(kind, bytes)?;
        Ok(ShaderProgram::new(&self.device, self.id, label, &blob))
    }

    /// Installs `program` as the active shader of its kind.
    ///
    /// The returned token restores the previously active one.
    pub fn install_shader(&mut self, program: &ShaderProgram) -> Result<ProgramRestore, ShaderError> {
        let token = self.shaders.install(program.bound())?;
        log::trace!("installed {} on {}", program.id(), self.id);
        Ok(token)
    }

    pub fn restore_shader(&mut self, token: ProgramRestore) -> Result<(), ShaderError> {
        let (kind, previous) = (token.kind(), token.previous_id());
        self.shaders.restore(token)?;
        log::trace!("restored {kind} slot on {} to {previous:?}", self.id);
        Ok(())
    }

    /// Active custom shader of `kind`, `None` when the built-in one is in use.
    pub fn active_shader(&self, kind: ShaderKind) -> Option<ShaderId> {
        self.shaders.active_id(kind)
    }

    /// Drops cached pipelines built for a program that is going away.
    pub fn release_shader(&mut self, program: ShaderProgram) {
        self.blit.forget_shader(program.id());
    }

    // ── textures ──────────────────────────────────────────────────────────

    pub fn create_streaming_texture(&self, width: u32, height: u32) -> Result<StreamingTexture> {
        StreamingTexture::new(
            &self.device,
            self.id,
            self.blit.bind_group_layout(),
            self.blit.sampler(),
            width,
            height,
        )
    }

    // ── frames ────────────────────────────────────────────────────────────

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder: self.create_encoder(),
        })
    }

    /// Records a full-destination copy of `texture` under the active shaders.
    pub fn copy_to_frame(&mut self, frame: &mut GpuFrame, texture: &StreamingTexture) -> Result<()> {
        anyhow::ensure!(
            texture.context() == self.id,
            "texture created by {} cannot be drawn on {}",
            texture.context(),
            self.id
        );

        let ctx = RenderCtx::new(&self.device, self.config.format);
        let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
        self.blit.copy(
            &ctx,
            &mut target,
            self.shaders.active(ShaderKind::Vertex),
            self.shaders.active(ShaderKind::Pixel),
            texture.bind_group(),
        );
        Ok(())
    }

    /// Submits everything recorded so far and starts a fresh encoder.
    pub fn flush(&self, frame: &mut GpuFrame) {
        let encoder = std::mem::replace(&mut frame.encoder, self.create_encoder());
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Submits any remaining commands and presents the frame.
    pub fn present(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action, reconfiguring
    /// the surface when it was lost or outdated.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = surface::surface_error_action(&err);
        if action == SurfaceErrorAction::Reconfigured && self.size.width > 0 && self.size.height > 0 {
            self.surface.configure(&self.device, &self.config);
        }
        log::warn!("surface error: {err} -> {action:?}");
        action
    }

    fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("shaderswap frame encoder"),
            })
    }
}
