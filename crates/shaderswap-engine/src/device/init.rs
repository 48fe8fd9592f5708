use super::{hint_for, native_backend};

/// Initialization parameters for the drawing context.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the instance may pick from. Advisory only.
    pub backend_hint: wgpu::Backends,

    /// Backend the adapter must actually run on; `None` accepts any.
    ///
    /// Checked after creation. A mismatch fails context creation.
    pub required_backend: Option<wgpu::Backend>,

    /// Reject software (CPU) adapters.
    pub require_hardware: bool,

    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode. FIFO waits for vertical sync.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    /// Native backend of the platform, hardware only, vsync.
    fn default() -> Self {
        let backend = native_backend();
        Self {
            backend_hint: hint_for(backend),
            required_backend: Some(backend),
            require_hardware: true,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requires_native_backend() {
        let init = GpuInit::default();
        assert_eq!(init.required_backend, Some(native_backend()));
        assert_eq!(init.backend_hint, hint_for(native_backend()));
        assert!(init.require_hardware);
    }
}
