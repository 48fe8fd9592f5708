/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate.
    Fatal,
}

/// Startup failures of context acquisition. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("required backend {required:?}, but the adapter runs on {actual:?}")]
    BackendMismatch {
        required: wgpu::Backend,
        actual: wgpu::Backend,
    },

    #[error("adapter is not hardware accelerated (device type {device_type:?})")]
    NotAccelerated { device_type: wgpu::DeviceType },
}
