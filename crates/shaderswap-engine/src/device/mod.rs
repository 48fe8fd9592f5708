//! Drawing context acquisition.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue from a backend hint
//! - verifying the adapter actually runs on the required backend
//! - creating & configuring the Surface (swapchain)
//! - owning the shader slots and blit renderer of the context

mod backend;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use backend::{hint_for, native_backend, verify_adapter};
pub use error::{DeviceError, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
