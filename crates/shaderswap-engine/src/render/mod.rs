//! GPU rendering subsystem.
//!
//! The only draw this crate issues is a full-destination copy of a streaming
//! texture, run under whatever shaders are installed on the context.
//!
//! Convention:
//! - the copy quad is given directly in NDC, uv (0, 0) at the top-left
//! - custom shaders bind the source texture at group 0, binding 0 and its
//!   sampler at binding 1

mod blit;
mod ctx;
mod region;
mod scoped;
mod texture;

pub use blit::BlitRenderer;
pub use ctx::{RenderCtx, RenderTarget};
pub use region::PixelRegion;
pub use scoped::{draw_frame, ShaderScopedTarget};
pub use texture::{StreamingTexture, TextureLock, BYTES_PER_PIXEL, TEXTURE_FORMAT};
