use std::ops::{Deref, DerefMut};

use anyhow::Result;

use crate::shader::ContextId;

use super::PixelRegion;

/// Pixel format of every streaming texture.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

pub const BYTES_PER_PIXEL: usize = 4;

/// GPU texture with a CPU-side staging copy that fill routines write into.
///
/// Dimensions and format are fixed at creation. The texture belongs to the
/// context that created it.
pub struct StreamingTexture {
    context: ContextId,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    staging: Vec<u8>,
    width: u32,
    height: u32,
}

impl StreamingTexture {
    pub(crate) fn new(
        device: &wgpu::Device,
        context: ContextId,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        anyhow::ensure!(
            width > 0 && height > 0,
            "streaming texture has zero size ({width}x{height})"
        );
        let max = device.limits().max_texture_dimension_2d;
        anyhow::ensure!(
            width <= max && height <= max,
            "streaming texture {width}x{height} exceeds the device limit of {max}"
        );

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shaderswap streaming texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shaderswap streaming texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let pitch = width as usize * BYTES_PER_PIXEL;

        Ok(Self {
            context,
            texture,
            bind_group,
            staging: vec![0; pitch * height as usize],
            width,
            height,
        })
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn pitch(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Locks the staging memory for writing.
    ///
    /// The region is uploaded to the GPU texture when the lock is dropped.
    pub fn lock<'a>(&'a mut self, queue: &'a wgpu::Queue) -> TextureLock<'a> {
        let pitch = self.pitch();
        TextureLock {
            texture: &self.texture,
            queue,
            region: PixelRegion::from_parts(&mut self.staging, pitch, self.width, self.height),
        }
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Write access to a streaming texture; unlocks (uploads) on drop.
pub struct TextureLock<'a> {
    texture: &'a wgpu::Texture,
    queue: &'a wgpu::Queue,
    region: PixelRegion<'a>,
}

impl<'a> Deref for TextureLock<'a> {
    type Target = PixelRegion<'a>;

    fn deref(&self) -> &Self::Target {
        &self.region
    }
}

impl DerefMut for TextureLock<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.region
    }
}

impl Drop for TextureLock<'_> {
    fn drop(&mut self) {
        let r = &self.region;
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            r.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(r.pitch() as u32),
                rows_per_image: Some(r.height()),
            },
            wgpu::Extent3d {
                width: r.width(),
                height: r.height(),
                depth_or_array_layers: 1,
            },
        );
    }
}
