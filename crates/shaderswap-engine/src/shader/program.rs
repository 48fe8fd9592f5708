use std::borrow::Cow;
use std::sync::Arc;

use super::{BoundShader, ContextId, ShaderBlob, ShaderId, ShaderKind, ShaderRestore};

/// Restore token for a shader installed on a real drawing context.
pub type ProgramRestore = ShaderRestore<Arc<wgpu::ShaderModule>>;

/// Owned handle to a compiled custom shader.
///
/// Only valid on the context that created it. The module is released when the
/// handle is dropped; a slot that still holds it keeps it alive until restored.
#[derive(Debug)]
pub struct ShaderProgram {
    bound: BoundShader<Arc<wgpu::ShaderModule>>,
    label: String,
}

impl ShaderProgram {
    pub(crate) fn new(
        device: &wgpu::Device,
        context: ContextId,
        label: &str,
        blob: &ShaderBlob,
    ) -> Self {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::SpirV(Cow::Borrowed(blob.words())),
        });

        let id = ShaderId::next();
        log::debug!("created {} shader `{label}` ({id}) on {context}", blob.kind());

        Self {
            bound: BoundShader {
                id,
                kind: blob.kind(),
                context,
                module: Arc::new(module),
            },
            label: label.to_string(),
        }
    }

    pub fn id(&self) -> ShaderId {
        self.bound.id
    }

    pub fn kind(&self) -> ShaderKind {
        self.bound.kind
    }

    pub fn context(&self) -> ContextId {
        self.bound.context
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn bound(&self) -> BoundShader<Arc<wgpu::ShaderModule>> {
        self.bound.clone()
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        log::debug!("released {} shader `{}` ({})", self.bound.kind, self.label, self.bound.id);
    }
}
