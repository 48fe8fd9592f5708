use super::{ContextId, ShaderError, ShaderId, ShaderKind};

/// A shader as seen by the slot it occupies.
///
/// `M` is the backing module: `Arc<wgpu::ShaderModule>` on a real context.
#[derive(Debug, Clone)]
pub struct BoundShader<M> {
    pub id: ShaderId,
    pub kind: ShaderKind,
    pub context: ContextId,
    pub module: M,
}

/// Token returned by [`ShaderSlots::install`]; holds the shader it displaced.
#[must_use = "an installed shader stays active until its restore token is handed back"]
#[derive(Debug)]
pub struct ShaderRestore<M> {
    context: ContextId,
    kind: ShaderKind,
    installed: ShaderId,
    previous: Option<BoundShader<M>>,
}

impl<M> ShaderRestore<M> {
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    /// Shader this token will put back (`None` = built-in default).
    pub fn previous_id(&self) -> Option<ShaderId> {
        self.previous.as_ref().map(|s| s.id)
    }
}

/// Active shader per kind on one drawing context.
///
/// `None` in a slot means the context's built-in shader for that stage.
#[derive(Debug)]
pub struct ShaderSlots<M> {
    context: ContextId,
    vertex: Option<BoundShader<M>>,
    pixel: Option<BoundShader<M>>,
}

impl<M> ShaderSlots<M> {
    pub fn new(context: ContextId) -> Self {
        Self {
            context,
            vertex: None,
            pixel: None,
        }
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn active(&self, kind: ShaderKind) -> Option<&BoundShader<M>> {
        match kind {
            ShaderKind::Vertex => self.vertex.as_ref(),
            ShaderKind::Pixel => self.pixel.as_ref(),
        }
    }

    pub fn active_id(&self, kind: ShaderKind) -> Option<ShaderId> {
        self.active(kind).map(|s| s.id)
    }

    /// Makes `shader` the active shader of its kind.
    pub fn install(&mut self, shader: BoundShader<M>) -> Result<ShaderRestore<M>, ShaderError> {
        if shader.context != self.context {
            return Err(ShaderError::ForeignContext {
                shader: shader.id,
                owner: shader.context,
                context: self.context,
            });
        }

        let kind = shader.kind;
        let installed = shader.id;
        let previous = self.slot_mut(kind).replace(shader);

        Ok(ShaderRestore {
            context: self.context,
            kind,
            installed,
            previous,
        })
    }

    /// Puts back the shader captured by `token`.
    ///
    /// The shader installed with `token` must still be the active one.
    pub fn restore(&mut self, token: ShaderRestore<M>) -> Result<(), ShaderError> {
        if token.context != self.context {
            return Err(ShaderError::ForeignContext {
                shader: token.installed,
                owner: token.context,
                context: self.context,
            });
        }

        let slot = self.slot_mut(token.kind);
        let found = slot.as_ref().map(|s| s.id);
        if found != Some(token.installed) {
            return Err(ShaderError::RestoreOutOfOrder {
                kind: token.kind,
                expected: token.installed,
                found,
            });
        }

        *slot = token.previous;
        Ok(())
    }

    fn slot_mut(&mut self, kind: ShaderKind) -> &mut Option<BoundShader<M>> {
        match kind {
            ShaderKind::Vertex => &mut self.vertex,
            ShaderKind::Pixel => &mut self.pixel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shader(context: ContextId, kind: ShaderKind) -> BoundShader<()> {
        BoundShader {
            id: ShaderId::next(),
            kind,
            context,
            module: (),
        }
    }

    fn slots() -> ShaderSlots<()> {
        ShaderSlots::new(ContextId::next())
    }

    // ── install ───────────────────────────────────────────────────────────

    #[test]
    fn install_on_unbound_slot_captures_default() {
        let mut s = slots();
        let custom = shader(s.context(), ShaderKind::Pixel);
        let id = custom.id;

        let token = s.install(custom).unwrap();
        assert_eq!(token.kind(), ShaderKind::Pixel);
        assert_eq!(token.previous_id(), None);
        assert_eq!(s.active_id(ShaderKind::Pixel), Some(id));
        assert_eq!(s.active_id(ShaderKind::Vertex), None);

        s.restore(token).unwrap();
    }

    #[test]
    fn install_rejects_shader_from_other_context() {
        let mut s = slots();
        let other = ContextId::next();
        let err = s.install(shader(other, ShaderKind::Pixel)).unwrap_err();
        assert!(matches!(err, ShaderError::ForeignContext { owner, .. } if owner == other));
        assert_eq!(s.active_id(ShaderKind::Pixel), None);
    }

    #[test]
    fn kinds_occupy_separate_slots() {
        let mut s = slots();
        let vs = shader(s.context(), ShaderKind::Vertex);
        let fs = shader(s.context(), ShaderKind::Pixel);
        let (vs_id, fs_id) = (vs.id, fs.id);

        let t_vs = s.install(vs).unwrap();
        let t_fs = s.install(fs).unwrap();
        assert_eq!(s.active_id(ShaderKind::Vertex), Some(vs_id));
        assert_eq!(s.active_id(ShaderKind::Pixel), Some(fs_id));

        s.restore(t_fs).unwrap();
        s.restore(t_vs).unwrap();
        assert_eq!(s.active_id(ShaderKind::Vertex), None);
        assert_eq!(s.active_id(ShaderKind::Pixel), None);
    }

    // ── restore ───────────────────────────────────────────────────────────

    #[test]
    fn restore_is_inverse_of_install() {
        let mut s = slots();
        let before = s.active_id(ShaderKind::Pixel);

        let token = s.install(shader(s.context(), ShaderKind::Pixel)).unwrap();
        s.restore(token).unwrap();

        assert_eq!(s.active_id(ShaderKind::Pixel), before);
    }

    #[test]
    fn nested_scopes_restore_outer_custom_shader() {
        let mut s = slots();
        let outer = shader(s.context(), ShaderKind::Pixel);
        let outer_id = outer.id;

        let t_outer = s.install(outer).unwrap();
        let t_inner = s.install(shader(s.context(), ShaderKind::Pixel)).unwrap();
        assert_eq!(t_inner.previous_id(), Some(outer_id));

        s.restore(t_inner).unwrap();
        assert_eq!(s.active_id(ShaderKind::Pixel), Some(outer_id));

        s.restore(t_outer).unwrap();
        assert_eq!(s.active_id(ShaderKind::Pixel), None);
    }

    #[test]
    fn out_of_order_restore_is_rejected() {
        let mut s = slots();
        let outer = shader(s.context(), ShaderKind::Pixel);
        let outer_id = outer.id;
        let inner = shader(s.context(), ShaderKind::Pixel);
        let inner_id = inner.id;

        let t_outer = s.install(outer).unwrap();
        let t_inner = s.install(inner).unwrap();

        let err = s.restore(t_outer).unwrap_err();
        match err {
            ShaderError::RestoreOutOfOrder { expected, found, .. } => {
                assert_eq!(expected, outer_id);
                assert_eq!(found, Some(inner_id));
            }
            other => panic!("unexpected error: {other}"),
        }

        // The slot is untouched by the rejected restore.
        assert_eq!(s.active_id(ShaderKind::Pixel), Some(inner_id));
        s.restore(t_inner).unwrap();
    }

    #[test]
    fn token_from_other_context_is_rejected() {
        let mut a = slots();
        let mut b = slots();
        let token = a.install(shader(a.context(), ShaderKind::Vertex)).unwrap();

        let err = b.restore(token).unwrap_err();
        assert!(matches!(err, ShaderError::ForeignContext { .. }));
    }

    #[test]
    fn repeated_frames_leave_no_residue() {
        let mut s = slots();
        let id = ShaderId::next();

        for _ in 0..2 {
            let start = s.active_id(ShaderKind::Pixel);
            let token = s
                .install(BoundShader { id, kind: ShaderKind::Pixel, context: s.context(), module: () })
                .unwrap();
            s.restore(token).unwrap();
            assert_eq!(s.active_id(ShaderKind::Pixel), start);
        }
        assert_eq!(s.active_id(ShaderKind::Pixel), None);
    }
}
