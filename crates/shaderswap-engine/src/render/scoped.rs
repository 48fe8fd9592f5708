use anyhow::Result;

/// A drawing surface that custom shaders can be installed on around a copy.
///
/// This is the whole capability the frame loop needs from a context. The real
/// implementation wraps `Gpu` and an acquired frame; tests use a recorder.
pub trait ShaderScopedTarget {
    type Program: ?Sized;
    type Texture: ?Sized;
    /// Token describing what an install displaced.
    type Saved;

    /// Makes `program` the active shader of its kind; returns what it replaced.
    fn install_shader(&mut self, program: &Self::Program) -> Result<Self::Saved>;

    /// Puts back the shader captured by `saved`.
    fn restore_shader(&mut self, saved: Self::Saved) -> Result<()>;

    /// Copies `texture` over the full destination rectangle.
    fn copy_full(&mut self, texture: &Self::Texture) -> Result<()>;

    /// Submits buffered drawing commands.
    fn flush(&mut self) -> Result<()>;

    /// Shows the completed frame.
    fn present(&mut self) -> Result<()>;
}

/// Draws one frame with `programs` installed for exactly one copy.
///
/// Sequence: install each program, copy, flush, restore in reverse order,
/// present. Installed programs are restored even when a later step fails; the
/// first error is returned and nothing is presented.
pub fn draw_frame<T>(target: &mut T, programs: &[&T::Program], texture: &T::Texture) -> Result<()>
where
    T: ShaderScopedTarget,
{
    let mut saved = Vec::with_capacity(programs.len());
    let drawn = install_and_copy(target, programs, texture, &mut saved);
    let restored = restore_all(target, saved);

    drawn?;
    restored?;
    target.present()
}

fn install_and_copy<T>(
    target: &mut T,
    programs: &[&T::Program],
    texture: &T::Texture,
    saved: &mut Vec<T::Saved>,
) -> Result<()>
where
    T: ShaderScopedTarget,
{
    for program in programs {
        saved.push(target.install_shader(program)?);
    }
    target.copy_full(texture)?;
    target.flush()
}

fn restore_all<T>(target: &mut T, saved: Vec<T::Saved>) -> Result<()>
where
    T: ShaderScopedTarget,
{
    let mut first_err = None;
    for token in saved.into_iter().rev() {
        if let Err(e) = target.restore_shader(token) {
            log::error!("failed to restore shader: {e:#}");
            first_err.get_or_insert(e);
        }
    }
    first_err.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{
        BoundShader, ContextId, ShaderId, ShaderKind, ShaderRestore, ShaderSlots,
    };

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Install(ShaderId),
        Copy { pixel: Option<ShaderId>, vertex: Option<ShaderId> },
        Flush,
        Restore(ShaderKind),
        Present,
    }

    struct MockProgram {
        id: ShaderId,
        kind: ShaderKind,
        context: ContextId,
    }

    /// Recording target backed by real shader slots.
    struct RecordingTarget {
        slots: ShaderSlots<()>,
        calls: Vec<Call>,
        fail_copy: bool,
    }

    impl RecordingTarget {
        fn new() -> Self {
            Self {
                slots: ShaderSlots::new(ContextId::next()),
                calls: Vec::new(),
                fail_copy: false,
            }
        }

        fn program(&self, kind: ShaderKind) -> MockProgram {
            MockProgram {
                id: ShaderId::next(),
                kind,
                context: self.slots.context(),
            }
        }

        fn copies(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::Copy { .. }))
                .count()
        }
    }

    impl ShaderScopedTarget for RecordingTarget {
        type Program = MockProgram;
        type Texture = ();
        type Saved = ShaderRestore<()>;

        fn install_shader(&mut self, program: &MockProgram) -> Result<Self::Saved> {
            let token = self.slots.install(BoundShader {
                id: program.id,
                kind: program.kind,
                context: program.context,
                module: (),
            })?;
            self.calls.push(Call::Install(program.id));
            Ok(token)
        }

        fn restore_shader(&mut self, saved: Self::Saved) -> Result<()> {
            let kind = saved.kind();
            self.slots.restore(saved)?;
            self.calls.push(Call::Restore(kind));
            Ok(())
        }

        fn copy_full(&mut self, _texture: &()) -> Result<()> {
            anyhow::ensure!(!self.fail_copy, "copy failed");
            self.calls.push(Call::Copy {
                pixel: self.slots.active_id(ShaderKind::Pixel),
                vertex: self.slots.active_id(ShaderKind::Vertex),
            });
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            self.calls.push(Call::Flush);
            Ok(())
        }

        fn present(&mut self) -> Result<()> {
            self.calls.push(Call::Present);
            Ok(())
        }
    }

    #[test]
    fn frame_follows_install_copy_flush_restore_present() {
        let mut t = RecordingTarget::new();
        let p = t.program(ShaderKind::Pixel);

        draw_frame(&mut t, &[&p], &()).unwrap();

        assert_eq!(
            t.calls,
            vec![
                Call::Install(p.id),
                Call::Copy { pixel: Some(p.id), vertex: None },
                Call::Flush,
                Call::Restore(ShaderKind::Pixel),
                Call::Present,
            ]
        );
    }

    #[test]
    fn exactly_one_copy_per_frame() {
        let mut t = RecordingTarget::new();
        let p = t.program(ShaderKind::Pixel);

        for frame in 1..=3 {
            draw_frame(&mut t, &[&p], &()).unwrap();
            assert_eq!(t.copies(), frame);
        }
    }

    #[test]
    fn custom_shader_inactive_outside_the_scope() {
        let mut t = RecordingTarget::new();
        let p = t.program(ShaderKind::Pixel);

        assert_eq!(t.slots.active_id(ShaderKind::Pixel), None);
        draw_frame(&mut t, &[&p], &()).unwrap();
        assert_eq!(t.slots.active_id(ShaderKind::Pixel), None);
    }

    #[test]
    fn two_frames_leave_no_residue() {
        let mut t = RecordingTarget::new();
        let outer = t.program(ShaderKind::Pixel);
        let p = t.program(ShaderKind::Pixel);

        // Something outside the frame keeps its own shader installed.
        let host = t.install_shader(&outer).unwrap();

        draw_frame(&mut t, &[&p], &()).unwrap();
        let after_first = t.slots.active_id(ShaderKind::Pixel);
        draw_frame(&mut t, &[&p], &()).unwrap();

        assert_eq!(after_first, Some(outer.id));
        assert_eq!(t.slots.active_id(ShaderKind::Pixel), after_first);

        t.restore_shader(host).unwrap();
    }

    #[test]
    fn multiple_kinds_restore_in_reverse_order() {
        let mut t = RecordingTarget::new();
        let vs = t.program(ShaderKind::Vertex);
        let fs = t.program(ShaderKind::Pixel);

        draw_frame(&mut t, &[&vs, &fs], &()).unwrap();

        assert_eq!(
            t.calls,
            vec![
                Call::Install(vs.id),
                Call::Install(fs.id),
                Call::Copy { pixel: Some(fs.id), vertex: Some(vs.id) },
                Call::Flush,
                Call::Restore(ShaderKind::Pixel),
                Call::Restore(ShaderKind::Vertex),
                Call::Present,
            ]
        );
    }

    #[test]
    fn failed_copy_still_restores_and_skips_present() {
        let mut t = RecordingTarget::new();
        t.fail_copy = true;
        let p = t.program(ShaderKind::Pixel);

        let err = draw_frame(&mut t, &[&p], &()).unwrap_err();
        assert!(err.to_string().contains("copy failed"));

        assert_eq!(t.calls, vec![Call::Install(p.id), Call::Restore(ShaderKind::Pixel)]);
        assert_eq!(t.slots.active_id(ShaderKind::Pixel), None);
    }

    #[test]
    fn foreign_program_aborts_before_copy() {
        let mut t = RecordingTarget::new();
        let ok = t.program(ShaderKind::Vertex);
        let foreign = MockProgram {
            id: ShaderId::next(),
            kind: ShaderKind::Pixel,
            context: ContextId::next(),
        };

        assert!(draw_frame(&mut t, &[&ok, &foreign], &()).is_err());

        assert_eq!(t.copies(), 0);
        assert!(!t.calls.contains(&Call::Present));
        assert_eq!(t.slots.active_id(ShaderKind::Vertex), None);
    }
}
