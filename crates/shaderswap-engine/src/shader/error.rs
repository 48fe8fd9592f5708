use super::{ContextId, ShaderId, ShaderKind};

/// Failures of shader creation, installation and restoration.
///
/// None of these are retried; callers propagate them up to `main`.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("shader blob is empty")]
    EmptyBlob,

    #[error("shader blob length {len} is not a multiple of 4")]
    UnalignedBlob { len: usize },

    #[error("shader blob does not start with the SPIR-V magic number (found {found:#010x})")]
    BadMagic { found: u32 },

    #[error("failed to parse SPIR-V: {0}")]
    Parse(String),

    #[error("SPIR-V module failed validation: {0}")]
    Validation(String),

    #[error("{kind} shader blob has no `{entry}` entry point")]
    MissingEntryPoint { kind: ShaderKind, entry: &'static str },

    #[error("{kind} shader does not fit the copy pipeline: {reason}")]
    Interface { kind: ShaderKind, reason: String },

    #[error("{shader} was created by {owner} and cannot be used on {context}")]
    ForeignContext {
        shader: ShaderId,
        owner: ContextId,
        context: ContextId,
    },

    #[error("restore of {kind} shader out of order: expected {expected} active, found {found:?}")]
    RestoreOutOfOrder {
        kind: ShaderKind,
        expected: ShaderId,
        found: Option<ShaderId>,
    },
}
