use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SHADER: AtomicU64 = AtomicU64::new(1);
static NEXT_CONTEXT: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a compiled shader program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ShaderId(u64);

impl ShaderId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SHADER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ShaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shader#{}", self.0)
    }
}

/// Process-unique identity of a drawing context.
///
/// Resources created by a context remember its id; they are rejected by any
/// other context.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ContextId(u64);

impl ContextId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context#{}", self.0)
    }
}
