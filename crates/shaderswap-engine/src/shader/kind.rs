use std::fmt;

/// Pipeline stage a custom shader replaces.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderKind {
    Vertex,
    Pixel,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 2] = [ShaderKind::Vertex, ShaderKind::Pixel];

    /// Entry point a blob of this kind must export.
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vs_main",
            ShaderKind::Pixel => "fs_main",
        }
    }

    pub(crate) fn naga_stage(self) -> naga::ShaderStage {
        match self {
            ShaderKind::Vertex => naga::ShaderStage::Vertex,
            ShaderKind::Pixel => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderKind::Vertex => "vertex",
            ShaderKind::Pixel => "pixel",
        })
    }
}
