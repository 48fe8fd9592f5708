use shaderswap_engine::shader::ShaderKind;

use crate::fill::Pattern;

/// A precompiled shader blob baked into the binary.
#[derive(Debug, Copy, Clone)]
pub struct EmbeddedShader {
    pub kind: ShaderKind,
    pub label: &'static str,
    pub bytes: &'static [u8],
}

macro_rules! embedded_shader {
    ($kind:expr, $name:literal) => {
        EmbeddedShader {
            kind: $kind,
            label: $name,
            bytes: include_bytes!(concat!(env!("OUT_DIR"), "/", $name, ".spv")),
        }
    };
}

pub const SOLID_RED: EmbeddedShader = embedded_shader!(ShaderKind::Pixel, "solid_red");
pub const INVERT: EmbeddedShader = embedded_shader!(ShaderKind::Pixel, "invert");
pub const GRAYSCALE: EmbeddedShader = embedded_shader!(ShaderKind::Pixel, "grayscale");
pub const MIRROR: EmbeddedShader = embedded_shader!(ShaderKind::Vertex, "mirror");

/// When the fill pattern writes the texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FillSchedule {
    /// Once at startup; the content is static.
    Once,
    /// Before every frame.
    EveryFrame,
}

/// What one demo binary draws.
#[derive(Debug, Clone)]
pub struct Variant {
    pub title: &'static str,
    /// Installed in order for the copy, restored in reverse.
    pub shaders: Vec<EmbeddedShader>,
    pub pattern: Pattern,
    pub schedule: FillSchedule,
}

impl Variant {
    pub fn noise() -> Self {
        Self {
            title: "shaderswap: noise",
            shaders: vec![SOLID_RED],
            pattern: Pattern::Noise { seed: rand::random() },
            schedule: FillSchedule::Once,
        }
    }

    pub fn checkerboard() -> Self {
        Self {
            title: "shaderswap: checkerboard",
            shaders: vec![INVERT],
            pattern: Pattern::Checkerboard { cell: 32 },
            schedule: FillSchedule::Once,
        }
    }

    pub fn counter() -> Self {
        Self {
            title: "shaderswap: frame counter",
            shaders: vec![GRAYSCALE],
            pattern: Pattern::Counter,
            schedule: FillSchedule::EveryFrame,
        }
    }

    pub fn fractal() -> Self {
        Self {
            title: "shaderswap: fractal",
            shaders: vec![MIRROR, INVERT],
            pattern: Pattern::Fractal { max_iter: 64 },
            schedule: FillSchedule::Once,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::noise(), Self::checkerboard(), Self::counter(), Self::fractal()]
    }
}
