use super::{interface, ShaderError, ShaderKind};

/// First word of every SPIR-V module.
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// A precompiled shader blob that has been checked before it reaches the device.
///
/// Blobs are little-endian SPIR-V. Parsing rejects anything the device would
/// refuse, including modules whose bindings or varyings do not fit the copy
/// pipeline, so creation never hands an invalid module to wgpu.
#[derive(Debug, Clone)]
pub struct ShaderBlob {
    kind: ShaderKind,
    words: Vec<u32>,
}

impl ShaderBlob {
    pub fn parse(kind: ShaderKind, bytes: &[u8]) -> Result<Self, ShaderError> {
        if bytes.is_empty() {
            return Err(ShaderError::EmptyBlob);
        }
        if bytes.len() % 4 != 0 {
            return Err(ShaderError::UnalignedBlob { len: bytes.len() });
        }

        let words: Vec<u32> = bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        if words[0] != SPIRV_MAGIC {
            return Err(ShaderError::BadMagic { found: words[0] });
        }

        let module = naga::front::spv::parse_u8_slice(bytes, &naga::front::spv::Options::default())
            .map_err(|e| ShaderError::Parse(e.to_string()))?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        )
        .validate(&module)
        .map_err(|e| ShaderError::Validation(e.into_inner().to_string()))?;

        let entry = kind.entry_point();
        let stage = kind.naga_stage();
        let ep = module
            .entry_points
            .iter()
            .find(|ep| ep.stage == stage && ep.name == entry)
            .ok_or(ShaderError::MissingEntryPoint { kind, entry })?;
        interface::check(kind, &module, ep)?;

        Ok(Self { kind, words })
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }
}
