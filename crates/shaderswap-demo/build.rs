//! Compiles the demo's WGSL shaders to SPIR-V blobs in `OUT_DIR`.
//!
//! The programs embed the blobs with `include_bytes!` and never see the WGSL.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

const SHADERS: &[&str] = &["solid_red", "invert", "grayscale", "mirror"];

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    for name in SHADERS {
        let src_path = manifest_dir.join("shaders").join(format!("{name}.wgsl"));
        println!("cargo:rerun-if-changed={}", src_path.display());

        let src = fs::read_to_string(&src_path)
            .with_context(|| format!("failed to read {}", src_path.display()))?;
        let words = compile(&src).with_context(|| format!("failed to compile {name}.wgsl"))?;
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();

        let out_path = out_dir.join(format!("{name}.spv"));
        fs::write(&out_path, bytes)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

fn compile(src: &str) -> Result<Vec<u32>> {
    let module = naga::front::wgsl::parse_str(src).map_err(|e| anyhow!(e.emit_to_string(src)))?;

    let info = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|e| anyhow!("{}", e.into_inner()))?;

    let words = naga::back::spv::write_vec(&module, &info, &naga::back::spv::Options::default(), None)?;
    Ok(words)
}
