//! Checks a parsed module against the resources and varyings of the copy
//! pipeline, so a mismatch is a shader error instead of a device error at draw
//! time.
//!
//! Contract:
//! - group 0, binding 0: `texture_2d<f32>`; group 0, binding 1: filtering sampler
//! - vertex stage reads `vec2<f32>` at locations 0 (position) and 1 (uv) and
//!   writes `vec2<f32>` uv at location 0
//! - pixel stage may read `vec2<f32>` uv at location 0 and writes a `vec4<f32>`
//!   at location 0

use naga::{
    Binding, Handle, ImageClass, ImageDimension, Module, ScalarKind, Type, TypeInner, VectorSize,
};

use super::{ShaderError, ShaderKind};

const TEXTURE_BINDING: u32 = 0;
const SAMPLER_BINDING: u32 = 1;

pub(crate) fn check(
    kind: ShaderKind,
    module: &Module,
    entry: &naga::EntryPoint,
) -> Result<(), ShaderError> {
    let fail = |reason: String| ShaderError::Interface { kind, reason };

    for (_, global) in module.global_variables.iter() {
        let Some(rb) = &global.binding else {
            continue;
        };
        let name = global.name.as_deref().unwrap_or("<unnamed>");
        if rb.group != 0 {
            return Err(fail(format!(
                "`{name}` is bound at group {}, only group 0 exists",
                rb.group
            )));
        }
        let inner = &module.types[global.ty].inner;
        let ok = match rb.binding {
            TEXTURE_BINDING => is_source_texture(inner),
            SAMPLER_BINDING => matches!(inner, TypeInner::Sampler { comparison: false }),
            _ => false,
        };
        if !ok {
            return Err(fail(format!(
                "`{name}` at binding {} does not match the copy bind group",
                rb.binding
            )));
        }
    }

    let function = &entry.function;
    let mut inputs = Vec::new();
    for arg in &function.arguments {
        collect_locations(module, arg.ty, arg.binding.as_ref(), &mut inputs);
    }
    let mut outputs = Vec::new();
    if let Some(result) = &function.result {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut outputs);
    }

    let (allowed_inputs, output_size): (&[u32], VectorSize) = match kind {
        ShaderKind::Vertex => (&[0, 1], VectorSize::Bi),
        ShaderKind::Pixel => (&[0], VectorSize::Quad),
    };

    for &(location, ty) in &inputs {
        if !allowed_inputs.contains(&location) {
            return Err(fail(format!("reads unsupported input location {location}")));
        }
        if !is_f32_vector(&module.types[ty].inner, VectorSize::Bi) {
            return Err(fail(format!("input location {location} is not a vec2<f32>")));
        }
    }

    match outputs.as_slice() {
        [(0, ty)] if is_f32_vector(&module.types[*ty].inner, output_size) => Ok(()),
        [(0, _)] => Err(fail(format!(
            "output location 0 is not a vec{}<f32>",
            output_size as u8
        ))),
        [] => Err(fail("writes nothing at location 0".to_string())),
        _ => Err(fail(format!(
            "writes locations {:?}, only location 0 is consumed",
            outputs.iter().map(|(l, _)| *l).collect::<Vec<_>>()
        ))),
    }
}

/// Flattens the user locations of one argument or result, looking through structs.
fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<(u32, Handle<Type>)>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push((*location, ty)),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn is_source_texture(inner: &TypeInner) -> bool {
    matches!(
        inner,
        TypeInner::Image {
            dim: ImageDimension::D2,
            arrayed: false,
            class: ImageClass::Sampled {
                kind: ScalarKind::Float,
                multi: false,
            },
        }
    )
}

fn is_f32_vector(inner: &TypeInner, size: VectorSize) -> bool {
    matches!(
        inner,
        TypeInner::Vector { size: s, scalar } if *s == size && *scalar == naga::Scalar::F32
    )
}
