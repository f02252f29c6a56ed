//! Load-time check that a WGSL program fits the sprite pipeline layout.
//!
//! wgpu reports layout mismatches as device validation errors at pipeline
//! creation, which surface as an uncaptured-error panic or a logged error
//! far from the cause. Checking the naga IR up front turns them into a
//! `SpriteError` that names the offending group/binding/location.

use naga::{
    AddressSpace, Binding, ImageClass, ImageDimension, Module, ScalarKind, ShaderStage, TypeInner,
    VectorSize,
};

use crate::render::error::{ContractSite, SpriteError};

use super::uniform::{CameraUniform, CAMERA_BINDING, CAMERA_GROUP};

/// Bind group index of the sprite texture and sampler.
pub const TEXTURE_GROUP: u32 = 1;
/// Binding slot of the sprite texture inside [`TEXTURE_GROUP`].
pub const TEXTURE_BINDING: u32 = 0;
/// Binding slot of the sprite sampler inside [`TEXTURE_GROUP`].
pub const SAMPLER_BINDING: u32 = 1;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Vertex attribute locations and their `f32` component counts.
const VERTEX_INPUTS: [(u32, u8); 3] = [(0, 2), (1, 2), (2, 4)];

/// Summary of a shader that passed [`validate_shader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderContract {
    /// Vertex input locations the shader actually declares, ascending.
    pub vertex_inputs: Vec<u32>,
    /// Size of the uniform block at group 0, binding 0.
    pub uniform_size: u32,
}

/// Parses, validates and contract-checks sprite shader source.
pub fn validate_shader(source: &str) -> Result<ShaderContract, SpriteError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| SpriteError::ShaderParse(e.emit_to_string(source)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| SpriteError::ShaderValidation(e.emit_to_string(source)))?;

    let uniform_size = check_resources(&module)?;
    let vertex_inputs = check_vertex_entry(&module)?;
    check_fragment_entry(&module)?;

    log::debug!("sprite shader contract ok (vertex inputs {vertex_inputs:?})");

    Ok(ShaderContract { vertex_inputs, uniform_size })
}

// ── resources ─────────────────────────────────────────────────────────────

fn check_resources(module: &Module) -> Result<u32, SpriteError> {
    let mut uniform_size = None;
    let mut has_texture = false;
    let mut has_sampler = false;

    for (_, var) in module.global_variables.iter() {
        let Some(rb) = var.binding.as_ref() else { continue };
        let site = ContractSite::Resource { group: rb.group, binding: rb.binding };
        let inner = &module.types[var.ty].inner;

        match (rb.group, rb.binding) {
            (CAMERA_GROUP, CAMERA_BINDING) => {
                if var.space != AddressSpace::Uniform {
                    return Err(SpriteError::contract(site, "expected a uniform buffer"));
                }
                let TypeInner::Struct { members, span } = inner else {
                    return Err(SpriteError::contract(site, "expected a struct uniform"));
                };
                if u64::from(*span) != CameraUniform::SIZE {
                    return Err(SpriteError::contract(
                        site,
                        format!("uniform is {span} bytes, host uploads {}", CameraUniform::SIZE),
                    ));
                }
                let first_is_mat4 = members.first().is_some_and(|m| {
                    matches!(
                        module.types[m.ty].inner,
                        TypeInner::Matrix {
                            columns: VectorSize::Quad,
                            rows: VectorSize::Quad,
                            scalar,
                        } if scalar.kind == ScalarKind::Float && scalar.width == 4
                    )
                });
                if !first_is_mat4 {
                    return Err(SpriteError::contract(
                        site,
                        "first uniform member must be mat4x4<f32>",
                    ));
                }
                uniform_size = Some(*span);
            }
            (TEXTURE_GROUP, TEXTURE_BINDING) => {
                let ok = matches!(
                    inner,
                    TypeInner::Image {
                        dim: ImageDimension::D2,
                        arrayed: false,
                        class: ImageClass::Sampled { kind: ScalarKind::Float, multi: false },
                    }
                );
                if !ok {
                    return Err(SpriteError::contract(site, "expected texture_2d<f32>"));
                }
                has_texture = true;
            }
            (TEXTURE_GROUP, SAMPLER_BINDING) => {
                if !matches!(inner, TypeInner::Sampler { comparison: false }) {
                    return Err(SpriteError::contract(site, "expected a filtering sampler"));
                }
                has_sampler = true;
            }
            _ => {
                return Err(SpriteError::contract(site, "no such slot in the sprite pipeline layout"));
            }
        }
    }

    let Some(size) = uniform_size else {
        return Err(SpriteError::contract(
            ContractSite::Resource { group: CAMERA_GROUP, binding: CAMERA_BINDING },
            "camera uniform is missing",
        ));
    };
    if !has_texture {
        return Err(SpriteError::contract(
            ContractSite::Resource { group: TEXTURE_GROUP, binding: TEXTURE_BINDING },
            "texture is missing",
        ));
    }
    if !has_sampler {
        return Err(SpriteError::contract(
            ContractSite::Resource { group: TEXTURE_GROUP, binding: SAMPLER_BINDING },
            "sampler is missing",
        ));
    }
    Ok(size)
}

// ── entry points ──────────────────────────────────────────────────────────

fn check_vertex_entry(module: &Module) -> Result<Vec<u32>, SpriteError> {
    let ep = find_entry(module, ShaderStage::Vertex, VERTEX_ENTRY)?;

    let mut inputs = Vec::new();
    for arg in &ep.function.arguments {
        collect_locations(module, arg.ty, arg.binding.as_ref(), &mut inputs);
    }

    for &(location, components) in &inputs {
        let site = ContractSite::VertexInput { location };
        let Some(&(_, expected)) = VERTEX_INPUTS.iter().find(|(l, _)| *l == location) else {
            return Err(SpriteError::contract(site, "no vertex attribute at this location"));
        };
        if components != Some(expected) {
            return Err(SpriteError::contract(site, format!("expected vec{expected}<f32>")));
        }
    }

    let mut locations: Vec<u32> = inputs.iter().map(|(l, _)| *l).collect();
    locations.sort_unstable();
    Ok(locations)
}

fn check_fragment_entry(module: &Module) -> Result<(), SpriteError> {
    let ep = find_entry(module, ShaderStage::Fragment, FRAGMENT_ENTRY)?;

    let mut outputs = Vec::new();
    if let Some(result) = ep.function.result.as_ref() {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut outputs);
    }

    match outputs.as_slice() {
        [(0, Some(4))] => Ok(()),
        [(0, _)] => Err(SpriteError::contract(
            ContractSite::FragmentOutput { location: 0 },
            "expected vec4<f32>",
        )),
        [] => Err(SpriteError::contract(
            ContractSite::FragmentOutput { location: 0 },
            "no color output",
        )),
        [(location, _), ..] => Err(SpriteError::contract(
            ContractSite::FragmentOutput { location: *location },
            "the pass has a single color target at location 0",
        )),
    }
}

fn find_entry<'m>(
    module: &'m Module,
    stage: ShaderStage,
    name: &'static str,
) -> Result<&'m naga::EntryPoint, SpriteError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage && ep.name == name)
        .ok_or_else(|| SpriteError::contract(ContractSite::EntryPoint(name), "not found"))
}

/// Gathers `(location, f32 component count)` pairs, flattening IO structs.
fn collect_locations(
    module: &Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut Vec<(u32, Option<u8>)>,
) {
    let inner = &module.types[ty].inner;
    match binding {
        Some(Binding::Location { location, .. }) => out.push((*location, f32_components(inner))),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = inner {
                for m in members {
                    collect_locations(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn f32_components(inner: &TypeInner) -> Option<u8> {
    match inner {
        TypeInner::Scalar(s) if s.kind == ScalarKind::Float && s.width == 4 => Some(1),
        TypeInner::Vector { size, scalar } if scalar.kind == ScalarKind::Float && scalar.width == 4 => {
            Some(match size {
                VectorSize::Bi => 2,
                VectorSize::Tri => 3,
                VectorSize::Quad => 4,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::sprite::SPRITE_SHADER;

    fn expect_contract(src: &str) -> (ContractSite, String) {
        match validate_shader(src) {
            Err(SpriteError::Contract { site, reason }) => (site, reason),
            other => panic!("expected contract error, got {other:?}"),
        }
    }

    #[test]
    fn builtin_shader_satisfies_contract() {
        let c = validate_shader(SPRITE_SHADER).unwrap();
        assert_eq!(c.vertex_inputs, vec![0, 1, 2]);
        assert_eq!(c.uniform_size, 80);
    }

    #[test]
    fn moved_texture_binding_is_reported() {
        let src = SPRITE_SHADER.replace("@group(1) @binding(0)", "@group(1) @binding(2)");
        let (site, _) = expect_contract(&src);
        assert_eq!(site, ContractSite::Resource { group: 1, binding: 2 });
    }

    #[test]
    fn growing_the_uniform_is_reported() {
        let src = SPRITE_SHADER.replace(
            "    _padding: vec2<f32>,\n",
            "    _padding: vec2<f32>,\n    extra: vec4<f32>,\n",
        );
        let (site, reason) = expect_contract(&src);
        assert_eq!(site, ContractSite::Resource { group: 0, binding: 0 });
        assert!(reason.contains("96"), "{reason}");
    }

    #[test]
    fn wrong_color_width_is_reported() {
        let src = SPRITE_SHADER.replace(
            "@location(2) color: vec4<f32>,\n};\n\nstruct VertexOutput",
            "@location(2) color: vec3<f32>,\n};\n\nstruct VertexOutput",
        );
        let src = src.replace("out.color = in.color;", "out.color = vec4<f32>(in.color, 1.0);");
        let (site, _) = expect_contract(&src);
        assert_eq!(site, ContractSite::VertexInput { location: 2 });
    }

    #[test]
    fn renamed_entry_point_is_reported() {
        let src = SPRITE_SHADER.replace("fn fs_main", "fn fragment");
        let (site, _) = expect_contract(&src);
        assert_eq!(site, ContractSite::EntryPoint(FRAGMENT_ENTRY));
    }

    #[test]
    fn variant_reading_viewport_size_is_accepted() {
        let src = SPRITE_SHADER.replace(
            "out.uv = in.uv;",
            "out.uv = in.uv + camera.viewport_size * 0.0;",
        );
        assert!(validate_shader(&src).is_ok());
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let src = SPRITE_SHADER.replace("fn vs_main", "fn vs_main(");
        assert!(matches!(validate_shader(&src), Err(SpriteError::ShaderParse(_))));
    }

    #[test]
    fn type_errors_are_validation_or_parse_errors() {
        let src = SPRITE_SHADER.replace(
            "return textureSample(t_sprite, s_sprite, in.uv) * in.color;",
            "return textureSample(t_sprite, s_sprite, in.uv) * in.uv;",
        );
        assert!(matches!(
            validate_shader(&src),
            Err(SpriteError::ShaderParse(_) | SpriteError::ShaderValidation(_))
        ));
    }
}
