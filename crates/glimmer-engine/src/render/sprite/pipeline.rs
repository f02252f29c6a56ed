use std::borrow::Cow;

use crate::paint::Color;
use crate::render::error::SpriteError;

use super::contract::{
    validate_shader, FRAGMENT_ENTRY, SAMPLER_BINDING, TEXTURE_BINDING, VERTEX_ENTRY,
};
use super::uniform::{CameraUniform, CAMERA_BINDING};
use super::vertex::SpriteVertex;
use super::SPRITE_SHADER;

// ── blend ─────────────────────────────────────────────────────────────────

/// How fragment output is composited onto the color target.
///
/// Blending is pipeline state; the fragment stage only multiplies texel by tint.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// `src + dst * (1 - src.a)`; textures and tints are premultiplied.
    #[default]
    PremultipliedAlpha,
    /// `src * src.a + dst * (1 - src.a)`; straight-alpha textures and tints.
    Alpha,
    /// Overwrites the target.
    Replace,
}

impl BlendMode {
    pub fn state(self) -> wgpu::BlendState {
        match self {
            BlendMode::PremultipliedAlpha => wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            BlendMode::Replace => wgpu::BlendState::REPLACE,
        }
    }

    /// Composites `src` over `dst` the way [`BlendMode::state`] configures the GPU.
    pub fn composite(self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        match self {
            BlendMode::PremultipliedAlpha => {
                let k = 1.0 - src[3];
                std::array::from_fn(|i| src[i] + dst[i] * k)
            }
            BlendMode::Alpha => {
                let a = src[3];
                let k = 1.0 - a;
                // wgpu ALPHA_BLENDING: color uses (SrcAlpha, 1-SrcAlpha), alpha uses (One, 1-SrcAlpha).
                let mut out: [f32; 4] = std::array::from_fn(|i| src[i] * a + dst[i] * k);
                out[3] = a + dst[3] * k;
                out
            }
            BlendMode::Replace => src,
        }
    }

    /// Vertex color for `color` as this mode's blend state expects it:
    /// straight for [`BlendMode::Alpha`], premultiplied otherwise.
    #[inline]
    pub fn encode_tint(self, color: Color) -> [f32; 4] {
        match self {
            BlendMode::Alpha => color.to_straight(),
            BlendMode::PremultipliedAlpha | BlendMode::Replace => color.to_array(),
        }
    }

    /// RGBA texel for a coverage value of a single-channel glyph mask.
    ///
    /// Premultiplied targets replicate the mask into all channels; straight
    /// alpha keeps white color and puts coverage in alpha only.
    #[inline]
    pub fn mask_texel(self, coverage: u8) -> [u8; 4] {
        match self {
            BlendMode::PremultipliedAlpha | BlendMode::Replace => [coverage; 4],
            BlendMode::Alpha => [255, 255, 255, coverage],
        }
    }
}

// ── config ────────────────────────────────────────────────────────────────

/// Construction parameters for [`SpritePipeline`].
#[derive(Debug, Clone)]
pub struct SpritePipelineConfig {
    pub label: String,
    pub blend: BlendMode,
    /// WGSL source. Variants must keep the binding/location contract; see
    /// [`validate_shader`](super::validate_shader).
    pub shader_source: Cow<'static, str>,
    /// Format of the color attachment the pass renders into.
    pub color_format: wgpu::TextureFormat,
}

impl Default for SpritePipelineConfig {
    fn default() -> Self {
        Self {
            label: "glimmer sprite".to_string(),
            blend: BlendMode::default(),
            shader_source: Cow::Borrowed(SPRITE_SHADER),
            color_format: wgpu::TextureFormat::Bgra8UnormSrgb,
        }
    }
}

// ── pipeline ──────────────────────────────────────────────────────────────

/// Render pipeline plus the two bind group layouts of the sprite pass.
///
/// group 0: camera uniform (vertex)
/// group 1: texture + sampler (fragment)
pub struct SpritePipeline {
    label: String,
    blend: BlendMode,
    color_format: wgpu::TextureFormat,
    camera_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
}

impl SpritePipeline {
    /// Validates the shader against the binding contract, then builds GPU objects.
    pub fn new(device: &wgpu::Device, config: &SpritePipelineConfig) -> Result<Self, SpriteError> {
        validate_shader(&config.shader_source)?;

        let label = config.label.as_str();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label} shader")),
            source: wgpu::ShaderSource::Wgsl(config.shader_source.clone()),
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} camera bgl")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: CAMERA_BINDING,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(CameraUniform::min_binding_size()),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} texture bgl")),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: TEXTURE_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: SAMPLER_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} pipeline layout")),
            bind_group_layouts: &[&camera_layout, &texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{label} pipeline")),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[SpriteVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.color_format,
                    blend: Some(config.blend.state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "{label}: pipeline created (format {:?}, blend {:?})",
            config.color_format,
            config.blend
        );

        Ok(Self {
            label: config.label.clone(),
            blend: config.blend,
            color_format: config.color_format,
            camera_layout,
            texture_layout,
            pipeline,
        })
    }

    /// Creates a uniform buffer for [`CameraUniform`] and its group 0 bind group.
    pub fn create_camera_binding(&self, device: &wgpu::Device) -> CameraBinding {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} camera ubo", self.label)),
            size: CameraUniform::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} camera bind group", self.label)),
            layout: &self.camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: CAMERA_BINDING,
                resource: buffer.as_entire_binding(),
            }],
        });

        CameraBinding { buffer, bind_group }
    }

    /// Creates a group 1 bind group for a texture view and sampler.
    pub fn create_texture_bind_group(
        &self,
        device: &wgpu::Device,
        label: &str,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: TEXTURE_BINDING,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: SAMPLER_BINDING,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    #[inline]
    pub fn render_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    #[inline]
    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    #[inline]
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    #[inline]
    pub fn camera_layout(&self) -> &wgpu::BindGroupLayout {
        &self.camera_layout
    }

    #[inline]
    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }
}

/// Camera uniform buffer and its group 0 bind group.
pub struct CameraBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    /// Uploads a new camera block.
    ///
    /// Queue writes are ordered before later submissions, so a pass recorded
    /// after this call sees the new matrix.
    pub fn write(&self, queue: &wgpu::Queue, uniform: &CameraUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
