use crate::render::error::SpriteError;

use super::pipeline::{BlendMode, SpritePipeline};

// ── sampler settings ──────────────────────────────────────────────────────

/// Texture coordinate wrapping. Mirrors the `wgpu` modes the pass supports.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum AddressMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirrorRepeat,
    /// Samples outside [0, 1] read transparent black.
    ///
    /// Needs `wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER` on the device.
    ClampToBorder,
}

impl From<AddressMode> for wgpu::AddressMode {
    fn from(mode: AddressMode) -> Self {
        match mode {
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
            AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
            AddressMode::ClampToBorder => wgpu::AddressMode::ClampToBorder,
        }
    }
}

/// Magnification/minification filter.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    Nearest,
    Linear,
}

impl From<FilterMode> for wgpu::FilterMode {
    fn from(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        }
    }
}

/// Sampler policy shared by the GPU sampler and the CPU reference sampler.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SamplerSettings {
    pub address_mode: AddressMode,
    pub filter: FilterMode,
}

impl SamplerSettings {
    /// Crisp pixel art and bitmap glyphs.
    pub const PIXEL: SamplerSettings = SamplerSettings {
        address_mode: AddressMode::ClampToEdge,
        filter: FilterMode::Nearest,
    };

    /// Smoothly scaled sprites and antialiased glyphs.
    pub const SMOOTH: SamplerSettings = SamplerSettings {
        address_mode: AddressMode::ClampToEdge,
        filter: FilterMode::Linear,
    };

    pub fn create_sampler(self, device: &wgpu::Device, label: &str) -> wgpu::Sampler {
        let address_mode = self.address_mode.into();
        let filter = self.filter.into();
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            border_color: (self.address_mode == AddressMode::ClampToBorder)
                .then_some(wgpu::SamplerBorderColor::TransparentBlack),
            ..Default::default()
        })
    }
}

/// Encoding of the stored texels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TextureColorSpace {
    /// Color images; sampling decodes to linear.
    #[default]
    Srgb,
    /// Data textures and coverage masks.
    Linear,
}

impl TextureColorSpace {
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            TextureColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Describes a texture to create.
#[derive(Debug, Clone)]
pub struct TextureDesc<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    pub color_space: TextureColorSpace,
    pub sampler: SamplerSettings,
}

impl<'a> TextureDesc<'a> {
    pub fn new(label: &'a str, width: u32, height: u32) -> Self {
        Self {
            label,
            width,
            height,
            color_space: TextureColorSpace::default(),
            sampler: SamplerSettings::default(),
        }
    }

    pub fn with_color_space(mut self, color_space: TextureColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerSettings) -> Self {
        self.sampler = sampler;
        self
    }

    fn rgba_len(&self) -> Result<usize, SpriteError> {
        if self.width == 0 || self.height == 0 {
            return Err(SpriteError::EmptyTexture {
                label: self.label.to_string(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.width as usize * self.height as usize * 4)
    }
}

// ── texture ───────────────────────────────────────────────────────────────

/// A 2D RGBA texture, its sampler, and the group 1 bind group that exposes
/// both to the fragment stage.
pub struct SpriteTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
    sampler: SamplerSettings,
}

impl SpriteTexture {
    /// Creates an uninitialized texture (contents are zero per wgpu).
    pub fn empty(
        device: &wgpu::Device,
        pipeline: &SpritePipeline,
        desc: &TextureDesc<'_>,
    ) -> Result<Self, SpriteError> {
        desc.rgba_len()?;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.color_space.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = desc
            .sampler
            .create_sampler(device, &format!("{} sampler", desc.label));
        let bind_group = pipeline.create_texture_bind_group(
            device,
            &format!("{} bind group", desc.label),
            &view,
            &sampler,
        );

        Ok(Self {
            texture,
            bind_group,
            width: desc.width,
            height: desc.height,
            sampler: desc.sampler,
        })
    }

    /// Creates a texture from tightly packed RGBA8 rows (top row first).
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &SpritePipeline,
        desc: &TextureDesc<'_>,
        rgba: &[u8],
    ) -> Result<Self, SpriteError> {
        let expected = desc.rgba_len()?;
        if rgba.len() != expected {
            return Err(SpriteError::TextureDataSize {
                label: desc.label.to_string(),
                expected,
                actual: rgba.len(),
            });
        }

        let tex = Self::empty(device, pipeline, desc)?;
        tex.write_region(queue, 0, 0, desc.width, desc.height, rgba)?;
        Ok(tex)
    }

    /// 1×1 opaque white; untextured quads sample this so the output is the tint.
    pub fn white(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &SpritePipeline,
    ) -> Result<Self, SpriteError> {
        let desc = TextureDesc::new("glimmer white texture", 1, 1)
            .with_color_space(TextureColorSpace::Linear)
            .with_sampler(SamplerSettings::PIXEL);
        Self::from_rgba8(device, queue, pipeline, &desc, &[255; 4])
    }

    /// Decodes an encoded image (PNG or JPEG) into an sRGB texture.
    pub fn from_image_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &SpritePipeline,
        label: &str,
        bytes: &[u8],
        sampler: SamplerSettings,
    ) -> Result<Self, SpriteError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        let mut rgba = image.into_raw();
        if pipeline.blend() == BlendMode::PremultipliedAlpha {
            premultiply_rgba8(&mut rgba);
        }

        let desc = TextureDesc::new(label, width, height).with_sampler(sampler);
        log::debug!("{label}: decoded {width}x{height} image");
        Self::from_rgba8(device, queue, pipeline, &desc, &rgba)
    }

    /// Creates an RGBA texture from a single-channel coverage mask.
    pub fn from_mask(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &SpritePipeline,
        desc: &TextureDesc<'_>,
        mask: &[u8],
    ) -> Result<Self, SpriteError> {
        let rgba = expand_mask(mask, pipeline.blend());
        Self::from_rgba8(device, queue, pipeline, desc, &rgba)
    }

    /// Overwrites a sub-rectangle with RGBA8 rows.
    pub fn write_region(
        &self,
        queue: &wgpu::Queue,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<(), SpriteError> {
        check_region(self.width, self.height, x, y, width, height)?;
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(SpriteError::TextureDataSize {
                label: "texture region".to_string(),
                expected,
                actual: rgba.len(),
            });
        }
        if expected == 0 {
            return Ok(());
        }

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );
        Ok(())
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn sampler_settings(&self) -> SamplerSettings {
        self.sampler
    }
}

// ── pixel helpers ─────────────────────────────────────────────────────────

/// Broadcasts a coverage mask into RGBA texels for the given blend policy.
pub fn expand_mask(mask: &[u8], blend: BlendMode) -> Vec<u8> {
    mask.iter().flat_map(|&m| blend.mask_texel(m)).collect()
}

/// Multiplies RGB by alpha in place (straight → premultiplied), rounding to nearest.
pub fn premultiply_rgba8(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

fn check_region(
    tex_width: u32,
    tex_height: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<(), SpriteError> {
    let fits_x = x.checked_add(width).is_some_and(|r| r <= tex_width);
    let fits_y = y.checked_add(height).is_some_and(|b| b <= tex_height);
    if fits_x && fits_y {
        Ok(())
    } else {
        Err(SpriteError::RegionOutOfBounds { x, y, width, height, tex_width, tex_height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_desc_is_rejected() {
        let err = TextureDesc::new("t", 0, 4).rgba_len().unwrap_err();
        assert!(matches!(err, SpriteError::EmptyTexture { width: 0, height: 4, .. }));
        assert_eq!(TextureDesc::new("t", 3, 2).rgba_len().unwrap(), 24);
    }

    #[test]
    fn region_bounds_are_checked() {
        assert!(check_region(16, 16, 8, 8, 8, 8).is_ok());
        assert!(check_region(16, 16, 9, 0, 8, 1).is_err());
        assert!(check_region(16, 16, 0, u32::MAX, 1, 2).is_err());
    }

    #[test]
    fn mask_expands_per_blend_mode() {
        assert_eq!(expand_mask(&[0, 255], BlendMode::PremultipliedAlpha), vec![0, 0, 0, 0, 255, 255, 255, 255]);
        assert_eq!(expand_mask(&[64], BlendMode::Alpha), vec![255, 255, 255, 64]);
    }

    #[test]
    fn premultiply_scales_rgb_only() {
        let mut px = [255, 128, 0, 128, 10, 20, 30, 255];
        premultiply_rgba8(&mut px);
        assert_eq!(px, [128, 64, 0, 128, 10, 20, 30, 255]);
    }

    #[test]
    fn settings_map_onto_wgpu_enums() {
        assert_eq!(wgpu::AddressMode::from(AddressMode::MirrorRepeat), wgpu::AddressMode::MirrorRepeat);
        assert_eq!(wgpu::FilterMode::from(FilterMode::Linear), wgpu::FilterMode::Linear);
        assert_eq!(TextureColorSpace::Srgb.format(), wgpu::TextureFormat::Rgba8UnormSrgb);
    }
}
