use std::fmt;

use super::sprite::TextureId;

/// Where a shader breaks the host/shader binding contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractSite {
    Resource { group: u32, binding: u32 },
    VertexInput { location: u32 },
    FragmentOutput { location: u32 },
    EntryPoint(&'static str),
}

impl fmt::Display for ContractSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractSite::Resource { group, binding } => {
                write!(f, "@group({group}) @binding({binding})")
            }
            ContractSite::VertexInput { location } => write!(f, "vertex input @location({location})"),
            ContractSite::FragmentOutput { location } => {
                write!(f, "fragment output @location({location})")
            }
            ContractSite::EntryPoint(name) => write!(f, "entry point `{name}`"),
        }
    }
}

/// Setup-time failures of the sprite pass.
///
/// The stages themselves cannot fail; everything here is reported while
/// building pipelines or textures and is not retried.
#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("sprite shader failed to parse:\n{0}")]
    ShaderParse(String),

    #[error("sprite shader failed validation:\n{0}")]
    ShaderValidation(String),

    #[error("sprite shader breaks the binding contract at {site}: {reason}")]
    Contract { site: ContractSite, reason: String },

    #[error("texture `{label}` has an empty size ({width}x{height})")]
    EmptyTexture { label: String, width: u32, height: u32 },

    #[error("texture `{label}` got {actual} bytes, expected {expected}")]
    TextureDataSize { label: String, expected: usize, actual: usize },

    #[error("texture region {width}x{height} at ({x}, {y}) exceeds the {tex_width}x{tex_height} texture")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        tex_width: u32,
        tex_height: u32,
    },

    #[error("failed to decode sprite image")]
    Image(#[from] image::ImageError),

    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),
}

impl SpriteError {
    pub(crate) fn contract(site: ContractSite, reason: impl Into<String>) -> Self {
        SpriteError::Contract { site, reason: reason.into() }
    }
}
