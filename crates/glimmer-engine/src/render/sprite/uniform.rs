use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

/// Bind group index of the camera uniform.
pub const CAMERA_GROUP: u32 = 0;
/// Binding slot of the camera uniform inside [`CAMERA_GROUP`].
pub const CAMERA_BINDING: u32 = 0;

/// Per-frame camera block read by the vertex stage.
///
/// Layout (80 bytes, std140-compatible):
///
///  offset  0  view_proj      mat4x4<f32>  column-major
///  offset 64  viewport_size  vec2<f32>    reserved, not read by the built-in stages
///  offset 72  _padding       vec2<f32>    keeps the block a multiple of 16 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub viewport_size: [f32; 2],
    pub _padding: [f32; 2],
}

const _: () = assert!(std::mem::size_of::<CameraUniform>() == 80);
const _: () = assert!(std::mem::size_of::<CameraUniform>() % 16 == 0);

impl CameraUniform {
    /// Size of the block in bytes, as uploaded to the uniform buffer.
    pub const SIZE: u64 = std::mem::size_of::<CameraUniform>() as u64;

    pub fn new(view_proj: Mat4, viewport_size: Vec2) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            viewport_size: viewport_size.to_array(),
            _padding: [0.0; 2],
        }
    }

    /// Identity transform: positions are passed through as clip-space x/y.
    pub fn identity() -> Self {
        Self::new(Mat4::IDENTITY, Vec2::ONE)
    }

    #[inline]
    pub fn view_proj_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }

    /// Minimum binding size for the group 0 layout entry.
    pub fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(Self::SIZE)
            .expect("CameraUniform has non-zero size by construction")
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_eighty_bytes_with_documented_offsets() {
        assert_eq!(CameraUniform::SIZE, 80);
        assert_eq!(std::mem::offset_of!(CameraUniform, view_proj), 0);
        assert_eq!(std::mem::offset_of!(CameraUniform, viewport_size), 64);
        assert_eq!(std::mem::offset_of!(CameraUniform, _padding), 72);
        assert_eq!(CameraUniform::min_binding_size().get(), 80);
    }

    #[test]
    fn matrix_is_stored_column_major() {
        let m = Mat4::from_translation(glam::Vec3::new(3.0, 4.0, 0.0));
        let u = CameraUniform::new(m, Vec2::new(800.0, 600.0));
        // Translation lives in the fourth column.
        assert_eq!(u.view_proj[3], [3.0, 4.0, 0.0, 1.0]);
        assert_eq!(u.view_proj_matrix(), m);
    }

    #[test]
    fn padding_is_zeroed_in_bytes() {
        let u = CameraUniform::new(Mat4::IDENTITY, Vec2::new(1.0, 2.0));
        let bytes = bytemuck::bytes_of(&u);
        assert_eq!(bytes.len(), 80);
        assert!(bytes[72..].iter().all(|b| *b == 0));
        assert_eq!(&bytes[64..68], &1.0f32.to_ne_bytes());
    }
}
