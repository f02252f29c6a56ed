use crate::render::RenderTarget;

/// One acquired surface texture with its view and command encoder.
///
/// Hand it back to [`Gpu::submit`](super::Gpu::submit) promptly; the next
/// frame cannot be acquired while this one is alive.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Borrows the encoder and view as a pass target.
    pub fn target(&mut self) -> RenderTarget<'_> {
        RenderTarget::new(&mut self.encoder, &self.view)
    }
}
