use crate::render::sprite::{AddressMode, FilterMode, SamplerSettings};

/// RGBA texels in linear float, rows stored top to bottom (v = 0 is row 0).
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTexture {
    width: u32,
    height: u32,
    texels: Vec<[f32; 4]>,
}

impl CpuTexture {
    /// Builds a texture from texels; returns `None` if the count does not match.
    pub fn new(width: u32, height: u32, texels: Vec<[f32; 4]>) -> Option<Self> {
        let ok = width > 0 && height > 0 && texels.len() == width as usize * height as usize;
        ok.then_some(Self { width, height, texels })
    }

    /// One color everywhere.
    pub fn solid(width: u32, height: u32, color: [f32; 4]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            texels: vec![color; width as usize * height as usize],
        }
    }

    /// Unorm RGBA8 → float; no color-space decoding.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Option<Self> {
        let texels = rgba
            .chunks_exact(4)
            .map(|px| std::array::from_fn(|i| f32::from(px[i]) / 255.0))
            .collect();
        Self::new(width, height, texels)
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// # Panics
    ///
    /// If `(x, y)` is outside the texture; see [`get`](Self::get).
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> [f32; 4] {
        self.texels[y as usize * self.width as usize + x as usize]
    }

    /// Texel at `(x, y)`, or `None` outside the texture.
    pub fn get(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        (x < self.width && y < self.height).then(|| self.texel(x, y))
    }

    /// Samples at `uv` with wgpu's filtering and addressing rules.
    pub fn sample(&self, uv: [f32; 2], sampler: SamplerSettings) -> [f32; 4] {
        match sampler.filter {
            FilterMode::Nearest => {
                let mode = sampler.address_mode;
                let x = reduce(uv[0] * self.width as f32, self.width, mode).floor() as i64;
                let y = reduce(uv[1] * self.height as f32, self.height, mode).floor() as i64;
                self.fetch(x, y, mode)
            }
            FilterMode::Linear => {
                let mode = sampler.address_mode;
                let fx = reduce(uv[0] * self.width as f32 - 0.5, self.width, mode);
                let fy = reduce(uv[1] * self.height as f32 - 0.5, self.height, mode);
                let x0 = fx.floor();
                let y0 = fy.floor();
                let tx = fx - x0;
                let ty = fy - y0;
                let (x0, y0) = (x0 as i64, y0 as i64);
                let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));

                let c00 = self.fetch(x0, y0, mode);
                let c10 = self.fetch(x1, y0, mode);
                let c01 = self.fetch(x0, y1, mode);
                let c11 = self.fetch(x1, y1, mode);

                std::array::from_fn(|i| {
                    let top = c00[i] + (c10[i] - c00[i]) * tx;
                    let bottom = c01[i] + (c11[i] - c01[i]) * tx;
                    top + (bottom - top) * ty
                })
            }
        }
    }

    fn fetch(&self, x: i64, y: i64, mode: AddressMode) -> [f32; 4] {
        match (
            wrap(x, self.width, mode),
            wrap(y, self.height, mode),
        ) {
            (Some(x), Some(y)) => self.texel(x, y),
            _ => [0.0; 4],
        }
    }
}

/// Brings a texel-space coordinate into a small range with the same addressing
/// result, so the integer conversion and neighbour offsets cannot overflow.
fn reduce(f: f32, size: u32, mode: AddressMode) -> f32 {
    let n = size as f32;
    match mode {
        AddressMode::Repeat => f.rem_euclid(n),
        AddressMode::MirrorRepeat => f.rem_euclid(2.0 * n),
        AddressMode::ClampToEdge | AddressMode::ClampToBorder => f.clamp(-2.0, n + 1.0),
    }
}

/// Maps an integer texel coordinate into `[0, size)`, or `None` for border texels.
fn wrap(i: i64, size: u32, mode: AddressMode) -> Option<u32> {
    let n = i64::from(size);
    let mapped = match mode {
        AddressMode::ClampToEdge => i.clamp(0, n - 1),
        AddressMode::Repeat => i.rem_euclid(n),
        AddressMode::MirrorRepeat => {
            let m = i.rem_euclid(2 * n);
            if m >= n { 2 * n - 1 - m } else { m }
        }
        AddressMode::ClampToBorder => {
            if !(0..n).contains(&i) {
                return None;
            }
            i
        }
    };
    Some(mapped as u32)
}
