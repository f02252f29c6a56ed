use crate::render::sprite::{BlendMode, CameraUniform, SamplerSettings, SpriteVertex};

use super::{fragment_stage, vertex_stage, CpuTexture, VertexOutput};

/// Float RGBA color target, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, clear: [f32; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![clear; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// # Panics
    ///
    /// If `(x, y)` is outside the framebuffer; see [`get`](Self::get).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        self.pixels[self.index(x, y)]
    }

    /// Pixel at `(x, y)`, or `None` outside the framebuffer.
    pub fn get(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Everything one draw call binds.
#[derive(Debug, Clone, Copy)]
pub struct DrawState<'a> {
    pub camera: &'a CameraUniform,
    pub texture: &'a CpuTexture,
    pub sampler: SamplerSettings,
    pub blend: BlendMode,
}

/// Rasterizes an indexed triangle list into `target`.
///
/// Follows wgpu conventions: NDC y points up, framebuffer rows go down,
/// coverage is tested at pixel centers with the top-left rule so a shared
/// edge belongs to exactly one triangle. Attributes are interpolated
/// perspective-correctly. Triangles with a vertex at `w <= 0` are skipped
/// (no near-plane clipping); depth is ignored.
///
/// Returns the number of fragments shaded.
pub fn rasterize(
    target: &mut Framebuffer,
    state: &DrawState<'_>,
    vertices: &[SpriteVertex],
    indices: &[u32],
) -> usize {
    let outputs: Vec<VertexOutput> = vertices.iter().map(|v| vertex_stage(state.camera, v)).collect();

    let mut shaded = 0;
    for tri in indices.chunks_exact(3) {
        let fetch = |i: u32| outputs.get(i as usize).copied();
        let (Some(a), Some(b), Some(c)) = (fetch(tri[0]), fetch(tri[1]), fetch(tri[2])) else {
            log::warn!("rasterize: index out of range in triangle {tri:?}, skipped");
            continue;
        };
        shaded += draw_triangle(target, state, [a, b, c]);
    }
    shaded
}

struct ScreenVertex {
    x: f32,
    y: f32,
    inv_w: f32,
}

fn to_screen(v: &VertexOutput, width: f32, height: f32) -> Option<ScreenVertex> {
    let [cx, cy, _, cw] = v.clip_position;
    if !(cw > 0.0) || !cx.is_finite() || !cy.is_finite() {
        return None;
    }
    let inv_w = 1.0 / cw;
    let ndc_x = cx * inv_w;
    let ndc_y = cy * inv_w;
    Some(ScreenVertex {
        x: (ndc_x + 1.0) * 0.5 * width,
        y: (1.0 - ndc_y) * 0.5 * height,
        inv_w,
    })
}

#[inline]
fn edge(a: &ScreenVertex, b: &ScreenVertex, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Top-left rule for edges of a triangle with positive [`edge`] area (y down).
#[inline]
fn is_top_left(a: &ScreenVertex, b: &ScreenVertex) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dy < 0.0 || (dy == 0.0 && dx > 0.0)
}

fn draw_triangle(target: &mut Framebuffer, state: &DrawState<'_>, tri: [VertexOutput; 3]) -> usize {
    let (w, h) = (target.width as f32, target.height as f32);
    let (Some(s0), Some(s1), Some(s2)) = (
        to_screen(&tri[0], w, h),
        to_screen(&tri[1], w, h),
        to_screen(&tri[2], w, h),
    ) else {
        return 0;
    };

    // Culling is off: reorder so the signed area is positive.
    let (mut s, mut v) = ([s0, s1, s2], tri);
    let mut area = edge(&s[0], &s[1], s[2].x, s[2].y);
    if area == 0.0 || !area.is_finite() {
        return 0;
    }
    if area < 0.0 {
        s.swap(1, 2);
        v.swap(1, 2);
        area = -area;
    }

    let min_x = s.iter().map(|p| p.x).fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
    let min_y = s.iter().map(|p| p.y).fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
    let max_x = (s.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max).ceil().min(w)) as u32;
    let max_y = (s.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max).ceil().min(h)) as u32;

    let edges = [(1, 2), (2, 0), (0, 1)];
    let owns_edge: [bool; 3] = edges.map(|(i, j)| is_top_left(&s[i], &s[j]));

    let mut shaded = 0;
    for py in min_y..max_y {
        for px in min_x..max_x {
            let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);

            let weights = edges.map(|(i, j)| edge(&s[i], &s[j], cx, cy));
            let covered = weights
                .iter()
                .zip(owns_edge)
                .all(|(&e, owns)| e > 0.0 || (e == 0.0 && owns));
            if !covered {
                continue;
            }

            // Screen-space barycentrics, then perspective correction via 1/w.
            let b = weights.map(|e| e / area);
            let pw = [b[0] * s[0].inv_w, b[1] * s[1].inv_w, b[2] * s[2].inv_w];
            let norm = pw[0] + pw[1] + pw[2];
            let k = pw.map(|p| p / norm);

            let fragment = VertexOutput {
                clip_position: [cx, cy, 0.0, 1.0 / norm],
                uv: std::array::from_fn(|i| k[0] * v[0].uv[i] + k[1] * v[1].uv[i] + k[2] * v[2].uv[i]),
                color: std::array::from_fn(|i| {
                    k[0] * v[0].color[i] + k[1] * v[1].color[i] + k[2] * v[2].color[i]
                }),
            };

            let src = fragment_stage(state.texture, state.sampler, &fragment);
            let idx = target.index(px, py);
            target.pixels[idx] = state.blend.composite(src, target.pixels[idx]);
            shaded += 1;
        }
    }
    shaded
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec2};

    use super::*;
    use crate::render::sprite::QUAD_INDICES;

    fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    fn ortho(w: f32, h: f32) -> CameraUniform {
        CameraUniform::new(Mat4::orthographic_rh(0.0, w, h, 0.0, 0.0, 1.0), Vec2::new(w, h))
    }

    fn quad(x0: f32, y0: f32, x1: f32, y1: f32, color: [f32; 4]) -> [SpriteVertex; 4] {
        [
            SpriteVertex::new([x0, y0], [0.0, 0.0], color),
            SpriteVertex::new([x1, y0], [1.0, 0.0], color),
            SpriteVertex::new([x1, y1], [1.0, 1.0], color),
            SpriteVertex::new([x0, y1], [0.0, 1.0], color),
        ]
    }

    #[test]
    fn get_is_bounds_checked() {
        let fb = Framebuffer::new(3, 2, [0.25; 4]);
        assert_eq!(fb.get(2, 1), Some([0.25; 4]));
        assert_eq!(fb.get(3, 0), None);
        assert_eq!(fb.get(0, 2), None);
        assert_eq!(fb.get(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn shared_diagonal_is_shaded_once() {
        let camera = ortho(8.0, 8.0);
        let white = CpuTexture::solid(1, 1, [1.0; 4]);
        let state = DrawState {
            camera: &camera,
            texture: &white,
            sampler: SamplerSettings::PIXEL,
            blend: BlendMode::PremultipliedAlpha,
        };
        let mut fb = Framebuffer::new(8, 8, [0.0; 4]);
        // Half-transparent: double coverage would show up as alpha 0.75.
        let shaded = rasterize(&mut fb, &state, &quad(0.0, 0.0, 8.0, 8.0, [0.5; 4]), &QUAD_INDICES);
        assert_eq!(shaded, 64);
        assert!(fb.pixels().iter().all(|p| approx(*p, [0.5; 4])));
    }

    #[test]
    fn adjacent_quads_do_not_overlap_or_gap() {
        let camera = ortho(8.0, 4.0);
        let white = CpuTexture::solid(1, 1, [1.0; 4]);
        let state = DrawState {
            camera: &camera,
            texture: &white,
            sampler: SamplerSettings::PIXEL,
            blend: BlendMode::PremultipliedAlpha,
        };
        let mut fb = Framebuffer::new(8, 4, [0.0; 4]);
        let mut verts = quad(0.0, 0.0, 3.0, 4.0, [0.5; 4]).to_vec();
        verts.extend(quad(3.0, 0.0, 8.0, 4.0, [0.5; 4]));
        let indices: Vec<u32> = QUAD_INDICES.iter().copied().chain(QUAD_INDICES.iter().map(|i| i + 4)).collect();
        assert_eq!(rasterize(&mut fb, &state, &verts, &indices), 32);
        assert!(fb.pixels().iter().all(|p| approx(*p, [0.5; 4])));
    }

    #[test]
    fn color_is_interpolated_across_the_triangle() {
        let camera = ortho(4.0, 1.0);
        let white = CpuTexture::solid(1, 1, [1.0; 4]);
        let state = DrawState {
            camera: &camera,
            texture: &white,
            sampler: SamplerSettings::PIXEL,
            blend: BlendMode::Replace,
        };
        let mut fb = Framebuffer::new(4, 1, [0.0; 4]);
        let black = [0.0, 0.0, 0.0, 1.0];
        let red = [1.0, 0.0, 0.0, 1.0];
        let verts = [
            SpriteVertex::new([0.0, 0.0], [0.0; 2], black),
            SpriteVertex::new([4.0, 0.0], [0.0; 2], red),
            SpriteVertex::new([4.0, 1.0], [0.0; 2], red),
            SpriteVertex::new([0.0, 1.0], [0.0; 2], black),
        ];
        rasterize(&mut fb, &state, &verts, &QUAD_INDICES);
        for (x, want) in [0.125, 0.375, 0.625, 0.875].into_iter().enumerate() {
            assert!(approx(fb.pixel(x as u32, 0), [want, 0.0, 0.0, 1.0]), "pixel {x}");
        }
    }

    #[test]
    fn triangles_behind_the_camera_are_dropped() {
        let camera = CameraUniform::new(Mat4::from_cols_array(&[
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, -1.0,
        ]), Vec2::ONE);
        let white = CpuTexture::solid(1, 1, [1.0; 4]);
        let state = DrawState {
            camera: &camera,
            texture: &white,
            sampler: SamplerSettings::PIXEL,
            blend: BlendMode::Replace,
        };
        let mut fb = Framebuffer::new(4, 4, [0.0; 4]);
        let n = rasterize(&mut fb, &state, &quad(-1.0, -1.0, 1.0, 1.0, [1.0; 4]), &QUAD_INDICES);
        assert_eq!(n, 0);
    }

    #[test]
    fn out_of_range_indices_are_skipped() {
        let camera = CameraUniform::identity();
        let white = CpuTexture::solid(1, 1, [1.0; 4]);
        let state = DrawState {
            camera: &camera,
            texture: &white,
            sampler: SamplerSettings::PIXEL,
            blend: BlendMode::Replace,
        };
        let mut fb = Framebuffer::new(2, 2, [0.0; 4]);
        assert_eq!(rasterize(&mut fb, &state, &quad(-1.0, -1.0, 1.0, 1.0, [1.0; 4]), &[0, 1, 9]), 0);
    }
}
