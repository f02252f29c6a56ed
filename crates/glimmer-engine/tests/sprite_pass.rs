//! End-to-end checks of the sprite pass through the CPU reference.

use glimmer_engine::camera::Camera2D;
use glimmer_engine::coords::{Rect, Vec2, Viewport};
use glimmer_engine::paint::Color;
use glimmer_engine::render::reference::{rasterize, CpuTexture, DrawState, Framebuffer};
use glimmer_engine::render::sprite::{
    validate_shader, BlendMode, CameraUniform, SamplerSettings, SpriteBatch, SpriteVertex, TextureId,
    QUAD_INDICES, SPRITE_SHADER,
};

const CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

const TL: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const TR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const BL: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
const BR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
}

fn texture_2x2() -> CpuTexture {
    // Row 0 is the top row (v = 0).
    CpuTexture::new(2, 2, vec![TL, TR, BL, BR]).expect("4 texels")
}

#[test]
fn builtin_shader_passes_contract() {
    let contract = validate_shader(SPRITE_SHADER).expect("builtin shader");
    assert_eq!(contract.uniform_size, 80);
    assert_eq!(contract.vertex_inputs, vec![0, 1, 2]);
}

#[test]
fn unit_quad_with_identity_camera_shows_texels_in_its_corners() {
    let camera = CameraUniform::identity();
    let texture = texture_2x2();
    let state = DrawState {
        camera: &camera,
        texture: &texture,
        sampler: SamplerSettings::PIXEL,
        blend: BlendMode::Replace,
    };

    // uv = position; the quad spans NDC [0, 1]², the top-right quarter of a 4×4 target.
    let white = [1.0; 4];
    let quad = [
        SpriteVertex::new([0.0, 0.0], [0.0, 0.0], white),
        SpriteVertex::new([1.0, 0.0], [1.0, 0.0], white),
        SpriteVertex::new([1.0, 1.0], [1.0, 1.0], white),
        SpriteVertex::new([0.0, 1.0], [0.0, 1.0], white),
    ];

    let mut fb = Framebuffer::new(4, 4, CLEAR);
    let shaded = rasterize(&mut fb, &state, &quad, &QUAD_INDICES);
    assert_eq!(shaded, 4);

    // NDC y is up and v follows position, so the top pixel row samples v ≈ 0.75.
    assert!(approx(fb.pixel(2, 0), texture.texel(0, 1)));
    assert!(approx(fb.pixel(3, 0), texture.texel(1, 1)));
    assert!(approx(fb.pixel(2, 1), texture.texel(0, 0)));
    assert!(approx(fb.pixel(3, 1), texture.texel(1, 0)));

    for y in 0..4 {
        for x in 0..4 {
            if !(2..4).contains(&x) || !(0..2).contains(&y) {
                assert_eq!(fb.pixel(x, y), CLEAR, "pixel ({x}, {y}) outside the quad");
            }
        }
    }
}

#[test]
fn camera_maps_world_pixels_onto_framebuffer_pixels() {
    let mut camera = Camera2D::new(Viewport::new(8.0, 8.0));
    camera.position = Vec2::new(4.0, 4.0);
    let uniform = camera.to_uniform();
    let texture = texture_2x2();
    let state = DrawState {
        camera: &uniform,
        texture: &texture,
        sampler: SamplerSettings::PIXEL,
        blend: BlendMode::PremultipliedAlpha,
    };

    let quad = SpriteVertex::quad(Rect::new(2.0, 0.0, 4.0, 4.0), Rect::UNIT, Color::WHITE);
    let mut fb = Framebuffer::new(8, 8, CLEAR);
    assert_eq!(rasterize(&mut fb, &state, &quad, &QUAD_INDICES), 16);

    // World y-down and uv v-down agree: the top-left 2×2 block shows texel (0, 0).
    assert!(approx(fb.pixel(2, 0), TL));
    assert!(approx(fb.pixel(5, 0), TR));
    assert!(approx(fb.pixel(2, 3), BL));
    assert!(approx(fb.pixel(5, 3), BR));
    assert_eq!(fb.pixel(1, 0), CLEAR);
    assert_eq!(fb.pixel(2, 4), CLEAR);
}

#[test]
fn batched_quads_composite_in_push_order() {
    let mut camera = Camera2D::new(Viewport::new(4.0, 4.0));
    camera.position = Vec2::new(2.0, 2.0);
    let uniform = camera.to_uniform();
    let white = CpuTexture::solid(1, 1, [1.0; 4]);
    let state = DrawState {
        camera: &uniform,
        texture: &white,
        sampler: SamplerSettings::PIXEL,
        blend: BlendMode::PremultipliedAlpha,
    };

    let mut batch = SpriteBatch::default();
    let red = Color::from_straight(1.0, 0.0, 0.0, 1.0);
    let half_blue = Color::from_straight(0.0, 0.0, 1.0, 0.5);
    batch.push_quad(TextureId::WHITE, Rect::new(0.0, 0.0, 4.0, 4.0), Rect::UNIT, red);
    batch.push_quad(TextureId::WHITE, Rect::new(0.0, 0.0, 2.0, 4.0), Rect::UNIT, half_blue);
    assert_eq!(batch.ranges().len(), 1);

    let mut fb = Framebuffer::new(4, 4, CLEAR);
    rasterize(&mut fb, &state, batch.vertices(), batch.indices());

    assert!(approx(fb.pixel(0, 0), [0.5, 0.0, 0.5, 1.0]));
    assert!(approx(fb.pixel(3, 3), [1.0, 0.0, 0.0, 1.0]));
}

#[test]
fn zero_tint_leaves_transparent_output_regardless_of_texture() {
    let camera = CameraUniform::identity();
    let texture = texture_2x2();
    let state = DrawState {
        camera: &camera,
        texture: &texture,
        sampler: SamplerSettings::SMOOTH,
        blend: BlendMode::Replace,
    };
    let quad = SpriteVertex::quad(Rect::new(-1.0, -1.0, 2.0, 2.0), Rect::UNIT, Color::TRANSPARENT);
    let mut fb = Framebuffer::new(4, 4, [0.3; 4]);
    assert_eq!(rasterize(&mut fb, &state, &quad, &QUAD_INDICES), 16);
    assert!(fb.pixels().iter().all(|p| *p == [0.0; 4]));
}

#[test]
fn translucent_tint_covers_the_same_under_either_alpha_mode() {
    let mut camera = Camera2D::new(Viewport::new(2.0, 2.0));
    camera.position = Vec2::new(1.0, 1.0);
    let uniform = camera.to_uniform();
    let white = CpuTexture::solid(1, 1, [1.0; 4]);
    let half_red = Color::from_straight(1.0, 0.0, 0.0, 0.5);
    let opaque_black = [0.0, 0.0, 0.0, 1.0];

    for blend in [BlendMode::PremultipliedAlpha, BlendMode::Alpha] {
        let state = DrawState {
            camera: &uniform,
            texture: &white,
            sampler: SamplerSettings::PIXEL,
            blend,
        };
        let mut batch = SpriteBatch::default().with_blend(blend);
        batch.push_quad(TextureId::WHITE, Rect::new(0.0, 0.0, 2.0, 2.0), Rect::UNIT, half_red);

        let mut fb = Framebuffer::new(2, 2, opaque_black);
        assert_eq!(rasterize(&mut fb, &state, batch.vertices(), batch.indices()), 4);
        for px in fb.pixels() {
            assert!(approx(*px, [0.5, 0.0, 0.0, 1.0]), "{blend:?}: {px:?}");
        }
    }
}
