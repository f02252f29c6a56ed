use std::path::PathBuf;

use glam::Vec2;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use glimmer_engine::coords::Rect;
use glimmer_engine::core::{App, AppControl, FrameCtx};
use glimmer_engine::device::GpuInit;
use glimmer_engine::logging::{init_logging, LoggingConfig};
use glimmer_engine::paint::{palette, Color};
use glimmer_engine::render::sprite::{SamplerSettings, TextureDesc, TextureId};
use glimmer_engine::render::{FrameStats, SpriteRenderer, SpriteRendererConfig};
use glimmer_engine::text::SYSTEM_FONT_PATHS;
use glimmer_engine::window::{Runtime, RuntimeConfig};

const CHECKER_SIZE: u32 = 8;
const PAN_STEP: f32 = 32.0;
const ZOOM_STEP: f32 = 1.25;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let demo = Demo {
        font_path: std::env::args().nth(1).map(PathBuf::from),
        ..Demo::default()
    };

    let config = RuntimeConfig {
        title: "glimmer demo".to_string(),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), demo)
}

#[derive(Default)]
struct Demo {
    font_path: Option<PathBuf>,
    scene: Option<Scene>,
    // input accumulated between frames
    pan: Vec2,
    zoom: f32,
    title_timer: f32,
}

struct Scene {
    renderer: SpriteRenderer,
    checker: TextureId,
    stats: FrameStats,
}

impl Demo {
    fn setup(&self, ctx: &FrameCtx<'_, '_>) -> anyhow::Result<Scene> {
        let mut config = SpriteRendererConfig::default();
        config.pipeline.color_format = ctx.gpu.surface_format();

        let device = ctx.gpu.device();
        let queue = ctx.gpu.queue();
        let mut renderer = SpriteRenderer::new(device, queue, config)?;

        let desc = TextureDesc::new("checker", CHECKER_SIZE, CHECKER_SIZE)
            .with_sampler(SamplerSettings::PIXEL);
        let checker = renderer.create_texture(device, queue, &desc, &checkerboard(CHECKER_SIZE))?;

        let loaded = match &self.font_path {
            Some(path) => renderer
                .load_font_file(path)
                .map_err(|e| log::warn!("{e}"))
                .is_ok(),
            None => SYSTEM_FONT_PATHS
                .iter()
                .any(|p| renderer.load_font_file(p).is_ok()),
        };
        if !loaded {
            log::warn!("no font loaded; text will be skipped (pass a .ttf path as the first argument)");
        }

        Ok(Scene {
            renderer,
            checker,
            stats: FrameStats::default(),
        })
    }
}

impl App for Demo {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed {
            return AppControl::Continue;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return AppControl::Continue;
        };

        match code {
            KeyCode::Escape => return AppControl::Exit,
            KeyCode::ArrowLeft => self.pan.x -= PAN_STEP,
            KeyCode::ArrowRight => self.pan.x += PAN_STEP,
            KeyCode::ArrowUp => self.pan.y -= PAN_STEP,
            KeyCode::ArrowDown => self.pan.y += PAN_STEP,
            KeyCode::Equal | KeyCode::NumpadAdd => self.zoom += 1.0,
            KeyCode::Minus | KeyCode::NumpadSubtract => self.zoom -= 1.0,
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.scene.is_none() {
            match self.setup(ctx) {
                Ok(scene) => self.scene = Some(scene),
                Err(e) => {
                    log::error!("renderer setup failed: {e:#}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Exit;
        };

        let renderer = &mut scene.renderer;
        renderer.resize(ctx.viewport());
        let camera = renderer.camera_mut();
        camera.position += std::mem::take(&mut self.pan);
        camera.zoom_by(ZOOM_STEP.powf(std::mem::take(&mut self.zoom)));

        let time = ctx.time;
        let checker = scene.checker;
        let last = scene.stats;
        let mut stats = last;

        let control = ctx.render(renderer.clear_color(), |rctx, target| {
            renderer.begin();

            // Checker tiles around the world origin, pulsing in tint.
            let pulse = 0.75 + 0.25 * (time.elapsed * 2.0).sin();
            for y in -4..4 {
                for x in -6..6 {
                    let dst = Rect::new(x as f32 * 72.0, y as f32 * 72.0, 64.0, 64.0);
                    let tint = if (x + y) % 2 == 0 {
                        Color::from_straight(pulse, pulse, 1.0, 1.0)
                    } else {
                        palette::WHITE
                    };
                    renderer.draw_sprite(checker, dst, Rect::UNIT, tint);
                }
            }
            renderer.draw_rect(Rect::new(-8.0, -8.0, 16.0, 16.0), palette::RED.with_opacity(0.8));

            renderer.draw_centered(rctx.queue, "glimmer", 1.0, palette::YELLOW);
            renderer.draw_multiline_at_grid(
                rctx.queue,
                "arrows: pan\n+/-: zoom\nesc: quit",
                1.0,
                3.0,
                palette::LIGHT_BLUE,
            );
            let line = format!(
                "quads {}  draws {}  culled {}",
                last.quads, last.draw_calls, last.culled
            );
            let rows = renderer.grid().screen_rows(renderer.camera());
            renderer.draw_at_grid(rctx.queue, &line, 1.0, rows - 2.0, palette::GRAY);

            stats = renderer.end(rctx.device, rctx.queue);
            renderer.render(target);
        });
        scene.stats = stats;

        self.title_timer += time.dt;
        if self.title_timer >= 1.0 {
            self.title_timer = 0.0;
            let fps = if time.dt > 0.0 { 1.0 / time.dt } else { 0.0 };
            ctx.runtime
                .set_title(format!("glimmer demo ({fps:.0} fps, {} quads)", stats.quads));
        }

        control
    }
}

/// RGBA8 checkerboard, one texel per square.
fn checkerboard(size: u32) -> Vec<u8> {
    (0..size * size)
        .flat_map(|i| {
            let (x, y) = (i % size, i / size);
            if (x + y) % 2 == 0 {
                [230, 230, 230, 255]
            } else {
                [40, 40, 48, 255]
            }
        })
        .collect()
}
