#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the platformer.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Characters, tiles and items are drawn as flat rectangles tinted by their
//! category and animation state.

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    color::{BLACK, WHITE},
    input::{is_key_down, is_key_pressed, KeyCode},
};
use platformer_core::{ActionState, Controller, Facing, Intent, ItemKind};
use platformer_rendering::{
    Color, EntityPresentation, FrameInput, HudPresentation, PickupPresentation, Presentation,
    ProjectilePresentation, RenderingBackend, Scene, TileKind, TilePresentation,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

const HUD_FONT_SIZE: f32 = 24.0;
const BANNER_FONT_SIZE: u16 = 48;

/// Snapshot of the keyboard observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` quits the game loop.
    quit_requested: bool,
    /// `A` held.
    move_left: bool,
    /// `D` held.
    move_right: bool,
    /// `Space` pressed on this frame.
    jump: bool,
    /// `F` pressed on this frame.
    fire: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            move_left: is_key_down(KeyCode::A),
            move_right: is_key_down(KeyCode::D),
            jump: is_key_pressed(KeyCode::Space),
            fire: is_key_pressed(KeyCode::F),
        }
    }

    fn frame_input(self) -> FrameInput {
        FrameInput {
            intent: Intent {
                move_left: self.move_left,
                move_right: self.move_right,
                jump: self.jump,
                fire: self.fire,
            },
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    update: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += breakdown.update;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_update = self.update_accum / frames.max(1);
        let avg_render = self.render_accum / frames.max(1);

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update,
            avg_render,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.viewport.width().round() as i32,
            window_height: scene.viewport.height().round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let update_start = Instant::now();
                update_scene(frame_dt, keyboard.frame_input(), &mut scene);
                let update_duration = update_start.elapsed();

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_tiles(&scene.tiles, &metrics);
                draw_pickups(&scene.pickups, &metrics);
                draw_entities(&scene.entities, &metrics);
                draw_projectiles(&scene.projectiles, &metrics);
                draw_hud(&scene.hud, &metrics);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    update: update_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_update,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | update: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_update.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps viewport pixels onto the window, letterboxing to preserve the aspect ratio.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let viewport = scene.viewport;
        let scale = viewport.scale_to_fit(screen_width, screen_height);
        let offset_x = ((screen_width - viewport.width() * scale) * 0.5).max(0.0);
        let offset_y = ((screen_height - viewport.height() * scale) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    fn to_screen(&self, origin: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + origin.x * self.scale,
            self.offset_y + origin.y * self.scale,
        )
    }

    fn scaled(&self, size: Vec2) -> Vec2 {
        size * self.scale
    }
}

fn tile_color(kind: TileKind) -> Color {
    match kind {
        TileKind::Obstacle => Color::from_rgb_u8(110, 84, 58),
        TileKind::Hazard => Color::from_rgb_u8(38, 92, 190),
        TileKind::Decoration => Color::from_rgb_u8(74, 140, 74),
        TileKind::Exit => Color::from_rgb_u8(232, 196, 64),
    }
}

fn pickup_color(kind: ItemKind) -> Color {
    match kind {
        ItemKind::Health => Color::from_rgb_u8(214, 48, 48),
        ItemKind::Coin => Color::from_rgb_u8(246, 214, 52),
    }
}

/// Body tint for a character, pulsing with its animation frame.
fn entity_color(entity: &EntityPresentation) -> Color {
    let base = match entity.controller {
        Controller::Player => Color::from_rgb_u8(58, 120, 216),
        Controller::Ai => Color::from_rgb_u8(196, 64, 64),
    };

    match entity.action {
        ActionState::Death => {
            let mut faded = base.lighten(0.5);
            faded.alpha = 0.6;
            faded
        }
        ActionState::Run | ActionState::Jump if entity.frame % 2 == 1 => base.lighten(0.15),
        _ => base,
    }
}

/// Small marker on the leading edge of a body showing which way it faces.
fn facing_marker_for(entity: &EntityPresentation, origin: Vec2, size: Vec2) -> (Vec2, Vec2) {
    let marker = Vec2::new((size.x * 0.25).max(1.0), (size.y * 0.15).max(1.0));
    let top = origin.y + size.y * 0.2;
    let left = match entity.facing {
        Facing::Left => origin.x,
        Facing::Right => origin.x + size.x - marker.x,
    };
    (Vec2::new(left, top), marker)
}

fn draw_rect(origin: Vec2, size: Vec2, color: Color) {
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        size.x,
        size.y,
        to_macroquad_color(color),
    );
}

fn draw_tiles(tiles: &[TilePresentation], metrics: &SceneMetrics) {
    for tile in tiles {
        draw_rect(
            metrics.to_screen(tile.origin),
            metrics.scaled(tile.size),
            tile_color(tile.kind),
        );
    }
}

fn draw_pickups(pickups: &[PickupPresentation], metrics: &SceneMetrics) {
    for pickup in pickups {
        let origin = metrics.to_screen(pickup.origin);
        let size = metrics.scaled(pickup.size);
        draw_rect(origin, size, pickup_color(pickup.kind));
        macroquad::shapes::draw_rectangle_lines(origin.x, origin.y, size.x, size.y, 1.0, BLACK);
    }
}

fn draw_entities(entities: &[EntityPresentation], metrics: &SceneMetrics) {
    for entity in entities {
        let origin = metrics.to_screen(entity.origin);
        let size = metrics.scaled(entity.size);
        draw_rect(origin, size, entity_color(entity));

        if entity.action == ActionState::Death {
            continue;
        }

        let (marker_origin, marker_size) = facing_marker_for(entity, origin, size);
        draw_rect(marker_origin, marker_size, Color::new(1.0, 1.0, 1.0, 1.0));

        if entity.controller == Controller::Ai {
            draw_health_bar(entity, origin, size);
        }
    }
}

fn draw_health_bar(entity: &EntityPresentation, origin: Vec2, size: Vec2) {
    let bar_height = (size.y * 0.08).max(2.0);
    let bar_top = origin.y - bar_height - 2.0;

    macroquad::shapes::draw_rectangle(origin.x, bar_top, size.x, bar_height, BLACK);

    let fill_width = size.x * entity.health_fraction();
    if fill_width > f32::EPSILON {
        let fill_color = macroquad::color::Color::new(0.78, 0.0, 0.0, 1.0);
        macroquad::shapes::draw_rectangle(origin.x, bar_top, fill_width, bar_height, fill_color);
    }
}

fn draw_projectiles(projectiles: &[ProjectilePresentation], metrics: &SceneMetrics) {
    let color = macroquad::color::Color::new(0.95, 0.92, 0.25, 1.0);

    for projectile in projectiles {
        let origin = metrics.to_screen(projectile.origin);
        let size = metrics.scaled(projectile.size);
        macroquad::shapes::draw_rectangle(origin.x, origin.y, size.x, size.y, color);
    }
}

fn draw_hud(hud: &HudPresentation, metrics: &SceneMetrics) {
    let origin = metrics.to_screen(Vec2::new(10.0, 10.0));
    let bar = Vec2::new(150.0, 14.0) * metrics.scale;
    let fraction = if hud.max_health > 0 {
        (hud.health as f32 / hud.max_health as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };

    macroquad::shapes::draw_rectangle(origin.x, origin.y, bar.x, bar.y, BLACK);
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        bar.x * fraction,
        bar.y,
        macroquad::color::Color::new(0.2, 0.8, 0.2, 1.0),
    );
    macroquad::text::draw_text(
        &hud.label(),
        origin.x,
        origin.y + bar.y + HUD_FONT_SIZE * metrics.scale,
        HUD_FONT_SIZE * metrics.scale,
        WHITE,
    );

    if let Some(banner) = hud.status.banner() {
        let dimensions = macroquad::text::measure_text(banner, None, BANNER_FONT_SIZE, 1.0);
        let screen_width = macroquad::window::screen_width();
        let screen_height = macroquad::window::screen_height();
        macroquad::text::draw_text(
            banner,
            (screen_width - dimensions.width) * 0.5,
            screen_height * 0.5,
            f32::from(BANNER_FONT_SIZE),
            WHITE,
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
