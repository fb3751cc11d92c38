#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for platformer adapters.
//!
//! Scenes are expressed in viewport pixels: the simulation already scrolls the
//! level under the viewport, so backends only scale the viewport to the window
//! and never need to know about the level's full length.

use anyhow::Result as AnyResult;
use glam::Vec2;
use platformer_core::{ActionState, Controller, Facing, Intent, ItemKind};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Player intent sampled from the keyboard on this frame.
    pub intent: Intent,
}

/// Fixed-size window onto the scrolled level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportPresentation {
    width: f32,
    height: f32,
}

impl ViewportPresentation {
    /// Creates a viewport descriptor, rejecting empty dimensions.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidViewport { width, height });
        }

        Ok(Self { width, height })
    }

    /// Width of the viewport in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the viewport in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Largest uniform scale that fits the viewport inside the screen.
    #[must_use]
    pub fn scale_to_fit(&self, screen_width: f32, screen_height: f32) -> f32 {
        (screen_width / self.width)
            .min(screen_height / self.height)
            .max(0.0)
    }
}

/// Visual category of a static level tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Solid ground or wall.
    Obstacle,
    /// Lethal tile such as water.
    Hazard,
    /// Cosmetic scenery.
    Decoration,
    /// Level exit.
    Exit,
}

/// Static tile drawn at its viewport position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Top-left corner in viewport pixels.
    pub origin: Vec2,
    /// Extent in pixels.
    pub size: Vec2,
    /// Visual category.
    pub kind: TileKind,
}

impl TilePresentation {
    /// Creates a new tile descriptor.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2, kind: TileKind) -> Self {
        Self { origin, size, kind }
    }
}

/// Character drawn as its body rectangle together with its animation state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityPresentation {
    /// Top-left corner in viewport pixels.
    pub origin: Vec2,
    /// Extent in pixels.
    pub size: Vec2,
    /// Whether the character is the player or an adversary.
    pub controller: Controller,
    /// Horizontal heading; sprites are mirrored when facing left.
    pub facing: Facing,
    /// Current animation state.
    pub action: ActionState,
    /// Index of the animation frame within the state.
    pub frame: u32,
    /// Remaining health.
    pub health: i32,
    /// Health ceiling.
    pub max_health: i32,
}

impl EntityPresentation {
    /// Remaining health as a fraction in the range 0.0..=1.0.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }

        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

/// In-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Top-left corner in viewport pixels.
    pub origin: Vec2,
    /// Extent in pixels.
    pub size: Vec2,
}

impl ProjectilePresentation {
    /// Creates a new projectile descriptor.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }
}

/// Item waiting to be collected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupPresentation {
    /// Top-left corner in viewport pixels.
    pub origin: Vec2,
    /// Extent in pixels.
    pub size: Vec2,
    /// Item kind.
    pub kind: ItemKind,
}

impl PickupPresentation {
    /// Creates a new pickup descriptor.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2, kind: ItemKind) -> Self {
        Self { origin, size, kind }
    }
}

/// Outcome of the level shown by the HUD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SceneStatus {
    /// The level is still in progress.
    #[default]
    Playing,
    /// The player reached the exit.
    Completed,
    /// The player died.
    Defeated,
}

impl SceneStatus {
    /// Banner displayed once the level has finished.
    #[must_use]
    pub const fn banner(self) -> Option<&'static str> {
        match self {
            Self::Playing => None,
            Self::Completed => Some("LEVEL COMPLETE"),
            Self::Defeated => Some("GAME OVER"),
        }
    }
}

/// Player statistics drawn over the level.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HudPresentation {
    /// Player's remaining health.
    pub health: i32,
    /// Player's health ceiling.
    pub max_health: i32,
    /// Coins collected so far.
    pub coins: u32,
    /// Outcome of the level.
    pub status: SceneStatus,
}

impl HudPresentation {
    /// Text shown next to the health bar.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "HP {}/{}  Coins {}",
            self.health.max(0),
            self.max_health,
            self.coins
        )
    }
}

/// Scene description combining level tiles, characters and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Viewport the scene is expressed in.
    pub viewport: ViewportPresentation,
    /// Static tiles overlapping the viewport.
    pub tiles: Vec<TilePresentation>,
    /// Living and dying characters.
    pub entities: Vec<EntityPresentation>,
    /// Projectiles currently in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Items not collected yet.
    pub pickups: Vec<PickupPresentation>,
    /// Player statistics.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates an empty scene for the provided viewport.
    #[must_use]
    pub fn new(viewport: ViewportPresentation) -> Self {
        Self {
            viewport,
            tiles: Vec::new(),
            entities: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            hud: HudPresentation::default(),
        }
    }

    /// Removes every drawable while keeping allocated capacity.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.entities.clear();
        self.projectiles.clear();
        self.pickups.clear();
    }

    /// Reports whether a rectangle at `origin` with `size` intersects the viewport.
    #[must_use]
    pub fn is_visible(&self, origin: Vec2, size: Vec2) -> bool {
        origin.x + size.x > 0.0
            && origin.x < self.viewport.width()
            && origin.y + size.y > 0.0
            && origin.y < self.viewport.height()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting platformer scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta and
    /// the input captured by the adapter, and rebuilds the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Viewport dimensions must be positive.
    InvalidViewport {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(
                    f,
                    "viewport dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ViewportPresentation {
        ViewportPresentation::new(800.0, 640.0).expect("valid viewport")
    }

    #[test]
    fn viewport_rejects_zero_width_without_panicking() {
        let error = ViewportPresentation::new(0.0, 640.0).expect_err("zero width is invalid");

        assert_eq!(
            error,
            RenderingError::InvalidViewport {
                width: 0.0,
                height: 640.0
            }
        );
    }

    #[test]
    fn viewport_scale_preserves_aspect_ratio() {
        let viewport = viewport();

        assert_eq!(viewport.scale_to_fit(1600.0, 1600.0), 2.0);
        assert_eq!(viewport.scale_to_fit(1600.0, 320.0), 0.5);
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::new(0.0, 0.5, 1.0, 0.25).lighten(0.5);

        assert_eq!(color, Color::new(0.5, 0.75, 1.0, 0.25));
        assert_eq!(Color::new(0.5, 0.5, 0.5, 1.0).lighten(4.0).red, 1.0);
    }

    #[test]
    fn entity_health_fraction_is_clamped() {
        let mut entity = EntityPresentation {
            origin: Vec2::ZERO,
            size: Vec2::new(20.0, 36.0),
            controller: Controller::Player,
            facing: Facing::Right,
            action: ActionState::Idle,
            frame: 0,
            health: 40,
            max_health: 100,
        };
        assert_eq!(entity.health_fraction(), 0.4);

        entity.health = -10;
        assert_eq!(entity.health_fraction(), 0.0);

        entity.max_health = 0;
        assert_eq!(entity.health_fraction(), 0.0);
    }

    #[test]
    fn visibility_excludes_rectangles_outside_viewport() {
        let scene = Scene::new(viewport());
        let size = Vec2::new(40.0, 40.0);

        assert!(scene.is_visible(Vec2::new(-39.0, 0.0), size));
        assert!(!scene.is_visible(Vec2::new(-40.0, 0.0), size));
        assert!(!scene.is_visible(Vec2::new(800.0, 0.0), size));
        assert!(scene.is_visible(Vec2::new(799.0, 600.0), size));
    }

    #[test]
    fn hud_label_never_shows_negative_health() {
        let hud = HudPresentation {
            health: -5,
            max_health: 100,
            coins: 3,
            status: SceneStatus::Defeated,
        };

        assert_eq!(hud.label(), "HP 0/100  Coins 3");
        assert_eq!(hud.status.banner(), Some("GAME OVER"));
    }
}
