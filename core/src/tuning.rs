//! Tunable constants that drive the simulation.

use std::time::Duration;

use serde::Deserialize;

use crate::Size;

/// Aggregated tuning knobs for every adjustable aspect of the simulation.
///
/// Every field has a default, so configuration files only need to list the
/// values they override.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Width of the viewport in pixels.
    pub viewport_width: f32,
    /// Height of the viewport in pixels.
    pub viewport_height: f32,
    /// Number of tile rows in a level.
    pub rows: u32,
    /// Number of tile columns in a level.
    pub columns: u32,
    /// Side length of a square tile in pixels.
    pub tile_size: f32,
    /// Downward acceleration added to vertical velocity each tick.
    pub gravity: f32,
    /// Terminal downward velocity.
    pub max_fall_speed: f32,
    /// Vertical velocity applied when a jump starts; negative values rise.
    pub jump_velocity: f32,
    /// Horizontal speed of the player in pixels per tick.
    pub player_speed: f32,
    /// Horizontal speed of adversaries in pixels per tick.
    pub adversary_speed: f32,
    /// Starting and maximum health of every entity.
    pub max_health: i32,
    /// Ticks an entity must wait between shots.
    pub reload_ticks: u32,
    /// Horizontal speed of projectiles in pixels per tick.
    pub projectile_speed: f32,
    /// Health removed by a projectile hit.
    pub projectile_damage: i32,
    /// Distance ahead of the shooter's centre where projectiles spawn, as a
    /// fraction of the shooter's width.
    pub shot_margin: f32,
    /// Health restored by a health pickup.
    pub health_restore: i32,
    /// Simulated milliseconds that each animation frame is held for.
    pub animation_frame_ms: u64,
    /// Number of simulation ticks per second.
    pub ticks_per_second: u32,
    /// Distance from a viewport edge at which the camera starts scrolling.
    pub scroll_threshold: f32,
    /// Width of the adversary vision probe.
    pub vision_width: f32,
    /// Height of the adversary vision probe.
    pub vision_height: f32,
    /// Adversaries start an idle pause with probability `1 / idle_chance` per tick.
    pub idle_chance: u32,
    /// Length of an adversary idle pause in ticks.
    pub idle_ticks: u32,
    /// Prevents projectiles from damaging the entity that fired them.
    pub exempt_firer: bool,
    /// Optional flat floor for levels without tile ground.
    pub ground_line: Option<f32>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            rows: 16,
            columns: 150,
            tile_size: 45.0,
            gravity: 0.5,
            max_fall_speed: 10.0,
            jump_velocity: -10.0,
            player_speed: 4.0,
            adversary_speed: 2.0,
            max_health: 100,
            reload_ticks: 40,
            projectile_speed: 12.0,
            projectile_damage: 10,
            shot_margin: 0.7,
            health_restore: 10,
            animation_frame_ms: 100,
            ticks_per_second: 75,
            scroll_threshold: 200.0,
            vision_width: 150.0,
            vision_height: 20.0,
            idle_chance: 200,
            idle_ticks: 50,
            exempt_firer: true,
            ground_line: None,
        }
    }
}

impl Tuning {
    /// Simulated time covered by a single tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        if self.ticks_per_second == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs(1) / self.ticks_per_second
    }

    /// Simulated time each animation frame is displayed for.
    #[must_use]
    pub const fn animation_frame(&self) -> Duration {
        Duration::from_millis(self.animation_frame_ms)
    }

    /// Size of the adversary vision probe.
    #[must_use]
    pub const fn vision_size(&self) -> Size {
        Size::new(self.vision_width, self.vision_height)
    }

    /// Total scrollable length of a level with the provided column count.
    #[must_use]
    pub fn level_length(&self, columns: u32) -> f32 {
        columns as f32 * self.tile_size
    }
}
