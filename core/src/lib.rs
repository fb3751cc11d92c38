#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the platformer engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and the simulation driver
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values for systems to react to deterministically. Systems consume event
//! streams, query immutable snapshots, and respond exclusively with new command
//! batches.

mod catalog;
mod tuning;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use catalog::{CatalogError, CharacterCatalog, CharacterProfile, Size};
pub use tuning::Tuning;

/// Number of distinct tile codes understood by the level format.
pub const TILE_TYPES: i32 = 18;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock and performs per-entity upkeep.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Puts an adversary into its idle pause for the provided number of ticks.
    BeginIdle {
        /// Adversary entering the pause.
        entity: EntityId,
        /// Number of ticks the pause lasts.
        ticks: u32,
    },
    /// Halts an adversary that spotted the player and attempts a shot.
    Engage {
        /// Adversary engaging the player.
        entity: EntityId,
    },
    /// Moves an adversary one tick along its patrol.
    Patrol {
        /// Adversary that patrols.
        entity: EntityId,
    },
    /// Counts down an idling adversary's pause.
    Rest {
        /// Adversary that rests.
        entity: EntityId,
    },
    /// Applies the player's intent for this tick.
    ControlPlayer {
        /// Intent flags sampled from the input collaborator.
        intent: Intent,
    },
    /// Advances every live projectile and resolves its collisions.
    AdvanceProjectiles,
    /// Resolves overlaps between the player and item pickups.
    CollectPickups,
    /// Shifts the viewport by the provided delta, holding the player in place.
    Scroll {
        /// Horizontal displacement applied to world geometry on the next tick.
        delta: f32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Index of the tick that just started.
        tick: u64,
    },
    /// Confirms that an entity released a projectile.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Entity that fired the projectile.
        owner: EntityId,
    },
    /// Reports that a projectile left play.
    ProjectileRemoved {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
        /// Reason the projectile was removed.
        reason: ProjectileRemoval,
    },
    /// Reports that an entity lost health.
    EntityDamaged {
        /// Entity that received damage.
        entity: EntityId,
        /// Amount of health removed.
        amount: i32,
        /// Health remaining after the damage, clamped at zero.
        health: i32,
    },
    /// Announces that an entity entered its terminal death state.
    EntityDied {
        /// Entity that died.
        entity: EntityId,
        /// Condition that killed the entity.
        cause: DeathCause,
    },
    /// Confirms that the player collected an item pickup.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: PickupId,
        /// Kind of item that was collected.
        kind: ItemKind,
    },
    /// Reports the player's resolved movement for camera coordination.
    PlayerMoved {
        /// Horizontal displacement after collision resolution.
        dx: f32,
        /// Player body after the displacement was applied.
        body: Rect,
    },
    /// Confirms that the viewport scrolled.
    Scrolled {
        /// Delta that will be applied to world geometry on the next tick.
        delta: f32,
        /// Cumulative scroll offset after the change.
        offset: f32,
    },
    /// Announces that the player reached the level exit.
    LevelCompleted,
}

/// Reasons a projectile may be removed from play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileRemoval {
    /// The projectile crossed a horizontal viewport edge.
    LeftViewport,
    /// The projectile struck an obstacle tile.
    HitObstacle,
    /// The projectile struck a living entity.
    HitEntity {
        /// Entity that absorbed the hit.
        target: EntityId,
    },
}

/// Conditions that can move an entity into the death state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Health dropped to zero or below.
    Damage,
    /// The player touched a hazard tile.
    Hazard,
    /// The player fell below the bottom edge of the level.
    Fall,
}

/// Unique identifier assigned to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an item pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Axis-aligned rectangle expressed in viewport units.
///
/// The origin sits at the top-left corner; `y` grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle whose centre sits at the provided point.
    #[must_use]
    pub fn from_center(center_x: f32, center_y: f32, size: Size) -> Self {
        Self::new(
            center_x - size.width() * 0.5,
            center_y - size.height() * 0.5,
            size.width(),
            size.height(),
        )
    }

    /// Creates a rectangle whose bottom edge midpoint sits at the provided point.
    #[must_use]
    pub fn from_midbottom(mid_x: f32, bottom: f32, size: Size) -> Self {
        Self::new(
            mid_x - size.width() * 0.5,
            bottom - size.height(),
            size.width(),
            size.height(),
        )
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Horizontal centre.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    /// Vertical centre.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height * 0.5
    }

    /// Returns a copy moved by the provided displacement.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Reports whether the interiors of two rectangles intersect.
    ///
    /// Rectangles that merely share an edge do not overlap, which lets an
    /// entity rest flush against an obstacle without colliding with it.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Horizontal facing of an entity or projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Facing towards decreasing `x`.
    Left,
    /// Facing towards increasing `x`.
    Right,
}

impl Facing {
    /// Direction multiplier: `-1.0` for left, `1.0` for right.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Returns the opposite facing.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Discrete animation and behaviour mode of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionState {
    /// Standing still, also used as the shooting pose.
    Idle,
    /// Moving horizontally on the ground.
    Run,
    /// Airborne.
    Jump,
    /// Terminal state entered when the entity dies.
    Death,
}

impl ActionState {
    /// Every action state in animation-table order.
    pub const ALL: [ActionState; 4] = [Self::Idle, Self::Run, Self::Jump, Self::Death];

    /// Index of the state inside per-character animation tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Idle => 0,
            Self::Run => 1,
            Self::Jump => 2,
            Self::Death => 3,
        }
    }

    /// Lower-case name used by asset manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Death => "death",
        }
    }
}

/// Behaviour mode that decides who drives an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Controller {
    /// Driven by the player's input intent.
    Player,
    /// Driven by the adversary controller.
    Ai,
}

impl Controller {
    /// Human readable name of the character type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Ai => "adversary",
        }
    }
}

/// Types of items that can be collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Restores a fixed amount of health up to the maximum.
    Health,
    /// Increments the coin counter.
    Coin,
}

/// Intent flags sampled from the input collaborator for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Intent {
    /// Move towards decreasing `x`.
    pub move_left: bool,
    /// Move towards increasing `x`.
    pub move_right: bool,
    /// Request a jump; honoured once the player stands on the ground.
    pub jump: bool,
    /// Request a single shot.
    pub fire: bool,
}

impl Intent {
    /// Reports whether either horizontal movement flag is set.
    #[must_use]
    pub const fn moves_horizontally(&self) -> bool {
        self.move_left || self.move_right
    }
}

/// Raw integer code stored in a level grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCode(i32);

impl TileCode {
    /// Sentinel code for cells without a tile.
    pub const EMPTY: TileCode = TileCode(-1);

    /// Creates a new tile code wrapper.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the raw code.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Classifies the code, returning `None` for codes outside the known range.
    #[must_use]
    pub const fn category(&self) -> Option<TileCategory> {
        let category = match self.0 {
            -1 => TileCategory::Empty,
            0..=8 => TileCategory::Obstacle,
            9..=10 => TileCategory::Hazard,
            11..=12 => TileCategory::Decoration,
            13 => TileCategory::PlayerSpawn,
            14 => TileCategory::AdversarySpawn,
            15 => TileCategory::Pickup(ItemKind::Health),
            16 => TileCategory::Pickup(ItemKind::Coin),
            17 => TileCategory::Exit,
            _ => return None,
        };
        Some(category)
    }
}

/// Category a tile code belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileCategory {
    /// No tile.
    Empty,
    /// Solid tile that blocks movement and projectiles.
    Obstacle,
    /// Tile that kills the player on contact.
    Hazard,
    /// Cosmetic tile without collision.
    Decoration,
    /// Marker for the player's starting position.
    PlayerSpawn,
    /// Marker for an adversary's starting position.
    AdversarySpawn,
    /// Marker for an item pickup.
    Pickup(ItemKind),
    /// Marker for the level exit.
    Exit,
}

/// Computes the rectangle an adversary projects ahead of itself to spot the player.
///
/// The probe is centred one body width ahead of the body's centre in the
/// facing direction.
#[must_use]
pub fn vision_probe(body: &Rect, facing: Facing, size: Size) -> Rect {
    Rect::from_center(
        body.center_x() + body.width() * facing.sign(),
        body.center_y(),
        size,
    )
}

/// Immutable representation of a single entity's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Unique identifier assigned to the entity.
    pub id: EntityId,
    /// Behaviour mode driving the entity.
    pub controller: Controller,
    /// Bounding rectangle in viewport units.
    pub body: Rect,
    /// Direction the entity faces.
    pub facing: Facing,
    /// Current action state.
    pub action: ActionState,
    /// Index of the current animation frame.
    pub frame: u32,
    /// Current health, never below zero.
    pub health: i32,
    /// Upper bound for health.
    pub max_health: i32,
    /// Indicates whether the entity is still alive.
    pub alive: bool,
    /// Indicates whether the entity is airborne.
    pub in_air: bool,
    /// Ticks remaining before the entity may fire again.
    pub cooldown: u32,
    /// Indicates whether an adversary is pausing its patrol.
    pub idling: bool,
    /// Coins collected so far.
    pub coins: u32,
}

/// Read-only snapshot describing every entity in the level.
#[derive(Clone, Debug, Default)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over adversary snapshots in deterministic order.
    pub fn adversaries(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.controller == Controller::Ai)
    }

    /// Snapshot of the player-controlled entity, if any.
    #[must_use]
    pub fn player(&self) -> Option<&EntitySnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.controller == Controller::Player)
    }

    /// Snapshot of the entity with the provided identifier.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a live projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Entity that fired the projectile.
    pub owner: EntityId,
    /// Bounding rectangle in viewport units.
    pub body: Rect,
    /// Direction of travel.
    pub facing: Facing,
}

/// Immutable representation of an uncollected item pickup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Identifier allocated to the pickup.
    pub id: PickupId,
    /// Kind of item.
    pub kind: ItemKind,
    /// Bounding rectangle in viewport units.
    pub body: Rect,
}

/// Camera state shared with the scroll system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSnapshot {
    /// Cumulative distance the viewport moved from the level origin.
    pub offset: f32,
    /// Largest offset the level permits.
    pub max_offset: f32,
}
