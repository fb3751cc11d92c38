#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the platformer engine.

pub mod collision;
mod entity;
mod level;
mod pickups;
mod projectiles;
mod tiles;

use std::time::Duration;

use platformer_core::{
    ActionState, CharacterCatalog, Command, Controller, DeathCause, EntityId, Event, Facing,
    Intent, ItemKind, ProjectileRemoval, Rect, Size, Tuning,
};

use crate::{
    collision::Resolution, entity::Entity, pickups::Pickups, projectiles::ProjectileManager,
};

pub use level::{LevelError, LevelGrid};
pub use tiles::{LevelLayout, SpawnPoint, TileWorld};

#[derive(Clone, Copy, Debug, Default)]
struct ScrollState {
    offset: f32,
    max_offset: f32,
    pending: f32,
}

/// Represents the authoritative platformer world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    catalog: CharacterCatalog,
    tiles: TileWorld,
    entities: Vec<Entity>,
    projectiles: ProjectileManager,
    pickups: Pickups,
    scroll: ScrollState,
    tick_index: u64,
    clock: Duration,
    completed: bool,
}

impl World {
    /// Loads a level grid and spawns every entity and pickup it marks.
    ///
    /// The player always receives [`EntityId`] zero; adversaries follow in
    /// row-major spawn order.
    pub fn new(
        level: &LevelGrid,
        tuning: Tuning,
        catalog: CharacterCatalog,
    ) -> Result<Self, LevelError> {
        let layout = TileWorld::load(level, tuning.tile_size)?;
        let tile_size = tuning.tile_size;

        let player_profile = *catalog.profile(Controller::Player);
        let mut entities = vec![Entity::spawn(
            EntityId::new(0),
            Controller::Player,
            layout.player.place(tile_size, player_profile.body()),
            tuning.player_speed,
            tuning.max_health,
            player_profile,
        )];

        let adversary_profile = *catalog.profile(Controller::Ai);
        for (index, spawn) in layout.adversaries.iter().enumerate() {
            let id = u32::try_from(index + 1).unwrap_or(u32::MAX);
            entities.push(Entity::spawn(
                EntityId::new(id),
                Controller::Ai,
                spawn.place(tile_size, adversary_profile.body()),
                tuning.adversary_speed,
                tuning.max_health,
                adversary_profile,
            ));
        }

        let mut pickups = Pickups::default();
        for (kind, spawn) in &layout.items {
            pickups.place(*kind, spawn.place(tile_size, catalog.item(*kind)));
        }

        let max_offset = (layout.tiles.level_length() - tuning.viewport_width).max(0.0);

        log::info!(
            "loaded level: {}x{} tiles, {} obstacles, {} hazards, {} adversaries, {} pickups",
            layout.tiles.columns(),
            layout.tiles.rows(),
            layout.tiles.obstacles().len(),
            layout.tiles.hazards().len(),
            layout.adversaries.len(),
            layout.items.len(),
        );

        Ok(Self {
            tuning,
            catalog,
            tiles: layout.tiles,
            entities,
            projectiles: ProjectileManager::default(),
            pickups,
            scroll: ScrollState {
                offset: 0.0,
                max_offset,
                pending: 0.0,
            },
            tick_index: 0,
            clock: Duration::ZERO,
            completed: false,
        })
    }

    fn apply_pending_scroll(&mut self) {
        let delta = std::mem::take(&mut self.scroll.pending);
        if delta == 0.0 {
            return;
        }

        self.tiles.shift(delta);
        self.pickups.shift(delta);
        self.projectiles.shift(delta);
        for adversary in self.entities.iter_mut().filter(|entity| entity.is_ai()) {
            adversary.body = adversary.body.translated(delta, 0.0);
        }
    }

    fn upkeep(&mut self, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let frame_duration = self.tuning.animation_frame();
        if let Some((player, adversaries)) = self.entities.split_first_mut() {
            for adversary in adversaries {
                upkeep_entity(adversary, now, frame_duration, out_events);
            }
            upkeep_entity(player, now, frame_duration, out_events);
        }
    }

    fn control_player(&mut self, intent: Intent, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let tick = self.tick_index;
        let Self {
            tuning,
            catalog,
            tiles,
            entities,
            projectiles,
            completed,
            ..
        } = self;
        let Some(player) = entities.first_mut() else {
            return;
        };
        if !player.alive() {
            return;
        }

        if intent.jump {
            player.jump_requested = true;
        }

        let action = if intent.fire {
            fire(
                player,
                projectiles,
                tuning,
                catalog.projectile(),
                out_events,
            );
            ActionState::Idle
        } else if player.in_air {
            ActionState::Jump
        } else if intent.moves_horizontally() {
            ActionState::Run
        } else {
            ActionState::Idle
        };
        player.set_action(action, now);

        let heading = if intent.move_right {
            Some(Facing::Right)
        } else if intent.move_left {
            Some(Facing::Left)
        } else {
            None
        };
        let resolution = move_entity(player, heading, tiles, tuning);
        out_events.push(Event::PlayerMoved {
            dx: resolution.dx,
            body: player.body,
        });

        let cause = if collision::touches_hazard(&player.body, tiles.hazards()) {
            Some(DeathCause::Hazard)
        } else if player.body.bottom() > tiles.level_height() {
            Some(DeathCause::Fall)
        } else {
            None
        };
        if let Some(cause) = cause {
            if player.kill(now) {
                log::info!("player died: {cause:?}");
                out_events.push(Event::EntityDied {
                    entity: player.id,
                    cause,
                });
            }
            return;
        }

        if !*completed && tiles.exits().iter().any(|exit| exit.overlaps(&player.body)) {
            *completed = true;
            log::info!("level completed at tick {tick}");
            out_events.push(Event::LevelCompleted);
        }
    }

    fn begin_idle(&mut self, id: EntityId, ticks: u32) {
        let now = self.clock;
        let Some(adversary) = living_adversary(&mut self.entities, id) else {
            return;
        };
        if adversary.idling {
            return;
        }

        adversary.idling = true;
        adversary.idle_timer = ticks;
        adversary.set_action(ActionState::Idle, now);
    }

    fn engage(&mut self, id: EntityId, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let projectile_size = self.catalog.projectile();
        let Self {
            tuning,
            entities,
            projectiles,
            ..
        } = self;
        let Some(adversary) = living_adversary(entities, id) else {
            return;
        };

        adversary.set_action(ActionState::Idle, now);
        fire(adversary, projectiles, tuning, projectile_size, out_events);
    }

    fn patrol(&mut self, id: EntityId) {
        let now = self.clock;
        let Self {
            tuning,
            tiles,
            entities,
            ..
        } = self;
        let Some(adversary) = living_adversary(entities, id) else {
            return;
        };

        let facing = adversary.facing;
        let _ = move_entity(adversary, Some(facing), tiles, tuning);
        adversary.set_action(ActionState::Run, now);

        adversary.patrol_counter = adversary.patrol_counter.saturating_add(1);
        if adversary.patrol_counter as f32 > tiles.tile_size() {
            adversary.facing = adversary.facing.reversed();
            adversary.patrol_counter = 0;
        }
    }

    fn rest(&mut self, id: EntityId) {
        let now = self.clock;
        let Some(adversary) = living_adversary(&mut self.entities, id) else {
            return;
        };
        if !adversary.idling {
            return;
        }

        adversary.idle_timer = adversary.idle_timer.saturating_sub(1);
        if adversary.idle_timer == 0 {
            adversary.idling = false;
            adversary.patrol_counter = 0;
            adversary.set_action(ActionState::Run, now);
        }
    }

    fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let Self {
            tuning,
            tiles,
            entities,
            projectiles,
            ..
        } = self;

        let mut index = 0;
        while let Some(projectile) = projectiles.get_mut(index) {
            projectile.body = projectile
                .body
                .translated(tuning.projectile_speed * projectile.facing.sign(), 0.0);
            let body = projectile.body;
            let owner = projectile.owner;
            let id = projectile.id;

            let reason = if body.left() < 0.0 || body.left() > tuning.viewport_width {
                Some(ProjectileRemoval::LeftViewport)
            } else if tiles.obstacles().iter().any(|tile| tile.overlaps(&body)) {
                Some(ProjectileRemoval::HitObstacle)
            } else {
                entities
                    .iter_mut()
                    .filter(|entity| entity.alive())
                    .filter(|entity| !(tuning.exempt_firer && entity.id == owner))
                    .find(|entity| entity.body.overlaps(&body))
                    .map(|target| {
                        let outcome = target.take_damage(tuning.projectile_damage, now);
                        out_events.push(Event::EntityDamaged {
                            entity: target.id,
                            amount: tuning.projectile_damage,
                            health: outcome.health,
                        });
                        if outcome.died {
                            log::info!("{} {} died", target.controller.name(), target.id.get());
                            out_events.push(Event::EntityDied {
                                entity: target.id,
                                cause: DeathCause::Damage,
                            });
                        }
                        ProjectileRemoval::HitEntity { target: target.id }
                    })
            };

            match reason {
                Some(reason) => {
                    let _ = projectiles.remove(index);
                    log::trace!("projectile {} removed: {reason:?}", id.get());
                    out_events.push(Event::ProjectileRemoved {
                        projectile: id,
                        reason,
                    });
                }
                None => index += 1,
            }
        }
    }

    fn collect_pickups(&mut self, out_events: &mut Vec<Event>) {
        let Self {
            tuning,
            entities,
            pickups,
            ..
        } = self;
        let Some(player) = entities.first_mut() else {
            return;
        };

        for pickup in pickups.take_overlapping(&player.body) {
            match pickup.kind {
                ItemKind::Health => {
                    let restored = player.heal(tuning.health_restore);
                    log::debug!("health pickup {} restored {restored}", pickup.id.get());
                }
                ItemKind::Coin => {
                    player.coins = player.coins.saturating_add(1);
                    log::debug!("coin pickup {} collected", pickup.id.get());
                }
            }
            out_events.push(Event::PickupCollected {
                pickup: pickup.id,
                kind: pickup.kind,
            });
        }
    }

    fn scroll_by(&mut self, delta: f32, out_events: &mut Vec<Event>) {
        if let Some(player) = self.entities.first_mut() {
            player.body = player.body.translated(delta, 0.0);
        }
        self.scroll.offset -= delta;
        self.scroll.pending += delta;
        out_events.push(Event::Scrolled {
            delta,
            offset: self.scroll.offset,
        });
    }
}

fn living_adversary(entities: &mut [Entity], id: EntityId) -> Option<&mut Entity> {
    entities
        .iter_mut()
        .find(|entity| entity.id == id)
        .filter(|entity| entity.is_ai() && entity.alive())
}

fn upkeep_entity(
    entity: &mut Entity,
    now: Duration,
    frame_duration: Duration,
    out_events: &mut Vec<Event>,
) {
    entity.advance_animation(now, frame_duration);
    if entity.check_alive(now) {
        out_events.push(Event::EntityDied {
            entity: entity.id,
            cause: DeathCause::Damage,
        });
    }
    entity.tick_cooldown();
}

fn fire(
    entity: &mut Entity,
    projectiles: &mut ProjectileManager,
    tuning: &Tuning,
    size: Size,
    out_events: &mut Vec<Event>,
) {
    if !entity.try_shoot(tuning.reload_ticks) {
        return;
    }

    let (x, y) = entity.muzzle(tuning.shot_margin);
    let projectile = projectiles.spawn(entity.id, Rect::from_center(x, y, size), entity.facing);
    log::trace!(
        "entity {} fired projectile {}",
        entity.id.get(),
        projectile.get()
    );
    out_events.push(Event::ProjectileFired {
        projectile,
        owner: entity.id,
    });
}

/// Applies horizontal intent, jump and gravity to an entity and resolves the
/// displacement against the level geometry.
fn move_entity(
    entity: &mut Entity,
    heading: Option<Facing>,
    tiles: &TileWorld,
    tuning: &Tuning,
) -> Resolution {
    let mut dx = 0.0;
    if let Some(facing) = heading {
        dx = entity.speed * facing.sign();
        entity.facing = facing;
    }

    if entity.jump_requested && !entity.in_air {
        entity.velocity_y = tuning.jump_velocity;
        entity.jump_requested = false;
        entity.in_air = true;
    }
    entity.velocity_y = (entity.velocity_y + tuning.gravity).min(tuning.max_fall_speed);

    if entity.controller == Controller::Player {
        if entity.body.left() + dx < 0.0 {
            dx = -entity.body.left();
        } else if entity.body.right() + dx > tuning.viewport_width {
            dx = tuning.viewport_width - entity.body.right();
        }
    }

    let resolution = collision::resolve(
        entity.body,
        dx,
        entity.velocity_y,
        entity.velocity_y,
        tiles.obstacles(),
        tuning.ground_line,
    );

    if resolution.blocked_x && entity.is_ai() {
        entity.facing = entity.facing.reversed();
        entity.patrol_counter = 0;
    }
    entity.velocity_y = resolution.velocity_y;
    entity.in_air = !resolution.landed;
    entity.body = entity.body.translated(resolution.dx, resolution.dy);
    resolution
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.apply_pending_scroll();
            world.tick_index = world.tick_index.saturating_add(1);
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced {
                dt,
                tick: world.tick_index,
            });
            world.upkeep(out_events);
        }
        Command::BeginIdle { entity, ticks } => world.begin_idle(entity, ticks),
        Command::Engage { entity } => world.engage(entity, out_events),
        Command::Patrol { entity } => world.patrol(entity),
        Command::Rest { entity } => world.rest(entity),
        Command::ControlPlayer { intent } => world.control_player(intent, out_events),
        Command::AdvanceProjectiles => world.advance_projectiles(out_events),
        Command::CollectPickups => world.collect_pickups(out_events),
        Command::Scroll { delta } => world.scroll_by(delta, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{TileWorld, World};
    use platformer_core::{
        CharacterCatalog, EntitySnapshot, EntityView, PickupSnapshot, ProjectileSnapshot,
        ScrollSnapshot, Tuning,
    };

    /// Captures a read-only view of every entity in the level.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        EntityView::from_snapshots(
            world
                .entities
                .iter()
                .map(|entity| entity.snapshot())
                .collect(),
        )
    }

    /// Snapshot of the player-controlled entity.
    #[must_use]
    pub fn player(world: &World) -> Option<EntitySnapshot> {
        world.entities.first().map(|entity| entity.snapshot())
    }

    /// Provides read-only access to the level geometry.
    #[must_use]
    pub fn tile_world(world: &World) -> &TileWorld {
        &world.tiles
    }

    /// Live projectiles in spawn order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Uncollected pickups in placement order.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupSnapshot> {
        world
            .pickups
            .iter()
            .map(|pickup| pickup.snapshot())
            .collect()
    }

    /// Reports the cumulative scroll offset and its upper bound.
    #[must_use]
    pub fn scroll(world: &World) -> ScrollSnapshot {
        ScrollSnapshot {
            offset: world.scroll.offset,
            max_offset: world.scroll.max_offset,
        }
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether the player reached the exit.
    #[must_use]
    pub fn level_completed(world: &World) -> bool {
        world.completed
    }

    /// Tuning constants the world was built with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Character and item dimensions the world was built with.
    #[must_use]
    pub fn catalog(world: &World) -> &CharacterCatalog {
        &world.catalog
    }
}
