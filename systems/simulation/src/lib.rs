#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step orchestration of the world and its systems.
//!
//! Every call to [`Simulation::step`] runs one tick in a fixed order: the
//! clock advances and pending scroll is applied, adversaries decide, projectiles
//! move, pickups resolve, the player's intent is applied, and finally the
//! camera reacts to the player's movement.

use std::time::Duration;

use platformer_core::{Command, Event, Intent};
use platformer_system_adversary::{self as adversary, AdversaryController};
use platformer_system_camera::{self as camera, CameraScroll};
use platformer_world::{self as world, query, World};

/// Configuration parameters required to construct a simulation.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeding the adversaries' idle rolls.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Outcome of the level as observed after the latest tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// The player is alive and has not reached the exit.
    Playing,
    /// The player reached the exit.
    Completed,
    /// The player died.
    Defeated,
}

/// Events emitted by the world during a single tick, in emission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    events: Vec<Event>,
}

impl TickReport {
    /// Events emitted during the tick.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Reports whether the tick produced no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consumes the report, yielding the underlying events.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

/// Owns the world together with the systems that drive it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    adversaries: AdversaryController,
    camera: CameraScroll,
    tick_duration: Duration,
    status: Status,
}

impl Simulation {
    /// Wraps a loaded world, deriving system parameters from its tuning.
    #[must_use]
    pub fn new(world: World, config: Config) -> Self {
        let tuning = query::tuning(&world);
        let adversaries = AdversaryController::new(adversary::Config::new(
            tuning.idle_chance,
            tuning.idle_ticks,
            tuning.vision_size(),
            config.rng_seed,
        ));
        let camera = CameraScroll::new(camera::Config::new(
            tuning.scroll_threshold,
            tuning.viewport_width,
        ));
        let tick_duration = tuning.tick_duration();

        Self {
            world,
            adversaries,
            camera,
            tick_duration,
            status: Status::Playing,
        }
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Outcome observed after the latest tick.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Simulated time covered by a single tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Runs a single tick with the provided player intent.
    ///
    /// The world keeps ticking after the outcome is decided; the first
    /// outcome reached is kept.
    pub fn step(&mut self, intent: Intent) -> TickReport {
        let mut report = Vec::new();
        let mut events = Vec::new();
        let mut commands = Vec::new();

        world::apply(
            &mut self.world,
            Command::Tick {
                dt: self.tick_duration,
            },
            &mut events,
        );
        self.adversaries
            .handle(&events, &query::entity_view(&self.world), &mut commands);
        report.append(&mut events);

        commands.push(Command::AdvanceProjectiles);
        commands.push(Command::CollectPickups);
        commands.push(Command::ControlPlayer { intent });
        self.apply_all(&mut commands, &mut events);

        self.camera
            .handle(&events, query::scroll(&self.world), &mut commands);
        report.append(&mut events);
        self.apply_all(&mut commands, &mut events);
        report.append(&mut events);

        self.refresh_status();
        TickReport { events: report }
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    fn refresh_status(&mut self) {
        if self.status != Status::Playing {
            return;
        }

        let status = if query::level_completed(&self.world) {
            Status::Completed
        } else if query::player(&self.world).map_or(true, |player| !player.alive) {
            Status::Defeated
        } else {
            Status::Playing
        };

        if status != Status::Playing {
            log::info!(
                "simulation finished after {} ticks: {status:?}",
                query::tick_index(&self.world)
            );
            self.status = status;
        }
    }
}
