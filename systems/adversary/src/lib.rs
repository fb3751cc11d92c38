#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adversary behaviour system that turns each tick into patrol, idle, and
//! engagement decisions.

use platformer_core::{vision_probe, Command, EntityView, Event, Size};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the adversary controller.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    idle_chance: u32,
    idle_ticks: u32,
    vision: Size,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// Each tick an adversary that is not already idling starts a pause with
    /// probability `1 / idle_chance`; zero disables idling. Pauses last
    /// `idle_ticks` ticks.
    #[must_use]
    pub const fn new(idle_chance: u32, idle_ticks: u32, vision: Size, rng_seed: u64) -> Self {
        Self {
            idle_chance,
            idle_ticks,
            vision,
            rng_seed,
        }
    }
}

/// Pure system that decides what every living adversary does on each tick.
#[derive(Debug)]
pub struct AdversaryController {
    idle_chance: u32,
    idle_ticks: u32,
    vision: Size,
    rng: ChaCha8Rng,
}

impl AdversaryController {
    /// Creates a new controller using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            idle_chance: config.idle_chance,
            idle_ticks: config.idle_ticks,
            vision: config.vision,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits one decision per living adversary for every `TimeAdvanced` event.
    ///
    /// Adversaries stand down entirely once the player is dead.
    pub fn handle(&mut self, events: &[Event], entities: &EntityView, out: &mut Vec<Command>) {
        for event in events {
            if matches!(event, Event::TimeAdvanced { .. }) {
                self.decide(entities, out);
            }
        }
    }

    fn decide(&mut self, entities: &EntityView, out: &mut Vec<Command>) {
        let Some(player) = entities.player().filter(|player| player.alive) else {
            return;
        };

        for adversary in entities.adversaries().filter(|adversary| adversary.alive) {
            let mut idling = adversary.idling;
            if !idling && self.rolls_idle() {
                out.push(Command::BeginIdle {
                    entity: adversary.id,
                    ticks: self.idle_ticks,
                });
                idling = true;
            }

            let probe = vision_probe(&adversary.body, adversary.facing, self.vision);
            let command = if probe.overlaps(&player.body) {
                Command::Engage {
                    entity: adversary.id,
                }
            } else if !idling {
                Command::Patrol {
                    entity: adversary.id,
                }
            } else {
                Command::Rest {
                    entity: adversary.id,
                }
            };
            out.push(command);
        }
    }

    fn rolls_idle(&mut self) -> bool {
        self.idle_chance > 0 && self.rng.gen_range(1..=self.idle_chance) == 1
    }
}
