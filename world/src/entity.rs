//! Entity state shared by the player and adversaries, including the action
//! state machine and animation clock.

use std::time::Duration;

use platformer_core::{
    ActionState, CharacterProfile, Controller, EntityId, EntitySnapshot, Facing, Rect,
};

/// Result of applying damage to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DamageOutcome {
    /// Health remaining, clamped at zero.
    pub(crate) health: i32,
    /// Indicates that this hit moved the entity into the death state.
    pub(crate) died: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) controller: Controller,
    pub(crate) body: Rect,
    pub(crate) facing: Facing,
    pub(crate) speed: f32,
    pub(crate) velocity_y: f32,
    pub(crate) in_air: bool,
    pub(crate) jump_requested: bool,
    health: i32,
    max_health: i32,
    alive: bool,
    action: ActionState,
    frame: u32,
    frame_started: Duration,
    frames: CharacterProfile,
    cooldown: u32,
    pub(crate) coins: u32,
    pub(crate) patrol_counter: u32,
    pub(crate) idling: bool,
    pub(crate) idle_timer: u32,
}

impl Entity {
    pub(crate) fn spawn(
        id: EntityId,
        controller: Controller,
        body: Rect,
        speed: f32,
        max_health: i32,
        frames: CharacterProfile,
    ) -> Self {
        Self {
            id,
            controller,
            body,
            facing: Facing::Right,
            speed,
            velocity_y: 0.0,
            in_air: false,
            jump_requested: false,
            health: max_health,
            max_health,
            alive: true,
            action: ActionState::Idle,
            frame: 0,
            frame_started: Duration::ZERO,
            frames,
            cooldown: 0,
            coins: 0,
            patrol_counter: 0,
            idling: false,
            idle_timer: 0,
        }
    }

    pub(crate) const fn alive(&self) -> bool {
        self.alive
    }

    pub(crate) const fn is_ai(&self) -> bool {
        matches!(self.controller, Controller::Ai)
    }

    /// Switches to a new action state, restarting its animation.
    ///
    /// Requests for the current state are ignored so running animations keep
    /// playing. Once dead, only the death state is accepted.
    pub(crate) fn set_action(&mut self, action: ActionState, now: Duration) {
        if action == self.action {
            return;
        }
        if !self.alive && action != ActionState::Death {
            return;
        }

        self.action = action;
        self.frame = 0;
        self.frame_started = now;
    }

    /// Advances the animation once more than `frame_duration` elapsed since the
    /// last advance. Death holds its last frame; every other state loops.
    pub(crate) fn advance_animation(&mut self, now: Duration, frame_duration: Duration) {
        if now.saturating_sub(self.frame_started) <= frame_duration {
            return;
        }

        self.frame_started = now;
        let count = self.frames.frame_count(self.action).max(1);
        let next = self.frame.saturating_add(1);
        self.frame = if next < count {
            next
        } else if self.action == ActionState::Death {
            count - 1
        } else {
            0
        };
    }

    /// Moves the entity into the death state when its health is exhausted.
    ///
    /// Returns `true` only on the tick the transition happens.
    pub(crate) fn check_alive(&mut self, now: Duration) -> bool {
        if self.alive && self.health <= 0 {
            self.die(now);
            return true;
        }
        false
    }

    /// Kills the entity regardless of its health. Returns `false` if it was
    /// already dead.
    pub(crate) fn kill(&mut self, now: Duration) -> bool {
        if !self.alive {
            return false;
        }
        self.die(now);
        true
    }

    fn die(&mut self, now: Duration) {
        self.alive = false;
        self.health = 0;
        self.speed = 0.0;
        self.set_action(ActionState::Death, now);
    }

    pub(crate) fn take_damage(&mut self, amount: i32, now: Duration) -> DamageOutcome {
        self.health = self.health.saturating_sub(amount);
        let died = self.check_alive(now);
        DamageOutcome {
            health: self.health.max(0),
            died,
        }
    }

    /// Restores health up to the maximum. Returns the amount actually restored.
    pub(crate) fn heal(&mut self, amount: i32) -> i32 {
        if self.health >= self.max_health {
            return 0;
        }
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    /// Arms a shot when the weapon is reloaded.
    ///
    /// Returns `true` when a projectile should be spawned; the cooldown is then
    /// set to `reload_ticks`.
    pub(crate) fn try_shoot(&mut self, reload_ticks: u32) -> bool {
        if !self.alive || self.cooldown > 0 {
            return false;
        }
        self.cooldown = reload_ticks;
        true
    }

    pub(crate) fn tick_cooldown(&mut self) {
        if self.alive {
            self.cooldown = self.cooldown.saturating_sub(1);
        }
    }

    /// Point on the leading edge where projectiles spawn.
    pub(crate) fn muzzle(&self, margin: f32) -> (f32, f32) {
        (
            self.body.center_x() + self.body.width() * margin * self.facing.sign(),
            self.body.center_y(),
        )
    }

    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            controller: self.controller,
            body: self.body,
            facing: self.facing,
            action: self.action,
            frame: self.frame,
            health: self.health.max(0),
            max_health: self.max_health,
            alive: self.alive,
            in_air: self.in_air,
            cooldown: self.cooldown,
            idling: self.idling,
            coins: self.coins,
        }
    }
}
