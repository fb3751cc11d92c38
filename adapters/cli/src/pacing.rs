//! Converts variable frame times into fixed simulation ticks.

use std::time::Duration;

use platformer_core::Intent;

/// Ticks beyond this count in a single frame are dropped.
const MAX_TICKS_PER_FRAME: u32 = 8;

/// Accumulates real frame time and releases it in whole ticks.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TickPacer {
    tick: Duration,
    accumulated: Duration,
}

impl TickPacer {
    pub(crate) fn new(tick: Duration) -> Self {
        Self {
            tick,
            accumulated: Duration::ZERO,
        }
    }

    /// Adds `frame` to the accumulator and returns how many ticks are due.
    pub(crate) fn advance(&mut self, frame: Duration) -> u32 {
        if self.tick.is_zero() {
            return 0;
        }

        self.accumulated += frame;
        let mut due = 0;
        while self.accumulated >= self.tick {
            self.accumulated -= self.tick;
            due += 1;
        }

        if due > MAX_TICKS_PER_FRAME {
            log::debug!(
                "dropping {} ticks after a slow frame",
                due - MAX_TICKS_PER_FRAME
            );
            due = MAX_TICKS_PER_FRAME;
        }
        due
    }
}

/// Holds edge-triggered requests until a tick consumes them.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct InputLatch {
    jump: bool,
    fire: bool,
}

impl InputLatch {
    /// Records the edge-triggered flags observed on a frame.
    pub(crate) fn observe(&mut self, intent: Intent) {
        self.jump |= intent.jump;
        self.fire |= intent.fire;
    }

    /// Returns the intent for the next tick, clearing consumed edges.
    pub(crate) fn take(&mut self, held: Intent) -> Intent {
        let intent = Intent {
            move_left: held.move_left,
            move_right: held.move_right,
            jump: self.jump,
            fire: self.fire,
        };
        *self = Self::default();
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacer_carries_remainder_between_frames() {
        let mut pacer = TickPacer::new(Duration::from_millis(10));

        assert_eq!(pacer.advance(Duration::from_millis(25)), 2);
        assert_eq!(pacer.advance(Duration::from_millis(4)), 0);
        assert_eq!(pacer.advance(Duration::from_millis(1)), 1);
    }

    #[test]
    fn pacer_caps_catch_up_after_stall() {
        let mut pacer = TickPacer::new(Duration::from_millis(10));

        assert_eq!(pacer.advance(Duration::from_secs(2)), MAX_TICKS_PER_FRAME);
        assert_eq!(pacer.advance(Duration::ZERO), 0);
    }

    #[test]
    fn zero_tick_duration_never_runs() {
        let mut pacer = TickPacer::new(Duration::ZERO);

        assert_eq!(pacer.advance(Duration::from_secs(1)), 0);
    }

    #[test]
    fn edges_are_consumed_by_the_first_tick_only() {
        let mut latch = InputLatch::default();
        let held = Intent {
            move_right: true,
            jump: true,
            fire: true,
            ..Intent::default()
        };
        latch.observe(held);

        let first = latch.take(held);
        let second = latch.take(held);

        assert!(first.jump && first.fire && first.move_right);
        assert!(!second.jump && !second.fire && second.move_right);
    }

    #[test]
    fn edges_survive_frames_without_ticks() {
        let mut latch = InputLatch::default();
        latch.observe(Intent {
            jump: true,
            ..Intent::default()
        });
        latch.observe(Intent::default());

        assert!(latch.take(Intent::default()).jump);
    }
}
