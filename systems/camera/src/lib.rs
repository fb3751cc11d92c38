#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Camera system that keeps the player inside the scroll band.

use platformer_core::{Command, Event, ScrollSnapshot};

/// Configuration parameters required to construct the camera system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    threshold: f32,
    viewport_width: f32,
}

impl Config {
    /// Creates a new configuration from the distance to either viewport edge
    /// at which scrolling engages and the viewport width.
    #[must_use]
    pub const fn new(threshold: f32, viewport_width: f32) -> Self {
        Self {
            threshold,
            viewport_width,
        }
    }
}

/// Pure system that converts player movement near the viewport edges into
/// scroll commands.
#[derive(Debug)]
pub struct CameraScroll {
    threshold: f32,
    viewport_width: f32,
}

impl CameraScroll {
    /// Creates a new camera system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            threshold: config.threshold,
            viewport_width: config.viewport_width,
        }
    }

    /// Emits a [`Command::Scroll`] for every `PlayerMoved` event that pushes
    /// the player into the scroll band while level remains in that direction.
    ///
    /// The offset never leaves `[0, max_offset]`; a move that would overshoot
    /// scrolls only the remaining distance.
    pub fn handle(&mut self, events: &[Event], scroll: ScrollSnapshot, out: &mut Vec<Command>) {
        let mut offset = scroll.offset;
        for event in events {
            let &Event::PlayerMoved { dx, body } = event else {
                continue;
            };

            let towards_right = dx > 0.0
                && body.right() > self.viewport_width - self.threshold
                && offset < scroll.max_offset;
            let towards_left = dx < 0.0 && body.left() < self.threshold && offset > 0.0;
            if !(towards_right || towards_left) {
                continue;
            }

            let target = (offset + dx).clamp(0.0, scroll.max_offset);
            let delta = offset - target;
            if delta != 0.0 {
                out.push(Command::Scroll { delta });
                offset = target;
            }
        }
    }
}
