//! Character and item dimensions supplied by the asset collaborator.

use thiserror::Error;

use crate::{ActionState, Controller, ItemKind};

/// Width and height of a bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    /// Creates a new size descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Errors raised while assembling the character catalog.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CatalogError {
    /// A character has no frames for an action it needs.
    #[error("no {action} frames found for the {character} character")]
    MissingFrames {
        /// Character type missing frames.
        character: &'static str,
        /// Name of the action without frames.
        action: &'static str,
    },
    /// A bounding box has a non-positive dimension.
    #[error("{subject} has a degenerate size ({width} x {height})")]
    DegenerateSize {
        /// Asset that carries the invalid size.
        subject: &'static str,
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

/// Frame counts and body size for a single character type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterProfile {
    body: Size,
    frames: [u32; 4],
}

impl CharacterProfile {
    /// Creates a profile from a body size and per-action frame counts in
    /// [`ActionState::ALL`] order.
    #[must_use]
    pub const fn new(body: Size, frames: [u32; 4]) -> Self {
        Self { body, frames }
    }

    /// Bounding box of the character.
    #[must_use]
    pub const fn body(&self) -> Size {
        self.body
    }

    /// Number of animation frames for the provided action.
    #[must_use]
    pub const fn frame_count(&self, action: ActionState) -> u32 {
        self.frames[action.index()]
    }

    fn validate(&self, controller: Controller) -> Result<(), CatalogError> {
        if self.body.is_degenerate() {
            return Err(CatalogError::DegenerateSize {
                subject: controller.name(),
                width: self.body.width(),
                height: self.body.height(),
            });
        }

        for action in ActionState::ALL {
            if self.frame_count(action) == 0 {
                return Err(CatalogError::MissingFrames {
                    character: controller.name(),
                    action: action.name(),
                });
            }
        }

        Ok(())
    }
}

/// Validated dimensions for every character, item, and projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterCatalog {
    player: CharacterProfile,
    adversary: CharacterProfile,
    projectile: Size,
    health_item: Size,
    coin_item: Size,
}

impl CharacterCatalog {
    /// Assembles a catalog, rejecting missing frames or degenerate sizes.
    pub fn new(
        player: CharacterProfile,
        adversary: CharacterProfile,
        projectile: Size,
        health_item: Size,
        coin_item: Size,
    ) -> Result<Self, CatalogError> {
        player.validate(Controller::Player)?;
        adversary.validate(Controller::Ai)?;
        for (subject, size) in [
            ("projectile", projectile),
            ("health item", health_item),
            ("coin item", coin_item),
        ] {
            if size.is_degenerate() {
                return Err(CatalogError::DegenerateSize {
                    subject,
                    width: size.width(),
                    height: size.height(),
                });
            }
        }

        Ok(Self {
            player,
            adversary,
            projectile,
            health_item,
            coin_item,
        })
    }

    /// Profile for the character driven by the provided controller.
    #[must_use]
    pub const fn profile(&self, controller: Controller) -> &CharacterProfile {
        match controller {
            Controller::Player => &self.player,
            Controller::Ai => &self.adversary,
        }
    }

    /// Size of a projectile.
    #[must_use]
    pub const fn projectile(&self) -> Size {
        self.projectile
    }

    /// Size of an item pickup.
    #[must_use]
    pub const fn item(&self, kind: ItemKind) -> Size {
        match kind {
            ItemKind::Health => self.health_item,
            ItemKind::Coin => self.coin_item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(frames: [u32; 4]) -> CharacterProfile {
        CharacterProfile::new(Size::new(30.0, 60.0), frames)
    }

    fn small() -> Size {
        Size::new(10.0, 10.0)
    }

    #[test]
    fn catalog_rejects_missing_death_frames() {
        let result = CharacterCatalog::new(
            profile([5, 6, 1, 8]),
            profile([5, 6, 1, 0]),
            small(),
            small(),
            small(),
        );

        assert_eq!(
            result,
            Err(CatalogError::MissingFrames {
                character: "adversary",
                action: "death",
            })
        );
    }

    #[test]
    fn catalog_rejects_degenerate_projectile() {
        let result = CharacterCatalog::new(
            profile([5, 6, 1, 8]),
            profile([5, 6, 1, 8]),
            Size::new(0.0, 4.0),
            small(),
            small(),
        );

        assert!(matches!(
            result,
            Err(CatalogError::DegenerateSize {
                subject: "projectile",
                ..
            })
        ));
    }

    #[test]
    fn profile_reports_frame_counts_per_action() {
        let profile = profile([5, 6, 1, 8]);
        assert_eq!(profile.frame_count(ActionState::Idle), 5);
        assert_eq!(profile.frame_count(ActionState::Death), 8);
    }
}
