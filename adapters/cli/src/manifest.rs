//! Character manifest describing animation frame counts and asset sizes.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use platformer_core::{CharacterCatalog, CharacterProfile, Size, Tuning};
use serde::Deserialize;

/// Frame counts per animation state for one character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FrameCounts {
    idle: u32,
    run: u32,
    jump: u32,
    death: u32,
}

/// Sprite dimensions and animation frames of a single character.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CharacterEntry {
    frame_width: f32,
    frame_height: f32,
    #[serde(default = "unit_scale")]
    scale: f32,
    frames: FrameCounts,
}

impl CharacterEntry {
    fn profile(&self) -> CharacterProfile {
        let FrameCounts {
            idle,
            run,
            jump,
            death,
        } = self.frames;
        CharacterProfile::new(
            Size::new(
                self.frame_width * self.scale,
                self.frame_height * self.scale,
            ),
            [idle, run, jump, death],
        )
    }
}

/// Dimensions of a non-animated asset.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SpriteEntry {
    width: f32,
    height: f32,
    #[serde(default = "unit_scale")]
    scale: f32,
}

impl SpriteEntry {
    fn size(&self) -> Size {
        Size::new(self.width * self.scale, self.height * self.scale)
    }
}

/// Item sprites placed on the tile floor.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ItemEntries {
    health: SpriteEntry,
    coin: SpriteEntry,
}

/// Contents of a character manifest file.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Manifest {
    player: CharacterEntry,
    adversary: CharacterEntry,
    projectile: SpriteEntry,
    items: ItemEntries,
}

impl Manifest {
    /// Validates the manifest and converts it into a character catalog.
    pub(crate) fn into_catalog(self) -> Result<CharacterCatalog> {
        let catalog = CharacterCatalog::new(
            self.player.profile(),
            self.adversary.profile(),
            self.projectile.size(),
            self.items.health.size(),
            self.items.coin.size(),
        )?;
        Ok(catalog)
    }
}

fn unit_scale() -> f32 {
    1.0
}

/// Reads and validates the character manifest at `path`.
pub(crate) fn load_catalog(path: &Path) -> Result<CharacterCatalog> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read character manifest {}", path.display()))?;
    let manifest: Manifest = toml::from_str(&text)
        .with_context(|| format!("failed to parse character manifest {}", path.display()))?;
    manifest
        .into_catalog()
        .with_context(|| format!("invalid character manifest {}", path.display()))
}

/// Reads tuning overrides from `path`, or returns the defaults when absent.
pub(crate) fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("failed to parse configuration {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_core::{ActionState, CatalogError, Controller, ItemKind};

    const MANIFEST: &str = r#"
[player]
frame_width = 15
frame_height = 20
scale = 2
frames = { idle = 5, run = 6, jump = 1, death = 8 }

[adversary]
frame_width = 16
frame_height = 20
scale = 2
frames = { idle = 5, run = 6, jump = 1, death = 8 }

[projectile]
width = 24
height = 6

[items.health]
width = 30
height = 30

[items.coin]
width = 20
height = 20
scale = 1.5
"#;

    #[test]
    fn manifest_scales_frames_into_body_sizes() {
        let manifest: Manifest = toml::from_str(MANIFEST).expect("valid manifest");
        let catalog = manifest.into_catalog().expect("valid catalog");

        let player = catalog.profile(Controller::Player);
        assert_eq!(player.body(), Size::new(30.0, 40.0));
        assert_eq!(player.frame_count(ActionState::Death), 8);
        assert_eq!(catalog.projectile(), Size::new(24.0, 6.0));
        assert_eq!(catalog.item(ItemKind::Coin), Size::new(30.0, 30.0));
    }

    #[test]
    fn manifest_without_death_frames_is_rejected() {
        let broken = MANIFEST.replacen("death = 8", "death = 0", 1);
        let manifest: Manifest = toml::from_str(&broken).expect("valid manifest syntax");
        let error = manifest.into_catalog().expect_err("missing frames");

        assert_eq!(
            error.downcast_ref::<CatalogError>(),
            Some(&CatalogError::MissingFrames {
                character: Controller::Player.name(),
                action: ActionState::Death.name(),
            })
        );
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let text = MANIFEST.replacen("scale = 1.5", "tint = 3", 1);

        assert!(toml::from_str::<Manifest>(&text).is_err());
    }

    #[test]
    fn missing_configuration_uses_defaults() {
        assert_eq!(load_tuning(None).expect("defaults"), Tuning::default());
    }
}
