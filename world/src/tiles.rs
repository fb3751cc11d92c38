//! Static level geometry derived from the tile grid.

use platformer_core::{ItemKind, Rect, Size, TileCategory};

use crate::level::{LevelError, LevelGrid};

/// Grid cell holding a spawn marker that was consumed at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPoint {
    column: u32,
    row: u32,
}

impl SpawnPoint {
    /// Creates a new spawn point at the provided cell.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Rectangle of the provided size resting on the floor of the marker's tile,
    /// horizontally centred.
    #[must_use]
    pub fn place(&self, tile_size: f32, size: Size) -> Rect {
        let mid_x = (self.column as f32 + 0.5) * tile_size;
        let bottom = (self.row as f32 + 1.0) * tile_size;
        Rect::from_midbottom(mid_x, bottom, size)
    }
}

/// Geometry and spawn markers produced by loading a level grid.
#[derive(Clone, Debug)]
pub struct LevelLayout {
    /// Collidable, lethal, and cosmetic tile geometry.
    pub tiles: TileWorld,
    /// Marker for the player's start position.
    pub player: SpawnPoint,
    /// Adversary markers in row-major order.
    pub adversaries: Vec<SpawnPoint>,
    /// Item markers in row-major order.
    pub items: Vec<(ItemKind, SpawnPoint)>,
}

/// Categorised tile geometry of a loaded level.
#[derive(Clone, Debug, PartialEq)]
pub struct TileWorld {
    columns: u32,
    rows: u32,
    tile_size: f32,
    obstacles: Vec<Rect>,
    hazards: Vec<Rect>,
    decorations: Vec<Rect>,
    exits: Vec<Rect>,
}

impl TileWorld {
    /// Converts a raw grid into categorised geometry and spawn markers.
    pub fn load(grid: &LevelGrid, tile_size: f32) -> Result<LevelLayout, LevelError> {
        let mut tiles = Self {
            columns: grid.columns(),
            rows: grid.rows(),
            tile_size,
            obstacles: Vec::new(),
            hazards: Vec::new(),
            decorations: Vec::new(),
            exits: Vec::new(),
        };
        let mut player = None;
        let mut adversaries = Vec::new();
        let mut items = Vec::new();

        for (column, row, code) in grid.iter() {
            let Some(category) = code.category() else {
                return Err(LevelError::UnknownTileCode {
                    row,
                    column,
                    code: code.get(),
                });
            };
            let rect = Rect::new(
                column as f32 * tile_size,
                row as f32 * tile_size,
                tile_size,
                tile_size,
            );
            let spawn = SpawnPoint::new(column, row);

            match category {
                TileCategory::Empty => {}
                TileCategory::Obstacle => tiles.obstacles.push(rect),
                TileCategory::Hazard => tiles.hazards.push(rect),
                TileCategory::Decoration => tiles.decorations.push(rect),
                TileCategory::Exit => tiles.exits.push(rect),
                TileCategory::PlayerSpawn => {
                    if player.is_some() {
                        return Err(LevelError::DuplicatePlayerSpawn { row, column });
                    }
                    player = Some(spawn);
                }
                TileCategory::AdversarySpawn => adversaries.push(spawn),
                TileCategory::Pickup(kind) => items.push((kind, spawn)),
            }
        }

        let player = player.ok_or(LevelError::MissingPlayerSpawn)?;

        Ok(LevelLayout {
            tiles,
            player,
            adversaries,
            items,
        })
    }

    /// Solid rectangles that block movement and projectiles.
    #[must_use]
    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    /// Rectangles that kill the player on contact.
    #[must_use]
    pub fn hazards(&self) -> &[Rect] {
        &self.hazards
    }

    /// Cosmetic rectangles without collision.
    #[must_use]
    pub fn decorations(&self) -> &[Rect] {
        &self.decorations
    }

    /// Rectangles that complete the level when the player touches them.
    #[must_use]
    pub fn exits(&self) -> &[Rect] {
        &self.exits
    }

    /// Side length of a tile.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Number of tile columns in the level.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows in the level.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total scrollable width of the level.
    #[must_use]
    pub fn level_length(&self) -> f32 {
        self.columns as f32 * self.tile_size
    }

    /// Total height of the level.
    #[must_use]
    pub fn level_height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Re-positions every tile horizontally by the provided delta.
    pub(crate) fn shift(&mut self, dx: f32) {
        for rect in self
            .obstacles
            .iter_mut()
            .chain(self.hazards.iter_mut())
            .chain(self.decorations.iter_mut())
            .chain(self.exits.iter_mut())
        {
            *rect = rect.translated(dx, 0.0);
        }
    }
}
