//! Translates simulation snapshots into renderable scenes.

use glam::Vec2;
use platformer_core::Rect;
use platformer_rendering::{
    EntityPresentation, HudPresentation, PickupPresentation, ProjectilePresentation, Scene,
    SceneStatus, TileKind, TilePresentation,
};
use platformer_system_simulation::{Simulation, Status};
use platformer_world::query;

fn origin(rect: &Rect) -> Vec2 {
    Vec2::new(rect.left(), rect.top())
}

fn extent(rect: &Rect) -> Vec2 {
    Vec2::new(rect.width(), rect.height())
}

fn scene_status(status: Status) -> SceneStatus {
    match status {
        Status::Playing => SceneStatus::Playing,
        Status::Completed => SceneStatus::Completed,
        Status::Defeated => SceneStatus::Defeated,
    }
}

/// Rebuilds every drawable of `scene` from the current simulation state.
pub(crate) fn populate(scene: &mut Scene, simulation: &Simulation) {
    let world = simulation.world();
    scene.clear();

    let tiles = query::tile_world(world);
    let layers = [
        (TileKind::Decoration, tiles.decorations()),
        (TileKind::Obstacle, tiles.obstacles()),
        (TileKind::Hazard, tiles.hazards()),
        (TileKind::Exit, tiles.exits()),
    ];
    for (kind, rects) in layers {
        for rect in rects {
            let (origin, size) = (origin(rect), extent(rect));
            if scene.is_visible(origin, size) {
                scene.tiles.push(TilePresentation::new(origin, size, kind));
            }
        }
    }

    for pickup in query::pickups(world) {
        scene.pickups.push(PickupPresentation::new(
            origin(&pickup.body),
            extent(&pickup.body),
            pickup.kind,
        ));
    }

    let entities = query::entity_view(world);
    for entity in entities.iter() {
        scene.entities.push(EntityPresentation {
            origin: origin(&entity.body),
            size: extent(&entity.body),
            controller: entity.controller,
            facing: entity.facing,
            action: entity.action,
            frame: entity.frame,
            health: entity.health,
            max_health: entity.max_health,
        });
    }

    for projectile in query::projectiles(world) {
        scene.projectiles.push(ProjectilePresentation::new(
            origin(&projectile.body),
            extent(&projectile.body),
        ));
    }

    scene.hud = match entities.player() {
        Some(player) => HudPresentation {
            health: player.health,
            max_health: player.max_health,
            coins: player.coins,
            status: scene_status(simulation.status()),
        },
        None => HudPresentation {
            status: scene_status(simulation.status()),
            ..HudPresentation::default()
        },
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_core::{CharacterCatalog, CharacterProfile, Controller, ItemKind, Size, Tuning};
    use platformer_rendering::ViewportPresentation;
    use platformer_system_simulation::Config;
    use platformer_world::{LevelGrid, World};

    fn simulation(rows: &[&[i32]]) -> Simulation {
        let tuning = Tuning {
            viewport_width: 120.0,
            viewport_height: 80.0,
            tile_size: 40.0,
            ..Tuning::default()
        };
        let profile = CharacterProfile::new(Size::new(20.0, 36.0), [4, 6, 1, 5]);
        let catalog = CharacterCatalog::new(
            profile,
            profile,
            Size::new(8.0, 4.0),
            Size::new(16.0, 16.0),
            Size::new(16.0, 16.0),
        )
        .expect("valid catalog");
        let grid = LevelGrid::from_rows(rows).expect("valid rows");
        let world = World::new(&grid, tuning, catalog).expect("valid level");
        Simulation::new(world, Config::new(1))
    }

    fn scene() -> Scene {
        Scene::new(ViewportPresentation::new(120.0, 80.0).expect("valid viewport"))
    }

    #[test]
    fn populate_only_keeps_tiles_inside_viewport() {
        let simulation = simulation(&[&[13, -1, 16, -1, 17], &[0, 0, 0, 9, 0]]);
        let mut scene = scene();

        populate(&mut scene, &simulation);

        assert_eq!(
            scene
                .tiles
                .iter()
                .filter(|tile| tile.kind == TileKind::Obstacle)
                .count(),
            3
        );
        assert!(scene.tiles.iter().all(|tile| tile.kind != TileKind::Exit));
        assert_eq!(scene.pickups.len(), 1);
        assert_eq!(scene.pickups[0].kind, ItemKind::Coin);
        assert_eq!(scene.entities.len(), 1);
        assert_eq!(scene.entities[0].controller, Controller::Player);
        assert_eq!(scene.entities[0].size, Vec2::new(20.0, 36.0));
    }

    #[test]
    fn hud_reflects_player_statistics() {
        let simulation = simulation(&[&[13, 14], &[0, 0]]);
        let mut scene = scene();

        populate(&mut scene, &simulation);

        assert_eq!(
            scene.hud,
            HudPresentation {
                health: 100,
                max_health: 100,
                coins: 0,
                status: SceneStatus::Playing,
            }
        );
        assert_eq!(scene.entities.len(), 2);
    }

    #[test]
    fn repeated_population_does_not_duplicate_drawables() {
        let simulation = simulation(&[&[13, 15], &[0, 0]]);
        let mut scene = scene();

        populate(&mut scene, &simulation);
        populate(&mut scene, &simulation);

        assert_eq!(scene.tiles.len(), 2);
        assert_eq!(scene.pickups.len(), 1);
    }
}
