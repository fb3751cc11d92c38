use platformer_core::{
    ActionState, CharacterCatalog, CharacterProfile, Controller, DeathCause, EntityId, Event,
    Intent, ItemKind, Size, Tuning,
};
use platformer_system_simulation::{Config, Simulation, Status};
use platformer_world::{query, LevelGrid, World};

fn tuning() -> Tuning {
    Tuning {
        viewport_width: 800.0,
        tile_size: 40.0,
        vision_width: 100.0,
        vision_height: 10.0,
        scroll_threshold: 50.0,
        idle_chance: 0,
        ..Tuning::default()
    }
}

fn simulation(rows: &[&[i32]], tuning: Tuning) -> Simulation {
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
    Simulation::new(world, Config::new(0x5eed))
}

fn walk_right() -> Intent {
    Intent {
        move_right: true,
        ..Intent::default()
    }
}

fn run_until(
    simulation: &mut Simulation,
    intent: Intent,
    max_steps: usize,
    mut predicate: impl FnMut(&Event) -> bool,
) -> Option<usize> {
    (0..max_steps).find(|_| simulation.step(intent).events().iter().any(&mut predicate))
}

#[test]
fn walking_into_exit_completes_level() {
    let mut simulation = simulation(&[&[13, -1, -1, 17], &[0, 0, 0, 0]], tuning());

    let completed = run_until(&mut simulation, walk_right(), 60, |event| {
        matches!(event, Event::LevelCompleted)
    });

    assert!(completed.is_some(), "player should reach the exit");
    assert_eq!(simulation.status(), Status::Completed);
}

#[test]
fn completed_level_keeps_ticking_and_stays_completed() {
    let mut simulation = simulation(&[&[13, 17], &[0, 0]], tuning());
    let _ = run_until(&mut simulation, walk_right(), 60, |event| {
        matches!(event, Event::LevelCompleted)
    });
    assert_eq!(simulation.status(), Status::Completed);

    let ticks = query::tick_index(simulation.world());
    let report = simulation.step(walk_right());

    assert!(!report.is_empty());
    assert_eq!(query::tick_index(simulation.world()), ticks + 1);
    assert_eq!(simulation.status(), Status::Completed);
}

#[test]
fn defeated_player_plays_death_animation_to_its_last_frame() {
    let mut simulation = simulation(&[&[13, -1, -1], &[0, 9, 0], &[0, 0, 0]], tuning());
    let died = run_until(&mut simulation, walk_right(), 30, |event| {
        matches!(event, Event::EntityDied { .. })
    });
    assert!(died.is_some(), "player should drown");
    let ticks = query::tick_index(simulation.world());

    for _ in 0..200 {
        let _ = simulation.step(walk_right());
    }

    let world = simulation.world();
    let player = query::player(world).expect("player");
    let last_frame = query::catalog(world)
        .profile(Controller::Player)
        .frame_count(ActionState::Death)
        - 1;
    assert_eq!(query::tick_index(world), ticks + 200);
    assert_eq!(player.action, ActionState::Death);
    assert_eq!(player.frame, last_frame);
    assert_eq!(simulation.status(), Status::Defeated);
}

#[test]
fn falling_into_water_defeats_player() {
    let mut simulation = simulation(&[&[13, -1, -1], &[0, 9, 0], &[0, 0, 0]], tuning());

    let died = run_until(&mut simulation, walk_right(), 30, |event| {
        *event
            == Event::EntityDied {
                entity: EntityId::new(0),
                cause: DeathCause::Hazard,
            }
    });

    assert!(died.is_some(), "player should drown");
    assert_eq!(simulation.status(), Status::Defeated);
    let player = query::player(simulation.world()).expect("player");
    assert_eq!(player.health, 0);
    assert!(!player.alive);
}

#[test]
fn coin_is_collected_exactly_once_while_walking_over_it() {
    let mut simulation = simulation(&[&[13, 16, -1, -1], &[0, 0, 0, 0]], tuning());

    let mut collected = 0;
    for _ in 0..20 {
        collected += simulation
            .step(walk_right())
            .events()
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::PickupCollected {
                        kind: ItemKind::Coin,
                        ..
                    }
                )
            })
            .count();
    }

    assert_eq!(collected, 1);
    assert_eq!(
        query::player(simulation.world()).map(|player| player.coins),
        Some(1)
    );
}

#[test]
fn adversary_patrols_into_view_and_shoots_player() {
    let mut simulation = simulation(
        &[&[14, -1, -1, 13, -1, -1], &[0, 0, 0, 0, 0, 0]],
        tuning(),
    );

    let hit = run_until(&mut simulation, Intent::default(), 100, |event| {
        matches!(
            event,
            Event::EntityDamaged {
                entity,
                health: 90,
                ..
            } if *entity == EntityId::new(0)
        )
    });

    assert!(hit.is_some(), "adversary should land a shot");
    assert_eq!(simulation.status(), Status::Playing);
    let adversary = query::entity_view(simulation.world())
        .get(EntityId::new(1))
        .cloned()
        .expect("adversary exists");
    assert!(adversary.cooldown > 0);
}

#[test]
fn camera_scrolls_long_level_and_holds_player_in_band() {
    let mut top = vec![-1; 40];
    top[0] = 13;
    let floor = vec![0; 40];
    let mut simulation = simulation(
        &[&top[..], &floor[..]],
        Tuning {
            viewport_width: 200.0,
            ..tuning()
        },
    );

    for _ in 0..60 {
        let _ = simulation.step(walk_right());
    }

    let world = simulation.world();
    let scroll = query::scroll(world);
    assert!(scroll.offset > 0.0, "viewport should have moved");
    assert!(scroll.offset <= scroll.max_offset);

    let player = query::player(world).expect("player");
    assert!(player.body.right() <= 154.0, "player stays inside the band");
    assert!(query::tile_world(world).obstacles()[0].left() < 0.0);
}
