use std::time::Duration;

use platformer_core::{
    ActionState, CharacterCatalog, CharacterProfile, Command, Controller, EntityId,
    EntitySnapshot, EntityView, Event, Facing, Rect, Size, Tuning,
};
use platformer_system_adversary::{AdversaryController, Config};
use platformer_world::{self as world, query, LevelGrid, World};

const NEVER_IDLE: u32 = 0;
const VISION: Size = Size::new(150.0, 20.0);

fn tick() -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(13),
        tick: 1,
    }
}

fn snapshot(id: u32, controller: Controller, x: f32, facing: Facing) -> EntitySnapshot {
    EntitySnapshot {
        id: EntityId::new(id),
        controller,
        body: Rect::new(x, 100.0, 40.0, 80.0),
        facing,
        action: ActionState::Idle,
        frame: 0,
        health: 100,
        max_health: 100,
        alive: true,
        in_air: false,
        cooldown: 0,
        idling: false,
        coins: 0,
    }
}

fn decide(controller: &mut AdversaryController, snapshots: Vec<EntitySnapshot>) -> Vec<Command> {
    let mut commands = Vec::new();
    controller.handle(
        &[tick()],
        &EntityView::from_snapshots(snapshots),
        &mut commands,
    );
    commands
}

#[test]
fn adversary_engages_player_inside_vision_probe() {
    let mut controller = AdversaryController::new(Config::new(NEVER_IDLE, 50, VISION, 7));

    let commands = decide(
        &mut controller,
        vec![
            snapshot(0, Controller::Player, 200.0, Facing::Left),
            snapshot(1, Controller::Ai, 100.0, Facing::Right),
        ],
    );

    assert_eq!(
        commands,
        vec![Command::Engage {
            entity: EntityId::new(1)
        }]
    );
}

#[test]
fn adversary_facing_away_keeps_patrolling() {
    let mut controller = AdversaryController::new(Config::new(NEVER_IDLE, 50, VISION, 7));

    let commands = decide(
        &mut controller,
        vec![
            snapshot(0, Controller::Player, 200.0, Facing::Left),
            snapshot(1, Controller::Ai, 100.0, Facing::Left),
        ],
    );

    assert_eq!(
        commands,
        vec![Command::Patrol {
            entity: EntityId::new(1)
        }]
    );
}

#[test]
fn idling_adversary_rests_unless_it_sees_the_player() {
    let mut controller = AdversaryController::new(Config::new(NEVER_IDLE, 50, VISION, 7));
    let mut resting = snapshot(1, Controller::Ai, 100.0, Facing::Left);
    resting.idling = true;
    let mut watching = snapshot(2, Controller::Ai, 100.0, Facing::Right);
    watching.idling = true;

    let commands = decide(
        &mut controller,
        vec![
            snapshot(0, Controller::Player, 200.0, Facing::Left),
            resting,
            watching,
        ],
    );

    assert_eq!(
        commands,
        vec![
            Command::Rest {
                entity: EntityId::new(1)
            },
            Command::Engage {
                entity: EntityId::new(2)
            },
        ]
    );
}

#[test]
fn certain_idle_roll_begins_pause_and_rests_immediately() {
    let mut controller = AdversaryController::new(Config::new(1, 50, VISION, 7));

    let commands = decide(
        &mut controller,
        vec![
            snapshot(0, Controller::Player, 900.0, Facing::Left),
            snapshot(1, Controller::Ai, 100.0, Facing::Right),
        ],
    );

    assert_eq!(
        commands,
        vec![
            Command::BeginIdle {
                entity: EntityId::new(1),
                ticks: 50,
            },
            Command::Rest {
                entity: EntityId::new(1)
            },
        ]
    );
}

#[test]
fn adversaries_stand_down_when_player_is_dead() {
    let mut controller = AdversaryController::new(Config::new(NEVER_IDLE, 50, VISION, 7));
    let mut player = snapshot(0, Controller::Player, 200.0, Facing::Left);
    player.alive = false;

    let commands = decide(
        &mut controller,
        vec![player, snapshot(1, Controller::Ai, 100.0, Facing::Right)],
    );

    assert!(commands.is_empty());
}

#[test]
fn dead_adversaries_are_skipped() {
    let mut controller = AdversaryController::new(Config::new(NEVER_IDLE, 50, VISION, 7));
    let mut fallen = snapshot(1, Controller::Ai, 100.0, Facing::Right);
    fallen.alive = false;

    let commands = decide(
        &mut controller,
        vec![
            snapshot(0, Controller::Player, 900.0, Facing::Left),
            fallen,
            snapshot(2, Controller::Ai, 500.0, Facing::Right),
        ],
    );

    assert_eq!(
        commands,
        vec![Command::Patrol {
            entity: EntityId::new(2)
        }]
    );
}

#[test]
fn no_decisions_without_time_advancing() {
    let mut controller = AdversaryController::new(Config::new(1, 50, VISION, 7));
    let view = EntityView::from_snapshots(vec![
        snapshot(0, Controller::Player, 900.0, Facing::Left),
        snapshot(1, Controller::Ai, 100.0, Facing::Right),
    ]);

    let mut commands = Vec::new();
    controller.handle(&[Event::LevelCompleted], &view, &mut commands);

    assert!(commands.is_empty());
}

#[test]
fn idle_rolls_are_reproducible_for_a_seed() {
    let roll = |seed: u64| {
        let mut controller = AdversaryController::new(Config::new(4, 3, VISION, seed));
        let mut decisions = Vec::new();
        for _ in 0..200 {
            decisions.extend(decide(
                &mut controller,
                vec![
                    snapshot(0, Controller::Player, 900.0, Facing::Left),
                    snapshot(1, Controller::Ai, 100.0, Facing::Right),
                ],
            ));
        }
        decisions
    };

    let first = roll(0x5eed);
    assert_eq!(first, roll(0x5eed));
    assert!(first
        .iter()
        .any(|command| matches!(command, Command::BeginIdle { .. })));
    assert!(first
        .iter()
        .any(|command| matches!(command, Command::Patrol { .. })));
}

#[test]
fn adversary_patrols_a_loaded_level_until_it_spots_the_player() {
    let tuning = Tuning {
        viewport_width: 400.0,
        tile_size: 10.0,
        vision_width: 30.0,
        vision_height: 4.0,
        ..Tuning::default()
    };
    let profile = CharacterProfile::new(Size::new(6.0, 8.0), [2, 3, 1, 2]);
    let catalog = CharacterCatalog::new(
        profile,
        profile,
        Size::new(2.0, 2.0),
        Size::new(4.0, 4.0),
        Size::new(4.0, 4.0),
    )
    .expect("valid catalog");
    let mut row = [-1; 12];
    row[0] = 14;
    row[4] = 13;
    let grid = LevelGrid::from_rows(&[&row, &[0; 12]]).expect("valid rows");
    let mut world = World::new(&grid, tuning.clone(), catalog).expect("valid level");

    let mut controller = AdversaryController::new(Config::new(
        NEVER_IDLE,
        tuning.idle_ticks,
        tuning.vision_size(),
        1,
    ));
    let mut engaged_at = None;
    for step in 0..40 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(13),
            },
            &mut events,
        );

        let mut commands = Vec::new();
        controller.handle(&events, &query::entity_view(&world), &mut commands);
        if commands
            .iter()
            .any(|command| matches!(command, Command::Engage { .. }))
        {
            engaged_at = Some(step);
            break;
        }
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    assert!(engaged_at.is_some(), "adversary should reach the player");
    let adversary = query::entity_view(&world)
        .get(EntityId::new(1))
        .cloned()
        .expect("adversary exists");
    assert_eq!(adversary.facing, Facing::Right);
    assert!(adversary.body.left() > 2.0);
}
