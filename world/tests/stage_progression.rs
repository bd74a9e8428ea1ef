//! Full-stage scenario: collect every coin, step onto the goal, advance.

use std::collections::VecDeque;
use std::time::Duration;

use maze_arcade_core::{CellCoord, Command, Direction, Event, StageNumber, ViewportSize};
use maze_arcade_world::{self as world, query, World};

/// Shortest open-wall path between two cells, as a direction sequence.
fn bfs_path(world: &World, from: CellCoord, to: CellCoord) -> Vec<Direction> {
    let view = query::wall_view(world);
    let (columns, rows) = view.dimensions();
    let index = |cell: CellCoord| (cell.row() * columns + cell.column()) as usize;

    let mut previous: Vec<Option<(CellCoord, Direction)>> =
        vec![None; (columns * rows) as usize];
    let mut seen = vec![false; (columns * rows) as usize];
    let mut frontier = VecDeque::new();
    frontier.push_back(from);
    seen[index(from)] = true;

    while let Some(cell) = frontier.pop_front() {
        if cell == to {
            break;
        }
        for direction in view.open_directions(cell) {
            let neighbor = cell
                .neighbor(direction, columns, rows)
                .expect("open directions stay in bounds");
            if !seen[index(neighbor)] {
                seen[index(neighbor)] = true;
                previous[index(neighbor)] = Some((cell, direction));
                frontier.push_back(neighbor);
            }
        }
    }

    let mut path = Vec::new();
    let mut cursor = to;
    while cursor != from {
        let (parent, direction) =
            previous[index(cursor)].expect("perfect maze connects every cell pair");
        path.push(direction);
        cursor = parent;
    }
    path.reverse();
    path
}

fn walk_to(world: &mut World, destination: CellCoord, events: &mut Vec<Event>) {
    let from = query::player(world).cell;
    for direction in bfs_path(world, from, destination) {
        world::apply(world, Command::MovePlayer { direction }, events);
    }
    assert_eq!(query::player(world).cell, destination);
}

#[test]
fn collecting_all_coins_and_reaching_the_goal_advances_the_stage() {
    let mut world = World::with_seed(0x5ce2_a110);
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::ConfigureBoard {
            columns: 20,
            rows: 20,
            viewport: ViewportSize::new(960.0, 960.0),
        },
        &mut events,
    );
    assert_eq!(query::coins_remaining(&world), 10);
    assert_eq!(query::goal_cell(&world), CellCoord::new(19, 19));

    // Let four wall-clock seconds elapse so the recorded score is non-zero.
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(4),
        },
        &mut events,
    );

    // Visit every coin; perfect-maze connectivity guarantees a path exists.
    while let Some(coin) = query::coins(&world).first().copied() {
        let mut walk_events = Vec::new();
        walk_to(&mut world, coin, &mut walk_events);
        assert!(
            walk_events
                .iter()
                .any(|event| matches!(event, Event::CoinCollected { .. })),
            "walking onto a coin must collect it"
        );
    }
    assert_eq!(query::coins_remaining(&world), 0);

    let mut walk_events = Vec::new();
    let goal = query::goal_cell(&world);
    walk_to(&mut world, goal, &mut walk_events);

    let mut advance_events = Vec::new();
    world::apply(&mut world, Command::AdvanceStage, &mut advance_events);

    assert!(advance_events.contains(&Event::StageCompleted {
        stage: StageNumber::FIRST,
        score_seconds: 4,
    }));
    let stage = query::stage(&world);
    assert_eq!(stage.number, StageNumber::new(2));
    assert_eq!(stage.columns, 25);
    assert_eq!(stage.rows, 25);
    assert_eq!(stage.last_score, Some(4));
    assert_eq!(query::player(&world).cell, CellCoord::new(0, 0));
    assert_eq!(query::goal_cell(&world), CellCoord::new(24, 24));
    assert_eq!(query::coins_remaining(&world), 10);
    assert_eq!(query::enemy_view(&world).into_vec().len(), 12);
    assert!(query::bullet_view(&world).into_vec().is_empty());
    assert!(query::block_view(&world).into_vec().is_empty());
}
