use std::time::Duration;

use chain_reaction_core::{
    BoardSize, CellCoord, CellState, Command, Direction, Event, GameConfig, PlacementError,
    PlayerId, TurnPhase,
};
use chain_reaction_world::{self as world, query, GameSession};

const TICK: Duration = Duration::from_millis(40);

fn session(config: GameConfig) -> GameSession {
    GameSession::with_config(config).expect("valid config")
}

fn size(side: u32) -> BoardSize {
    BoardSize::new(side).expect("valid size")
}

fn place(session: &mut GameSession, player: PlayerId, column: u32, row: u32) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        session,
        Command::PlaceOrb {
            player,
            cell: CellCoord::new(column, row),
        },
        &mut events,
    );
    events
}

fn resolve(session: &mut GameSession) -> Vec<Event> {
    let mut events = Vec::new();
    let mut guard = 0;
    while query::phase(session) == TurnPhase::Resolving {
        world::apply(session, Command::Tick { dt: TICK }, &mut events);
        guard += 1;
        assert!(guard < 10_000, "cascade failed to settle");
    }
    events
}

fn occupied(owner: PlayerId, count: u32) -> CellState {
    CellState::Occupied { owner, count }
}

#[test]
fn corner_explosion_releases_right_and_down_projectiles() {
    let config = GameConfig::new(size(3), PlayerId::First).with_opening(
        CellCoord::new(0, 0),
        PlayerId::First,
        1,
    );
    let mut session = session(config);

    let events = place(&mut session, PlayerId::First, 0, 0);

    assert_eq!(
        events,
        vec![
            Event::OrbPlaced {
                player: PlayerId::First,
                cell: CellCoord::new(0, 0),
                spawned: 2,
            },
            Event::CellExploded {
                owner: PlayerId::First,
                cell: CellCoord::new(0, 0),
                projectiles: 2,
            },
        ]
    );
    let projectiles = query::projectile_snapshot(&session).into_vec();
    let directions: Vec<Direction> = projectiles.iter().map(|p| p.direction).collect();
    assert_eq!(directions, vec![Direction::Right, Direction::Down]);
    assert!(projectiles
        .iter()
        .all(|p| p.owner == PlayerId::First && p.origin == CellCoord::new(0, 0)));
    assert_eq!(query::cell(&session, CellCoord::new(0, 0)), CellState::Empty);
    assert_eq!(query::phase(&session), TurnPhase::Resolving);
}

#[test]
fn projectiles_report_fractional_positions_between_ticks() {
    let config = GameConfig::new(size(3), PlayerId::First).with_opening(
        CellCoord::new(0, 0),
        PlayerId::First,
        1,
    );
    let mut session = session(config);
    let _ = place(&mut session, PlayerId::First, 0, 0);
    let mut events = Vec::new();

    world::apply(&mut session, Command::Tick { dt: TICK }, &mut events);

    let projectiles = query::projectile_snapshot(&session).into_vec();
    assert_eq!(projectiles.len(), 2);
    let right = projectiles[0];
    assert!((right.progress - 0.2).abs() < 1e-6);
    assert!((right.position.column() - 0.2).abs() < 1e-6);
    assert!(right.position.row().abs() < 1e-6);
    let down = projectiles[1];
    assert!(down.position.column().abs() < 1e-6);
    assert!((down.position.row() - 0.2).abs() < 1e-6);
}

#[test]
fn chain_reaction_detonates_the_neighbour() {
    let config = GameConfig::new(size(3), PlayerId::First)
        .with_opening(CellCoord::new(0, 0), PlayerId::First, 1)
        .with_opening(CellCoord::new(1, 0), PlayerId::First, 2)
        .with_opening(CellCoord::new(2, 2), PlayerId::Second, 1);
    let mut session = session(config);

    let _ = place(&mut session, PlayerId::First, 0, 0);
    let events = resolve(&mut session);

    assert!(events.contains(&Event::CellExploded {
        owner: PlayerId::First,
        cell: CellCoord::new(1, 0),
        projectiles: 3,
    }));

    // The neighbour is empty again and its projectiles reached all three of
    // its neighbours, including the corner that started the chain.
    let board = query::board_snapshot(&session);
    assert_eq!(board.get(CellCoord::new(1, 0)), CellState::Empty);
    assert_eq!(board.get(CellCoord::new(0, 0)), occupied(PlayerId::First, 1));
    assert_eq!(board.get(CellCoord::new(2, 0)), occupied(PlayerId::First, 1));
    assert_eq!(board.get(CellCoord::new(1, 1)), occupied(PlayerId::First, 1));
    assert_eq!(board.get(CellCoord::new(0, 1)), occupied(PlayerId::First, 1));
    assert_eq!(board.total_pieces(), 5);
    assert!(board.is_stable());
    assert_eq!(
        query::phase(&session),
        TurnPhase::AwaitingInput(PlayerId::Second)
    );
}

#[test]
fn eliminating_the_opponent_at_quiescence_wins() {
    let config = GameConfig::new(size(3), PlayerId::Second).with_opening(
        CellCoord::new(0, 0),
        PlayerId::First,
        1,
    );
    let mut session = session(config);

    let _ = place(&mut session, PlayerId::Second, 0, 1);
    let _ = place(&mut session, PlayerId::First, 0, 0);
    let events = resolve(&mut session);

    assert!(events.contains(&Event::CellCaptured {
        cell: CellCoord::new(0, 1),
        from: PlayerId::Second,
        to: PlayerId::First,
    }));
    assert_eq!(events.last(), Some(&Event::GameWon {
        winner: PlayerId::First,
    }));
    assert!(query::is_quiescent(&session));
    assert_eq!(query::phase(&session), TurnPhase::GameOver(PlayerId::First));
    let board = query::board_snapshot(&session);
    assert_eq!(board.cells_owned_by(PlayerId::Second), 0);
    assert_eq!(board.get(CellCoord::new(0, 1)), occupied(PlayerId::First, 2));

    let rejected = place(&mut session, PlayerId::Second, 2, 2);
    assert_eq!(
        rejected,
        vec![Event::PlacementRejected {
            player: PlayerId::Second,
            cell: CellCoord::new(2, 2),
            reason: PlacementError::InputLocked,
        }]
    );
}

#[test]
fn no_win_is_declared_before_both_players_placed() {
    let config = GameConfig::new(size(3), PlayerId::First);
    let mut session = session(config);

    let events = place(&mut session, PlayerId::First, 1, 1);

    assert_eq!(
        events.last(),
        Some(&Event::TurnAdvanced {
            player: PlayerId::Second,
        })
    );
    assert_eq!(query::winner(&session), None);
}

#[test]
fn eliminated_player_loses_while_the_winner_keeps_cascading() {
    let mut session = session(GameConfig::new(size(2), PlayerId::First));

    let _ = place(&mut session, PlayerId::First, 0, 0);
    let _ = place(&mut session, PlayerId::Second, 1, 1);
    let _ = place(&mut session, PlayerId::First, 0, 0);
    let _ = resolve(&mut session);
    assert_eq!(
        query::phase(&session),
        TurnPhase::AwaitingInput(PlayerId::Second)
    );

    let _ = place(&mut session, PlayerId::Second, 1, 1);
    let events = resolve(&mut session);

    // Both captured cells detonate on arrival, leaving only Player 1's
    // projectiles in flight; Player 0 can never get a piece back.
    assert_eq!(
        events.last(),
        Some(&Event::GameWon {
            winner: PlayerId::Second,
        })
    );
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::CascadeSettled { .. })));
    assert_eq!(query::phase(&session), TurnPhase::GameOver(PlayerId::Second));
    let projectiles = query::projectile_snapshot(&session);
    assert_eq!(projectiles.len(), 4);
    assert!(projectiles.iter().all(|p| p.owner == PlayerId::Second));
    assert_eq!(query::pieces_in_play(&session), 4);
}

#[test]
fn rejected_placements_leave_the_board_untouched() {
    let mut session = session(GameConfig::new(size(3), PlayerId::First));
    let _ = place(&mut session, PlayerId::First, 1, 1);
    let before = query::board_snapshot(&session);

    let wrong_owner = place(&mut session, PlayerId::Second, 1, 1);
    let out_of_bounds = place(&mut session, PlayerId::Second, 3, 1);

    assert_eq!(
        wrong_owner,
        vec![Event::PlacementRejected {
            player: PlayerId::Second,
            cell: CellCoord::new(1, 1),
            reason: PlacementError::WrongOwner,
        }]
    );
    assert_eq!(
        out_of_bounds,
        vec![Event::PlacementRejected {
            player: PlayerId::Second,
            cell: CellCoord::new(3, 1),
            reason: PlacementError::OutOfBounds,
        }]
    );
    assert_eq!(query::board_snapshot(&session), before);
    assert_eq!(
        query::phase(&session),
        TurnPhase::AwaitingInput(PlayerId::Second)
    );
}
