//! End-to-end lifecycle coverage: session start, movement, turn rotation,
//! player removal, and termination. All tests run on the paused tokio clock;
//! countdowns elapse via explicit `advance` calls or the auto-advancing
//! scheduler.

use std::collections::BTreeMap;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::{advance, Duration};

use skirmish_core::{
    Direction, LifecyclePhase, MapDimensions, MapSnapshot, PlayerId, Position, SessionId,
    TerrainKind,
};
use skirmish_runtime::{
    Event, PlayerEvent, PlayerSpec, Runtime, RuntimeConfig, RuntimeError, SessionError,
    SessionSpec, Topic, TurnEvent,
};

fn floor_map(width: u32, height: u32) -> MapSnapshot {
    MapSnapshot::filled(MapDimensions::new(width, height), TerrainKind::Floor)
}

fn player(id: u32, x: i32, y: i32, allowance: u32) -> PlayerSpec {
    PlayerSpec {
        id: PlayerId(id),
        start_position: Position::new(x, y),
        allowance,
        team: None,
    }
}

fn two_player_spec(session: u64) -> SessionSpec {
    SessionSpec {
        id: SessionId(session),
        map: floor_map(5, 5),
        players: vec![player(1, 0, 0, 3), player(2, 4, 4, 3)],
        turn_order: vec![PlayerId(1), PlayerId(2)],
    }
}

fn three_player_spec(session: u64) -> SessionSpec {
    SessionSpec {
        id: SessionId(session),
        map: floor_map(5, 5),
        players: vec![player(1, 0, 0, 3), player(2, 4, 0, 3), player(3, 0, 4, 3)],
        turn_order: vec![PlayerId(1), PlayerId(2), PlayerId(3)],
    }
}

async fn next_turn_event(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> TurnEvent {
    match rx.recv().await.expect("turn event") {
        Event::Turn(event) => event,
        other => panic!("expected turn event, got {other:?}"),
    }
}

async fn next_player_event(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> PlayerEvent {
    match rx.recv().await.expect("player event") {
        Event::Player(event) => event,
        other => panic!("expected player event, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn start_activates_first_player_in_order() {
    let mut runtime = Runtime::new();
    let handle = runtime.create_session(two_player_spec(1)).unwrap();
    let mut turns = handle.subscribe(Topic::Turn);
    let mut players = handle.subscribe(Topic::Player);

    handle.start().await.unwrap();

    let event = next_turn_event(&mut turns).await;
    assert!(matches!(
        event,
        TurnEvent::Changed {
            active_player: PlayerId(1),
            turn_number: 1,
            ..
        }
    ));

    // The initial reachable set for the active player is published too.
    match next_player_event(&mut players).await {
        PlayerEvent::ReachableTiles { player, tiles, .. } => {
            assert_eq!(player, PlayerId(1));
            assert!(!tiles.is_empty());
        }
        other => panic!("expected reachable tiles, got {other:?}"),
    }

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turn.phase, LifecyclePhase::TurnActive);
    assert_eq!(state.turn.active_player, Some(PlayerId(1)));
    assert_eq!(handle.remaining_turn_seconds().await.unwrap(), 30);

    let err = handle.start().await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Session(SessionError::AlreadyStarted)
    ));
}

#[tokio::test(start_paused = true)]
async fn commands_before_start_are_rejected() {
    let mut runtime = Runtime::new();
    let handle = runtime.create_session(two_player_spec(1)).unwrap();

    let err = handle
        .move_player(PlayerId(1), Direction::East)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Session(SessionError::NotStarted)
    ));

    let err = handle.end_turn(PlayerId(1)).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Session(SessionError::NotStarted)
    ));
}

#[tokio::test(start_paused = true)]
async fn move_commits_and_publishes_position_and_reachable() {
    let mut runtime = Runtime::new();
    let handle = runtime.create_session(two_player_spec(1)).unwrap();
    handle.start().await.unwrap();
    let mut players = handle.subscribe(Topic::Player);

    let outcome = handle
        .move_player(PlayerId(1), Direction::East)
        .await
        .unwrap();
    assert_eq!(outcome.position, Position::new(1, 0));
    assert_eq!(outcome.remaining_points, 2);

    match next_player_event(&mut players).await {
        PlayerEvent::Moved {
            player,
            position,
            remaining_points,
            ..
        } => {
            assert_eq!(player, PlayerId(1));
            assert_eq!(position, Position::new(1, 0));
            assert_eq!(remaining_points, 2);
        }
        other => panic!("expected move event, got {other:?}"),
    }
    assert!(matches!(
        next_player_event(&mut players).await,
        PlayerEvent::ReachableTiles { .. }
    ));

    // Only the active player may move.
    let err = handle
        .move_player(PlayerId(2), Direction::North)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Session(SessionError::NotActivePlayer {
            player: PlayerId(2)
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn initial_reachable_set_matches_the_budgeted_search() {
    // 3 columns x 2 rows of uniform floor, two points of budget.
    let mut runtime = Runtime::new();
    let spec = SessionSpec {
        id: SessionId(1),
        map: floor_map(3, 2),
        players: vec![player(1, 0, 0, 2)],
        turn_order: vec![PlayerId(1)],
    };
    let handle = runtime.create_session(spec).unwrap();
    let mut players = handle.subscribe(Topic::Player);
    handle.start().await.unwrap();

    let tiles = match next_player_event(&mut players).await {
        PlayerEvent::ReachableTiles { tiles, .. } => tiles,
        other => panic!("expected reachable tiles, got {other:?}"),
    };
    let costs: BTreeMap<(i32, i32), u32> = tiles
        .iter()
        .map(|t| ((t.position.x, t.position.y), t.cost))
        .collect();

    let expected: BTreeMap<(i32, i32), u32> = [((1, 0), 1), ((2, 0), 2), ((0, 1), 1), ((1, 1), 2)]
        .into_iter()
        .collect();
    assert_eq!(costs, expected);
    for tile in &tiles {
        assert_eq!(tile.remaining_points, 2 - tile.cost);
    }
}

#[tokio::test(start_paused = true)]
async fn turn_clock_expiry_advances_exactly_once() {
    let mut runtime = Runtime::with_config(RuntimeConfig {
        turn_seconds: 5,
        transition_seconds: 100,
        ..RuntimeConfig::default()
    });
    let handle = runtime.create_session(two_player_spec(1)).unwrap();
    let mut turns = handle.subscribe(Topic::Turn);
    handle.start().await.unwrap();
    let _ = next_turn_event(&mut turns).await;

    advance(Duration::from_secs(5)).await;
    let event = next_turn_event(&mut turns).await;
    assert!(matches!(
        event,
        TurnEvent::Changed {
            active_player: PlayerId(2),
            turn_number: 2,
            ..
        }
    ));

    // Well past the original deadline, still inside the long transition:
    // the expired clock must not fire again.
    advance(Duration::from_secs(20)).await;
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turn.phase, LifecyclePhase::TurnTransition);
    assert_eq!(state.turn.turn_number, 2);
    assert!(matches!(turns.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn manual_turn_ends_cycle_back_to_the_first_player() {
    let mut runtime = Runtime::new();
    let handle = runtime.create_session(two_player_spec(1)).unwrap();
    let mut turns = handle.subscribe(Topic::Turn);
    let mut players = handle.subscribe(Topic::Player);
    handle.start().await.unwrap();
    let _ = next_turn_event(&mut turns).await;
    let _ = next_player_event(&mut players).await;

    // Ending from the wrong player is rejected without state change.
    let err = handle.end_turn(PlayerId(2)).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Session(SessionError::NotActivePlayer {
            player: PlayerId(2)
        })
    ));

    // One full cycle: 1 -> 2 -> 1, turn number up by the order length.
    handle.end_turn(PlayerId(1)).await.unwrap();
    let event = next_turn_event(&mut turns).await;
    assert!(matches!(
        event,
        TurnEvent::Changed {
            active_player: PlayerId(2),
            turn_number: 2,
            ..
        }
    ));

    // The new turn's reachable publication marks the transition's end.
    let _ = next_player_event(&mut players).await;
    handle.end_turn(PlayerId(2)).await.unwrap();
    let event = next_turn_event(&mut turns).await;
    assert!(matches!(
        event,
        TurnEvent::Changed {
            active_player: PlayerId(1),
            turn_number: 3,
            ..
        }
    ));

    let _ = next_player_event(&mut players).await;
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turn.phase, LifecyclePhase::TurnActive);
    assert_eq!(state.turn.active_player, Some(PlayerId(1)));
    // Budget was reset on re-entry.
    assert_eq!(
        state.players.player(PlayerId(1)).unwrap().movement_points,
        3
    );
}

#[tokio::test(start_paused = true)]
async fn removing_the_active_player_promotes_the_next_in_shrunk_order() {
    let mut runtime = Runtime::new();
    let handle = runtime.create_session(three_player_spec(1)).unwrap();
    let mut turns = handle.subscribe(Topic::Turn);
    handle.start().await.unwrap();
    let _ = next_turn_event(&mut turns).await;

    handle.remove_player(PlayerId(1)).await.unwrap();
    let event = next_turn_event(&mut turns).await;
    assert!(matches!(
        event,
        TurnEvent::Changed {
            active_player: PlayerId(2),
            turn_number: 2,
            ..
        }
    ));

    let state = handle.query_state().await.unwrap();
    assert_eq!(
        state.turn.order.as_slice(),
        &[PlayerId(2), PlayerId(3)]
    );
    assert!(!state.players.player(PlayerId(1)).unwrap().in_game);
    assert_eq!(state.world.occupant_at(Position::new(0, 0)), None);
}

#[tokio::test(start_paused = true)]
async fn removing_a_bystander_keeps_the_active_player() {
    let mut runtime = Runtime::new();
    let handle = runtime.create_session(three_player_spec(1)).unwrap();
    let mut turns = handle.subscribe(Topic::Turn);
    handle.start().await.unwrap();
    let _ = next_turn_event(&mut turns).await;

    handle.remove_player(PlayerId(3)).await.unwrap();
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turn.active_player, Some(PlayerId(1)));
    assert_eq!(state.turn.phase, LifecyclePhase::TurnActive);
    assert!(matches!(turns.try_recv(), Err(TryRecvError::Empty)));

    // Removing one of the two survivors ends the game for the last one.
    handle.remove_player(PlayerId(1)).await.unwrap();
    let event = next_turn_event(&mut turns).await;
    assert!(matches!(
        event,
        TurnEvent::GameOver {
            winner: Some(PlayerId(2)),
            ..
        }
    ));
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turn.phase, LifecyclePhase::GameOver);
}

#[tokio::test(start_paused = true)]
async fn forced_game_over_rejects_further_commands() {
    let mut runtime = Runtime::new();
    let handle = runtime.create_session(two_player_spec(1)).unwrap();
    let mut turns = handle.subscribe(Topic::Turn);
    handle.start().await.unwrap();
    let _ = next_turn_event(&mut turns).await;

    handle.force_game_over(Some(PlayerId(2))).await.unwrap();
    let event = next_turn_event(&mut turns).await;
    assert!(matches!(
        event,
        TurnEvent::GameOver {
            winner: Some(PlayerId(2)),
            ..
        }
    ));

    for err in [
        handle
            .move_player(PlayerId(1), Direction::East)
            .await
            .unwrap_err(),
        handle.end_turn(PlayerId(1)).await.unwrap_err(),
        handle.force_game_over(None).await.unwrap_err(),
    ] {
        assert!(matches!(
            err,
            RuntimeError::Session(SessionError::SessionOver)
        ));
    }

    // The expired clock of the aborted turn must not resurrect the session.
    advance(Duration::from_secs(120)).await;
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turn.phase, LifecyclePhase::GameOver);
}

#[tokio::test(start_paused = true)]
async fn registry_rejects_duplicates_and_unknown_ids() {
    let mut runtime = Runtime::new();
    runtime.create_session(two_player_spec(1)).unwrap();

    let err = runtime.create_session(two_player_spec(1)).unwrap_err();
    assert!(matches!(err, RuntimeError::SessionAlreadyExists(_)));

    let err = runtime.session(SessionId(9)).unwrap_err();
    assert!(matches!(err, RuntimeError::SessionNotFound(SessionId(9))));
}

#[tokio::test(start_paused = true)]
async fn closing_a_session_stops_its_worker() {
    let mut runtime = Runtime::new();
    let handle = runtime.create_session(two_player_spec(1)).unwrap();
    handle.start().await.unwrap();

    runtime.close_session(SessionId(1)).await.unwrap();

    let err = handle.query_state().await.unwrap_err();
    assert!(matches!(err, RuntimeError::CommandChannelClosed));
    let err = runtime.close_session(SessionId(1)).await.unwrap_err();
    assert!(matches!(err, RuntimeError::SessionNotFound(SessionId(1))));
}
