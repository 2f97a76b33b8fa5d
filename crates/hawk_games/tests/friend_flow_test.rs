//! Invite-based games between two players.

use hawk_games::{
    CancelTarget, Event, GameEngine, GameError, HawkConfig, Prompt, Status, Winner,
};
use hawk_tictactoe::{Cell, Mark, Position};
use std::thread;
use std::time::Duration;

fn engine() -> GameEngine {
    GameEngine::with_seed(&HawkConfig::default(), 99)
}

fn invite(engine: &GameEngine) -> String {
    let report = engine.handle("host", Event::IssueInvite);
    assert_eq!(report.status, Status::AwaitingInput(Prompt::Join));
    report.game_id.expect("invite carries a game id")
}

fn accept(engine: &GameEngine, game_id: &str, actor: &str, mark: Mark) -> Status {
    engine
        .handle(
            actor,
            Event::AcceptInvite {
                game_id: game_id.to_string(),
                mark,
            },
        )
        .status
}

fn seated_game(engine: &GameEngine) -> String {
    let game_id = invite(engine);
    assert_eq!(
        accept(engine, &game_id, "alice", Mark::X),
        Status::AwaitingInput(Prompt::Opponent)
    );
    assert_eq!(accept(engine, &game_id, "bob", Mark::O), Status::InProgress);
    game_id
}

fn play(engine: &GameEngine, game_id: &str, actor: &str, index: usize) -> hawk_games::Report {
    engine.handle(
        actor,
        Event::FriendMove {
            game_id: game_id.to_string(),
            index,
        },
    )
}

#[test]
fn test_left_column_win_announced_after_fifth_move() {
    let engine = engine();
    let game_id = seated_game(&engine);

    let moves = [("alice", 0), ("bob", 1), ("alice", 3), ("bob", 4)];
    for (actor, index) in moves {
        let report = play(&engine, &game_id, actor, index);
        assert_eq!(report.status, Status::InProgress, "{actor} at {index}");
        assert_ne!(report.turn.as_deref(), Some(actor));
    }

    let report = play(&engine, &game_id, "alice", 6);
    assert_eq!(
        report.status,
        Status::Win(Winner::Participant {
            id: "alice".into(),
            mark: Mark::X
        })
    );
    assert_eq!(report.game_id.as_deref(), Some(game_id.as_str()));
    for i in [0, 3, 6] {
        assert_eq!(report.board[i], Cell::Occupied(Mark::X));
    }
    assert!(engine.friend_session(&game_id).is_none());
    assert_eq!(play(&engine, &game_id, "bob", 8).status, Status::NotFound);
}

#[test]
fn test_full_board_is_a_draw() {
    let engine = engine();
    let game_id = seated_game(&engine);

    let moves = [
        ("alice", 0),
        ("bob", 1),
        ("alice", 2),
        ("bob", 4),
        ("alice", 3),
        ("bob", 5),
        ("alice", 7),
        ("bob", 6),
    ];
    for (actor, index) in moves {
        assert_eq!(play(&engine, &game_id, actor, index).status, Status::InProgress);
    }

    let report = play(&engine, &game_id, "alice", 8);
    assert_eq!(report.status, Status::Draw);
    assert!(report.board.iter().all(|c| *c != Cell::Empty));
    assert!(engine.friend_session(&game_id).is_none());
}

#[test]
fn test_same_actor_cannot_join_twice() {
    let engine = engine();
    let game_id = invite(&engine);

    accept(&engine, &game_id, "alice", Mark::X);
    assert_eq!(
        accept(&engine, &game_id, "alice", Mark::O),
        Status::Rejected(GameError::AlreadyJoined)
    );
    assert_eq!(engine.friend_session(&game_id).unwrap().participants().len(), 1);
}

#[test]
fn test_second_player_must_pick_other_mark() {
    let engine = engine();
    let game_id = invite(&engine);

    accept(&engine, &game_id, "alice", Mark::O);
    assert_eq!(
        accept(&engine, &game_id, "bob", Mark::O),
        Status::Rejected(GameError::SymbolTaken(Mark::O))
    );
    assert_eq!(accept(&engine, &game_id, "bob", Mark::X), Status::InProgress);
}

#[test]
fn test_third_player_gets_game_full() {
    let engine = engine();
    let game_id = seated_game(&engine);
    assert_eq!(
        accept(&engine, &game_id, "carol", Mark::X),
        Status::Rejected(GameError::GameFull)
    );
    assert!(engine.friend_session(&game_id).is_some());
}

#[test]
fn test_unknown_invite_not_found() {
    let engine = engine();
    assert_eq!(accept(&engine, "no-such-game", "alice", Mark::X), Status::NotFound);
}

#[test]
fn test_move_validation_order() {
    let engine = engine();
    let game_id = invite(&engine);
    accept(&engine, &game_id, "alice", Mark::X);

    assert_eq!(
        play(&engine, &game_id, "alice", 0).status,
        Status::Rejected(GameError::AwaitingOpponent)
    );

    accept(&engine, &game_id, "bob", Mark::O);
    assert_eq!(
        play(&engine, &game_id, "mallory", 0).status,
        Status::Rejected(GameError::NotParticipant)
    );
    assert_eq!(
        play(&engine, &game_id, "bob", 0).status,
        Status::Rejected(GameError::NotYourTurn)
    );

    play(&engine, &game_id, "alice", 0);
    let report = play(&engine, &game_id, "bob", 0);
    assert_eq!(
        report.status,
        Status::Rejected(GameError::CellOccupied(Position::TopLeft))
    );
    assert_eq!(report.turn.as_deref(), Some("bob"));

    assert_eq!(
        play(&engine, &game_id, "bob", 42).status,
        Status::Rejected(GameError::IndexOutOfRange(42))
    );
    assert_eq!(engine.friend_session(&game_id).unwrap().board().occupied(), 1);
}

#[test]
fn test_concurrent_duplicate_moves_accept_exactly_one() {
    let engine = engine();
    let game_id = seated_game(&engine);

    let statuses: Vec<Status> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| play(&engine, &game_id, "alice", 4).status))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let accepted = statuses.iter().filter(|s| **s == Status::InProgress).count();
    assert_eq!(accepted, 1);
    assert!(
        statuses
            .iter()
            .filter(|s| **s != Status::InProgress)
            .all(|s| *s == Status::Rejected(GameError::NotYourTurn))
    );
    assert_eq!(engine.friend_session(&game_id).unwrap().board().occupied(), 1);
}

#[test]
fn test_independent_games_run_in_parallel() {
    let engine = engine();
    let games: Vec<String> = (0..4).map(|_| seated_game(&engine)).collect();

    thread::scope(|scope| {
        for game_id in &games {
            let engine = &engine;
            scope.spawn(move || {
                for (actor, index) in [("alice", 0), ("bob", 1), ("alice", 3), ("bob", 4)] {
                    assert_eq!(play(engine, game_id, actor, index).status, Status::InProgress);
                }
                let report = play(engine, game_id, "alice", 6);
                assert!(matches!(report.status, Status::Win(_)));
            });
        }
    });

    assert_eq!(engine.session_counts(), (0, 0, 0));
}

#[test]
fn test_cancel_by_participant_only() {
    let engine = engine();
    let game_id = seated_game(&engine);

    let report = engine.handle("mallory", Event::Cancel(CancelTarget::Friend(game_id.clone())));
    assert_eq!(report.status, Status::Rejected(GameError::NotParticipant));

    let report = engine.handle("bob", Event::Cancel(CancelTarget::Friend(game_id.clone())));
    assert_eq!(report.status, Status::Cancelled);
    assert!(engine.friend_session(&game_id).is_none());
}

#[test]
fn test_expired_invite_is_gone() {
    let engine = engine();
    let game_id = invite(&engine);

    assert_eq!(engine.sweep(Duration::from_secs(3600), Duration::ZERO), 1);
    assert_eq!(accept(&engine, &game_id, "alice", Mark::X), Status::NotFound);
}
