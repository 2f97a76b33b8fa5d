//! Solo-versus-computer flows through the engine.

use hawk_games::{
    CancelTarget, Event, GameEngine, GameError, HawkConfig, Mode, Prompt, Rounds, Series, Status,
    Winner,
};
use hawk_tictactoe::ai::winning_move;
use hawk_tictactoe::{Cell, Difficulty, Mark, Position};

const ACTOR: &str = "player-1";

fn engine() -> GameEngine {
    GameEngine::with_seed(&HawkConfig::default(), 1234)
}

fn start(engine: &GameEngine, mark: Mark, difficulty: Difficulty, rounds: Rounds) {
    engine.handle(ACTOR, Event::SelectMode(Mode::Computer));
    engine.handle(ACTOR, Event::SelectSymbol(mark));
    engine.handle(ACTOR, Event::SelectDifficulty(difficulty));
    engine.handle(ACTOR, Event::SelectRounds(rounds));
    let report = engine.handle(ACTOR, Event::StartGame);
    assert_eq!(report.status, Status::InProgress);
}

#[test]
fn test_setup_walks_through_prompts() {
    let engine = engine();

    let report = engine.handle(ACTOR, Event::SelectMode(Mode::Computer));
    assert_eq!(report.status, Status::AwaitingInput(Prompt::Symbol));

    let report = engine.handle(ACTOR, Event::SelectSymbol(Mark::X));
    assert_eq!(report.status, Status::AwaitingInput(Prompt::Difficulty));

    let report = engine.handle(ACTOR, Event::SelectDifficulty(Difficulty::Easy));
    assert_eq!(report.status, Status::AwaitingInput(Prompt::Rounds));

    let report = engine.handle(ACTOR, Event::SelectRounds(Rounds::Six));
    assert_eq!(report.status, Status::AwaitingInput(Prompt::Start));

    let report = engine.handle(ACTOR, Event::StartGame);
    assert_eq!(report.status, Status::InProgress);
    assert_eq!(report.board, [Cell::Empty; 9]);

    let score = report.score.expect("solo reports carry a score");
    assert_eq!((score.round, score.rounds), (1, 6));
    assert_eq!((score.player, score.computer, score.draws), (0, 0, 0));
    assert_eq!(engine.session_counts(), (0, 1, 0));
}

#[test]
fn test_start_requires_complete_setup() {
    let engine = engine();

    let report = engine.handle(ACTOR, Event::StartGame);
    assert_eq!(
        report.status,
        Status::Rejected(GameError::SetupIncomplete(Prompt::Mode))
    );

    engine.handle(ACTOR, Event::SelectMode(Mode::Computer));
    engine.handle(ACTOR, Event::SelectSymbol(Mark::O));
    let report = engine.handle(ACTOR, Event::StartGame);
    assert_eq!(
        report.status,
        Status::Rejected(GameError::SetupIncomplete(Prompt::Difficulty))
    );
    assert!(engine.solo_session(ACTOR).is_none());
}

#[test]
fn test_selection_without_mode_is_rejected() {
    let engine = engine();
    let report = engine.handle(ACTOR, Event::SelectSymbol(Mark::X));
    assert_eq!(
        report.status,
        Status::Rejected(GameError::SetupIncomplete(Prompt::Mode))
    );
}

#[test]
fn test_friend_mode_points_to_invite() {
    let engine = engine();
    let report = engine.handle(ACTOR, Event::SelectMode(Mode::Friend));
    assert_eq!(report.status, Status::AwaitingInput(Prompt::Invite));

    let report = engine.handle(ACTOR, Event::SelectDifficulty(Difficulty::Hard));
    assert_eq!(report.status, Status::Rejected(GameError::WrongMode));
}

#[test]
fn test_hard_answers_center_with_corner() {
    let engine = engine();
    start(&engine, Mark::X, Difficulty::Hard, Rounds::One);

    let report = engine.handle(ACTOR, Event::PlayerMove(4));
    assert_eq!(report.status, Status::InProgress);

    let reply = report.computer_move.expect("computer replied");
    assert!(Position::CORNERS.contains(&reply), "got {reply}");
    assert_eq!(report.board[4], Cell::Occupied(Mark::X));
    assert_eq!(report.board[reply.to_index()], Cell::Occupied(Mark::O));
}

#[test]
fn test_computer_plays_the_other_mark() {
    let engine = engine();
    start(&engine, Mark::O, Difficulty::Medium, Rounds::One);

    let report = engine.handle(ACTOR, Event::PlayerMove(0));
    assert_eq!(report.board[0], Cell::Occupied(Mark::O));
    let reply = report.computer_move.unwrap();
    assert_eq!(report.board[reply.to_index()], Cell::Occupied(Mark::X));

    let session = engine.solo_session(ACTOR).unwrap();
    assert_eq!(*session.computer_mark(), Mark::X);
    assert_eq!(session.board().occupied(), 2);
}

#[test]
fn test_occupied_cell_rejected_and_board_unchanged() {
    let engine = engine();
    start(&engine, Mark::X, Difficulty::Hard, Rounds::One);
    let first = engine.handle(ACTOR, Event::PlayerMove(4));
    let before = *engine.solo_session(ACTOR).unwrap().board();

    let report = engine.handle(ACTOR, Event::PlayerMove(4));
    assert_eq!(
        report.status,
        Status::Rejected(GameError::CellOccupied(Position::Center))
    );
    assert_eq!(report.board, first.board);
    assert_eq!(*engine.solo_session(ACTOR).unwrap().board(), before);

    let report = engine.handle(ACTOR, Event::PlayerMove(9));
    assert_eq!(report.status, Status::Rejected(GameError::IndexOutOfRange(9)));
    assert_eq!(*engine.solo_session(ACTOR).unwrap().board(), before);
}

#[test]
fn test_move_without_game_is_not_found() {
    let engine = engine();
    let report = engine.handle(ACTOR, Event::PlayerMove(0));
    assert_eq!(report.status, Status::NotFound);
}

#[test]
fn test_hard_series_runs_to_completion() {
    let engine = engine();
    start(&engine, Mark::X, Difficulty::Hard, Rounds::Three);

    let mut round_ends = Vec::new();
    while let Some(session) = engine.solo_session(ACTOR) {
        // Naive human: always the first free cell.
        let index = session.board().available_cells()[0].to_index();
        let report = engine.handle(ACTOR, Event::PlayerMove(index));

        let score = report.score.expect("solo reports carry a score");
        match report.status {
            Status::Win(Winner::Player) => panic!("hard computer lost"),
            Status::Win(Winner::Computer) | Status::Draw => round_ends.push(score),
            Status::InProgress => assert_eq!(score.series, Series::InProgress),
            other => panic!("unexpected status {other:?}"),
        }
    }

    assert_eq!(round_ends.len(), 3);
    assert_eq!(round_ends[0].series, Series::Continues);
    assert_eq!(round_ends[1].series, Series::Continues);
    assert_eq!(round_ends[2].series, Series::Complete);
    assert_eq!(
        round_ends.iter().map(|s| s.round).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    let last = round_ends[2];
    assert_eq!(last.player, 0);
    assert_eq!(last.computer + last.draws, 3);
    assert_eq!(engine.session_counts(), (0, 0, 0));
}

#[test]
fn test_single_round_removes_session() {
    let engine = engine();
    start(&engine, Mark::X, Difficulty::Easy, Rounds::One);

    let mut last = None;
    while let Some(session) = engine.solo_session(ACTOR) {
        let index = session.board().available_cells()[0].to_index();
        last = Some(engine.handle(ACTOR, Event::PlayerMove(index)));
    }

    let last = last.unwrap();
    assert!(last.is_terminal());
    assert_eq!(last.score.unwrap().series, Series::Complete);
    assert_eq!(
        engine.handle(ACTOR, Event::PlayerMove(0)).status,
        Status::NotFound
    );
}

#[test]
fn test_restart_overwrites_running_series() {
    let engine = engine();
    start(&engine, Mark::X, Difficulty::Easy, Rounds::Three);
    engine.handle(ACTOR, Event::PlayerMove(0));
    assert_eq!(engine.solo_session(ACTOR).unwrap().board().occupied(), 2);

    start(&engine, Mark::O, Difficulty::Hard, Rounds::One);
    let session = engine.solo_session(ACTOR).unwrap();
    assert_eq!(session.board().occupied(), 0);
    assert_eq!(*session.player_mark(), Mark::O);
    assert_eq!(*session.rounds(), Rounds::One);
}

#[test]
fn test_cancel_abandons_series() {
    let engine = engine();
    start(&engine, Mark::X, Difficulty::Medium, Rounds::Six);
    engine.handle(ACTOR, Event::PlayerMove(8));

    let report = engine.handle(ACTOR, Event::Cancel(CancelTarget::Solo));
    assert_eq!(report.status, Status::Cancelled);
    assert!(engine.solo_session(ACTOR).is_none());

    let report = engine.handle(ACTOR, Event::Cancel(CancelTarget::Solo));
    assert_eq!(report.status, Status::NotFound);
}

#[test]
fn test_sweep_expires_idle_solo_state() {
    let engine = engine();
    start(&engine, Mark::X, Difficulty::Easy, Rounds::One);
    engine.handle("other", Event::SelectMode(Mode::Computer));

    assert_eq!(engine.sweep_expired(), 0);
    assert_eq!(
        engine.sweep(std::time::Duration::ZERO, std::time::Duration::ZERO),
        2
    );
    assert_eq!(engine.session_counts(), (0, 0, 0));
}

#[test]
fn test_player_win_is_scored() {
    let mut wins = 0;

    for seed in 0..50 {
        let engine = GameEngine::with_seed(&HawkConfig::default(), seed);
        start(&engine, Mark::X, Difficulty::Easy, Rounds::One);

        let mut last = None;
        while let Some(session) = engine.solo_session(ACTOR) {
            let board = session.board();
            let pos = winning_move(board, Mark::X)
                .or_else(|| board.is_empty(Position::Center).then_some(Position::Center))
                .unwrap_or(board.available_cells()[0]);
            last = Some(engine.handle(ACTOR, Event::PlayerMove(pos.to_index())));
        }

        let report = last.expect("at least one move was played");
        let score = report.score.expect("solo reports carry a score");
        if report.status == Status::Win(Winner::Player) {
            wins += 1;
            assert_eq!(report.computer_move, None, "the winning move ends the round");
            assert_eq!((score.player, score.computer, score.draws), (1, 0, 0));
            assert_eq!(score.series, Series::Complete);
        } else {
            assert_eq!(score.player, 0);
        }
    }

    assert!(wins > 0, "a line-taking human never beat the easy computer");
}
