//! Line-oriented console front end.
//!
//! Stands in for the chat transport: it turns typed lines into events and
//! renders each [`Report`]. Cells are numbered 1-9 for players and 0-8 for
//! the engine.

use crate::error::ParseError;
use crate::event::{CancelTarget, Event, Mode, Rounds};
use crate::report::{Prompt, Report, Series, Status, Winner};
use crate::GameEngine;
use anyhow::{Context, Result};
use hawk_tictactoe::{Cell, Difficulty, Mark};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument};

/// Solo series settings chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct SoloOptions {
    /// Human's mark.
    pub mark: Mark,
    /// Computer strength.
    pub difficulty: Difficulty,
    /// Series length.
    pub rounds: Rounds,
}

/// Actor name used for the console's solo player.
pub const SOLO_ACTOR: &str = "you";

/// The two hot-seat players and their marks.
pub const FRIENDS: [(&str, Mark); 2] = [("alice", Mark::X), ("bob", Mark::O)];

/// Parses a 1-based cell number into a 0-based index.
pub fn parse_cell(input: &str) -> Result<usize, ParseError> {
    match input.trim().parse::<usize>() {
        Ok(n @ 1..=9) => Ok(n - 1),
        _ => Err(ParseError::InvalidCell(input.trim().to_string())),
    }
}

/// Renders the board as a 3x3 grid with 1-based numbers on empty cells.
pub fn render_board(cells: &[Cell; 9]) -> String {
    let rows: Vec<String> = cells
        .chunks(3)
        .enumerate()
        .map(|(row, chunk)| {
            chunk
                .iter()
                .enumerate()
                .map(|(col, cell)| match cell {
                    Cell::Empty => (row * 3 + col + 1).to_string(),
                    Cell::Occupied(mark) => mark.to_string(),
                })
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect();
    rows.join("\n-+-+-\n")
}

/// One-line description of a report's status.
pub fn describe(report: &Report) -> String {
    match &report.status {
        Status::AwaitingInput(Prompt::Join) => match &report.game_id {
            Some(id) => format!("Invite {id} is open. Waiting for players..."),
            None => "Waiting for players...".to_string(),
        },
        Status::AwaitingInput(Prompt::Opponent) => "Waiting for another player...".to_string(),
        Status::AwaitingInput(prompt) => format!("Choose {prompt}."),
        Status::InProgress => match &report.turn {
            Some(turn) => format!("{turn} to move."),
            None => "Your move.".to_string(),
        },
        Status::Win(Winner::Player) => "You win!".to_string(),
        Status::Win(Winner::Computer) => "Computer wins!".to_string(),
        Status::Win(Winner::Participant { id, mark }) => format!("{id} ({mark}) wins!"),
        Status::Draw => "Draw!".to_string(),
        Status::Rejected(err) => format!("{err}."),
        Status::NotFound => "Game not found.".to_string(),
        Status::Cancelled => "Game cancelled.".to_string(),
    }
}

/// Full text rendering: board, status and, for solo games, the score.
pub fn render(report: &Report) -> String {
    let mut out = render_board(&report.board);
    out.push_str("\n\n");
    out.push_str(&describe(report));

    if let Some(score) = &report.score {
        out.push_str(&format!(
            "\nRound {}/{} | you {} - {} computer | draws {}",
            score.round, score.rounds, score.player, score.computer, score.draws
        ));
        match score.series {
            Series::Continues => out.push_str("\nNext round!"),
            Series::Complete => out.push_str("\nSeries complete."),
            Series::InProgress => {}
        }
    }
    out
}

async fn emit<W: AsyncWrite + Unpin>(out: &mut W, report: &Report, json: bool) -> Result<()> {
    let text = if json {
        serde_json::to_string(report).context("Failed to serialize report")?
    } else {
        render(report)
    };
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n\n").await?;
    out.flush().await?;
    Ok(())
}

async fn say<W: AsyncWrite + Unpin>(out: &mut W, line: &str) -> Result<()> {
    out.write_all(line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}

/// Plays a solo series, reading one cell per line from `input`.
///
/// `quit` or end of input abandons the series.
#[instrument(skip(engine, input, out))]
pub async fn play_solo<R, W>(
    engine: &GameEngine,
    options: SoloOptions,
    input: R,
    out: &mut W,
    json: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    engine.handle(SOLO_ACTOR, Event::SelectMode(Mode::Computer));
    engine.handle(SOLO_ACTOR, Event::SelectSymbol(options.mark));
    engine.handle(SOLO_ACTOR, Event::SelectDifficulty(options.difficulty));
    engine.handle(SOLO_ACTOR, Event::SelectRounds(options.rounds));
    let report = engine.handle(SOLO_ACTOR, Event::StartGame);
    emit(out, &report, json).await?;
    info!(?options, "Solo series started");

    let mut lines = input.lines();
    loop {
        let Some(line) = lines.next_line().await? else {
            debug!("Input closed");
            engine.handle(SOLO_ACTOR, Event::Cancel(CancelTarget::Solo));
            return Ok(());
        };

        if line.trim().eq_ignore_ascii_case("quit") {
            let report = engine.handle(SOLO_ACTOR, Event::Cancel(CancelTarget::Solo));
            return emit(out, &report, json).await;
        }

        let index = match parse_cell(&line) {
            Ok(index) => index,
            Err(err) => {
                say(out, &err.to_string()).await?;
                continue;
            }
        };

        let report = engine.handle(SOLO_ACTOR, Event::PlayerMove(index));
        emit(out, &report, json).await?;

        let finished = match report.score {
            Some(score) => score.series == Series::Complete,
            None => report.status == Status::NotFound,
        };
        if finished {
            return Ok(());
        }
    }
}

/// Plays a hot-seat friend game between [`FRIENDS`], one cell per line.
#[instrument(skip(engine, input, out))]
pub async fn play_friend<R, W>(engine: &GameEngine, input: R, out: &mut W, json: bool) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let [(first, first_mark), (second, second_mark)] = FRIENDS;

    let invite = engine.handle(first, Event::IssueInvite);
    emit(out, &invite, json).await?;
    let game_id = invite.game_id.context("Invite carried no game id")?;

    for (actor, mark) in [(first, first_mark), (second, second_mark)] {
        let report = engine.handle(
            actor,
            Event::AcceptInvite {
                game_id: game_id.clone(),
                mark,
            },
        );
        emit(out, &report, json).await?;
    }

    let mut turn = first.to_string();
    let mut lines = input.lines();
    loop {
        say(out, &format!("{turn} >")).await?;
        let Some(line) = lines.next_line().await? else {
            debug!("Input closed");
            engine.handle(&turn, Event::Cancel(CancelTarget::Friend(game_id.clone())));
            return Ok(());
        };

        if line.trim().eq_ignore_ascii_case("quit") {
            let report = engine.handle(&turn, Event::Cancel(CancelTarget::Friend(game_id.clone())));
            return emit(out, &report, json).await;
        }

        let index = match parse_cell(&line) {
            Ok(index) => index,
            Err(err) => {
                say(out, &err.to_string()).await?;
                continue;
            }
        };

        let report = engine.handle(
            &turn,
            Event::FriendMove {
                game_id: game_id.clone(),
                index,
            },
        );
        emit(out, &report, json).await?;

        if report.is_terminal() || report.status == Status::NotFound {
            return Ok(());
        }
        if let Some(next) = report.turn {
            turn = next;
        }
    }
}
