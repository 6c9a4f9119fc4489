use std::{fmt, time::Duration};

use anyhow::{bail, Result};
use chain_reaction_core::{BoardSnapshot, CellCoord, CellState, PlayerId, TurnPhase};
use chain_reaction_system_input::PlacementInput;
use chain_reaction_world::query;
use log::info;

use crate::simulation::{Rejection, Simulation};

const MAX_TICKS_PER_CASCADE: u64 = 100_000;

/// Move script token that is not a `column,row` pair.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("move {index} ('{token}') is not of the form column,row")]
pub(crate) struct MoveParseError {
    index: usize,
    token: String,
}

/// Parses a whitespace separated list of `column,row` pairs.
pub(crate) fn parse_moves(script: &str) -> Result<Vec<CellCoord>, MoveParseError> {
    script
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            parse_cell(token).ok_or_else(|| MoveParseError {
                index,
                token: token.to_owned(),
            })
        })
        .collect()
}

fn parse_cell(token: &str) -> Option<CellCoord> {
    let (column, row) = token.split_once(',')?;
    Some(CellCoord::new(
        column.trim().parse().ok()?,
        row.trim().parse().ok()?,
    ))
}

/// Final state of a headless game.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ReplayReport {
    board: BoardSnapshot,
    phase: TurnPhase,
    rejections: Vec<Rejection>,
    ticks: u64,
    unplayed: usize,
}

/// Plays `moves` for whichever player is on turn, resolving every cascade
/// before the next move.
pub(crate) fn run(
    mut simulation: Simulation,
    moves: &[CellCoord],
    tick_interval: Duration,
) -> Result<ReplayReport> {
    let mut unplayed = 0;
    for (index, &cell) in moves.iter().enumerate() {
        if query::winner(simulation.session()).is_some() {
            unplayed = moves.len() - index;
            break;
        }
        simulation.advance(Duration::ZERO, false, PlacementInput::new(true, Some(cell)));
        drain(&mut simulation, tick_interval)?;
    }

    let session = simulation.session();
    let report = ReplayReport {
        board: query::board_snapshot(session),
        phase: query::phase(session),
        rejections: simulation.rejections().to_vec(),
        ticks: query::tick_index(session),
        unplayed,
    };
    info!(
        "headless replay finished after {} ticks with {} rejection(s)",
        report.ticks,
        report.rejections.len()
    );
    Ok(report)
}

fn drain(simulation: &mut Simulation, tick_interval: Duration) -> Result<()> {
    let started = query::tick_index(simulation.session());
    while query::phase(simulation.session()) == TurnPhase::Resolving {
        simulation.advance(tick_interval, false, PlacementInput::default());
        let elapsed = query::tick_index(simulation.session()) - started;
        if elapsed > MAX_TICKS_PER_CASCADE {
            bail!("cascade did not settle within {MAX_TICKS_PER_CASCADE} ticks");
        }
    }
    Ok(())
}

fn player_glyph(player: PlayerId) -> char {
    match player {
        PlayerId::First => 'A',
        PlayerId::Second => 'B',
    }
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = self.board.size().side();
        for row in 0..side {
            let line: Vec<String> = (0..side)
                .map(|column| match self.board.get(CellCoord::new(column, row)) {
                    CellState::Empty => " .".to_owned(),
                    CellState::Occupied { owner, count } => {
                        format!("{}{count}", player_glyph(owner))
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }

        for player in PlayerId::ALL {
            writeln!(
                f,
                "{} ({}): {} cell(s)",
                player,
                player_glyph(player),
                self.board.cells_owned_by(player)
            )?;
        }
        for rejection in &self.rejections {
            writeln!(
                f,
                "rejected: {} at {}: {}",
                rejection.player, rejection.cell, rejection.reason
            )?;
        }
        if self.unplayed > 0 {
            writeln!(f, "unplayed moves: {}", self.unplayed)?;
        }
        writeln!(f, "ticks: {}", self.ticks)?;
        match self.phase {
            TurnPhase::AwaitingInput(player) => write!(f, "{player} to move"),
            TurnPhase::Resolving => write!(f, "resolving"),
            TurnPhase::GameOver(winner) => write!(f, "{winner} wins"),
        }
    }
}
