#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session state for Chain Reaction.
//!
//! A [`GameSession`] aggregates the board, the cascade engine that animates
//! projectiles between cells, and the turn controller that locks input while
//! a cascade resolves. Every mutation flows through [`apply`]; adapters and
//! systems observe the session exclusively through the [`query`] module.

mod board;
mod cascade;
mod turn;

use std::time::Duration;

use chain_reaction_core::{
    CellCoord, Command, ConfigError, Event, GameConfig, PlacementError, PlayerId,
    ProjectileSnapshot, TurnPhase, WELCOME_BANNER,
};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use self::{board::Board, cascade::CascadeEngine, turn::TurnController};

/// Represents one running game of Chain Reaction.
#[derive(Clone, Debug)]
pub struct GameSession {
    banner: &'static str,
    config: GameConfig,
    first_player: PlayerId,
    board: Board,
    cascade: CascadeEngine,
    turns: TurnController,
    tick_index: u64,
    cascade_started_at: u64,
}

impl GameSession {
    /// Creates a session on the default 5×5 board where Player 0 opens.
    #[must_use]
    pub fn new() -> Self {
        Self::from_validated(GameConfig::default())
    }

    /// Creates a session from the provided configuration.
    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: GameConfig) -> Self {
        let first_player = config
            .first_player
            .unwrap_or_else(|| seeded_first_player(config.seed));
        let board = Board::with_opening(config.size, &config.opening);
        info!(
            "starting {side}x{side} game, {first_player} moves first",
            side = config.size.side()
        );
        Self {
            banner: WELCOME_BANNER,
            first_player,
            board,
            cascade: CascadeEngine::new(),
            turns: TurnController::new(first_player),
            tick_index: 0,
            cascade_started_at: 0,
            config,
        }
    }

    /// Attempts to add one orb for `player` at `cell`.
    ///
    /// On success the session enters the resolving phase and the projectiles
    /// released by an immediate explosion are returned; a placement that does
    /// not explode settles at once and hands the turn to the opponent.
    /// Rejections never mutate state.
    pub fn attempt_place(
        &mut self,
        player: PlayerId,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<Vec<ProjectileSnapshot>, PlacementError> {
        self.turns.authorize(player)?;
        let projectiles = self.board.place(player, cell)?;
        let spawned = projectiles.len() as u32;
        let snapshots = projectiles.iter().map(|p| p.snapshot()).collect();

        self.turns.begin_resolving(player);
        self.cascade_started_at = self.tick_index;
        out_events.push(Event::OrbPlaced {
            player,
            cell,
            spawned,
        });
        if spawned > 0 {
            debug!("{player} detonated {cell}, releasing {spawned} projectiles");
            out_events.push(Event::CellExploded {
                owner: player,
                cell,
                projectiles: spawned,
            });
        }
        self.cascade.spawn(projectiles);
        self.settle(out_events);
        Ok(snapshots)
    }

    /// Advances every projectile in flight by one step.
    ///
    /// The step is fixed; `dt` is only reported back through
    /// [`Event::TimeAdvanced`]. A finished game no longer animates.
    pub fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        if self.cascade.is_quiescent() || matches!(self.turns.phase(), TurnPhase::GameOver(_)) {
            return;
        }

        for landing in self.cascade.tick(&mut self.board) {
            out_events.push(Event::ProjectileLanded {
                owner: landing.owner,
                cell: landing.cell,
            });
            if let Some(previous) = landing.previous_owner {
                if previous != landing.owner {
                    out_events.push(Event::CellCaptured {
                        cell: landing.cell,
                        from: previous,
                        to: landing.owner,
                    });
                }
            }
            if landing.spawned > 0 {
                out_events.push(Event::CellExploded {
                    owner: landing.owner,
                    cell: landing.cell,
                    projectiles: landing.spawned,
                });
            }
        }
        debug!(
            "tick {} left {} projectiles in flight",
            self.tick_index,
            self.cascade.len()
        );
        self.settle(out_events);
    }

    fn settle(&mut self, out_events: &mut Vec<Event>) {
        let Some(phase) = self.turns.settle(&self.board, &self.cascade) else {
            return;
        };

        if self.cascade.is_quiescent() {
            let ticks = self.tick_index - self.cascade_started_at;
            debug!("cascade settled after {ticks} ticks");
            out_events.push(Event::CascadeSettled { ticks });
        }

        match phase {
            TurnPhase::AwaitingInput(player) => {
                out_events.push(Event::TurnAdvanced { player });
            }
            TurnPhase::GameOver(winner) => {
                info!(
                    "{winner} wins after {} placements",
                    self.turns.placements(PlayerId::First)
                        + self.turns.placements(PlayerId::Second)
                );
                out_events.push(Event::GameWon { winner });
            }
            TurnPhase::Resolving => {}
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut GameSession, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard { config } => match GameSession::with_config(config) {
            Ok(fresh) => {
                *session = fresh;
                out_events.push(Event::BoardConfigured {
                    size: session.config.size,
                    first_player: session.first_player,
                });
            }
            Err(error) => warn!("ignoring invalid board configuration: {error}"),
        },
        Command::PlaceOrb { player, cell } => {
            if let Err(reason) = session.attempt_place(player, cell, out_events) {
                debug!("rejected placement by {player} at {cell}: {reason}");
                out_events.push(Event::PlacementRejected {
                    player,
                    cell,
                    reason,
                });
            }
        }
        Command::Tick { dt } => session.tick(dt, out_events),
    }
}

fn seeded_first_player(seed: u64) -> PlayerId {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    if rng.gen_bool(0.5) {
        PlayerId::First
    } else {
        PlayerId::Second
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use super::GameSession;
    use chain_reaction_core::{
        BoardSize, BoardSnapshot, CellCoord, CellState, GameConfig, PlayerId, ProjectileView,
        TurnPhase,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(session: &GameSession) -> &'static str {
        session.banner
    }

    /// Configuration the running game was started from.
    #[must_use]
    pub fn config(session: &GameSession) -> &GameConfig {
        &session.config
    }

    /// Size of the board.
    #[must_use]
    pub fn board_size(session: &GameSession) -> BoardSize {
        session.board.size()
    }

    /// Player that opened the game.
    #[must_use]
    pub fn first_player(session: &GameSession) -> PlayerId {
        session.first_player
    }

    /// State of a single cell; cells outside the board read as empty.
    #[must_use]
    pub fn cell(session: &GameSession, cell: CellCoord) -> CellState {
        session.board.get(cell)
    }

    /// Owner of a single cell, if any.
    #[must_use]
    pub fn owner_of(session: &GameSession, cell: CellCoord) -> Option<PlayerId> {
        session.board.peek_owner(cell)
    }

    /// Captures the static occupancy of every cell.
    #[must_use]
    pub fn board_snapshot(session: &GameSession) -> BoardSnapshot {
        session.board.snapshot()
    }

    /// Captures every projectile in flight in insertion order.
    #[must_use]
    pub fn projectile_snapshot(session: &GameSession) -> ProjectileView {
        ProjectileView::from_snapshots(
            session
                .cascade
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Reports whether no projectile is in flight.
    #[must_use]
    pub fn is_quiescent(session: &GameSession) -> bool {
        session.cascade.is_quiescent()
    }

    /// Current turn phase.
    #[must_use]
    pub fn phase(session: &GameSession) -> TurnPhase {
        session.turns.phase()
    }

    /// Winner of the game, once decided.
    #[must_use]
    pub fn winner(session: &GameSession) -> Option<PlayerId> {
        session.turns.phase().winner()
    }

    /// Number of accepted placements made by the player.
    #[must_use]
    pub fn placements(session: &GameSession, player: PlayerId) -> u32 {
        session.turns.placements(player)
    }

    /// Orbs on the board plus orbs carried by projectiles in flight.
    #[must_use]
    pub fn pieces_in_play(session: &GameSession) -> u64 {
        session.board.total_pieces() + session.cascade.len() as u64
    }

    /// Number of ticks processed since the game started.
    #[must_use]
    pub fn tick_index(session: &GameSession) -> u64 {
        session.tick_index
    }
}
