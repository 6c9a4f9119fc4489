//! Turn bookkeeping, input locking and win detection.

use chain_reaction_core::{PlacementError, PlayerId, TurnPhase};

use crate::{board::Board, cascade::CascadeEngine};

/// State machine tracking whose turn it is and whether the game ended.
#[derive(Clone, Debug)]
pub(crate) struct TurnController {
    phase: TurnPhase,
    last_mover: PlayerId,
    placements: [u32; 2],
}

impl TurnController {
    pub(crate) const fn new(first_player: PlayerId) -> Self {
        Self {
            phase: TurnPhase::AwaitingInput(first_player),
            last_mover: first_player.opponent(),
            placements: [0; 2],
        }
    }

    pub(crate) const fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub(crate) const fn placements(&self, player: PlayerId) -> u32 {
        self.placements[player.index()]
    }

    /// Checks that `player` may place right now.
    pub(crate) fn authorize(&self, player: PlayerId) -> Result<(), PlacementError> {
        match self.phase {
            TurnPhase::AwaitingInput(expected) if expected == player => Ok(()),
            TurnPhase::AwaitingInput(_) => Err(PlacementError::WrongOwner),
            TurnPhase::Resolving | TurnPhase::GameOver(_) => Err(PlacementError::InputLocked),
        }
    }

    /// Records an accepted placement and locks input until the cascade settles.
    pub(crate) fn begin_resolving(&mut self, player: PlayerId) {
        self.placements[player.index()] = self.placements[player.index()].saturating_add(1);
        self.last_mover = player;
        self.phase = TurnPhase::Resolving;
    }

    /// Leaves `Resolving` once the outcome of the running cascade is known.
    ///
    /// Returns the new phase when a transition happened.
    pub(crate) fn settle(&mut self, board: &Board, cascade: &CascadeEngine) -> Option<TurnPhase> {
        if self.phase != TurnPhase::Resolving {
            return None;
        }

        let next = if let Some(winner) = self.decided_winner(board, cascade) {
            TurnPhase::GameOver(winner)
        } else if cascade.is_quiescent() {
            TurnPhase::AwaitingInput(self.last_mover.opponent())
        } else {
            return None;
        };
        self.phase = next;
        Some(next)
    }

    /// A player has lost once they own no cell and no projectile in flight,
    /// provided both players already placed at least once. Nothing can hand
    /// pieces back to such a player, so the verdict holds even mid-cascade.
    fn decided_winner(&self, board: &Board, cascade: &CascadeEngine) -> Option<PlayerId> {
        if self.placements.iter().any(|count| *count == 0) {
            return None;
        }

        let holdings =
            |player: PlayerId| board.cells_owned_by(player) + cascade.in_flight_owned_by(player);

        [self.last_mover, self.last_mover.opponent()]
            .into_iter()
            .find(|candidate| holdings(*candidate) > 0 && holdings(candidate.opponent()) == 0)
    }
}
