#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system translating pointer confirmations into orb placements.

use chain_reaction_core::{CellCoord, Command, Event, PlayerId, TurnPhase};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementInput {
    /// Indicates whether the player clicked on this frame.
    pub confirm_action: bool,
    /// Cell currently under the pointer, if any.
    pub cursor_cell: Option<CellCoord>,
}

impl PlacementInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(confirm_action: bool, cursor_cell: Option<CellCoord>) -> Self {
        Self {
            confirm_action,
            cursor_cell,
        }
    }
}

/// Tracks whose turn it is from world events and emits placement commands on
/// their behalf.
#[derive(Clone, Debug)]
pub struct Placement {
    phase: TurnPhase,
}

impl Placement {
    /// Creates the system for a session whose current phase is `phase`.
    #[must_use]
    pub const fn new(phase: TurnPhase) -> Self {
        Self { phase }
    }

    /// Phase as last observed through world events.
    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Consumes world events and adapter input to emit placement commands.
    ///
    /// Clicks are dropped while a cascade resolves, after the game has ended,
    /// and when the pointer is outside the board. Ownership is left for the
    /// world to validate.
    pub fn handle(&mut self, events: &[Event], input: PlacementInput, out: &mut Vec<Command>) {
        for event in events {
            match *event {
                Event::BoardConfigured { first_player, .. } => {
                    self.phase = TurnPhase::AwaitingInput(first_player);
                }
                Event::OrbPlaced { .. } => self.phase = TurnPhase::Resolving,
                Event::TurnAdvanced { player } => {
                    self.phase = TurnPhase::AwaitingInput(player);
                }
                Event::GameWon { winner } => self.phase = TurnPhase::GameOver(winner),
                _ => {}
            }
        }

        if !input.confirm_action {
            return;
        }
        let Some(player) = self.phase.player_to_move() else {
            return;
        };
        if let Some(cell) = input.cursor_cell {
            out.push(Command::PlaceOrb { player, cell });
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(TurnPhase::AwaitingInput(PlayerId::First))
    }
}
