#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Chain Reaction engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative game session, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the session executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values for
//! systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

use std::{collections::HashSet, fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Chain Reaction.";

/// Board side length used when no configuration overrides it.
pub const DEFAULT_BOARD_SIDE: u32 = 5;

/// Number of ticks a projectile needs to travel from its origin to the
/// neighbouring cell.
pub const PROJECTILE_STEPS: u32 = 5;

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discards the current game and starts a new one from the configuration.
    ConfigureBoard {
        /// Validated configuration describing the new game.
        config: GameConfig,
    },
    /// Requests that a player adds one orb to the provided cell.
    PlaceOrb {
        /// Player attempting the placement.
        player: PlayerId,
        /// Target cell of the placement.
        cell: CellCoord,
    },
    /// Advances every in-flight projectile by a single step.
    Tick {
        /// Wall-clock time the scheduler attributes to the tick. Projectile
        /// motion ignores it; every tick moves projectiles by one step.
        dt: Duration,
    },
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that a new game started on a board of the provided size.
    BoardConfigured {
        /// Size of the freshly configured board.
        size: BoardSize,
        /// Player that moves first.
        first_player: PlayerId,
    },
    /// Indicates that the simulation clock advanced by one tick.
    TimeAdvanced {
        /// Duration reported by the scheduler for the tick.
        dt: Duration,
    },
    /// Confirms that a player placement was accepted.
    OrbPlaced {
        /// Player that placed the orb.
        player: PlayerId,
        /// Cell that received the orb.
        cell: CellCoord,
        /// Number of projectiles released because the cell exploded.
        spawned: u32,
    },
    /// Reports that a placement request was rejected without mutating state.
    PlacementRejected {
        /// Player that attempted the placement.
        player: PlayerId,
        /// Cell targeted by the placement.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a cell reached its capacity and exploded.
    CellExploded {
        /// Owner of the exploding cell and of every projectile it released.
        owner: PlayerId,
        /// Cell that exploded.
        cell: CellCoord,
        /// Number of projectiles released, equal to the cell's capacity.
        projectiles: u32,
    },
    /// Confirms that a projectile arrived and was folded into the board.
    ProjectileLanded {
        /// Owner of the projectile.
        owner: PlayerId,
        /// Cell the projectile landed on.
        cell: CellCoord,
    },
    /// Reports that a landing projectile took over an opponent's cell.
    CellCaptured {
        /// Cell whose owner changed.
        cell: CellCoord,
        /// Previous owner of the cell.
        from: PlayerId,
        /// New owner of the cell.
        to: PlayerId,
    },
    /// Announces that the cascade started by the last placement has settled.
    CascadeSettled {
        /// Number of ticks the cascade needed to settle.
        ticks: u64,
    },
    /// Announces that input is unlocked for the provided player.
    TurnAdvanced {
        /// Player expected to place next.
        player: PlayerId,
    },
    /// Announces that the game ended.
    GameWon {
        /// Player that eliminated the opponent.
        winner: PlayerId,
    },
}

/// Identifier of one of the two players.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlayerId {
    /// Player 0.
    First,
    /// Player 1.
    Second,
}

impl PlayerId {
    /// Both players in seat order.
    pub const ALL: [PlayerId; 2] = [PlayerId::First, PlayerId::Second];

    /// Resolves a player from its zero-based seat index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            _ => None,
        }
    }

    /// Zero-based seat index of the player.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.index())
    }
}

/// Cardinal directions a projectile may travel in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Travel toward decreasing row indices.
    Up,
    /// Travel toward increasing column indices.
    Right,
    /// Travel toward increasing row indices.
    Down,
    /// Travel toward decreasing column indices.
    Left,
}

impl Direction {
    /// Directions in the order exploding cells release projectiles.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Column and row delta of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Continuous position measured in cell units, used for projectiles in flight.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CellPoint {
    column: f32,
    row: f32,
}

impl CellPoint {
    /// Creates a new fractional cell position.
    #[must_use]
    pub const fn new(column: f32, row: f32) -> Self {
        Self { column, row }
    }

    /// Column component measured in cells.
    #[must_use]
    pub const fn column(&self) -> f32 {
        self.column
    }

    /// Row component measured in cells.
    #[must_use]
    pub const fn row(&self) -> f32 {
        self.row
    }
}

/// Side length of the square board.
///
/// Boards smaller than [`BoardSize::MIN_SIDE`] are rejected because a single
/// cell has no neighbours and could never hold a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BoardSize(u32);

impl BoardSize {
    /// Smallest supported side length.
    pub const MIN_SIDE: u32 = 2;
    /// Largest supported side length.
    pub const MAX_SIDE: u32 = 64;

    /// Creates a board size, validating the side length.
    pub fn new(side: u32) -> Result<Self, ConfigError> {
        if (Self::MIN_SIDE..=Self::MAX_SIDE).contains(&side) {
            Ok(Self(side))
        } else {
            Err(ConfigError::InvalidBoardSize { side })
        }
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.0
    }

    /// Total number of cells on the board.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        (self.0 as usize) * (self.0 as usize)
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.0 && cell.row() < self.0
    }

    /// Row-major index of the cell, if it lies on the board.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.0).ok()?;
        Some(row * width + column)
    }

    /// Neighbouring cell one step away in the provided direction.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        if !self.contains(cell) {
            return None;
        }
        let (dx, dy) = direction.offset();
        let column = cell.column().checked_add_signed(dx)?;
        let row = cell.row().checked_add_signed(dy)?;
        let neighbor = CellCoord::new(column, row);
        self.contains(neighbor).then_some(neighbor)
    }

    /// Number of orthogonal in-bounds neighbours of the cell.
    ///
    /// Corners hold two, edges three and interior cells four. A cell explodes
    /// once its piece count reaches this value.
    #[must_use]
    pub fn capacity(&self, cell: CellCoord) -> u32 {
        Direction::ALL
            .iter()
            .filter(|direction| self.neighbor(cell, **direction).is_some())
            .count() as u32
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let side = self.0;
        (0..side).flat_map(move |row| (0..side).map(move |column| CellCoord::new(column, row)))
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self(DEFAULT_BOARD_SIDE)
    }
}

impl TryFrom<u32> for BoardSize {
    type Error = ConfigError;

    fn try_from(side: u32) -> Result<Self, Self::Error> {
        Self::new(side)
    }
}

impl From<BoardSize> for u32 {
    fn from(size: BoardSize) -> Self {
        size.0
    }
}

/// Static occupancy of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    /// No player owns the cell.
    #[default]
    Empty,
    /// The cell holds `count` orbs belonging to `owner`.
    Occupied {
        /// Player owning every orb in the cell.
        owner: PlayerId,
        /// Number of orbs in the cell, always at least one.
        count: u32,
    },
}

impl CellState {
    /// Owner of the cell, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        match self {
            Self::Empty => None,
            Self::Occupied { owner, .. } => Some(*owner),
        }
    }

    /// Number of orbs held by the cell; zero when empty.
    #[must_use]
    pub const fn count(&self) -> u32 {
        match self {
            Self::Empty => 0,
            Self::Occupied { count, .. } => *count,
        }
    }

    /// Reports whether no player owns the cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Turn state of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// Input is unlocked for the provided player.
    AwaitingInput(PlayerId),
    /// A cascade is in flight; all placements are rejected.
    Resolving,
    /// The game ended; no further placements are accepted.
    GameOver(PlayerId),
}

impl TurnPhase {
    /// Player allowed to place, if input is unlocked.
    #[must_use]
    pub const fn player_to_move(&self) -> Option<PlayerId> {
        match self {
            Self::AwaitingInput(player) => Some(*player),
            Self::Resolving | Self::GameOver(_) => None,
        }
    }

    /// Winner of the game, once decided.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        match self {
            Self::GameOver(winner) => Some(*winner),
            Self::AwaitingInput(_) | Self::Resolving => None,
        }
    }
}

/// Reasons a placement request may be rejected by the session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum PlacementError {
    /// The requested cell lies outside the board.
    #[error("cell lies outside the board")]
    OutOfBounds,
    /// The cell belongs to the opponent, or the player is not on turn.
    #[error("cell or turn belongs to the other player")]
    WrongOwner,
    /// A cascade is resolving or the game is over.
    #[error("input is locked")]
    InputLocked,
}

/// Errors raised while validating a [`GameConfig`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Board side length outside the supported range.
    #[error(
        "board size {side} is outside the supported range {}..={}",
        BoardSize::MIN_SIDE,
        BoardSize::MAX_SIDE
    )]
    InvalidBoardSize {
        /// Rejected side length.
        side: u32,
    },
    /// An opening cell lies outside the board.
    #[error("opening cell {cell} lies outside the board")]
    OpeningOutOfBounds {
        /// Offending cell.
        cell: CellCoord,
    },
    /// An opening cell holds no orbs or would already explode.
    #[error("opening cell {cell} holds {count} orbs but must hold 1..{capacity}")]
    OpeningAtCapacity {
        /// Offending cell.
        cell: CellCoord,
        /// Requested orb count.
        count: u32,
        /// Capacity of the cell.
        capacity: u32,
    },
    /// The same cell appears twice in the opening.
    #[error("opening cell {cell} is listed more than once")]
    DuplicateOpeningCell {
        /// Offending cell.
        cell: CellCoord,
    },
}

/// Pre-populated cell applied when a game starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpeningCell {
    /// Cell receiving the orbs.
    pub cell: CellCoord,
    /// Owner of the orbs.
    pub owner: PlayerId,
    /// Number of orbs, strictly below the cell's capacity.
    pub count: u32,
}

/// Parameters that start a new game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square board.
    pub size: BoardSize,
    /// Player that moves first; derived from `seed` when absent.
    pub first_player: Option<PlayerId>,
    /// Seed used to pick the first player when none is configured.
    pub seed: u64,
    /// Cells populated before the first placement.
    pub opening: Vec<OpeningCell>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: BoardSize::default(),
            first_player: Some(PlayerId::First),
            seed: 0,
            opening: Vec::new(),
        }
    }
}

impl GameConfig {
    /// Creates a configuration for an empty board where `first_player` opens.
    #[must_use]
    pub fn new(size: BoardSize, first_player: PlayerId) -> Self {
        Self {
            size,
            first_player: Some(first_player),
            ..Self::default()
        }
    }

    /// Adds a pre-populated cell to the opening.
    #[must_use]
    pub fn with_opening(mut self, cell: CellCoord, owner: PlayerId, count: u32) -> Self {
        self.opening.push(OpeningCell { cell, owner, count });
        self
    }

    /// Checks that every opening cell is on the board, unique, and stable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::with_capacity(self.opening.len());
        for opening in &self.opening {
            if !self.size.contains(opening.cell) {
                return Err(ConfigError::OpeningOutOfBounds { cell: opening.cell });
            }
            if !seen.insert(opening.cell) {
                return Err(ConfigError::DuplicateOpeningCell { cell: opening.cell });
            }
            let capacity = self.size.capacity(opening.cell);
            if opening.count == 0 || opening.count >= capacity {
                return Err(ConfigError::OpeningAtCapacity {
                    cell: opening.cell,
                    count: opening.count,
                    capacity,
                });
            }
        }
        Ok(())
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Player owning the carried orb.
    pub owner: PlayerId,
    /// Cell the projectile departed from.
    pub origin: CellCoord,
    /// Direction of travel.
    pub direction: Direction,
    /// Cell the projectile lands on.
    pub destination: CellCoord,
    /// Fraction of the journey completed, in `0.0..=1.0`.
    pub progress: f32,
    /// Current position measured in cells.
    pub position: CellPoint,
}

/// Read-only snapshot describing every projectile in flight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new view from snapshots already in insertion order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ProjectileSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectile is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Read-only copy of the board's static cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardSnapshot {
    size: BoardSize,
    cells: Vec<CellState>,
}

impl BoardSnapshot {
    /// Captures a snapshot from row-major cells.
    #[must_use]
    pub fn new(size: BoardSize, cells: Vec<CellState>) -> Self {
        debug_assert_eq!(cells.len(), size.cell_count());
        Self { size, cells }
    }

    /// Size of the captured board.
    #[must_use]
    pub const fn size(&self) -> BoardSize {
        self.size
    }

    /// State of the provided cell; out-of-bounds cells read as empty.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> CellState {
        self.size
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or_default()
    }

    /// Iterator over every cell and its state in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellState)> + '_ {
        self.size.cells().zip(self.cells.iter().copied())
    }

    /// Number of cells owned by the player.
    #[must_use]
    pub fn cells_owned_by(&self, player: PlayerId) -> usize {
        self.cells
            .iter()
            .filter(|state| state.owner() == Some(player))
            .count()
    }

    /// Sum of the orbs held by every cell.
    #[must_use]
    pub fn total_pieces(&self) -> u64 {
        self.cells.iter().map(|state| u64::from(state.count())).sum()
    }

    /// Reports whether every occupied cell sits below its capacity.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.iter()
            .all(|(cell, state)| state.count() < self.size.capacity(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn size(side: u32) -> BoardSize {
        BoardSize::new(side).expect("valid size")
    }

    #[test]
    fn capacity_matches_neighbour_count_for_every_supported_size() {
        for side in [2, 3, 5, 8] {
            let board = size(side);
            let last = side - 1;
            for cell in board.cells() {
                let on_column_edge = cell.column() == 0 || cell.column() == last;
                let on_row_edge = cell.row() == 0 || cell.row() == last;
                let expected = match (on_column_edge, on_row_edge) {
                    (true, true) => 2,
                    (true, false) | (false, true) => 3,
                    (false, false) => 4,
                };
                assert_eq!(board.capacity(cell), expected, "cell {cell} on {side}x{side}");
            }
        }
    }

    #[test]
    fn neighbor_respects_board_edges() {
        let board = size(3);
        let corner = CellCoord::new(0, 0);
        assert_eq!(board.neighbor(corner, Direction::Up), None);
        assert_eq!(board.neighbor(corner, Direction::Left), None);
        assert_eq!(
            board.neighbor(corner, Direction::Right),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            board.neighbor(corner, Direction::Down),
            Some(CellCoord::new(0, 1))
        );
        assert_eq!(board.neighbor(CellCoord::new(3, 0), Direction::Left), None);
    }

    #[test]
    fn board_size_rejects_degenerate_sides() {
        assert_eq!(
            BoardSize::new(1),
            Err(ConfigError::InvalidBoardSize { side: 1 })
        );
        assert!(BoardSize::new(0).is_err());
        assert!(BoardSize::new(BoardSize::MAX_SIDE + 1).is_err());
        assert_eq!(BoardSize::default().side(), DEFAULT_BOARD_SIDE);
    }

    #[test]
    fn cells_iterate_in_row_major_order() {
        let cells: Vec<CellCoord> = size(2).cells().collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 1),
            ]
        );
    }

    #[test]
    fn player_opponent_alternates() {
        assert_eq!(PlayerId::First.opponent(), PlayerId::Second);
        assert_eq!(PlayerId::Second.opponent(), PlayerId::First);
        assert_eq!(PlayerId::from_index(1), Some(PlayerId::Second));
        assert_eq!(PlayerId::from_index(2), None);
        assert_eq!(PlayerId::Second.to_string(), "Player 1");
    }

    #[test]
    fn config_validation_rejects_unstable_opening() {
        let config = GameConfig::new(size(3), PlayerId::First).with_opening(
            CellCoord::new(0, 0),
            PlayerId::Second,
            2,
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::OpeningAtCapacity {
                cell: CellCoord::new(0, 0),
                count: 2,
                capacity: 2,
            })
        );
    }

    #[test]
    fn config_validation_rejects_duplicates_and_out_of_bounds() {
        let duplicate = GameConfig::new(size(3), PlayerId::First)
            .with_opening(CellCoord::new(1, 1), PlayerId::First, 1)
            .with_opening(CellCoord::new(1, 1), PlayerId::Second, 1);
        assert_eq!(
            duplicate.validate(),
            Err(ConfigError::DuplicateOpeningCell {
                cell: CellCoord::new(1, 1)
            })
        );

        let outside = GameConfig::new(size(3), PlayerId::First).with_opening(
            CellCoord::new(3, 0),
            PlayerId::First,
            1,
        );
        assert!(matches!(
            outside.validate(),
            Err(ConfigError::OpeningOutOfBounds { .. })
        ));
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn board_snapshot_reports_totals() {
        let board = size(2);
        let snapshot = BoardSnapshot::new(
            board,
            vec![
                CellState::Occupied {
                    owner: PlayerId::First,
                    count: 1,
                },
                CellState::Empty,
                CellState::Empty,
                CellState::Occupied {
                    owner: PlayerId::Second,
                    count: 1,
                },
            ],
        );
        assert_eq!(snapshot.total_pieces(), 2);
        assert_eq!(snapshot.cells_owned_by(PlayerId::First), 1);
        assert_eq!(snapshot.get(CellCoord::new(5, 5)), CellState::Empty);
        assert!(snapshot.is_stable());
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::WrongOwner);
    }

    #[test]
    fn cell_state_round_trips_through_bincode() {
        assert_round_trip(&CellState::Occupied {
            owner: PlayerId::Second,
            count: 3,
        });
    }

    #[test]
    fn game_config_round_trips_through_bincode() {
        let config = GameConfig::new(size(4), PlayerId::Second).with_opening(
            CellCoord::new(1, 2),
            PlayerId::First,
            2,
        );
        assert_round_trip(&config);
    }

    #[test]
    fn board_size_deserialization_validates_side() {
        let bytes = bincode::serialize(&1_u32).expect("serialize");
        let restored: Result<BoardSize, _> = bincode::deserialize(&bytes);
        assert!(restored.is_err());
    }

    #[test]
    fn placement_error_messages_are_readable() {
        assert_eq!(PlacementError::InputLocked.to_string(), "input is locked");
    }
}
