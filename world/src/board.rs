//! Static cell occupancy and the explosion rule.

use chain_reaction_core::{
    BoardSize, BoardSnapshot, CellCoord, CellState, Direction, OpeningCell, PlacementError,
    PlayerId,
};

use crate::cascade::Projectile;

/// Dense row-major grid holding the static state of every cell.
///
/// Projectiles never live here; the board only knows about settled orbs and
/// hands out freshly launched projectiles when a cell explodes.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    size: BoardSize,
    cells: Vec<CellState>,
}

/// Outcome of folding an arriving projectile into the board.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Landing {
    /// Owner of the cell before the projectile arrived.
    pub(crate) previous_owner: Option<PlayerId>,
    /// Projectiles released because the landing made the cell explode.
    pub(crate) projectiles: Vec<Projectile>,
}

impl Board {
    /// Creates an empty board of the provided size.
    pub(crate) fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![CellState::Empty; size.cell_count()],
        }
    }

    /// Creates a board pre-populated with a validated opening.
    pub(crate) fn with_opening(size: BoardSize, opening: &[OpeningCell]) -> Self {
        let mut board = Self::new(size);
        for seed in opening {
            if let Some(index) = size.index(seed.cell) {
                board.cells[index] = CellState::Occupied {
                    owner: seed.owner,
                    count: seed.count,
                };
            }
        }
        board
    }

    pub(crate) const fn size(&self) -> BoardSize {
        self.size
    }

    /// State of the cell; cells outside the board read as empty.
    pub(crate) fn get(&self, cell: CellCoord) -> CellState {
        self.size
            .index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or_default()
    }

    pub(crate) fn peek_owner(&self, cell: CellCoord) -> Option<PlayerId> {
        self.get(cell).owner()
    }

    /// Adds one orb for `player`, rejecting opponent cells and off-board targets.
    pub(crate) fn place(
        &mut self,
        player: PlayerId,
        cell: CellCoord,
    ) -> Result<Vec<Projectile>, PlacementError> {
        let index = self.size.index(cell).ok_or(PlacementError::OutOfBounds)?;
        if let Some(owner) = self.cells[index].owner() {
            if owner != player {
                return Err(PlacementError::WrongOwner);
            }
        }
        Ok(self.deposit(index, player, cell))
    }

    /// Folds an arriving projectile into the board, capturing the cell.
    ///
    /// # Panics
    ///
    /// Panics when `cell` lies outside the board. Projectiles are only ever
    /// launched toward in-bounds neighbours, so this signals a broken invariant.
    pub(crate) fn land(&mut self, owner: PlayerId, cell: CellCoord) -> Landing {
        let Some(index) = self.size.index(cell) else {
            panic!("projectile landed outside the board at {cell}");
        };
        let previous_owner = self.cells[index].owner();
        let projectiles = self.deposit(index, owner, cell);
        Landing {
            previous_owner,
            projectiles,
        }
    }

    pub(crate) fn cells_owned_by(&self, player: PlayerId) -> usize {
        self.cells
            .iter()
            .filter(|state| state.owner() == Some(player))
            .count()
    }

    pub(crate) fn total_pieces(&self) -> u64 {
        self.cells.iter().map(|state| u64::from(state.count())).sum()
    }

    pub(crate) fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::new(self.size, self.cells.clone())
    }

    fn deposit(&mut self, index: usize, owner: PlayerId, cell: CellCoord) -> Vec<Projectile> {
        let capacity = self.size.capacity(cell);
        let count = self.cells[index].count() + 1;
        if count < capacity {
            self.cells[index] = CellState::Occupied { owner, count };
            return Vec::new();
        }

        self.cells[index] = CellState::Empty;
        Direction::ALL
            .iter()
            .filter_map(|&direction| {
                self.size
                    .neighbor(cell, direction)
                    .map(|destination| Projectile::launch(owner, cell, direction, destination))
            })
            .collect()
    }
}
