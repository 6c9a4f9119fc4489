#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Chain Reaction adapters.

use anyhow::Result as AnyResult;
use chain_reaction_core::{
    BoardSnapshot, CellCoord, CellPoint, CellState, PlayerId, ProjectileView, TurnPhase,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Color used for the pieces and projectiles of `player`.
#[must_use]
pub const fn player_color(player: PlayerId) -> Color {
    match player {
        PlayerId::First => Color::from_rgb_u8(232, 72, 85),
        PlayerId::Second => Color::from_rgb_u8(46, 134, 222),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer position expressed in board world units, if the pointer is over the window.
    pub cursor_world_space: Option<Vec2>,
    /// Whether the adapter detected a placement click on this frame.
    pub confirm_action: bool,
    /// Whether the adapter detected a restart request on this frame.
    pub restart_action: bool,
}

/// Describes the square board grid that adapters draw and map pointers onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Number of cells along each board edge.
    pub side: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl BoardPresentation {
    /// Creates a new board descriptor.
    ///
    /// Returns an error when the board has no cells or `cell_length` is not a
    /// positive finite number.
    pub fn new(
        side: u32,
        cell_length: f32,
        line_color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if side == 0 {
            return Err(RenderingError::EmptyBoard);
        }
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            side,
            cell_length,
            line_color,
        })
    }

    /// Total width (and height) of the board in world units.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.side as f32 * self.cell_length
    }

    /// Maps a world-space position to the cell underneath it.
    ///
    /// Returns `None` when the position lies outside the board.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        let extent = self.extent();
        if !(0.0..extent).contains(&position.x) || !(0.0..extent).contains(&position.y) {
            return None;
        }

        let column = (position.x / self.cell_length).floor() as u32;
        let row = (position.y / self.cell_length).floor() as u32;
        Some(CellCoord::new(
            column.min(self.side - 1),
            row.min(self.side - 1),
        ))
    }

    /// World-space center of `cell`.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.point_center(CellPoint::new(cell.column() as f32, cell.row() as f32))
    }

    /// World-space center of a fractional cell position.
    #[must_use]
    pub fn point_center(&self, point: CellPoint) -> Vec2 {
        Vec2::new(
            (point.column() + 0.5) * self.cell_length,
            (point.row() + 0.5) * self.cell_length,
        )
    }
}

/// Occupied cell ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPresentation {
    /// Board cell holding the pieces.
    pub cell: CellCoord,
    /// Player owning the pieces.
    pub owner: PlayerId,
    /// Number of pieces stacked on the cell.
    pub count: u32,
    /// Piece count at which the cell explodes.
    pub capacity: u32,
    /// Fill color derived from the owner.
    pub color: Color,
}

impl CellPresentation {
    /// Whether one more piece would make the cell explode.
    #[must_use]
    pub const fn is_critical(&self) -> bool {
        self.count + 1 >= self.capacity
    }
}

/// Projectile in flight, positioned in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Player the projectile will capture for.
    pub owner: PlayerId,
    /// Current world-space center.
    pub position: Vec2,
    /// Fill color derived from the owner.
    pub color: Color,
}

/// Scene description combining the board, its pieces and the turn status.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid that composes the play area.
    pub board: BoardPresentation,
    /// Occupied cells in row-major order.
    pub cells: Vec<CellPresentation>,
    /// Projectiles currently travelling between cells.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Turn phase the scene was populated from.
    pub phase: TurnPhase,
    /// Cell under the pointer, highlighted when it accepts a placement.
    pub hovered_cell: Option<CellCoord>,
}

impl Scene {
    /// Creates an empty scene for `board`, waiting for `phase`.
    #[must_use]
    pub fn new(board: BoardPresentation, phase: TurnPhase) -> Self {
        Self {
            board,
            cells: Vec::new(),
            projectiles: Vec::new(),
            phase,
            hovered_cell: None,
        }
    }

    /// Rebuilds the scene content from world snapshots.
    pub fn populate(
        &mut self,
        board: &BoardSnapshot,
        projectiles: &ProjectileView,
        phase: TurnPhase,
    ) {
        let size = board.size();
        self.cells.clear();
        self.cells
            .extend(board.iter().filter_map(|(cell, state)| match state {
                CellState::Empty => None,
                CellState::Occupied { owner, count } => Some(CellPresentation {
                    cell,
                    owner,
                    count,
                    capacity: size.capacity(cell),
                    color: player_color(owner),
                }),
            }));

        self.projectiles.clear();
        self.projectiles
            .extend(projectiles.iter().map(|projectile| ProjectilePresentation {
                owner: projectile.owner,
                position: self.board.point_center(projectile.position),
                color: player_color(projectile.owner),
            }));

        self.phase = phase;
    }

    /// Human-readable line describing the turn phase.
    #[must_use]
    pub fn status_text(&self) -> String {
        match self.phase {
            TurnPhase::AwaitingInput(player) => format!("{player} to move"),
            TurnPhase::Resolving => "Resolving...".to_owned(),
            TurnPhase::GameOver(winner) => format!("{winner} wins! Press R to restart"),
        }
    }

    /// Color associated with the status line.
    #[must_use]
    pub fn status_color(&self) -> Color {
        match self.phase {
            TurnPhase::AwaitingInput(player) | TurnPhase::GameOver(player) => {
                player_color(player)
            }
            TurnPhase::Resolving => Color::from_rgb_u8(200, 200, 200),
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Chain Reaction scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and repopulates the scene
    /// before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Boards must contain at least one cell.
    EmptyBoard,
    /// Cell length must be positive and finite.
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBoard => write!(f, "board must contain at least one cell"),
            Self::InvalidCellLength { cell_length } => {
                write!(
                    f,
                    "cell_length must be positive and finite (received {cell_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_reaction_core::{BoardSize, Direction, ProjectileSnapshot};

    fn board(side: u32) -> BoardPresentation {
        BoardPresentation::new(side, 32.0, Color::from_rgb_u8(0, 0, 0)).expect("valid board")
    }

    #[test]
    fn board_creation_rejects_degenerate_geometry() {
        let black = Color::from_rgb_u8(0, 0, 0);

        assert_eq!(
            BoardPresentation::new(0, 32.0, black),
            Err(RenderingError::EmptyBoard)
        );
        assert!(matches!(
            BoardPresentation::new(5, 0.0, black),
            Err(RenderingError::InvalidCellLength { .. })
        ));
        assert!(BoardPresentation::new(5, f32::NAN, black).is_err());
    }

    #[test]
    fn cell_at_maps_pointer_to_cell() {
        let board = board(5);

        assert_eq!(
            board.cell_at(Vec2::new(0.0, 0.0)),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(
            board.cell_at(Vec2::new(70.0, 33.0)),
            Some(CellCoord::new(2, 1))
        );
        assert_eq!(
            board.cell_at(Vec2::new(159.9, 159.9)),
            Some(CellCoord::new(4, 4))
        );
    }

    #[test]
    fn cell_at_rejects_positions_outside_the_board() {
        let board = board(5);

        assert_eq!(board.cell_at(Vec2::new(-0.1, 10.0)), None);
        assert_eq!(board.cell_at(Vec2::new(10.0, 160.0)), None);
        assert_eq!(board.cell_at(Vec2::new(200.0, 10.0)), None);
    }

    #[test]
    fn cell_center_round_trips_through_cell_at() {
        let board = board(4);
        for cell in BoardSize::new(4).expect("valid size").cells() {
            assert_eq!(board.cell_at(board.cell_center(cell)), Some(cell));
        }
    }

    #[test]
    fn populate_skips_empty_cells_and_positions_projectiles() {
        let size = BoardSize::new(2).expect("valid size");
        let snapshot = BoardSnapshot::new(
            size,
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
        let projectiles = ProjectileView::from_snapshots(vec![ProjectileSnapshot {
            owner: PlayerId::Second,
            origin: CellCoord::new(1, 1),
            direction: Direction::Up,
            destination: CellCoord::new(1, 0),
            progress: 0.5,
            position: CellPoint::new(1.0, 0.5),
        }]);
        let mut scene = Scene::new(board(2), TurnPhase::AwaitingInput(PlayerId::First));

        scene.populate(&snapshot, &projectiles, TurnPhase::Resolving);

        assert_eq!(scene.cells.len(), 2);
        assert_eq!(scene.cells[0].cell, CellCoord::new(0, 0));
        assert_eq!(scene.cells[0].capacity, 2);
        assert!(scene.cells[0].is_critical());
        assert_eq!(scene.cells[1].color, player_color(PlayerId::Second));
        assert_eq!(scene.projectiles.len(), 1);
        assert_eq!(scene.projectiles[0].position, Vec2::new(48.0, 32.0));
        assert_eq!(scene.status_text(), "Resolving...");
    }

    #[test]
    fn status_text_names_the_player() {
        let mut scene = Scene::new(board(3), TurnPhase::AwaitingInput(PlayerId::Second));
        assert_eq!(scene.status_text(), "Player 1 to move");

        scene.phase = TurnPhase::GameOver(PlayerId::First);
        assert_eq!(scene.status_text(), "Player 0 wins! Press R to restart");
        assert_eq!(scene.status_color(), player_color(PlayerId::First));
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::new(0.0, 0.5, 1.0, 0.25).lighten(0.5);

        assert_eq!(color, Color::new(0.5, 0.75, 1.0, 0.25));
    }
}
