use anyhow::{Context, Result};
use chain_reaction_rendering::{
    BoardPresentation, Color, FrameInput, Presentation, RenderingBackend, Scene,
};
use chain_reaction_rendering_macroquad::MacroquadBackend;
use chain_reaction_system_input::PlacementInput;
use chain_reaction_world::query;

use crate::{config::AppConfig, simulation::Simulation};

const WINDOW_TITLE: &str = "Chain Reaction";
const CELL_LENGTH: f32 = 100.0;

/// Opens the game window and runs until the player quits.
pub(crate) fn run(app_config: &AppConfig, mut simulation: Simulation) -> Result<()> {
    let side = query::board_size(simulation.session()).side();
    let board = BoardPresentation::new(side, CELL_LENGTH, Color::from_rgb_u8(90, 90, 100))
        .context("failed to describe the board")?;
    let mut scene = Scene::new(board, query::phase(simulation.session()));
    refresh(&mut scene, &simulation);

    let backend = MacroquadBackend::new()
        .with_vsync(app_config.display.vsync)
        .with_window_size(app_config.display.window_width, app_config.display.window_height);
    let presentation = Presentation::new(WINDOW_TITLE, Color::from_rgb_u8(16, 16, 16), scene);

    backend.run(presentation, move |frame_dt, input, scene| {
        let FrameInput {
            cursor_world_space,
            confirm_action,
            restart_action,
        } = input;
        let cursor_cell = cursor_world_space.and_then(|position| scene.board.cell_at(position));

        simulation.advance(
            frame_dt,
            restart_action,
            PlacementInput::new(confirm_action, cursor_cell),
        );

        scene.hovered_cell = cursor_cell;
        refresh(scene, &simulation);
    })
}

fn refresh(scene: &mut Scene, simulation: &Simulation) {
    let session = simulation.session();
    scene.populate(
        &query::board_snapshot(session),
        &query::projectile_snapshot(session),
        query::phase(session),
    );
}
