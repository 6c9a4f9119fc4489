#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Chain Reaction.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the crate depends on macroquad without its default `audio`
//! feature.

use anyhow::Result;
use chain_reaction_rendering::{
    BoardPresentation, CellPresentation, Color, FrameInput, Presentation,
    ProjectilePresentation, RenderingBackend, Scene,
};
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use std::{f32::consts::TAU, time::Duration};

const DEFAULT_WINDOW_SIZE: (i32, i32) = (640, 700);
const STATUS_BAR_HEIGHT: f32 = 56.0;
const STATUS_FONT_SIZE: f32 = 30.0;
const BOARD_MARGIN: f32 = 16.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `R` starts a new game.
    restart: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            restart: is_key_pressed(KeyCode::R),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    window_size: (i32, i32),
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures the initial window size in pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            window_size: (window_width, window_height),
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let frame_input = gather_frame_input(&metrics_before, keyboard);

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_hovered_cell(&scene, &metrics);
                draw_board_grid(&scene.board, &metrics);
                draw_cells(&scene.cells, &scene.board, &metrics);
                draw_projectiles(&scene.projectiles, &scene.board, &metrics);
                draw_status(&scene, screen_width);

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Screen-space placement of the board for the current window size.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    board_extent_scaled: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let extent = scene.board.extent();
        let available_width = (screen_width - 2.0 * BOARD_MARGIN).max(0.0);
        let available_height = (screen_height - STATUS_BAR_HEIGHT - 2.0 * BOARD_MARGIN).max(0.0);
        let scale = if extent <= f32::EPSILON {
            1.0
        } else {
            (available_width / extent).min(available_height / extent)
        };

        let board_extent_scaled = extent * scale;
        let offset = Vec2::new(
            (screen_width - board_extent_scaled) * 0.5,
            STATUS_BAR_HEIGHT + (screen_height - STATUS_BAR_HEIGHT - board_extent_scaled) * 0.5,
        );

        Self {
            scale,
            offset,
            board_extent_scaled,
        }
    }

    fn to_screen(&self, world: Vec2) -> Vec2 {
        self.offset + world * self.scale
    }

    fn to_world(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        Some((screen - self.offset) / self.scale)
    }
}

fn gather_frame_input(metrics: &SceneMetrics, keyboard: KeyboardShortcuts) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    gather_frame_input_from_observations(
        metrics,
        Vec2::new(cursor_x, cursor_y),
        is_mouse_button_pressed(MouseButton::Left),
        keyboard.restart,
    )
}

fn gather_frame_input_from_observations(
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    confirm_click: bool,
    restart: bool,
) -> FrameInput {
    FrameInput {
        cursor_world_space: metrics.to_world(cursor_position),
        confirm_action: confirm_click,
        restart_action: restart,
    }
}

fn draw_hovered_cell(scene: &Scene, metrics: &SceneMetrics) {
    if scene.phase.player_to_move().is_none() {
        return;
    }
    let Some(cell) = scene.hovered_cell else {
        return;
    };

    let length = scene.board.cell_length * metrics.scale;
    let origin = metrics.to_screen(Vec2::new(
        cell.column() as f32 * scene.board.cell_length,
        cell.row() as f32 * scene.board.cell_length,
    ));
    let highlight = scene.board.line_color.lighten(0.2);
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        length,
        length,
        to_macroquad_color(Color { alpha: 0.35, ..highlight }),
    );
}

fn draw_board_grid(board: &BoardPresentation, metrics: &SceneMetrics) {
    let color = to_macroquad_color(board.line_color);
    let step = board.cell_length * metrics.scale;
    let start = metrics.offset;
    let end = metrics.offset + Vec2::splat(metrics.board_extent_scaled);

    for line in 0..=board.side {
        let along = line as f32 * step;
        macroquad::shapes::draw_line(
            start.x + along,
            start.y,
            start.x + along,
            end.y,
            1.0,
            color,
        );
        macroquad::shapes::draw_line(
            start.x,
            start.y + along,
            end.x,
            start.y + along,
            1.0,
            color,
        );
    }
}

fn draw_cells(cells: &[CellPresentation], board: &BoardPresentation, metrics: &SceneMetrics) {
    let cell_step = board.cell_length * metrics.scale;
    let radius = (cell_step * 0.16).max(2.0);

    for cell in cells {
        let center = metrics.to_screen(board.cell_center(cell.cell));
        let color = if cell.is_critical() {
            cell.color.lighten(0.25)
        } else {
            cell.color
        };
        for offset in orb_offsets(cell.count) {
            let position = center + offset * cell_step;
            macroquad::shapes::draw_circle(
                position.x,
                position.y,
                radius,
                to_macroquad_color(color),
            );
        }
    }
}

fn draw_projectiles(
    projectiles: &[ProjectilePresentation],
    board: &BoardPresentation,
    metrics: &SceneMetrics,
) {
    let radius = (board.cell_length * metrics.scale * 0.12).max(2.0);

    for projectile in projectiles {
        let position = metrics.to_screen(projectile.position);
        macroquad::shapes::draw_circle(
            position.x,
            position.y,
            radius,
            to_macroquad_color(projectile.color.lighten(0.15)),
        );
    }
}

fn draw_status(scene: &Scene, screen_width: f32) {
    let text = scene.status_text();
    let dimensions = macroquad::text::measure_text(&text, None, STATUS_FONT_SIZE as u16, 1.0);
    let x = ((screen_width - dimensions.width) * 0.5).max(0.0);
    let y = (STATUS_BAR_HEIGHT + dimensions.height) * 0.5;
    macroquad::text::draw_text(
        &text,
        x,
        y,
        STATUS_FONT_SIZE,
        to_macroquad_color(scene.status_color()),
    );
}

/// Offsets of each stacked piece from the cell center, in cell lengths.
fn orb_offsets(count: u32) -> Vec<Vec2> {
    match count {
        0 => Vec::new(),
        1 => vec![Vec2::ZERO],
        _ => (0..count)
            .map(|index| {
                let angle = TAU * index as f32 / count as f32;
                Vec2::new(angle.cos(), angle.sin()) * 0.2
            })
            .collect(),
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
