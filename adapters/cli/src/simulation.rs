use std::time::Duration;

use chain_reaction_core::{
    CellCoord, Command, ConfigError, Event, GameConfig, PlacementError, PlayerId,
};
use chain_reaction_system_input::{Placement, PlacementInput};
use chain_reaction_system_scheduler::{Config as SchedulerConfig, Scheduler};
use chain_reaction_world::{self as world, query, GameSession};
use log::warn;

/// Placement the world refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rejection {
    pub(crate) player: PlayerId,
    pub(crate) cell: CellCoord,
    pub(crate) reason: PlacementError,
}

/// Frame pipeline wiring the input and scheduler systems to a game session.
#[derive(Debug)]
pub(crate) struct Simulation {
    session: GameSession,
    placement: Placement,
    scheduler: Scheduler,
    events: Vec<Event>,
    rejections: Vec<Rejection>,
}

impl Simulation {
    pub(crate) fn new(
        config: GameConfig,
        scheduler: SchedulerConfig,
    ) -> Result<Self, ConfigError> {
        let session = GameSession::with_config(config)?;
        let placement = Placement::new(query::phase(&session));
        Ok(Self {
            session,
            placement,
            scheduler: Scheduler::new(scheduler),
            events: Vec::new(),
            rejections: Vec::new(),
        })
    }

    pub(crate) fn session(&self) -> &GameSession {
        &self.session
    }

    pub(crate) fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    /// Runs one frame: optional restart, player input, then scheduled ticks.
    ///
    /// Events produced during the frame are handed to the systems on the next
    /// call.
    pub(crate) fn advance(&mut self, frame_dt: Duration, restart: bool, input: PlacementInput) {
        if restart {
            let config = query::config(&self.session).clone();
            world::apply(
                &mut self.session,
                Command::ConfigureBoard { config },
                &mut self.events,
            );
            self.rejections.clear();
        }

        let mut commands = Vec::new();
        self.placement.handle(&self.events, input, &mut commands);
        self.events.clear();
        self.execute(&mut commands);

        self.scheduler.handle(
            frame_dt,
            query::phase(&self.session),
            query::is_quiescent(&self.session),
            &mut commands,
        );
        self.execute(&mut commands);
    }

    fn execute(&mut self, commands: &mut Vec<Command>) {
        for command in commands.drain(..) {
            let first_new = self.events.len();
            world::apply(&mut self.session, command, &mut self.events);
            for event in &self.events[first_new..] {
                if let Event::PlacementRejected {
                    player,
                    cell,
                    reason,
                } = *event
                {
                    warn!("{player} cannot place at {cell}: {reason}");
                    self.rejections.push(Rejection {
                        player,
                        cell,
                        reason,
                    });
                }
            }
        }
    }
}
