//! In-flight projectiles and the tick-by-tick cascade resolution.

use chain_reaction_core::{
    CellCoord, CellPoint, Direction, PlayerId, ProjectileSnapshot, PROJECTILE_STEPS,
};

use crate::board::Board;

/// Single orb travelling from an exploded cell toward one of its neighbours.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Projectile {
    owner: PlayerId,
    origin: CellCoord,
    direction: Direction,
    destination: CellCoord,
    steps: u32,
}

impl Projectile {
    /// Launches a projectile with zero progress.
    pub(crate) const fn launch(
        owner: PlayerId,
        origin: CellCoord,
        direction: Direction,
        destination: CellCoord,
    ) -> Self {
        Self {
            owner,
            origin,
            direction,
            destination,
            steps: 0,
        }
    }

    pub(crate) const fn owner(&self) -> PlayerId {
        self.owner
    }

    pub(crate) const fn origin(&self) -> CellCoord {
        self.origin
    }

    pub(crate) const fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) const fn destination(&self) -> CellCoord {
        self.destination
    }

    /// Fraction of the journey completed, clamped to `0.0..=1.0`.
    pub(crate) fn progress(&self) -> f32 {
        self.steps.min(PROJECTILE_STEPS) as f32 / PROJECTILE_STEPS as f32
    }

    pub(crate) const fn has_arrived(&self) -> bool {
        self.steps >= PROJECTILE_STEPS
    }

    /// Current position in cell units; arrived projectiles snap to their destination.
    pub(crate) fn position(&self) -> CellPoint {
        if self.has_arrived() {
            return CellPoint::new(
                self.destination.column() as f32,
                self.destination.row() as f32,
            );
        }
        let (dx, dy) = self.direction.offset();
        let progress = self.progress();
        CellPoint::new(
            self.origin.column() as f32 + dx as f32 * progress,
            self.origin.row() as f32 + dy as f32 * progress,
        )
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            owner: self.owner(),
            origin: self.origin(),
            direction: self.direction(),
            destination: self.destination(),
            progress: self.progress(),
            position: self.position(),
        }
    }

    fn advance(&mut self) {
        self.steps = self.steps.saturating_add(1).min(PROJECTILE_STEPS);
    }
}

/// What happened to a single projectile that arrived during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LandingRecord {
    pub(crate) owner: PlayerId,
    pub(crate) cell: CellCoord,
    pub(crate) previous_owner: Option<PlayerId>,
    /// Projectiles released by the landing; zero unless the cell exploded.
    pub(crate) spawned: u32,
}

/// Owns every projectile in flight, in insertion order.
#[derive(Clone, Debug, Default)]
pub(crate) struct CascadeEngine {
    in_flight: Vec<Projectile>,
}

impl CascadeEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends projectiles released by an explosion to the in-flight set.
    pub(crate) fn spawn(&mut self, projectiles: Vec<Projectile>) {
        self.in_flight.extend(projectiles);
    }

    /// Reports whether no projectile is in flight.
    pub(crate) fn is_quiescent(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub(crate) fn in_flight_owned_by(&self, player: PlayerId) -> usize {
        self.in_flight
            .iter()
            .filter(|projectile| projectile.owner == player)
            .count()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.in_flight.iter()
    }

    /// Advances every projectile by one step and folds arrivals into the board.
    ///
    /// Arrivals are replayed one at a time in insertion order, each fully
    /// resolved (including the explosion it may trigger) before the next.
    /// Projectiles released by those explosions join the end of the set with
    /// zero progress and start moving on the following tick.
    pub(crate) fn tick(&mut self, board: &mut Board) -> Vec<LandingRecord> {
        for projectile in &mut self.in_flight {
            projectile.advance();
        }

        let (arrived, flying): (Vec<Projectile>, Vec<Projectile>) = self
            .in_flight
            .drain(..)
            .partition(Projectile::has_arrived);
        self.in_flight = flying;

        let mut records = Vec::with_capacity(arrived.len());
        for projectile in arrived {
            let landing = board.land(projectile.owner(), projectile.destination());
            records.push(LandingRecord {
                owner: projectile.owner(),
                cell: projectile.destination(),
                previous_owner: landing.previous_owner,
                spawned: landing.projectiles.len() as u32,
            });
            self.in_flight.extend(landing.projectiles);
        }
        records
    }
}
