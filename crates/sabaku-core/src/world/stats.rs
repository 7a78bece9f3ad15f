//! Simulation statistics collection trait

/// Trait for collecting per-tick simulation statistics
pub trait SimStats {
    /// Record that a particle changed cell
    fn record_particle_moved(&mut self);

    /// Record that a particle found nowhere to go and came to rest
    fn record_particle_settled(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_particle_moved(&mut self) {}
    fn record_particle_settled(&mut self) {}
}

/// Counters for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub moved: usize,
    pub settled: usize,
}

impl SimStats for TickStats {
    fn record_particle_moved(&mut self) {
        self.moved += 1;
    }

    fn record_particle_settled(&mut self) {
        self.settled += 1;
    }
}
