//! Cellular automata update logic - particle movement physics

use super::grid::ParticleGrid;
use super::rng_trait::WorldRng;
use super::stats::SimStats;
use crate::simulation::{Particle, ParticleState, Particles};

/// Vertical velocity gained per tick
pub const GRAVITY: f32 = 0.5;

/// Lateral velocity given to a powder particle that slid diagonally
const POWDER_SLIDE_VX: f32 = 0.5;

/// Cells a zero-viscosity liquid may flow beyond the first in one tick
const MAX_EXTRA_FLOW: f32 = 3.0;

/// Speed limits and resting friction for one state class
struct Motion {
    max_fall: f32,
    max_drift: f32,
    rest_vy: f32,
    rest_vx: f32,
}

const POWDER_MOTION: Motion = Motion {
    max_fall: 8.0,
    max_drift: 4.0,
    rest_vy: 0.5,
    rest_vx: 0.8,
};

const LIQUID_MOTION: Motion = Motion {
    max_fall: 6.0,
    max_drift: 3.0,
    rest_vy: 0.3,
    rest_vx: 0.9,
};

/// Cellular automata updater - applies one state rule to one cell
pub struct CellularAutomataUpdater;

impl CellularAutomataUpdater {
    /// Update the particle at (x, y) unless it already moved this tick
    ///
    /// The updated flag is set before the rule runs, so a particle carried into
    /// a cell the scan hasn't reached yet is not processed again.
    pub fn update_particle<R: WorldRng>(
        grid: &mut ParticleGrid,
        x: i32,
        y: i32,
        particles: &Particles,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        let Some(particle) = grid.get_mut(x, y) else {
            return;
        };
        if particle.is_updated() {
            return;
        }
        particle.set_updated(true);
        let kind = particle.kind;

        match particles.get(kind).state {
            ParticleState::Powder => Self::update_powder(grid, x, y, particles, stats, rng),
            ParticleState::Liquid => Self::update_liquid(grid, x, y, particles, stats, rng),
            ParticleState::Solid | ParticleState::Gas => {}
        }
    }

    /// Update powder (falls, slides down diagonals, piles up)
    pub fn update_powder<R: WorldRng>(
        grid: &mut ParticleGrid,
        x: i32,
        y: i32,
        particles: &Particles,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        let Some(vy) = Self::accelerate(grid, x, y, &POWDER_MOTION) else {
            return;
        };

        if Self::try_fall(grid, x, y, vy, particles, stats) {
            return;
        }

        let dir = Self::random_direction(rng);
        for dx in [dir, -dir] {
            if Self::try_move(grid, x, y, x + dx, y + 1, particles, stats) {
                if let Some(particle) = grid.get_mut(x + dx, y + 1) {
                    particle.vx = dx as f32 * POWDER_SLIDE_VX;
                }
                return;
            }
        }

        Self::rest(grid, x, y, &POWDER_MOTION, stats);
    }

    /// Update liquid (falls, slides down diagonals, then spreads sideways)
    pub fn update_liquid<R: WorldRng>(
        grid: &mut ParticleGrid,
        x: i32,
        y: i32,
        particles: &Particles,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) {
        let Some(viscosity) = grid.get(x, y).map(|p| particles.get(p.kind).viscosity) else {
            return;
        };
        let Some(vy) = Self::accelerate(grid, x, y, &LIQUID_MOTION) else {
            return;
        };

        if Self::try_fall(grid, x, y, vy, particles, stats) {
            return;
        }

        // Diagonal flow doesn't carry over as momentum
        let dir = Self::random_direction(rng);
        for dx in [dir, -dir] {
            if Self::try_move(grid, x, y, x + dx, y + 1, particles, stats) {
                return;
            }
        }

        let distance = Self::flow_distance(viscosity);
        let flow_dir = Self::random_direction(rng);
        for dir in [flow_dir, -flow_dir] {
            if let Some(nx) = Self::scan_flow(grid, x, y, dir, distance, particles) {
                grid.swap(x, y, nx, y);
                stats.record_particle_moved();
                if let Some(particle) = grid.get_mut(nx, y) {
                    particle.vx = dir as f32;
                }
                return;
            }
        }

        Self::rest(grid, x, y, &LIQUID_MOTION, stats);
    }

    /// Whether `mover` may swap into the cell holding `target`
    ///
    /// Empty cells always accept; solids never do; anything else only gives
    /// way to a strictly denser mover.
    pub fn can_displace(
        mover: Option<&Particle>,
        target: Option<&Particle>,
        particles: &Particles,
    ) -> bool {
        let Some(mover) = mover else {
            return false;
        };
        let Some(target) = target else {
            return true;
        };

        let target_props = particles.get(target.kind);
        if target_props.state == ParticleState::Solid {
            return false;
        }

        particles.get(mover.kind).density > target_props.density
    }

    /// Maximum cells a liquid spreads sideways in one tick
    pub fn flow_distance(viscosity: f32) -> i32 {
        (MAX_EXTRA_FLOW * (1.0 - viscosity.clamp(0.0, 1.0))) as i32 + 1
    }

    /// Apply gravity and clamp speeds; returns the new vertical velocity
    fn accelerate(grid: &mut ParticleGrid, x: i32, y: i32, motion: &Motion) -> Option<f32> {
        let particle = grid.get_mut(x, y)?;
        particle.vy = (particle.vy + GRAVITY).min(motion.max_fall);
        particle.vx = particle.vx.clamp(-motion.max_drift, motion.max_drift);
        Some(particle.vy)
    }

    /// Fall straight down, trying the farthest row the velocity reaches first
    fn try_fall(
        grid: &mut ParticleGrid,
        x: i32,
        y: i32,
        vy: f32,
        particles: &Particles,
        stats: &mut dyn SimStats,
    ) -> bool {
        let reach = (vy as i32).max(1);
        for dy in (1..=reach).rev() {
            if Self::try_move(grid, x, y, x, y + dy, particles, stats) {
                return true;
            }
        }
        false
    }

    /// Farthest cell reachable sideways in `dir`, stopping at the first
    /// out-of-bounds or non-displaceable cell
    fn scan_flow(
        grid: &ParticleGrid,
        x: i32,
        y: i32,
        dir: i32,
        distance: i32,
        particles: &Particles,
    ) -> Option<i32> {
        let mover = grid.get(x, y);
        let mut target = None;

        for step in 1..=distance {
            let nx = x + step * dir;
            if !grid.in_bounds(nx, y) || !Self::can_displace(mover, grid.get(nx, y), particles) {
                break;
            }
            target = Some(nx);
        }

        target
    }

    /// Nothing moved: bleed off velocity
    fn rest(grid: &mut ParticleGrid, x: i32, y: i32, motion: &Motion, stats: &mut dyn SimStats) {
        if let Some(particle) = grid.get_mut(x, y) {
            particle.vy *= motion.rest_vy;
            particle.vx *= motion.rest_vx;
            stats.record_particle_settled();
        }
    }

    fn random_direction<R: WorldRng>(rng: &mut R) -> i32 {
        if rng.gen_bool() { -1 } else { 1 }
    }

    /// Try to move a particle from one cell to another
    /// Returns true if the move succeeded
    fn try_move(
        grid: &mut ParticleGrid,
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
        particles: &Particles,
        stats: &mut dyn SimStats,
    ) -> bool {
        if !grid.in_bounds(to_x, to_y) {
            return false;
        }

        if !Self::can_displace(grid.get(from_x, from_y), grid.get(to_x, to_y), particles) {
            return false;
        }

        grid.swap(from_x, from_y, to_x, to_y);
        stats.record_particle_moved();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::ParticleType;
    use crate::world::{NoopStats, TickStats, WorldRng};

    /// Test RNG that returns deterministic values
    struct TestRng {
        bool_value: bool,
    }

    impl TestRng {
        fn new(bool_value: bool) -> Self {
            Self { bool_value }
        }
    }

    impl WorldRng for TestRng {
        fn gen_bool(&mut self) -> bool {
            self.bool_value
        }
    }

    fn make_grid(width: usize, height: usize, cells: &[(i32, i32, ParticleType)]) -> ParticleGrid {
        let particles = Particles::new();
        let mut grid = ParticleGrid::new(width, height).unwrap();
        for &(x, y, kind) in cells {
            assert!(grid.spawn(x, y, kind, &particles));
        }
        grid
    }

    fn kind_at(grid: &ParticleGrid, x: i32, y: i32) -> ParticleType {
        grid.get(x, y).map(|p| p.kind).unwrap_or(ParticleType::None)
    }

    fn stone_floor(width: i32, y: i32) -> Vec<(i32, i32, ParticleType)> {
        (0..width).map(|x| (x, y, ParticleType::Stone)).collect()
    }

    fn run_powder(grid: &mut ParticleGrid, x: i32, y: i32, rng_value: bool) {
        let particles = Particles::new();
        let mut rng = TestRng::new(rng_value);
        CellularAutomataUpdater::update_powder(grid, x, y, &particles, &mut NoopStats, &mut rng);
    }

    fn run_liquid(grid: &mut ParticleGrid, x: i32, y: i32, rng_value: bool) {
        let particles = Particles::new();
        let mut rng = TestRng::new(rng_value);
        CellularAutomataUpdater::update_liquid(grid, x, y, &particles, &mut NoopStats, &mut rng);
    }

    #[test]
    fn test_can_displace_empty_target() {
        let particles = Particles::new();
        let sand = particles.create(ParticleType::Sand);

        assert!(CellularAutomataUpdater::can_displace(
            Some(&sand),
            None,
            &particles
        ));
    }

    #[test]
    fn test_can_displace_requires_mover() {
        let particles = Particles::new();
        let water = particles.create(ParticleType::Water);

        assert!(!CellularAutomataUpdater::can_displace(None, None, &particles));
        assert!(!CellularAutomataUpdater::can_displace(
            None,
            Some(&water),
            &particles
        ));
    }

    #[test]
    fn test_can_displace_by_density() {
        let particles = Particles::new();
        let sand = particles.create(ParticleType::Sand);
        let water = particles.create(ParticleType::Water);
        let oil = particles.create(ParticleType::Oil);

        let can = |a, b| CellularAutomataUpdater::can_displace(Some(a), Some(b), &particles);

        assert!(can(&sand, &water));
        assert!(can(&sand, &oil));
        assert!(can(&water, &oil));
        assert!(!can(&water, &sand));
        assert!(!can(&oil, &water));
        // Equal density is not enough
        assert!(!can(&sand, &sand));
        assert!(!can(&water, &water));
    }

    #[test]
    fn test_can_displace_never_into_solid() {
        let particles = Particles::new();
        let stone = particles.create(ParticleType::Stone);

        for kind in ParticleType::ALL {
            let mover = particles.create(kind);
            assert!(!CellularAutomataUpdater::can_displace(
                Some(&mover),
                Some(&stone),
                &particles
            ));
        }
    }

    #[test]
    fn test_flow_distance() {
        assert_eq!(CellularAutomataUpdater::flow_distance(0.0), 4);
        assert_eq!(CellularAutomataUpdater::flow_distance(0.1), 3);
        assert_eq!(CellularAutomataUpdater::flow_distance(0.5), 2);
        assert_eq!(CellularAutomataUpdater::flow_distance(1.0), 1);
        // Out-of-range viscosity is clamped
        assert_eq!(CellularAutomataUpdater::flow_distance(2.0), 1);
        assert_eq!(CellularAutomataUpdater::flow_distance(-1.0), 4);
    }

    #[test]
    fn test_update_powder_falls_down() {
        let mut grid = make_grid(5, 5, &[(2, 0, ParticleType::Sand)]);

        run_powder(&mut grid, 2, 0, true);

        assert_eq!(kind_at(&grid, 2, 0), ParticleType::None);
        assert_eq!(kind_at(&grid, 2, 1), ParticleType::Sand);
        assert_eq!(grid.get(2, 1).unwrap().vy, GRAVITY);
    }

    #[test]
    fn test_update_powder_fast_fall() {
        let mut grid = make_grid(5, 10, &[(2, 0, ParticleType::Sand)]);
        grid.get_mut(2, 0).unwrap().vy = 3.0;

        run_powder(&mut grid, 2, 0, true);

        // vy 3.5 reaches three rows
        assert_eq!(kind_at(&grid, 2, 3), ParticleType::Sand);
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_update_powder_fast_fall_passes_over_stone() {
        let mut grid = make_grid(
            5,
            10,
            &[(2, 0, ParticleType::Sand), (2, 1, ParticleType::Stone)],
        );
        grid.get_mut(2, 0).unwrap().vy = 2.0;

        run_powder(&mut grid, 2, 0, true);

        // Only the target row is checked: vy 2.5 lands two rows down
        assert_eq!(kind_at(&grid, 2, 0), ParticleType::None);
        assert_eq!(kind_at(&grid, 2, 1), ParticleType::Stone);
        assert_eq!(kind_at(&grid, 2, 2), ParticleType::Sand);
    }

    #[test]
    fn test_update_powder_fall_tries_farthest_row_first() {
        let mut grid = make_grid(
            5,
            10,
            &[(2, 0, ParticleType::Sand), (2, 1, ParticleType::Sand)],
        );
        grid.get_mut(2, 0).unwrap().vy = 2.0;

        run_powder(&mut grid, 2, 0, true);

        // Row 2 is tested before row 1 and is free
        assert_eq!(kind_at(&grid, 2, 0), ParticleType::None);
        assert_eq!(kind_at(&grid, 2, 1), ParticleType::Sand);
        assert_eq!(kind_at(&grid, 2, 2), ParticleType::Sand);
    }

    #[test]
    fn test_update_powder_fall_speed_capped() {
        let mut grid = make_grid(3, 20, &[(1, 0, ParticleType::Sand)]);
        grid.get_mut(1, 0).unwrap().vy = 100.0;
        grid.get_mut(1, 0).unwrap().vx = -100.0;

        run_powder(&mut grid, 1, 0, true);

        let sand = grid.get(1, 8).unwrap();
        assert_eq!(sand.vy, 8.0);
        assert_eq!(sand.vx, -4.0);
    }

    #[test]
    fn test_update_powder_stops_on_solid() {
        let mut grid = make_grid(5, 5, &[(2, 1, ParticleType::Sand)]);
        let particles = Particles::new();
        for (x, y, kind) in stone_floor(5, 2) {
            grid.spawn(x, y, kind, &particles);
        }

        run_powder(&mut grid, 2, 1, true);

        assert_eq!(kind_at(&grid, 2, 1), ParticleType::Sand);
        let sand = grid.get(2, 1).unwrap();
        assert_eq!(sand.vy, GRAVITY * 0.5);
        assert_eq!(sand.vx, 0.0);
    }

    #[test]
    fn test_update_powder_slides_diagonally() {
        let mut grid = make_grid(
            5,
            5,
            &[(2, 1, ParticleType::Sand), (2, 2, ParticleType::Stone)],
        );

        // true => try left first
        run_powder(&mut grid, 2, 1, true);

        assert_eq!(kind_at(&grid, 2, 1), ParticleType::None);
        assert_eq!(kind_at(&grid, 1, 2), ParticleType::Sand);
        assert_eq!(grid.get(1, 2).unwrap().vx, -0.5);
    }

    #[test]
    fn test_update_powder_tries_opposite_diagonal() {
        let mut grid = make_grid(
            5,
            5,
            &[
                (2, 1, ParticleType::Sand),
                (2, 2, ParticleType::Stone),
                (1, 2, ParticleType::Stone),
            ],
        );

        run_powder(&mut grid, 2, 1, true);

        assert_eq!(kind_at(&grid, 3, 2), ParticleType::Sand);
        assert_eq!(grid.get(3, 2).unwrap().vx, 0.5);
    }

    #[test]
    fn test_update_powder_diagonal_at_edge() {
        let mut grid = make_grid(
            3,
            3,
            &[(0, 1, ParticleType::Sand), (0, 2, ParticleType::Stone)],
        );

        // Left diagonal is off the grid, right one is free
        run_powder(&mut grid, 0, 1, true);

        assert_eq!(kind_at(&grid, 1, 2), ParticleType::Sand);
    }

    #[test]
    fn test_update_powder_sinks_through_water() {
        let mut grid = make_grid(
            3,
            3,
            &[(1, 1, ParticleType::Sand), (1, 2, ParticleType::Water)],
        );

        run_powder(&mut grid, 1, 1, true);

        assert_eq!(kind_at(&grid, 1, 2), ParticleType::Sand);
        assert_eq!(kind_at(&grid, 1, 1), ParticleType::Water);
    }

    #[test]
    fn test_update_powder_bottom_row_rests() {
        let mut grid = make_grid(1, 2, &[(0, 1, ParticleType::Sand)]);
        let mut stats = TickStats::default();
        let particles = Particles::new();

        CellularAutomataUpdater::update_powder(
            &mut grid,
            0,
            1,
            &particles,
            &mut stats,
            &mut TestRng::new(false),
        );

        assert_eq!(kind_at(&grid, 0, 1), ParticleType::Sand);
        assert_eq!(stats, TickStats { moved: 0, settled: 1 });
    }

    #[test]
    fn test_update_liquid_falls_down() {
        let mut grid = make_grid(5, 5, &[(2, 0, ParticleType::Water)]);

        run_liquid(&mut grid, 2, 0, true);

        assert_eq!(kind_at(&grid, 2, 0), ParticleType::None);
        assert_eq!(kind_at(&grid, 2, 1), ParticleType::Water);
    }

    #[test]
    fn test_update_liquid_fall_speed_capped() {
        let mut grid = make_grid(3, 20, &[(1, 0, ParticleType::Water)]);
        grid.get_mut(1, 0).unwrap().vy = 100.0;
        grid.get_mut(1, 0).unwrap().vx = 100.0;

        run_liquid(&mut grid, 1, 0, true);

        let water = grid.get(1, 6).unwrap();
        assert_eq!(water.vy, 6.0);
        assert_eq!(water.vx, 3.0);
    }

    #[test]
    fn test_update_liquid_diagonal_keeps_velocity() {
        let mut grid = make_grid(
            5,
            5,
            &[(2, 1, ParticleType::Water), (2, 2, ParticleType::Stone)],
        );

        run_liquid(&mut grid, 2, 1, true);

        assert_eq!(kind_at(&grid, 1, 2), ParticleType::Water);
        assert_eq!(grid.get(1, 2).unwrap().vx, 0.0);
    }

    #[test]
    fn test_update_liquid_flows_to_farthest_cell() {
        let mut cells = stone_floor(10, 2);
        cells.push((5, 1, ParticleType::Water));
        let mut grid = make_grid(10, 3, &cells);

        // true => flow left first; water spreads up to 3 cells
        run_liquid(&mut grid, 5, 1, true);

        assert_eq!(kind_at(&grid, 5, 1), ParticleType::None);
        assert_eq!(kind_at(&grid, 2, 1), ParticleType::Water);
        assert_eq!(grid.get(2, 1).unwrap().vx, -1.0);
    }

    #[test]
    fn test_update_liquid_flow_stops_at_blocker() {
        let mut cells = stone_floor(10, 2);
        cells.push((5, 1, ParticleType::Water));
        cells.push((3, 1, ParticleType::Stone));
        let mut grid = make_grid(10, 3, &cells);

        run_liquid(&mut grid, 5, 1, true);

        // Scan halts at the stone at x=3 and takes the last free cell
        assert_eq!(kind_at(&grid, 4, 1), ParticleType::Water);
        assert_eq!(kind_at(&grid, 2, 1), ParticleType::None);
    }

    #[test]
    fn test_update_liquid_flows_opposite_way() {
        let mut cells = stone_floor(10, 2);
        cells.push((5, 1, ParticleType::Water));
        cells.push((4, 1, ParticleType::Stone));
        let mut grid = make_grid(10, 3, &cells);

        run_liquid(&mut grid, 5, 1, true);

        assert_eq!(kind_at(&grid, 8, 1), ParticleType::Water);
        assert_eq!(grid.get(8, 1).unwrap().vx, 1.0);
    }

    #[test]
    fn test_update_liquid_flow_stops_at_edge() {
        let mut cells = stone_floor(4, 2);
        cells.push((1, 1, ParticleType::Water));
        let mut grid = make_grid(4, 3, &cells);

        run_liquid(&mut grid, 1, 1, true);

        assert_eq!(kind_at(&grid, 0, 1), ParticleType::Water);
    }

    #[test]
    fn test_update_liquid_flows_past_lighter_liquid() {
        let mut cells = stone_floor(10, 2);
        cells.push((5, 1, ParticleType::Water));
        cells.push((4, 1, ParticleType::Oil));
        let mut grid = make_grid(10, 3, &cells);

        run_liquid(&mut grid, 5, 1, true);

        assert_eq!(kind_at(&grid, 2, 1), ParticleType::Water);
        assert_eq!(kind_at(&grid, 4, 1), ParticleType::Oil);
        assert_eq!(kind_at(&grid, 5, 1), ParticleType::None);
    }

    #[test]
    fn test_update_liquid_boxed_in_rests() {
        let mut cells = stone_floor(3, 2);
        cells.push((0, 1, ParticleType::Stone));
        cells.push((2, 1, ParticleType::Stone));
        cells.push((1, 1, ParticleType::Water));
        let mut grid = make_grid(3, 3, &cells);

        run_liquid(&mut grid, 1, 1, false);

        assert_eq!(kind_at(&grid, 1, 1), ParticleType::Water);
        let water = grid.get(1, 1).unwrap();
        assert!((water.vy - GRAVITY * 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_water_sinks_below_oil() {
        let mut grid = make_grid(
            3,
            3,
            &[(1, 1, ParticleType::Water), (1, 2, ParticleType::Oil)],
        );

        run_liquid(&mut grid, 1, 1, true);

        assert_eq!(kind_at(&grid, 1, 2), ParticleType::Water);
        assert_eq!(kind_at(&grid, 1, 1), ParticleType::Oil);
    }

    #[test]
    fn test_oil_does_not_sink_into_water() {
        let mut grid = make_grid(
            1,
            2,
            &[(0, 0, ParticleType::Oil), (0, 1, ParticleType::Water)],
        );

        run_liquid(&mut grid, 0, 0, true);

        assert_eq!(kind_at(&grid, 0, 0), ParticleType::Oil);
        assert_eq!(kind_at(&grid, 0, 1), ParticleType::Water);
    }

    #[test]
    fn test_update_particle_marks_and_skips() {
        let particles = Particles::new();
        let mut grid = make_grid(3, 5, &[(1, 0, ParticleType::Sand)]);
        let mut rng = TestRng::new(true);

        CellularAutomataUpdater::update_particle(&mut grid, 1, 0, &particles, &mut NoopStats, &mut rng);
        assert!(grid.get(1, 1).unwrap().is_updated());

        // Already updated: second call does nothing
        CellularAutomataUpdater::update_particle(&mut grid, 1, 1, &particles, &mut NoopStats, &mut rng);
        assert_eq!(kind_at(&grid, 1, 1), ParticleType::Sand);
    }

    #[test]
    fn test_update_particle_ignores_solid_and_empty() {
        let particles = Particles::new();
        let mut grid = make_grid(3, 3, &[(1, 0, ParticleType::Stone)]);
        let mut stats = TickStats::default();
        let mut rng = TestRng::new(true);

        CellularAutomataUpdater::update_particle(&mut grid, 1, 0, &particles, &mut stats, &mut rng);
        CellularAutomataUpdater::update_particle(&mut grid, 0, 0, &particles, &mut stats, &mut rng);

        assert_eq!(kind_at(&grid, 1, 0), ParticleType::Stone);
        assert_eq!(stats, TickStats::default());
    }
}
