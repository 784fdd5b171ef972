use crate::algorithms::common::PathStep;
use std::fmt;

/// Counters accumulated over a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States pushed onto the frontier, start state included.
    pub generated: usize,
    /// States popped and expanded.
    pub expanded: usize,
    /// States popped but discarded because their (cell, interval) key was
    /// already expanded.
    pub duplicates: usize,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "States generated: {}", self.generated)?;
        writeln!(f, "States expanded: {}", self.expanded)?;
        writeln!(f, "Duplicates discarded: {}", self.duplicates)?;
        Ok(())
    }
}

/// Quality measures for one timed path.
#[derive(Debug, Clone)]
pub struct PathStats {
    pub path_cells: usize,
    /// Arrival time at the goal.
    pub makespan: u32,
    /// Steps that change position.
    pub moves: u32,
    /// Time spent idling, whether as explicit wait steps or as arrival jumps
    /// folded into a move.
    pub wait_time: u32,
    /// Cells in the shortest wall-only path, ignoring occupancy windows.
    /// Zero when even the static grid has no route.
    pub optimal_path_length: usize,
    /// Makespan relative to the static optimum's move count. 1.0 means no
    /// time was lost to occupancy windows.
    pub route_efficiency: f64,
}

impl PathStats {
    pub fn from_steps(steps: &[PathStep], optimal_path_length: usize) -> Self {
        let makespan = steps.last().map_or(0, |step| step.arrival_time);
        let moves = steps
            .windows(2)
            .filter(|pair| pair[0].position != pair[1].position)
            .count() as u32;
        let mut stats = PathStats {
            path_cells: steps.len(),
            makespan,
            moves,
            wait_time: makespan.saturating_sub(moves),
            optimal_path_length,
            route_efficiency: 0.0,
        };
        stats.calculate_efficiency();
        stats
    }

    fn calculate_efficiency(&mut self) {
        if self.makespan > 0 && self.optimal_path_length > 1 {
            self.route_efficiency = self.makespan as f64 / (self.optimal_path_length - 1) as f64;
        } else {
            self.route_efficiency = 0.0;
        }
    }
}

impl fmt::Display for PathStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Path Cells: {}", self.path_cells)?;
        writeln!(f, "Makespan: {}", self.makespan)?;
        writeln!(f, "Moves: {}", self.moves)?;
        writeln!(f, "Time Waiting: {}", self.wait_time)?;
        writeln!(f, "Optimal Static Length: {}", self.optimal_path_length)?;
        writeln!(f, "Route Efficiency: {:.3}", self.route_efficiency)?;

        if self.route_efficiency > 1.0 {
            writeln!(f, "Note: occupancy windows forced waits or detours")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;

    fn step(x: usize, y: usize, arrival_time: u32) -> PathStep {
        PathStep {
            position: Position { x, y },
            arrival_time,
        }
    }

    #[test]
    fn test_wait_time_counts_arrival_jumps() {
        // Two moves but a makespan of 5: three time units idled away.
        let steps = vec![step(0, 0, 0), step(1, 0, 4), step(2, 0, 5)];
        let stats = PathStats::from_steps(&steps, 3);
        assert_eq!(stats.path_cells, 3);
        assert_eq!(stats.makespan, 5);
        assert_eq!(stats.moves, 2);
        assert_eq!(stats.wait_time, 3);
        assert!((stats.route_efficiency - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_wait_steps_count_as_idle_time() {
        let steps = vec![step(0, 0, 0), step(0, 0, 1), step(1, 0, 2)];
        let stats = PathStats::from_steps(&steps, 2);
        assert_eq!(stats.moves, 1);
        assert_eq!(stats.wait_time, 1);
    }

    #[test]
    fn test_trivial_path_has_zero_efficiency() {
        let steps = vec![step(2, 2, 0)];
        let stats = PathStats::from_steps(&steps, 1);
        assert_eq!(stats.makespan, 0);
        assert_eq!(stats.wait_time, 0);
        assert_eq!(stats.route_efficiency, 0.0);
    }

    #[test]
    fn test_display_mentions_lost_time() {
        let steps = vec![step(0, 0, 0), step(1, 0, 4)];
        let stats = PathStats::from_steps(&steps, 2);
        let rendered = format!("{}", stats);
        assert!(rendered.contains("Makespan: 4"));
        assert!(rendered.contains("occupancy windows"));
    }
}
