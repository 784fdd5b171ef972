use crate::grid::{Grid, Position};
use crate::obstacle::DynamicObstacle;
use crate::statistics::SearchStats;

/// One step of a timed plan: the cell entered and the discrete time at which
/// the agent is modeled as occupying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub position: Position,
    pub arrival_time: u32,
}

pub trait PathfindingAlgorithm {
    /// Plan a path from start to goal. `None` means no path exists, which is
    /// a normal outcome rather than an error.
    fn find_path(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
        obstacles: &[DynamicObstacle],
        max_time: u32,
    ) -> Option<Vec<Position>>;

    /// Same plan with per-step arrival times. Planners that do not schedule
    /// against the timeline arrive one time unit per step.
    fn find_timed_path(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
        obstacles: &[DynamicObstacle],
        max_time: u32,
    ) -> Option<Vec<PathStep>> {
        self.find_path(grid, start, goal, obstacles, max_time)
            .map(|cells| {
                cells
                    .into_iter()
                    .enumerate()
                    .map(|(i, position)| PathStep {
                        position,
                        arrival_time: i as u32,
                    })
                    .collect()
            })
    }

    fn name(&self) -> &'static str;

    /// Search effort counters from the most recent call.
    fn search_stats(&self) -> SearchStats {
        SearchStats::default()
    }
}

pub fn manhattan_distance(a: Position, b: Position) -> u32 {
    ((a.x as i64 - b.x as i64).abs() + (a.y as i64 - b.y as i64).abs()) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let a = Position { x: 0, y: 0 };
        let b = Position { x: 4, y: 4 };
        assert_eq!(manhattan_distance(a, b), 8);
        assert_eq!(manhattan_distance(b, a), 8);
        assert_eq!(manhattan_distance(a, a), 0);
    }
}
