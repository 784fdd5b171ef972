use crate::algorithms::common::{manhattan_distance, PathfindingAlgorithm};
use crate::grid::{Grid, Position};
use crate::obstacle::DynamicObstacle;
use pathfinding::prelude::astar;

/// Time-blind A* over the static grid, via the `pathfinding` crate.
///
/// Dynamic obstacles are ignored entirely, so replaying one of these paths
/// against a scenario with occupancy windows will usually collide. That is
/// the point: it is the comparison baseline that shows what interval-aware
/// planning buys.
#[derive(Default)]
pub struct AStarBaseline;

impl AStarBaseline {
    pub fn new() -> Self {
        AStarBaseline
    }
}

impl PathfindingAlgorithm for AStarBaseline {
    /// Finds a shortest wall-free path from start to goal.
    ///
    /// # Arguments
    ///
    /// * `grid` - The static grid; walls are the only thing avoided.
    /// * `start` - The starting position.
    /// * `goal` - The goal position.
    /// * `_obstacles` - Ignored; this planner is time-blind.
    /// * `max_time` - Paths longer than the horizon are rejected.
    ///
    /// # Returns
    ///
    /// An `Option` containing a `Vec<Position>` for the path, or `None` if
    /// the goal is unreachable within the horizon.
    fn find_path(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
        _obstacles: &[DynamicObstacle],
        max_time: u32,
    ) -> Option<Vec<Position>> {
        if !grid.is_valid(start) || !grid.is_valid(goal) {
            return None;
        }
        let result = astar(
            &start,
            |p| {
                grid.get_neighbors(p)
                    .into_iter()
                    .map(|successor| (successor, 1u32))
                    .collect::<Vec<_>>()
            },
            |p| manhattan_distance(*p, goal),
            |p| *p == goal,
        );

        // One move per time unit: a path of cost c completes at time c.
        result.and_then(|(path, cost)| if cost <= max_time { Some(path) } else { None })
    }

    fn name(&self) -> &'static str {
        "astar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_grid_path_is_manhattan_optimal() {
        let grid = Grid::new(5, 5);
        let mut planner = AStarBaseline::new();
        let path = planner
            .find_path(
                &grid,
                Position { x: 0, y: 0 },
                Position { x: 4, y: 4 },
                &[],
                20,
            )
            .unwrap();
        assert_eq!(path.len(), 9);
    }

    #[test]
    fn test_obstacle_windows_are_ignored() {
        let grid = Grid::new(3, 1);
        // The middle cell is occupied for the entire horizon; the baseline
        // plans straight through it anyway.
        let obstacles = vec![DynamicObstacle::new(1, 0, 0, 10)];
        let mut planner = AStarBaseline::new();
        let path = planner
            .find_path(
                &grid,
                Position { x: 0, y: 0 },
                Position { x: 2, y: 0 },
                &obstacles,
                10,
            )
            .unwrap();
        assert_eq!(
            path,
            vec![
                Position { x: 0, y: 0 },
                Position { x: 1, y: 0 },
                Position { x: 2, y: 0 },
            ]
        );
    }

    #[test]
    fn test_wall_barrier_returns_none() {
        let mut grid = Grid::new(3, 3);
        for y in 0..3 {
            grid.set_wall(Position { x: 1, y });
        }
        let mut planner = AStarBaseline::new();
        assert!(planner
            .find_path(
                &grid,
                Position { x: 0, y: 0 },
                Position { x: 2, y: 0 },
                &[],
                10,
            )
            .is_none());
    }

    #[test]
    fn test_horizon_too_short_returns_none() {
        let grid = Grid::new(6, 1);
        let mut planner = AStarBaseline::new();
        assert!(planner
            .find_path(
                &grid,
                Position { x: 0, y: 0 },
                Position { x: 5, y: 0 },
                &[],
                3,
            )
            .is_none());
    }
}
