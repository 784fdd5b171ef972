use crate::config::Config;
use crate::grid::{Grid, Position};
use crate::obstacle::{occupied_cells, DynamicObstacle};
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Longest occupancy window handed out by the random generator.
const OBSTACLE_WINDOW_SPAN: u32 = 5;

/// A complete planning problem: static layout, timed obstacles, endpoints,
/// and the time horizon.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub width: usize,
    pub height: usize,
    pub walls: HashSet<Position>,
    pub obstacles: Vec<DynamicObstacle>,
    pub start: Position,
    pub goal: Position,
    pub max_time: u32,
}

impl Scenario {
    /// Fixed 5x5 layout with a diagonal wall line and two obstacle windows
    /// pinching the routes around it. Small enough to read the printed grid
    /// and check the path by hand.
    pub fn demo() -> Self {
        let walls: HashSet<Position> = [
            Position { x: 1, y: 1 },
            Position { x: 2, y: 2 },
            Position { x: 3, y: 3 },
        ]
        .into_iter()
        .collect();

        Scenario {
            width: 5,
            height: 5,
            walls,
            obstacles: vec![
                DynamicObstacle::new(1, 2, 2, 4),
                DynamicObstacle::new(3, 2, 1, 3),
            ],
            start: Position { x: 0, y: 0 },
            goal: Position { x: 4, y: 4 },
            max_time: 10,
        }
    }

    /// Generate a random scenario. Start lands in the quadrant nearest the
    /// origin and goal in the opposite one, so the crossing distance stays
    /// interesting. The same seed always produces the same scenario.
    pub fn random(config: &Config, seed: Option<u64>) -> Self {
        let mut rng = if let Some(seed) = seed {
            rand::rngs::StdRng::seed_from_u64(seed)
        } else {
            rand::rngs::StdRng::from_entropy()
        };

        let start = Position {
            x: rng.gen_range(0..(config.width / 2).max(1)),
            y: rng.gen_range(0..(config.height / 2).max(1)),
        };
        let goal = Position {
            x: rng.gen_range(config.width / 2..config.width),
            y: rng.gen_range(config.height / 2..config.height),
        };

        let mut walls = HashSet::new();
        let mut walls_placed = 0;
        let mut attempts = 0;
        while walls_placed < config.num_walls && attempts < config.num_walls * 3 {
            let pos = Position {
                x: rng.gen_range(0..config.width),
                y: rng.gen_range(0..config.height),
            };

            if pos != start && pos != goal && !walls.contains(&pos) {
                walls.insert(pos);
                walls_placed += 1;
            }
            attempts += 1;
        }

        // Several windows may land on the same cell; the interval table
        // subtracts them one record at a time either way.
        let mut obstacles = Vec::new();
        if config.max_time > 0 {
            let mut attempts = 0;
            while obstacles.len() < config.num_obstacles && attempts < config.num_obstacles * 10 {
                let pos = Position {
                    x: rng.gen_range(0..config.width),
                    y: rng.gen_range(0..config.height),
                };

                if pos != start && pos != goal && !walls.contains(&pos) {
                    let start_time = rng.gen_range(0..config.max_time);
                    let span = OBSTACLE_WINDOW_SPAN.min(config.max_time - start_time);
                    let end_time = start_time + rng.gen_range(0..=span);
                    obstacles.push(DynamicObstacle::new(pos.x, pos.y, start_time, end_time));
                }
                attempts += 1;
            }
        }

        Scenario {
            width: config.width,
            height: config.height,
            walls,
            obstacles,
            start,
            goal,
            max_time: config.max_time,
        }
    }

    /// Materialize the static grid for this scenario.
    pub fn build_grid(&self) -> Grid {
        Grid::from_walls(self.width, self.height, &self.walls)
    }

    /// Cells covered by an occupancy window at the given time.
    pub fn occupied_at(&self, time: u32) -> HashSet<Position> {
        occupied_cells(&self.obstacles, time)
    }
}
