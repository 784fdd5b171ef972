use crate::grid::Position;
use std::collections::HashSet;

/// A dynamic obstacle occupying one cell during a known, inclusive time
/// window. Multiple records may target the same cell; windows may overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicObstacle {
    pub x: usize,
    pub y: usize,
    pub start_time: u32,
    pub end_time: u32,
}

impl DynamicObstacle {
    pub fn new(x: usize, y: usize, start_time: u32, end_time: u32) -> Self {
        DynamicObstacle {
            x,
            y,
            start_time,
            end_time,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            x: self.x,
            y: self.y,
        }
    }

    pub fn blocks(&self, pos: Position, time: u32) -> bool {
        self.position() == pos && self.start_time <= time && time <= self.end_time
    }
}

/// Cells covered by any obstacle at the given time step. Used by the replay
/// loop for collision checks and frame rendering.
pub fn occupied_cells(obstacles: &[DynamicObstacle], time: u32) -> HashSet<Position> {
    obstacles
        .iter()
        .filter(|obs| obs.start_time <= time && time <= obs.end_time)
        .map(|obs| obs.position())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_inside_window_only() {
        let obs = DynamicObstacle::new(1, 2, 2, 4);
        let pos = Position { x: 1, y: 2 };
        assert!(!obs.blocks(pos, 1));
        assert!(obs.blocks(pos, 2));
        assert!(obs.blocks(pos, 4));
        assert!(!obs.blocks(pos, 5));
        assert!(!obs.blocks(Position { x: 2, y: 1 }, 3));
    }

    #[test]
    fn test_occupied_cells_at_time() {
        let obstacles = vec![
            DynamicObstacle::new(1, 2, 2, 4),
            DynamicObstacle::new(3, 2, 1, 3),
        ];
        let at_0 = occupied_cells(&obstacles, 0);
        assert!(at_0.is_empty());

        let at_2 = occupied_cells(&obstacles, 2);
        assert!(at_2.contains(&Position { x: 1, y: 2 }));
        assert!(at_2.contains(&Position { x: 3, y: 2 }));

        let at_4 = occupied_cells(&obstacles, 4);
        assert_eq!(at_4.len(), 1);
        assert!(at_4.contains(&Position { x: 1, y: 2 }));
    }
}
