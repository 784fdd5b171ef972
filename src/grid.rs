use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
}

/// Static environment: fixed dimensions plus per-cell traversability.
/// Dynamic obstacles are not part of the grid; they live on the obstacle
/// timeline and only matter to the planners.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            cells: vec![vec![Cell::Empty; height]; width],
        }
    }

    pub fn from_walls<'a, I>(width: usize, height: usize, walls: I) -> Self
    where
        I: IntoIterator<Item = &'a Position>,
    {
        let mut grid = Grid::new(width, height);
        for wall in walls {
            grid.cells[wall.x][wall.y] = Cell::Wall;
        }
        grid
    }

    pub fn set_wall(&mut self, pos: Position) {
        self.cells[pos.x][pos.y] = Cell::Wall;
    }

    /// A cell is valid iff it lies inside the grid and is not a wall.
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height && self.cells[pos.x][pos.y] != Cell::Wall
    }

    pub fn get_neighbors(&self, pos: &Position) -> Vec<Position> {
        let mut neighbors = Vec::new();
        let (x, y) = (pos.x as i64, pos.y as i64);

        for (dx, dy) in &[(0, 1), (0, -1), (1, 0), (-1, 0)] {
            let nx = x + dx;
            let ny = y + dy;

            if nx >= 0 && nx < self.width as i64 && ny >= 0 && ny < self.height as i64 {
                let next_pos = Position {
                    x: nx as usize,
                    y: ny as usize,
                };
                if self.cells[next_pos.x][next_pos.y] != Cell::Wall {
                    neighbors.push(next_pos);
                }
            }
        }
        neighbors
    }

    /// Print a visual representation of the grid. `occupied` holds the cells
    /// covered by dynamic obstacles at the rendered time step.
    pub fn print_grid(
        &self,
        start: Position,
        goal: Position,
        agent_pos: Option<Position>,
        occupied: &HashSet<Position>,
    ) {
        println!("Legend: S=Start, G=Goal, A=Agent, #=Wall, O=Obstacle, .=Empty");

        // Print column numbers header
        print!("   ");
        for x in 0..self.width {
            print!("{:2}", x % 10);
        }
        println!();

        for y in 0..self.height {
            // Print row number
            print!("{:2} ", y);

            for x in 0..self.width {
                let pos = Position { x, y };
                let char = if Some(pos) == agent_pos {
                    'A'
                } else if pos == start {
                    'S'
                } else if pos == goal {
                    'G'
                } else if occupied.contains(&pos) {
                    'O'
                } else {
                    match self.cells[x][y] {
                        Cell::Wall => '#',
                        Cell::Empty => '.',
                    }
                };
                print!("{} ", char);
            }
            println!();
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cells_inside_bounds() {
        let grid = Grid::new(4, 3);
        assert!(grid.is_valid(Position { x: 0, y: 0 }));
        assert!(grid.is_valid(Position { x: 3, y: 2 }));
        assert!(!grid.is_valid(Position { x: 4, y: 0 }));
        assert!(!grid.is_valid(Position { x: 0, y: 3 }));
    }

    #[test]
    fn test_walls_are_invalid() {
        let mut grid = Grid::new(3, 3);
        grid.set_wall(Position { x: 1, y: 1 });
        assert!(!grid.is_valid(Position { x: 1, y: 1 }));
        assert!(grid.is_valid(Position { x: 1, y: 0 }));
    }

    #[test]
    fn test_neighbors_at_corner() {
        let grid = Grid::new(3, 3);
        let mut neighbors = grid.get_neighbors(&Position { x: 0, y: 0 });
        neighbors.sort();
        assert_eq!(
            neighbors,
            vec![Position { x: 0, y: 1 }, Position { x: 1, y: 0 }]
        );
    }

    #[test]
    fn test_neighbors_skip_walls() {
        let mut grid = Grid::new(3, 3);
        grid.set_wall(Position { x: 1, y: 0 });
        let neighbors = grid.get_neighbors(&Position { x: 0, y: 0 });
        assert_eq!(neighbors, vec![Position { x: 0, y: 1 }]);
    }

    #[test]
    fn test_from_walls_marks_cells() {
        let walls: HashSet<Position> = [Position { x: 2, y: 2 }, Position { x: 0, y: 1 }]
            .into_iter()
            .collect();
        let grid = Grid::from_walls(5, 5, &walls);
        assert_eq!(grid.cells[2][2], Cell::Wall);
        assert_eq!(grid.cells[0][1], Cell::Wall);
        assert_eq!(grid.cells[1][1], Cell::Empty);
    }
}
