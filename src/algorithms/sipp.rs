use crate::algorithms::common::{manhattan_distance, PathStep, PathfindingAlgorithm};
use crate::grid::{Grid, Position};
use crate::intervals::{Interval, SafeIntervalTable};
use crate::obstacle::DynamicObstacle;
use crate::statistics::SearchStats;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Up, down, left, right, wait in place. Every move costs one time unit.
const MOVES: [(i64, i64); 5] = [(0, 1), (0, -1), (1, 0), (-1, 0), (0, 0)];

/// A search node: a (cell, safe interval) pair plus the cost and arrival
/// bookkeeping. The same cell reached under two different intervals is two
/// distinct states. States are appended to a per-call arena and never moved,
/// so `parent` is a plain index into that arena.
#[derive(Debug, Clone, Copy)]
struct SearchState {
    pos: Position,
    interval: Interval,
    g: u32,
    h: u32,
    arrival_time: u32,
    parent: Option<usize>,
}

impl SearchState {
    fn f(&self) -> u32 {
        self.g.saturating_add(self.h)
    }
}

/// Frontier entry for the min-heap. Ordered by lowest `f`, then lowest `h`,
/// then lowest arena index (insertion order), which makes the pop order total
/// and repeated runs identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    f: u32,
    h: u32,
    index: usize,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed comparison to make BinaryHeap a min-heap
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Safe Interval Path Planning: best-first search over (cell, safe interval)
/// states instead of (cell, timestep) states, so waiting out an obstacle
/// window costs one expansion rather than one per time unit.
///
/// A successor's arrival time is the earliest instant the destination
/// interval admits, `max(arrival + 1, interval.start)`. When that exceeds
/// `arrival + 1` the agent implicitly waited in its previous cell; `g` still
/// grows by exactly one per step.
#[derive(Default)]
pub struct SippPlanner {
    stats: SearchStats,
}

impl SippPlanner {
    pub fn new() -> Self {
        SippPlanner {
            stats: SearchStats::default(),
        }
    }

    /// Plan a collision-free timed path from start to goal within the
    /// horizon. `None` means no such path exists, which is a normal outcome.
    pub fn plan(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
        obstacles: &[DynamicObstacle],
        max_time: u32,
    ) -> Option<Vec<PathStep>> {
        self.stats = SearchStats::default();
        let table = SafeIntervalTable::compute(grid, obstacles, max_time);

        // Interval lists are ascending, so time 0 can only fall in the first
        // interval. A first interval starting later means the start cell is
        // occupied at the moment planning begins: no consistent start state.
        let first = *table.intervals(start).first()?;
        if !first.contains(0) {
            return None;
        }

        let mut arena: Vec<SearchState> = Vec::new();
        let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();
        let mut closed: FxHashSet<(Position, Interval)> = FxHashSet::default();

        arena.push(SearchState {
            pos: start,
            interval: first,
            g: 0,
            h: manhattan_distance(start, goal),
            arrival_time: 0,
            parent: None,
        });
        frontier.push(FrontierEntry {
            f: arena[0].f(),
            h: arena[0].h,
            index: 0,
        });
        self.stats.generated += 1;

        while let Some(entry) = frontier.pop() {
            let current = arena[entry.index];

            // Any arrival at the goal cell ends the search; the goal test
            // runs before duplicate suppression.
            if current.pos == goal {
                return Some(reconstruct_path(&arena, entry.index));
            }

            if !closed.insert((current.pos, current.interval)) {
                self.stats.duplicates += 1;
                continue;
            }
            self.stats.expanded += 1;

            for (dx, dy) in MOVES {
                let nx = current.pos.x as i64 + dx;
                let ny = current.pos.y as i64 + dy;
                if nx < 0 || ny < 0 {
                    continue;
                }
                let next = Position {
                    x: nx as usize,
                    y: ny as usize,
                };
                if !grid.is_valid(next) {
                    continue;
                }

                for &interval in table.intervals(next) {
                    let arrival = current.arrival_time.saturating_add(1).max(interval.start);
                    if arrival > interval.end {
                        continue;
                    }
                    // The table already excludes occupied times, but duplicate
                    // or mutually overlapping records at one cell are only
                    // normalized one record at a time, so the raw windows are
                    // checked again here.
                    if obstacles.iter().any(|obs| obs.blocks(next, arrival)) {
                        continue;
                    }
                    // Only the destination cell at its arrival time is
                    // validated. The cell being vacated is not re-checked
                    // while an implicit wait runs out.
                    let state = SearchState {
                        pos: next,
                        interval,
                        g: current.g + 1,
                        h: manhattan_distance(next, goal),
                        arrival_time: arrival,
                        parent: Some(entry.index),
                    };
                    let index = arena.len();
                    arena.push(state);
                    frontier.push(FrontierEntry {
                        f: state.f(),
                        h: state.h,
                        index,
                    });
                    self.stats.generated += 1;
                }
            }
        }

        None
    }
}

/// Walk the parent indices back to the start state, then reverse into
/// start-to-goal order.
fn reconstruct_path(arena: &[SearchState], goal_index: usize) -> Vec<PathStep> {
    let mut steps = Vec::new();
    let mut cursor = Some(goal_index);
    while let Some(index) = cursor {
        let state = &arena[index];
        steps.push(PathStep {
            position: state.pos,
            arrival_time: state.arrival_time,
        });
        cursor = state.parent;
    }
    steps.reverse();
    steps
}

impl PathfindingAlgorithm for SippPlanner {
    fn find_path(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
        obstacles: &[DynamicObstacle],
        max_time: u32,
    ) -> Option<Vec<Position>> {
        self.plan(grid, start, goal, obstacles, max_time)
            .map(|steps| steps.iter().map(|step| step.position).collect())
    }

    fn find_timed_path(
        &mut self,
        grid: &Grid,
        start: Position,
        goal: Position,
        obstacles: &[DynamicObstacle],
        max_time: u32,
    ) -> Option<Vec<PathStep>> {
        self.plan(grid, start, goal, obstacles, max_time)
    }

    fn name(&self) -> &'static str {
        "sipp"
    }

    fn search_stats(&self) -> SearchStats {
        self.stats
    }
}
