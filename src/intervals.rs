use crate::grid::{Grid, Position};
use crate::obstacle::DynamicObstacle;
use rustc_hash::FxHashMap;

/// A closed span of discrete time units, inclusive on both ends.
///
/// Plain value type with structural equality and ordering so it can key the
/// search's closed set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Interval { start, end }
    }

    pub fn contains(&self, time: u32) -> bool {
        self.start <= time && time <= self.end
    }

    pub fn overlaps(&self, start_time: u32, end_time: u32) -> bool {
        start_time <= self.end && end_time >= self.start
    }
}

/// Safe intervals per cell: the spans of `[0, max_time]` left over once every
/// obstacle window touching the cell has been subtracted. Valid cells always
/// have an entry; a cell blocked for the whole horizon keeps an empty list.
///
/// Each list is disjoint and ascending by construction: subtraction splits an
/// ordered list and keeps the fragments in encounter order, which preserves
/// ordering. The search relies on this and never re-sorts.
#[derive(Debug, Clone)]
pub struct SafeIntervalTable {
    intervals: FxHashMap<Position, Vec<Interval>>,
}

impl SafeIntervalTable {
    pub fn compute(grid: &Grid, obstacles: &[DynamicObstacle], max_time: u32) -> Self {
        let mut intervals: FxHashMap<Position, Vec<Interval>> = FxHashMap::default();

        for x in 0..grid.width {
            for y in 0..grid.height {
                let pos = Position { x, y };
                if grid.is_valid(pos) {
                    intervals.insert(pos, vec![Interval::new(0, max_time)]);
                }
            }
        }

        for obs in obstacles {
            let pos = obs.position();
            // Records pointing at walls or out-of-range cells are ignored.
            if !grid.is_valid(pos) {
                continue;
            }
            if let Some(list) = intervals.get_mut(&pos) {
                let mut survivors = Vec::with_capacity(list.len() + 1);
                for interval in list.iter() {
                    if !interval.overlaps(obs.start_time, obs.end_time) {
                        // Window misses this interval entirely.
                        survivors.push(*interval);
                    } else if obs.start_time <= interval.start && obs.end_time >= interval.end {
                        // Window swallows the interval.
                    } else {
                        // Partial overlap: keep whichever ends stay uncovered.
                        if obs.start_time > interval.start {
                            survivors.push(Interval::new(interval.start, obs.start_time - 1));
                        }
                        if obs.end_time < interval.end {
                            survivors.push(Interval::new(obs.end_time + 1, interval.end));
                        }
                    }
                }
                *list = survivors;
            }
        }

        SafeIntervalTable { intervals }
    }

    /// Intervals for a cell, ascending by start time. Cells absent from the
    /// table (walls, out of range) come back empty, same as cells whose whole
    /// horizon is blocked.
    pub fn intervals(&self, pos: Position) -> &[Interval] {
        self.intervals.get(&pos).map_or(&[], |list| list.as_slice())
    }
}
