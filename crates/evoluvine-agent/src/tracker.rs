use std::collections::{HashMap, VecDeque};

use evoluvine_engine::{Cell, Heading};
use serde::Serialize;

/// Capacity of the recent head position history.
pub const RECENT_POSITIONS: usize = 20;
/// Capacity of the recent heading history.
pub const RECENT_HEADINGS: usize = 20;
/// Capacity of the movement code history searched for cycles.
pub const MOVEMENT_CODES: usize = 16;
/// Positions kept when the agent eats.
pub const POSITIONS_KEPT_ON_GROWTH: usize = 10;

const CYCLE_LENGTHS: [usize; 3] = [2, 3, 4];
const MIN_CYCLE_CODES: usize = 8;
const BACK_AND_FORTH_WINDOW: usize = 10;
const STATS_PATTERN_LEN: usize = 8;

/// Bounded movement histories and the loop detectors that read them.
#[derive(Debug, Clone, Default)]
pub struct MovementTracker {
    positions: VecDeque<Cell>,
    visits: HashMap<Cell, u32>,
    headings: VecDeque<Heading>,
    codes: VecDeque<Heading>,
}

fn push_bounded<T>(queue: &mut VecDeque<T>, value: T, capacity: usize) {
    if queue.len() == capacity {
        queue.pop_front();
    }
    queue.push_back(value);
}

impl MovementTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.visits.clear();
        self.headings.clear();
        self.codes.clear();
    }

    /// Records the heading chosen for the upcoming move.
    pub fn record_heading(&mut self, heading: Heading) {
        push_bounded(&mut self.headings, heading, RECENT_HEADINGS);
        push_bounded(&mut self.codes, heading, MOVEMENT_CODES);
    }

    /// Records a new head position and counts the visit.
    pub fn record_position(&mut self, cell: Cell) {
        push_bounded(&mut self.positions, cell, RECENT_POSITIONS);
        *self.visits.entry(cell).or_default() += 1;
    }

    /// Trims the position history and forgives one visit of every cell.
    pub fn forgive_on_growth(&mut self) {
        let excess = self.positions.len().saturating_sub(POSITIONS_KEPT_ON_GROWTH);
        self.positions.drain(..excess);
        for count in self.visits.values_mut() {
            *count = count.saturating_sub(1);
        }
    }

    #[must_use]
    pub fn visits(&self, cell: Cell) -> u32 {
        self.visits.get(&cell).copied().unwrap_or(0)
    }

    /// Sum over all cells of the visits beyond the first.
    #[must_use]
    pub fn excess_revisits(&self) -> u32 {
        self.visits.values().map(|c| c.saturating_sub(1)).sum()
    }

    #[must_use]
    pub fn recent_headings(&self) -> &VecDeque<Heading> {
        &self.headings
    }

    /// Whether the last `window` headings exist and are all equal.
    #[must_use]
    pub fn same_heading_run(&self, window: usize) -> bool {
        window > 0 && self.headings.len() >= window && {
            let mut recent = self.headings.iter().rev().take(window);
            let first = recent.next();
            recent.all(|h| Some(h) == first)
        }
    }

    /// Whether the last `window` headings exist and are not all equal.
    #[must_use]
    pub fn headings_vary(&self, window: usize) -> bool {
        self.headings.len() >= window && !self.same_heading_run(window)
    }

    /// Whether the movement codes end in two identical blocks of length 2, 3
    /// or 4.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        let len = self.codes.len();
        if len < MIN_CYCLE_CODES {
            return false;
        }
        CYCLE_LENGTHS.iter().any(|&k| {
            len >= 2 * k && (len - 2 * k..len - k).all(|i| self.codes[i] == self.codes[i + k])
        })
    }

    /// Whether enough consecutive opposite headings occur among the recent
    /// ones.
    #[must_use]
    pub fn has_back_and_forth(&self, min_headings: usize, min_pairs: usize) -> bool {
        let window = self.headings.len().min(BACK_AND_FORTH_WINDOW);
        if window < min_headings {
            return false;
        }
        let recent = self.headings.range(self.headings.len() - window..);
        let pairs = recent
            .clone()
            .zip(recent.skip(1))
            .filter(|(a, b)| a.opposite() == **b)
            .count();
        pairs >= min_pairs
    }

    /// Whether the last `window` positions fit in a `span`-pixel box on both
    /// axes.
    #[must_use]
    pub fn is_boxed_in(&self, window: usize, span: i32) -> bool {
        if window == 0 || self.positions.len() < window {
            return false;
        }
        let recent = self.positions.range(self.positions.len() - window..);
        let (mut min, mut max) = (Cell::new(i32::MAX, i32::MAX), Cell::new(i32::MIN, i32::MIN));
        for cell in recent {
            min = Cell::new(min.x.min(cell.x), min.y.min(cell.y));
            max = Cell::new(max.x.max(cell.x), max.y.max(cell.y));
        }
        max.x - min.x <= span && max.y - min.y <= span
    }

    #[must_use]
    pub fn stats(&self, back_and_forth: (usize, usize)) -> LoopStats {
        let skip = self.codes.len().saturating_sub(STATS_PATTERN_LEN);
        LoopStats {
            max_revisits: self.visits.values().copied().max().unwrap_or(0),
            unique_positions: self.visits.len(),
            recent_pattern: self.codes.iter().skip(skip).map(|h| h.as_char()).collect(),
            cycle_detected: self.has_cycle(),
            back_and_forth_detected: self.has_back_and_forth(back_and_forth.0, back_and_forth.1),
        }
    }
}

/// Snapshot of the loop detection state, for debugging and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    pub max_revisits: u32,
    pub unique_positions: usize,
    /// Last movement codes, one of `U`, `D`, `L`, `R` each.
    pub recent_pattern: String,
    pub cycle_detected: bool,
    pub back_and_forth_detected: bool,
}
