use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::core::{Body, Cell, Grid};

/// Items are never placed on the outermost ring of cells.
pub const ITEM_MARGIN: i32 = 1;

/// Attempts to find a free cell before accepting any cell.
const PLACEMENT_ATTEMPTS: usize = 100;

/// Food and optional hazard positions for one simulated snake.
///
/// Each environment owns its own random generator, so environments created
/// from the same seed produce the same item sequence for the same sequence
/// of calls.
///
/// # Example
///
/// ```
/// use evoluvine_engine::{Body, Environment, Grid};
///
/// let grid = Grid::DEFAULT;
/// let mut env = Environment::new(grid, true, 42);
/// let body = Body::new(grid.center());
///
/// env.respawn_food(&body);
/// assert!(!body.contains(env.food()));
/// assert_ne!(env.hazard(), Some(env.food()));
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    grid: Grid,
    food: Cell,
    hazard: Option<Cell>,
    rng: Pcg32,
}

impl Environment {
    /// Creates an environment with randomly placed items.
    ///
    /// A hazard is placed only when `with_hazard` is set.
    #[must_use]
    pub fn new(grid: Grid, with_hazard: bool, seed: u64) -> Self {
        Self::with_rng(grid, with_hazard, Pcg32::seed_from_u64(seed))
    }

    /// Like [`Self::new`], but with an explicit generator.
    #[must_use]
    pub fn with_rng(grid: Grid, with_hazard: bool, mut rng: Pcg32) -> Self {
        let food = grid.random_cell(&mut rng, ITEM_MARGIN);
        let mut this = Self {
            grid,
            food,
            hazard: None,
            rng,
        };
        if with_hazard {
            this.hazard = Some(this.free_cell(|cell| cell != food));
        }
        this
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn food(&self) -> Cell {
        self.food
    }

    #[must_use]
    pub fn hazard(&self) -> Option<Cell> {
        self.hazard
    }

    #[must_use]
    pub fn is_food_at(&self, cell: Cell) -> bool {
        self.food == cell
    }

    #[must_use]
    pub fn is_hazard_at(&self, cell: Cell) -> bool {
        self.hazard == Some(cell)
    }

    /// Moves the food to a random cell outside `body` and off the hazard.
    pub fn respawn_food(&mut self, body: &Body) {
        let hazard = self.hazard;
        self.food = self.free_cell(|cell| !body.contains(cell) && Some(cell) != hazard);
    }

    /// Moves the hazard (if any) to a random cell outside `body` and off the food.
    pub fn relocate_hazard(&mut self, body: &Body) {
        if self.hazard.is_none() {
            return;
        }
        let food = self.food;
        self.hazard = Some(self.free_cell(|cell| !body.contains(cell) && cell != food));
    }

    fn free_cell<F>(&mut self, mut is_free: F) -> Cell
    where
        F: FnMut(Cell) -> bool,
    {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let cell = self.grid.random_cell(&mut self.rng, ITEM_MARGIN);
            if is_free(cell) {
                return cell;
            }
        }
        self.grid.random_cell(&mut self.rng, ITEM_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_items() {
        let a = Environment::new(Grid::DEFAULT, true, 3);
        let b = Environment::new(Grid::DEFAULT, true, 3);
        assert_eq!(a.food(), b.food());
        assert_eq!(a.hazard(), b.hazard());
    }

    #[test]
    fn test_hazard_only_when_requested() {
        let env = Environment::new(Grid::DEFAULT, false, 3);
        assert_eq!(env.hazard(), None);
        assert!(!env.is_hazard_at(env.food()));

        let env = Environment::new(Grid::DEFAULT, true, 3);
        assert!(env.hazard().is_some());
        assert_ne!(env.hazard(), Some(env.food()));
    }

    #[test]
    fn test_items_stay_inside_margin() {
        let grid = Grid::DEFAULT;
        let mut env = Environment::new(grid, true, 11);
        let body = Body::new(grid.center());
        for _ in 0..200 {
            env.respawn_food(&body);
            env.relocate_hazard(&body);
            for cell in [env.food(), env.hazard().unwrap()] {
                assert!(grid.contains(cell));
                assert!(cell.x >= grid.cell_size() && cell.x < grid.width() - grid.cell_size());
                assert!(cell.y >= grid.cell_size() && cell.y < grid.height() - grid.cell_size());
            }
        }
    }

    #[test]
    fn test_respawn_avoids_body() {
        // 3x3 playable interior; the body covers all of it except one cell
        let grid = Grid::new(100, 100, 20).unwrap();
        let body = Body::from_cells(
            (1..4)
                .flat_map(|y| (1..4).map(move |x| Cell::new(x * 20, y * 20)))
                .filter(|cell| *cell != Cell::new(60, 60)),
        )
        .unwrap();
        let mut env = Environment::new(grid, false, 5);
        for _ in 0..20 {
            env.respawn_food(&body);
            assert_eq!(env.food(), Cell::new(60, 60));
        }
    }
}
