use std::collections::{HashSet, VecDeque};

use super::grid::Cell;

/// Ordered snake body, head first, with a hash index of occupied cells.
///
/// The index is kept in sync with the sequence on every insertion and
/// removal, so [`Body::contains`] is O(1) regardless of length.
///
/// # Example
///
/// ```
/// use evoluvine_engine::{Body, Cell};
///
/// let mut body = Body::new(Cell::new(100, 100));
/// body.push_head(Cell::new(120, 100));
/// assert_eq!(body.len(), 2);
/// assert_eq!(body.pop_tail(), Some(Cell::new(100, 100)));
/// assert!(!body.contains(Cell::new(100, 100)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    cells: VecDeque<Cell>,
    occupied: HashSet<Cell>,
}

impl Body {
    #[must_use]
    pub fn new(head: Cell) -> Self {
        Self {
            cells: VecDeque::from([head]),
            occupied: HashSet::from([head]),
        }
    }

    /// Builds a body from cells listed head first.
    ///
    /// Returns `None` if `cells` is empty or contains a duplicate.
    pub fn from_cells<I>(cells: I) -> Option<Self>
    where
        I: IntoIterator<Item = Cell>,
    {
        let cells = cells.into_iter().collect::<VecDeque<_>>();
        let occupied = cells.iter().copied().collect::<HashSet<_>>();
        if cells.is_empty() || occupied.len() != cells.len() {
            return None;
        }
        Some(Self { cells, occupied })
    }

    #[must_use]
    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    #[must_use]
    pub fn tail(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a body keeps at least its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Prepends a new head.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is already part of the body.
    pub fn push_head(&mut self, cell: Cell) {
        assert!(self.occupied.insert(cell), "cell {cell:?} already occupied");
        self.cells.push_front(cell);
    }

    /// Removes the tail segment, keeping at least the head.
    pub fn pop_tail(&mut self) -> Option<Cell> {
        if self.cells.len() <= 1 {
            return None;
        }
        let tail = self.cells.pop_back()?;
        self.occupied.remove(&tail);
        Some(tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cells_rejects_duplicates_and_empty() {
        assert!(Body::from_cells([]).is_none());
        assert!(Body::from_cells([Cell::new(0, 0), Cell::new(0, 0)]).is_none());
        let body = Body::from_cells([Cell::new(20, 0), Cell::new(0, 0)]).unwrap();
        assert_eq!(body.head(), Cell::new(20, 0));
        assert_eq!(body.tail(), Cell::new(0, 0));
    }

    #[test]
    fn test_index_tracks_sequence() {
        let mut body = Body::new(Cell::new(0, 0));
        body.push_head(Cell::new(20, 0));
        body.push_head(Cell::new(40, 0));
        assert!(body.contains(Cell::new(0, 0)));

        assert_eq!(body.pop_tail(), Some(Cell::new(0, 0)));
        assert!(!body.contains(Cell::new(0, 0)));
        assert_eq!(
            body.iter().collect::<Vec<_>>(),
            vec![Cell::new(40, 0), Cell::new(20, 0)]
        );
    }

    #[test]
    fn test_pop_tail_keeps_head() {
        let mut body = Body::new(Cell::new(0, 0));
        assert_eq!(body.pop_tail(), None);
        assert_eq!(body.len(), 1);
        assert!(body.contains(Cell::new(0, 0)));
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn test_push_head_rejects_occupied_cell() {
        let mut body = Body::new(Cell::new(0, 0));
        body.push_head(Cell::new(0, 0));
    }
}
