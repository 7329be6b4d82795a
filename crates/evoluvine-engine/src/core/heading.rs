use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// One of the four axis-aligned movement directions.
///
/// The y axis points down, so [`Heading::Up`] decreases `y`.
///
/// # Example
///
/// ```
/// use evoluvine_engine::Heading;
///
/// assert_eq!(Heading::Right.turned_left(), Heading::Up);
/// assert_eq!(Heading::Right.turned_right(), Heading::Down);
/// assert_eq!(Heading::Right.offset(20), (20, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Distribution<Heading> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Heading {
        Heading::ALL[rng.random_range(0..Heading::ALL.len())]
    }
}

impl Heading {
    /// All headings, in the order used by absolute action outputs.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit vector `(dx, dy)` of this heading.
    #[must_use]
    pub const fn unit(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Pixel displacement of one step on a grid with the given cell size.
    #[must_use]
    pub const fn offset(self, cell_size: i32) -> (i32, i32) {
        let (dx, dy) = self.unit();
        (dx * cell_size, dy * cell_size)
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Heading after a 90° counter-clockwise turn (as seen on screen).
    #[must_use]
    pub const fn turned_left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    /// Heading after a 90° clockwise turn (as seen on screen).
    #[must_use]
    pub const fn turned_right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// Single-letter movement code (`U`, `D`, `L`, `R`).
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Up => 'U',
            Self::Down => 'D',
            Self::Left => 'L',
            Self::Right => 'R',
        }
    }
}
