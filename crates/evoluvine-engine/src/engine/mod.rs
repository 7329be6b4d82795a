//! Simulation environment around a single snake.
//!
//! - [`Environment`] - food and hazard placement on a [`Grid`](crate::Grid)
//!
//! The environment only places items; it never moves the snake. A training
//! harness advances the snake, then asks the environment whether the new
//! head landed on the food or the hazard and reacts accordingly.

pub use self::environment::*;

mod environment;
