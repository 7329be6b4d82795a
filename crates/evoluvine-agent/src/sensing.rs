use arrayvec::ArrayVec;
use evoluvine_engine::{Body, Cell, Grid, Heading};

use crate::{SensingScheme, Surroundings};

/// Largest input vector any sensing scheme produces.
pub const MAX_INPUTS: usize = 6;

pub type SensorInputs = ArrayVec<f32, MAX_INPUTS>;

/// What the agent knows about itself when sensing.
#[derive(Debug, Clone, Copy)]
pub struct SelfView<'a> {
    pub grid: &'a Grid,
    pub body: &'a Body,
    pub heading: Heading,
}

impl SelfView<'_> {
    /// Whether moving one cell along `heading` hits a wall or the body.
    #[must_use]
    pub fn is_danger(&self, heading: Heading) -> bool {
        let next = self
            .body
            .head()
            .offset(heading.offset(self.grid.cell_size()));
        !self.grid.contains(next) || self.body.contains(next)
    }
}

impl SensingScheme {
    /// Input vector for the current tick, `self.input_len()` values long.
    #[expect(clippy::cast_precision_loss)]
    pub fn sense<S>(self, view: &SelfView<'_>, surroundings: &S) -> SensorInputs
    where
        S: Surroundings + ?Sized,
    {
        let mut inputs = SensorInputs::new();
        match self {
            Self::DangerAndFoodAngle => {
                let h = view.heading;
                for heading in [h, h.turned_left(), h.turned_right()] {
                    inputs.push(if view.is_danger(heading) { 1.0 } else { 0.0 });
                }
                inputs.push(food_angle_sine(
                    view.body.head(),
                    h,
                    surroundings.food(),
                ));
            }
            Self::Displacement => {
                let head = view.body.head();
                let (fx, fy) = displacement(view.grid, head, surroundings.food());
                let (hx, hy) = surroundings
                    .hazard()
                    .map_or((0.0, 0.0), |hazard| displacement(view.grid, head, hazard));
                let (ux, uy) = view.heading.unit();
                inputs.extend([fx, fy, hx, hy, ux as f32, uy as f32]);
            }
        }
        debug_assert_eq!(inputs.len(), self.input_len());
        inputs
    }
}

/// Signed sine of the angle from `heading` to the head→food vector.
///
/// Positive values mean the food lies clockwise of the heading in screen
/// coordinates. Zero when the food is on the head.
#[expect(clippy::cast_precision_loss)]
fn food_angle_sine(head: Cell, heading: Heading, food: Cell) -> f32 {
    let dx = (food.x - head.x) as f32;
    let dy = (food.y - head.y) as f32;
    let norm = dx.hypot(dy);
    if norm == 0.0 {
        return 0.0;
    }
    let (hx, hy) = heading.unit();
    (hx as f32 * dy - hy as f32 * dx) / norm
}

#[expect(clippy::cast_precision_loss)]
fn displacement(grid: &Grid, from: Cell, to: Cell) -> (f32, f32) {
    (
        (to.x - from.x) as f32 / grid.width() as f32,
        (to.y - from.y) as f32 / grid.height() as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Stimulus;

    fn view<'a>(grid: &'a Grid, body: &'a Body, heading: Heading) -> SelfView<'a> {
        SelfView {
            grid,
            body,
            heading,
        }
    }

    fn food_at(x: i32, y: i32) -> Stimulus {
        Stimulus {
            food: Cell::new(x, y),
            hazard: None,
        }
    }

    mod danger_and_food_angle {
        use super::*;

        #[test]
        fn test_open_field() {
            let grid = Grid::DEFAULT;
            let body = Body::new(Cell::new(100, 100));
            let inputs = SensingScheme::DangerAndFoodAngle
                .sense(&view(&grid, &body, Heading::Right), &food_at(200, 100));
            assert_eq!(inputs.as_slice(), &[0.0, 0.0, 0.0, 0.0]);
        }

        #[test]
        fn test_walls() {
            let grid = Grid::DEFAULT;
            let body = Body::new(Cell::new(0, 0));
            // ahead is the top wall, left of Up is the left wall
            let inputs = SensingScheme::DangerAndFoodAngle
                .sense(&view(&grid, &body, Heading::Up), &food_at(0, 0));
            assert_eq!(&inputs[..3], &[1.0, 1.0, 0.0]);
            assert_eq!(inputs[3], 0.0);
        }

        #[test]
        fn test_body_is_danger() {
            let grid = Grid::DEFAULT;
            let body = Body::from_cells([
                Cell::new(100, 100),
                Cell::new(100, 80),
                Cell::new(120, 80),
                Cell::new(120, 100),
            ])
            .unwrap();
            // heading Left: right turn is Up, which is the neck
            let view = view(&grid, &body, Heading::Left);
            assert!(!view.is_danger(Heading::Left));
            assert!(view.is_danger(Heading::Up));
            assert!(view.is_danger(Heading::Right));
        }

        #[test]
        fn test_food_angle_sign() {
            let grid = Grid::DEFAULT;
            let body = Body::new(Cell::new(100, 100));
            let right = view(&grid, &body, Heading::Right);
            // food straight below while heading right: clockwise quarter turn
            let below = SensingScheme::DangerAndFoodAngle.sense(&right, &food_at(100, 200));
            assert!((below[3] - 1.0).abs() < 1e-6);
            let above = SensingScheme::DangerAndFoodAngle.sense(&right, &food_at(100, 0));
            assert!((above[3] + 1.0).abs() < 1e-6);
            let behind = SensingScheme::DangerAndFoodAngle.sense(&right, &food_at(0, 100));
            assert!(behind[3].abs() < 1e-6);
        }
    }

    mod displacement {
        use super::*;

        #[test]
        fn test_food_and_heading() {
            let grid = Grid::DEFAULT;
            let body = Body::new(Cell::new(400, 300));
            let inputs = SensingScheme::Displacement
                .sense(&view(&grid, &body, Heading::Down), &food_at(600, 150));
            assert_eq!(inputs.as_slice(), &[0.25, -0.25, 0.0, 0.0, 0.0, 1.0]);
        }

        #[test]
        fn test_hazard() {
            let grid = Grid::DEFAULT;
            let body = Body::new(Cell::new(400, 300));
            let stimulus = Stimulus {
                food: Cell::new(400, 300),
                hazard: Some(Cell::new(0, 0)),
            };
            let inputs =
                SensingScheme::Displacement.sense(&view(&grid, &body, Heading::Left), &stimulus);
            assert_eq!(inputs.as_slice(), &[0.0, 0.0, -0.5, -0.5, -1.0, 0.0]);
        }
    }
}
