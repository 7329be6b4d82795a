//! Fitness-proportional (roulette wheel) parent selection.
//!
//! Fitness values may be negative, so they are shifted by `1 − min` before
//! being used as weights: the worst individual keeps weight 1 and every
//! probability is strictly positive. When the shifted total is zero or not
//! finite (NaN or infinite fitness), selection falls back to uniform.

use rand::{Rng, distr::Distribution, distr::weighted::WeightedIndex};

/// Redraws of the second parent before picking uniformly among the others.
const MAX_REDRAWS: usize = 64;

/// Selection probability of every individual.
///
/// The result is empty for an empty slice; otherwise every entry is positive
/// and they sum to 1.
///
/// ```
/// use evoluvine_training::selection::selection_probabilities;
///
/// let p = selection_probabilities(&[-1.0, 0.0, 1.0]);
/// assert_eq!(p, vec![1.0 / 6.0, 2.0 / 6.0, 3.0 / 6.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn selection_probabilities(fitness: &[f32]) -> Vec<f32> {
    let weights = shifted_weights(fitness);
    let total = weights.iter().sum::<f32>();
    if total.is_finite() && total > 0.0 {
        weights.iter().map(|w| w / total).collect()
    } else {
        vec![1.0 / fitness.len() as f32; fitness.len()]
    }
}

fn shifted_weights(fitness: &[f32]) -> Vec<f32> {
    let min = fitness.iter().copied().fold(f32::INFINITY, f32::min);
    fitness.iter().map(|f| f - min + 1.0).collect()
}

/// Roulette wheel over a fixed set of fitness values.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    len: usize,
    /// `None` when selection is uniform.
    index: Option<WeightedIndex<f32>>,
}

impl RouletteWheel {
    #[must_use]
    pub fn new(fitness: &[f32]) -> Self {
        let weights = shifted_weights(fitness);
        let index = weights
            .iter()
            .all(|w| w.is_finite())
            .then(|| WeightedIndex::new(&weights).ok())
            .flatten();
        Self {
            len: fitness.len(),
            index,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Draws one index, or `None` if the wheel is empty.
    pub fn spin<R>(&self, rng: &mut R) -> Option<usize>
    where
        R: Rng + ?Sized,
    {
        if self.is_empty() {
            return None;
        }
        Some(match &self.index {
            Some(index) => index.sample(rng),
            None => rng.random_range(0..self.len),
        })
    }

    /// Draws two parents with replacement, redrawing the second until it
    /// differs from the first whenever there is more than one individual.
    pub fn spin_pair<R>(&self, rng: &mut R) -> Option<(usize, usize)>
    where
        R: Rng + ?Sized,
    {
        let first = self.spin(rng)?;
        if self.len == 1 {
            return Some((first, first));
        }
        for _ in 0..MAX_REDRAWS {
            let second = self.spin(rng)?;
            if second != first {
                return Some((first, second));
            }
        }
        // the first parent dominates the wheel
        let second = (first + rng.random_range(1..self.len)) % self.len;
        Some((first, second))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    mod probabilities {
        use super::*;

        fn assert_valid(p: &[f32]) {
            assert!(p.iter().all(|&x| x > 0.0), "{p:?}");
            assert!((p.iter().sum::<f32>() - 1.0).abs() < 1e-5, "{p:?}");
        }

        #[test]
        fn test_negative_and_mixed_fitness() {
            let p = selection_probabilities(&[-50.0, -10.0, 0.0, 30.0]);
            assert_valid(&p);
            assert!(p.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn test_equal_fitness_is_uniform() {
            let p = selection_probabilities(&[3.0; 4]);
            assert_eq!(p, vec![0.25; 4]);
        }

        #[test]
        fn test_non_finite_falls_back_to_uniform() {
            for fitness in [
                [1.0, f32::NAN, 2.0],
                [1.0, f32::INFINITY, 2.0],
                [f32::NEG_INFINITY, 0.0, 2.0],
            ] {
                let p = selection_probabilities(&fitness);
                assert_eq!(p, vec![1.0 / 3.0; 3]);
            }
        }

        #[test]
        fn test_empty() {
            assert!(selection_probabilities(&[]).is_empty());
        }
    }

    mod wheel {
        use super::*;

        #[test]
        fn test_empty_wheel() {
            let mut rng = Pcg32::seed_from_u64(0);
            let wheel = RouletteWheel::new(&[]);
            assert_eq!(wheel.spin(&mut rng), None);
            assert_eq!(wheel.spin_pair(&mut rng), None);
        }

        #[test]
        fn test_single_individual_pairs_with_itself() {
            let mut rng = Pcg32::seed_from_u64(0);
            let wheel = RouletteWheel::new(&[10.0]);
            assert_eq!(wheel.spin_pair(&mut rng), Some((0, 0)));
        }

        #[test]
        fn test_pairs_are_distinct() {
            let mut rng = Pcg32::seed_from_u64(0);
            let wheel = RouletteWheel::new(&[1.0, 2.0]);
            for _ in 0..100 {
                let (a, b) = wheel.spin_pair(&mut rng).unwrap();
                assert_ne!(a, b);
            }

            // one individual holds almost the whole wheel
            let wheel = RouletteWheel::new(&[1e9, 0.0, 0.0]);
            for _ in 0..20 {
                let (a, b) = wheel.spin_pair(&mut rng).unwrap();
                assert_ne!(a, b);
            }
        }

        #[test]
        fn test_favors_fitter_individuals() {
            let mut rng = Pcg32::seed_from_u64(7);
            let wheel = RouletteWheel::new(&[0.0, 99.0]);
            let hits = (0..1000)
                .filter(|_| wheel.spin(&mut rng) == Some(1))
                .count();
            assert!(hits > 900, "{hits}");
        }

        #[test]
        fn test_nan_fitness_still_selects() {
            let mut rng = Pcg32::seed_from_u64(7);
            let wheel = RouletteWheel::new(&[f32::NAN, 1.0, 2.0]);
            for _ in 0..50 {
                assert!(wheel.spin(&mut rng).unwrap() < 3);
            }
        }
    }
}
