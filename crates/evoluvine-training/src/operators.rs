//! Genetic operators on whole networks.
//!
//! Every operator treats a network as one flat genome: all weight matrices
//! followed by all bias vectors, layer by layer. Shapes never change; only
//! values do.
//!
//! - **Crossover**: [`crossover`] blends two parents arithmetically
//! - **Mutation**: [`Mutation`] perturbs a Bernoulli-masked subset of entries
//! - **Distance**: [`genetic_distance`] measures how far apart two genomes are,
//!   used by fitness sharing

use evoluvine_network::{Network, ShapeMismatchError};
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// Arithmetic crossover: every entry of the child is `alpha·p1 + (1 − alpha)·p2`.
///
/// `alpha = 0.5` averages the parents; `alpha = 1.0` copies `p1`.
///
/// # Errors
///
/// Returns [`ShapeMismatchError`] if the parents have different layer widths.
///
/// # Example
///
/// ```
/// use evoluvine_network::{Network, Topology};
/// use evoluvine_training::operators::crossover;
///
/// let topology = Topology::new(vec![2, 1]).unwrap();
/// let a = Network::from_fn(topology.clone(), |_, _| 1.0);
/// let b = Network::from_fn(topology, |_, _| 3.0);
/// let child = crossover(&a, &b, 0.5).unwrap();
/// assert!(child.params().all(|p| p == 2.0));
/// ```
pub fn crossover(p1: &Network, p2: &Network, alpha: f32) -> Result<Network, ShapeMismatchError> {
    p1.zip_with(p2, |a, b| alpha * a + (1.0 - alpha) * b)
}

/// Mutation operator applied to every child.
///
/// Each entry is selected independently with probability `rate`. Loading a
/// Gaussian mutation whose `strength` is negative or not finite fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MutationParams", into = "MutationParams")]
pub enum Mutation {
    /// Selected entries are replaced by a fresh value from `U[-1, 1]`.
    Replace { rate: f32 },
    /// Selected entries get `N(0, strength)` noise added.
    Gaussian { rate: f32, strength: f32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum MutationParams {
    Replace { rate: f32 },
    Gaussian { rate: f32, strength: f32 },
}

/// A Gaussian mutation strength that cannot parameterize a normal
/// distribution.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("mutation strength must be finite and non-negative, got {strength}")]
pub struct MutationStrengthError {
    pub strength: f32,
}

impl TryFrom<MutationParams> for Mutation {
    type Error = MutationStrengthError;

    fn try_from(params: MutationParams) -> Result<Self, Self::Error> {
        match params {
            MutationParams::Replace { rate } => Ok(Self::Replace { rate }),
            MutationParams::Gaussian { rate, strength } => Self::gaussian(rate, strength),
        }
    }
}

impl From<Mutation> for MutationParams {
    fn from(mutation: Mutation) -> Self {
        match mutation {
            Mutation::Replace { rate } => Self::Replace { rate },
            Mutation::Gaussian { rate, strength } => Self::Gaussian { rate, strength },
        }
    }
}

impl Default for Mutation {
    fn default() -> Self {
        Self::Replace { rate: 0.3 }
    }
}

impl Mutation {
    /// Gaussian mutation with a validated `strength`.
    pub fn gaussian(rate: f32, strength: f32) -> Result<Self, MutationStrengthError> {
        if strength.is_finite() && strength >= 0.0 {
            Ok(Self::Gaussian { rate, strength })
        } else {
            Err(MutationStrengthError { strength })
        }
    }

    #[must_use]
    pub fn rate(&self) -> f32 {
        match *self {
            Self::Replace { rate } | Self::Gaussian { rate, .. } => rate,
        }
    }

    /// Mutates `network` in place. Rates outside `[0, 1]` are clamped.
    ///
    /// # Panics
    ///
    /// Panics if a Gaussian `strength` is negative or not finite.
    pub fn apply<R>(&self, network: &mut Network, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let p = f64::from(self.rate().clamp(0.0, 1.0));
        match *self {
            Self::Replace { .. } => {
                for w in network.params_mut() {
                    if rng.random_bool(p) {
                        *w = rng.random_range(-1.0..=1.0);
                    }
                }
            }
            Self::Gaussian { strength, .. } => {
                let normal = Normal::new(0.0, strength)
                    .expect("mutation strength must be finite and non-negative");
                for w in network.params_mut() {
                    if rng.random_bool(p) {
                        *w += rng.sample(normal);
                    }
                }
            }
        }
    }
}

/// Root-mean-square difference over every weight and bias entry.
///
/// Symmetric, and zero exactly when the networks have identical parameters.
///
/// # Errors
///
/// Returns [`ShapeMismatchError`] if the networks have different layer widths.
#[expect(clippy::cast_precision_loss)]
pub fn genetic_distance(a: &Network, b: &Network) -> Result<f32, ShapeMismatchError> {
    a.check_compatible(b)?;
    let (sum, count) = a
        .params()
        .zip(b.params())
        .fold((0.0_f32, 0_usize), |(sum, count), (x, y)| {
            (sum + (x - y).powi(2), count + 1)
        });
    Ok((sum / count as f32).sqrt())
}
