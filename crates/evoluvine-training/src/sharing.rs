//! Fitness sharing.
//!
//! Individuals crowded into the same region of genome space split their
//! fitness. For each individual, every *other* individual closer than the
//! niche radius `σ` adds `1 − d/σ` to its niche count, where `d` is the
//! [`genetic_distance`]. Shared fitness is `raw / (1 + niche_count)`; an
//! individual with no neighbors keeps its raw fitness.
//!
//! Sharing only steers parent selection. Elites are always ranked by raw
//! fitness.

use evoluvine_network::{Network, ShapeMismatchError};

use crate::operators::genetic_distance;

/// Shared fitness of every network, in input order.
///
/// A non-positive radius disables sharing and returns the raw values.
///
/// # Errors
///
/// Returns [`ShapeMismatchError`] if the networks do not all have the same
/// layer widths.
///
/// # Panics
///
/// Panics if `networks` and `fitness` have different lengths.
pub fn shared_fitness(
    networks: &[&Network],
    fitness: &[f32],
    radius: f32,
) -> Result<Vec<f32>, ShapeMismatchError> {
    assert_eq!(
        networks.len(),
        fitness.len(),
        "every network needs a fitness value"
    );
    if radius <= 0.0 {
        return Ok(fitness.to_vec());
    }

    let mut niche = vec![0.0_f32; networks.len()];
    for i in 0..networks.len() {
        for j in i + 1..networks.len() {
            let d = genetic_distance(networks[i], networks[j])?;
            if d < radius {
                let share = 1.0 - d / radius;
                niche[i] += share;
                niche[j] += share;
            }
        }
    }

    Ok(fitness
        .iter()
        .zip(niche)
        .map(|(&raw, count)| if count > 0.0 { raw / (1.0 + count) } else { raw })
        .collect())
}

#[cfg(test)]
mod tests {
    use evoluvine_network::Topology;

    use super::*;

    fn constant_network(value: f32) -> Network {
        Network::from_fn(Topology::new(vec![2, 1]).unwrap(), |_, _| value)
    }

    #[test]
    fn test_isolated_individuals_keep_raw_fitness() {
        let a = constant_network(0.0);
        let b = constant_network(5.0);
        let shared = shared_fitness(&[&a, &b], &[10.0, 20.0], 1.0).unwrap();
        assert_eq!(shared, vec![10.0, 20.0]);
    }

    #[test]
    fn test_clones_split_fitness() {
        let a = constant_network(0.5);
        let b = a.clone();
        let c = constant_network(0.75);
        let shared = shared_fitness(&[&a, &b, &c], &[12.0, 12.0, 12.0], 1.0).unwrap();
        // a and b: 1 from each other, 0.75 from c
        assert!((shared[0] - 12.0 / 2.75).abs() < 1e-5);
        assert!((shared[1] - 12.0 / 2.75).abs() < 1e-5);
        // c: 0.75 from each of a and b
        assert!((shared[2] - 12.0 / 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_non_positive_radius_disables_sharing() {
        let a = constant_network(0.5);
        let shared = shared_fitness(&[&a, &a], &[3.0, 4.0], 0.0).unwrap();
        assert_eq!(shared, vec![3.0, 4.0]);
    }

    #[test]
    fn test_rejects_mixed_shapes() {
        let a = constant_network(0.5);
        let b = Network::from_fn(Topology::new(vec![3, 1]).unwrap(), |_, _| 0.5);
        assert!(shared_fitness(&[&a, &b], &[1.0, 1.0], 1.0).is_err());
    }
}
