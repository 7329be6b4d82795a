use evoluvine_engine::Heading;
use evoluvine_network::{Topology, TopologyError};
use serde::{Deserialize, Serialize};

use crate::AgentConfigError;

/// How the surroundings are turned into network inputs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensingScheme {
    /// Danger ahead/left/right plus the sine of the angle towards the food.
    #[default]
    DangerAndFoodAngle,
    /// Normalized food and hazard displacement plus the heading vector.
    Displacement,
}

impl SensingScheme {
    #[must_use]
    pub const fn input_len(self) -> usize {
        match self {
            Self::DangerAndFoodAngle => 4,
            Self::Displacement => 6,
        }
    }

    /// Whether the scheme has an input for the hazard.
    ///
    /// Populations only get a hazard in their environment when they can see it.
    #[must_use]
    pub const fn senses_hazard(self) -> bool {
        matches!(self, Self::Displacement)
    }
}

/// How the arg-max output index maps to the next heading.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionScheme {
    /// Forward, turn left, turn right.
    #[default]
    Relative,
    /// Up, down, left, right.
    Absolute,
}

impl ActionScheme {
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Relative => 3,
            Self::Absolute => 4,
        }
    }

    /// Heading chosen by output `index` while moving along `current`.
    ///
    /// With the absolute scheme, reversing onto the neck is vetoed for bodies
    /// longer than one cell and the current heading is kept instead. Returns
    /// `None` if `index` is not an output of this scheme.
    #[must_use]
    pub fn resolve(self, index: usize, current: Heading, body_len: usize) -> Option<Heading> {
        match self {
            Self::Relative => [current, current.turned_left(), current.turned_right()]
                .get(index)
                .copied(),
            Self::Absolute => {
                let chosen = *Heading::ALL.get(index)?;
                if body_len > 1 && chosen == current.opposite() {
                    Some(current)
                } else {
                    Some(chosen)
                }
            }
        }
    }
}

/// Sensing and action scheme shared by every agent of a population.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentScheme {
    pub sensing: SensingScheme,
    pub action: ActionScheme,
}

impl AgentScheme {
    /// Four inputs, three relative outputs.
    pub const RELATIVE: Self = Self {
        sensing: SensingScheme::DangerAndFoodAngle,
        action: ActionScheme::Relative,
    };

    /// Six inputs, four absolute outputs.
    pub const ABSOLUTE: Self = Self {
        sensing: SensingScheme::Displacement,
        action: ActionScheme::Absolute,
    };

    /// Infers the scheme from a network's input and output widths.
    #[must_use]
    pub fn from_widths(input: usize, output: usize) -> Option<Self> {
        [Self::RELATIVE, Self::ABSOLUTE]
            .into_iter()
            .find(|s| s.input_len() == input && s.output_len() == output)
    }

    #[must_use]
    pub const fn input_len(&self) -> usize {
        self.sensing.input_len()
    }

    #[must_use]
    pub const fn output_len(&self) -> usize {
        self.action.output_len()
    }

    /// Topology `[inputs, hidden..., outputs]` for this scheme.
    pub fn topology(&self, hidden: &[usize]) -> Result<Topology, TopologyError> {
        let mut widths = Vec::with_capacity(hidden.len() + 2);
        widths.push(self.input_len());
        widths.extend_from_slice(hidden);
        widths.push(self.output_len());
        Topology::new(widths)
    }

    /// Checks that `topology` has the input and output widths of this scheme.
    pub fn check(&self, topology: &Topology) -> Result<(), AgentConfigError> {
        if topology.input_len() == self.input_len() && topology.output_len() == self.output_len() {
            return Ok(());
        }
        Err(AgentConfigError {
            expected_input: self.input_len(),
            expected_output: self.output_len(),
            actual: topology.widths().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_resolution() {
        let s = ActionScheme::Relative;
        assert_eq!(s.resolve(0, Heading::Up, 5), Some(Heading::Up));
        assert_eq!(s.resolve(1, Heading::Up, 5), Some(Heading::Left));
        assert_eq!(s.resolve(2, Heading::Up, 5), Some(Heading::Right));
        assert_eq!(s.resolve(1, Heading::Right, 5), Some(Heading::Up));
        assert_eq!(s.resolve(3, Heading::Up, 5), None);
    }

    #[test]
    fn test_absolute_resolution() {
        let s = ActionScheme::Absolute;
        assert_eq!(s.resolve(0, Heading::Left, 3), Some(Heading::Up));
        assert_eq!(s.resolve(3, Heading::Up, 3), Some(Heading::Right));
        assert_eq!(s.resolve(4, Heading::Up, 3), None);
    }

    #[test]
    fn test_absolute_reversal_veto() {
        let s = ActionScheme::Absolute;
        // index 2 is Left, the reverse of Right
        assert_eq!(s.resolve(2, Heading::Right, 2), Some(Heading::Right));
        // a lone head may turn around
        assert_eq!(s.resolve(2, Heading::Right, 1), Some(Heading::Left));
    }

    #[test]
    fn test_scheme_from_widths() {
        assert_eq!(AgentScheme::from_widths(4, 3), Some(AgentScheme::RELATIVE));
        assert_eq!(AgentScheme::from_widths(6, 4), Some(AgentScheme::ABSOLUTE));
        assert_eq!(AgentScheme::from_widths(4, 4), None);
    }

    #[test]
    fn test_topology_and_check() {
        let topology = AgentScheme::RELATIVE.topology(&[10]).unwrap();
        assert_eq!(topology.widths(), &[4, 10, 3]);
        assert!(AgentScheme::RELATIVE.check(&topology).is_ok());

        let err = AgentScheme::ABSOLUTE.check(&topology).unwrap_err();
        assert_eq!(err.expected_input, 6);
        assert_eq!(err.expected_output, 4);
        assert_eq!(err.actual, vec![4, 10, 3]);
    }

    #[test]
    fn test_hazard_sensing() {
        assert!(SensingScheme::Displacement.senses_hazard());
        assert!(!SensingScheme::DangerAndFoodAngle.senses_hazard());
    }
}
