use serde::{Deserialize, Serialize};

/// Pre-activation values fed to the sigmoid are clamped to `±SIGMOID_CLAMP`.
pub const SIGMOID_CLAMP: f32 = 500.0;

/// Element-wise activation applied after each layer's affine map.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Sigmoid,
    Relu,
    Identity,
}

impl Activation {
    #[must_use]
    pub fn apply(self, z: f32) -> f32 {
        match self {
            Self::Sigmoid => {
                let z = z.clamp(-SIGMOID_CLAMP, SIGMOID_CLAMP);
                1.0 / (1.0 + (-z).exp())
            }
            Self::Relu => z.max(0.0),
            Self::Identity => z,
        }
    }
}

/// Activation of the hidden layers and of the output layer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerActivations {
    pub hidden: Activation,
    pub output: Activation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_midpoint_and_bounds() {
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < f32::EPSILON);
        assert!(Activation::Sigmoid.apply(10.0) > 0.99);
        assert!(Activation::Sigmoid.apply(-10.0) < 0.01);
    }

    #[test]
    fn test_sigmoid_extreme_inputs_stay_finite() {
        for z in [f32::MAX, f32::MIN, 1e30, -1e30, f32::INFINITY, f32::NEG_INFINITY] {
            let a = Activation::Sigmoid.apply(z);
            assert!(a.is_finite(), "sigmoid({z}) = {a}");
            assert!((0.0..=1.0).contains(&a));
        }
    }

    #[test]
    fn test_relu_and_identity() {
        assert_eq!(Activation::Relu.apply(-2.0), 0.0);
        assert_eq!(Activation::Relu.apply(3.0), 3.0);
        assert_eq!(Activation::Identity.apply(-2.0), -2.0);
    }
}
