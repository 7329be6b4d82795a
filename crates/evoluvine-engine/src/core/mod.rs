pub use self::{body::*, grid::*, heading::*};

pub(crate) mod body;
pub(crate) mod grid;
pub(crate) mod heading;
