pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    #[display("grid dimensions must be positive, got {width}x{height} with cell size {cell_size}")]
    NonPositive {
        width: i32,
        height: i32,
        cell_size: i32,
    },
    #[display("grid dimensions {width}x{height} are not a multiple of cell size {cell_size}")]
    Unaligned {
        width: i32,
        height: i32,
        cell_size: i32,
    },
}
