pub mod ai_model;
pub mod summary;
