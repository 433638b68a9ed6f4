//! Grade normalization, point weighting, and per-student aggregation.

pub mod aggregate;
pub mod normalize;
pub mod points;
pub mod types;
