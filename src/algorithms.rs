pub(crate) mod sweep;
pub mod bounds;
pub mod coefficients;
pub mod evaluation;
