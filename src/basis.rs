pub mod base;
pub mod bspline;
pub mod kernel;
pub mod linear;
pub mod nearest;
pub mod pchip;
