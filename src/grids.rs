pub mod axis;
pub mod rectilinear_grid;
