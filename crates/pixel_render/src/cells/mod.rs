pub mod grid;
pub mod paint;
pub mod style;
