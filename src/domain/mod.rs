pub mod area;
pub mod city;
pub mod matrix;

pub use area::Area;
pub use city::{CityCode, CityRegistry};
pub use matrix::CostMatrix;
