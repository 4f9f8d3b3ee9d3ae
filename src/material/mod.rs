//! Implements stress-strain models for solids and the material-point driver

mod drucker_prager;
mod elasticity;
mod linear_elastic;
mod loading_path;
mod solid_driver;
mod solid_state;
mod stress_strain;
mod von_mises;
pub use crate::material::drucker_prager::*;
pub use crate::material::elasticity::*;
pub use crate::material::linear_elastic::*;
pub use crate::material::loading_path::*;
pub use crate::material::solid_driver::*;
pub use crate::material::solid_state::*;
pub use crate::material::stress_strain::*;
pub use crate::material::von_mises::*;
