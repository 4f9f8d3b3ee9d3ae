//! Implements liquid retention models and the porous medium model at a material point

mod brooks_corey;
mod linear_retention;
mod pedroso_williams;
mod porous_driver;
mod porous_model;
mod porous_state;
mod retention;
mod van_genuchten;
pub use crate::porous::brooks_corey::*;
pub use crate::porous::linear_retention::*;
pub use crate::porous::pedroso_williams::*;
pub use crate::porous::porous_driver::*;
pub use crate::porous::porous_model::*;
pub use crate::porous::porous_state::*;
pub use crate::porous::retention::*;
pub use crate::porous::van_genuchten::*;
