//! Implements the base structures shared by all material models

mod error;
mod idealization;
mod numerical;
mod parameters;
mod registry;
mod sample_params;
mod tensor;
pub use crate::base::error::*;
pub use crate::base::idealization::*;
pub use crate::base::numerical::*;
pub use crate::base::parameters::*;
pub use crate::base::registry::*;
pub use crate::base::sample_params::*;
pub use crate::base::tensor::*;
