//! Makes available common structures needed to run material-point simulations
//!
//! You may write `use geomat::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{Idealization, ModelRegistry, ParamSet, SampleParams};
pub use crate::material::{LoadingPath, SolidDriver, SolidState, StressStrain, StressStrainTrait};
pub use crate::porous::{path_cycle, LiquidRetention, LiquidRetentionTrait, PorousDriver, PorousModel, PorousState};
pub use crate::ModelError;
