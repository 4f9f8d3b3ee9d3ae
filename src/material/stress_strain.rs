use super::{DruckerPrager, KgCalculator, LinElasticity, LinearElastic, SolidState, VonMises};
use crate::base::{Idealization, ModelAllocator, ParamSet};
use crate::{Matrix, ModelError, Vector};
use std::sync::Arc;

/// Specifies the essential functions for small-strain stress-strain models
pub trait StressStrainTrait: Send + Sync {
    /// Indicates that the stiffness matrix is symmetric
    fn symmetric_stiffness(&self) -> bool;

    /// Returns the number of internal values
    fn n_internal_values(&self) -> usize;

    /// Allocates a new state with zeroed history
    fn new_state(&self) -> SolidState;

    /// Updates the stress given the strain increment
    fn update(&self, state: &mut SolidState, delta_strain: &Vector) -> Result<(), ModelError>;

    /// Computes the tangent modulus D = dσnew/dεnew consistent with the last update
    ///
    /// With `first_iteration`, the plastic multiplier increment is reset to zero,
    /// i.e., the modulus corresponds to the continuum elastoplastic one.
    fn consistent_modulus(
        &self,
        dd: &mut Matrix,
        state: &mut SolidState,
        first_iteration: bool,
    ) -> Result<(), ModelError>;

    /// Computes the continuous (continuum) tangent modulus
    fn continuous_modulus(&self, dd: &mut Matrix, state: &SolidState) -> Result<(), ModelError>;

    /// Updates the stress and computes the strain increment for a given stress increment
    fn update_strain(
        &self,
        _state: &mut SolidState,
        _delta_stress: &Vector,
        _delta_strain: &mut Vector,
    ) -> Result<(), ModelError> {
        Err(ModelError::InvalidInput(
            "this model cannot update strains for given stresses".to_string(),
        ))
    }

    /// Evaluates the yield function
    fn yield_function(&self, _state: &SolidState) -> Result<f64, ModelError> {
        Err(ModelError::InvalidInput(
            "this model does not have a yield function".to_string(),
        ))
    }

    /// Returns the underlying elasticity
    fn elasticity(&self) -> &LinElasticity;
}

/// Holds the actual stress-strain model implementation
///
/// The allocator names are:
///
/// * `"lin-elast"` -- [LinearElastic]
/// * `"vm"` -- [VonMises]
/// * `"dp"` -- [DruckerPrager]
pub enum StressStrain {
    LinearElastic(LinearElastic),
    VonMises(VonMises),
    DruckerPrager(DruckerPrager),
}

impl StressStrain {
    /// Allocates a new instance given the model name
    pub fn new(model_name: &str, ideal: &Idealization, params: &ParamSet) -> Result<Self, ModelError> {
        ideal.validate()?;
        let model = match model_name {
            "lin-elast" => StressStrain::LinearElastic(LinearElastic::new(ideal, params)?),
            "vm" => StressStrain::VonMises(VonMises::new(ideal, params)?),
            "dp" => StressStrain::DruckerPrager(DruckerPrager::new(ideal, params)?),
            _ => return Err(ModelError::UnknownModel(model_name.to_string())),
        };
        Ok(model)
    }

    /// Returns the allocator name of the model
    pub fn name(&self) -> &'static str {
        match self {
            StressStrain::LinearElastic(_) => "lin-elast",
            StressStrain::VonMises(_) => "vm",
            StressStrain::DruckerPrager(_) => "dp",
        }
    }

    /// Returns the actual model as a trait object
    pub fn actual(&self) -> &dyn StressStrainTrait {
        match self {
            StressStrain::LinearElastic(m) => m,
            StressStrain::VonMises(m) => m,
            StressStrain::DruckerPrager(m) => m,
        }
    }

    /// Sets the calculator of K and G used by the elastic stiffness
    ///
    /// Must be called before the model is shared (e.g., before wrapping it in an `Arc`).
    pub fn set_kg_calculator(&mut self, calculator: Arc<dyn KgCalculator>) {
        match self {
            StressStrain::LinearElastic(m) => m.set_kg_calculator(calculator),
            StressStrain::VonMises(m) => m.set_kg_calculator(calculator),
            StressStrain::DruckerPrager(m) => m.set_kg_calculator(calculator),
        }
    }
}

impl ModelAllocator for StressStrain {
    type Setup = Idealization;
    fn allocate(model_name: &str, setup: &Idealization, params: &ParamSet) -> Result<Self, ModelError> {
        StressStrain::new(model_name, setup, params)
    }
}

impl StressStrainTrait for StressStrain {
    fn symmetric_stiffness(&self) -> bool {
        self.actual().symmetric_stiffness()
    }

    fn n_internal_values(&self) -> usize {
        self.actual().n_internal_values()
    }

    fn new_state(&self) -> SolidState {
        self.actual().new_state()
    }

    fn update(&self, state: &mut SolidState, delta_strain: &Vector) -> Result<(), ModelError> {
        self.actual().update(state, delta_strain)
    }

    fn consistent_modulus(
        &self,
        dd: &mut Matrix,
        state: &mut SolidState,
        first_iteration: bool,
    ) -> Result<(), ModelError> {
        self.actual().consistent_modulus(dd, state, first_iteration)
    }

    fn continuous_modulus(&self, dd: &mut Matrix, state: &SolidState) -> Result<(), ModelError> {
        self.actual().continuous_modulus(dd, state)
    }

    fn update_strain(
        &self,
        state: &mut SolidState,
        delta_stress: &Vector,
        delta_strain: &mut Vector,
    ) -> Result<(), ModelError> {
        self.actual().update_strain(state, delta_stress, delta_strain)
    }

    fn yield_function(&self, state: &SolidState) -> Result<f64, ModelError> {
        self.actual().yield_function(state)
    }

    fn elasticity(&self) -> &LinElasticity {
        self.actual().elasticity()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
