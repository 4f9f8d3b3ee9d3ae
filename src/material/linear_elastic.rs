use super::{KgCalculator, LinElasticity, SolidState, StressStrainTrait};
use crate::base::{Idealization, ParamSet};
use crate::{Matrix, ModelError, Vector};
use std::sync::Arc;

/// Implements a linear elastic model
///
/// Parameters: one elastic pair among `{E, nu}`, `{l, G}`, `{K, G}`, `{K, nu}`; and `rho` (unused).
pub struct LinearElastic {
    elasticity: LinElasticity,
}

impl LinearElastic {
    /// Allocates a new instance
    pub fn new(ideal: &Idealization, params: &ParamSet) -> Result<Self, ModelError> {
        params.check_names("lin-elast", &["E", "nu", "l", "G", "K", "rho"], &[])?;
        Ok(LinearElastic {
            elasticity: LinElasticity::from_params(ideal, params)?,
        })
    }

    /// Sets the calculator of K and G for nonlinear elasticity
    pub fn set_kg_calculator(&mut self, calculator: Arc<dyn KgCalculator>) {
        self.elasticity.set_kg_calculator(calculator);
    }
}

impl StressStrainTrait for LinearElastic {
    /// Indicates that the stiffness matrix is symmetric
    fn symmetric_stiffness(&self) -> bool {
        true
    }

    /// Returns the number of internal values
    fn n_internal_values(&self) -> usize {
        0
    }

    fn new_state(&self) -> SolidState {
        SolidState::new(self.elasticity.nsig(), 0, 0)
    }

    /// Updates the stress: σ += D : Δε
    fn update(&self, state: &mut SolidState, delta_strain: &Vector) -> Result<(), ModelError> {
        state.reset_algorithmic();
        let nsig = self.elasticity.nsig();
        let mut dd = Matrix::zeros(nsig, nsig);
        self.elasticity.stiffness(&mut dd, state)?;
        state.stress += &dd * delta_strain;
        Ok(())
    }

    fn consistent_modulus(
        &self,
        dd: &mut Matrix,
        state: &mut SolidState,
        _first_iteration: bool,
    ) -> Result<(), ModelError> {
        self.elasticity.stiffness(dd, state)
    }

    fn continuous_modulus(&self, dd: &mut Matrix, state: &SolidState) -> Result<(), ModelError> {
        self.elasticity.stiffness(dd, state)
    }

    /// Updates the stress (σ += Δσ) and computes the strain increment Δε = C : Δσ
    fn update_strain(
        &self,
        state: &mut SolidState,
        delta_stress: &Vector,
        delta_strain: &mut Vector,
    ) -> Result<(), ModelError> {
        state.reset_algorithmic();
        let nsig = self.elasticity.nsig();
        let mut cc = Matrix::zeros(nsig, nsig);
        self.elasticity.compliance(&mut cc)?;
        delta_strain.gemv(1.0, &cc, delta_stress, 0.0);
        state.stress += delta_stress;
        Ok(())
    }

    fn elasticity(&self) -> &LinElasticity {
        &self.elasticity
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::LinearElastic;
    use crate::base::{Idealization, ParamSet, SampleParams};
    use crate::material::{NonlinearYoung, StressStrainTrait};
    use crate::{Matrix, ModelError, Vector};
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    #[test]
    fn new_captures_errors() {
        let ideal = Idealization::new(3);
        let params = ParamSet::from_pairs(&[("E", 60.0), ("nu", 0.25), ("qy0", 1.0)]);
        assert_eq!(
            LinearElastic::new(&ideal, &params).err(),
            Some(ModelError::UnknownParameter {
                model: "lin-elast",
                name: "qy0".to_string()
            })
        );
    }

    #[test]
    fn update_works() {
        let ideal = Idealization::new(2);
        let model = LinearElastic::new(&ideal, &SampleParams::linear_elastic()).unwrap();
        let mut state = model.new_state();
        state.stress[0] = -1.0;
        let deps = Vector::from_vec(vec![0.001, 0.0, 0.0, 0.002]);
        model.update(&mut state, &deps).unwrap();
        // l = 24, G = 24
        assert_abs_diff_eq!(state.stress[0], -1.0 + 24.0 * 0.001 + 48.0 * 0.001, epsilon = 1e-15);
        assert_abs_diff_eq!(state.stress[1], 24.0 * 0.001, epsilon = 1e-15);
        assert_abs_diff_eq!(state.stress[3], 48.0 * 0.002, epsilon = 1e-15);
        assert_eq!(state.stress_previous[0], -1.0);
        assert!(!state.loading);
    }

    #[test]
    fn update_strain_works() {
        let ideal = Idealization::new(2);
        let model = LinearElastic::new(&ideal, &SampleParams::linear_elastic()).unwrap();
        let mut state = model.new_state();
        let dsig = Vector::from_vec(vec![-1.0, -2.0, -3.0, 0.5]);
        let mut deps = Vector::zeros(4);
        model.update_strain(&mut state, &dsig, &mut deps).unwrap();
        assert_eq!(state.stress, dsig);

        // going back with the strain increment recovers the stress increment
        let mut other = model.new_state();
        model.update(&mut other, &deps).unwrap();
        assert_abs_diff_eq!(other.stress, dsig, epsilon = 1e-13);
    }

    #[test]
    fn moduli_work() {
        let ideal = Idealization::new(3);
        let mut model = LinearElastic::new(&ideal, &ParamSet::from_pairs(&[("K", 2.0), ("G", 0.75)])).unwrap();
        let mut state = model.new_state();
        let mut dd = Matrix::zeros(6, 6);
        model.consistent_modulus(&mut dd, &mut state, true).unwrap();
        assert_abs_diff_eq!(dd[(0, 0)], 3.0, epsilon = 1e-15);
        assert_abs_diff_eq!(dd[(0, 1)], 1.5, epsilon = 1e-15);
        assert_abs_diff_eq!(dd[(5, 5)], 1.5, epsilon = 1e-15);
        let mut dd_cont = Matrix::zeros(6, 6);
        model.continuous_modulus(&mut dd_cont, &state).unwrap();
        assert_eq!(dd, dd_cont);

        // nonlinear elasticity
        model.set_kg_calculator(Arc::new(NonlinearYoung {
            young0: 10.0,
            poisson: 0.2,
            beta: 1.0,
            isotropic: false,
        }));
        model.continuous_modulus(&mut dd, &state).unwrap();
        assert_abs_diff_eq!(dd[(5, 5)], 10.0 / 1.2, epsilon = 1e-14);
    }
}
