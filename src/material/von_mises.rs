use super::{KgCalculator, LinElasticity, SolidState, StressStrainTrait};
use crate::base::{im, mandel_deviator, mandel_p, mandel_q, psd, Idealization, ParamSet, SQRT_2_BY_3};
use crate::{Matrix, ModelError, Vector};
use std::sync::Arc;

/// Holds the index of the accumulated plastic multiplier α
const A0: usize = 0;

/// Implements the von Mises plasticity model with linear isotropic hardening
///
/// ```text
/// f = q - qy0 - H α
/// ```
///
/// Parameters: `qy0`, `H`, one elastic pair, and `rho` (unused).
///
/// **Note:** This model works in 2D (plane-strain only) or 3D.
pub struct VonMises {
    /// Linear elasticity
    elasticity: LinElasticity,

    /// Bulk modulus K
    kk: f64,

    /// Shear modulus G
    gg: f64,

    /// Initial size of the yield surface (von Mises stress)
    qy0: f64,

    /// Hardening coefficient
    hh: f64,
}

impl VonMises {
    /// Allocates a new instance
    pub fn new(ideal: &Idealization, params: &ParamSet) -> Result<Self, ModelError> {
        if ideal.plane_stress {
            return Err(ModelError::InvalidIdealization(
                "von Mises model does not work in plane-stress",
            ));
        }
        params.check_names("vm", &["qy0", "H", "E", "nu", "l", "G", "K", "rho"], &[])?;
        let elasticity = LinElasticity::from_params(ideal, params)?;
        let (kk, gg) = elasticity.bulk_shear();
        Ok(VonMises {
            elasticity,
            kk,
            gg,
            qy0: params.get("qy0").unwrap_or(0.0),
            hh: params.get("H").unwrap_or(0.0),
        })
    }

    /// Sets the calculator of K and G for the elastic tangent
    pub fn set_kg_calculator(&mut self, calculator: Arc<dyn KgCalculator>) {
        self.elasticity.set_kg_calculator(calculator);
    }
}

impl StressStrainTrait for VonMises {
    /// Indicates that the stiffness matrix is symmetric
    fn symmetric_stiffness(&self) -> bool {
        true
    }

    /// Returns the number of internal values
    fn n_internal_values(&self) -> usize {
        1 // [α]
    }

    fn new_state(&self) -> SolidState {
        SolidState::new(self.elasticity.nsig(), 1, 0)
    }

    /// Updates the stress given the strain increment
    fn update(&self, state: &mut SolidState, delta_strain: &Vector) -> Result<(), ModelError> {
        // reset flags
        state.reset_algorithmic();

        // trial stress
        let nsig = self.elasticity.nsig();
        let mut sigma_trial = Vector::zeros(nsig);
        self.elasticity.trial_stress(&mut sigma_trial, &state.stress, delta_strain);
        let p_trial = mandel_p(&sigma_trial);
        let q_trial = mandel_q(&sigma_trial);

        // elastic update
        let f_trial = q_trial - self.qy0 - self.hh * state.internal_values[A0];
        if f_trial <= 0.0 {
            state.stress.copy_from(&sigma_trial);
            return Ok(());
        }

        // elastoplastic update
        let gg = self.gg;
        let dgam = f_trial / (3.0 * gg + self.hh);
        let m = 1.0 - dgam * 3.0 * gg / q_trial;
        for i in 0..nsig {
            let s_trial_i = sigma_trial[i] + p_trial * im(i);
            state.stress[i] = m * s_trial_i - p_trial * im(i);
        }
        state.internal_values[A0] += dgam;
        state.delta_gamma = dgam;
        state.loading = true;
        Ok(())
    }

    /// Computes the consistent tangent modulus
    ///
    /// ```text
    /// D = 2 G m Psd + K I ⊗ I + b2 n ⊗ n
    /// ```
    fn consistent_modulus(
        &self,
        dd: &mut Matrix,
        state: &mut SolidState,
        first_iteration: bool,
    ) -> Result<(), ModelError> {
        if first_iteration {
            state.delta_gamma = 0.0;
        }

        // elastic
        if !state.loading {
            return self.elasticity.stiffness(dd, state);
        }

        // unit deviatoric direction
        let nsig = self.elasticity.nsig();
        let (kk, gg, hh) = (self.kk, self.gg, self.hh);
        let dgam = state.delta_gamma;
        let q = mandel_q(&state.stress);
        let q_trial = q + dgam * 3.0 * gg;
        let m = 1.0 - dgam * 3.0 * gg / q_trial;
        let norm_s_trial = SQRT_2_BY_3 * q_trial;
        let mut n = Vector::zeros(nsig);
        mandel_deviator(&mut n, &state.stress);
        n /= m * norm_s_trial;

        // coefficients
        let a = 2.0 * gg * m;
        let hp = 3.0 * gg + hh;
        let b2 = 6.0 * gg * gg * (dgam / q_trial - 1.0 / hp);

        for i in 0..nsig {
            for j in 0..nsig {
                dd[(i, j)] = a * psd(i, j) + kk * im(i) * im(j) + b2 * n[i] * n[j];
            }
        }
        Ok(())
    }

    /// Computes the continuous tangent modulus
    ///
    /// ```text
    /// D = De - 6 G² / (3 G + H) s ⊗ s / ‖s‖²
    /// ```
    fn continuous_modulus(&self, dd: &mut Matrix, state: &SolidState) -> Result<(), ModelError> {
        self.elasticity.stiffness(dd, state)?;
        if !state.loading {
            return Ok(());
        }
        let nsig = self.elasticity.nsig();
        let gg = self.gg;
        let a4 = 6.0 * gg * gg / (3.0 * gg + self.hh);
        let mut s = Vector::zeros(nsig);
        let norm_s = mandel_deviator(&mut s, &state.stress);
        for i in 0..nsig {
            for j in 0..nsig {
                dd[(i, j)] -= a4 * s[i] * s[j] / (norm_s * norm_s);
            }
        }
        Ok(())
    }

    /// Evaluates the yield function f = q - qy0 - H α
    fn yield_function(&self, state: &SolidState) -> Result<f64, ModelError> {
        Ok(mandel_q(&state.stress) - self.qy0 - self.hh * state.internal_values[A0])
    }

    fn elasticity(&self) -> &LinElasticity {
        &self.elasticity
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::VonMises;
    use crate::base::{is_symmetric, mandel_p, mandel_q, Idealization, SampleParams};
    use crate::material::StressStrainTrait;
    use crate::{Matrix, Vector};
    use approx::assert_abs_diff_eq;

    // K = 1.5, G = 1, qy0 = 2, H = 0.5
    fn model(ndim: usize) -> VonMises {
        VonMises::new(&Idealization::new(ndim), &SampleParams::von_mises()).unwrap()
    }

    #[test]
    fn elastic_update_works() {
        let model = model(2);
        let mut state = model.new_state();
        let deps = Vector::from_vec(vec![-0.1, 0.05, 0.05, 0.0]);
        model.update(&mut state, &deps).unwrap();
        // dev(Δε) only => σ = 2 G Δε
        assert_abs_diff_eq!(state.stress[0], -0.2, epsilon = 1e-15);
        assert_abs_diff_eq!(state.stress[1], 0.1, epsilon = 1e-15);
        assert!(!state.loading);
        assert_eq!(state.delta_gamma, 0.0);
        assert!(model.yield_function(&state).unwrap() < 0.0);
    }

    #[test]
    fn plastic_update_works() {
        let model = model(3);
        let mut state = model.new_state();
        // pure shear
        let deps = Vector::from_vec(vec![0.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
        model.update(&mut state, &deps).unwrap();
        assert!(state.loading);
        assert!(!state.apex_return);

        // q_trial = √(3/2) (2 G × 3) = 3 √6
        let q_trial = 3.0 * f64::sqrt(6.0);
        let dgam = (q_trial - 2.0) / 3.5;
        assert_abs_diff_eq!(state.delta_gamma, dgam, epsilon = 1e-14);
        assert_abs_diff_eq!(state.internal_values[0], dgam, epsilon = 1e-14);

        // on the yield surface, with unchanged pressure
        assert_abs_diff_eq!(model.yield_function(&state).unwrap(), 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(mandel_p(&state.stress), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(mandel_q(&state.stress), 2.0 + 0.5 * dgam, epsilon = 1e-14);
    }

    #[test]
    fn moduli_are_symmetric_and_agree_for_zero_increment() {
        let model = model(2);
        let mut state = model.new_state();
        state.stress[0] = -1.0;
        let deps = Vector::from_vec(vec![-0.2, 1.0, 0.3, 0.7]);
        model.update(&mut state, &deps).unwrap();
        assert!(state.loading);

        let mut dd = Matrix::zeros(4, 4);
        let mut dd_cont = Matrix::zeros(4, 4);
        model.consistent_modulus(&mut dd, &mut state, false).unwrap();
        assert!(is_symmetric(&dd, 1e-14));
        model.continuous_modulus(&mut dd_cont, &state).unwrap();
        assert!(is_symmetric(&dd_cont, 1e-14));
        assert!(f64::abs(dd[(3, 3)] - dd_cont[(3, 3)]) > 1e-3);

        // with Δγ = 0 both moduli coincide
        model.consistent_modulus(&mut dd, &mut state, true).unwrap();
        assert_eq!(state.delta_gamma, 0.0);
        assert_abs_diff_eq!(dd, dd_cont, epsilon = 1e-14);
    }

    #[test]
    fn elastic_moduli_work() {
        let model = VonMises::new(
            &Idealization::new(2),
            &crate::base::ParamSet::from_pairs(&[("K", 2.0), ("G", 0.75), ("qy0", 1.0), ("H", 0.0)]),
        )
        .unwrap();
        let mut state = model.new_state();
        let mut dd = Matrix::zeros(4, 4);
        model.consistent_modulus(&mut dd, &mut state, true).unwrap();
        #[rustfmt::skip]
        let correct = Matrix::from_row_slice(4, 4, &[
            3.0, 1.5, 1.5, 0.0,
            1.5, 3.0, 1.5, 0.0,
            1.5, 1.5, 3.0, 0.0,
            0.0, 0.0, 0.0, 1.5,
        ]);
        assert_abs_diff_eq!(dd, correct, epsilon = 1e-15);
    }
}
