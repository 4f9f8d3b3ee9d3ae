use super::{KgCalculator, LinElasticity, SolidState, StressStrainTrait};
use crate::base::{im, mandel_deviator, mandel_p, mandel_q, psd, Idealization, ParamSet};
use crate::base::{SQRT_2_BY_3, SQRT_3_BY_2, SQRT_6};
use crate::{Matrix, ModelError, Vector};
use std::sync::Arc;

/// Holds the index of the accumulated plastic multiplier α
const A0: usize = 0;

/// Implements the Drucker-Prager plasticity model with linear isotropic hardening
///
/// ```text
/// f = q - M p - qy0 - H α
/// g = q - Mb p    (plastic potential)
/// ```
///
/// Parameters: `M`, `Mb`, `qy0`, `H`, one elastic pair, and `rho` (unused).
/// The parameters `c`, `phi` and `typ` are accepted but ignored.
///
/// When the trial stress lies beyond the apex of the cone, the stress returns to the
/// apex (a purely hydrostatic state) and `apex_return` is set.
///
/// **Note:** This model works in 2D (plane-strain only) or 3D.
pub struct DruckerPrager {
    /// Linear elasticity
    elasticity: LinElasticity,

    /// Bulk modulus K
    kk: f64,

    /// Shear modulus G
    gg: f64,

    /// Slope of the yield surface in the p-q plane
    mm: f64,

    /// Slope of the plastic potential in the p-q plane
    mmb: f64,

    /// Initial size of the yield surface (q at p = 0)
    qy0: f64,

    /// Hardening coefficient
    hh: f64,
}

impl DruckerPrager {
    /// Allocates a new instance
    pub fn new(ideal: &Idealization, params: &ParamSet) -> Result<Self, ModelError> {
        if ideal.plane_stress {
            return Err(ModelError::InvalidIdealization(
                "Drucker-Prager model does not work in plane-stress",
            ));
        }
        params.check_names(
            "dp",
            &["M", "Mb", "qy0", "H", "E", "nu", "l", "G", "K", "rho"],
            &["c", "phi", "typ"],
        )?;
        let elasticity = LinElasticity::from_params(ideal, params)?;
        let (kk, gg) = elasticity.bulk_shear();
        Ok(DruckerPrager {
            elasticity,
            kk,
            gg,
            mm: params.get("M").unwrap_or(0.0),
            mmb: params.get("Mb").unwrap_or(0.0),
            qy0: params.get("qy0").unwrap_or(0.0),
            hh: params.get("H").unwrap_or(0.0),
        })
    }

    /// Sets the calculator of K and G for the elastic tangent
    pub fn set_kg_calculator(&mut self, calculator: Arc<dyn KgCalculator>) {
        self.elasticity.set_kg_calculator(calculator);
    }
}

impl StressStrainTrait for DruckerPrager {
    /// Indicates that the stiffness matrix is symmetric (associated flow only)
    fn symmetric_stiffness(&self) -> bool {
        self.mm == self.mmb
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
        let alpha_ini = state.internal_values[A0];

        // trial stress
        let nsig = self.elasticity.nsig();
        let mut sigma_trial = Vector::zeros(nsig);
        self.elasticity.trial_stress(&mut sigma_trial, &state.stress, delta_strain);
        let p_trial = mandel_p(&sigma_trial);
        let q_trial = mandel_q(&sigma_trial);

        // elastic update
        let f_trial = q_trial - self.mm * p_trial - self.qy0 - self.hh * alpha_ini;
        if f_trial <= 0.0 {
            state.stress.copy_from(&sigma_trial);
            return Ok(());
        }

        // elastoplastic update
        let (kk, gg, mm, mmb, hh) = (self.kk, self.gg, self.mm, self.mmb, self.hh);
        let hp = 3.0 * gg + kk * mm * mmb + hh;
        let mut dgam = f_trial / hp;
        state.loading = true;

        // return to apex
        if q_trial - dgam * 3.0 * gg < 0.0 {
            dgam = (-mm * p_trial - self.qy0 - hh * alpha_ini) / (3.0 * kk * mm + hh);
            let p_new = p_trial + dgam * 3.0 * kk;
            for i in 0..nsig {
                state.stress[i] = -p_new * im(i);
            }
            state.internal_values[A0] = alpha_ini + dgam;
            state.delta_gamma = dgam;
            state.apex_return = true;
            return Ok(());
        }

        // return to the cone
        let p_new = p_trial + dgam * kk * mmb;
        let m = 1.0 - dgam * 3.0 * gg / q_trial;
        for i in 0..nsig {
            let s_trial_i = sigma_trial[i] + p_trial * im(i);
            state.stress[i] = m * s_trial_i - p_new * im(i);
        }
        state.internal_values[A0] = alpha_ini + dgam;
        state.delta_gamma = dgam;
        Ok(())
    }

    /// Computes the consistent tangent modulus
    ///
    /// ```text
    /// D = 2 G m Psd + a1 I ⊗ I + a2 I ⊗ n + b1 n ⊗ I + b2 n ⊗ n
    /// ```
    ///
    /// At the apex: `D = K H / (3 K M + H) I ⊗ I`
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

        let nsig = self.elasticity.nsig();
        let (kk, gg, mm, mmb, hh) = (self.kk, self.gg, self.mm, self.mmb, self.hh);

        // return to apex
        if state.apex_return {
            let a1 = kk * hh / (3.0 * kk * mm + hh);
            for i in 0..nsig {
                for j in 0..nsig {
                    dd[(i, j)] = a1 * im(i) * im(j);
                }
            }
            return Ok(());
        }

        // unit deviatoric direction
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
        let hp = 3.0 * gg + kk * mm * mmb + hh;
        let a1 = kk - kk * kk * mmb * mm / hp;
        let a2 = -2.0 * gg * kk * mmb * SQRT_3_BY_2 / hp;
        let b1 = -SQRT_6 * gg * mm * kk / hp;
        let b2 = 6.0 * gg * gg * (dgam / q_trial - 1.0 / hp);

        for i in 0..nsig {
            for j in 0..nsig {
                dd[(i, j)] = a * psd(i, j)
                    + a1 * im(i) * im(j)
                    + a2 * im(i) * n[j]
                    + b1 * n[i] * im(j)
                    + b2 * n[i] * n[j];
            }
        }
        Ok(())
    }

    /// Computes the continuous tangent modulus
    ///
    /// ```text
    /// D = De - (a1 I ⊗ I + a2 I ⊗ ŝ + a3 ŝ ⊗ I + a4 ŝ ⊗ ŝ)    with    ŝ = s / ‖s‖
    /// ```
    fn continuous_modulus(&self, dd: &mut Matrix, state: &SolidState) -> Result<(), ModelError> {
        self.elasticity.stiffness(dd, state)?;
        if !state.loading {
            return Ok(());
        }
        let nsig = self.elasticity.nsig();
        let (kk, gg, mm, mmb, hh) = (self.kk, self.gg, self.mm, self.mmb, self.hh);
        let d1 = kk * mmb * mm + 3.0 * gg + hh;
        let a1 = kk * kk * mmb * mm / d1;
        let a2 = SQRT_6 * kk * gg * mmb / d1;
        let a3 = SQRT_6 * kk * gg * mm / d1;
        let a4 = 6.0 * gg * gg / d1;
        if state.apex_return {
            // no deviatoric direction at the apex
            for i in 0..nsig {
                for j in 0..nsig {
                    dd[(i, j)] -= a1 * im(i) * im(j);
                }
            }
            return Ok(());
        }
        let mut s = Vector::zeros(nsig);
        let norm_s = mandel_deviator(&mut s, &state.stress);
        for i in 0..nsig {
            for j in 0..nsig {
                dd[(i, j)] -= a1 * im(i) * im(j)
                    + a2 * im(i) * s[j] / norm_s
                    + a3 * s[i] * im(j) / norm_s
                    + a4 * s[i] * s[j] / (norm_s * norm_s);
            }
        }
        Ok(())
    }

    /// Evaluates the yield function f = q - M p - qy0 - H α
    fn yield_function(&self, state: &SolidState) -> Result<f64, ModelError> {
        let p = mandel_p(&state.stress);
        let q = mandel_q(&state.stress);
        Ok(q - self.mm * p - self.qy0 - self.hh * state.internal_values[A0])
    }

    fn elasticity(&self) -> &LinElasticity {
        &self.elasticity
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
