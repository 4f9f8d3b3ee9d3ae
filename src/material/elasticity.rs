use super::SolidState;
use crate::base::{im, mandel_p, mandel_q, mandel_trace, psd, Idealization, ParamSet};
use crate::{Matrix, ModelError, Vector};
use std::sync::Arc;

/// Returns the Lamé coefficient λ given Young's modulus E and Poisson's coefficient ν
pub fn lambda_from_young_poisson(young: f64, poisson: f64) -> f64 {
    young * poisson / ((1.0 + poisson) * (1.0 - 2.0 * poisson))
}

/// Returns the shear modulus G given Young's modulus E and Poisson's coefficient ν
pub fn shear_from_young_poisson(young: f64, poisson: f64) -> f64 {
    young / (2.0 * (1.0 + poisson))
}

/// Returns the bulk modulus K given Young's modulus E and Poisson's coefficient ν
pub fn bulk_from_young_poisson(young: f64, poisson: f64) -> f64 {
    young / (3.0 * (1.0 - 2.0 * poisson))
}

/// Returns Young's modulus E given the Lamé coefficient λ and the shear modulus G
pub fn young_from_lambda_shear(lambda: f64, shear: f64) -> f64 {
    shear * (3.0 * lambda + 2.0 * shear) / (lambda + shear)
}

/// Returns Poisson's coefficient ν given the Lamé coefficient λ and the shear modulus G
pub fn poisson_from_lambda_shear(lambda: f64, shear: f64) -> f64 {
    0.5 * lambda / (lambda + shear)
}

/// Returns the bulk modulus K given the Lamé coefficient λ and the shear modulus G
pub fn bulk_from_lambda_shear(lambda: f64, shear: f64) -> f64 {
    lambda + 2.0 * shear / 3.0
}

/// Returns Young's modulus E given the bulk modulus K and the shear modulus G
pub fn young_from_bulk_shear(bulk: f64, shear: f64) -> f64 {
    9.0 * bulk * shear / (3.0 * bulk + shear)
}

/// Returns Poisson's coefficient ν given the bulk modulus K and the shear modulus G
pub fn poisson_from_bulk_shear(bulk: f64, shear: f64) -> f64 {
    (3.0 * bulk - 2.0 * shear) / (6.0 * bulk + 2.0 * shear)
}

/// Returns the Lamé coefficient λ given the bulk modulus K and the shear modulus G
pub fn lambda_from_bulk_shear(bulk: f64, shear: f64) -> f64 {
    bulk - 2.0 * shear / 3.0
}

/// Returns Young's modulus E given the bulk modulus K and Poisson's coefficient ν
pub fn young_from_bulk_poisson(bulk: f64, poisson: f64) -> f64 {
    3.0 * bulk * (1.0 - 2.0 * poisson)
}

/// Returns the shear modulus G given the bulk modulus K and Poisson's coefficient ν
pub fn shear_from_bulk_poisson(bulk: f64, poisson: f64) -> f64 {
    3.0 * (1.0 - 2.0 * poisson) * bulk / (2.0 * (1.0 + poisson))
}

/// Returns the Lamé coefficient λ given the bulk modulus K and Poisson's coefficient ν
pub fn lambda_from_bulk_poisson(bulk: f64, poisson: f64) -> f64 {
    3.0 * bulk * poisson / (1.0 + poisson)
}

/// Defines calculators of stress-dependent bulk and shear moduli
pub trait KgCalculator: Send + Sync {
    /// Returns the bulk and shear moduli (K, G) for the current state
    fn calc(&self, state: &SolidState) -> (f64, f64);
}

/// Implements a nonlinear elasticity with stress-dependent Young's modulus
///
/// ```text
///        4 E₀ v
/// E = ──────────    with    v = exp(β s)
///      (v + 1)²
/// ```
///
/// where `s = σm` (isotropic, mean stress, positive in tension) or `s = σd` (deviatoric).
/// Poisson's coefficient is constant.
#[derive(Clone, Copy, Debug)]
pub struct NonlinearYoung {
    /// Initial Young's modulus E₀
    pub young0: f64,

    /// Constant Poisson's coefficient
    pub poisson: f64,

    /// Coefficient β
    pub beta: f64,

    /// Use the mean stress σm (otherwise, use the deviatoric stress σd)
    pub isotropic: bool,
}

impl KgCalculator for NonlinearYoung {
    fn calc(&self, state: &SolidState) -> (f64, f64) {
        let sig = if self.isotropic {
            -mandel_p(&state.stress)
        } else {
            mandel_q(&state.stress)
        };
        let val = f64::exp(self.beta * sig);
        let young = 4.0 * self.young0 * val / f64::powi(val + 1.0, 2);
        (
            bulk_from_young_poisson(young, self.poisson),
            shear_from_young_poisson(young, self.poisson),
        )
    }
}

/// Implements the isotropic linear (or K-G nonlinear) elasticity for small strains
///
/// Exactly one complete pair of constants must be given:
/// `{E, nu}`, `{l, G}`, `{K, G}` or `{K, nu}`. The other constants are derived.
#[derive(Clone)]
pub struct LinElasticity {
    /// Number of stress components
    nsig: usize,

    /// Plane-stress idealization
    plane_stress: bool,

    /// Young's modulus
    young: f64,

    /// Poisson's coefficient
    poisson: f64,

    /// Lamé coefficient λ
    lambda: f64,

    /// Shear modulus G (second Lamé coefficient μ)
    shear: f64,

    /// Bulk modulus
    bulk: f64,

    /// Calculator of K and G for nonlinear elasticity
    kg_calculator: Option<Arc<dyn KgCalculator>>,
}

impl LinElasticity {
    /// Allocates a new instance with Young's modulus and Poisson's coefficient
    pub fn new(ideal: &Idealization, young: f64, poisson: f64) -> Self {
        LinElasticity {
            nsig: ideal.nsig(),
            plane_stress: ideal.plane_stress,
            young,
            poisson,
            lambda: lambda_from_young_poisson(young, poisson),
            shear: shear_from_young_poisson(young, poisson),
            bulk: bulk_from_young_poisson(young, poisson),
            kg_calculator: None,
        }
    }

    /// Allocates a new instance from the elastic constants in a parameter set
    ///
    /// Names other than `E`, `nu`, `l`, `G` and `K` are ignored here; the calling
    /// model is responsible for checking its own vocabulary. Repeated names take the
    /// first value, as in [ParamSet::get].
    pub fn from_params(ideal: &Idealization, params: &ParamSet) -> Result<Self, ModelError> {
        let (young, poisson) = (params.get("E"), params.get("nu"));
        let (lambda, shear, bulk) = (params.get("l"), params.get("G"), params.get("K"));
        let (young, poisson, lambda, shear, bulk) = match (young, poisson, lambda, shear, bulk) {
            (Some(e), Some(nu), _, _, _) => (
                e,
                nu,
                lambda_from_young_poisson(e, nu),
                shear_from_young_poisson(e, nu),
                bulk_from_young_poisson(e, nu),
            ),
            (_, _, Some(l), Some(g), _) => (
                young_from_lambda_shear(l, g),
                poisson_from_lambda_shear(l, g),
                l,
                g,
                bulk_from_lambda_shear(l, g),
            ),
            (_, _, _, Some(g), Some(k)) => (
                young_from_bulk_shear(k, g),
                poisson_from_bulk_shear(k, g),
                lambda_from_bulk_shear(k, g),
                g,
                k,
            ),
            (_, Some(nu), _, _, Some(k)) => (
                young_from_bulk_poisson(k, nu),
                nu,
                lambda_from_bulk_poisson(k, nu),
                shear_from_bulk_poisson(k, nu),
                k,
            ),
            _ => return Err(ModelError::InvalidParameterCombination),
        };
        Ok(LinElasticity {
            nsig: ideal.nsig(),
            plane_stress: ideal.plane_stress,
            young,
            poisson,
            lambda,
            shear,
            bulk,
            kg_calculator: None,
        })
    }

    /// Sets the calculator of K and G for nonlinear elasticity
    pub fn set_kg_calculator(&mut self, calculator: Arc<dyn KgCalculator>) {
        self.kg_calculator = Some(calculator);
    }

    /// Returns true if a K-G calculator has been set
    pub fn has_kg_calculator(&self) -> bool {
        self.kg_calculator.is_some()
    }

    /// Returns the number of stress components
    pub fn nsig(&self) -> usize {
        self.nsig
    }

    /// Returns Young's modulus and Poisson's coefficient
    pub fn young_poisson(&self) -> (f64, f64) {
        (self.young, self.poisson)
    }

    /// Returns the Lamé coefficient λ and the shear modulus G
    pub fn lambda_shear(&self) -> (f64, f64) {
        (self.lambda, self.shear)
    }

    /// Returns the bulk modulus K and the shear modulus G
    pub fn bulk_shear(&self) -> (f64, f64) {
        (self.bulk, self.shear)
    }

    /// Computes the elastic trial stress
    ///
    /// ```text
    /// σtr = σ + K tr(Δε) I + 2 G dev(Δε)
    /// ```
    pub fn trial_stress(&self, sigma_trial: &mut Vector, sigma: &Vector, delta_strain: &Vector) {
        let (kk, gg) = (self.bulk, self.shear);
        let tr = mandel_trace(delta_strain);
        for i in 0..self.nsig {
            let dev_i = delta_strain[i] - tr * im(i) / 3.0;
            sigma_trial[i] = sigma[i] + kk * tr * im(i) + 2.0 * gg * dev_i;
        }
    }

    /// Computes the stress for a total strain: σ = σ₀ + D : ε
    pub fn calc_stress(&self, sigma: &mut Vector, sigma0: &Vector, strain: &Vector) {
        if self.plane_stress {
            let (ee, nu) = (self.young, self.poisson);
            let c = ee / (1.0 - nu * nu);
            sigma[0] = sigma0[0] + c * (strain[0] + nu * strain[1]);
            sigma[1] = sigma0[1] + c * (nu * strain[0] + strain[1]);
            sigma[2] = sigma0[2];
            sigma[3] = sigma0[3] + c * (1.0 - nu) * strain[3];
            return;
        }
        let tr = mandel_trace(strain);
        for i in 0..self.nsig {
            sigma[i] = sigma0[i] + self.lambda * tr * im(i) + 2.0 * self.shear * strain[i];
        }
    }

    /// Computes the elastic stiffness modulus D
    ///
    /// General case:
    ///
    /// ```text
    /// D = K I ⊗ I + 2 G Psd
    /// ```
    ///
    /// Plane-stress (σz eliminated):
    ///
    /// ```text
    ///          E    ┌                  ┐
    /// D = ───────── │ 1  ν  0     0    │
    ///       1 - ν²  │ ν  1  0     0    │
    ///               │ 0  0  0     0    │
    ///               │ 0  0  0  (1 - ν) │
    ///               └                  ┘
    /// ```
    ///
    /// With a K-G calculator, K and G are evaluated at the given state.
    pub fn stiffness(&self, dd: &mut Matrix, state: &SolidState) -> Result<(), ModelError> {
        if self.plane_stress {
            if self.nsig != 4 {
                return Err(ModelError::InvalidIdealization(
                    "for plane-stress analyses, D must be 4x4",
                ));
            }
            if self.kg_calculator.is_some() {
                return Err(ModelError::InvalidIdealization(
                    "plane-stress analysis does not work with nonlinear K and G",
                ));
            }
            let (ee, nu) = (self.young, self.poisson);
            let c = ee / (1.0 - nu * nu);
            dd.fill(0.0);
            dd[(0, 0)] = c;
            dd[(0, 1)] = c * nu;
            dd[(1, 0)] = c * nu;
            dd[(1, 1)] = c;
            dd[(3, 3)] = c * (1.0 - nu);
            return Ok(());
        }
        let (kk, gg) = match &self.kg_calculator {
            Some(calculator) => calculator.calc(state),
            None => (self.bulk, self.shear),
        };
        for i in 0..self.nsig {
            for j in 0..self.nsig {
                dd[(i, j)] = kk * im(i) * im(j) + 2.0 * gg * psd(i, j);
            }
        }
        Ok(())
    }

    /// Computes the elastic compliance modulus C = D⁻¹
    ///
    /// ```text
    /// C = I ⊗ I / (9 K) + Psd / (2 G)
    /// ```
    ///
    /// In plane-stress, the 4x4 compliance also yields the out-of-plane strain
    /// `εz = -ν (σx + σy) / E`.
    pub fn compliance(&self, cc: &mut Matrix) -> Result<(), ModelError> {
        if self.plane_stress {
            if self.nsig != 4 {
                return Err(ModelError::InvalidIdealization(
                    "for plane-stress analyses, C must be 4x4",
                ));
            }
            let (ee, nu) = (self.young, self.poisson);
            cc.fill(0.0);
            cc[(0, 0)] = 1.0 / ee;
            cc[(0, 1)] = -nu / ee;
            cc[(1, 0)] = -nu / ee;
            cc[(1, 1)] = 1.0 / ee;
            cc[(2, 0)] = -nu / ee;
            cc[(2, 1)] = -nu / ee;
            cc[(3, 3)] = (1.0 + nu) / ee;
            return Ok(());
        }
        let (kk, gg) = (self.bulk, self.shear);
        for i in 0..self.nsig {
            for j in 0..self.nsig {
                cc[(i, j)] = im(i) * im(j) / (9.0 * kk) + psd(i, j) / (2.0 * gg);
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
