use super::{LoadingPath, SolidState, StressStrain, StressStrainTrait};
use crate::base::{deriv1_central5, deriv1_forward4};
use crate::{Matrix, ModelError, Vector};
use std::sync::Arc;

/// Holds a tangent entry whose analytical and numerical values disagree
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TangentMismatch {
    /// Index of the increment (index of the state in the results)
    pub increment: usize,

    /// Row index (stress component)
    pub i: usize,

    /// Column index (strain component)
    pub j: usize,

    /// Analytical value
    pub analytical: f64,

    /// Numerical (finite differences) value
    pub numerical: f64,
}

/// Runs material-point simulations with solid models along loading paths
///
/// With `check_d`, the consistent tangent modulus of every strain increment is
/// compared against the numerical derivative dσnew/dεnew, obtained by re-running
/// the update from the previous converged state. Mismatches are collected (and
/// logged) instead of stopping the simulation.
///
/// # Examples
///
/// ```
/// use geomat::base::{Idealization, SampleParams};
/// use geomat::material::{LoadingPath, SolidDriver, StressStrain};
/// use std::sync::Arc;
///
/// let ideal = Idealization::new(2);
/// let model = StressStrain::new("vm", &ideal, &SampleParams::von_mises()).unwrap();
/// let mut driver = SolidDriver::new(Arc::new(model));
///
/// let path = LoadingPath::new_pq_strain(2, 1, 1, 1.5, 1.0, 0.0, &[3.001, 3.0], &[2.001, 4.0], 0.0).unwrap();
/// driver.run(&path).unwrap();
/// assert_eq!(driver.states.len(), 3);
/// assert!(driver.mismatches.is_empty());
/// ```
pub struct SolidDriver {
    /// Solid model
    model: Arc<StressStrain>,

    /// Number of stress components
    nsig: usize,

    /// Check the consistent tangent modulus
    pub check_d: bool,

    /// Use forward differences instead of central differences when checking D
    pub use_forward: bool,

    /// Tolerance to compare analytical and numerical tangents
    pub tol_d: f64,

    /// Log every comparison
    pub verbose: bool,

    /// Holds the states (stresses and internal values); one per increment plus the initial state
    pub states: Vec<SolidState>,

    /// Holds the strains; one per increment plus the initial (zero) strain
    pub strains: Vec<Vector>,

    /// Holds the tangent entries that failed the check
    pub mismatches: Vec<TangentMismatch>,
}

impl SolidDriver {
    /// Allocates a new instance
    pub fn new(model: Arc<StressStrain>) -> Self {
        let nsig = model.elasticity().nsig();
        SolidDriver {
            model,
            nsig,
            check_d: true,
            use_forward: false,
            tol_d: 1e-8,
            verbose: false,
            states: Vec::new(),
            strains: Vec::new(),
            mismatches: Vec::new(),
        }
    }

    /// Runs the simulation
    pub fn run(&mut self, path: &LoadingPath) -> Result<(), ModelError> {
        if path.nsig() != self.nsig {
            return Err(ModelError::InvalidInput(format!(
                "the path has nsig = {} but the model requires nsig = {}",
                path.nsig(),
                self.nsig
            )));
        }
        let nr = 1 + path.n_increments();
        if nr < 2 {
            return Err(ModelError::InvalidPath(format!(
                "size of path is incorrect. Size={}, Nincs={}",
                path.size(),
                path.n_incs
            )));
        }

        // initial state
        self.states.clear();
        self.strains.clear();
        self.mismatches.clear();
        let mut initial = self.model.new_state();
        initial.stress[0] = path.mult_s * path.sx[0];
        initial.stress[1] = path.mult_s * path.sy[0];
        initial.stress[2] = path.mult_s * path.sz[0];
        self.states.push(initial);
        self.strains.push(Vector::zeros(self.nsig));

        // auxiliary
        let ninc = path.n_incs as f64;
        let mut delta_stress = Vector::zeros(self.nsig);
        let mut delta_strain = Vector::zeros(self.nsig);

        for i in 1..path.size() {
            // stress path
            if path.use_s[i] {
                delta_stress[0] = path.mult_s * (path.sx[i] - path.sx[i - 1]) / ninc;
                delta_stress[1] = path.mult_s * (path.sy[i] - path.sy[i - 1]) / ninc;
                delta_stress[2] = path.mult_s * (path.sz[i] - path.sz[i - 1]) / ninc;
                for _ in 0..path.n_incs {
                    let k = self.states.len();
                    let mut state = self.states[k - 1].clone();
                    let mut deps = Vector::zeros(self.nsig);
                    self.model.update_strain(&mut state, &delta_stress, &mut deps)?;
                    self.strains.push(&self.strains[k - 1] + &deps);
                    self.states.push(state);
                }
            }

            // strain path
            if path.use_e[i] {
                delta_strain[0] = path.mult_e * (path.ex[i] - path.ex[i - 1]) / ninc;
                delta_strain[1] = path.mult_e * (path.ey[i] - path.ey[i - 1]) / ninc;
                delta_strain[2] = path.mult_e * (path.ez[i] - path.ez[i - 1]) / ninc;
                for _ in 0..path.n_incs {
                    let k = self.states.len();
                    let mut state = self.states[k - 1].clone();
                    self.model.update(&mut state, &delta_strain)?;
                    self.strains.push(&self.strains[k - 1] + &delta_strain);
                    self.states.push(state);
                    if self.check_d {
                        self.check_tangent(k)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns true if no tangent mismatch has been found
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Compares the consistent modulus at increment k against numerical derivatives
    fn check_tangent(&mut self, k: usize) -> Result<(), ModelError> {
        let nsig = self.nsig;
        let mut dd = Matrix::zeros(nsig, nsig);
        let mut state = self.states[k].clone();
        self.model.consistent_modulus(&mut dd, &mut state, false)?;

        struct Args {
            deps: Vector,
            state: SolidState,
        }
        let model = &self.model;
        let previous = &self.states[k - 1];
        let eps_old = &self.strains[k - 1];
        let eps_new = &self.strains[k];
        let deps_new = eps_new - eps_old;
        let mut args = Args {
            deps: deps_new.clone(),
            state: previous.clone(),
        };
        for i in 0..nsig {
            for j in 0..nsig {
                let stress_at = |x: f64, a: &mut Args| -> Result<f64, ModelError> {
                    a.deps.copy_from(&deps_new);
                    a.deps[j] = x - eps_old[j];
                    a.state.set(previous);
                    model.update(&mut a.state, &a.deps)?;
                    Ok(a.state.stress[i])
                };
                let numerical = if self.use_forward {
                    deriv1_forward4(eps_new[j], &mut args, stress_at)?
                } else {
                    deriv1_central5(eps_new[j], &mut args, stress_at)?
                };
                let analytical = dd[(i, j)];
                let diff = f64::abs(analytical - numerical);
                if self.verbose {
                    log::info!(
                        "increment {}: D[{}][{}] ana = {:23.15e} num = {:23.15e} diff = {:e}",
                        k,
                        i,
                        j,
                        analytical,
                        numerical,
                        diff
                    );
                }
                if diff > self.tol_d {
                    log::warn!(
                        "increment {}: D[{}][{}] ana = {:e} and num = {:e} differ by {:e} > {:e}",
                        k,
                        i,
                        j,
                        analytical,
                        numerical,
                        diff,
                        self.tol_d
                    );
                    self.mismatches.push(TangentMismatch {
                        increment: k,
                        i,
                        j,
                        analytical,
                        numerical,
                    });
                }
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SolidDriver;
    use crate::base::{mandel_p, Idealization, ParamSet, SampleParams};
    use crate::material::{LoadingPath, StressStrain};
    use crate::ModelError;
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    #[test]
    fn stress_path_works() {
        let ideal = Idealization::new(2);
        let model = StressStrain::new("lin-elast", &ideal, &SampleParams::linear_elastic()).unwrap();
        let mut driver = SolidDriver::new(Arc::new(model));
        let path = LoadingPath::new_iso_compression(2, 4, 1, &[1.0, 2.0, 4.0]).unwrap();
        driver.run(&path).unwrap();
        assert_eq!(driver.states.len(), 9);
        assert_eq!(driver.strains.len(), 9);
        assert_abs_diff_eq!(mandel_p(&driver.states[0].stress), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(mandel_p(&driver.states[4].stress), 2.0, epsilon = 1e-14);
        assert_abs_diff_eq!(mandel_p(&driver.states[8].stress), 4.0, epsilon = 1e-14);

        // εv = -Δp / K with K = 40
        let eps = &driver.strains[8];
        assert_abs_diff_eq!(eps[0] + eps[1] + eps[2], -3.0 / 40.0, epsilon = 1e-15);
    }

    #[test]
    fn stress_path_requires_strain_updater() {
        let ideal = Idealization::new(2);
        let model = StressStrain::new("vm", &ideal, &SampleParams::von_mises()).unwrap();
        let mut driver = SolidDriver::new(Arc::new(model));
        let path = LoadingPath::new_iso_compression(2, 1, 1, &[0.0, 1.0]).unwrap();
        assert!(driver.run(&path).is_err());
    }

    #[test]
    fn run_captures_errors() {
        let ideal = Idealization::new(3);
        let model = StressStrain::new("lin-elast", &ideal, &SampleParams::linear_elastic()).unwrap();
        let mut driver = SolidDriver::new(Arc::new(model));
        let path = LoadingPath::new_iso_compression(2, 1, 1, &[0.0, 1.0]).unwrap();
        assert_eq!(
            driver.run(&path).err(),
            Some(ModelError::InvalidInput(
                "the path has nsig = 4 but the model requires nsig = 6".to_string()
            ))
        );
    }

    #[test]
    fn check_d_detects_wrong_tangents() {
        // a negative tolerance flags every entry
        let ideal = Idealization::new(2);
        let params = ParamSet::from_pairs(&[("K", 1.5), ("G", 1.0)]);
        let model = StressStrain::new("lin-elast", &ideal, &params).unwrap();
        let mut driver = SolidDriver::new(Arc::new(model));
        driver.check_d = true;
        driver.tol_d = -1.0;
        let path = LoadingPath::new_pq_strain(2, 1, 1, 1.5, 1.0, 0.0, &[1.0], &[1.0], 0.0).unwrap();
        driver.run(&path).unwrap();
        assert!(!driver.passed());
        assert_eq!(driver.mismatches.len(), 16);
        let m = driver.mismatches[0];
        assert_eq!((m.increment, m.i, m.j), (1, 0, 0));
        assert_abs_diff_eq!(m.analytical, m.numerical, epsilon = 1e-10);
    }
}
