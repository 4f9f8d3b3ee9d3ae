use super::{PorousModel, PorousState};
use crate::base::{deriv1_central5, deriv1_forward4};
use crate::ModelError;
use std::sync::Arc;

/// Builds a capillary pressure path with drying-wetting cycles
///
/// * `pc0` -- initial capillary pressure
/// * `targets` -- capillary pressures at the end of each branch, e.g., `[10, 5, 20, 0]`
/// * `np` -- number of points in each branch, including its start (at least 2)
///
/// # Examples
///
/// ```
/// use geomat::porous::path_cycle;
///
/// let pc = path_cycle(0.0, &[5.0, 3.0], 3);
/// assert_eq!(pc, &[0.0, 2.5, 5.0, 4.0, 3.0]);
/// ```
pub fn path_cycle(pc0: f64, targets: &[f64], np: usize) -> Vec<f64> {
    let np = usize::max(np, 2);
    let mut pc = vec![pc0];
    for target in targets {
        let start = pc[pc.len() - 1];
        let delta = (target - start) / ((np - 1) as f64);
        for _ in 1..np {
            let last = pc[pc.len() - 1];
            pc.push(last + delta);
        }
    }
    pc
}

/// Holds a saturation derivative whose analytical and numerical values disagree
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivativeMismatch {
    /// Index of the increment (index of the state in the results)
    pub increment: usize,

    /// Name of the derivative: "Ccb" or "Ccd"
    pub which: &'static str,

    /// Analytical value
    pub analytical: f64,

    /// Numerical (finite differences) value
    pub numerical: f64,
}

/// Runs material-point simulations with porous models along capillary pressure paths
///
/// The gas pressure is kept at zero; thus `pl = -pc`. With `check_d`, the consistent
/// derivatives Ccb and Ccd of every increment are compared against the numerical
/// derivatives of sl and Ccb with respect to the new capillary pressure, obtained by
/// re-running the update from the previous state.
pub struct PorousDriver {
    /// Porous model
    model: Arc<PorousModel>,

    /// Check the consistent derivatives
    pub check_d: bool,

    /// Use forward differences instead of central differences
    pub use_forward: bool,

    /// Tolerance to check Ccb
    pub tol_ccb: f64,

    /// Tolerance to check Ccd
    pub tol_ccd: f64,

    /// Log every comparison
    pub verbose: bool,

    /// Holds the states; one per point of the path
    pub states: Vec<PorousState>,

    /// Holds the derivatives that failed the check
    pub mismatches: Vec<DerivativeMismatch>,
}

impl PorousDriver {
    /// Allocates a new instance
    pub fn new(model: Arc<PorousModel>) -> Self {
        PorousDriver {
            model,
            check_d: true,
            use_forward: false,
            tol_ccb: 1e-7,
            tol_ccd: 1e-7,
            verbose: false,
            states: Vec::new(),
            mismatches: Vec::new(),
        }
    }

    /// Runs the simulation along the capillary pressure path
    pub fn run(&mut self, pc: &[f64]) -> Result<(), ModelError> {
        if pc.len() < 2 {
            return Err(ModelError::InvalidPath(format!(
                "the capillary pressure path must have at least two points; len = {}",
                pc.len()
            )));
        }
        self.states.clear();
        self.mismatches.clear();
        let (pg, divus) = (0.0, 0.0);
        self.states.push(self.model.new_state(-pc[0], pg, divus)?);
        for i in 1..pc.len() {
            let mut state = self.states[i - 1];
            self.model.update(&mut state, -(pc[i] - pc[i - 1]), 0.0, divus)?;
            self.states.push(state);
            if self.check_d {
                self.check_derivatives(i, pc[i - 1], pc[i])?;
            }
        }
        Ok(())
    }

    /// Returns true if no derivative mismatch has been found
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Compares Ccb and Ccd at increment i against numerical derivatives
    fn check_derivatives(&mut self, i: usize, pc_old: f64, pc_new: f64) -> Result<(), ModelError> {
        struct Args {
            state: PorousState,
        }
        let model = &self.model;
        let previous = self.states[i - 1];
        let mut args = Args { state: previous };
        let sl_at = |x: f64, a: &mut Args| -> Result<f64, ModelError> {
            a.state = previous;
            model.update(&mut a.state, -(x - pc_old), 0.0, 0.0)?;
            Ok(a.state.sl)
        };
        let ccb_at = |x: f64, a: &mut Args| -> Result<f64, ModelError> {
            a.state = previous;
            model.update(&mut a.state, -(x - pc_old), 0.0, 0.0)?;
            Ok(model.ccb(&a.state))
        };
        let state = &self.states[i];
        let ccb = model.ccb(state);
        let ccd = model.ccd(state);
        let (num_ccb, num_ccd) = if self.use_forward {
            (
                deriv1_forward4(pc_new, &mut args, sl_at)?,
                deriv1_forward4(pc_new, &mut args, ccb_at)?,
            )
        } else {
            (
                deriv1_central5(pc_new, &mut args, sl_at)?,
                deriv1_central5(pc_new, &mut args, ccb_at)?,
            )
        };
        let sl = state.sl;
        let mut found = Vec::new();
        for (which, analytical, numerical, tol) in [
            ("Ccb", ccb, num_ccb, self.tol_ccb),
            ("Ccd", ccd, num_ccd, self.tol_ccd),
        ] {
            let diff = f64::abs(analytical - numerical);
            if self.verbose {
                log::info!(
                    "{} @ {:.3},{:.4}: ana = {:23.15e} num = {:23.15e} diff = {:e}",
                    which,
                    pc_new,
                    sl,
                    analytical,
                    numerical,
                    diff
                );
            }
            if diff > tol {
                log::warn!(
                    "{} @ {:.3},{:.4}: ana = {:e} and num = {:e} differ by {:e} > {:e}",
                    which,
                    pc_new,
                    sl,
                    analytical,
                    numerical,
                    diff,
                    tol
                );
                found.push(DerivativeMismatch {
                    increment: i,
                    which,
                    analytical,
                    numerical,
                });
            }
        }
        self.mismatches.extend(found);
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
