use super::{LiquidRetention, LiquidRetentionTrait, PorousState};
use crate::base::{ModelAllocator, ParamSet};
use crate::{Matrix, ModelError};
use std::sync::Arc;

/// Defines how the derivatives of the liquid saturation are computed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DerivativeMode {
    /// Ccb and Ccd are consistent with the backward-Euler update
    Consistent,

    /// Ccb = Cc and Ccd = L (`Ncns`)
    NonConsistent,

    /// Ccb is consistent but Ccd = L (`Ncns2`)
    NonConsistentSecondOrder,
}

/// Implements the liquid-gas porous medium model at a material point
///
/// The model updates the liquid saturation, the intrinsic densities of the fluids and
/// the pressures, and computes the derivatives of the saturation with respect to the
/// capillary pressure `pc = pg - pl` needed by the balance equations.
///
/// # Notation
///
/// * `nf0` -- initial porosity (volume fraction of fluids)
/// * `ns0 = 1 - nf0` -- initial volume fraction of solids
/// * `nf = 1 - (1 - div(us)) ns0` -- current porosity
/// * `ρL`, `ρG` -- intrinsic (real) densities of liquid and gas
/// * `Cl = ρL0 / BulkL`, `Cg = 1 / RTg` -- compressibilities of liquid and gas
///
/// # Parameters
///
/// * `nf0`, `RhoL0`, `RhoG0`, `RhoS0`, `BulkL`, `RTg` (default 1), `gref`, `kl`, `kg`
/// * `NmaxIt` (20), `Itol` (1e-8) -- control of the backward-Euler iterations
/// * `MEtrial` (on) -- start the iterations with a Modified-Euler trial saturation
/// * `ShowR` (off) -- log the residual of each iteration (debug level)
/// * `AllBE` (off) -- use backward-Euler also for models with a closed-form `Sl(pc)`
/// * `Ncns`, `Ncns2` -- select the [DerivativeMode]
///
/// # References
///
/// * Pedroso DM (2015) A consistent u-p formulation for porous media with hysteresis,
///   Int Journal for Numerical Methods in Engineering, 101(8) 606-634
/// * Pedroso DM (2015) A solution to transient seepage in unsaturated porous media,
///   Computer Methods in Applied Mechanics and Engineering, 285 791-816
pub struct PorousModel {
    /// Maximum number of iterations of the saturation update
    pub n_max_it: usize,

    /// Tolerance of the saturation update
    pub itol: f64,

    /// Use the Modified-Euler trial saturation
    pub me_trial: bool,

    /// Log the residuals
    pub show_r: bool,

    /// Use backward-Euler for all retention models
    pub all_be: bool,

    /// Derivative mode
    pub mode: DerivativeMode,

    /// Initial porosity
    pub nf0: f64,

    /// Initial intrinsic density of liquid
    pub rho_l0: f64,

    /// Initial intrinsic density of gas
    pub rho_g0: f64,

    /// Intrinsic density of solids
    pub rho_s0: f64,

    /// Bulk modulus of liquid
    pub bulk_l: f64,

    /// Gas constant times temperature
    pub rtg: f64,

    /// Reference gravity (at the time of measuring the conductivities)
    pub gref: f64,

    /// Isotropic saturated conductivity of liquid
    pub kl: f64,

    /// Isotropic saturated conductivity of gas
    pub kg: f64,

    /// Compressibility of liquid
    pub cl: f64,

    /// Compressibility of gas
    pub cg: f64,

    /// Saturated conductivity tensor of liquid divided by gref (3×3)
    pub klsat: Matrix,

    /// Saturated conductivity tensor of gas divided by gref (3×3)
    pub kgsat: Matrix,

    /// Liquid retention model
    retention: Arc<LiquidRetention>,
}

impl PorousModel {
    /// Allocates a new instance
    pub fn new(retention: Arc<LiquidRetention>, params: &ParamSet) -> Result<Self, ModelError> {
        params.check_names(
            "porous",
            &[
                "NmaxIt", "Itol", "MEtrial", "ShowR", "AllBE", "Ncns", "Ncns2", "nf0", "RhoL0", "RhoG0", "RhoS0",
                "BulkL", "RTg", "gref", "kl", "kg",
            ],
            &[],
        )?;
        let invalid = |name: &'static str, value: f64| ModelError::InvalidParameter {
            model: "porous",
            name,
            value,
        };

        // control
        let n_max_it = params.get("NmaxIt").unwrap_or(20.0);
        if n_max_it < 1.0 {
            return Err(invalid("NmaxIt", n_max_it));
        }
        let itol = params.get("Itol").unwrap_or(1e-8);
        if itol <= 0.0 {
            return Err(invalid("Itol", itol));
        }
        let mode = if params.get_flag("Ncns", false) {
            DerivativeMode::NonConsistent
        } else if params.get_flag("Ncns2", false) {
            DerivativeMode::NonConsistentSecondOrder
        } else {
            DerivativeMode::Consistent
        };

        // parameters
        let get = |name: &str| params.get(name).unwrap_or(0.0);
        let nf0 = get("nf0");
        if !(0.0..1.0).contains(&nf0) {
            return Err(invalid("nf0", nf0));
        }
        let bulk_l = get("BulkL");
        if bulk_l <= 0.0 {
            return Err(invalid("BulkL", bulk_l));
        }
        let rtg = params.get("RTg").unwrap_or(1.0);
        if rtg <= 0.0 {
            return Err(invalid("RTg", rtg));
        }
        let gref = get("gref");
        if gref <= 0.0 {
            return Err(invalid("gref", gref));
        }
        let (rho_l0, kl, kg) = (get("RhoL0"), get("kl"), get("kg"));
        Ok(PorousModel {
            n_max_it: n_max_it as usize,
            itol,
            me_trial: params.get_flag("MEtrial", true),
            show_r: params.get_flag("ShowR", false),
            all_be: params.get_flag("AllBE", false),
            mode,
            nf0,
            rho_l0,
            rho_g0: get("RhoG0"),
            rho_s0: get("RhoS0"),
            bulk_l,
            rtg,
            gref,
            kl,
            kg,
            cl: rho_l0 / bulk_l,
            cg: 1.0 / rtg,
            klsat: Matrix::from_diagonal_element(3, 3, kl / gref),
            kgsat: Matrix::from_diagonal_element(3, 3, kg / gref),
            retention,
        })
    }

    /// Returns the liquid retention model
    pub fn retention(&self) -> &LiquidRetention {
        &self.retention
    }

    /// Allocates a new state with the hydrostatic initial condition
    ///
    /// The saturation is computed as if the pressures were applied from zero.
    pub fn new_state(&self, pl: f64, pg: f64, divus: f64) -> Result<PorousState, ModelError> {
        let mut state = PorousState {
            pl,
            pg,
            divus,
            sl: 1.0,
            ns0: 1.0 - self.nf0,
            rho_l: self.rho_l0,
            rho_g: self.rho_g0,
            delta_pc: 0.0,
            wetting: false,
        };
        if state.pc() > 0.0 {
            state.sl = self.saturation(0.0, 1.0, pl, pg)?;
        }
        Ok(state)
    }

    /// Updates the state with increments of liquid and gas pressures
    ///
    /// * `delta_pl` -- increment of liquid pressure Δpl
    /// * `delta_pg` -- increment of gas pressure Δpg
    /// * `divus_new` -- new divergence of the displacement of solids
    pub fn update(&self, state: &mut PorousState, delta_pl: f64, delta_pg: f64, divus_new: f64) -> Result<(), ModelError> {
        let pc0 = state.pc();
        let sl0 = state.sl;
        let delta_pc = delta_pg - delta_pl;
        let pc = pc0 + delta_pc;

        // pressures, densities and flags
        state.pl += delta_pl;
        state.pg += delta_pg;
        state.divus = divus_new;
        state.rho_l += self.cl * delta_pl;
        state.rho_g += self.cg * delta_pg;
        state.delta_pc = delta_pc;
        state.wetting = delta_pc < 0.0;

        // saturation
        state.sl = self.saturation(pc0, sl0, delta_pl, delta_pg)?;

        self.check_invariants(pc, state.sl)
    }

    /// Checks the liquid saturation against the capillary pressure
    ///
    /// The saturation must be one if pc < 0 and cannot be smaller than the minimum saturation.
    pub fn check_invariants(&self, pc: f64, sl: f64) -> Result<(), ModelError> {
        let sl_min = self.retention.sl_min();
        if pc < 0.0 && sl < 1.0 {
            return Err(ModelError::InvariantViolation {
                what: "saturation must be equal to one when the capillary pressure is ineffective",
                pc,
                sl,
                sl_min,
            });
        }
        if sl < sl_min {
            return Err(ModelError::InvariantViolation {
                what: "saturation must be greater than minimum saturation",
                pc,
                sl,
                sl_min,
            });
        }
        Ok(())
    }

    /// Computes the new liquid saturation using the backward-Euler method
    fn saturation(&self, pc0: f64, sl0: f64, delta_pl: f64, delta_pg: f64) -> Result<f64, ModelError> {
        let delta_pc = delta_pg - delta_pl;
        let pc = pc0 + delta_pc;
        let wetting = delta_pc < 0.0;

        // full liquid saturation if the capillary pressure is ineffective
        if pc <= 0.0 {
            return Ok(1.0);
        }

        // closed-form models
        if !self.all_be {
            if let Some(sl) = self.retention.saturation(pc) {
                return Ok(sl);
            }
        }

        // trial saturation
        let lrm = self.retention.actual();
        let sl_min = lrm.sl_min();
        let fa = lrm.cc(pc0, sl0, wetting);
        let mut sl = if self.me_trial {
            let fb = lrm.cc(pc, sl0 + delta_pc * fa, wetting);
            sl0 + 0.5 * delta_pc * (fa + fb)
        } else {
            sl0 + delta_pc * fa
        };
        sl = f64::min(f64::max(sl, sl_min), 1.0);

        // backward-Euler iterations
        let mut delta_sl = 0.0;
        let mut residual = 0.0;
        for it in 0..self.n_max_it {
            let f = lrm.cc(pc, sl, wetting);
            residual = sl - sl0 - delta_pc * f;
            if self.show_r {
                log::debug!(
                    "it = {:3}, Cc = {:18.14}, sl = {:18.14}, δsl = {:18.14}, r = {:18.10e}",
                    it,
                    f,
                    sl,
                    delta_sl,
                    residual
                );
            }
            if f64::abs(residual) < self.itol {
                if self.show_r {
                    log::debug!(
                        "pc0 = {:.6}, sl0 = {:.6}, Δpl = {:.6}, Δpg = {:.6}, Δpc = {:.6}; converged with {} iterations",
                        pc0,
                        sl0,
                        delta_pl,
                        delta_pg,
                        delta_pc,
                        it
                    );
                }
                return Ok(f64::min(f64::max(sl, sl_min), 1.0));
            }
            let jac = lrm.j(pc, sl, wetting);
            delta_sl = -residual / (1.0 - delta_pc * jac);
            sl += delta_sl;
            if sl.is_nan() {
                return Err(ModelError::NaNDetected {
                    dpc: delta_pc,
                    cc: f,
                    residual,
                    jacobian: jac,
                    sl,
                });
            }
        }
        Err(ModelError::ConvergenceFailure {
            iterations: self.n_max_it,
            residual,
        })
    }

    /// Returns true if the saturation is computed in closed form
    fn uses_closed_form(&self) -> bool {
        self.retention.is_direct() && !self.all_be
    }

    /// Computes Ccb (Cc-bar) = dsl/dpc consistent with the update
    ///
    /// ```text
    /// Ccb = (Cc + Δpc L) / (1 - Δpc J)
    /// ```
    pub fn ccb(&self, state: &PorousState) -> f64 {
        let (pc, sl, wet) = (state.pc(), state.sl, state.wetting);
        let f = self.retention.cc(pc, sl, wet);
        if self.mode == DerivativeMode::NonConsistent || self.uses_closed_form() {
            return f;
        }
        let d = self.retention.derivs(pc, sl, wet);
        let dpc = state.delta_pc;
        (f + dpc * d.l) / (1.0 - dpc * d.j)
    }

    /// Computes Ccd (Cc-dash) = dCcb/dpc consistent with the update
    ///
    /// ```text
    /// Ccd = (2 L + Δpc (Lx + Jx Ccb) + (2 J + Δpc (Jx + Jy Ccb)) Ccb) / (1 - Δpc J)
    /// ```
    pub fn ccd(&self, state: &PorousState) -> f64 {
        let (pc, sl, wet) = (state.pc(), state.sl, state.wetting);
        let d = self.retention.derivs(pc, sl, wet);
        if self.mode != DerivativeMode::Consistent || self.uses_closed_form() {
            return d.l;
        }
        let f = self.retention.cc(pc, sl, wet);
        let dpc = state.delta_pc;
        let ccb = (f + dpc * d.l) / (1.0 - dpc * d.j);
        let ll = d.lx + d.jx * ccb; // ∂L/∂sl = Jx
        let jj = d.jx + d.jy * ccb;
        (2.0 * d.l + dpc * ll + (2.0 * d.j + dpc * jj) * ccb) / (1.0 - dpc * d.j)
    }

    /// Computes the liquid compressibility coefficient for liquid-only simulations
    ///
    /// ```text
    /// Cpl = nf (sl Cl - ρL Ccb)
    /// ```
    pub fn cpl(&self, state: &PorousState) -> f64 {
        let ccb = self.ccb(state);
        state.porosity() * (state.sl * self.cl - state.rho_l * ccb)
    }

    /// Computes Cpl and its derivative with respect to pl for liquid-only simulations
    ///
    /// Returns `(Cpl, dCpl/dpl)` with `dCpl/dpl = nf (ρL Ccd - 2 Ccb Cl)`.
    pub fn cpl_derivs(&self, state: &PorousState) -> (f64, f64) {
        let nf = state.porosity();
        let ccb = self.ccb(state);
        let ccd = self.ccd(state);
        (
            nf * (state.sl * self.cl - state.rho_l * ccb),
            nf * (state.rho_l * ccd - 2.0 * ccb * self.cl),
        )
    }
}

impl ModelAllocator for PorousModel {
    type Setup = Arc<LiquidRetention>;
    fn allocate(model_name: &str, setup: &Arc<LiquidRetention>, params: &ParamSet) -> Result<Self, ModelError> {
        match model_name {
            "porous" => PorousModel::new(setup.clone(), params),
            _ => Err(ModelError::UnknownModel(model_name.to_string())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{DerivativeMode, PorousModel};
    use crate::base::{ModelRegistry, ParamSet, SampleParams};
    use crate::porous::{LiquidRetention, LiquidRetentionTrait};
    use crate::ModelError;
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn retention(name: &str) -> Arc<LiquidRetention> {
        let params = match name {
            "bc" => SampleParams::brooks_corey(),
            "vg" => SampleParams::van_genuchten(),
            _ => SampleParams::ref_m1(),
        };
        Arc::new(LiquidRetention::new(name, &params).unwrap())
    }

    fn porous_with(extra: &[(&str, f64)]) -> ParamSet {
        let mut params = SampleParams::porous();
        params.extend(&ParamSet::from_pairs(extra));
        params
    }

    #[test]
    fn new_works() {
        let model = PorousModel::new(retention("bc"), &SampleParams::porous()).unwrap();
        assert_eq!(model.n_max_it, 20);
        assert_eq!(model.itol, 1e-8);
        assert!(model.me_trial);
        assert!(!model.show_r);
        assert!(!model.all_be);
        assert_eq!(model.mode, DerivativeMode::Consistent);
        assert_abs_diff_eq!(model.cl, 1.0 / 2.2e6, epsilon = 1e-20);
        assert_abs_diff_eq!(model.cg, 50.0, epsilon = 1e-12);
        assert_abs_diff_eq!(model.klsat[(0, 0)], 1e-4, epsilon = 1e-18);
        assert_abs_diff_eq!(model.kgsat[(2, 2)], 1e-3, epsilon = 1e-18);
        assert_eq!(model.klsat[(0, 1)], 0.0);
        assert_eq!(model.retention().name(), "bc");

        let params = ParamSet::from_pairs(&[("BulkL", 1.0), ("gref", 1.0)]);
        let model = PorousModel::new(retention("bc"), &params).unwrap();
        assert_eq!(model.rtg, 1.0);
        assert_eq!(model.cg, 1.0);
    }

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            PorousModel::new(retention("bc"), &porous_with(&[("NmaxIt", 0.0)])).err(),
            Some(ModelError::InvalidParameter {
                model: "porous",
                name: "NmaxIt",
                value: 0.0
            })
        );
        assert_eq!(
            PorousModel::new(retention("bc"), &porous_with(&[("Itol", 0.0)])).err(),
            Some(ModelError::InvalidParameter {
                model: "porous",
                name: "Itol",
                value: 0.0
            })
        );
        assert_eq!(
            PorousModel::new(retention("bc"), &porous_with(&[("nphi", 1.0)])).err(),
            Some(ModelError::UnknownParameter {
                model: "porous",
                name: "nphi".to_string()
            })
        );
        let params = ParamSet::from_pairs(&[("nf0", 0.3), ("gref", 10.0)]);
        assert_eq!(
            PorousModel::new(retention("bc"), &params).err(),
            Some(ModelError::InvalidParameter {
                model: "porous",
                name: "BulkL",
                value: 0.0
            })
        );
        let params = ParamSet::from_pairs(&[("nf0", 1.0), ("BulkL", 1.0), ("gref", 10.0)]);
        assert!(PorousModel::new(retention("bc"), &params).is_err());
    }

    #[test]
    fn derivative_mode_works() {
        let model = PorousModel::new(retention("bc"), &porous_with(&[("Ncns", 1.0)])).unwrap();
        assert_eq!(model.mode, DerivativeMode::NonConsistent);
        let model = PorousModel::new(retention("bc"), &porous_with(&[("Ncns2", 1.0)])).unwrap();
        assert_eq!(model.mode, DerivativeMode::NonConsistentSecondOrder);
        let model = PorousModel::new(retention("bc"), &porous_with(&[("Ncns", 1.0), ("Ncns2", 1.0)])).unwrap();
        assert_eq!(model.mode, DerivativeMode::NonConsistent);
        let model = PorousModel::new(retention("bc"), &porous_with(&[("Ncns", 0.0)])).unwrap();
        assert_eq!(model.mode, DerivativeMode::Consistent);
    }

    #[test]
    fn new_state_works() {
        let model = PorousModel::new(retention("bc"), &SampleParams::porous()).unwrap();
        let state = model.new_state(1.0, 0.0, 0.0).unwrap();
        assert_eq!(state.sl, 1.0);
        assert_abs_diff_eq!(state.ns0, 0.7, epsilon = 1e-15);
        assert_eq!(state.rho_l, 1.0);
        assert_eq!(state.rho_g, 0.01);
        assert_eq!(state.delta_pc, 0.0);
        assert!(!state.wetting);

        let state = model.new_state(-3.0, 0.0, 0.0).unwrap();
        assert_abs_diff_eq!(state.sl, 0.1 + 0.9 * f64::sqrt(0.2 / 3.0), epsilon = 1e-15);
        assert_eq!(state.rho_l, 1.0);

        let model = PorousModel::new(retention("ref-m1"), &SampleParams::porous()).unwrap();
        let state = model.new_state(-2.0, 0.0, 0.0).unwrap();
        assert!(state.sl < 1.0 && state.sl > 0.005);
    }

    #[test]
    fn update_direct_works() {
        let model = PorousModel::new(retention("bc"), &SampleParams::porous()).unwrap();
        let mut state = model.new_state(0.0, 0.0, 0.0).unwrap();
        model.update(&mut state, -3.0, 0.0, 0.01).unwrap();
        assert_eq!(state.pl, -3.0);
        assert_eq!(state.pc(), 3.0);
        assert_eq!(state.divus, 0.01);
        assert_eq!(state.delta_pc, 3.0);
        assert!(!state.wetting);
        assert_abs_diff_eq!(state.sl, 0.33238, epsilon = 1e-5);
        assert_abs_diff_eq!(state.rho_l, 1.0 - 3.0 / 2.2e6, epsilon = 1e-15);
        assert_eq!(state.rho_g, 0.01);

        // closed-form derivatives
        let lrm = model.retention();
        assert_eq!(model.ccb(&state), lrm.cc(3.0, state.sl, false));
        assert_eq!(model.ccd(&state), lrm.l(3.0, state.sl, false));

        // back to zero capillary pressure
        model.update(&mut state, 3.5, 0.0, 0.0).unwrap();
        assert_eq!(state.sl, 1.0);
        assert!(state.wetting);
        assert_eq!(model.ccb(&state), 0.0);
    }

    #[test]
    fn update_all_be_works() {
        let model = PorousModel::new(retention("bc"), &porous_with(&[("AllBE", 1.0)])).unwrap();
        let mut state = model.new_state(0.0, 0.0, 0.0).unwrap();
        model.update(&mut state, -3.0, 0.0, 0.0).unwrap();
        // Cc does not depend on sl => sl = sl0 + Δpc Cc(pc)
        let cc = model.retention().cc(3.0, 0.0, false);
        assert_abs_diff_eq!(state.sl, 1.0 + 3.0 * cc, epsilon = 1e-12);
        // J = 0 => Ccb = Cc + Δpc L
        let l = model.retention().l(3.0, 0.0, false);
        assert_abs_diff_eq!(model.ccb(&state), cc + 3.0 * l, epsilon = 1e-15);
    }

    #[test]
    fn update_rate_type_works() {
        let model = PorousModel::new(retention("ref-m1"), &SampleParams::porous()).unwrap();
        let lrm = model.retention();
        let mut state = model.new_state(0.0, 0.0, 0.0).unwrap();

        // drying
        let mut sl_prev = state.sl;
        for _ in 0..4 {
            let sl0 = state.sl;
            model.update(&mut state, -0.5, 0.0, 0.0).unwrap();
            assert!(!state.wetting);
            assert!(state.sl < sl_prev);
            let r = state.sl - sl0 - state.delta_pc * lrm.cc(state.pc(), state.sl, false);
            assert!(f64::abs(r) < 1e-8);
            sl_prev = state.sl;
        }

        // wetting
        for _ in 0..2 {
            let sl0 = state.sl;
            model.update(&mut state, 0.5, 0.0, 0.0).unwrap();
            assert!(state.wetting);
            assert!(state.sl > sl_prev);
            let r = state.sl - sl0 - state.delta_pc * lrm.cc(state.pc(), state.sl, true);
            assert!(f64::abs(r) < 1e-8);
            sl_prev = state.sl;
        }
        assert_abs_diff_eq!(state.pc(), 1.0, epsilon = 1e-15);
        assert!(state.sl >= lrm.sl_min() && state.sl <= 1.0);
    }

    #[test]
    fn update_captures_convergence_failure() {
        let model = PorousModel::new(retention("ref-m1"), &porous_with(&[("NmaxIt", 1.0), ("Itol", 1e-15)])).unwrap();
        let mut state = model.new_state(0.0, 0.0, 0.0).unwrap();
        let res = model.update(&mut state, -5.0, 0.0, 0.0);
        assert!(matches!(res, Err(ModelError::ConvergenceFailure { iterations: 1, .. })));
    }

    #[test]
    fn update_captures_nan() {
        let model = PorousModel::new(retention("ref-m1"), &SampleParams::porous()).unwrap();
        let mut state = model.new_state(0.0, 0.0, 0.0).unwrap();
        let res = model.update(&mut state, f64::NAN, 0.0, 0.0);
        match res {
            Err(ModelError::NaNDetected { dpc, sl, .. }) => {
                assert!(dpc.is_nan());
                assert!(sl.is_nan());
            }
            other => panic!("expected NaNDetected, got {:?}", other),
        }
    }

    #[test]
    fn check_invariants_works() {
        // slmin = 0.1
        let model = PorousModel::new(retention("bc"), &SampleParams::porous()).unwrap();
        assert_eq!(model.check_invariants(-1.0, 1.0), Ok(()));
        assert_eq!(model.check_invariants(0.0, 0.5), Ok(()));
        assert_eq!(model.check_invariants(2.0, 0.1), Ok(()));
        assert_eq!(
            model.check_invariants(-1.0, 0.9),
            Err(ModelError::InvariantViolation {
                what: "saturation must be equal to one when the capillary pressure is ineffective",
                pc: -1.0,
                sl: 0.9,
                sl_min: 0.1
            })
        );
        assert_eq!(
            model.check_invariants(2.0, 0.05),
            Err(ModelError::InvariantViolation {
                what: "saturation must be greater than minimum saturation",
                pc: 2.0,
                sl: 0.05,
                sl_min: 0.1
            })
        );
    }

    #[test]
    fn derivative_modes_work() {
        let params = SampleParams::porous();
        let consistent = PorousModel::new(retention("ref-m1"), &params).unwrap();
        let mut state = consistent.new_state(0.0, 0.0, 0.0).unwrap();
        consistent.update(&mut state, -2.0, 0.0, 0.0).unwrap();
        let lrm = consistent.retention();
        let (pc, sl) = (state.pc(), state.sl);
        let cc = lrm.cc(pc, sl, false);
        let l = lrm.l(pc, sl, false);
        assert!(f64::abs(consistent.ccb(&state) - cc) > 1e-6);

        let model = PorousModel::new(retention("ref-m1"), &porous_with(&[("Ncns", 1.0)])).unwrap();
        assert_eq!(model.ccb(&state), cc);
        assert_eq!(model.ccd(&state), l);

        let model = PorousModel::new(retention("ref-m1"), &porous_with(&[("Ncns2", 1.0)])).unwrap();
        assert_eq!(model.ccb(&state), consistent.ccb(&state));
        assert_eq!(model.ccd(&state), l);
    }

    #[test]
    fn cpl_works() {
        let model = PorousModel::new(retention("bc"), &SampleParams::porous()).unwrap();
        let mut state = model.new_state(0.0, 0.0, 0.0).unwrap();
        model.update(&mut state, -3.0, 0.0, 0.1).unwrap();
        let nf = 1.0 - 0.9 * 0.7;
        let ccb = model.ccb(&state);
        let ccd = model.ccd(&state);
        let cpl = nf * (state.sl * model.cl - state.rho_l * ccb);
        let dcpl = nf * (state.rho_l * ccd - 2.0 * ccb * model.cl);
        assert_abs_diff_eq!(model.cpl(&state), cpl, epsilon = 1e-15);
        let (a, b) = model.cpl_derivs(&state);
        assert_abs_diff_eq!(a, cpl, epsilon = 1e-15);
        assert_abs_diff_eq!(b, dcpl, epsilon = 1e-15);
        assert!(a > 0.0);
    }

    #[test]
    fn registry_works() {
        let registry = ModelRegistry::<PorousModel>::new();
        let lrm = retention("vg");
        let params = SampleParams::porous();
        let a = registry.get("sim", "sand", "porous", &lrm, &params, false).unwrap();
        let b = registry.get("sim", "sand", "porous", &lrm, &params, false).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.retention().name(), "vg");
        assert_eq!(
            registry.get("sim", "sand", "tpm", &lrm, &params, false).err(),
            Some(ModelError::UnknownModel("tpm".to_string()))
        );
    }
}
