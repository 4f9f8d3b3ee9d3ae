use super::{non_negative, residual_saturation, LiquidRetentionTrait, RetentionDerivs};
use crate::base::ParamSet;
use crate::ModelError;

/// Implements a linear liquid retention model
///
/// ```text
/// Sl(pc) = 1 - λ (pc - pcae)    clamped to [slmin, 1]
/// ```
///
/// Parameters: `lam` (λ), `pcae` (air-entry pressure) and `slmin` (residual saturation).
#[derive(Clone, Debug)]
pub struct LinearRetention {
    /// Slope coefficient
    lambda: f64,

    /// Air-entry pressure
    pc_ae: f64,

    /// Residual (minimum) saturation
    sl_min: f64,

    /// Capillary pressure corresponding to the residual saturation
    pc_res: f64,
}

impl LinearRetention {
    /// Allocates a new instance
    pub fn new(params: &ParamSet) -> Result<Self, ModelError> {
        params.check_names("lin", &["lam", "pcae", "slmin"], &[])?;
        let mut lambda = non_negative("lin", params, "lam")?;
        let pc_ae = non_negative("lin", params, "pcae")?;
        let sl_min = residual_saturation("lin", params, "slmin")?;
        let pc_res = if lambda < 1e-15 {
            lambda = 0.0;
            f64::MAX
        } else {
            pc_ae + (1.0 - sl_min) / lambda
        };
        Ok(LinearRetention {
            lambda,
            pc_ae,
            sl_min,
            pc_res,
        })
    }

    /// Computes the saturation directly from pc
    pub fn saturation(&self, pc: f64) -> f64 {
        if pc <= self.pc_ae {
            return 1.0;
        }
        if pc >= self.pc_res {
            return self.sl_min;
        }
        1.0 - self.lambda * (pc - self.pc_ae)
    }
}

impl LiquidRetentionTrait for LinearRetention {
    fn sl_min(&self) -> f64 {
        self.sl_min
    }

    fn cc(&self, pc: f64, _sl: f64, _wetting: bool) -> f64 {
        if pc <= self.pc_ae || pc >= self.pc_res {
            return 0.0;
        }
        -self.lambda
    }

    fn derivs(&self, _pc: f64, _sl: f64, _wetting: bool) -> RetentionDerivs {
        RetentionDerivs::default()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
