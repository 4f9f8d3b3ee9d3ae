use super::{non_negative, residual_saturation, LiquidRetentionTrait, RetentionDerivs};
use crate::base::ParamSet;
use crate::ModelError;

/// Implements the Brooks and Corey liquid retention model
///
/// ```text
/// Sl(pc) = 1                                      if pc ≤ pcae
/// Sl(pc) = slmin + (1 - slmin) (pcae / pc)^λ      otherwise
/// ```
///
/// Parameters: `lam` (λ), `pcae` (air-entry pressure) and `slmin` (residual saturation).
#[derive(Clone, Debug)]
pub struct BrooksCorey {
    /// Slope coefficient
    lambda: f64,

    /// Air-entry pressure
    pc_ae: f64,

    /// Residual (minimum) saturation
    sl_min: f64,
}

impl BrooksCorey {
    /// Allocates a new instance
    pub fn new(params: &ParamSet) -> Result<Self, ModelError> {
        params.check_names("bc", &["lam", "pcae", "slmin"], &[])?;
        Ok(BrooksCorey {
            lambda: non_negative("bc", params, "lam")?,
            pc_ae: non_negative("bc", params, "pcae")?,
            sl_min: residual_saturation("bc", params, "slmin")?,
        })
    }

    /// Computes the saturation directly from pc
    pub fn saturation(&self, pc: f64) -> f64 {
        if pc <= self.pc_ae {
            return 1.0;
        }
        self.sl_min + (1.0 - self.sl_min) * f64::powf(self.pc_ae / pc, self.lambda)
    }
}

impl LiquidRetentionTrait for BrooksCorey {
    fn sl_min(&self) -> f64 {
        self.sl_min
    }

    fn cc(&self, pc: f64, _sl: f64, _wetting: bool) -> f64 {
        if pc <= self.pc_ae {
            return 0.0;
        }
        -(1.0 - self.sl_min) * self.lambda * f64::powf(self.pc_ae / pc, self.lambda) / pc
    }

    fn derivs(&self, pc: f64, _sl: f64, _wetting: bool) -> RetentionDerivs {
        let mut d = RetentionDerivs::default();
        if pc > self.pc_ae {
            let lam = self.lambda;
            let c = (1.0 - self.sl_min) * lam * (lam + 1.0) * f64::powf(self.pc_ae / pc, lam);
            d.l = c / (pc * pc);
            d.lx = -c * (lam + 2.0) / (pc * pc * pc);
        }
        d
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
