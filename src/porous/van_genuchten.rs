use super::{residual_saturation, LiquidRetentionTrait, RetentionDerivs};
use crate::base::ParamSet;
use crate::ModelError;

/// Implements the van Genuchten liquid retention model
///
/// ```text
/// Sl(pc) = slmin + (1 - slmin) (1 + (α pc)^n)^(-m)    if pc > pcmin
/// ```
///
/// Parameters: `alp` (α), `m`, `n`, `slmin` (residual saturation) and `pcmin`
/// (capillary pressure below which the slope is taken as zero; default 1e-3).
#[derive(Clone, Debug)]
pub struct VanGenuchten {
    alpha: f64,
    m: f64,
    n: f64,
    sl_min: f64,
    pc_min: f64,
}

impl VanGenuchten {
    /// Allocates a new instance
    pub fn new(params: &ParamSet) -> Result<Self, ModelError> {
        params.check_names("vg", &["alp", "m", "n", "slmin", "pcmin"], &[])?;
        let positive = |name: &'static str| -> Result<f64, ModelError> {
            let value = params.get(name).unwrap_or(0.0);
            if value <= 0.0 {
                return Err(ModelError::InvalidParameter {
                    model: "vg",
                    name,
                    value,
                });
            }
            Ok(value)
        };
        Ok(VanGenuchten {
            alpha: positive("alp")?,
            m: positive("m")?,
            n: positive("n")?,
            sl_min: residual_saturation("vg", params, "slmin")?,
            pc_min: params.get("pcmin").unwrap_or(1e-3),
        })
    }

    /// Computes the saturation directly from pc
    pub fn saturation(&self, pc: f64) -> f64 {
        if pc <= self.pc_min {
            return 1.0;
        }
        let c = f64::powf(self.alpha * pc, self.n);
        self.sl_min + (1.0 - self.sl_min) * f64::powf(1.0 + c, -self.m)
    }
}

impl LiquidRetentionTrait for VanGenuchten {
    fn sl_min(&self) -> f64 {
        self.sl_min
    }

    fn cc(&self, pc: f64, _sl: f64, _wetting: bool) -> f64 {
        if pc <= self.pc_min {
            return 0.0;
        }
        let (m, n) = (self.m, self.n);
        let c = f64::powf(self.alpha * pc, n);
        -(1.0 - self.sl_min) * c * f64::powf(c + 1.0, -m - 1.0) * m * n / pc
    }

    fn derivs(&self, pc: f64, _sl: f64, _wetting: bool) -> RetentionDerivs {
        let mut d = RetentionDerivs::default();
        if pc <= self.pc_min {
            return d;
        }
        let (m, n) = (self.m, self.n);
        let c = f64::powf(self.alpha * pc, n);
        let cc = c * c;
        let (mm, nn, mn) = (m * m, n * n, m * n);
        let fac = 1.0 - self.sl_min;
        d.l = fac * c * f64::powf(c + 1.0, -m - 2.0) * mn * (c * mn - n + c + 1.0) / (pc * pc);
        d.lx = -fac
            * c
            * f64::powf(c + 1.0, -m - 3.0)
            * mn
            * (cc * mm * nn - 3.0 * c * m * nn - c * nn + nn + 3.0 * cc * mn + 3.0 * c * mn - 3.0 * c * n - 3.0 * n
                + 2.0 * cc
                + 4.0 * c
                + 2.0)
            / (pc * pc * pc);
        d
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
