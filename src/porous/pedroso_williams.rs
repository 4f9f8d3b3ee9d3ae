use super::{LiquidRetentionTrait, RetentionDerivs};
use crate::base::ParamSet;
use crate::ModelError;

/// Implements a hysteretic liquid retention model based on reference curves
///
/// The model is written in the `x = ln(1 + pc)` and `y = sl` space, where drying and
/// wetting reference curves `yd(x)` and `yw(x)` bound the admissible states. The slope
/// `dy/dx = -λb` decays with the distance to the reference curve of the current branch,
/// giving `Cc = -λb / (1 + pc)`.
///
/// Parameters:
///
/// * `lamd`, `lamw` -- slopes of the drying and wetting reference curves
/// * `xrd`, `xrw` -- x-coordinates where the reference curves bend
/// * `yr` -- residual saturation (minimum saturation)
/// * `betd`, `betw` -- smoothing coefficients of the reference curves
/// * `bet1`, `bet2` -- coefficients of the decay of the wetting and drying slopes
/// * `alp` -- exponent of the saturation-dependent drying coefficient
/// * `nowet` -- (flag) use the drying curve for wetting as well
///
/// # References
///
/// * Pedroso DM, Williams DJ (2010) A novel approach for modelling soil-water
///   characteristic curves with hysteresis, Computers and Geotechnics, 37(3), 374-380
#[derive(Clone, Debug)]
pub struct PedrosoWilliams {
    lambda_d: f64,
    lambda_w: f64,
    beta_d: f64,
    beta_w: f64,
    beta_1: f64,
    beta_2: f64,
    alpha: f64,
    y0: f64,
    yr: f64,
    no_wet: bool,
    c1d: f64,
    c2d: f64,
    c3d: f64,
    c1w: f64,
    c2w: f64,
    c3w: f64,
}

/// Holds the auxiliary values of the drying branch
struct Drying {
    /// Distance to the residual saturation
    dd: f64,

    /// Slope of the drying curve at the current saturation
    lambda_db: f64,

    /// Distance to the drying reference curve
    d: f64,

    /// Saturation-dependent decay coefficient
    beta_2b: f64,

    /// Actual slope
    lambda_b: f64,
}

/// Holds the auxiliary values of the wetting branch
struct Wetting {
    /// Distance to the full saturation
    dw: f64,

    /// Slope of the wetting curve at the current saturation
    lambda_wb: f64,

    /// Distance to the wetting reference curve
    d: f64,

    /// Actual slope
    lambda_b: f64,
}

impl PedrosoWilliams {
    /// Allocates a new instance
    pub fn new(params: &ParamSet) -> Result<Self, ModelError> {
        params.check_names(
            "ref-m1",
            &[
                "lamd", "lamw", "xrd", "xrw", "yr", "betd", "betw", "bet1", "bet2", "alp", "nowet",
            ],
            &[],
        )?;
        let get = |name: &str| params.get(name).unwrap_or(0.0);
        let yr = get("yr");
        if !(0.0..1.0).contains(&yr) {
            return Err(ModelError::InvalidParameter {
                model: "ref-m1",
                name: "yr",
                value: yr,
            });
        }
        let (lambda_d, x_rd, beta_d, beta_2) = (get("lamd"), get("xrd"), get("betd"), get("bet2"));
        if beta_d <= 0.0 {
            return Err(ModelError::InvalidParameter {
                model: "ref-m1",
                name: "betd",
                value: beta_d,
            });
        }
        let no_wet = params.get_flag("nowet", false);
        let (lambda_w, x_rw, beta_w, beta_1) = if no_wet {
            (lambda_d, x_rd, beta_2, beta_d)
        } else {
            (get("lamw"), get("xrw"), get("betw"), get("bet1"))
        };
        if beta_w <= 0.0 {
            return Err(ModelError::InvalidParameter {
                model: "ref-m1",
                name: "betw",
                value: beta_w,
            });
        }

        // constants of the reference curves
        let y0 = 1.0;
        let c1d = beta_d * lambda_d;
        let c2d = f64::exp(beta_d * yr);
        let c3d = f64::exp(beta_d * (y0 + lambda_d * x_rd)) - c2d * f64::exp(c1d * x_rd);
        let c1w = -beta_w * lambda_w;
        let c2w = f64::exp(-beta_w * y0);
        let c3w = f64::exp(-beta_w * lambda_w * x_rw) - c2w * f64::exp(c1w * x_rw);
        Ok(PedrosoWilliams {
            lambda_d,
            lambda_w,
            beta_d,
            beta_w,
            beta_1,
            beta_2,
            alpha: get("alp"),
            y0,
            yr,
            no_wet,
            c1d,
            c2d,
            c3d,
            c1w,
            c2w,
            c3w,
        })
    }

    /// Evaluates the drying reference curve yd(x)
    pub fn drying_curve(&self, x: f64) -> f64 {
        -self.lambda_d * x + f64::ln(self.c3d + self.c2d * f64::exp(self.c1d * x)) / self.beta_d
    }

    /// Evaluates the wetting reference curve yw(x)
    pub fn wetting_curve(&self, x: f64) -> f64 {
        -self.lambda_w * x - f64::ln(self.c3w + self.c2w * f64::exp(self.c1w * x)) / self.beta_w
    }

    fn drying(&self, x: f64, y: f64) -> Drying {
        let dd = f64::max(y - self.yr, 0.0);
        let lambda_db = self.lambda_d * (1.0 - f64::exp(-self.beta_d * dd));
        let d = f64::max(self.drying_curve(x) - y, 0.0);
        let beta_2b = self.beta_2 * f64::powf(f64::max(y, 0.0), self.alpha);
        Drying {
            dd,
            lambda_db,
            d,
            beta_2b,
            lambda_b: lambda_db * f64::exp(-beta_2b * d),
        }
    }

    fn wetting(&self, x: f64, y: f64) -> Wetting {
        let dw = f64::max(self.y0 - y, 0.0);
        let lambda_wb = self.lambda_w * (1.0 - f64::exp(-self.beta_w * dw));
        let d = f64::max(y - self.wetting_curve(x), 0.0);
        Wetting {
            dw,
            lambda_wb,
            d,
            lambda_b: lambda_wb * f64::exp(-self.beta_1 * d),
        }
    }

    /// Returns true if the wetting branch must be used
    fn use_wetting(&self, wetting: bool) -> bool {
        wetting && !self.no_wet
    }
}

impl LiquidRetentionTrait for PedrosoWilliams {
    fn sl_min(&self) -> f64 {
        self.yr
    }

    fn cc(&self, pc: f64, sl: f64, wetting: bool) -> f64 {
        if pc <= 0.0 {
            return 0.0;
        }
        let y = f64::max(sl, self.yr);
        let x = f64::ln(1.0 + pc);
        let lambda_b = if self.use_wetting(wetting) {
            self.wetting(x, y).lambda_b
        } else {
            self.drying(x, y).lambda_b
        };
        -lambda_b / (1.0 + pc)
    }

    fn derivs(&self, pc: f64, sl: f64, wetting: bool) -> RetentionDerivs {
        if pc <= 0.0 {
            return RetentionDerivs::default();
        }
        let y = f64::max(sl, self.yr);
        let x = f64::ln(1.0 + pc);

        // derivatives of λb with respect to x and y; the distance D to the reference
        // curve only contributes while it is positive (active)
        let (lb, dlb_dx, dlb_dy, d2lb_dx2, d2lb_dydx, d2lb_dy2);
        if self.use_wetting(wetting) {
            let w = self.wetting(x, y);
            let (c1, c2, c3, bw) = (self.c1w, self.c2w, self.c3w, self.beta_w);
            let b1 = if w.d > 0.0 { self.beta_1 } else { 0.0 };
            let e = f64::exp(c1 * x);
            let dyw_dx = -self.lambda_w - c1 * c2 * e / (bw * (c3 + c2 * e));
            let d2yw_dx2 = -c1 * c1 * c2 * c3 * e / (bw * f64::powi(c3 + c2 * e, 2));
            let decay = f64::exp(-self.beta_1 * w.d);
            let dlwb_dy = -self.lambda_w * f64::exp(-bw * w.dw) * bw;
            let a = bw * (w.lambda_wb - self.lambda_w) - w.lambda_wb * b1;
            lb = w.lambda_b;
            dlb_dx = b1 * lb * dyw_dx;
            dlb_dy = a * decay;
            d2lb_dx2 = b1 * (dlb_dx * dyw_dx + lb * d2yw_dx2);
            d2lb_dydx = b1 * dlb_dy * dyw_dx;
            d2lb_dy2 = (bw * dlwb_dy - dlwb_dy * b1) * decay - a * decay * b1;
        } else {
            let dr = self.drying(x, y);
            let (c1, c2, c3, bd, b2b) = (self.c1d, self.c2d, self.c3d, self.beta_d, dr.beta_2b);
            let active = if dr.d > 0.0 { 1.0 } else { 0.0 };
            let e = f64::exp(c1 * x);
            let dyd_dx = -self.lambda_d + c1 * c2 * e / (bd * (c3 + c2 * e));
            let d2yd_dx2 = c1 * c1 * c2 * c3 * e / (bd * f64::powi(c3 + c2 * e, 2));
            let decay = f64::exp(-b2b * dr.d);
            let y_pos = f64::max(y, 0.0);
            let db2b_dy = self.alpha * self.beta_2 * f64::powf(y_pos, self.alpha - 1.0);
            let db2b_dy2 = self.alpha * self.beta_2 * f64::powf(y_pos, self.alpha - 2.0) * (self.alpha - 1.0);
            let dldb_dy = self.lambda_d * f64::exp(-bd * dr.dd) * bd;
            let g = active * b2b - db2b_dy * dr.d; // -∂(β2b D)/∂y
            let a = bd * (self.lambda_d - dr.lambda_db) + dr.lambda_db * g;
            lb = dr.lambda_b;
            dlb_dx = -active * b2b * lb * dyd_dx;
            dlb_dy = a * decay;
            d2lb_dx2 = -active * b2b * (dlb_dx * dyd_dx + lb * d2yd_dx2);
            d2lb_dydx = -active * (b2b * dlb_dy + lb * db2b_dy) * dyd_dx;
            d2lb_dy2 = (-bd * dldb_dy + dldb_dy * g + dr.lambda_db * (2.0 * active * db2b_dy - db2b_dy2 * dr.d)) * decay
                + a * decay * g;
        }

        // chain rule with x = ln(1 + pc) and Cc = -λb / (1 + pc)
        let den = 1.0 + pc;
        let den2 = den * den;
        let l = (lb - dlb_dx) / den2;
        let j = -dlb_dy / den;
        RetentionDerivs {
            l,
            lx: ((dlb_dx - d2lb_dx2) / den2 - 2.0 * l) / den,
            j,
            jx: -(d2lb_dydx / den + j) / den,
            jy: -d2lb_dy2 / den,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
