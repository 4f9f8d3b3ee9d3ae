use super::{BrooksCorey, LinearRetention, PedrosoWilliams, VanGenuchten};
use crate::base::{ModelAllocator, ParamSet};
use crate::ModelError;

/// Holds the derivatives of the retention function Cc(pc, sl)
///
/// ```text
/// L = ∂Cc/∂pc    Lx = ∂²Cc/∂pc²
/// J = ∂Cc/∂sl    Jx = ∂²Cc/(∂sl ∂pc)    Jy = ∂²Cc/∂sl²
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RetentionDerivs {
    pub l: f64,
    pub lx: f64,
    pub j: f64,
    pub jx: f64,
    pub jy: f64,
}

/// Specifies the essential functions for liquid retention models
///
/// The models are written in rate form, `dsl/dpc = Cc(pc, sl, wetting)`, where
/// `pc = pg - pl` is the capillary pressure and `sl` is the liquid saturation.
pub trait LiquidRetentionTrait: Send + Sync {
    /// Returns the minimum (residual) liquid saturation
    fn sl_min(&self) -> f64;

    /// Computes Cc = dsl/dpc
    fn cc(&self, pc: f64, sl: f64, wetting: bool) -> f64;

    /// Computes all first and second derivatives of Cc
    fn derivs(&self, pc: f64, sl: f64, wetting: bool) -> RetentionDerivs;

    /// Computes L = ∂Cc/∂pc
    fn l(&self, pc: f64, sl: f64, wetting: bool) -> f64 {
        self.derivs(pc, sl, wetting).l
    }

    /// Computes J = ∂Cc/∂sl
    fn j(&self, pc: f64, sl: f64, wetting: bool) -> f64 {
        self.derivs(pc, sl, wetting).j
    }
}

/// Holds the actual liquid retention model implementation
///
/// The allocator names are:
///
/// * `"bc"` -- [BrooksCorey] (direct)
/// * `"lin"` -- [LinearRetention] (direct)
/// * `"vg"` -- [VanGenuchten] (direct)
/// * `"ref-m1"` -- [PedrosoWilliams] (rate-type with hysteresis)
///
/// Direct models compute the saturation in closed form, `sl = Sl(pc)`.
pub enum LiquidRetention {
    BrooksCorey(BrooksCorey),
    Linear(LinearRetention),
    VanGenuchten(VanGenuchten),
    PedrosoWilliams(PedrosoWilliams),
}

impl LiquidRetention {
    /// Allocates a new instance given the model name
    pub fn new(model_name: &str, params: &ParamSet) -> Result<Self, ModelError> {
        let model = match model_name {
            "bc" => LiquidRetention::BrooksCorey(BrooksCorey::new(params)?),
            "lin" => LiquidRetention::Linear(LinearRetention::new(params)?),
            "vg" => LiquidRetention::VanGenuchten(VanGenuchten::new(params)?),
            "ref-m1" => LiquidRetention::PedrosoWilliams(PedrosoWilliams::new(params)?),
            _ => return Err(ModelError::UnknownModel(model_name.to_string())),
        };
        Ok(model)
    }

    /// Returns the allocator name of the model
    pub fn name(&self) -> &'static str {
        match self {
            LiquidRetention::BrooksCorey(_) => "bc",
            LiquidRetention::Linear(_) => "lin",
            LiquidRetention::VanGenuchten(_) => "vg",
            LiquidRetention::PedrosoWilliams(_) => "ref-m1",
        }
    }

    /// Returns the actual model as a trait object
    pub fn actual(&self) -> &dyn LiquidRetentionTrait {
        match self {
            LiquidRetention::BrooksCorey(m) => m,
            LiquidRetention::Linear(m) => m,
            LiquidRetention::VanGenuchten(m) => m,
            LiquidRetention::PedrosoWilliams(m) => m,
        }
    }

    /// Indicates that the model computes the saturation directly from pc
    pub fn is_direct(&self) -> bool {
        !matches!(self, LiquidRetention::PedrosoWilliams(_))
    }

    /// Computes the saturation directly from pc; returns None for rate-type models
    pub fn saturation(&self, pc: f64) -> Option<f64> {
        match self {
            LiquidRetention::BrooksCorey(m) => Some(m.saturation(pc)),
            LiquidRetention::Linear(m) => Some(m.saturation(pc)),
            LiquidRetention::VanGenuchten(m) => Some(m.saturation(pc)),
            LiquidRetention::PedrosoWilliams(_) => None,
        }
    }
}

impl ModelAllocator for LiquidRetention {
    type Setup = ();
    fn allocate(model_name: &str, _setup: &(), params: &ParamSet) -> Result<Self, ModelError> {
        LiquidRetention::new(model_name, params)
    }
}

impl LiquidRetentionTrait for LiquidRetention {
    fn sl_min(&self) -> f64 {
        self.actual().sl_min()
    }

    fn cc(&self, pc: f64, sl: f64, wetting: bool) -> f64 {
        self.actual().cc(pc, sl, wetting)
    }

    fn derivs(&self, pc: f64, sl: f64, wetting: bool) -> RetentionDerivs {
        self.actual().derivs(pc, sl, wetting)
    }

    fn l(&self, pc: f64, sl: f64, wetting: bool) -> f64 {
        self.actual().l(pc, sl, wetting)
    }

    fn j(&self, pc: f64, sl: f64, wetting: bool) -> f64 {
        self.actual().j(pc, sl, wetting)
    }
}

/// Returns the residual saturation parameter, checking that it lies in [0, 1)
pub(crate) fn residual_saturation(model: &'static str, params: &ParamSet, name: &'static str) -> Result<f64, ModelError> {
    let value = params.get(name).unwrap_or(0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(ModelError::InvalidParameter { model, name, value });
    }
    Ok(value)
}

/// Returns a parameter that must not be negative (zero if missing)
pub(crate) fn non_negative(model: &'static str, params: &ParamSet, name: &'static str) -> Result<f64, ModelError> {
    let value = params.get(name).unwrap_or(0.0);
    if value < 0.0 {
        return Err(ModelError::InvalidParameter { model, name, value });
    }
    Ok(value)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{LiquidRetention, LiquidRetentionTrait};
    use crate::base::{ParamSet, SampleParams};
    use crate::ModelError;

    #[test]
    fn allocate_retention_model_works() {
        let bc = LiquidRetention::new("bc", &SampleParams::brooks_corey()).unwrap();
        assert_eq!(bc.name(), "bc");
        assert!(bc.is_direct());
        assert_eq!(bc.sl_min(), 0.1);
        assert_eq!(bc.saturation(0.1), Some(1.0));

        let lin = LiquidRetention::new("lin", &SampleParams::linear_retention()).unwrap();
        assert_eq!(lin.name(), "lin");
        assert_eq!(lin.cc(1.0, 0.5, false), -0.5);

        let vg = LiquidRetention::new("vg", &SampleParams::van_genuchten()).unwrap();
        assert_eq!(vg.name(), "vg");
        assert_eq!(vg.sl_min(), 0.01);

        let refm1 = LiquidRetention::new("ref-m1", &SampleParams::ref_m1()).unwrap();
        assert_eq!(refm1.name(), "ref-m1");
        assert!(!refm1.is_direct());
        assert_eq!(refm1.saturation(1.0), None);
        assert_eq!(refm1.sl_min(), 0.005);
        assert!(refm1.cc(1.0, 0.9, false) < 0.0);
    }

    #[test]
    fn allocate_captures_errors() {
        assert_eq!(
            LiquidRetention::new("bc2", &SampleParams::brooks_corey()).err(),
            Some(ModelError::UnknownModel("bc2".to_string()))
        );
        assert_eq!(
            LiquidRetention::new("bc", &SampleParams::ref_m1()).err(),
            Some(ModelError::UnknownParameter {
                model: "bc",
                name: "lamd".to_string()
            })
        );
        let params = ParamSet::from_pairs(&[("lam", 0.5), ("pcae", 0.2), ("slmin", 1.0)]);
        assert_eq!(
            LiquidRetention::new("bc", &params).err(),
            Some(ModelError::InvalidParameter {
                model: "bc",
                name: "slmin",
                value: 1.0
            })
        );
        let params = ParamSet::from_pairs(&[("lam", -0.5)]);
        assert_eq!(
            LiquidRetention::new("lin", &params).err(),
            Some(ModelError::InvalidParameter {
                model: "lin",
                name: "lam",
                value: -0.5
            })
        );
    }

    #[test]
    fn default_derivative_functions_work() {
        let model = LiquidRetention::new("ref-m1", &SampleParams::ref_m1()).unwrap();
        let d = model.derivs(2.0, 0.8, false);
        assert_eq!(model.l(2.0, 0.8, false), d.l);
        assert_eq!(model.j(2.0, 0.8, false), d.j);
        let d = model.derivs(2.0, 0.8, true);
        assert_eq!(model.j(2.0, 0.8, true), d.j);
    }
}
