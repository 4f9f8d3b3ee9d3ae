use crate::base::{mandel_eps_d, mandel_eps_v};
use crate::{ModelError, Vector};
use serde::{Deserialize, Serialize};

/// Holds a loading path for material-point simulations with solid models
///
/// The path is a sequence of `size` targets. Each target (after the first) is
/// reached with `n_incs` equal increments, either of stress (`use_s[i]`) or of
/// strain (`use_e[i]`). The first stress target defines the initial stress.
///
/// Only the normal components (x, y, z) are prescribed; shear components are zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingPath {
    /// σx stress components
    #[serde(alias = "Sx")]
    pub sx: Vec<f64>,

    /// σy stress components
    #[serde(alias = "Sy")]
    pub sy: Vec<f64>,

    /// σz stress components
    #[serde(alias = "Sz")]
    pub sz: Vec<f64>,

    /// εx strain components
    #[serde(alias = "Ex")]
    pub ex: Vec<f64>,

    /// εy strain components
    #[serde(alias = "Ey")]
    pub ey: Vec<f64>,

    /// εz strain components
    #[serde(alias = "Ez")]
    pub ez: Vec<f64>,

    /// Use the stress components to reach the i-th target
    #[serde(alias = "UseS")]
    pub use_s: Vec<bool>,

    /// Use the strain components to reach the i-th target
    #[serde(alias = "UseE")]
    pub use_e: Vec<bool>,

    /// Number of increments per segment
    #[serde(alias = "Nincs")]
    pub n_incs: usize,

    /// Number of increments for output
    #[serde(alias = "Niout")]
    pub n_iout: usize,

    /// Multiplier for stresses
    #[serde(alias = "MultS")]
    pub mult_s: f64,

    /// Multiplier for strains
    #[serde(alias = "MultE")]
    pub mult_e: f64,

    /// Space dimension
    #[serde(skip)]
    ndim: usize,

    /// Number of path components (targets)
    #[serde(skip)]
    size: usize,
}

impl LoadingPath {
    /// Returns the number of path components (targets)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the space dimension
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Returns the number of stress components (2 × ndim)
    pub fn nsig(&self) -> usize {
        2 * self.ndim
    }

    /// Generates an isotropic compression path (stress driven)
    ///
    /// # Input
    ///
    /// * `ndim` -- space dimension
    /// * `n_incs` -- number of increments per segment
    /// * `n_iout` -- number of increments for output
    /// * `pp` -- sequence of mean pressures P (positive in compression); σx = σy = σz = -P
    pub fn new_iso_compression(ndim: usize, n_incs: usize, n_iout: usize, pp: &[f64]) -> Result<Self, ModelError> {
        let mut path = LoadingPath {
            sx: pp.iter().map(|p| -p).collect(),
            sy: pp.iter().map(|p| -p).collect(),
            sz: pp.iter().map(|p| -p).collect(),
            use_s: vec![true; pp.len()],
            n_incs,
            n_iout,
            ..Default::default()
        };
        path.init(ndim)?;
        Ok(path)
    }

    /// Generates a strain path corresponding to elastic (Δp, Δq) increments
    ///
    /// The strains are computed with [calc_delta_strain_elastic] for axisymmetric
    /// compression, starting from the isotropic stress state `-p0`.
    ///
    /// # Input
    ///
    /// * `ndim` -- space dimension
    /// * `n_incs` -- number of increments per segment
    /// * `n_iout` -- number of increments for output
    /// * `kk` -- bulk modulus used to convert stresses into strains
    /// * `gg` -- shear modulus used to convert stresses into strains
    /// * `p0` -- initial mean pressure
    /// * `dp` -- sequence of increments of mean pressure
    /// * `dq` -- sequence of increments of deviatoric stress (same length as `dp`)
    /// * `noise` -- value added to εy and subtracted from εz at each target
    pub fn new_pq_strain(
        ndim: usize,
        n_incs: usize,
        n_iout: usize,
        kk: f64,
        gg: f64,
        p0: f64,
        dp: &[f64],
        dq: &[f64],
        noise: f64,
    ) -> Result<Self, ModelError> {
        if dp.len() != dq.len() {
            return Err(ModelError::InvalidPath(format!(
                "DP and DQ must have the same length. {} ≠ {}",
                dp.len(),
                dq.len()
            )));
        }
        let n = 1 + dp.len();
        let mut path = LoadingPath {
            sx: vec![-p0],
            sy: vec![-p0],
            sz: vec![-p0],
            ex: vec![0.0; n],
            ey: vec![0.0; n],
            ez: vec![0.0; n],
            n_incs,
            n_iout,
            ..Default::default()
        };
        let mut deps = Vector::zeros(4);
        for i in 1..n {
            calc_delta_strain_elastic(&mut deps, kk, gg, dp[i - 1], dq[i - 1], true)?;
            path.ex[i] = path.ex[i - 1] + deps[0];
            path.ey[i] = path.ey[i - 1] + deps[1] + noise;
            path.ez[i] = path.ez[i - 1] + deps[2] - noise;
        }
        path.init(ndim)?;
        Ok(path)
    }

    /// Reads a path from JSON
    ///
    /// # Examples
    ///
    /// ```
    /// use geomat::material::LoadingPath;
    ///
    /// let json = r#"{"sx": [0, -1, -2], "sy": [0, -1, -2], "sz": [0, -1, -2], "n_incs": 2}"#;
    /// let path = LoadingPath::from_json(2, json).unwrap();
    /// assert_eq!(path.size(), 3);
    /// assert_eq!(path.use_s, &[true, true, true]);
    /// assert_eq!(path.mult_s, 1.0);
    /// ```
    pub fn from_json(ndim: usize, json: &str) -> Result<Self, ModelError> {
        let mut path: LoadingPath =
            serde_json::from_str(json).map_err(|e| ModelError::InvalidInput(format!("cannot parse path: {}", e)))?;
        path.init(ndim)?;
        Ok(path)
    }

    /// Validates the path and sets derived data after the components have been set
    pub fn init(&mut self, ndim: usize) -> Result<(), ModelError> {
        if ndim != 2 && ndim != 3 {
            return Err(ModelError::InvalidPath(format!("ndim = {} is incorrect", ndim)));
        }
        self.ndim = ndim;

        // size of slices and flags
        let (n_sx, n_sy, n_sz) = (self.sx.len(), self.sy.len(), self.sz.len());
        let (n_ex, n_ey, n_ez) = (self.ex.len(), self.ey.len(), self.ez.len());
        let mut has_s = n_sx > 0 || n_sy > 0 || n_sz > 0;
        let has_e = n_ex > 0 || n_ey > 0 || n_ez > 0;
        let all_s = !has_e;
        let mut all_e = !has_s;

        // check stress slices
        if n_sx != n_sy || n_sx != n_sz {
            return Err(ModelError::InvalidPath(format!(
                "all S slices must have the same size. nSx={}, nSy={}, nSz={}",
                n_sx, n_sy, n_sz
            )));
        }
        if n_sx < 1 {
            return Err(ModelError::InvalidPath(
                "at least one component of Sx,Sy,Sz must be given to initialise the stresses".to_string(),
            ));
        }

        // unset has_s if only the initial stresses were given
        if n_sx == 1 {
            has_s = false;
            all_e = true;
            if !has_e {
                return Err(ModelError::InvalidPath(
                    "with only initial stresses given, E slices must be given".to_string(),
                ));
            }
        }

        // other checks
        self.size = 0;
        if has_s {
            self.size = n_sx;
        }
        if has_e {
            if n_ex != n_ey || n_ex != n_ez {
                return Err(ModelError::InvalidPath(format!(
                    "all E slices must have the same size. nEx={}, nEy={}, nEz={}",
                    n_ex, n_ey, n_ez
                )));
            }
            self.size = n_ex;
        }
        if has_s && has_e {
            if n_ex != n_sx {
                return Err(ModelError::InvalidPath(
                    "when using S and E slices at the same time, all {S,E} slices must have the same size"
                        .to_string(),
                ));
            }
            if self.use_s.len() != n_sx || self.use_e.len() != n_sx {
                return Err(ModelError::InvalidPath(format!(
                    "when using S and E slices, UseS and UseE must be given with the same size as S and E. len(UseS)={}, len(UseE)={}, n{{S,E}}={}",
                    self.use_s.len(),
                    self.use_e.len(),
                    n_sx
                )));
            }
        }

        // check size and number of increments
        if self.size < 2 {
            return Err(ModelError::InvalidPath(
                "number of path components must be at least 2".to_string(),
            ));
        }
        if self.n_incs < 1 {
            self.n_incs = 1;
        }

        // multipliers
        if self.mult_s < 1e-7 {
            self.mult_s = 1.0;
        }
        if self.mult_e < 1e-7 {
            self.mult_e = 1.0;
        }

        // use flags
        if all_s {
            self.use_s = vec![true; self.size];
            self.use_e = vec![false; self.size];
        }
        if all_e {
            self.use_e = vec![true; self.size];
            self.use_s = vec![false; self.size];
        }
        Ok(())
    }

    /// Returns the number of increments along the whole path
    pub fn n_increments(&self) -> usize {
        let mut n = 0;
        for i in 1..self.size {
            if self.use_s[i] {
                n += self.n_incs;
            }
            if self.use_e[i] {
                n += self.n_incs;
            }
        }
        n
    }
}

/// Calculates the strain increment corresponding to an elastic loading with (Δp, Δq)
///
/// ```text
/// Δεv = -Δp / K    Δεd = Δq / (3 G)
/// ```
///
/// # Input
///
/// * `delta_strain` -- (output) the strain increment with at least 4 components (shear set to zero)
/// * `kk`, `gg` -- bulk and shear moduli
/// * `dp`, `dq` -- increments of mean pressure and deviatoric stress
/// * `axisymmetric` -- axisymmetric compression (Δεx = Δεy); otherwise plane-strain (Δεz = 0)
///
/// # Output
///
/// Returns `(Δεv, Δεd)`
pub fn calc_delta_strain_elastic(
    delta_strain: &mut Vector,
    kk: f64,
    gg: f64,
    dp: f64,
    dq: f64,
    axisymmetric: bool,
) -> Result<(f64, f64), ModelError> {
    if delta_strain.len() < 4 {
        return Err(ModelError::InvalidInput(format!(
            "the strain increment must have at least 4 components; len = {}",
            delta_strain.len()
        )));
    }
    let deps_v = -dp / kk;
    let deps_d = dq / (3.0 * gg);
    let (deps_x, deps_y, deps_z) = if axisymmetric {
        let deps_x = deps_v / 3.0 + deps_d / 2.0;
        (deps_x, deps_x, deps_v / 3.0 - deps_d)
    } else {
        let c = 9.0 * deps_d * deps_d / (4.0 * deps_v * deps_v);
        if !c.is_finite() {
            return Err(ModelError::InvalidInput(
                "plane-strain path requires a non-zero volumetric strain".to_string(),
            ));
        }
        let mut alpha = 0.0;
        if f64::abs(c - 1.0) > 1e-15 {
            let d = 3.0 * (4.0 * c - 1.0);
            if d < 0.0 {
                return Err(ModelError::InvalidInput(format!("discriminant < 0: c = {}, d = {}", c, d)));
            }
            alpha = (1.0 + 2.0 * c + f64::sqrt(d)) / (2.0 - 2.0 * c);
        }
        let deps_y = deps_v / (1.0 + alpha);
        (alpha * deps_y, deps_y, 0.0)
    };
    delta_strain.fill(0.0);
    delta_strain[0] = deps_x;
    delta_strain[1] = deps_y;
    delta_strain[2] = deps_z;

    // check
    let deps_v_res = mandel_eps_v(delta_strain);
    let mut deps_d_res = mandel_eps_d(delta_strain);
    if deps_d < 0.0 {
        deps_d_res = -deps_d_res; // allow negative values
    }
    let tol = 1e-10 * (1.0 + f64::abs(deps_v) + f64::abs(deps_d));
    if f64::abs(deps_v - deps_v_res) > tol {
        return Err(ModelError::InvalidInput(format!("failed on Δεv: {} ≠ {}", deps_v, deps_v_res)));
    }
    if f64::abs(deps_d - deps_d_res) > tol {
        return Err(ModelError::InvalidInput(format!("failed on Δεd: {} ≠ {}", deps_d, deps_d_res)));
    }
    Ok((deps_v, deps_d))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
