use crate::{Matrix, Vector};

/// Holds √2
pub const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Holds √3
pub const SQRT_3: f64 = 1.7320508075688772;

/// Holds √6
pub const SQRT_6: f64 = 2.449489742783178;

/// Holds √(2/3)
pub const SQRT_2_BY_3: f64 = 0.816496580927726;

/// Holds √(3/2)
pub const SQRT_3_BY_2: f64 = 1.224744871391589;

/// Returns the i-th component of the second-order identity in Mandel basis
///
/// ```text
/// I = {1, 1, 1, 0, 0, 0}
/// ```
#[inline]
pub fn im(i: usize) -> f64 {
    if i < 3 {
        1.0
    } else {
        0.0
    }
}

/// Returns the (i,j) component of the symmetric-deviatoric projector in Mandel basis
///
/// ```text
/// Psd = 𝕀sym - ⅓ I ⊗ I
/// ```
#[inline]
pub fn psd(i: usize, j: usize) -> f64 {
    let delta = if i == j { 1.0 } else { 0.0 };
    delta - im(i) * im(j) / 3.0
}

/// Returns the identity vector I with dimension nsig
pub fn identity_vector(nsig: usize) -> Vector {
    Vector::from_fn(nsig, |i, _| im(i))
}

/// Returns the trace of a Mandel vector (sum of the normal components)
#[inline]
pub fn mandel_trace(v: &Vector) -> f64 {
    v[0] + v[1] + v[2]
}

/// Returns the mean pressure p = -tr(σ)/3 (positive in compression)
#[inline]
pub fn mandel_p(sigma: &Vector) -> f64 {
    -mandel_trace(sigma) / 3.0
}

/// Returns the deviatoric stress invariant q = √(3/2) ‖dev(σ)‖
pub fn mandel_q(sigma: &Vector) -> f64 {
    let tr = mandel_trace(sigma);
    let mut sum = 0.0;
    for i in 0..sigma.len() {
        let s = sigma[i] - tr * im(i) / 3.0;
        sum += s * s;
    }
    SQRT_3_BY_2 * f64::sqrt(sum)
}

/// Computes the deviator s = dev(v) and returns its norm ‖s‖
pub fn mandel_deviator(s: &mut Vector, v: &Vector) -> f64 {
    let tr = mandel_trace(v);
    let mut sum = 0.0;
    for i in 0..v.len() {
        s[i] = v[i] - tr * im(i) / 3.0;
        sum += s[i] * s[i];
    }
    f64::sqrt(sum)
}

/// Returns the volumetric strain εv = tr(ε)
#[inline]
pub fn mandel_eps_v(eps: &Vector) -> f64 {
    mandel_trace(eps)
}

/// Returns the deviatoric strain εd = √(2/3) ‖dev(ε)‖
pub fn mandel_eps_d(eps: &Vector) -> f64 {
    let mut s = Vector::zeros(eps.len());
    SQRT_2_BY_3 * mandel_deviator(&mut s, eps)
}

/// Returns true if the matrix is symmetric within the tolerance
pub fn is_symmetric(a: &Matrix, tol: f64) -> bool {
    if a.nrows() != a.ncols() {
        return false;
    }
    for i in 0..a.nrows() {
        for j in (i + 1)..a.ncols() {
            if f64::abs(a[(i, j)] - a[(j, i)]) > tol {
                return false;
            }
        }
    }
    true
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
