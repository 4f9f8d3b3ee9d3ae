/// Initial step of the finite differences
const H_INI: f64 = 1e-3;

/// Computes the first derivative of f(x) using a five-point central rule with step optimization
///
/// The derivative is first estimated with the step `h = 1e-3` by combining the three-point
/// and five-point central rules. The difference between both estimates gives the truncation
/// error, which, together with the rounding error, is used to compute an optimal step. The
/// estimate at the optimal step is accepted if its error is smaller and it is consistent
/// with the first estimate.
///
/// The `args` are passed through to `f`; any error returned by `f` is propagated.
///
/// # Examples
///
/// ```
/// use geomat::base::deriv1_central5;
/// use geomat::ModelError;
///
/// let mut args = 0;
/// let d = deriv1_central5(1.0, &mut args, |x, count| {
///     *count += 1;
///     Ok::<f64, ModelError>(f64::sin(x))
/// })
/// .unwrap();
/// assert!(f64::abs(d - f64::cos(1.0)) < 1e-10);
/// assert!(args >= 4);
/// ```
pub fn deriv1_central5<F, A, E>(at_x: f64, args: &mut A, mut f: F) -> Result<f64, E>
where
    F: FnMut(f64, &mut A) -> Result<f64, E>,
{
    let (mut res, round, trunc) = central_rule(at_x, H_INI, args, &mut f)?;
    let error = round + trunc;
    if round < trunc && round > 0.0 && trunc > 0.0 {
        let h_opt = H_INI * f64::powf(round / (2.0 * trunc), 1.0 / 3.0);
        let (res_opt, round_opt, trunc_opt) = central_rule(at_x, h_opt, args, &mut f)?;
        let error_opt = round_opt + trunc_opt;
        if error_opt < error && f64::abs(res_opt - res) < 4.0 * error {
            res = res_opt;
        }
    }
    Ok(res)
}

/// Computes the first derivative of f(x) using a four-point forward rule with step optimization
///
/// Only `f(x + h/4)`, `f(x + h/2)`, `f(x + 3h/4)` and `f(x + h)` are evaluated (with h > 0).
/// Thus, this function is useful when `f` is not defined (or not smooth) on the left of `x`.
pub fn deriv1_forward4<F, A, E>(at_x: f64, args: &mut A, mut f: F) -> Result<f64, E>
where
    F: FnMut(f64, &mut A) -> Result<f64, E>,
{
    let (mut res, round, trunc) = forward_rule(at_x, H_INI, args, &mut f)?;
    let error = round + trunc;
    if round < trunc && round > 0.0 && trunc > 0.0 {
        let h_opt = H_INI * f64::sqrt(round / trunc);
        let (res_opt, round_opt, trunc_opt) = forward_rule(at_x, h_opt, args, &mut f)?;
        let error_opt = round_opt + trunc_opt;
        if error_opt < error && f64::abs(res_opt - res) < 4.0 * error {
            res = res_opt;
        }
    }
    Ok(res)
}

/// Returns (derivative, rounding error, truncation error)
fn central_rule<F, A, E>(x: f64, h: f64, args: &mut A, f: &mut F) -> Result<(f64, f64, f64), E>
where
    F: FnMut(f64, &mut A) -> Result<f64, E>,
{
    let fm1 = f(x - h, args)?;
    let fp1 = f(x + h, args)?;
    let fmh = f(x - h / 2.0, args)?;
    let fph = f(x + h / 2.0, args)?;
    let r3 = 0.5 * (fp1 - fm1);
    let r5 = (4.0 / 3.0) * (fph - fmh) - (1.0 / 3.0) * r3;
    let e3 = (f64::abs(fp1) + f64::abs(fm1)) * f64::EPSILON;
    let e5 = 2.0 * (f64::abs(fph) + f64::abs(fmh)) * f64::EPSILON + e3;
    let dy = f64::max(f64::abs(r3 / h), f64::abs(r5 / h)) * (f64::abs(x) / h) * f64::EPSILON;
    Ok((r5 / h, f64::abs(e5 / h) + dy, f64::abs((r5 - r3) / h)))
}

/// Returns (derivative, rounding error, truncation error)
fn forward_rule<F, A, E>(x: f64, h: f64, args: &mut A, f: &mut F) -> Result<(f64, f64, f64), E>
where
    F: FnMut(f64, &mut A) -> Result<f64, E>,
{
    let f1 = f(x + h / 4.0, args)?;
    let f2 = f(x + h / 2.0, args)?;
    let f3 = f(x + 3.0 * h / 4.0, args)?;
    let f4 = f(x + h, args)?;
    let r2 = 2.0 * (f4 - f2);
    let r4 = (22.0 / 3.0) * (f4 - f3) - (62.0 / 3.0) * (f3 - f2) + (52.0 / 3.0) * (f2 - f1);
    let e4 = 2.0 * 20.67 * (f64::abs(f4) + f64::abs(f3) + f64::abs(f2) + f64::abs(f1)) * f64::EPSILON;
    let dy = f64::max(f64::abs(r2 / h), f64::abs(r4 / h)) * f64::abs(x / h) * f64::EPSILON;
    Ok((r4 / h, f64::abs(e4 / h) + dy, f64::abs((r4 - r2) / h)))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
