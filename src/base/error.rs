use thiserror::Error;

/// Defines the errors returned by the material models
///
/// None of these errors is retried by the models; the caller (e.g., the global
/// solver) decides how to react, for instance by cutting the load increment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A parameter name is not in the vocabulary of the model
    #[error("{model}: parameter named {name:?} is incorrect")]
    UnknownParameter { model: &'static str, name: String },

    /// The elastic constants do not form a complete pair
    #[error("combination of elastic constants is incorrect; options are {{E,nu}}, {{l,G}}, {{K,G}} and {{K,nu}}")]
    InvalidParameterCombination,

    /// A known parameter has an inadmissible value
    #[error("{model}: parameter {name:?} = {value} is invalid")]
    InvalidParameter {
        model: &'static str,
        name: &'static str,
        value: f64,
    },

    /// The allocator could not find the model name
    #[error("cannot find model named {0:?}")]
    UnknownModel(String),

    /// The local Newton iterations did not converge
    #[error("saturation update failed after {iterations} iterations (residual = {residual:e})")]
    ConvergenceFailure { iterations: usize, residual: f64 },

    /// A post-condition of the update failed
    #[error("inconsistent results: {what}; pc = {pc}, sl = {sl}, sl_min = {sl_min}")]
    InvariantViolation {
        what: &'static str,
        pc: f64,
        sl: f64,
        sl_min: f64,
    },

    /// The local iterations produced a NaN
    #[error("NaN found: Δpc = {dpc}, Cc = {cc}, r = {residual}, J = {jacobian}, sl = {sl}")]
    NaNDetected {
        dpc: f64,
        cc: f64,
        residual: f64,
        jacobian: f64,
        sl: f64,
    },

    /// The geometry idealization is not supported by the model or operation
    #[error("{0}")]
    InvalidIdealization(&'static str),

    /// The loading path is malformed
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The input data (e.g., JSON or driver input) is malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ModelError;

    #[test]
    fn display_works() {
        let err = ModelError::UnknownParameter {
            model: "vm",
            name: "phi".to_string(),
        };
        assert_eq!(format!("{}", err), "vm: parameter named \"phi\" is incorrect");

        let err = ModelError::ConvergenceFailure {
            iterations: 20,
            residual: 0.5,
        };
        assert_eq!(
            format!("{}", err),
            "saturation update failed after 20 iterations (residual = 5e-1)"
        );

        let err = ModelError::InvariantViolation {
            what: "saturation must be greater than minimum saturation",
            pc: 2.0,
            sl: 0.05,
            sl_min: 0.1,
        };
        assert_eq!(
            format!("{}", err),
            "inconsistent results: saturation must be greater than minimum saturation; pc = 2, sl = 0.05, sl_min = 0.1"
        );
        assert_eq!(
            format!("{}", ModelError::InvalidParameterCombination),
            "combination of elastic constants is incorrect; options are {E,nu}, {l,G}, {K,G} and {K,nu}"
        );
    }
}
