use crate::Vector;
use serde::{Deserialize, Serialize};

/// Holds the state of a solid material point
///
/// The state is owned by the integration point and is mutated in place by
/// the stress updates. The length of each vector is fixed at allocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolidState {
    /// Holds the stress σ at the beginning of the last update
    pub stress_previous: Vector,

    /// Holds the effective Cauchy stress σ (Mandel basis)
    pub stress: Vector,

    /// Holds the rate-type internal variables α (e.g., accumulated plastic multiplier)
    pub internal_values: Vector,

    /// Holds the algorithmic Lagrange multiplier increment Δγ
    pub delta_gamma: f64,

    /// Indicates that the last update was elastoplastic
    pub loading: bool,

    /// Indicates that the last update returned to the apex of the yield surface
    pub apex_return: bool,

    /// Holds auxiliary model-specific values (e.g., the last stress increment)
    pub aux_values: Vector,
}

impl SolidState {
    /// Allocates a new instance with zeroed history
    ///
    /// * `nsig` -- number of stress components (2 × ndim)
    /// * `nalp` -- number of internal variables
    /// * `nphi` -- number of auxiliary values
    pub fn new(nsig: usize, nalp: usize, nphi: usize) -> Self {
        SolidState {
            stress_previous: Vector::zeros(nsig),
            stress: Vector::zeros(nsig),
            internal_values: Vector::zeros(nalp),
            delta_gamma: 0.0,
            loading: false,
            apex_return: false,
            aux_values: Vector::zeros(nphi),
        }
    }

    /// Copies the history of another state with the same dimensions into this state
    pub fn set(&mut self, other: &SolidState) {
        self.stress_previous.copy_from(&other.stress_previous);
        self.stress.copy_from(&other.stress);
        self.internal_values.copy_from(&other.internal_values);
        self.delta_gamma = other.delta_gamma;
        self.loading = other.loading;
        self.apex_return = other.apex_return;
        self.aux_values.copy_from(&other.aux_values);
    }

    /// Resets the algorithmic flags at the beginning of an update
    pub(crate) fn reset_algorithmic(&mut self) {
        self.stress_previous.copy_from(&self.stress);
        self.delta_gamma = 0.0;
        self.loading = false;
        self.apex_return = false;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SolidState;

    #[test]
    fn new_and_clone_work() {
        let mut state = SolidState::new(4, 1, 2);
        assert_eq!(state.stress.len(), 4);
        assert_eq!(state.internal_values.len(), 1);
        assert_eq!(state.aux_values.len(), 2);
        assert!(!state.loading);
        state.stress[0] = -1.0;
        state.internal_values[0] = 0.5;
        state.loading = true;
        let clone = state.clone();
        assert_eq!(clone, state);
        state.stress[0] = -2.0;
        assert_eq!(clone.stress[0], -1.0);
    }

    #[test]
    fn set_works() {
        let mut a = SolidState::new(4, 1, 0);
        let mut b = SolidState::new(4, 1, 0);
        a.stress[3] = 0.25;
        a.delta_gamma = 0.1;
        a.apex_return = true;
        b.set(&a);
        assert_eq!(b, a);
    }

    #[test]
    fn reset_algorithmic_works() {
        let mut state = SolidState::new(4, 1, 0);
        state.stress[1] = 3.0;
        state.delta_gamma = 0.1;
        state.loading = true;
        state.apex_return = true;
        state.reset_algorithmic();
        assert_eq!(state.stress_previous[1], 3.0);
        assert_eq!(state.delta_gamma, 0.0);
        assert!(!state.loading);
        assert!(!state.apex_return);
    }

    #[test]
    fn serialize_works() {
        let state = SolidState::new(4, 1, 0);
        let json = serde_json::to_string(&state).unwrap();
        let read: SolidState = serde_json::from_str(&json).unwrap();
        assert_eq!(read, state);
    }
}
