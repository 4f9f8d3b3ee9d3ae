use serde::{Deserialize, Serialize};

/// Holds the state of a porous material point with liquid and gas
///
/// The state is owned by the integration point and is updated in place by
/// [crate::porous::PorousModel::update].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PorousState {
    /// Liquid pressure pl
    pub pl: f64,

    /// Gas pressure pg
    pub pg: f64,

    /// Divergence of the displacement of solids div(us)
    pub divus: f64,

    /// Liquid saturation sl
    pub sl: f64,

    /// Initial volume fraction of solids ns0
    pub ns0: f64,

    /// Intrinsic (real) density of liquid ρL
    pub rho_l: f64,

    /// Intrinsic (real) density of gas ρG
    pub rho_g: f64,

    /// Increment of capillary pressure Δpc of the last update
    pub delta_pc: f64,

    /// Indicates that the last update was a wetting step (Δpc < 0)
    pub wetting: bool,
}

impl PorousState {
    /// Returns the capillary pressure pc = pg - pl
    pub fn pc(&self) -> f64 {
        self.pg - self.pl
    }

    /// Returns the porosity nf = 1 - (1 - div(us)) ns0
    pub fn porosity(&self) -> f64 {
        1.0 - (1.0 - self.divus) * self.ns0
    }

    /// Copies another state into this state
    pub fn set(&mut self, other: &PorousState) {
        *self = *other;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::PorousState;

    fn sample() -> PorousState {
        PorousState {
            pl: -2.0,
            pg: 1.0,
            divus: 0.1,
            sl: 0.8,
            ns0: 0.7,
            rho_l: 1.0,
            rho_g: 0.01,
            delta_pc: 0.5,
            wetting: false,
        }
    }

    #[test]
    fn pc_and_porosity_work() {
        let state = sample();
        assert_eq!(state.pc(), 3.0);
        assert!(f64::abs(state.porosity() - (1.0 - 0.9 * 0.7)) < 1e-15);
    }

    #[test]
    fn set_and_serialize_work() {
        let state = sample();
        let mut other = PorousState {
            pl: 0.0,
            pg: 0.0,
            divus: 0.0,
            sl: 1.0,
            ns0: 0.7,
            rho_l: 1.0,
            rho_g: 0.0,
            delta_pc: 0.0,
            wetting: true,
        };
        other.set(&state);
        assert_eq!(other, state);
        let json = serde_json::to_string(&state).unwrap();
        let read: PorousState = serde_json::from_str(&json).unwrap();
        assert_eq!(read, state);
    }
}
