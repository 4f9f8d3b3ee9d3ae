use crate::ModelError;
use serde::{Deserialize, Serialize};

/// Defines the geometry idealization (3D, plane-strain, plane-stress)
///
/// # Default values
///
/// * In 2D, the default choice is **plane-strain**
///
/// The number of stress components in the Mandel basis is `nsig = 2 ndim`.
/// In 2D, the out-of-plane normal component is always stored (`nsig = 4`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Idealization {
    /// Space dimension (2 or 3)
    pub ndim: usize,

    /// Indicates a plane-stress idealization in 2D
    pub plane_stress: bool,
}

impl Idealization {
    /// Allocates a new instance
    ///
    /// # Default values
    ///
    /// * `2D`: plane-strain
    /// * `3D`: no idealization
    pub fn new(ndim: usize) -> Self {
        Idealization {
            ndim,
            plane_stress: false,
        }
    }

    /// Allocates a new plane-stress instance (2D)
    pub fn new_plane_stress() -> Self {
        Idealization {
            ndim: 2,
            plane_stress: true,
        }
    }

    /// Returns the number of stress (and strain) components
    pub fn nsig(&self) -> usize {
        2 * self.ndim
    }

    /// Returns an error if the idealization is invalid
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.ndim != 2 && self.ndim != 3 {
            return Err(ModelError::InvalidIdealization("ndim must be 2 or 3"));
        }
        if self.plane_stress && self.ndim != 2 {
            return Err(ModelError::InvalidIdealization("plane-stress requires ndim = 2"));
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Idealization;
    use crate::ModelError;

    #[test]
    fn derive_works() {
        let ideal = Idealization::new(2);
        let mut clone = ideal.clone();
        assert_eq!(format!("{:?}", ideal), "Idealization { ndim: 2, plane_stress: false }");
        clone.plane_stress = true;
        assert_eq!(format!("{:?}", clone), "Idealization { ndim: 2, plane_stress: true }");
        assert_eq!(clone, Idealization::new_plane_stress());
    }

    #[test]
    fn nsig_and_validate_work() {
        assert_eq!(Idealization::new(2).nsig(), 4);
        assert_eq!(Idealization::new(3).nsig(), 6);
        assert_eq!(Idealization::new(3).validate(), Ok(()));
        assert_eq!(
            Idealization::new(1).validate(),
            Err(ModelError::InvalidIdealization("ndim must be 2 or 3"))
        );
        let ideal = Idealization {
            ndim: 3,
            plane_stress: true,
        };
        assert_eq!(
            ideal.validate(),
            Err(ModelError::InvalidIdealization("plane-stress requires ndim = 2"))
        );
    }
}
