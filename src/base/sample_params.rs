use super::ParamSet;

/// Holds samples of material parameters
pub struct SampleParams {}

impl SampleParams {
    /// Returns sample parameters for the linear elastic solid model ("lin-elast")
    pub fn linear_elastic() -> ParamSet {
        ParamSet::from_pairs(&[
            ("E", 60.0), // kPa
            ("nu", 0.25),
        ])
    }

    /// Returns sample parameters for the von Mises model ("vm")
    pub fn von_mises() -> ParamSet {
        ParamSet::from_pairs(&[
            ("K", 1.5),   // kPa
            ("G", 1.0),   // kPa
            ("qy0", 2.0), // kPa
            ("H", 0.5),   // kPa
        ])
    }

    /// Returns sample parameters for the Drucker-Prager model ("dp")
    pub fn drucker_prager() -> ParamSet {
        ParamSet::from_pairs(&[
            ("K", 1.5),
            ("G", 1.0),
            ("M", 0.5),
            ("Mb", 0.5),
            ("qy0", 2.0),
            ("H", 0.5),
        ])
    }

    /// Returns sample parameters for the Brooks-Corey retention model ("bc")
    pub fn brooks_corey() -> ParamSet {
        ParamSet::from_pairs(&[("lam", 0.5), ("pcae", 0.2), ("slmin", 0.1)])
    }

    /// Returns sample parameters for the linear retention model ("lin")
    pub fn linear_retention() -> ParamSet {
        ParamSet::from_pairs(&[("lam", 0.5), ("pcae", 0.2), ("slmin", 0.1)])
    }

    /// Returns sample parameters for the van Genuchten retention model ("vg")
    pub fn van_genuchten() -> ParamSet {
        ParamSet::from_pairs(&[("alp", 0.08), ("m", 4.0), ("n", 4.0), ("slmin", 0.01)])
    }

    /// Returns sample parameters for the reference-curve retention model ("ref-m1")
    pub fn ref_m1() -> ParamSet {
        ParamSet::from_pairs(&[
            ("lamd", 3.0),
            ("lamw", 3.0),
            ("xrd", 2.0),
            ("xrw", 2.0),
            ("yr", 0.005),
            ("betd", 2.0),
            ("betw", 2.0),
            ("bet1", 2.0),
            ("bet2", 2.0),
            ("alp", 0.5),
        ])
    }

    /// Returns sample parameters for the porous medium model ("porous")
    pub fn porous() -> ParamSet {
        ParamSet::from_pairs(&[
            ("nf0", 0.3),
            ("RhoL0", 1.0),   // Mg/m³
            ("RhoG0", 0.01),  // Mg/m³
            ("RhoS0", 2.7),   // Mg/m³
            ("BulkL", 2.2e6), // kPa
            ("RTg", 0.02),
            ("gref", 10.0), // m/s²
            ("kl", 1e-3),   // m/s
            ("kg", 1e-2),   // m/s
        ])
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
