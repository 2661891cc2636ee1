//! Physical constants (CODATA 2018) and conversions between keV and the dimensionless
//! total energy `W` measured in units of the electron rest energy.

pub const FINE_STRUCTURE_CONSTANT: f64 = 7.297_352_569_3e-3;
pub const ELECTRON_MASS_KEV: f64 = 510.998_950_00;
/// Average of the proton and neutron rest energies.
pub const NUCLEON_MASS_KEV: f64 = 938_918.754;
/// Reduced Compton wavelength of the electron, ħ/(m_e c), in fm.
pub const NATURAL_LENGTH_FM: f64 = 386.159_267_96;

/// Nucleon rest energy in units of the electron rest energy.
#[inline]
pub fn nucleon_mass_w() -> f64 {
    NUCLEON_MASS_KEV / ELECTRON_MASS_KEV
}

/// Converts a kinetic energy in keV into the total energy `W`.
#[inline]
pub fn kev_to_w(kinetic_kev: f64) -> f64 {
    kinetic_kev / ELECTRON_MASS_KEV + 1.0
}

/// Converts a total energy `W` into the kinetic energy in keV.
#[inline]
pub fn w_to_kev(w: f64) -> f64 {
    (w - 1.0) * ELECTRON_MASS_KEV
}

/// Converts a length in fm into natural units.
#[inline]
pub fn fm_to_natural(length_fm: f64) -> f64 {
    length_fm / NATURAL_LENGTH_FM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_kinetic_energy_is_the_rest_mass() {
        assert_eq!(kev_to_w(0.0), 1.0);
        assert_eq!(w_to_kev(1.0), 0.0);
    }

    #[test]
    fn kev_and_w_conversions_are_inverse() {
        let e = 1234.5;
        assert!((w_to_kev(kev_to_w(e)) - e).abs() < 1e-9);
    }

    #[test]
    fn nucleon_mass_is_about_1837_electron_masses() {
        assert!((nucleon_mass_w() - 1837.4).abs() < 0.1);
    }
}
