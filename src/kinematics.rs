use std::ops::Add;

pub const ELECTRON_MASS: f64 = 0.000_510_998_95; // GeV

/// Cartesian four-momentum (px, py, pz, E) in GeV.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LorentzVector {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
}

impl LorentzVector {
    /// Build a four-momentum from detector coordinates: transverse momentum, pseudorapidity,
    /// azimuth and rest mass.
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let e = (px * px + py * py + pz * pz + mass * mass).sqrt();
        Self { px, py, pz, e }
    }

    pub fn p2(&self) -> f64 {
        self.px * self.px + self.py * self.py + self.pz * self.pz
    }

    pub fn m2(&self) -> f64 {
        self.e * self.e - self.p2()
    }

    // Spacelike vectors from rounding report a negative mass rather than NaN
    pub fn mass(&self) -> f64 {
        let m2 = self.m2();
        m2.abs().sqrt().copysign(m2)
    }
}

impl Add for LorentzVector {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            px: self.px + other.px,
            py: self.py + other.py,
            pz: self.pz + other.pz,
            e: self.e + other.e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_coordinates() {
        let p4 = LorentzVector::from_pt_eta_phi_m(40.0, 0.7, -1.2, ELECTRON_MASS);
        assert!((p4.px.hypot(p4.py) - 40.0).abs() < 1e-9);
        assert!((p4.pz - 40.0 * 0.7_f64.sinh()).abs() < 1e-9);
        assert!((p4.py.atan2(p4.px) + 1.2).abs() < 1e-9);
        assert!((p4.mass() - ELECTRON_MASS).abs() < 1e-6);
    }

    #[test]
    fn test_back_to_back_pair_mass() {
        // Two massless legs back to back in the transverse plane: m = 2 * pt
        let a = LorentzVector::from_pt_eta_phi_m(45.0, 0.0, 0.0, 0.0);
        let b = LorentzVector::from_pt_eta_phi_m(45.0, 0.0, std::f64::consts::PI, 0.0);
        assert!(((a + b).mass() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_spacelike_mass_is_negative() {
        let p4 = LorentzVector {
            px: 3.0,
            py: 0.0,
            pz: 4.0,
            e: 3.0,
        };
        assert!((p4.mass() + 4.0).abs() < 1e-12);
    }
}
