use crate::event::Electron;
use crate::kinematics::LorentzVector;

/// Two electrons from the same event. `lead` and `sublead` follow construction order,
/// not pt order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dielectron {
    pub lead: Electron,
    pub sublead: Electron,
}

impl Dielectron {
    pub fn new(lead: Electron, sublead: Electron) -> Self {
        Self { lead, sublead }
    }

    pub fn p4(&self) -> LorentzVector {
        self.lead.p4() + self.sublead.p4()
    }

    pub fn mass(&self) -> f64 {
        self.p4().mass()
    }

    pub fn is_opposite_charge(&self) -> bool {
        self.lead.charge + self.sublead.charge == 0
    }
}

/// All unordered pairs `(i, j)` with `i < j`, in index order.
pub fn combinations(electrons: &[Electron]) -> Vec<Dielectron> {
    let mut pairs = Vec::new();
    for (i, lead) in electrons.iter().enumerate() {
        for sublead in &electrons[i + 1..] {
            pairs.push(Dielectron::new(*lead, *sublead));
        }
    }
    pairs
}
