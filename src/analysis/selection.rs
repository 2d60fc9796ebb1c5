use super::dielectron::{Dielectron, combinations};
use crate::config::SelectionCuts;
use crate::event::{Electron, Event, EventBatch};
use crate::histoer::histogrammer::{Histogrammer, Variable};

/// Electrons of one event under selection. The outer `None` masks the whole event, an
/// inner `None` masks a single electron while keeping the positions of the others.
pub type Masked<'a> = Option<Vec<Option<&'a Electron>>>;

/// Dielectron tag-and-probe selection.
///
/// Stages run in order and only ever mask, never reorder:
/// trigger, more than one electron, tight identification of the first electron,
/// acceptance per electron, pt of the first electron, exactly two slots (masked
/// slots included), opposite charge. The surviving pair fills the five histograms.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    pub cuts: SelectionCuts,
}

impl Selector {
    pub fn new(cuts: SelectionCuts) -> Self {
        Self { cuts }
    }

    /// Run the selection over one batch of `dataset` and histogram the survivors.
    pub fn process(&self, batch: &EventBatch, dataset: &str) -> Histogrammer {
        let mut output = Histogrammer::default();
        output.register_dataset(dataset);
        output.add_count(dataset, batch.len() as u64);

        let mut selected = 0usize;
        for pair in batch.iter().filter_map(|event| self.select(event)) {
            output.fill(Variable::Mass, dataset, pair.mass());
            output.fill(Variable::EtaLead, dataset, pair.lead.eta);
            output.fill(Variable::EtaSublead, dataset, pair.sublead.eta);
            output.fill(Variable::PtLead, dataset, pair.lead.pt);
            output.fill(Variable::PtSublead, dataset, pair.sublead.pt);
            selected += 1;
        }

        log::debug!(
            "{dataset}: {selected} of {} events selected in batch",
            batch.len()
        );

        output
    }

    /// The dielectron of `event` if it passes every stage.
    pub fn select(&self, event: &Event) -> Option<Dielectron> {
        let masked = trigger(event);
        let masked = multiplicity(masked);
        let masked = self.tag_identification(masked);
        let masked = self.acceptance(masked);
        let masked = self.tag_pt(masked);

        let survivors = exactly_two(masked)?;
        combinations(&survivors)
            .into_iter()
            .next()
            .filter(Dielectron::is_opposite_charge)
    }

    // Always the first electron, whichever one would pass
    fn tag_identification<'a>(&self, masked: Masked<'a>) -> Masked<'a> {
        masked.filter(|electrons| {
            matches!(electrons.first(), Some(Some(e)) if e.cut_based == self.cuts.tag_cut_based)
        })
    }

    fn acceptance<'a>(&self, masked: Masked<'a>) -> Masked<'a> {
        masked.map(|electrons| {
            electrons
                .into_iter()
                .map(|e| e.filter(|e| self.in_acceptance(e.eta)))
                .collect()
        })
    }

    /// Barrel, or endcap below the outer eta bound. The barrel/endcap gap is excluded.
    pub fn in_acceptance(&self, eta: f64) -> bool {
        let abs_eta = eta.abs();
        (abs_eta < self.cuts.barrel_eta_max)
            || ((abs_eta > self.cuts.endcap_eta_min) && (abs_eta < self.cuts.endcap_eta_max))
    }

    // A masked first electron masks the event
    fn tag_pt<'a>(&self, masked: Masked<'a>) -> Masked<'a> {
        masked.filter(|electrons| {
            matches!(electrons.first(), Some(Some(e)) if e.pt > self.cuts.tag_pt_min)
        })
    }
}

fn trigger(event: &Event) -> Masked<'_> {
    event
        .trigger
        .then(|| event.electrons.iter().map(Some).collect())
}

fn multiplicity(masked: Masked<'_>) -> Masked<'_> {
    masked.filter(|electrons| electrons.len() > 1)
}

/// Keep the event only when its masked collection has exactly two slots. Masked slots
/// count towards the two, and a masked slot cannot form an opposite-charge pair.
fn exactly_two(masked: Masked<'_>) -> Option<Vec<Electron>> {
    let electrons = masked.filter(|electrons| electrons.len() == 2)?;
    electrons.into_iter().map(|e| e.copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::electron;

    fn event(electrons: Vec<Electron>) -> Event {
        Event {
            trigger: true,
            electrons,
        }
    }

    fn good_pair() -> Event {
        event(vec![electron(40.0, 0.5, -1, 4), electron(38.0, -1.0, 1, 2)])
    }

    #[test]
    fn test_good_pair_fills_every_histogram_once() {
        let selector = Selector::default();
        let batch = EventBatch::new(vec![good_pair()]);
        let output = selector.process(&batch, "DY");

        assert_eq!(output.count("DY"), 1);
        for variable in Variable::ALL {
            assert_eq!(output.histogram(variable).get("DY").sum(), 1.0);
        }
        let pt_lead = output.histogram(Variable::PtLead).get("DY");
        let index = pt_lead.get_bin_index(40.0).unwrap();
        assert_eq!(pt_lead.bins[index], 1.0);
        let pt_sublead = output.histogram(Variable::PtSublead).get("DY");
        let index = pt_sublead.get_bin_index(38.0).unwrap();
        assert_eq!(pt_sublead.bins[index], 1.0);
    }

    #[test]
    fn test_same_charge_rejected() {
        let selector = Selector::default();
        let same_sign = event(vec![electron(40.0, 0.5, 1, 4), electron(38.0, -1.0, 1, 4)]);
        assert!(selector.select(&same_sign).is_none());

        let output = selector.process(&EventBatch::new(vec![same_sign]), "DY");
        for variable in Variable::ALL {
            assert_eq!(output.histogram(variable).get("DY").sum(), 0.0);
        }
    }

    #[test]
    fn test_trigger_required() {
        let mut e = good_pair();
        e.trigger = false;
        assert!(Selector::default().select(&e).is_none());
    }

    #[test]
    fn test_single_electron_rejected() {
        let e = event(vec![electron(40.0, 0.5, -1, 4)]);
        assert!(Selector::default().select(&e).is_none());
    }

    #[test]
    fn test_identification_uses_first_electron() {
        let selector = Selector::default();
        // Second electron is tight but only the first one is checked
        let e = event(vec![electron(40.0, 0.5, -1, 3), electron(38.0, -1.0, 1, 4)]);
        assert!(selector.select(&e).is_none());

        // A loose second electron does not matter
        let e = event(vec![electron(40.0, 0.5, -1, 4), electron(38.0, -1.0, 1, 1)]);
        assert!(selector.select(&e).is_some());
    }

    #[test]
    fn test_acceptance_regions() {
        let selector = Selector::default();
        assert!(selector.in_acceptance(0.0));
        assert!(selector.in_acceptance(-1.44));
        assert!(!selector.in_acceptance(1.5));
        assert!(!selector.in_acceptance(-1.5));
        assert!(!selector.in_acceptance(1.4442));
        assert!(!selector.in_acceptance(1.566));
        assert!(selector.in_acceptance(1.8));
        assert!(selector.in_acceptance(-2.09));
        assert!(!selector.in_acceptance(2.1));
        assert!(!selector.in_acceptance(2.4));
        assert!(!selector.in_acceptance(f64::NAN));
    }

    #[test]
    fn test_gap_electron_rejected() {
        let selector = Selector::default();
        // Probe in the gap leaves one survivor
        let e = event(vec![electron(40.0, 0.5, -1, 4), electron(38.0, 1.5, 1, 4)]);
        assert!(selector.select(&e).is_none());
        // Tag in the gap masks the event at the pt stage
        let e = event(vec![electron(40.0, 1.5, -1, 4), electron(38.0, 0.2, 1, 4)]);
        assert!(selector.select(&e).is_none());
    }

    #[test]
    fn test_tag_pt_threshold() {
        let selector = Selector::default();
        let e = event(vec![electron(35.0, 0.5, -1, 4), electron(50.0, -1.0, 1, 4)]);
        assert!(selector.select(&e).is_none());
        let e = event(vec![electron(35.1, 0.5, -1, 4), electron(20.0, -1.0, 1, 4)]);
        assert!(selector.select(&e).is_some());
    }

    #[test]
    fn test_masked_third_electron_still_counts() {
        let selector = Selector::default();
        // Third electron fails acceptance but its slot keeps the event at three entries
        let e = event(vec![
            electron(40.0, 0.5, -1, 4),
            electron(38.0, -1.0, 1, 4),
            electron(20.0, 2.3, 1, 4),
        ]);
        assert!(selector.select(&e).is_none());

        let output = selector.process(&EventBatch::new(vec![e]), "DY");
        assert_eq!(output.count("DY"), 1);
        for variable in Variable::ALL {
            assert_eq!(output.histogram(variable).get("DY").sum(), 0.0);
        }

        let e = event(vec![
            electron(40.0, 0.5, -1, 4),
            electron(38.0, -1.0, 1, 4),
            electron(20.0, 0.3, 1, 4),
        ]);
        assert!(selector.select(&e).is_none());
    }

    #[test]
    fn test_masked_second_slot_fails_charge() {
        let selector = Selector::default();
        let e = event(vec![electron(40.0, 0.5, -1, 4), electron(38.0, 2.3, 1, 4)]);
        let masked = selector.acceptance(multiplicity(trigger(&e)));
        assert_eq!(masked.as_ref().map(Vec::len), Some(2));
        assert!(matches!(masked.as_deref(), Some([Some(_), None])));
        assert!(exactly_two(masked).is_none());
        assert!(selector.select(&e).is_none());
    }

    #[test]
    fn test_four_entries_with_two_survivors_rejected() {
        let selector = Selector::default();
        let e = event(vec![
            electron(40.0, 0.5, -1, 4),
            electron(30.0, 1.5, 1, 4),
            electron(38.0, -1.0, 1, 4),
            electron(25.0, -2.4, -1, 4),
        ]);
        let masked = selector.acceptance(multiplicity(trigger(&e)));
        let unmasked = masked
            .as_ref()
            .map(|electrons| electrons.iter().flatten().count());
        assert_eq!(unmasked, Some(2));
        assert!(selector.select(&e).is_none());
    }

    #[test]
    fn test_pair_not_reordered_by_pt() {
        let e = event(vec![electron(36.0, 0.5, -1, 4), electron(70.0, -1.0, 1, 4)]);
        let pair = Selector::default().select(&e).unwrap();
        assert_eq!(pair.lead.pt, 36.0);
        assert_eq!(pair.sublead.pt, 70.0);
    }

    #[test]
    fn test_mass_entries_match_selected_events() {
        let selector = Selector::default();
        let mut events = Vec::new();
        for i in 0..20 {
            let mut lead = electron(40.0 + i as f64, 0.3, -1, 4);
            let mut sublead = electron(40.0, -0.3, 1, 4);
            lead.mass = 0.0;
            sublead.mass = 0.0;
            sublead.phi = std::f64::consts::PI;
            if i % 3 == 0 {
                sublead.charge = -1;
            }
            if i % 4 == 0 {
                lead.cut_based = 2;
            }
            events.push(event(vec![lead, sublead]));
        }
        let batch = EventBatch::new(events);
        let passing = batch.iter().filter(|e| selector.select(e).is_some()).count();

        let output = selector.process(&batch, "Data");
        assert_eq!(output.count("Data"), 20);
        assert!(passing > 0);
        assert_eq!(
            output.histogram(Variable::Mass).get("Data").sum(),
            passing as f64
        );
    }

    #[test]
    fn test_empty_batch_registers_dataset() {
        let output = Selector::default().process(&EventBatch::default(), "Data_2018D");
        assert_eq!(output.count("Data_2018D"), 0);
        assert_eq!(
            output
                .histogram(Variable::Mass)
                .categories()
                .collect::<Vec<_>>(),
            vec!["Data_2018D"]
        );
    }
}
