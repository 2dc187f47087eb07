//! Pairwise knowledge exchange.
//!
//! Both partners move one randomly chosen category toward their mean by a
//! fixed fraction of the gap. Repeated exchanges converge on the mean and
//! never overshoot it.

use rand::Rng;

use primordia_types::{EntityId, EventKind, Human, KnowledgeCategory};
use primordia_world::roll::{chance, pick};

use crate::command::TickCommand;

/// One planned exchange. The convergence itself is computed at commit from
/// the partners' values at that moment, so several exchanges touching the
/// same human in one pass each close part of the current gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// The human who started the exchange.
    pub initiator: EntityId,
    /// The neighbor taking part.
    pub partner: EntityId,
    /// The category that moves.
    pub category: KnowledgeCategory,
    /// Fraction of the gap to the mean closed.
    pub rate: f64,
    /// Narrative line, present with low probability.
    pub event: Option<EventKind>,
}

/// Changes that move `a` and `b` toward their mean by `rate` of the gap.
pub fn converge(a: f64, b: f64, rate: f64) -> (f64, f64) {
    let mean = f64::midpoint(a, b);
    ((mean - a) * rate, (mean - b) * rate)
}

/// Plan an exchange in one uniformly chosen category.
pub fn exchange(
    initiator: &Human,
    partner: &Human,
    rate: f64,
    share_event_probability: f64,
    rng: &mut impl Rng,
) -> Exchange {
    let category = pick(rng, &KnowledgeCategory::ALL)
        .copied()
        .unwrap_or(KnowledgeCategory::Science);
    let event = chance(rng, share_event_probability)
        .then_some(EventKind::KnowledgeShared { category });
    Exchange {
        initiator: initiator.id,
        partner: partner.id,
        category,
        rate,
        event,
    }
}

impl Exchange {
    /// Commands applying this exchange to the two partners.
    pub fn into_commands(self) -> Vec<TickCommand> {
        let mut out = vec![TickCommand::Exchange {
            initiator: self.initiator,
            partner: self.partner,
            category: self.category,
            rate: self.rate,
        }];
        if let Some(event) = self.event {
            out.push(TickCommand::Emit(event));
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use primordia_types::{Knowledge, Personality, Position};
    use primordia_world::human_at;

    use super::*;

    fn scholar(value: f64) -> Human {
        human_at(
            Position::new(0.0, 0.0),
            30.0,
            Knowledge::uniform(value),
            Personality::new(0.5, 0.5, 0.5),
        )
    }

    #[test]
    fn converge_moves_both_toward_mean_without_overshoot() {
        let (da, db) = converge(2.0, 10.0, 0.1);
        assert!((da - 0.4).abs() < 1e-12);
        assert!((db + 0.4).abs() < 1e-12);
        assert!(2.0 + da < 6.0);
        assert!(10.0 + db > 6.0);
    }

    #[test]
    fn equal_values_stay_put() {
        assert_eq!(converge(3.0, 3.0, 0.1), (0.0, 0.0));
    }

    #[test]
    fn repeated_exchange_never_crosses_the_mean() {
        let (mut a, mut b) = (0.0_f64, 9.0_f64);
        for _ in 0..500 {
            let (da, db) = converge(a, b, 0.1);
            a += da;
            b += db;
            assert!(a <= 4.5 + 1e-12 && b >= 4.5 - 1e-12);
        }
        assert!((b - a).abs() < 1e-6);
    }

    #[test]
    fn exchange_plans_one_command_for_the_pair() {
        let mut rng = StdRng::seed_from_u64(17);
        let a = scholar(1.0);
        let b = scholar(5.0);
        let ex = exchange(&a, &b, 0.1, 0.0, &mut rng);
        assert!(ex.event.is_none());
        assert_eq!((ex.initiator, ex.partner), (a.id, b.id));
        let category = ex.category;
        assert_eq!(
            ex.into_commands(),
            vec![TickCommand::Exchange {
                initiator: a.id,
                partner: b.id,
                category,
                rate: 0.1,
            }]
        );
    }

    #[test]
    fn certain_narration_names_the_category() {
        let mut rng = StdRng::seed_from_u64(2);
        let a = scholar(1.0);
        let ex = exchange(&a, &scholar(2.0), 0.1, 1.0, &mut rng);
        assert_eq!(
            ex.event,
            Some(EventKind::KnowledgeShared {
                category: ex.category
            })
        );
    }
}
