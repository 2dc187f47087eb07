//! The decision engine: a pure scoring function from one human and its
//! neighbor sets to an action.
//!
//! Each qualifying action is proposed with a priority. Proposals are sorted
//! by priority, highest first; the sort is stable, so ties keep proposal
//! order (socialize, learn, gather, fight, build, explore). With no proposal
//! the human explores.

use primordia_types::{ActionKind, Human};
use primordia_world::Neighborhood;

use crate::config::BehaviorConfig;

/// One candidate action and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proposal {
    /// The candidate.
    pub action: ActionKind,
    /// Higher wins.
    pub priority: f64,
}

/// Every qualifying proposal, in construction order.
pub fn proposals(human: &Human, near: &Neighborhood, config: &BehaviorConfig) -> Vec<Proposal> {
    let p = &human.personality;
    let has_company = !near.humans.is_empty();
    let mut out = Vec::with_capacity(ActionKind::ALL.len());

    if has_company && p.social > config.socialize_threshold {
        out.push(Proposal {
            action: ActionKind::Socialize,
            priority: p.social * config.socialize_weight,
        });
    }
    if has_company && p.curiosity > config.learn_threshold {
        out.push(Proposal {
            action: ActionKind::Learn,
            priority: p.curiosity * config.learn_weight,
        });
    }
    if human.resources < config.gather_ceiling && !near.trees.is_empty() {
        let missing = config.gather_ceiling - human.resources.max(0.0);
        out.push(Proposal {
            action: ActionKind::Gather,
            priority: missing * config.gather_weight,
        });
    }
    if !near.mobs.is_empty() && p.aggression > config.fight_threshold {
        out.push(Proposal {
            action: ActionKind::Fight,
            priority: p.aggression * config.fight_weight,
        });
    }
    let crafting = human.knowledge.crafting;
    if human.resources > config.build_resource_threshold
        && crafting > config.build_crafting_threshold
    {
        out.push(Proposal {
            action: ActionKind::Build,
            priority: crafting / config.build_priority_divisor,
        });
    }
    if p.curiosity > config.explore_threshold {
        out.push(Proposal {
            action: ActionKind::Explore,
            priority: p.curiosity * config.explore_weight,
        });
    }
    out
}

/// Choose an action for `human`. Has no side effects.
pub fn decide(human: &Human, near: &Neighborhood, config: &BehaviorConfig) -> ActionKind {
    let mut ranked = proposals(human, near, config);
    ranked.sort_by(|a, b| b.priority.total_cmp(&a.priority));
    ranked
        .first()
        .map_or(ActionKind::Explore, |proposal| proposal.action)
}

#[cfg(test)]
mod tests {
    use primordia_types::{EntityId, Knowledge, Personality, Position};
    use primordia_world::human_at;

    use super::*;

    fn human(aggression: f64, curiosity: f64, social: f64) -> Human {
        human_at(
            Position::new(0.0, 0.0),
            30.0,
            Knowledge::ZERO,
            Personality::new(aggression, curiosity, social),
        )
    }

    fn near(humans: usize, mobs: usize, trees: usize) -> Neighborhood {
        let ids = |n: usize| (0..n).map(|_| EntityId::new()).collect();
        Neighborhood {
            humans: ids(humans),
            mobs: ids(mobs),
            trees: ids(trees),
        }
    }

    #[test]
    fn nobody_qualifies_defaults_to_explore() {
        let h = human(0.0, 0.0, 0.0);
        assert!(proposals(&h, &near(0, 0, 0), &BehaviorConfig::default()).is_empty());
        assert_eq!(
            decide(&h, &near(0, 0, 0), &BehaviorConfig::default()),
            ActionKind::Explore
        );
    }

    #[test]
    fn sociable_human_with_company_socializes() {
        let h = human(0.0, 0.0, 0.9);
        assert_eq!(
            decide(&h, &near(1, 0, 0), &BehaviorConfig::default()),
            ActionKind::Socialize
        );
        // Alone, the same human has nothing to do but wander.
        assert_eq!(
            decide(&h, &near(0, 0, 0), &BehaviorConfig::default()),
            ActionKind::Explore
        );
    }

    #[test]
    fn poor_human_near_trees_gathers() {
        // Gather scores (15 - 0) * 2 = 30, above socialize at 9.
        let h = human(0.0, 0.0, 0.9);
        assert_eq!(
            decide(&h, &near(1, 0, 1), &BehaviorConfig::default()),
            ActionKind::Gather
        );
    }

    #[test]
    fn aggressive_human_fights_nearby_mob() {
        let h = human(0.9, 0.0, 0.0);
        assert_eq!(
            decide(&h, &near(0, 1, 0), &BehaviorConfig::default()),
            ActionKind::Fight
        );
    }

    #[test]
    fn crafted_and_wealthy_human_builds() {
        let mut h = human(0.0, 0.0, 0.0);
        h.resources = 30.0;
        h.knowledge.crafting = 15.0;
        assert_eq!(
            decide(&h, &near(0, 0, 1), &BehaviorConfig::default()),
            ActionKind::Build
        );
    }

    #[test]
    fn ties_keep_proposal_order() {
        // socialize 0.5 * 10 and learn 0.625 * 8 tie at 5; socialize was proposed first.
        let h = human(0.0, 0.625, 0.5);
        let config = BehaviorConfig::default();
        let ranked = proposals(&h, &near(1, 0, 0), &config);
        assert_eq!(
            ranked.iter().map(|p| p.action).collect::<Vec<_>>(),
            vec![ActionKind::Socialize, ActionKind::Learn, ActionKind::Explore]
        );
        assert_eq!(decide(&h, &near(1, 0, 0), &config), ActionKind::Socialize);
    }

    #[test]
    fn negative_resources_floor_gather_priority() {
        let mut h = human(0.0, 0.0, 0.0);
        h.resources = -5.0;
        let ranked = proposals(&h, &near(0, 0, 1), &BehaviorConfig::default());
        let gather = ranked.first().map(|p| p.priority).unwrap_or_default();
        assert!((gather - 30.0).abs() < 1e-9);
    }
}
