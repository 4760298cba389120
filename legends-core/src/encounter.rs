//! Picking monsters for a fight.

use crate::formulas::round_half_up;
use crate::monster::Monster;
use crate::party::Party;
use rand::Rng;
use tracing::debug;

/// Default chance that an exploration step starts a battle.
pub const DEFAULT_ENCOUNTER_CHANCE: f64 = 0.3;

/// Default distance from the party level a monster may be.
pub const DEFAULT_LEVEL_TOLERANCE: u32 = 1;

/// The party's mean level, rounded half up, at least 1.
pub fn party_reference_level(party: &Party) -> u32 {
    if party.is_empty() {
        return 1;
    }
    round_half_up(party.mean_level()).max(1) as u32
}

/// Templates within `tolerance` levels of `level`, or all of them if none are.
pub fn candidates(templates: &[Monster], level: u32, tolerance: u32) -> Vec<&Monster> {
    let low = level.saturating_sub(tolerance).max(1);
    let high = level.saturating_add(tolerance);
    let near: Vec<&Monster> = templates
        .iter()
        .filter(|m| (low..=high).contains(&m.level()))
        .collect();
    if near.is_empty() {
        templates.iter().collect()
    } else {
        near
    }
}

/// One freshly spawned monster per party member, drawn uniformly from the candidates.
pub fn generate<R: Rng + ?Sized>(
    templates: &[Monster],
    party: &Party,
    tolerance: u32,
    rng: &mut R,
) -> Vec<Monster> {
    let level = party_reference_level(party);
    let pool = candidates(templates, level, tolerance);
    if pool.is_empty() {
        return Vec::new();
    }

    let monsters: Vec<Monster> = (0..party.len())
        .map(|_| pool[rng.gen_range(0..pool.len())].spawn())
        .collect();
    debug!(
        level,
        candidates = pool.len(),
        monsters = ?monsters.iter().map(Monster::name).collect::<Vec<_>>(),
        "encounter generated"
    );
    monsters
}

/// Whether an exploration step triggers a battle.
pub fn should_trigger<R: Rng + ?Sized>(chance: f64, rng: &mut R) -> bool {
    rng.gen::<f64>() < chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_monster, sample_warrior, seeded_rng};

    fn templates() -> Vec<Monster> {
        vec![
            sample_monster("One", 1),
            sample_monster("Two", 2),
            sample_monster("Five", 5),
            sample_monster("Nine", 9),
        ]
    }

    #[test]
    fn test_reference_level_rounds_half_up() {
        let mut party = Party::new(vec![sample_warrior("a"), sample_warrior("b")]).unwrap();
        assert_eq!(party_reference_level(&party), 1);
        party.get_mut(0).unwrap().level_up();
        // mean 1.5 rounds to 2
        assert_eq!(party_reference_level(&party), 2);
    }

    #[test]
    fn test_candidates_within_tolerance() {
        let all = templates();
        let names: Vec<_> = candidates(&all, 1, 1).iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["One", "Two"]);
        let names: Vec<_> = candidates(&all, 5, 1).iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Five"]);
    }

    #[test]
    fn test_candidates_fall_back_to_all() {
        let all = templates();
        assert_eq!(candidates(&all, 20, 1).len(), 4);
    }

    #[test]
    fn test_one_monster_per_hero() {
        let party = Party::new(vec![sample_warrior("a"), sample_warrior("b"), sample_warrior("c")]).unwrap();
        let monsters = generate(&templates(), &party, 1, &mut seeded_rng(3));
        assert_eq!(monsters.len(), 3);
        assert!(monsters.iter().all(|m| m.level() <= 2));
    }

    #[test]
    fn test_no_templates_no_monsters() {
        let party = Party::new(vec![sample_warrior("a")]).unwrap();
        assert!(generate(&[], &party, 1, &mut seeded_rng(3)).is_empty());
    }

    #[test]
    fn test_trigger_extremes() {
        let mut rng = seeded_rng(11);
        assert!((0..50).all(|_| !should_trigger(0.0, &mut rng)));
        assert!((0..50).all(|_| should_trigger(1.0, &mut rng)));
    }
}
