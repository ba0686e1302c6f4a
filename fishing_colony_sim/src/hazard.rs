// Hazard resolver: the skill check a boat makes when leaving a dangerous
// position.
//
// A hazard first has to manifest: one d6 is thrown and the hazard stays
// quiet if the roll exceeds its probability threshold. A manifested hazard
// is then opposed by a second d6 plus the crew's summed navigation skill
// and the hull's resistance, against the hazard's difficulty plus any
// damage the boat already carries. A second roll of 1 is always a failure
// regardless of skill.
//
// The check returns a raw score, classified by `HazardOutcome::from_score`:
//
// - `>= 0`: overcome (or never manifested, reported as the sentinel `1`).
// - `== -1`: light damage. A second roll of 1 lands here.
// - `< -1`: severe damage.
//
// What the damage *does* (delay, halved cargo, shipwreck) depends on the
// hazard kind and is decided by the journey engine, not here.
//
// **Critical constraint: determinism.** All randomness comes from the
// caller's `Dice`; the number of rolls consumed does not depend on skill,
// hull or damage, only on the dice themselves.

use crate::dice::Dice;
use crate::types::HazardKind;
use serde::{Deserialize, Serialize};

/// Score reported when the hazard does not manifest.
pub const SAFE_PASSAGE: i32 = 1;

/// Score reported when the second roll is a 1.
pub const UNLUCKY_ROLL: i32 = -1;

/// A navigational danger attached to a position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    pub description: String,
    /// Manifests when a d6 roll is at or below this value (0 = never,
    /// 6 = always).
    pub probability: u8,
    pub difficulty: i32,
}

/// How a hazard check turned out for the boat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardOutcome {
    Safe,
    Light,
    Severe,
}

impl HazardOutcome {
    pub fn from_score(score: i32) -> Self {
        if score < -1 {
            Self::Severe
        } else if score == -1 {
            Self::Light
        } else {
            Self::Safe
        }
    }
}

impl Hazard {
    /// Run the hazard check for a boat whose crew has `skill` total
    /// navigation, with hull resistance `hull` and accumulated `damage`.
    pub fn check(&self, dice: &mut impl Dice, skill: i32, hull: i32, damage: i32) -> i32 {
        let manifest = dice.d6();
        if manifest > i32::from(self.probability) {
            log::debug!("{} did not manifest (rolled {manifest})", self.kind);
            return SAFE_PASSAGE;
        }
        let roll = dice.d6();
        if roll == 1 {
            log::debug!("{} manifested and the crew rolled a 1", self.kind);
            return UNLUCKY_ROLL;
        }
        let score = roll + skill + hull - self.difficulty - damage;
        log::debug!(
            "{} check: roll {roll} + skill {skill} + hull {hull} - difficulty {} - damage {damage} = {score}",
            self.kind,
            self.difficulty
        );
        score
    }

    /// Run the check and classify the score.
    pub fn resolve(&self, dice: &mut impl Dice, skill: i32, hull: i32, damage: i32) -> HazardOutcome {
        HazardOutcome::from_score(self.check(dice, skill, hull, damage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::prng::GameRng;

    fn storm(probability: u8, difficulty: i32) -> Hazard {
        Hazard {
            kind: HazardKind::Storm,
            description: "A storm rolls in from the south.".to_string(),
            probability,
            difficulty,
        }
    }

    fn total(hazard: &Hazard, seed: u64, skill: i32, hull: i32, damage: i32) -> i32 {
        let mut rng = GameRng::new(seed);
        (0..100)
            .map(|_| hazard.check(&mut rng, skill, hull, damage))
            .sum()
    }

    #[test]
    fn quiet_hazard_is_safe() {
        let hazard = storm(3, 6);
        let mut dice = ScriptedDice::new([4]);
        assert_eq!(hazard.check(&mut dice, 0, 0, 0), SAFE_PASSAGE);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn probability_zero_never_manifests() {
        let hazard = storm(0, 20);
        let mut rng = GameRng::new(3);
        for _ in 0..200 {
            assert_eq!(hazard.resolve(&mut rng, 0, 0, 0), HazardOutcome::Safe);
        }
    }

    #[test]
    fn second_roll_of_one_ignores_skill() {
        let hazard = storm(6, 0);
        let mut dice = ScriptedDice::new([6, 1]);
        assert_eq!(hazard.check(&mut dice, 10, 10, 0), UNLUCKY_ROLL);
        assert_eq!(HazardOutcome::from_score(UNLUCKY_ROLL), HazardOutcome::Light);
    }

    #[test]
    fn score_combines_every_term() {
        let hazard = storm(6, 7);
        let mut dice = ScriptedDice::new([2, 4]);
        // 4 + 1 + 3 - 7 - 2
        assert_eq!(hazard.check(&mut dice, 1, 3, 2), -1);
        let mut dice = ScriptedDice::new([2, 2]);
        assert_eq!(hazard.resolve(&mut dice, 0, 1, 0), HazardOutcome::Severe);
        let mut dice = ScriptedDice::new([2, 6]);
        assert_eq!(hazard.resolve(&mut dice, 0, 1, 0), HazardOutcome::Safe);
    }

    #[test]
    fn outcome_thresholds() {
        assert_eq!(HazardOutcome::from_score(3), HazardOutcome::Safe);
        assert_eq!(HazardOutcome::from_score(0), HazardOutcome::Safe);
        assert_eq!(HazardOutcome::from_score(-1), HazardOutcome::Light);
        assert_eq!(HazardOutcome::from_score(-2), HazardOutcome::Severe);
    }

    #[test]
    fn more_skill_does_better_over_many_trials() {
        let hazard = storm(6, 4);
        assert!(total(&hazard, 11, 2, 1, 0) > total(&hazard, 11, 0, 1, 0));
    }

    #[test]
    fn stronger_hull_does_better_over_many_trials() {
        let hazard = storm(6, 4);
        assert!(total(&hazard, 12, 0, 3, 0) > total(&hazard, 12, 0, 1, 0));
    }

    #[test]
    fn difficulty_and_damage_make_it_worse() {
        assert!(total(&storm(6, 6), 13, 1, 1, 0) < total(&storm(6, 4), 13, 1, 1, 0));
        let hazard = storm(6, 4);
        assert!(total(&hazard, 14, 1, 1, 2) < total(&hazard, 14, 1, 1, 0));
    }
}
