// Fishing resolver: one net cast at a fishing ground.
//
// A cast throws one d6. A 1 comes up empty with no harm done. Otherwise the
// raw score is `roll + skill - difficulty`; a non-positive score is returned
// as-is (the journey engine reads anything below -1 as a torn net), and a
// positive score is clamped to `MAX_CAST_SCORE` and scaled into kilograms:
// a perfect cast brings in the ground's full `max_yield`, each point short
// of it a fifth less.

use crate::dice::Dice;
use serde::{Deserialize, Serialize};

/// Highest score a single cast can count for.
pub const MAX_CAST_SCORE: i32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishingGround {
    pub difficulty: i32,
    /// Kilograms landed by a perfect cast.
    pub max_yield: u32,
}

/// What one cast means for the boat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastOutcome {
    LostNet,
    Empty,
    Catch(u32),
}

impl CastOutcome {
    pub fn from_score(score: i32) -> Self {
        if score < -1 {
            Self::LostNet
        } else if score <= 0 {
            Self::Empty
        } else {
            Self::Catch(score.unsigned_abs())
        }
    }
}

impl FishingGround {
    /// Cast one net with a crew totalling `skill` fishing. Returns kilograms
    /// caught when positive, otherwise the (non-positive) failure score.
    pub fn cast(&self, dice: &mut impl Dice, skill: i32) -> i32 {
        let roll = dice.d6();
        if roll == 1 {
            log::debug!("cast rolled a 1, net comes up empty");
            return 0;
        }
        let raw = roll + skill - self.difficulty;
        if raw <= 0 {
            log::debug!("cast failed: roll {roll} + skill {skill} - difficulty {}", self.difficulty);
            return raw;
        }
        let score = raw.min(MAX_CAST_SCORE);
        let max_yield = i32::try_from(self.max_yield).unwrap_or(i32::MAX);
        let kilograms = max_yield.saturating_mul(score) / MAX_CAST_SCORE;
        log::debug!("cast scored {score}, landing {kilograms} kg");
        kilograms
    }

    pub fn resolve(&self, dice: &mut impl Dice, skill: i32) -> CastOutcome {
        CastOutcome::from_score(self.cast(dice, skill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::prng::GameRng;

    fn ground(difficulty: i32) -> FishingGround {
        FishingGround {
            difficulty,
            max_yield: 50,
        }
    }

    /// Run 100 casts; return (total kilograms, severe failures).
    fn trial(ground: &FishingGround, seed: u64, skill: i32) -> (i32, usize) {
        let mut rng = GameRng::new(seed);
        let mut kilograms = 0;
        let mut severe = 0;
        for _ in 0..100 {
            match ground.resolve(&mut rng, skill) {
                CastOutcome::Catch(kg) => kilograms += kg as i32,
                CastOutcome::LostNet => severe += 1,
                CastOutcome::Empty => {}
            }
        }
        (kilograms, severe)
    }

    #[test]
    fn roll_of_one_is_empty() {
        let mut dice = ScriptedDice::new([1]);
        assert_eq!(ground(0).cast(&mut dice, 5), 0);
    }

    #[test]
    fn yield_scales_by_fifths() {
        let g = ground(3);
        let mut dice = ScriptedDice::new([4, 6, 6]);
        assert_eq!(g.cast(&mut dice, 0), 10);
        assert_eq!(g.cast(&mut dice, 0), 30);
        // 6 + 4 - 3 = 7, clamped to 5
        assert_eq!(g.cast(&mut dice, 4), 50);
    }

    #[test]
    fn failures_come_back_raw() {
        let mut dice = ScriptedDice::new([2, 3]);
        assert_eq!(ground(5).cast(&mut dice, 0), -3);
        assert_eq!(ground(5).resolve(&mut dice, 1), CastOutcome::Empty);
        assert_eq!(CastOutcome::from_score(-1), CastOutcome::Empty);
        assert_eq!(CastOutcome::from_score(-2), CastOutcome::LostNet);
        assert_eq!(CastOutcome::from_score(12), CastOutcome::Catch(12));
    }

    #[test]
    fn easy_ground_never_tears_a_net() {
        let (kilograms, severe) = trial(&ground(3), 21, 0);
        assert_eq!(severe, 0);
        assert!(kilograms > 0);
    }

    #[test]
    fn harder_ground_yields_less_and_tears_nets() {
        let (easy_kg, easy_severe) = trial(&ground(3), 22, 0);
        let (hard_kg, hard_severe) = trial(&ground(4), 22, 0);
        assert!(hard_kg < easy_kg);
        assert!(hard_severe >= 1);
        assert!(hard_severe > easy_severe);
    }

    #[test]
    fn skill_helps() {
        let (novice, _) = trial(&ground(4), 23, 0);
        let (expert, _) = trial(&ground(4), 23, 2);
        assert!(expert > novice);
    }
}
