// Dice — the injectable source of every random outcome in the game.
//
// The hazard check, the net cast and the daily market prices all throw
// six-sided dice. They take a `&mut impl Dice` instead of reaching for a
// global generator, so tests can replay exact rolls with `ScriptedDice` and
// a live game can run on a seeded `GameRng`.
//
// See also: `hazard.rs`, `fishing.rs`, `market.rs` for the consumers,
// `game.rs` where the `Game` owns one `Dice` value.

use crate::prng::GameRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A source of six-sided die rolls.
pub trait Dice {
    /// Throw one fair six-sided die, returning a value in `1..=6`.
    fn d6(&mut self) -> i32;
}

impl Dice for GameRng {
    fn d6(&mut self) -> i32 {
        self.roll(6) as i32
    }
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn d6(&mut self) -> i32 {
        (**self).d6()
    }
}

/// Replays a fixed list of rolls, then falls back to a seeded generator.
///
/// Scripted values are clamped into `1..=6` so a script can never produce a
/// face a real die could not.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptedDice {
    script: VecDeque<i32>,
    fallback: GameRng,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self::with_fallback_seed(rolls, 0)
    }

    pub fn with_fallback_seed(rolls: impl IntoIterator<Item = i32>, seed: u64) -> Self {
        Self {
            script: rolls.into_iter().collect(),
            fallback: GameRng::new(seed),
        }
    }

    /// Queue more rolls after whatever is still pending.
    pub fn push(&mut self, rolls: impl IntoIterator<Item = i32>) {
        self.script.extend(rolls);
    }

    /// Number of scripted rolls not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Dice for ScriptedDice {
    fn d6(&mut self) -> i32 {
        match self.script.pop_front() {
            Some(roll) => roll.clamp(1, 6),
            None => self.fallback.d6(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_rolls_come_out_in_order() {
        let mut dice = ScriptedDice::new([3, 1, 6]);
        assert_eq!(dice.d6(), 3);
        assert_eq!(dice.d6(), 1);
        assert_eq!(dice.remaining(), 1);
        assert_eq!(dice.d6(), 6);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn scripted_rolls_are_clamped_to_die_faces() {
        let mut dice = ScriptedDice::new([0, 9]);
        assert_eq!(dice.d6(), 1);
        assert_eq!(dice.d6(), 6);
    }

    #[test]
    fn exhausted_script_falls_back_deterministically() {
        let mut a = ScriptedDice::with_fallback_seed([2], 99);
        let mut b = ScriptedDice::with_fallback_seed([5], 99);
        a.d6();
        b.d6();
        for _ in 0..50 {
            let roll = a.d6();
            assert!((1..=6).contains(&roll));
            assert_eq!(roll, b.d6());
        }
    }

    #[test]
    fn borrowed_dice_advance_the_owner() {
        fn throw(mut dice: impl Dice) -> i32 {
            dice.d6()
        }
        let mut dice = ScriptedDice::new([4, 2]);
        assert_eq!(throw(&mut dice), 4);
        assert_eq!(dice.d6(), 2);
    }

    #[test]
    fn rng_dice_stay_on_the_die() {
        let mut rng = GameRng::new(5);
        for _ in 0..1000 {
            assert!((1..=6).contains(&rng.d6()));
        }
    }
}
