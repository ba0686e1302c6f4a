// Deterministic, portable pseudo-random number generator for the colony.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// Every die the simulation throws (daily market prices, navigational
// hazards, net casts) comes from one of these generators, so a game started
// from the same seed and fed the same decisions replays identically.
//
// The generator is hand-rolled rather than pulled from `rand` so that its
// output is pinned: a seed recorded in a bug report reproduces the same
// sequence of days on every platform and compiler version.
//
// **Critical constraint: determinism.** Every method on `GameRng` must produce
// identical output given the same prior state. Do not use floating-point
// arithmetic, stdlib randomness, or OS entropy in this module.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG.
///
/// The game owns exactly one `GameRng` (behind the `Dice` trait in the sim
/// crate), giving a single deterministic stream of rolls per session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRng {
    s: [u64; 4],
}

impl GameRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Uses SplitMix64 to expand the seed into the 256-bit internal state.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    fn next_u64(&mut self) -> u64 {
        let [a, b, c, d] = self.s;
        let out = a.wrapping_add(d).rotate_left(23).wrapping_add(a);
        let c = c ^ a;
        let d = d ^ b;
        self.s = [a ^ d, b ^ c, c ^ (b << 17), d.rotate_left(45)];
        out
    }

    /// Throw one fair die with `sides` faces, returning a value in
    /// `1..=sides`. A die with fewer than two faces always shows 1.
    ///
    /// Draws are rejection-sampled so every face is equally likely.
    pub fn roll(&mut self, sides: u32) -> u32 {
        if sides <= 1 {
            return 1;
        }
        let faces = u64::from(sides);
        // Largest multiple of `faces` that fits in a u64 draw.
        let zone = u64::MAX - (u64::MAX % faces + 1) % faces;
        loop {
            let draw = self.next_u64();
            if draw <= zone {
                return (draw % faces) as u32 + 1;
            }
        }
    }
}

/// SplitMix64, used only for seeding xoshiro256++ from a single `u64`.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
