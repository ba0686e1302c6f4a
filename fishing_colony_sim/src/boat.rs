// Boat entities — vessels with a crew, a hold and a hull.
//
// A boat is built from a `BoatSpec` when a fisher buys it and destroyed when
// it is shipwrecked. Its crew list holds at most `crew_capacity` fishers and
// never the same fisher twice; its cargo never exceeds `cargo_capacity`.
//
// `position` is `None` only between construction and the first docking.
// `delay_days` counts days the boat still has to wait out after being held
// back by wind; a delayed boat is not offered journeys or new crew.
//
// See also: `journey.rs` which moves boats and loads their holds,
// `colony.rs` for the boat registry and harbor docking lists.

use crate::config::BoatSpec;
use crate::types::{BoatClass, BoatId, FisherId, PositionId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Boat {
    pub id: BoatId,
    pub name: String,
    pub class: BoatClass,
    pub crew_capacity: usize,
    pub cargo_capacity: u32,
    /// Resistance of the hull to hazards.
    pub hull: i32,
    /// Damage accumulated from earlier hazards; counts against the hull.
    pub damage: i32,
    pub position: Option<PositionId>,
    cargo: u32,
    delay_days: u32,
    crew: SmallVec<[FisherId; 2]>,
}

impl Boat {
    pub fn new(id: BoatId, name: impl Into<String>, class: BoatClass, spec: &BoatSpec) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            crew_capacity: spec.crew,
            cargo_capacity: spec.cargo_capacity,
            hull: spec.hull,
            damage: 0,
            position: None,
            cargo: 0,
            delay_days: 0,
            crew: SmallVec::new(),
        }
    }

    // -- Cargo --------------------------------------------------------------

    /// Kilograms of fish in the hold.
    pub fn cargo(&self) -> u32 {
        self.cargo
    }

    /// Load fish into the hold. Whatever does not fit is thrown back.
    pub fn load(&mut self, kilograms: u32) {
        self.cargo = self.cargo.saturating_add(kilograms).min(self.cargo_capacity);
    }

    /// Empty the hold, returning everything that was in it.
    pub fn unload(&mut self) -> u32 {
        std::mem::take(&mut self.cargo)
    }

    /// Lose half the hold (rounded down what remains) to rough water.
    pub fn halve_cargo(&mut self) {
        self.cargo /= 2;
    }

    pub fn free_capacity(&self) -> u32 {
        self.cargo_capacity - self.cargo
    }

    // -- Crew ---------------------------------------------------------------

    pub fn crew(&self) -> &[FisherId] {
        &self.crew
    }

    pub fn has_crew(&self) -> bool {
        !self.crew.is_empty()
    }

    pub fn vacancies(&self) -> usize {
        self.crew_capacity.saturating_sub(self.crew.len())
    }

    pub fn is_aboard(&self, fisher: FisherId) -> bool {
        self.crew.contains(&fisher)
    }

    /// Take a fisher aboard. Fails if the boat is full or the fisher is
    /// already aboard.
    pub fn board(&mut self, fisher: FisherId) -> bool {
        if self.vacancies() == 0 || self.is_aboard(fisher) {
            return false;
        }
        self.crew.push(fisher);
        true
    }

    /// Put a fisher ashore. Returns `false` if the fisher was not aboard.
    pub fn disembark(&mut self, fisher: FisherId) -> bool {
        match self.crew.iter().position(|&f| f == fisher) {
            Some(idx) => {
                self.crew.remove(idx);
                true
            }
            None => false,
        }
    }

    // -- Delay --------------------------------------------------------------

    pub fn delay_days(&self) -> u32 {
        self.delay_days
    }

    pub fn is_delayed(&self) -> bool {
        self.delay_days > 0
    }

    pub fn delay(&mut self, days: u32) {
        self.delay_days += days;
    }

    /// Wait out one day of delay. Returns `false` if there was none.
    pub fn wait_out_day(&mut self) -> bool {
        if self.delay_days > 0 {
            self.delay_days -= 1;
            true
        } else {
            false
        }
    }

    /// Forget any pending delay (a towed boat arrives immediately).
    pub fn clear_delay(&mut self) {
        self.delay_days = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn boat(class: BoatClass, name: &str) -> Boat {
        let config = GameConfig::default();
        let spec = config.boat_spec(class).unwrap();
        Boat::new(BoatId(0), name, class, spec)
    }

    #[test]
    fn new_boat_takes_spec() {
        let saga = boat(BoatClass::Basic, "Saga");
        assert_eq!(saga.name, "Saga");
        assert_eq!(saga.class, BoatClass::Basic);
        assert!(saga.position.is_none());
        assert_eq!(saga.vacancies(), 1);
        assert_eq!(saga.free_capacity(), 150);
        assert_eq!((saga.hull, saga.damage), (1, 0));
        assert!(!saga.is_delayed());

        let fortuna = boat(BoatClass::Reinforced, "Fortuna");
        assert_eq!(fortuna.vacancies(), 2);
        assert_eq!(fortuna.free_capacity(), 400);
        assert_eq!(fortuna.hull, 3);
    }

    #[test]
    fn load_is_clamped_and_unload_empties() {
        let mut saga = boat(BoatClass::Basic, "Saga");
        saga.load(90);
        saga.load(30);
        assert_eq!(saga.free_capacity(), 30);
        assert_eq!(saga.unload(), 120);
        assert_eq!(saga.cargo(), 0);

        saga.load(100);
        saga.load(100);
        assert_eq!(saga.cargo(), 150);
        assert_eq!(saga.free_capacity(), 0);
    }

    #[test]
    fn halving_rounds_down() {
        let mut saga = boat(BoatClass::Basic, "Saga");
        saga.load(75);
        saga.halve_cargo();
        assert_eq!(saga.cargo(), 37);
    }

    #[test]
    fn crew_respects_capacity_and_uniqueness() {
        let mut fortuna = boat(BoatClass::Reinforced, "Fortuna");
        assert!(fortuna.board(FisherId(1)));
        assert!(!fortuna.board(FisherId(1)));
        assert!(fortuna.board(FisherId(2)));
        assert!(!fortuna.board(FisherId(3)));
        assert_eq!(fortuna.crew(), &[FisherId(1), FisherId(2)]);

        assert!(fortuna.disembark(FisherId(1)));
        assert!(!fortuna.disembark(FisherId(1)));
        assert_eq!(fortuna.vacancies(), 1);
    }

    #[test]
    fn delay_counts_down() {
        let mut saga = boat(BoatClass::Basic, "Saga");
        assert!(!saga.wait_out_day());
        saga.delay(2);
        assert!(saga.is_delayed());
        assert!(saga.wait_out_day());
        assert!(saga.is_delayed());
        assert!(saga.wait_out_day());
        assert!(!saga.is_delayed());
        saga.delay(3);
        saga.clear_delay();
        assert_eq!(saga.delay_days(), 0);
    }
}
