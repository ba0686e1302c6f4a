// Fisher entities — the player-controlled economic agents.
//
// A fisher holds money, daily rations, nets, two skill levels and a set of
// owned boats. Every mutation goes through a method that enforces the
// entity's invariants: rations never exceed `MAX_RATIONS`, a debit never
// drives the balance negative, nets never go below zero.
//
// Where a fisher *is* (onshore at a harbor, or aboard a boat) is not stored
// here. That membership lives in the harbor's onshore list and the boat's
// crew list, and `Colony` keeps the two exclusive.
//
// See also: `market.rs` for the operations that sell goods to a fisher,
// `colony.rs` for the registry and location bookkeeping.

use crate::types::{BoatId, FisherId, SkillKind};
use serde::{Deserialize, Serialize};

/// Rations spoil beyond this stock; any excess is lost on purchase.
pub const MAX_RATIONS: u32 = 12;

/// Skill levels are capped here regardless of what courses exist.
pub const MAX_SKILL: u8 = 5;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fisher {
    pub id: FisherId,
    pub name: String,
    balance: i64,
    rations: u32,
    nets: u32,
    navigation: u8,
    fishing: u8,
    boats: Vec<BoatId>,
}

impl Fisher {
    pub fn new(id: FisherId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            balance: 0,
            rations: 0,
            nets: 0,
            navigation: 0,
            fishing: 0,
            boats: Vec::new(),
        }
    }

    // -- Money --------------------------------------------------------------

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn credit(&mut self, amount: i64) {
        self.balance += amount;
    }

    /// Take `amount` from the balance. Succeeds iff the balance covers it;
    /// on failure nothing changes.
    pub fn debit(&mut self, amount: i64) -> bool {
        if self.balance >= amount {
            self.balance -= amount;
            true
        } else {
            false
        }
    }

    // -- Rations ------------------------------------------------------------

    pub fn rations(&self) -> u32 {
        self.rations
    }

    /// Add rations, discarding whatever would spoil above `MAX_RATIONS`.
    pub fn add_rations(&mut self, count: u32) {
        self.rations = self.rations.saturating_add(count).min(MAX_RATIONS);
    }

    /// Eat one ration. Returns `false` if the fisher had none left.
    pub fn consume_ration(&mut self) -> bool {
        if self.rations > 0 {
            self.rations -= 1;
            true
        } else {
            false
        }
    }

    // -- Nets ---------------------------------------------------------------

    pub fn nets(&self) -> u32 {
        self.nets
    }

    pub fn add_nets(&mut self, count: u32) {
        self.nets = self.nets.saturating_add(count);
    }

    /// Remove `count` nets. Returns `false` (and removes none) if the fisher
    /// holds fewer.
    pub fn remove_nets(&mut self, count: u32) -> bool {
        if self.nets >= count {
            self.nets -= count;
            true
        } else {
            false
        }
    }

    // -- Skills -------------------------------------------------------------

    pub fn skill(&self, skill: SkillKind) -> u8 {
        match skill {
            SkillKind::Navigation => self.navigation,
            SkillKind::Fishing => self.fishing,
        }
    }

    pub fn navigation(&self) -> u8 {
        self.navigation
    }

    pub fn fishing(&self) -> u8 {
        self.fishing
    }

    /// Raise a skill by one level, up to `MAX_SKILL`.
    pub fn raise_skill(&mut self, skill: SkillKind) {
        let level = match skill {
            SkillKind::Navigation => &mut self.navigation,
            SkillKind::Fishing => &mut self.fishing,
        };
        *level = (*level + 1).min(MAX_SKILL);
    }

    // -- Boats --------------------------------------------------------------

    pub fn boats(&self) -> &[BoatId] {
        &self.boats
    }

    pub fn owns(&self, boat: BoatId) -> bool {
        self.boats.contains(&boat)
    }

    pub fn add_boat(&mut self, boat: BoatId) {
        if !self.owns(boat) {
            self.boats.push(boat);
        }
    }

    /// Give up ownership of a boat. Returns `false` if it was not owned.
    pub fn remove_boat(&mut self, boat: BoatId) -> bool {
        let before = self.boats.len();
        self.boats.retain(|&b| b != boat);
        self.boats.len() != before
    }
}
