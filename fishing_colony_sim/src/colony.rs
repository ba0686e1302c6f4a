// The colony: the sea map plus the registries of fishers and boats.
//
// `Colony` owns every mutable entity in a game. Fishers and boats live in
// `BTreeMap`s keyed by their IDs (deterministic iteration order), with name
// indexes alongside since names are what the presentation layer sends.
// Boat IDs are never reused, so an ID held after a shipwreck simply stops
// resolving.
//
// The location bookkeeping lives here because it spans entities: a fisher
// is onshore at exactly one harbor or aboard exactly one boat, and every
// method below that moves a fisher removes them from the old place before
// adding them to the new one. A boat sits at exactly one position and is on
// the docked list of that position's harbor iff it is in port.
//
// See also: `journey.rs` which moves boats, `game.rs` which drives the
// daily cycle over the colony.

use crate::boat::Boat;
use crate::error::{MapProblem, SetupError, TradeError};
use crate::fisher::Fisher;
use crate::map_load::home_problem;
use crate::market::Market;
use crate::types::{BoatId, FisherId, PositionId, SkillKind};
use crate::world::SeaMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a fisher currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Onshore(PositionId),
    Aboard(BoatId),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Colony {
    map: SeaMap,
    home: PositionId,
    fishers: BTreeMap<FisherId, Fisher>,
    boats: BTreeMap<BoatId, Boat>,
    fisher_names: BTreeMap<String, FisherId>,
    boat_names: BTreeMap<String, BoatId>,
    next_fisher_id: u32,
    next_boat_id: u32,
}

impl Colony {
    /// Settle a colony on a map. The map must have a home harbor with a
    /// market.
    pub fn new(map: SeaMap) -> Result<Self, SetupError> {
        if let Some(problem) = home_problem(&map) {
            return Err(SetupError::UnusableMap(problem));
        }
        let home = map
            .home()
            .ok_or(SetupError::UnusableMap(MapProblem::NoHomeHarbor))?;
        Ok(Self {
            map,
            home,
            fishers: BTreeMap::new(),
            boats: BTreeMap::new(),
            fisher_names: BTreeMap::new(),
            boat_names: BTreeMap::new(),
            next_fisher_id: 0,
            next_boat_id: 0,
        })
    }

    pub fn map(&self) -> &SeaMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut SeaMap {
        &mut self.map
    }

    pub fn home(&self) -> PositionId {
        self.home
    }

    pub fn home_name(&self) -> &str {
        self.map.name_of(self.home)
    }

    // -- Fishers ------------------------------------------------------------

    /// Enrol a new fisher onshore at the home harbor. Returns `None` if the
    /// name is already taken.
    pub fn add_fisher(&mut self, name: &str, balance: i64, rations: u32) -> Option<FisherId> {
        if self.fisher_names.contains_key(name) {
            return None;
        }
        let id = FisherId(self.next_fisher_id);
        self.next_fisher_id += 1;
        let mut fisher = Fisher::new(id, name);
        fisher.credit(balance);
        fisher.add_rations(rations);
        self.fishers.insert(id, fisher);
        self.fisher_names.insert(name.to_string(), id);
        if let Some(harbor) = self.map.harbor_mut(self.home) {
            harbor.return_fisher(id);
        }
        Some(id)
    }

    pub fn fisher_id(&self, name: &str) -> Option<FisherId> {
        self.fisher_names.get(name).copied()
    }

    pub fn fisher(&self, id: FisherId) -> Option<&Fisher> {
        self.fishers.get(&id)
    }

    pub fn fisher_mut(&mut self, id: FisherId) -> Option<&mut Fisher> {
        self.fishers.get_mut(&id)
    }

    pub fn fisher_by_name(&self, name: &str) -> Option<&Fisher> {
        self.fisher_id(name).and_then(|id| self.fisher(id))
    }

    /// All fishers in enrolment order.
    pub fn fishers(&self) -> impl Iterator<Item = &Fisher> {
        self.fishers.values()
    }

    pub fn fisher_ids(&self) -> Vec<FisherId> {
        self.fishers.keys().copied().collect()
    }

    pub fn fisher_name(&self, id: FisherId) -> &str {
        self.fishers.get(&id).map_or("", |f| f.name.as_str())
    }

    pub fn location(&self, fisher: FisherId) -> Option<Location> {
        if let Some(boat) = self.boats.values().find(|b| b.is_aboard(fisher)) {
            return Some(Location::Aboard(boat.id));
        }
        self.map.harbor_of_fisher(fisher).map(Location::Onshore)
    }

    // -- Boats --------------------------------------------------------------

    /// Reserve the next boat ID. IDs are never handed out twice.
    pub fn allocate_boat_id(&mut self) -> BoatId {
        let id = BoatId(self.next_boat_id);
        self.next_boat_id += 1;
        id
    }

    pub fn boat_name_taken(&self, name: &str) -> bool {
        self.boat_names.contains_key(name)
    }

    /// Put a newly built boat in the registry, docked at `harbor`.
    pub fn launch_boat(&mut self, mut boat: Boat, harbor: PositionId) {
        boat.position = Some(harbor);
        if let Some(h) = self.map.harbor_mut(harbor) {
            h.dock(boat.id);
        }
        self.boat_names.insert(boat.name.clone(), boat.id);
        self.boats.insert(boat.id, boat);
    }

    pub fn boat_id(&self, name: &str) -> Option<BoatId> {
        self.boat_names.get(name).copied()
    }

    pub fn boat(&self, id: BoatId) -> Option<&Boat> {
        self.boats.get(&id)
    }

    pub fn boat_mut(&mut self, id: BoatId) -> Option<&mut Boat> {
        self.boats.get_mut(&id)
    }

    pub fn boat_by_name(&self, name: &str) -> Option<&Boat> {
        self.boat_id(name).and_then(|id| self.boat(id))
    }

    /// All boats in launch order.
    pub fn boats(&self) -> impl Iterator<Item = &Boat> {
        self.boats.values()
    }

    pub fn boat_ids(&self) -> Vec<BoatId> {
        self.boats.keys().copied().collect()
    }

    pub fn boat_name(&self, id: BoatId) -> &str {
        self.boats.get(&id).map_or("", |b| b.name.as_str())
    }

    pub fn owner_of(&self, boat: BoatId) -> Option<FisherId> {
        self.fishers.values().find(|f| f.owns(boat)).map(|f| f.id)
    }

    /// Hand a boat from one fisher to another.
    pub fn transfer_boat(&mut self, boat: BoatId, from: FisherId, to: FisherId) -> bool {
        let removed = self
            .fishers
            .get_mut(&from)
            .is_some_and(|f| f.remove_boat(boat));
        if removed {
            if let Some(f) = self.fishers.get_mut(&to) {
                f.add_boat(boat);
            }
        }
        removed
    }

    /// The harbor at the boat's current position, if it is at one.
    pub fn boat_harbor(&self, boat: BoatId) -> Option<PositionId> {
        let position = self.boats.get(&boat)?.position?;
        self.map.harbor(position).map(|_| position)
    }

    /// Sum of one skill over everyone aboard.
    pub fn crew_skill(&self, boat: BoatId, skill: SkillKind) -> i32 {
        self.crew_of(boat)
            .iter()
            .filter_map(|id| self.fishers.get(id))
            .map(|f| i32::from(f.skill(skill)))
            .sum()
    }

    /// Nets carried by everyone aboard.
    pub fn crew_nets(&self, boat: BoatId) -> u32 {
        self.crew_of(boat)
            .iter()
            .filter_map(|id| self.fishers.get(id))
            .map(Fisher::nets)
            .sum()
    }

    /// A copy of the crew list, safe to hold while the crew is changed.
    pub fn crew_of(&self, boat: BoatId) -> Vec<FisherId> {
        self.boats
            .get(&boat)
            .map(|b| b.crew().to_vec())
            .unwrap_or_default()
    }

    /// Destroy one net belonging to the crew member with the lowest fishing
    /// skill who still has a net. Ties go to whoever boarded first.
    pub fn tear_net(&mut self, boat: BoatId) -> Option<FisherId> {
        let victim = self
            .crew_of(boat)
            .into_iter()
            .filter_map(|id| self.fishers.get(&id))
            .filter(|f| f.nets() > 0)
            .min_by_key(|f| f.fishing())
            .map(|f| f.id)?;
        self.fishers.get_mut(&victim)?.remove_nets(1);
        Some(victim)
    }

    // -- Movement -----------------------------------------------------------

    /// Move a fisher from the onshore list of the boat's harbor onto the
    /// boat. Fails if the boat is not docked, has no room, or the fisher is
    /// not onshore at that harbor.
    pub fn board(&mut self, boat: BoatId, fisher: FisherId) -> bool {
        let Some(harbor) = self.boat_harbor(boat) else {
            return false;
        };
        let docked = self
            .map
            .harbor(harbor)
            .is_some_and(|h| h.docked().contains(&boat));
        let has_room = self.boats.get(&boat).is_some_and(|b| b.vacancies() > 0);
        if !docked || !has_room {
            return false;
        }
        let ashore = self
            .map
            .harbor_mut(harbor)
            .is_some_and(|h| h.remove_fisher(fisher));
        if !ashore {
            return false;
        }
        self.boats
            .get_mut(&boat)
            .is_some_and(|b| b.board(fisher))
    }

    /// Take a fisher off a boat and put them ashore at `harbor`.
    pub fn disembark(&mut self, boat: BoatId, fisher: FisherId, harbor: PositionId) {
        if let Some(b) = self.boats.get_mut(&boat) {
            b.disembark(fisher);
        }
        if let Some(h) = self.map.harbor_mut(harbor) {
            h.return_fisher(fisher);
        }
    }

    /// Bring a fisher back to the home harbor from wherever they are.
    /// Returns the boat they were taken off, if any, and whether they were
    /// away from home at all.
    pub fn return_home(&mut self, fisher: FisherId) -> (Option<BoatId>, bool) {
        let home = self.home;
        let mut from_boat = None;
        for boat in self.boats.values_mut() {
            if boat.disembark(fisher) {
                from_boat = Some(boat.id);
                break;
            }
        }
        for id in self.map.harbors() {
            if id != home {
                if let Some(h) = self.map.harbor_mut(id) {
                    h.remove_fisher(fisher);
                }
            }
        }
        let moved = self
            .map
            .harbor_mut(home)
            .is_some_and(|h| h.return_fisher(fisher));
        (from_boat, moved)
    }

    /// Run a market deal between the market at `harbor` and a fisher.
    pub fn trade<T>(
        &mut self,
        harbor: PositionId,
        fisher: FisherId,
        deal: impl FnOnce(&Market, &mut Fisher) -> Result<T, TradeError>,
    ) -> Result<T, TradeError> {
        let Some(market) = self.map.market(harbor) else {
            return Err(TradeError::NoMarket(self.fisher_name(fisher).to_string()));
        };
        let Some(customer) = self.fishers.get_mut(&fisher) else {
            return Err(TradeError::UnknownFisher(fisher.to_string()));
        };
        deal(market, customer)
    }

    /// Sell a boat's whole catch at the market of `harbor`. Returns `None`
    /// (and leaves the hold alone) if there is no market there.
    pub fn sell_catch(&mut self, boat: BoatId, harbor: PositionId) -> Option<i64> {
        let market = self.map.market(harbor)?;
        let boat = self.boats.get_mut(&boat)?;
        Some(market.buy_fish(boat))
    }

    /// Take a boat off the docked list of its current harbor, if any.
    pub fn undock(&mut self, boat: BoatId) {
        if let Some(harbor) = self.boat_harbor(boat) {
            if let Some(h) = self.map.harbor_mut(harbor) {
                h.undock(boat);
            }
        }
    }

    /// Dock a boat at its current position, if that position has a harbor.
    pub fn dock(&mut self, boat: BoatId) {
        if let Some(harbor) = self.boat_harbor(boat) {
            if let Some(h) = self.map.harbor_mut(harbor) {
                h.dock(boat);
            }
        }
    }

    /// Move a boat to a position without docking it anywhere.
    pub fn set_position(&mut self, boat: BoatId, position: PositionId) {
        if let Some(b) = self.boats.get_mut(&boat) {
            b.position = Some(position);
        }
    }

    /// Bring a crewless boat back to the home harbor and dock it there.
    pub fn tow_home(&mut self, boat: BoatId) {
        self.undock(boat);
        if let Some(b) = self.boats.get_mut(&boat) {
            b.clear_delay();
            b.position = Some(self.home);
        }
        self.dock(boat);
    }

    /// Remove a boat from the game: off the registry, off its owner's list
    /// and off any docked list. The crew must already be ashore.
    pub fn destroy_boat(&mut self, boat: BoatId) -> Option<Boat> {
        self.undock(boat);
        if let Some(owner) = self.owner_of(boat) {
            if let Some(f) = self.fishers.get_mut(&owner) {
                f.remove_boat(boat);
            }
        }
        let removed = self.boats.remove(&boat)?;
        self.boat_names.remove(&removed.name);
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::types::{BoatClass, GeoCoord};
    use crate::world::{Harbor, MapDimensions};

    /// Home harbor with a market, an outer harbor without one, and open sea.
    fn bay() -> SeaMap {
        let mut map = SeaMap::new("Bay", MapDimensions::default());
        let home = map
            .add_position("Home", "", GeoCoord::new(0.0, 0.0))
            .unwrap();
        let outer = map
            .add_position("Outer", "", GeoCoord::new(1.0, 0.0))
            .unwrap();
        map.add_position("Sea", "", GeoCoord::new(2.0, 0.0))
            .unwrap();
        map.position_mut(home).harbor = Some(Harbor::new(Some(Market::default())));
        map.position_mut(outer).harbor = Some(Harbor::new(None));
        map.set_home(home);
        map
    }

    fn launch(colony: &mut Colony, owner: FisherId, class: BoatClass, name: &str) -> BoatId {
        let config = GameConfig::default();
        let id = colony.allocate_boat_id();
        let boat = Boat::new(id, name, class, config.boat_spec(class).unwrap());
        colony.fisher_mut(owner).unwrap().add_boat(id);
        let home = colony.home();
        colony.launch_boat(boat, home);
        id
    }

    #[test]
    fn map_without_home_is_refused() {
        let mut map = bay();
        let outer = map.find("Outer").unwrap();
        map.set_home(outer);
        assert_eq!(
            Colony::new(map).err(),
            Some(SetupError::UnusableMap(MapProblem::HomeWithoutMarket(
                "Outer".to_string()
            )))
        );
    }

    #[test]
    fn fishers_start_at_home() {
        let mut colony = Colony::new(bay()).unwrap();
        let ana = colony.add_fisher("Ana", 2000, 1).unwrap();
        assert!(colony.add_fisher("Ana", 5, 5).is_none());
        assert_eq!(colony.location(ana), Some(Location::Onshore(colony.home())));
        let fisher = colony.fisher_by_name("Ana").unwrap();
        assert_eq!((fisher.balance(), fisher.rations()), (2000, 1));
    }

    #[test]
    fn boarding_moves_fisher_off_the_quay() {
        let mut colony = Colony::new(bay()).unwrap();
        let ana = colony.add_fisher("Ana", 2000, 1).unwrap();
        let beto = colony.add_fisher("Beto", 2000, 1).unwrap();
        let saga = launch(&mut colony, ana, BoatClass::Basic, "Saga");

        assert!(colony.board(saga, ana));
        assert_eq!(colony.location(ana), Some(Location::Aboard(saga)));
        assert!(!colony.map().harbor(colony.home()).unwrap().has_fisher(ana));
        // Full.
        assert!(!colony.board(saga, beto));
        assert_eq!(colony.location(beto), Some(Location::Onshore(colony.home())));
    }

    #[test]
    fn boarding_needs_the_fisher_on_the_same_quay() {
        let mut colony = Colony::new(bay()).unwrap();
        let ana = colony.add_fisher("Ana", 2000, 1).unwrap();
        let saga = launch(&mut colony, ana, BoatClass::Basic, "Saga");
        let outer = colony.map().find("Outer").unwrap();
        colony.undock(saga);
        colony.set_position(saga, outer);
        colony.dock(saga);
        assert!(!colony.board(saga, ana));
        assert_eq!(colony.map().harbor(outer).unwrap().docked(), &[saga]);
        assert!(colony.map().harbor(colony.home()).unwrap().docked().is_empty());
    }

    #[test]
    fn return_home_from_a_boat() {
        let mut colony = Colony::new(bay()).unwrap();
        let ana = colony.add_fisher("Ana", 2000, 1).unwrap();
        let saga = launch(&mut colony, ana, BoatClass::Basic, "Saga");
        colony.board(saga, ana);
        assert_eq!(colony.return_home(ana), (Some(saga), true));
        assert_eq!(colony.location(ana), Some(Location::Onshore(colony.home())));
        assert_eq!(colony.return_home(ana), (None, false));
    }

    #[test]
    fn return_home_from_another_harbor() {
        let mut colony = Colony::new(bay()).unwrap();
        let ana = colony.add_fisher("Ana", 2000, 1).unwrap();
        let outer = colony.map().find("Outer").unwrap();
        let home = colony.home();
        colony.map_mut().harbor_mut(home).unwrap().remove_fisher(ana);
        colony.map_mut().harbor_mut(outer).unwrap().return_fisher(ana);
        assert_eq!(colony.return_home(ana), (None, true));
        assert!(colony.map().harbor(outer).unwrap().onshore().is_empty());
    }

    #[test]
    fn towing_docks_at_home_and_clears_delay() {
        let mut colony = Colony::new(bay()).unwrap();
        let ana = colony.add_fisher("Ana", 2000, 1).unwrap();
        let saga = launch(&mut colony, ana, BoatClass::Basic, "Saga");
        let sea = colony.map().find("Sea").unwrap();
        colony.undock(saga);
        colony.set_position(saga, sea);
        colony.boat_mut(saga).unwrap().delay(2);
        colony.tow_home(saga);
        let boat = colony.boat(saga).unwrap();
        assert_eq!(boat.position, Some(colony.home()));
        assert!(!boat.is_delayed());
        assert_eq!(colony.map().harbor(colony.home()).unwrap().docked(), &[saga]);
    }

    #[test]
    fn destroyed_boat_leaves_every_list() {
        let mut colony = Colony::new(bay()).unwrap();
        let ana = colony.add_fisher("Ana", 2000, 1).unwrap();
        let saga = launch(&mut colony, ana, BoatClass::Basic, "Saga");
        assert_eq!(colony.owner_of(saga), Some(ana));
        let wreck = colony.destroy_boat(saga).unwrap();
        assert_eq!(wreck.name, "Saga");
        assert!(colony.boat(saga).is_none());
        assert!(!colony.boat_name_taken("Saga"));
        assert!(colony.fisher(ana).unwrap().boats().is_empty());
        assert!(colony.map().harbor(colony.home()).unwrap().docked().is_empty());
        // IDs are not recycled.
        assert_ne!(colony.allocate_boat_id(), saga);
    }

    #[test]
    fn least_skilled_fisher_loses_the_net() {
        let mut colony = Colony::new(bay()).unwrap();
        let ana = colony.add_fisher("Ana", 2000, 1).unwrap();
        let beto = colony.add_fisher("Beto", 2000, 1).unwrap();
        let fortuna = launch(&mut colony, ana, BoatClass::Reinforced, "Fortuna");
        colony.fisher_mut(ana).unwrap().add_nets(1);
        colony.fisher_mut(ana).unwrap().raise_skill(SkillKind::Fishing);
        colony.fisher_mut(beto).unwrap().add_nets(1);
        colony.board(fortuna, ana);
        colony.board(fortuna, beto);

        assert_eq!(colony.crew_nets(fortuna), 2);
        assert_eq!(colony.crew_skill(fortuna, SkillKind::Fishing), 1);
        assert_eq!(colony.tear_net(fortuna), Some(beto));
        // Beto has none left, so Ana's goes next.
        assert_eq!(colony.tear_net(fortuna), Some(ana));
        assert_eq!(colony.tear_net(fortuna), None);
    }

    #[test]
    fn boats_change_hands() {
        let mut colony = Colony::new(bay()).unwrap();
        let ana = colony.add_fisher("Ana", 2000, 1).unwrap();
        let beto = colony.add_fisher("Beto", 2000, 1).unwrap();
        let saga = launch(&mut colony, ana, BoatClass::Basic, "Saga");
        assert!(!colony.transfer_boat(saga, beto, ana));
        assert!(colony.transfer_boat(saga, ana, beto));
        assert_eq!(colony.owner_of(saga), Some(beto));
    }
}
