// Read-only snapshots handed to the presentation layer.
//
// These are plain serializable structs built from the colony on demand.
// They name everything by display name and never hold IDs, so a UI can
// keep them around without keeping the game borrowed.

use crate::colony::{Colony, Location};
use crate::market::PriceEntry;
use crate::types::{BoatClass, BoatId, FisherId, ScreenPoint};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedBoat {
    pub name: String,
    pub class: BoatClass,
}

/// Everything a fisher holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FisherInventory {
    pub name: String,
    pub balance: i64,
    pub rations: u32,
    pub nets: u32,
    pub navigation: u8,
    pub fishing: u8,
    pub boats: Vec<OwnedBoat>,
    /// Harbor the fisher is onshore at, or the boat they are aboard.
    pub whereabouts: String,
}

impl FisherInventory {
    pub fn of(colony: &Colony, id: FisherId) -> Option<Self> {
        let fisher = colony.fisher(id)?;
        let boats = fisher
            .boats()
            .iter()
            .filter_map(|&b| colony.boat(b))
            .map(|b| OwnedBoat {
                name: b.name.clone(),
                class: b.class,
            })
            .collect();
        let whereabouts = match colony.location(id) {
            Some(Location::Onshore(harbor)) => format!("ashore at {}", colony.map().name_of(harbor)),
            Some(Location::Aboard(boat)) => format!("aboard {}", colony.boat_name(boat)),
            None => "nowhere".to_string(),
        };
        Some(Self {
            name: fisher.name.clone(),
            balance: fisher.balance(),
            rations: fisher.rations(),
            nets: fisher.nets(),
            navigation: fisher.navigation(),
            fishing: fisher.fishing(),
            boats,
            whereabouts,
        })
    }
}

/// What changes about a boat from one journey to the next.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoatStatus {
    pub name: String,
    pub class: BoatClass,
    pub owner: Option<String>,
    pub position: String,
    pub coordinates: ScreenPoint,
    pub cargo: u32,
    pub free_capacity: u32,
    pub crew: Vec<String>,
    /// Nets carried by the crew.
    pub nets: u32,
    pub delay_days: u32,
    pub hull: i32,
    pub damage: i32,
}

impl BoatStatus {
    pub fn of(colony: &Colony, id: BoatId) -> Option<Self> {
        let boat = colony.boat(id)?;
        let position = boat.position?;
        Some(Self {
            name: boat.name.clone(),
            class: boat.class,
            owner: colony
                .owner_of(id)
                .map(|f| colony.fisher_name(f).to_string()),
            position: colony.map().name_of(position).to_string(),
            coordinates: colony.map().to_screen(position),
            cargo: boat.cargo(),
            free_capacity: boat.free_capacity(),
            crew: boat
                .crew()
                .iter()
                .map(|&f| colony.fisher_name(f).to_string())
                .collect(),
            nets: colony.crew_nets(id),
            delay_days: boat.delay_days(),
            hull: boat.hull,
            damage: boat.damage,
        })
    }
}

/// Today's prices at one market.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    pub harbor: String,
    pub entries: Vec<PriceEntry>,
}

/// A boat in port with room aboard, and who could board it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoatOpening {
    pub boat: String,
    pub vacancies: usize,
    pub candidates: Vec<String>,
}

/// The journeys a boat may choose between today.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyOptions {
    pub boat: String,
    pub journeys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boat::Boat;
    use crate::config::GameConfig;
    use crate::market::Market;
    use crate::types::GeoCoord;
    use crate::world::{Harbor, MapDimensions, SeaMap};

    fn colony() -> Colony {
        let mut map = SeaMap::new(
            "Cove",
            MapDimensions {
                width: 200,
                height: 100,
                north: 1.0,
                south: 0.0,
                east: 1.0,
                west: 0.0,
                image: "cove.png".to_string(),
            },
        );
        let quay = map.add_position("Quay", "", GeoCoord::new(0.5, 0.5)).unwrap();
        map.position_mut(quay).harbor = Some(Harbor::new(Some(Market::default())));
        map.set_home(quay);
        Colony::new(map).unwrap()
    }

    #[test]
    fn inventory_and_status_follow_the_colony() {
        let mut colony = colony();
        let ana = colony.add_fisher("Ana", 2000, 1).unwrap();
        colony.fisher_mut(ana).unwrap().add_nets(2);
        let config = GameConfig::default();
        let id = colony.allocate_boat_id();
        let spec = config.boat_spec(BoatClass::Basic).unwrap();
        colony.launch_boat(Boat::new(id, "Saga", BoatClass::Basic, spec), colony.home());
        colony.fisher_mut(ana).unwrap().add_boat(id);

        let inventory = FisherInventory::of(&colony, ana).unwrap();
        assert_eq!(inventory.balance, 2000);
        assert_eq!(inventory.nets, 2);
        assert_eq!(
            inventory.boats,
            vec![OwnedBoat {
                name: "Saga".to_string(),
                class: BoatClass::Basic
            }]
        );
        assert_eq!(inventory.whereabouts, "ashore at Quay");

        colony.board(id, ana);
        let status = BoatStatus::of(&colony, id).unwrap();
        assert_eq!(status.position, "Quay");
        assert_eq!(status.coordinates, ScreenPoint { x: 100, y: 50 });
        assert_eq!(status.crew, vec!["Ana".to_string()]);
        assert_eq!(status.nets, 2);
        assert_eq!(status.free_capacity, 150);
        assert_eq!(status.owner.as_deref(), Some("Ana"));
        assert_eq!(
            FisherInventory::of(&colony, ana).unwrap().whereabouts,
            "aboard Saga"
        );

        let json = serde_json::to_string(&status).unwrap();
        let restored: BoatStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, status);
    }

    #[test]
    fn unknown_entities_have_no_snapshot() {
        let colony = colony();
        assert!(FisherInventory::of(&colony, FisherId(9)).is_none());
        assert!(BoatStatus::of(&colony, BoatId(9)).is_none());
    }
}
