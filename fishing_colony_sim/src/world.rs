// The sea map: named positions joined by directed routes.
//
// `SeaMap` is an arena of `Position`s indexed by `PositionId`, with a name
// index on the side. A position may carry a hazard (checked when a boat
// leaves it), a fishing ground, and a harbor. A harbor keeps the lists of
// fishers onshore and boats docked there, and may own a `Market`.
//
// Routes are directed: declaring A -> B does not allow B -> A. Exactly one
// harbor is the home harbor, where fishers start and where the rescued end
// up; a playable map requires it to have a market (see `map_load.rs`).
//
// The map also carries the dimensions of its background image, used to
// project geographic coordinates into screen pixels for the presentation
// layer.

use crate::error::MapProblem;
use crate::fishing::FishingGround;
use crate::hazard::Hazard;
use crate::market::Market;
use crate::types::{BoatId, FisherId, GeoCoord, PositionId, ScreenPoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Background image and the geographic box it covers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub image: String,
}

impl MapDimensions {
    pub fn is_degenerate(&self) -> bool {
        self.east == self.west || self.north == self.south
    }
}

/// Where fishers go ashore and boats dock.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Harbor {
    onshore: Vec<FisherId>,
    docked: Vec<BoatId>,
    pub market: Option<Market>,
}

impl Harbor {
    pub fn new(market: Option<Market>) -> Self {
        Self {
            onshore: Vec::new(),
            docked: Vec::new(),
            market,
        }
    }

    pub fn onshore(&self) -> &[FisherId] {
        &self.onshore
    }

    pub fn has_fisher(&self, fisher: FisherId) -> bool {
        self.onshore.contains(&fisher)
    }

    /// Bring a fisher ashore here. Returns `false` if they already were.
    pub fn return_fisher(&mut self, fisher: FisherId) -> bool {
        if self.has_fisher(fisher) {
            return false;
        }
        self.onshore.push(fisher);
        true
    }

    /// Take a fisher off the onshore list. Returns `false` if absent.
    pub fn remove_fisher(&mut self, fisher: FisherId) -> bool {
        let before = self.onshore.len();
        self.onshore.retain(|&f| f != fisher);
        self.onshore.len() != before
    }

    pub fn docked(&self) -> &[BoatId] {
        &self.docked
    }

    pub fn dock(&mut self, boat: BoatId) {
        if !self.docked.contains(&boat) {
            self.docked.push(boat);
        }
    }

    pub fn undock(&mut self, boat: BoatId) -> bool {
        let before = self.docked.len();
        self.docked.retain(|&b| b != boat);
        self.docked.len() != before
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub name: String,
    pub description: String,
    pub coord: GeoCoord,
    /// Positions a boat may sail to from here.
    pub routes: Vec<PositionId>,
    pub hazard: Option<Hazard>,
    pub fishing_ground: Option<FishingGround>,
    pub harbor: Option<Harbor>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SeaMap {
    pub title: String,
    pub dimensions: MapDimensions,
    positions: Vec<Position>,
    by_name: BTreeMap<String, PositionId>,
    home: Option<PositionId>,
}

impl SeaMap {
    pub fn new(title: impl Into<String>, dimensions: MapDimensions) -> Self {
        Self {
            title: title.into(),
            dimensions,
            ..Self::default()
        }
    }

    /// Declare a new position. Names are unique within a map.
    pub fn add_position(
        &mut self,
        name: &str,
        description: &str,
        coord: GeoCoord,
    ) -> Result<PositionId, MapProblem> {
        if self.by_name.contains_key(name) {
            return Err(MapProblem::DuplicatePosition(name.to_string()));
        }
        let id = PositionId(self.positions.len() as u32);
        self.positions.push(Position {
            id,
            name: name.to_string(),
            description: description.to_string(),
            coord,
            routes: Vec::new(),
            hazard: None,
            fishing_ground: None,
            harbor: None,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Add a directed route. Declaring the same route twice is harmless.
    pub fn add_route(&mut self, from: PositionId, to: PositionId) {
        let routes = &mut self.positions[from.index()].routes;
        if !routes.contains(&to) {
            routes.push(to);
        }
    }

    pub fn set_home(&mut self, home: PositionId) {
        self.home = Some(home);
    }

    pub fn home(&self) -> Option<PositionId> {
        self.home
    }

    pub fn find(&self, name: &str) -> Option<PositionId> {
        self.by_name.get(name).copied()
    }

    pub fn position(&self, id: PositionId) -> &Position {
        &self.positions[id.index()]
    }

    pub fn position_mut(&mut self, id: PositionId) -> &mut Position {
        &mut self.positions[id.index()]
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn name_of(&self, id: PositionId) -> &str {
        &self.positions[id.index()].name
    }

    /// Every position with a harbor, in declaration order.
    pub fn harbors(&self) -> Vec<PositionId> {
        self.positions
            .iter()
            .filter(|p| p.harbor.is_some())
            .map(|p| p.id)
            .collect()
    }

    pub fn harbor(&self, id: PositionId) -> Option<&Harbor> {
        self.positions[id.index()].harbor.as_ref()
    }

    pub fn harbor_mut(&mut self, id: PositionId) -> Option<&mut Harbor> {
        self.positions[id.index()].harbor.as_mut()
    }

    /// The harbor where a fisher is onshore, if any.
    pub fn harbor_of_fisher(&self, fisher: FisherId) -> Option<PositionId> {
        self.positions
            .iter()
            .find(|p| p.harbor.as_ref().is_some_and(|h| h.has_fisher(fisher)))
            .map(|p| p.id)
    }

    pub fn market(&self, id: PositionId) -> Option<&Market> {
        self.harbor(id).and_then(|h| h.market.as_ref())
    }

    /// Project a position onto the background image. Maps whose bounds
    /// enclose no area put everything at the origin.
    pub fn to_screen(&self, id: PositionId) -> ScreenPoint {
        let dims = &self.dimensions;
        if dims.is_degenerate() {
            return ScreenPoint::default();
        }
        let coord = self.positions[id.index()].coord;
        let x = (coord.longitude - dims.west) / (dims.east - dims.west) * f64::from(dims.width);
        let y = (dims.north - coord.latitude) / (dims.north - dims.south) * f64::from(dims.height);
        ScreenPoint {
            x: x as i32,
            y: y as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bay() -> SeaMap {
        let mut map = SeaMap::new(
            "Bay",
            MapDimensions {
                width: 800,
                height: 600,
                north: -23.0,
                south: -23.6,
                east: -44.4,
                west: -45.2,
                image: "bay.png".to_string(),
            },
        );
        let port = map
            .add_position("Port", "The village quay.", GeoCoord::new(-44.8, -23.3))
            .unwrap();
        let reef = map
            .add_position("Reef", "Shallow rocks.", GeoCoord::new(-45.2, -23.0))
            .unwrap();
        map.add_route(port, reef);
        map.position_mut(port).harbor = Some(Harbor::new(Some(Market::default())));
        map.set_home(port);
        map
    }

    #[test]
    fn positions_are_found_by_name() {
        let map = bay();
        let port = map.find("Port").unwrap();
        assert_eq!(map.name_of(port), "Port");
        assert_eq!(map.home(), Some(port));
        assert!(map.find("Atlantis").is_none());
        assert_eq!(map.harbors(), vec![port]);
        assert!(map.market(port).is_some());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut map = bay();
        assert_eq!(
            map.add_position("Reef", "", GeoCoord::new(0.0, 0.0)),
            Err(MapProblem::DuplicatePosition("Reef".to_string()))
        );
    }

    #[test]
    fn routes_are_directed() {
        let mut map = bay();
        let port = map.find("Port").unwrap();
        let reef = map.find("Reef").unwrap();
        map.add_route(port, reef);
        assert_eq!(map.position(port).routes, vec![reef]);
        assert!(map.position(reef).routes.is_empty());
    }

    #[test]
    fn projection_maps_corners_and_centre() {
        let map = bay();
        let reef = map.find("Reef").unwrap();
        assert_eq!(map.to_screen(reef), ScreenPoint { x: 0, y: 0 });
        let port = map.find("Port").unwrap();
        let p = map.to_screen(port);
        assert!((399..=400).contains(&p.x), "{p}");
        assert!((299..=300).contains(&p.y), "{p}");
    }

    #[test]
    fn degenerate_bounds_project_to_origin() {
        let mut map = bay();
        map.dimensions.east = map.dimensions.west;
        let port = map.find("Port").unwrap();
        assert_eq!(map.to_screen(port), ScreenPoint::default());
    }

    #[test]
    fn harbor_membership() {
        let mut harbor = Harbor::new(None);
        assert!(harbor.return_fisher(FisherId(1)));
        assert!(!harbor.return_fisher(FisherId(1)));
        assert_eq!(harbor.onshore(), &[FisherId(1)]);
        assert!(harbor.remove_fisher(FisherId(1)));
        assert!(!harbor.remove_fisher(FisherId(1)));
        harbor.dock(BoatId(3));
        harbor.dock(BoatId(3));
        assert_eq!(harbor.docked(), &[BoatId(3)]);
        assert!(harbor.undock(BoatId(3)));
        assert!(!harbor.undock(BoatId(3)));
    }
}
