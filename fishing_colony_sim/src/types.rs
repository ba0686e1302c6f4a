// Core types shared across the simulation.
//
// Defines entity identifiers (compact sequential integers, one newtype per
// registry), geographic and screen coordinates, and the small enums that
// classify boats, skills and hazards. All types derive `Serialize` and
// `Deserialize` so snapshots and configs can cross the presentation
// boundary as JSON.
//
// Relationships between entities are expressed as IDs into the registries
// owned by `Colony` (fishers, boats) and `SeaMap` (positions), never as
// embedded references. Names are the identities the presentation layer sees;
// IDs are what the simulation stores.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Entity IDs — compact sequential integers
// ---------------------------------------------------------------------------

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Position of this entity in its registry's allocation order.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

entity_id!(/// Unique identifier for a fisher.
FisherId);
entity_id!(/// Unique identifier for a boat. Never reused, even after a shipwreck.
BoatId);
entity_id!(/// Index of a position in the `SeaMap`.
PositionId);

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A geographic coordinate in degrees, relative to the Equator and the
/// Greenwich meridian.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoCoord {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// A point on the map image, in pixels from the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Simulation enums
// ---------------------------------------------------------------------------

/// Boat models sold by the shipyard. Capacities and prices live in the
/// config's boat catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BoatClass {
    /// One crew member, small hold, thin hull.
    Basic,
    /// Two crew members, large hold, reinforced hull.
    Reinforced,
}

impl fmt::Display for BoatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Reinforced => write!(f, "reinforced"),
        }
    }
}

/// The two trainable skills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillKind {
    /// Helps a crew overcome navigational hazards.
    Navigation,
    /// Improves the yield of every net cast.
    Fishing,
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigation => write!(f, "navigation"),
            Self::Fishing => write!(f, "fishing"),
        }
    }
}

/// Kind of navigational hazard. Wind only ever delays a boat; every other
/// kind damages cargo or sinks it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HazardKind {
    Wind,
    Storm,
    /// Any other named danger (reefs, currents, fog banks...).
    Other(String),
}

impl HazardKind {
    /// Classify a hazard name from a map description. Matching is
    /// case-insensitive; unknown names are kept verbatim.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.to_lowercase().as_str() {
            "wind" | "gale" => Self::Wind,
            "storm" => Self::Storm,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn is_wind(&self) -> bool {
        matches!(self, Self::Wind)
    }
}

impl From<String> for HazardKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<HazardKind> for String {
    fn from(kind: HazardKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wind => write!(f, "wind"),
            Self::Storm => write!(f, "storm"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_allocation() {
        assert!(BoatId(1) < BoatId(2));
        assert_eq!(FisherId(3).index(), 3);
        assert_eq!(PositionId(0).to_string(), "PositionId(0)");
    }

    #[test]
    fn hazard_kind_from_name() {
        assert_eq!(HazardKind::from_name("Wind"), HazardKind::Wind);
        assert_eq!(HazardKind::from_name(" gale "), HazardKind::Wind);
        assert_eq!(HazardKind::from_name("storm"), HazardKind::Storm);
        assert_eq!(
            HazardKind::from_name("reef"),
            HazardKind::Other("reef".to_string())
        );
        assert!(HazardKind::Wind.is_wind());
        assert!(!HazardKind::Storm.is_wind());
    }

    #[test]
    fn hazard_kind_serializes_as_plain_name() {
        let json = serde_json::to_string(&HazardKind::Wind).unwrap();
        assert_eq!(json, "\"wind\"");
        let restored: HazardKind = serde_json::from_str("\"rip current\"").unwrap();
        assert_eq!(restored, HazardKind::Other("rip current".to_string()));
    }

    #[test]
    fn screen_point_display() {
        assert_eq!(ScreenPoint { x: 12, y: 40 }.to_string(), "(12,40)");
    }
}
