// Map loading from a sequence of section-tagged records.
//
// A map description is a list of `MapRecord`s that must arrive in section
// order: one header, one dimensions record, then positions, routes, fishing
// grounds and hazards, each group after the previous one. The loader is a
// small state machine over those sections.
//
// Nothing here aborts on bad data. A missing header or dimensions record
// stops reading (nothing after it can be trusted), while any other bad
// record is skipped; either way the problem is recorded as a `MapProblem`
// and loading returns whatever was built. `MapLoad::is_usable` tells the
// caller whether a game can be hosted on the result.
//
// Records are plain serde data, so the usual on-disk form is a JSON array:
//
//     [{"section": "header", "title": "Paraty"},
//      {"section": "dimensions", "width": 800, ...},
//      {"section": "position", "name": "Paraty", "home": true, ...}, ...]

use crate::error::MapProblem;
use crate::fishing::FishingGround;
use crate::hazard::Hazard;
use crate::market::Market;
use crate::types::{GeoCoord, HazardKind, PositionId};
use crate::world::{Harbor, MapDimensions, SeaMap};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum MapRecord {
    Header {
        title: String,
    },
    Dimensions {
        width: u32,
        height: u32,
        north: f64,
        south: f64,
        east: f64,
        west: f64,
        image: String,
    },
    Position {
        name: String,
        #[serde(default)]
        home: bool,
        #[serde(default)]
        harbor: bool,
        #[serde(default)]
        market: bool,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        description: String,
    },
    Route {
        from: String,
        to: String,
    },
    FishingGround {
        position: String,
        difficulty: i32,
        max_yield: u32,
    },
    Hazard {
        kind: String,
        position: String,
        probability: u8,
        difficulty: i32,
        #[serde(default)]
        description: String,
    },
}

impl MapRecord {
    fn section(&self) -> Section {
        match self {
            Self::Header { .. } => Section::Header,
            Self::Dimensions { .. } => Section::Dimensions,
            Self::Position { .. } => Section::Positions,
            Self::Route { .. } => Section::Routes,
            Self::FishingGround { .. } => Section::FishingGrounds,
            Self::Hazard { .. } => Section::Hazards,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Section {
    Start,
    Header,
    Dimensions,
    Positions,
    Routes,
    FishingGrounds,
    Hazards,
}

impl Section {
    fn label(self) -> &'static str {
        match self {
            Self::Start => "no",
            Self::Header => "header",
            Self::Dimensions => "dimensions",
            Self::Positions => "position",
            Self::Routes => "route",
            Self::FishingGrounds => "fishing ground",
            Self::Hazards => "hazard",
        }
    }
}

/// The outcome of loading a map: the map as far as it could be built, and
/// every problem met along the way.
#[derive(Clone, Debug)]
pub struct MapLoad {
    pub map: SeaMap,
    pub problems: Vec<MapProblem>,
}

impl MapLoad {
    /// The first reason this map cannot host a game, if any.
    pub fn home_problem(&self) -> Option<MapProblem> {
        home_problem(&self.map)
    }

    /// A map is playable iff its home harbor exists and has a market.
    pub fn is_usable(&self) -> bool {
        self.home_problem().is_none()
    }
}

/// Check the home harbor requirement on an already built map.
pub fn home_problem(map: &SeaMap) -> Option<MapProblem> {
    let Some(home) = map.home() else {
        return Some(MapProblem::NoHomeHarbor);
    };
    let name = map.name_of(home).to_string();
    match map.harbor(home) {
        None => Some(MapProblem::HomeNotHarbor(name)),
        Some(harbor) if harbor.market.is_none() => Some(MapProblem::HomeWithoutMarket(name)),
        Some(_) => None,
    }
}

pub fn load_map_json(text: &str) -> MapLoad {
    match serde_json::from_str::<Vec<MapRecord>>(text) {
        Ok(records) => load_map(records),
        Err(e) => {
            log::warn!("map description is unreadable: {e}");
            MapLoad {
                map: SeaMap::default(),
                problems: vec![MapProblem::Unreadable(e.to_string()), MapProblem::NoHomeHarbor],
            }
        }
    }
}

pub fn load_map(records: impl IntoIterator<Item = MapRecord>) -> MapLoad {
    let mut map = SeaMap::default();
    let mut problems = Vec::new();
    let mut stage = Section::Start;
    let mut truncated = false;

    for record in records {
        let section = record.section();

        // The header and the dimensions open the file, in that order, once.
        if stage == Section::Start && section != Section::Header {
            problems.push(MapProblem::MissingHeader);
            truncated = true;
            break;
        }
        if stage == Section::Header && section != Section::Dimensions {
            problems.push(MapProblem::MissingDimensions);
            truncated = true;
            break;
        }
        if section < stage || (section == stage && section <= Section::Dimensions) {
            problems.push(MapProblem::OutOfOrder {
                found: section.label(),
                after: stage.label(),
            });
            continue;
        }
        stage = section;

        if let Err(problem) = apply(&mut map, record) {
            problems.push(problem);
        }
    }

    // Input that ended before the opening records were complete.
    if !truncated && stage == Section::Start {
        problems.push(MapProblem::MissingHeader);
    } else if !truncated && stage == Section::Header {
        problems.push(MapProblem::MissingDimensions);
    }
    if let Some(problem) = home_problem(&map) {
        problems.push(problem);
    }

    for problem in &problems {
        log::warn!("{problem}");
    }
    log::info!(
        "loaded map '{}': {} positions, {} harbors, {} problems",
        map.title,
        map.positions().len(),
        map.harbors().len(),
        problems.len()
    );
    MapLoad { map, problems }
}

fn apply(map: &mut SeaMap, record: MapRecord) -> Result<(), MapProblem> {
    match record {
        MapRecord::Header { title } => {
            map.title = title;
        }
        MapRecord::Dimensions {
            width,
            height,
            north,
            south,
            east,
            west,
            image,
        } => {
            map.dimensions = MapDimensions {
                width,
                height,
                north,
                south,
                east,
                west,
                image,
            };
            if map.dimensions.is_degenerate() {
                return Err(MapProblem::DegenerateBounds);
            }
        }
        MapRecord::Position {
            name,
            home,
            harbor,
            market,
            latitude,
            longitude,
            description,
        } => {
            let id = map.add_position(&name, &description, GeoCoord::new(longitude, latitude))?;
            if harbor {
                map.position_mut(id).harbor = Some(Harbor::new(market.then(Market::default)));
            }
            if home {
                if let Some(kept) = map.home() {
                    return Err(MapProblem::SecondHomeHarbor {
                        kept: map.name_of(kept).to_string(),
                        extra: name,
                    });
                }
                map.set_home(id);
            }
            if market && !harbor {
                return Err(MapProblem::MarketWithoutHarbor(name));
            }
        }
        MapRecord::Route { from, to } => {
            let origin = find(map, "route", &from)?;
            let destination = find(map, "route", &to)?;
            map.add_route(origin, destination);
        }
        MapRecord::FishingGround {
            position,
            difficulty,
            max_yield,
        } => {
            let id = find(map, "fishing ground", &position)?;
            map.position_mut(id).fishing_ground = Some(FishingGround {
                difficulty,
                max_yield,
            });
        }
        MapRecord::Hazard {
            kind,
            position,
            probability,
            difficulty,
            description,
        } => {
            let id = find(map, "hazard", &position)?;
            if probability > 6 {
                return Err(MapProblem::ProbabilityOutOfRange {
                    position,
                    probability,
                });
            }
            map.position_mut(id).hazard = Some(Hazard {
                kind: HazardKind::from_name(&kind),
                description,
                probability,
                difficulty,
            });
        }
    }
    Ok(())
}

fn find(map: &SeaMap, section: &'static str, name: &str) -> Result<PositionId, MapProblem> {
    map.find(name).ok_or_else(|| MapProblem::UnknownPosition {
        section,
        name: name.to_string(),
    })
}
