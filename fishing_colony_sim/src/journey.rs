// Journey execution: what every crewed boat does during one day.
//
// Each crewed boat gets at most one `Journey` per day: sail along a route,
// fish where it is, or wait out a wind delay. Journeys are collected in a
// `JourneyQueue` and drained by `execute_all`, which applies their dice
// driven effects to the colony and narrates them as `GameEventKind`s.
//
// The queue is a stack: the most recently queued journey runs first. The
// order matters because boats share the dice, so replaying the same choices
// in the same order replays the same day. Queuing a second journey for a
// boat replaces its first one (and moves it to the top of the stack).
//
// Per journey, in order:
//
// 1. Sail: a hazard at the departure position is checked against the
//    crew's summed navigation. Wind only delays (the boat stays put);
//    anything else halves the cargo on a light failure and sinks the boat
//    on a severe one. A surviving boat leaves the departure harbor's docked
//    list, and moves to the destination unless delayed.
// 2. Fish: up to `max_net_casts` casts (never more than the crew's nets),
//    each landing fish, coming up empty, or tearing the net of the least
//    skilled crew member.
// 3. Wait out delay: one day less to wait; at zero the boat arrives where
//    it is.
//
// A boat that arrived or fished emits a coordinate directive for the map
// view. A boat that ends its journey at a harbor (by arriving, or by
// fishing at a harbor position) sells its catch if there is a market,
// splits the proceeds evenly among the crew, puts them ashore and docks.
//
// Nothing in here fails: a journey for a boat that no longer exists, or a
// request to fish where there is no ground, is logged and skipped.
//
// **Critical constraint: determinism.** All randomness flows through the
// `Dice` passed in, and entries are processed in a fixed order.

use crate::colony::Colony;
use crate::config::GameConfig;
use crate::dice::Dice;
use crate::event::{CoordinateDirective, GameEventKind};
use crate::fishing::CastOutcome;
use crate::hazard::HazardOutcome;
use crate::types::{BoatId, PositionId, SkillKind};
use crate::world::SeaMap;
use serde::{Deserialize, Serialize};

const SAIL_PREFIX: &str = "sail to ";
const FISH_LABEL: &str = "fish";
const WAIT_LABEL: &str = "wait out delay";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Journey {
    SailTo(PositionId),
    Fish,
    WaitOutDelay,
}

impl Journey {
    /// The label offered to the presentation layer, e.g. `sail to Paraty`.
    pub fn label(&self, map: &SeaMap) -> String {
        match self {
            Self::SailTo(to) => format!("{SAIL_PREFIX}{}", map.name_of(*to)),
            Self::Fish => FISH_LABEL.to_string(),
            Self::WaitOutDelay => WAIT_LABEL.to_string(),
        }
    }

    /// Read a label back. `None` for anything unrecognized, including a
    /// destination the map does not know.
    pub fn parse(label: &str, map: &SeaMap) -> Option<Self> {
        let label = label.trim();
        if label == FISH_LABEL {
            Some(Self::Fish)
        } else if label == WAIT_LABEL {
            Some(Self::WaitOutDelay)
        } else {
            let destination = label.strip_prefix(SAIL_PREFIX)?.trim();
            map.find(destination).map(Self::SailTo)
        }
    }
}

/// The journeys open to a boat that is free to choose: fishing first if
/// there is a ground here, then every route out.
pub fn journey_options(colony: &Colony, boat: BoatId) -> Vec<Journey> {
    let Some(position) = colony.boat(boat).and_then(|b| b.position) else {
        return Vec::new();
    };
    let here = colony.map().position(position);
    let mut options = Vec::new();
    if here.fishing_ground.is_some() {
        options.push(Journey::Fish);
    }
    options.extend(here.routes.iter().map(|&to| Journey::SailTo(to)));
    options
}

/// Pending journeys, at most one per boat, drained last-in first-out.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JourneyQueue {
    entries: Vec<(BoatId, Journey)>,
}

impl JourneyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a journey, replacing any journey already queued for the boat.
    pub fn push(&mut self, boat: BoatId, journey: Journey) {
        self.entries.retain(|(b, _)| *b != boat);
        self.entries.push((boat, journey));
    }

    pub fn pop(&mut self) -> Option<(BoatId, Journey)> {
        self.entries.pop()
    }

    pub fn get(&self, boat: BoatId) -> Option<Journey> {
        self.entries
            .iter()
            .find(|(b, _)| *b == boat)
            .map(|(_, j)| *j)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Run every queued journey, then report everyone's remaining rations.
pub fn execute_all(
    colony: &mut Colony,
    queue: &mut JourneyQueue,
    dice: &mut impl Dice,
    config: &GameConfig,
) -> Vec<GameEventKind> {
    let mut out = Vec::new();
    while let Some((boat, journey)) = queue.pop() {
        execute(colony, boat, journey, dice, config, &mut out);
    }
    let stocks = colony
        .fishers()
        .map(|f| (f.name.clone(), f.rations()))
        .collect();
    out.push(GameEventKind::RationsRemaining { stocks });
    out
}

/// Run one boat's journey.
pub fn execute(
    colony: &mut Colony,
    boat: BoatId,
    journey: Journey,
    dice: &mut impl Dice,
    config: &GameConfig,
    out: &mut Vec<GameEventKind>,
) {
    let Some(position) = colony.boat(boat).and_then(|b| b.position) else {
        log::warn!("journey queued for {boat}, which is no longer afloat");
        return;
    };
    let name = colony.boat_name(boat).to_string();

    let (arrived, fished) = match journey {
        Journey::SailTo(to) => (sail(colony, boat, position, to, dice, config, out), false),
        Journey::Fish => (false, fish(colony, boat, position, dice, config, out)),
        Journey::WaitOutDelay => (wait(colony, boat, position, out), false),
    };

    let Some(here) = colony.boat(boat).and_then(|b| b.position) else {
        return;
    };
    if arrived || fished {
        out.push(GameEventKind::Coordinates(CoordinateDirective {
            boat: name,
            point: colony.map().to_screen(here),
        }));
    }
    let ends_in_port = fished && colony.map().harbor(here).is_some();
    if arrived || ends_in_port {
        arrive(colony, boat, here, out);
    }
}

/// Returns whether the boat arrived at `to`.
fn sail(
    colony: &mut Colony,
    boat: BoatId,
    from: PositionId,
    to: PositionId,
    dice: &mut impl Dice,
    config: &GameConfig,
    out: &mut Vec<GameEventKind>,
) -> bool {
    let name = colony.boat_name(boat).to_string();
    let from_name = colony.map().name_of(from).to_string();
    let to_name = colony.map().name_of(to).to_string();
    out.push(GameEventKind::Sailing {
        boat: name.clone(),
        from: from_name.clone(),
        to: to_name.clone(),
    });

    let mut delay_days = 0;
    if let Some(hazard) = colony.map().position(from).hazard.clone() {
        let skill = colony.crew_skill(boat, SkillKind::Navigation);
        let (hull, damage) = colony.boat(boat).map_or((0, 0), |b| (b.hull, b.damage));
        match hazard.resolve(dice, skill, hull, damage) {
            HazardOutcome::Safe => {}
            HazardOutcome::Light => {
                out.push(GameEventKind::HazardStruck {
                    description: hazard.description.clone(),
                });
                if hazard.kind.is_wind() {
                    delay_days = config.wind_delay_light_days;
                } else {
                    out.push(GameEventKind::CargoLost { boat: name.clone() });
                    if let Some(b) = colony.boat_mut(boat) {
                        b.halve_cargo();
                    }
                }
            }
            HazardOutcome::Severe => {
                out.push(GameEventKind::HazardStruck {
                    description: hazard.description.clone(),
                });
                if hazard.kind.is_wind() {
                    delay_days = config.wind_delay_severe_days;
                } else {
                    shipwreck(colony, boat, &from_name, out);
                    return false;
                }
            }
        }
    }

    colony.undock(boat);
    if delay_days > 0 {
        out.push(GameEventKind::WindDelay {
            boat: name,
            days: delay_days,
            destination: to_name,
        });
        if let Some(b) = colony.boat_mut(boat) {
            b.delay(delay_days);
        }
        return false;
    }
    colony.set_position(boat, to);
    true
}

fn shipwreck(colony: &mut Colony, boat: BoatId, near: &str, out: &mut Vec<GameEventKind>) {
    out.push(GameEventKind::Shipwreck {
        boat: colony.boat_name(boat).to_string(),
        position: near.to_string(),
    });
    let home = colony.home_name().to_string();
    for fisher in colony.crew_of(boat) {
        colony.return_home(fisher);
        out.push(GameEventKind::CrewRescued {
            fisher: colony.fisher_name(fisher).to_string(),
            harbor: home.clone(),
        });
    }
    if let Some(wreck) = colony.destroy_boat(boat) {
        log::info!("boat {} sank near {near}", wreck.name);
    }
}

/// Returns whether the boat actually fished.
fn fish(
    colony: &mut Colony,
    boat: BoatId,
    position: PositionId,
    dice: &mut impl Dice,
    config: &GameConfig,
    out: &mut Vec<GameEventKind>,
) -> bool {
    let here = colony.map().position(position);
    let Some(ground) = here.fishing_ground else {
        log::warn!("{boat} cannot fish at {}: no fishing ground", here.name);
        return false;
    };
    let place = here.name.clone();
    let name = colony.boat_name(boat).to_string();
    out.push(GameEventKind::Fishing {
        boat: name.clone(),
        position: place.clone(),
    });

    let skill = colony.crew_skill(boat, SkillKind::Fishing);
    let casts = colony.crew_nets(boat).min(config.max_net_casts);
    for _ in 0..casts {
        match ground.resolve(dice, skill) {
            CastOutcome::LostNet => {
                out.push(GameEventKind::NetLost {
                    boat: name.clone(),
                    position: place.clone(),
                });
                colony.tear_net(boat);
            }
            CastOutcome::Empty => out.push(GameEventKind::EmptyNet {
                boat: name.clone(),
                position: place.clone(),
            }),
            CastOutcome::Catch(kilograms) => {
                out.push(GameEventKind::Catch {
                    boat: name.clone(),
                    kilograms,
                    position: place.clone(),
                });
                if let Some(b) = colony.boat_mut(boat) {
                    b.load(kilograms);
                }
            }
        }
    }
    true
}

/// Returns whether the delay is over.
fn wait(
    colony: &mut Colony,
    boat: BoatId,
    position: PositionId,
    out: &mut Vec<GameEventKind>,
) -> bool {
    let Some(b) = colony.boat_mut(boat) else {
        return false;
    };
    b.wait_out_day();
    if b.is_delayed() {
        let name = b.name.clone();
        out.push(GameEventKind::StillDelayed {
            boat: name,
            position: colony.map().name_of(position).to_string(),
        });
        return false;
    }
    true
}

fn arrive(colony: &mut Colony, boat: BoatId, here: PositionId, out: &mut Vec<GameEventKind>) {
    let name = colony.boat_name(boat).to_string();
    out.push(GameEventKind::Arrived {
        boat: name.clone(),
        position: colony.map().name_of(here).to_string(),
    });
    if colony.map().harbor(here).is_none() {
        return;
    }

    // Copy first: putting the crew ashore empties the live list.
    let crew = colony.crew_of(boat);
    let mut share = 0;
    if let Some(value) = colony.sell_catch(boat, here) {
        out.push(GameEventKind::CatchSold { boat: name, value });
        let heads = crew.len() as i64;
        if heads > 0 {
            share = value / heads;
        }
    }
    for fisher in crew {
        if let Some(f) = colony.fisher_mut(fisher) {
            f.credit(share);
        }
        colony.disembark(boat, fisher, here);
    }
    colony.dock(boat);
}
