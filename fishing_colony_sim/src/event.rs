// Narrative events: the message stream the game hands to the presentation
// layer.
//
// Every observable outcome is a `GameEvent`, stamped with the day it
// happened on. Events name fishers, boats and places by their display names
// rather than IDs, since IDs mean nothing outside the sim, and `Display`
// renders each one as the line a journal widget would show.
//
// One event is meant for machines rather than people: a `Coordinates`
// event carries a `CoordinateDirective`, rendered as
// `#coord:boat=<name>;x=<x>;y=<y>`, so a map view can move a boat marker
// without asking the game for the boat's full state.
// `CoordinateDirective::parse` reads that line back.

use crate::market::PriceEntry;
use crate::types::{BoatClass, ScreenPoint, SkillKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of the machine-readable coordinate line.
pub const COORD_PREFIX: &str = "#coord:";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateDirective {
    pub boat: String,
    pub point: ScreenPoint,
}

impl CoordinateDirective {
    /// Whether a boat called `name` renders to a line `parse` can read
    /// back. Field separators and line breaks are out; so is a blank name.
    pub fn accepts_boat_name(name: &str) -> bool {
        !name.trim().is_empty() && !name.contains([';', '=', '\n', '\r'])
    }

    /// Parse a `#coord:boat=<name>;x=<x>;y=<y>` line. Returns `None` for
    /// any other text.
    pub fn parse(line: &str) -> Option<Self> {
        let body = line.trim().strip_prefix(COORD_PREFIX)?;
        let mut boat = None;
        let mut x = None;
        let mut y = None;
        for field in body.split(';') {
            let (key, value) = field.split_once('=')?;
            match key.trim() {
                "boat" => boat = Some(value.to_string()),
                "x" => x = value.trim().parse().ok(),
                "y" => y = value.trim().parse().ok(),
                _ => return None,
            }
        }
        Some(Self {
            boat: boat?,
            point: ScreenPoint { x: x?, y: y? },
        })
    }
}

impl fmt::Display for CoordinateDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{COORD_PREFIX}boat={};x={};y={}",
            self.boat, self.point.x, self.point.y
        )
    }
}

/// A narrative event emitted by the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub day: u32,
    pub kind: GameEventKind,
}

impl GameEvent {
    pub fn coordinates(&self) -> Option<&CoordinateDirective> {
        match &self.kind {
            GameEventKind::Coordinates(directive) => Some(directive),
            _ => None,
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventKind {
    // -- Setup and dawn -----------------------------------------------------
    FisherJoined { fisher: String, harbor: String },
    DayBegins,
    PriceTable { harbor: String, entries: Vec<PriceEntry> },
    /// Out of rations away from home; brought back.
    RationRescue { fisher: String, harbor: String },
    /// Out of rations at home; charged for one at the day's price.
    RationBoughtAtHome { fisher: String },
    RationUnaffordable { fisher: String, reason: String },
    BoatTowed { boat: String, harbor: String },

    // -- Market -------------------------------------------------------------
    BoatBought { fisher: String, boat: String, class: BoatClass, price: i64 },
    CourseTaken { fisher: String, skill: SkillKind, level: u8, price: i64 },
    RationsBought { fisher: String, count: u32, cost: i64 },
    NetsBought { fisher: String, count: u32, cost: i64 },
    PurchaseRefused { fisher: String, item: String, reason: String },

    // -- Boarding -----------------------------------------------------------
    Boarded { fisher: String, boat: String },
    BoatFull { boat: String },

    // -- Journeys -----------------------------------------------------------
    Sailing { boat: String, from: String, to: String },
    HazardStruck { description: String },
    WindDelay { boat: String, days: u32, destination: String },
    Shipwreck { boat: String, position: String },
    CrewRescued { fisher: String, harbor: String },
    CargoLost { boat: String },
    Fishing { boat: String, position: String },
    NetLost { boat: String, position: String },
    EmptyNet { boat: String, position: String },
    Catch { boat: String, kilograms: u32, position: String },
    StillDelayed { boat: String, position: String },
    Coordinates(CoordinateDirective),
    Arrived { boat: String, position: String },
    CatchSold { boat: String, value: i64 },
    RationsRemaining { stocks: Vec<(String, u32)> },

    // -- Payout -------------------------------------------------------------
    WagePaid { fisher: String, amount: i64, harbor: String },

    // -- Transfers between fishers -------------------------------------------
    TransferOpened { buyer: String, seller: String, contract: String },
    TransferRefused { reason: String },
    BoatHandedOver { boat: String, class: BoatClass },
    NetsHandedOver { count: u32 },
    MoneyHandedOver { amount: i64 },
    Payment { payer: String, payee: String, amount: i64, contract: String },
    ContractCancelled { payee: String, payer: String },
}

impl fmt::Display for GameEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FisherJoined { fisher, harbor } => {
                write!(f, "{fisher} joins the colony at {harbor}.")
            }
            Self::DayBegins => write!(f, "A new day begins in the village."),
            Self::PriceTable { harbor, entries } => {
                write!(f, "Prices at the {harbor} market:")?;
                for entry in entries {
                    write!(f, "\n{}: R${}", entry.item, entry.price)?;
                }
                Ok(())
            }
            Self::RationRescue { fisher, harbor } => {
                write!(f, "{fisher} ran out of rations and was rescued to {harbor}.")
            }
            Self::RationBoughtAtHome { fisher } => write!(
                f,
                "{fisher} ran out of rations and had to buy one at the day's price."
            ),
            Self::RationUnaffordable { fisher, reason } => {
                write!(f, "{fisher} could not buy a ration: {reason}.")
            }
            Self::BoatTowed { boat, harbor } => {
                write!(f, "Boat {boat} was left without crew and was towed to {harbor}.")
            }
            Self::BoatBought {
                fisher,
                boat,
                class,
                price,
            } => write!(f, "{fisher} bought the {class} boat {boat} for R${price}."),
            Self::CourseTaken {
                fisher,
                skill,
                level,
                price,
            } => write!(
                f,
                "{fisher} took a {skill} course for R${price} and is now at level {level}."
            ),
            Self::RationsBought {
                fisher,
                count,
                cost,
            } => write!(f, "{fisher} bought {count} rations for R${cost}."),
            Self::NetsBought {
                fisher,
                count,
                cost,
            } => write!(f, "{fisher} bought {count} nets for R${cost}."),
            Self::PurchaseRefused {
                fisher,
                item,
                reason,
            } => write!(f, "{fisher} could not buy {item}: {reason}."),
            Self::Boarded { fisher, boat } => write!(f, "{fisher} boards the boat {boat}."),
            Self::BoatFull { boat } => write!(f, "No more room aboard {boat}."),
            Self::Sailing { boat, from, to } => {
                write!(f, "Boat {boat} sails from {from} to {to}.")
            }
            Self::HazardStruck { description } => write!(f, "{description}"),
            Self::WindDelay {
                boat,
                days,
                destination,
            } => {
                let unit = if *days == 1 { "day" } else { "days" };
                write!(f, "Boat {boat} is {days} {unit} late reaching {destination}.")
            }
            Self::Shipwreck { boat, position } => {
                write!(f, "Boat {boat} was shipwrecked near {position}.")
            }
            Self::CrewRescued { fisher, harbor } => {
                write!(f, "{fisher} was rescued and is back at {harbor}.")
            }
            Self::CargoLost { boat } => write!(f, "Boat {boat} lost part of its cargo."),
            Self::Fishing { boat, position } => write!(f, "Boat {boat} is fishing at {position}."),
            Self::NetLost { boat, position } => write!(f, "Boat {boat} lost a net at {position}."),
            Self::EmptyNet { boat, position } => {
                write!(f, "A net from boat {boat} came back empty at {position}.")
            }
            Self::Catch {
                boat,
                kilograms,
                position,
            } => write!(f, "Boat {boat} caught {kilograms} kg of fish at {position}."),
            Self::StillDelayed { boat, position } => {
                write!(f, "Boat {boat} is still held up at {position}.")
            }
            Self::Coordinates(directive) => write!(f, "{directive}"),
            Self::Arrived { boat, position } => write!(f, "Boat {boat} arrived at {position}."),
            Self::CatchSold { boat, value } => {
                write!(f, "Boat {boat} sold its catch for R${value}.")
            }
            Self::RationsRemaining { stocks } => {
                write!(f, "Rations left:")?;
                for (i, (fisher, count)) in stocks.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{fisher} has {count}")?;
                }
                write!(f, ".")
            }
            Self::WagePaid {
                fisher,
                amount,
                harbor,
            } => write!(f, "{fisher} earned R${amount} working at {harbor}."),
            Self::TransferOpened {
                buyer,
                seller,
                contract,
            } => write!(
                f,
                "Transaction between {buyer} (buyer) and {seller} (seller) for:\n{contract}"
            ),
            Self::TransferRefused { reason } => write!(f, "Transaction refused: {reason}."),
            Self::BoatHandedOver { boat, class } => write!(f, "The {class} boat {boat}"),
            Self::NetsHandedOver { count } => write!(f, "{count} nets"),
            Self::MoneyHandedOver { amount } => write!(f, "Amount: R${amount}"),
            Self::Payment {
                payer,
                payee,
                amount,
                contract,
            } => write!(f, "Payment from {payer} to {payee} of R${amount} for:\n{contract}"),
            Self::ContractCancelled { payee, payer } => write!(
                f,
                "Contract with {payee} cancelled: {payer} lacks the funds."
            ),
        }
    }
}
