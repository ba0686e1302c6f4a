// Decisions the presentation layer feeds into the game.
//
// The game never asks a human anything itself. Each window of the daily
// cycle (enrolment, market, boarding, journey choice) ends with the caller
// supplying a `PhaseInput` carrying fully formed decisions, which
// `Game::advance` applies before moving to the next phase.
//
// Requests arrive as data, possibly from JSON, so every tagged request enum
// has an `Unknown` catch-all. An unrecognized tag deserializes to it instead
// of failing the whole batch; the game logs it and carries on with the rest.
//
// See also: `game.rs` for `advance()` and the per-phase operations,
// `journey.rs` for the journey labels a `JourneyChoice` carries.

use crate::types::{BoatClass, SkillKind};
use serde::{Deserialize, Serialize};

/// Something a fisher asks to buy at a market.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PurchaseRequest {
    Boat { class: BoatClass, name: String },
    Course { skill: SkillKind },
    Rations { count: u32 },
    Nets { count: u32 },
    #[serde(other)]
    Unknown,
}

/// One good in a transfer between two fishers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Goods {
    /// A boat, by name, passing from seller to buyer.
    Boat { name: String },
    /// Nets passing from seller to buyer.
    Nets { count: u32 },
    /// Money passing from buyer to seller.
    Money { amount: i64 },
    #[serde(other)]
    Unknown,
}

/// All the purchases one fisher makes in a market window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub fisher: String,
    pub requests: Vec<PurchaseRequest>,
}

/// Fishers to put aboard one boat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingChoice {
    pub boat: String,
    pub fishers: Vec<String>,
}

/// The journey picked for one boat, as one of the labels offered by
/// `Game::prepare_journeys`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyChoice {
    pub boat: String,
    pub journey: String,
}

/// The decisions closing the current phase of the day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseInput {
    /// Nothing to decide; move on.
    Continue,
    AddFishers(Vec<String>),
    Purchases(Vec<ShoppingList>),
    Boarding(Vec<BoardingChoice>),
    Journeys(Vec<JourneyChoice>),
}

impl PhaseInput {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::AddFishers(_) => "add fishers",
            Self::Purchases(_) => "purchases",
            Self::Boarding(_) => "boarding",
            Self::Journeys(_) => "journeys",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_requests_read_from_json() {
        let json = r#"[
            {"kind": "boat", "class": "Reinforced", "name": "Fortuna"},
            {"kind": "course", "skill": "Fishing"},
            {"kind": "rations", "count": 8},
            {"kind": "nets", "count": 2},
            {"kind": "lottery ticket"}
        ]"#;
        let requests: Vec<PurchaseRequest> = serde_json::from_str(json).unwrap();
        assert_eq!(
            requests,
            vec![
                PurchaseRequest::Boat {
                    class: BoatClass::Reinforced,
                    name: "Fortuna".to_string()
                },
                PurchaseRequest::Course {
                    skill: SkillKind::Fishing
                },
                PurchaseRequest::Rations { count: 8 },
                PurchaseRequest::Nets { count: 2 },
                PurchaseRequest::Unknown,
            ]
        );
    }

    #[test]
    fn unknown_goods_do_not_spoil_the_batch() {
        let json = r#"[
            {"kind": "money", "amount": 250},
            {"kind": "goat"},
            {"kind": "boat", "name": "Saga"}
        ]"#;
        let goods: Vec<Goods> = serde_json::from_str(json).unwrap();
        assert_eq!(goods[0], Goods::Money { amount: 250 });
        assert_eq!(goods[1], Goods::Unknown);
        assert_eq!(
            goods[2],
            Goods::Boat {
                name: "Saga".to_string()
            }
        );
    }

    #[test]
    fn phase_input_serialization_roundtrip() {
        let input = PhaseInput::Boarding(vec![BoardingChoice {
            boat: "Fortuna".to_string(),
            fishers: vec!["Ana".to_string(), "Beto".to_string()],
        }]);
        let json = serde_json::to_string(&input).unwrap();
        let restored: PhaseInput = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, input);
        assert_eq!(restored.label(), "boarding");
    }
}
