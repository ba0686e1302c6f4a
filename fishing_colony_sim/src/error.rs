// Error types for the colony simulation.
//
// None of these ever escape the `Game` façade as faults. `TradeError` values
// are returned by market and transfer operations and turned into narrative
// events by the orchestrator. `MapProblem` values are collected into a list
// by the map loader; the caller decides whether the map is good enough.
// `SetupError` is the one hard refusal: a game cannot start without a home
// harbor that has a market.

use crate::types::SkillKind;
use thiserror::Error;

/// Why a market purchase or a goods transfer was refused. Every refusal
/// leaves both parties exactly as they were.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradeError {
    #[error("not enough money: needs R${needed}, has R${available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("{skill} skill is already at the highest level taught ({level})")]
    SkillAtMaximum { skill: SkillKind, level: u8 },

    #[error("not enough nets: needs {needed}, has {available}")]
    InsufficientNets { needed: u32, available: u32 },

    #[error("a boat named {0} already exists")]
    BoatNameTaken(String),

    #[error("{0:?} cannot be used as a boat name")]
    InvalidBoatName(String),

    #[error("the boat {0} is listed more than once")]
    DuplicateBoat(String),

    #[error("cannot buy zero {0}")]
    ZeroQuantity(&'static str),

    #[error("the shipyard does not build {0} boats")]
    BoatClassUnavailable(String),

    #[error("no boat named {0}")]
    UnknownBoat(String),

    #[error("{owner} does not own the boat {boat}")]
    NotOwner { owner: String, boat: String },

    #[error("no fisher named {0}")]
    UnknownFisher(String),

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("{0} is not at a harbor with a market")]
    NoMarket(String),
}

/// One problem found while loading a map description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapProblem {
    #[error("map description is unreadable: {0}")]
    Unreadable(String),

    #[error("invalid map: missing header")]
    MissingHeader,

    #[error("invalid map: expected dimensions after the header")]
    MissingDimensions,

    #[error("invalid map: {found} record found after {after} records")]
    OutOfOrder {
        found: &'static str,
        after: &'static str,
    },

    #[error("invalid map: position {0} is declared twice")]
    DuplicatePosition(String),

    #[error("invalid map: {section} record refers to unknown position {name}")]
    UnknownPosition { section: &'static str, name: String },

    #[error("invalid map: hazard at {position} has probability {probability}, above 6")]
    ProbabilityOutOfRange { position: String, probability: u8 },

    #[error("invalid map: position {0} has a market but no harbor")]
    MarketWithoutHarbor(String),

    #[error("invalid map: bounds enclose no area")]
    DegenerateBounds,

    #[error("invalid map: {extra} is also marked as home harbor, keeping {kept}")]
    SecondHomeHarbor { kept: String, extra: String },

    #[error("map has no home harbor")]
    NoHomeHarbor,

    #[error("home position {0} is not a harbor")]
    HomeNotHarbor(String),

    #[error("home harbor {0} has no market")]
    HomeWithoutMarket(String),
}

/// Refusal to start a game.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    #[error("the map cannot host a game: {0}")]
    UnusableMap(MapProblem),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_errors_read_as_sentences() {
        let err = TradeError::InsufficientFunds {
            needed: 1000,
            available: 300,
        };
        assert_eq!(err.to_string(), "not enough money: needs R$1000, has R$300");
        let err = TradeError::SkillAtMaximum {
            skill: SkillKind::Fishing,
            level: 3,
        };
        assert_eq!(
            err.to_string(),
            "fishing skill is already at the highest level taught (3)"
        );
        let err = TradeError::InvalidBoatName("Sa;ga".to_string());
        assert_eq!(err.to_string(), "\"Sa;ga\" cannot be used as a boat name");
    }

    #[test]
    fn map_problems_name_the_culprit() {
        let problem = MapProblem::UnknownPosition {
            section: "route",
            name: "Atlantis".to_string(),
        };
        assert_eq!(
            problem.to_string(),
            "invalid map: route record refers to unknown position Atlantis"
        );
        let setup = SetupError::UnusableMap(MapProblem::NoHomeHarbor);
        assert_eq!(
            setup.to_string(),
            "the map cannot host a game: map has no home harbor"
        );
    }
}
