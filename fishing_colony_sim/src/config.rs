// Data-driven game configuration.
//
// All tunable economic parameters live here in `GameConfig`, loadable from
// JSON. The sim reads prices, wages and boat specs from the config rather
// than from magic numbers, so balance changes need no recompilation.
//
// Market prices are grouped into `PriceConfig`. Boat models are a catalog
// keyed by `BoatClass` (`BoatSpec` entries), the same way every other
// per-kind table in the sim is data rather than code.
//
// Two limits are deliberately NOT here: the 12-ration spoilage cap
// (`fisher::MAX_RATIONS`) and the cast score clamp (`fishing::MAX_CAST_SCORE`).
// Those are invariants of the entities, not balance knobs.
//
// See also: `market.rs` which prices goods from `PriceConfig`, `game.rs`
// which owns the `GameConfig`.

use crate::types::BoatClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed and daily-rolled market prices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceConfig {
    /// Price of one net.
    pub net: i64,
    /// Price of a hull repair. Listed on the price table; no operation
    /// charges it yet.
    pub repair: i64,
    /// Cost to reach each skill level. Index 0 is unused; index `n` is the
    /// price of the course that raises a skill from `n - 1` to `n`. The
    /// highest teachable level is `course_prices.len() - 1`.
    pub course_prices: Vec<i64>,
    /// Fish price per kilogram is `fish_base + fish_per_pip * d6`.
    pub fish_base: i64,
    pub fish_per_pip: i64,
    /// Ration price is `ration_base + ration_per_pip * d6`.
    pub ration_base: i64,
    pub ration_per_pip: i64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            net: 300,
            repair: 200,
            course_prices: vec![0, 200, 500, 800],
            fish_base: 3,
            fish_per_pip: 2,
            ration_base: 8,
            ration_per_pip: 2,
        }
    }
}

/// Physical characteristics and price of one boat model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoatSpec {
    /// Maximum number of fishers aboard.
    pub crew: usize,
    /// Hold size in kilograms of fish.
    pub cargo_capacity: u32,
    /// Hull resistance added to every hazard check.
    pub hull: i32,
    pub price: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    /// Money every ordinary fisher starts with.
    pub starting_balance: i64,

    /// Name of the special non-playing fisher who finances the colony. The
    /// master never eats, never boards and never earns wages.
    pub master_name: String,

    /// Money the master starts with.
    pub master_starting_balance: i64,

    /// Rations handed to every new fisher (enough for the first dawn).
    pub starting_rations: u32,

    /// Wage credited to each fisher who stays ashore for a day.
    pub daily_wage: i64,

    /// Nets a crew may cast per fishing journey, however many they carry.
    pub max_net_casts: u32,

    /// Delay added when wind severely hampers a boat.
    pub wind_delay_severe_days: u32,

    /// Delay added when wind lightly hampers a boat.
    pub wind_delay_light_days: u32,

    /// Market prices.
    pub prices: PriceConfig,

    /// Boat models the shipyard sells.
    pub boat_catalog: BTreeMap<BoatClass, BoatSpec>,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up a boat model, if the catalog sells it.
    pub fn boat_spec(&self, class: BoatClass) -> Option<&BoatSpec> {
        self.boat_catalog.get(&class)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut boat_catalog = BTreeMap::new();
        boat_catalog.insert(
            BoatClass::Basic,
            BoatSpec {
                crew: 1,
                cargo_capacity: 150,
                hull: 1,
                price: 1000,
            },
        );
        boat_catalog.insert(
            BoatClass::Reinforced,
            BoatSpec {
                crew: 2,
                cargo_capacity: 400,
                hull: 3,
                price: 1950,
            },
        );

        Self {
            starting_balance: 2000,
            master_name: "Master".to_string(),
            master_starting_balance: 10_000,
            starting_rations: 1,
            daily_wage: 30,
            max_net_casts: 2,
            wind_delay_severe_days: 2,
            wind_delay_light_days: 1,
            prices: PriceConfig::default(),
            boat_catalog,
        }
    }
}
