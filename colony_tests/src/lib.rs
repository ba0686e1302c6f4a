// Test harness for whole-day colony scenarios.
//
// Wraps a real `Game<ScriptedDice>` on the Paraty fixture map and drives it
// through `Game::advance`, the same path a presentation layer takes. Each
// helper closes one window of the day and asserts the game landed where the
// day cycle says it should, so a scenario reads as a script of decisions.
//
// Rolls are queued just before the phase that consumes them and every helper
// checks the script was used up exactly, which keeps scenarios honest about
// how many dice a day throws.
//
// See also: `tests/day_cycle.rs` for the scenarios, `maps/paraty.json` for
// the fixture map.

use fishing_colony_sim::command::{
    BoardingChoice, JourneyChoice, PhaseInput, PurchaseRequest, ShoppingList,
};
use fishing_colony_sim::config::GameConfig;
use fishing_colony_sim::dice::ScriptedDice;
use fishing_colony_sim::event::GameEvent;
use fishing_colony_sim::game::{DayPhase, Game, Pending, Step};
use fishing_colony_sim::map_load::load_map_json;
use fishing_colony_sim::report::{BoatStatus, FisherInventory};
use fishing_colony_sim::world::SeaMap;

/// The fixture map: Paraty (home, market), Paraty-Mirim (market), Praia do
/// Sono (harbor only) and three fishing spots, two of them hazardous.
pub const PARATY_MAP: &str = include_str!("../maps/paraty.json");

/// Dawn rolls for the two markets (ration then fish at each) that price
/// rations at R$14 and fish at R$9/kg everywhere.
pub const CALM_DAWN: [i32; 4] = [3, 3, 3, 3];

pub const RATION_PRICE: i64 = 14;
pub const FISH_PRICE: i64 = 9;

pub fn paraty_map() -> SeaMap {
    let load = load_map_json(PARATY_MAP);
    assert!(load.problems.is_empty(), "fixture map: {:?}", load.problems);
    load.map
}

/// A game on the fixture map with scripted dice.
pub struct TestColony {
    pub game: Game<ScriptedDice>,
    /// Every event seen so far, in order.
    pub journal: Vec<GameEvent>,
}

impl TestColony {
    /// Start a game and enrol `fishers`. The game is left at dawn of day 1.
    pub fn new(fishers: &[&str]) -> Self {
        Self::with_config(fishers, GameConfig::default())
    }

    pub fn with_config(fishers: &[&str], config: GameConfig) -> Self {
        let game = Game::new(paraty_map(), config, ScriptedDice::new([]))
            .expect("fixture map is usable");
        let mut colony = Self {
            game,
            journal: Vec::new(),
        };
        let names = fishers.iter().map(|f| f.to_string()).collect();
        let step = colony.advance(PhaseInput::AddFishers(names));
        assert_eq!(step.pending, Pending::Continue);
        colony
    }

    fn advance(&mut self, input: PhaseInput) -> Step {
        let step = self.game.advance(input);
        self.journal.extend(step.events.iter().cloned());
        step
    }

    fn expect_phase(&self, label: &str) {
        assert_eq!(self.game.phase().label(), label, "wrong phase");
    }

    fn expect_rolls_used(&mut self) {
        assert_eq!(self.game.dice_mut().remaining(), 0, "unused scripted rolls");
    }

    /// Open a new day. `rolls` price the markets.
    pub fn dawn(&mut self, rolls: &[i32]) -> Step {
        self.expect_phase("dawn");
        self.game.dice_mut().push(rolls.iter().copied());
        let step = self.advance(PhaseInput::Continue);
        self.expect_rolls_used();
        self.expect_phase("market");
        step
    }

    /// Close the market window with these purchases.
    pub fn shop(&mut self, purchases: &[(&str, Vec<PurchaseRequest>)]) -> Step {
        self.expect_phase("market");
        let lists = purchases
            .iter()
            .map(|(fisher, requests)| ShoppingList {
                fisher: fisher.to_string(),
                requests: requests.clone(),
            })
            .collect();
        let step = self.advance(PhaseInput::Purchases(lists));
        self.expect_phase("boarding");
        step
    }

    /// Close the boarding window, putting each crew aboard its boat.
    pub fn crew(&mut self, crews: &[(&str, &[&str])]) -> Step {
        self.expect_phase("boarding");
        let choices = crews
            .iter()
            .map(|(boat, fishers)| BoardingChoice {
                boat: boat.to_string(),
                fishers: fishers.iter().map(|f| f.to_string()).collect(),
            })
            .collect();
        let step = self.advance(PhaseInput::Boarding(choices));
        self.expect_phase("journeys");
        step
    }

    /// Choose journeys and sail them. `rolls` feed the hazards and casts.
    pub fn sail(&mut self, journeys: &[(&str, &str)], rolls: &[i32]) -> Step {
        self.expect_phase("journeys");
        let choices = journeys
            .iter()
            .map(|(boat, journey)| JourneyChoice {
                boat: boat.to_string(),
                journey: journey.to_string(),
            })
            .collect();
        self.advance(PhaseInput::Journeys(choices));
        self.expect_phase("execution");
        self.game.dice_mut().push(rolls.iter().copied());
        let step = self.advance(PhaseInput::Continue);
        self.expect_rolls_used();
        self.expect_phase("payout");
        step
    }

    /// Pay the idle and return to dawn.
    pub fn payout(&mut self) -> Step {
        self.expect_phase("payout");
        let step = self.advance(PhaseInput::Continue);
        assert_eq!(self.game.phase(), &DayPhase::Dawn);
        step
    }

    /// A whole day with no purchases: dawn, boarding, journeys, payout.
    pub fn quiet_day(&mut self, journeys: &[(&str, &str)], rolls: &[i32]) -> Vec<GameEvent> {
        let mut events = self.dawn(&CALM_DAWN).events;
        events.extend(self.shop(&[]).events);
        events.extend(self.crew(&[]).events);
        events.extend(self.sail(journeys, rolls).events);
        events.extend(self.payout().events);
        events
    }

    pub fn balance(&self, fisher: &str) -> i64 {
        self.game.balances()[fisher]
    }

    pub fn inventory(&self, fisher: &str) -> FisherInventory {
        self.game
            .fisher_inventory(fisher)
            .unwrap_or_else(|| panic!("no fisher named {fisher}"))
    }

    pub fn status(&self, boat: &str) -> Option<BoatStatus> {
        self.game.boat_status(boat)
    }

    /// The journal rendered as journal lines.
    pub fn lines(&self) -> Vec<String> {
        self.journal.iter().map(|e| e.to_string()).collect()
    }
}

/// The purchases that send a new fisher to sea: a boat, two nets and some
/// rations.
pub fn outfit(boat: &str, rations: u32) -> Vec<PurchaseRequest> {
    vec![
        PurchaseRequest::Boat {
            class: fishing_colony_sim::types::BoatClass::Basic,
            name: boat.to_string(),
        },
        PurchaseRequest::Nets { count: 2 },
        PurchaseRequest::Rations { count: rations },
    ]
}
