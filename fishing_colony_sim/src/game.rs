// Top-level game: the `Game` façade and the day-cycle state machine.
//
// `Game` owns everything that changes during play: the config, the colony
// (map, fishers, boats), the dice, the day counter, the pending-journey queue
// and the current `DayPhase`. The presentation layer drives it in one of two
// ways:
//
// - Through `advance(input)`, which applies the decisions closing the current
//   phase, runs whatever work leads up to the next decision point, and
//   returns a `Step` holding the day's events plus a `Pending` describing the
//   decision the game needs next.
// - Through the individual operations (`prepare_dawn`, `serve_fisher`,
//   `board`, `add_journey`, ...), for callers that sequence the day
//   themselves. `advance` is built on the same operations.
//
// One day runs:
//
//   Dawn ──Continue──▶ Market ──Purchases──▶ Boarding ──Boarding──▶
//   Journeys ──Journeys──▶ Execution ──Continue──▶ Payout ──Continue──▶ Dawn
//
// with `Setup` (waiting for `AddFishers`) before the first dawn. Leaving Dawn
// runs the dawn work (new day, new prices, rations); leaving Execution sails
// the queued journeys; leaving Payout pays the day's wages. Input that does
// not fit the current phase is logged and ignored, leaving the game
// untouched.
//
// The master (`GameConfig::master_name`) is a special fisher who finances
// the colony: never eats, never boards, never earns wages, but may shop and
// trade like anyone else.
//
// See also: `command.rs` for the inputs, `event.rs` for the events,
// `journey.rs` for execution, `colony.rs` for the registries.
//
// **Critical constraint: determinism.** Every roll goes through `self.dice`;
// every iteration is over `BTreeMap`s or vectors in insertion order.

use crate::colony::{Colony, Location};
use crate::command::{Goods, PhaseInput, PurchaseRequest, ShoppingList};
use crate::config::GameConfig;
use crate::dice::Dice;
use crate::error::{SetupError, TradeError};
use crate::event::{CoordinateDirective, GameEvent, GameEventKind};
use crate::journey::{self, Journey, JourneyQueue};
use crate::market::Market;
use crate::prng::GameRng;
use crate::report::{BoatOpening, BoatStatus, FisherInventory, JourneyOptions, PriceTable};
use crate::types::{BoatId, FisherId, PositionId};
use crate::world::SeaMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const INTRODUCTION: &[&str] = &[
    "You are fishers of a colony in a quiet village.",
    "Fish are plentiful, but where there are more fish there are also more dangers at sea.",
    "Where fishing is most frequent, overfishing must be avoided so the fish can breed.",
    "",
    "Every day you prepare the boats and put out to sea.",
    "To reach the farthest spots, or when the catch is poor, a boat may stay at sea for several days.",
    "Back in port the fish is sold at the market, and the money can buy rations, equipment or training courses.",
    "",
];

/// Where the game stands within the current day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPhase {
    /// Waiting for the players to be named.
    Setup,
    /// Night is over; the next `Continue` opens a new day.
    Dawn,
    /// Market window, open to the fishers onshore at a market.
    Market { shoppers: Vec<String> },
    /// Boarding window for the boats in port with room aboard.
    Boarding { openings: Vec<BoatOpening> },
    /// Journey choice for crewed boats free to choose. `idle` are the
    /// fishers left ashore when boarding closed.
    Journeys {
        idle: Vec<String>,
        options: Vec<JourneyOptions>,
    },
    /// Journeys are queued; the next `Continue` sails them.
    Execution { idle: Vec<String> },
    /// Boats are back; the next `Continue` pays the idle.
    Payout { idle: Vec<String> },
}

impl DayPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Dawn => "dawn",
            Self::Market { .. } => "market",
            Self::Boarding { .. } => "boarding",
            Self::Journeys { .. } => "journeys",
            Self::Execution { .. } => "execution",
            Self::Payout { .. } => "payout",
        }
    }
}

/// The decision the game is waiting for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pending {
    AddFishers,
    Purchases { shoppers: Vec<String> },
    Boarding { openings: Vec<BoatOpening> },
    Journeys { options: Vec<JourneyOptions> },
    Continue,
}

/// The outcome of one `Game::advance` call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub events: Vec<GameEvent>,
    pub pending: Pending,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game<D: Dice = GameRng> {
    config: GameConfig,
    colony: Colony,
    dice: D,
    day: u32,
    phase: DayPhase,
    journeys: JourneyQueue,
}

impl Game<GameRng> {
    /// A game rolling a `GameRng` seeded with `seed`.
    pub fn with_seed(map: SeaMap, config: GameConfig, seed: u64) -> Result<Self, SetupError> {
        Self::new(map, config, GameRng::new(seed))
    }
}

impl<D: Dice> Game<D> {
    /// Start a game on `map`. Every market on the map is restocked with the
    /// prices and boat catalog of `config`.
    pub fn new(mut map: SeaMap, config: GameConfig, dice: D) -> Result<Self, SetupError> {
        for id in map.harbors() {
            if let Some(harbor) = map.harbor_mut(id) {
                if harbor.market.is_some() {
                    harbor.market = Some(Market::new(&config));
                }
            }
        }
        let colony = Colony::new(map)?;
        log::info!(
            "new game on '{}', home harbor {}",
            colony.map().title,
            colony.home_name()
        );
        Ok(Self {
            config,
            colony,
            dice,
            day: 0,
            phase: DayPhase::Setup,
            journeys: JourneyQueue::new(),
        })
    }

    // -- Queries ------------------------------------------------------------

    pub fn initial_messages(&self) -> Vec<String> {
        INTRODUCTION.iter().map(|line| line.to_string()).collect()
    }

    pub fn image_file(&self) -> &str {
        &self.colony.map().dimensions.image
    }

    /// Map image size in pixels, `(width, height)`.
    pub fn image_size(&self) -> (u32, u32) {
        let dims = &self.colony.map().dimensions;
        (dims.width, dims.height)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn colony(&self) -> &Colony {
        &self.colony
    }

    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }

    /// Days begun so far. Zero until the first dawn.
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn phase(&self) -> &DayPhase {
        &self.phase
    }

    /// The decision the current phase is waiting for.
    pub fn pending(&self) -> Pending {
        match &self.phase {
            DayPhase::Setup => Pending::AddFishers,
            DayPhase::Market { shoppers } => Pending::Purchases {
                shoppers: shoppers.clone(),
            },
            DayPhase::Boarding { openings } => Pending::Boarding {
                openings: openings.clone(),
            },
            DayPhase::Journeys { options, .. } => Pending::Journeys {
                options: options.clone(),
            },
            DayPhase::Dawn | DayPhase::Execution { .. } | DayPhase::Payout { .. } => {
                Pending::Continue
            }
        }
    }

    fn is_master(&self, fisher: FisherId) -> bool {
        self.colony.fisher_name(fisher) == self.config.master_name
    }

    fn stamp(&self, kinds: Vec<GameEventKind>) -> Vec<GameEvent> {
        kinds
            .into_iter()
            .map(|kind| GameEvent { day: self.day, kind })
            .collect()
    }

    // -- State machine ------------------------------------------------------

    /// Apply the decisions closing the current phase and run the game up to
    /// the next decision point. `Continue` stands for "no decisions" in the
    /// market, boarding and journey windows.
    pub fn advance(&mut self, input: PhaseInput) -> Step {
        let phase = std::mem::replace(&mut self.phase, DayPhase::Setup);
        let (next, events) = match (phase, input) {
            (DayPhase::Setup, PhaseInput::AddFishers(names)) => {
                (DayPhase::Dawn, self.add_fishers(&names))
            }
            (DayPhase::Dawn, PhaseInput::Continue) => {
                let events = self.prepare_dawn();
                let shoppers = self.fishers_at_markets();
                (DayPhase::Market { shoppers }, events)
            }
            (DayPhase::Market { shoppers }, PhaseInput::Purchases(lists)) => {
                let events = self.serve_shoppers(&shoppers, lists);
                (self.boarding_phase(), events)
            }
            (DayPhase::Market { .. }, PhaseInput::Continue) => (self.boarding_phase(), Vec::new()),
            (DayPhase::Boarding { .. }, PhaseInput::Boarding(choices)) => {
                let mut events = Vec::new();
                for choice in choices {
                    events.extend(self.board(&choice.boat, &choice.fishers));
                }
                (self.journeys_phase(), events)
            }
            (DayPhase::Boarding { .. }, PhaseInput::Continue) => {
                (self.journeys_phase(), Vec::new())
            }
            (DayPhase::Journeys { idle, .. }, PhaseInput::Journeys(choices)) => {
                for choice in choices {
                    self.add_journey(&choice.boat, &choice.journey);
                }
                (DayPhase::Execution { idle }, Vec::new())
            }
            (DayPhase::Journeys { idle, .. }, PhaseInput::Continue) => {
                (DayPhase::Execution { idle }, Vec::new())
            }
            (DayPhase::Execution { idle }, PhaseInput::Continue) => {
                (DayPhase::Payout { idle }, self.execute_journeys())
            }
            (DayPhase::Payout { idle }, PhaseInput::Continue) => {
                (DayPhase::Dawn, self.credit_idle_wages(&idle))
            }
            (phase, input) => {
                log::warn!(
                    "ignoring {} input during the {} phase",
                    input.label(),
                    phase.label()
                );
                (phase, Vec::new())
            }
        };
        log::info!("day {}: {} phase", self.day, next.label());
        self.phase = next;
        Step {
            events,
            pending: self.pending(),
        }
    }

    fn serve_shoppers(&mut self, shoppers: &[String], lists: Vec<ShoppingList>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for list in lists {
            if !shoppers.contains(&list.fisher) {
                log::warn!("{} is not at a market today", list.fisher);
                continue;
            }
            events.extend(self.serve_fisher(&list.fisher, &list.requests));
        }
        events
    }

    fn boarding_phase(&self) -> DayPhase {
        let openings = self
            .boats_with_openings()
            .into_iter()
            .map(|(boat, vacancies)| BoatOpening {
                candidates: self.fishers_for_boat(&boat),
                boat,
                vacancies,
            })
            .collect();
        DayPhase::Boarding { openings }
    }

    fn journeys_phase(&mut self) -> DayPhase {
        let idle = self.idle_fishers();
        let options = self.prepare_journeys();
        DayPhase::Journeys { idle, options }
    }

    // -- Setup --------------------------------------------------------------

    /// Enrol new fishers onshore at the home harbor. Names already in the
    /// game are skipped.
    pub fn add_fishers(&mut self, names: &[String]) -> Vec<GameEvent> {
        let mut kinds = Vec::new();
        for name in names {
            let balance = if *name == self.config.master_name {
                self.config.master_starting_balance
            } else {
                self.config.starting_balance
            };
            let rations = self.config.starting_rations;
            if self.colony.add_fisher(name, balance, rations).is_none() {
                log::debug!("{name} is already in the game");
                continue;
            }
            log::info!("{name} joins the colony");
            kinds.push(GameEventKind::FisherJoined {
                fisher: name.clone(),
                harbor: self.colony.home_name().to_string(),
            });
        }
        self.stamp(kinds)
    }

    // -- Dawn ---------------------------------------------------------------

    /// Open a new day: reprice every market, publish the price tables and
    /// feed everyone but the master.
    pub fn prepare_dawn(&mut self) -> Vec<GameEvent> {
        self.day += 1;
        let mut kinds = vec![GameEventKind::DayBegins];

        for id in self.colony.map().harbors() {
            let market = self
                .colony
                .map_mut()
                .harbor_mut(id)
                .and_then(|h| h.market.as_mut());
            if let Some(market) = market {
                market.reprice(&mut self.dice);
            }
        }
        for table in self.price_tables() {
            kinds.push(GameEventKind::PriceTable {
                harbor: table.harbor,
                entries: table.entries,
            });
        }

        for fisher in self.colony.fisher_ids() {
            if self.is_master(fisher) {
                continue;
            }
            self.feed(fisher, &mut kinds);
        }
        self.stamp(kinds)
    }

    /// Eat one ration, or get brought home and sold one.
    fn feed(&mut self, fisher: FisherId, kinds: &mut Vec<GameEventKind>) {
        let ate = self
            .colony
            .fisher_mut(fisher)
            .is_some_and(|f| f.consume_ration());
        if ate {
            return;
        }

        let name = self.colony.fisher_name(fisher).to_string();
        let home = self.colony.home();
        let home_name = self.colony.home_name().to_string();
        let (from_boat, moved) = self.colony.return_home(fisher);
        if moved {
            log::info!("{name} ran out of rations and was brought home");
            kinds.push(GameEventKind::RationRescue {
                fisher: name.clone(),
                harbor: home_name.clone(),
            });
        } else {
            kinds.push(GameEventKind::RationBoughtAtHome {
                fisher: name.clone(),
            });
        }
        if let Some(boat) = from_boat {
            let stranded = self.colony.boat(boat).is_some_and(|b| !b.has_crew());
            if stranded {
                self.colony.tow_home(boat);
                kinds.push(GameEventKind::BoatTowed {
                    boat: self.colony.boat_name(boat).to_string(),
                    harbor: home_name,
                });
            }
        }

        let bought = self.colony.trade(home, fisher, |market, f| {
            market.sell_rations(f, 1)?;
            f.consume_ration();
            Ok(())
        });
        if let Err(reason) = bought {
            log::info!("{name} cannot pay for a ration: {reason}");
            kinds.push(GameEventKind::RationUnaffordable {
                fisher: name,
                reason: reason.to_string(),
            });
        }
    }

    // -- Market -------------------------------------------------------------

    /// Fishers standing onshore at a harbor with a market.
    pub fn fishers_at_markets(&self) -> Vec<String> {
        self.colony
            .fisher_ids()
            .into_iter()
            .filter(|&f| self.market_of(f).is_some())
            .map(|f| self.colony.fisher_name(f).to_string())
            .collect()
    }

    fn market_of(&self, fisher: FisherId) -> Option<PositionId> {
        match self.colony.location(fisher)? {
            Location::Onshore(harbor) => self.colony.map().market(harbor).map(|_| harbor),
            Location::Aboard(_) => None,
        }
    }

    /// Attempt each purchase in order at the market where the fisher
    /// stands. A refused purchase does not stop the rest.
    pub fn serve_fisher(&mut self, name: &str, requests: &[PurchaseRequest]) -> Vec<GameEvent> {
        let Some(fisher) = self.colony.fisher_id(name) else {
            log::warn!("no fisher named {name}");
            return Vec::new();
        };
        let Some(harbor) = self.market_of(fisher) else {
            log::warn!("{name} is not onshore at a market");
            return Vec::new();
        };
        let mut kinds = Vec::new();
        for request in requests {
            match self.purchase(fisher, harbor, request) {
                Ok(Some(kind)) => kinds.push(kind),
                Ok(None) => {}
                Err(reason) => {
                    log::debug!("{name} could not buy {request:?}: {reason}");
                    kinds.push(GameEventKind::PurchaseRefused {
                        fisher: name.to_string(),
                        item: describe_request(request),
                        reason: reason.to_string(),
                    });
                }
            }
        }
        self.stamp(kinds)
    }

    fn purchase(
        &mut self,
        fisher: FisherId,
        harbor: PositionId,
        request: &PurchaseRequest,
    ) -> Result<Option<GameEventKind>, TradeError> {
        let name = self.colony.fisher_name(fisher).to_string();
        let kind = match request {
            PurchaseRequest::Boat { class, name: boat } => {
                if !CoordinateDirective::accepts_boat_name(boat) {
                    return Err(TradeError::InvalidBoatName(boat.clone()));
                }
                if self.colony.boat_name_taken(boat) {
                    return Err(TradeError::BoatNameTaken(boat.clone()));
                }
                let id = self.colony.allocate_boat_id();
                let built = self
                    .colony
                    .trade(harbor, fisher, |market, f| market.sell_boat(f, *class, id, boat))?;
                let price = self.config.boat_spec(*class).map_or(0, |spec| spec.price);
                self.colony.launch_boat(built, harbor);
                log::info!("{name} bought the {class} boat {boat}");
                GameEventKind::BoatBought {
                    fisher: name,
                    boat: boat.clone(),
                    class: *class,
                    price,
                }
            }
            PurchaseRequest::Course { skill } => {
                let (level, price) = self.colony.trade(harbor, fisher, |market, f| {
                    let before = f.balance();
                    let level = market.sell_course(f, *skill)?;
                    Ok((level, before - f.balance()))
                })?;
                GameEventKind::CourseTaken {
                    fisher: name,
                    skill: *skill,
                    level,
                    price,
                }
            }
            PurchaseRequest::Rations { count } => {
                let cost = self
                    .colony
                    .trade(harbor, fisher, |market, f| market.sell_rations(f, *count))?;
                GameEventKind::RationsBought {
                    fisher: name,
                    count: *count,
                    cost,
                }
            }
            PurchaseRequest::Nets { count } => {
                let cost = self
                    .colony
                    .trade(harbor, fisher, |market, f| market.sell_nets(f, *count))?;
                GameEventKind::NetsBought {
                    fisher: name,
                    count: *count,
                    cost,
                }
            }
            PurchaseRequest::Unknown => {
                log::warn!("{name} asked for something the market does not sell");
                return Ok(None);
            }
        };
        Ok(Some(kind))
    }

    // -- Boarding -----------------------------------------------------------

    /// Boats docked, not delayed and with room aboard, with their number of
    /// free places.
    pub fn boats_with_openings(&self) -> Vec<(String, usize)> {
        self.colony
            .boats()
            .filter(|b| !b.is_delayed() && b.vacancies() > 0)
            .filter(|b| {
                self.colony
                    .boat_harbor(b.id)
                    .and_then(|h| self.colony.map().harbor(h))
                    .is_some_and(|h| h.docked().contains(&b.id))
            })
            .map(|b| (b.name.clone(), b.vacancies()))
            .collect()
    }

    /// Fishers onshore where the boat is docked, master excluded.
    pub fn fishers_for_boat(&self, boat: &str) -> Vec<String> {
        let Some(id) = self.colony.boat_id(boat) else {
            return Vec::new();
        };
        let Some(harbor) = self.colony.boat_harbor(id).and_then(|h| self.colony.map().harbor(h))
        else {
            return Vec::new();
        };
        harbor
            .onshore()
            .iter()
            .filter(|&&f| !self.is_master(f))
            .map(|&f| self.colony.fisher_name(f).to_string())
            .collect()
    }

    /// Put the named fishers aboard in order, until the boat is full.
    pub fn board(&mut self, boat: &str, fishers: &[String]) -> Vec<GameEvent> {
        let Some(id) = self.colony.boat_id(boat) else {
            log::warn!("no boat named {boat}");
            return Vec::new();
        };
        if self.colony.boat(id).is_some_and(|b| b.is_delayed()) {
            log::warn!("{boat} is held up and takes no crew");
            return Vec::new();
        }
        let mut kinds = Vec::new();
        for name in fishers {
            if self.colony.boat(id).is_some_and(|b| b.vacancies() == 0) {
                kinds.push(GameEventKind::BoatFull {
                    boat: boat.to_string(),
                });
                break;
            }
            let Some(fisher) = self.colony.fisher_id(name) else {
                log::warn!("no fisher named {name}");
                continue;
            };
            if self.is_master(fisher) {
                log::warn!("{name} does not go to sea");
                continue;
            }
            if self.colony.board(id, fisher) {
                kinds.push(GameEventKind::Boarded {
                    fisher: name.clone(),
                    boat: boat.to_string(),
                });
            } else {
                log::warn!("{name} cannot board {boat}");
            }
        }
        self.stamp(kinds)
    }

    /// Fishers onshore anywhere, master excluded.
    pub fn idle_fishers(&self) -> Vec<String> {
        self.colony
            .fisher_ids()
            .into_iter()
            .filter(|&f| !self.is_master(f))
            .filter(|&f| matches!(self.colony.location(f), Some(Location::Onshore(_))))
            .map(|f| self.colony.fisher_name(f).to_string())
            .collect()
    }

    // -- Journeys -----------------------------------------------------------

    /// Queue "wait out delay" for every delayed crewed boat and list the
    /// journeys open to the other crewed boats.
    pub fn prepare_journeys(&mut self) -> Vec<JourneyOptions> {
        let mut listed = Vec::new();
        for id in self.colony.boat_ids() {
            let Some(boat) = self.colony.boat(id) else {
                continue;
            };
            if !boat.has_crew() {
                continue;
            }
            if boat.is_delayed() {
                self.journeys.push(id, Journey::WaitOutDelay);
                continue;
            }
            let journeys: Vec<String> = journey::journey_options(&self.colony, id)
                .iter()
                .map(|j| j.label(self.colony.map()))
                .collect();
            if !journeys.is_empty() {
                listed.push(JourneyOptions {
                    boat: boat.name.clone(),
                    journeys,
                });
            }
        }
        listed
    }

    /// Queue a journey for a boat from one of the labels `prepare_journeys`
    /// offered. Returns whether it was queued; a later choice for the same
    /// boat replaces an earlier one.
    pub fn add_journey(&mut self, boat: &str, label: &str) -> bool {
        let Some(id) = self.colony.boat_id(boat) else {
            log::warn!("no boat named {boat}");
            return false;
        };
        let Some(journey) = Journey::parse(label, self.colony.map()) else {
            log::warn!("unknown journey '{label}' for {boat}");
            return false;
        };
        if !self.journey_allowed(id, journey) {
            log::warn!("{boat} cannot {label} today");
            return false;
        }
        self.journeys.push(id, journey);
        true
    }

    fn journey_allowed(&self, boat: BoatId, journey: Journey) -> bool {
        let Some(b) = self.colony.boat(boat) else {
            return false;
        };
        if !b.has_crew() {
            return false;
        }
        if b.is_delayed() {
            return journey == Journey::WaitOutDelay;
        }
        journey::journey_options(&self.colony, boat).contains(&journey)
    }

    /// Sail every queued journey, newest first.
    pub fn execute_journeys(&mut self) -> Vec<GameEvent> {
        let kinds = journey::execute_all(
            &mut self.colony,
            &mut self.journeys,
            &mut self.dice,
            &self.config,
        );
        self.stamp(kinds)
    }

    // -- Payout -------------------------------------------------------------

    /// Pay the daily wage to each named fisher still onshore. The master is
    /// never paid.
    pub fn credit_idle_wages(&mut self, idle: &[String]) -> Vec<GameEvent> {
        let wage = self.config.daily_wage;
        let mut kinds = Vec::new();
        for name in idle {
            let Some(fisher) = self.colony.fisher_id(name) else {
                continue;
            };
            if self.is_master(fisher) {
                continue;
            }
            let Some(Location::Onshore(harbor)) = self.colony.location(fisher) else {
                continue;
            };
            if let Some(f) = self.colony.fisher_mut(fisher) {
                f.credit(wage);
            }
            kinds.push(GameEventKind::WagePaid {
                fisher: name.clone(),
                amount: wage,
                harbor: self.colony.map().name_of(harbor).to_string(),
            });
        }
        self.stamp(kinds)
    }

    // -- Transfers ----------------------------------------------------------

    /// Hand goods from `seller` to `buyer` (money flows the other way).
    /// Everything is checked before anything moves; one failed check cancels
    /// the whole transfer.
    pub fn transfer_goods(
        &mut self,
        seller: &str,
        buyer: &str,
        goods: &[Goods],
        contract: &str,
    ) -> Vec<GameEvent> {
        let (Some(from), Some(to)) = (self.colony.fisher_id(seller), self.colony.fisher_id(buyer))
        else {
            log::warn!("transfer between unknown fishers {seller} and {buyer}");
            return Vec::new();
        };
        let mut kinds = vec![GameEventKind::TransferOpened {
            buyer: buyer.to_string(),
            seller: seller.to_string(),
            contract: contract.to_string(),
        }];
        if let Err(reason) = self.check_transfer(from, to, goods) {
            log::info!("transfer from {seller} to {buyer} refused: {reason}");
            kinds.push(GameEventKind::TransferRefused {
                reason: reason.to_string(),
            });
            return self.stamp(kinds);
        }

        for good in goods {
            match good {
                Goods::Boat { name } => {
                    let Some(boat) = self.colony.boat_id(name) else {
                        continue;
                    };
                    if self.colony.transfer_boat(boat, from, to) {
                        if let Some(b) = self.colony.boat(boat) {
                            kinds.push(GameEventKind::BoatHandedOver {
                                boat: name.clone(),
                                class: b.class,
                            });
                        }
                    }
                }
                Goods::Nets { count } => {
                    let removed = self
                        .colony
                        .fisher_mut(from)
                        .is_some_and(|f| f.remove_nets(*count));
                    if removed {
                        if let Some(f) = self.colony.fisher_mut(to) {
                            f.add_nets(*count);
                        }
                        kinds.push(GameEventKind::NetsHandedOver { count: *count });
                    }
                }
                Goods::Money { amount } => {
                    let paid = self
                        .colony
                        .fisher_mut(to)
                        .is_some_and(|f| f.debit(*amount));
                    if paid {
                        if let Some(f) = self.colony.fisher_mut(from) {
                            f.credit(*amount);
                        }
                        kinds.push(GameEventKind::MoneyHandedOver { amount: *amount });
                    }
                }
                Goods::Unknown => log::warn!("skipping unknown goods in transfer to {buyer}"),
            }
        }
        self.stamp(kinds)
    }

    fn check_transfer(&self, seller: FisherId, buyer: FisherId, goods: &[Goods]) -> Result<(), TradeError> {
        let held_nets = self.colony.fisher(seller).map_or(0, |f| f.nets());
        let buyer_funds = self.colony.fisher(buyer).map_or(0, |f| f.balance());
        let mut nets: u32 = 0;
        let mut money: i64 = 0;
        let mut boats = BTreeSet::new();
        for good in goods {
            match good {
                Goods::Boat { name } => {
                    if !boats.insert(name.as_str()) {
                        return Err(TradeError::DuplicateBoat(name.clone()));
                    }
                    let boat = self
                        .colony
                        .boat_id(name)
                        .ok_or_else(|| TradeError::UnknownBoat(name.clone()))?;
                    if self.colony.owner_of(boat) != Some(seller) {
                        return Err(TradeError::NotOwner {
                            owner: self.colony.fisher_name(seller).to_string(),
                            boat: name.clone(),
                        });
                    }
                }
                Goods::Nets { count } => {
                    nets = nets.checked_add(*count).ok_or(TradeError::InsufficientNets {
                        needed: u32::MAX,
                        available: held_nets,
                    })?;
                }
                Goods::Money { amount } => {
                    if *amount <= 0 {
                        return Err(TradeError::NonPositiveAmount(*amount));
                    }
                    money = money.checked_add(*amount).ok_or(TradeError::InsufficientFunds {
                        needed: i64::MAX,
                        available: buyer_funds,
                    })?;
                }
                Goods::Unknown => {}
            }
        }
        if nets > held_nets {
            return Err(TradeError::InsufficientNets {
                needed: nets,
                available: held_nets,
            });
        }
        if money > buyer_funds {
            return Err(TradeError::InsufficientFunds {
                needed: money,
                available: buyer_funds,
            });
        }
        Ok(())
    }

    /// Settle a contract payment from `payer` to `payee`.
    pub fn transfer_money(
        &mut self,
        payee: &str,
        payer: &str,
        amount: i64,
        contract: &str,
    ) -> Vec<GameEvent> {
        let (Some(to), Some(from)) = (self.colony.fisher_id(payee), self.colony.fisher_id(payer))
        else {
            log::warn!("payment between unknown fishers {payer} and {payee}");
            return Vec::new();
        };
        let paid = amount > 0
            && self
                .colony
                .fisher_mut(from)
                .is_some_and(|f| f.debit(amount));
        let kind = if paid {
            if let Some(f) = self.colony.fisher_mut(to) {
                f.credit(amount);
            }
            GameEventKind::Payment {
                payer: payer.to_string(),
                payee: payee.to_string(),
                amount,
                contract: contract.to_string(),
            }
        } else {
            log::info!("{payer} could not pay {amount} to {payee}");
            GameEventKind::ContractCancelled {
                payee: payee.to_string(),
                payer: payer.to_string(),
            }
        };
        self.stamp(vec![kind])
    }

    // -- Snapshots ----------------------------------------------------------

    pub fn balances(&self) -> BTreeMap<String, i64> {
        self.colony
            .fishers()
            .map(|f| (f.name.clone(), f.balance()))
            .collect()
    }

    pub fn fisher_inventory(&self, name: &str) -> Option<FisherInventory> {
        FisherInventory::of(&self.colony, self.colony.fisher_id(name)?)
    }

    pub fn boat_status(&self, name: &str) -> Option<BoatStatus> {
        BoatStatus::of(&self.colony, self.colony.boat_id(name)?)
    }

    /// Today's prices at every market, in map order.
    pub fn price_tables(&self) -> Vec<PriceTable> {
        let map = self.colony.map();
        map.harbors()
            .into_iter()
            .filter_map(|id| {
                map.market(id).map(|market| PriceTable {
                    harbor: map.name_of(id).to_string(),
                    entries: market.price_list(),
                })
            })
            .collect()
    }
}

fn describe_request(request: &PurchaseRequest) -> String {
    match request {
        PurchaseRequest::Boat { class, name } => format!("the {class} boat {name}"),
        PurchaseRequest::Course { skill } => format!("a {skill} course"),
        PurchaseRequest::Rations { count } => format!("{count} rations"),
        PurchaseRequest::Nets { count } => format!("{count} nets"),
        PurchaseRequest::Unknown => "an unknown item".to_string(),
    }
}
