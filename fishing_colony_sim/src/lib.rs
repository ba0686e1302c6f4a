// fishing_colony_sim — pure Rust simulation library.
//
// This crate contains all simulation logic for the fishing colony: the sea
// map, fishers and boats, the per-harbor markets, the dice-driven hazard and
// fishing checks, and the day cycle that sails boats through a day's work.
// It has no presentation dependencies; whatever shows the game to a human
// (a window, a terminal, a test harness) only calls `Game` operations and
// renders the `GameEvent`s they return.
//
// Module overview:
// - `game.rs`:     Top-level `Game` façade and the `DayPhase` state machine.
// - `colony.rs`:   Entity registries (fishers, boats) plus the harbor/crew
//                  membership bookkeeping.
// - `journey.rs`:  Journey choices, the pending-journey stack, and the
//                  execution engine that applies a day at sea.
// - `market.rs`:   Daily prices and validated buy/sell operations.
// - `hazard.rs`:   Navigational hazards and their skill check.
// - `fishing.rs`:  Fishing grounds and the net-cast check.
// - `world.rs`:    `SeaMap` — positions, directed routes, harbors, projection.
// - `map_load.rs`: Map description records and the section-ordered loader.
// - `fisher.rs`:   `Fisher` — money, rations, nets, skills, owned boats.
// - `boat.rs`:     `Boat` — crew, cargo, hull, delay.
// - `command.rs`:  Decisions supplied by the presentation layer.
// - `event.rs`:    Narrative `GameEvent`s and the coordinate directive.
// - `report.rs`:   Read-only snapshots (inventories, boat status, prices).
// - `config.rs`:   `GameConfig` — every tunable number.
// - `error.rs`:    `TradeError`, `MapProblem`, `SetupError`.
// - `dice.rs`:     `Dice` trait, implemented by the PRNG and by `ScriptedDice`.
// - `types.rs`:    Entity IDs, `BoatClass`, `SkillKind`, coordinates.
// - `prng`:        Re-exported from `fishing_colony_prng`.
//
// **Critical constraint: determinism.** The game is a function of
// `(map, config, seed, decisions)`. All randomness flows through a `Dice`
// value owned by the `Game`. No `HashMap`, no system time. Use `BTreeMap` for
// registries so iteration order is stable.

pub mod boat;
pub mod colony;
pub mod command;
pub mod config;
pub mod dice;
pub mod error;
pub mod event;
pub mod fisher;
pub mod fishing;
pub mod game;
pub mod hazard;
pub mod journey;
pub mod map_load;
pub mod market;
pub use fishing_colony_prng as prng;
pub mod report;
pub mod types;
pub mod world;
