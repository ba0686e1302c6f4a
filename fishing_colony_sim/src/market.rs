// Market engine: daily pricing and validated sales at a harbor.
//
// Every harbor with a market owns one `Market`. Fixed prices (nets, repairs,
// skill courses, boats) come from the `GameConfig` the market was built
// from; fish and ration prices are rolled again every dawn by `reprice`.
//
// Every `sell_*` operation is atomic: the fisher is debited and the good is
// granted together, or the call returns a `TradeError` and nothing changed.
// `buy_fish` is the exception that proves the rule; it always empties the
// hold, because the catch has been handed over whether or not anyone is
// left to collect the proceeds.
//
// See also: `config.rs` for `PriceConfig` and the boat catalog,
// `game.rs` which routes purchase requests here.

use crate::boat::Boat;
use crate::config::{BoatSpec, GameConfig, PriceConfig};
use crate::dice::Dice;
use crate::error::TradeError;
use crate::fisher::Fisher;
use crate::types::{BoatClass, BoatId, SkillKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One line of a market's price table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceItem {
    Net,
    Repair,
    Ration,
    /// Price paid per kilogram of fish.
    Fish,
    /// Course that raises a skill to the given level.
    Course(u8),
    Boat(BoatClass),
}

impl fmt::Display for PriceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Net => write!(f, "net"),
            Self::Repair => write!(f, "repair"),
            Self::Ration => write!(f, "ration"),
            Self::Fish => write!(f, "fish (per kg)"),
            Self::Course(level) => write!(f, "level {level} course"),
            Self::Boat(class) => write!(f, "{class} boat"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub item: PriceItem,
    pub price: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Market {
    prices: PriceConfig,
    catalog: BTreeMap<BoatClass, BoatSpec>,
    fish_price: i64,
    ration_price: i64,
}

impl Default for Market {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

impl Market {
    /// Open a market with the config's fixed prices. Daily prices start at
    /// the lowest a die could make them until the first `reprice`.
    pub fn new(config: &GameConfig) -> Self {
        let prices = config.prices.clone();
        Self {
            fish_price: prices.fish_base + prices.fish_per_pip,
            ration_price: prices.ration_base + prices.ration_per_pip,
            catalog: config.boat_catalog.clone(),
            prices,
        }
    }

    /// Roll today's fish and ration prices.
    pub fn reprice(&mut self, dice: &mut impl Dice) {
        self.ration_price = self.prices.ration_base + self.prices.ration_per_pip * i64::from(dice.d6());
        self.fish_price = self.prices.fish_base + self.prices.fish_per_pip * i64::from(dice.d6());
    }

    pub fn fish_price(&self) -> i64 {
        self.fish_price
    }

    pub fn ration_price(&self) -> i64 {
        self.ration_price
    }

    pub fn net_price(&self) -> i64 {
        self.prices.net
    }

    /// Price of the course that takes a skill from `level` to `level + 1`,
    /// or `None` if no such course is taught.
    pub fn course_price(&self, level: u8) -> Option<i64> {
        self.prices.course_prices.get(usize::from(level) + 1).copied()
    }

    /// Highest level any course teaches.
    pub fn highest_course(&self) -> u8 {
        u8::try_from(self.prices.course_prices.len().saturating_sub(1)).unwrap_or(u8::MAX)
    }

    pub fn boat_spec(&self, class: BoatClass) -> Option<&BoatSpec> {
        self.catalog.get(&class)
    }

    /// Today's price table, in the order it is shown to the fishers.
    pub fn price_list(&self) -> Vec<PriceEntry> {
        let mut entries = vec![
            PriceEntry {
                item: PriceItem::Net,
                price: self.prices.net,
            },
            PriceEntry {
                item: PriceItem::Ration,
                price: self.ration_price,
            },
            PriceEntry {
                item: PriceItem::Fish,
                price: self.fish_price,
            },
        ];
        for (level, &price) in self.prices.course_prices.iter().enumerate().skip(1) {
            if let Ok(level) = u8::try_from(level) {
                entries.push(PriceEntry {
                    item: PriceItem::Course(level),
                    price,
                });
            }
        }
        entries.push(PriceEntry {
            item: PriceItem::Repair,
            price: self.prices.repair,
        });
        for (&class, spec) in &self.catalog {
            entries.push(PriceEntry {
                item: PriceItem::Boat(class),
                price: spec.price,
            });
        }
        entries
    }

    // -- Sales --------------------------------------------------------------

    fn charge(fisher: &mut Fisher, amount: i64) -> Result<(), TradeError> {
        if fisher.debit(amount) {
            Ok(())
        } else {
            Err(TradeError::InsufficientFunds {
                needed: amount,
                available: fisher.balance(),
            })
        }
    }

    /// Build a boat of `class` for `fisher`. The caller supplies a fresh id
    /// and a name it has already checked for uniqueness, and is responsible
    /// for registering and docking the returned boat.
    pub fn sell_boat(
        &self,
        fisher: &mut Fisher,
        class: BoatClass,
        id: BoatId,
        name: &str,
    ) -> Result<Boat, TradeError> {
        let spec = self
            .catalog
            .get(&class)
            .ok_or_else(|| TradeError::BoatClassUnavailable(class.to_string()))?;
        Self::charge(fisher, spec.price)?;
        fisher.add_boat(id);
        Ok(Boat::new(id, name, class, spec))
    }

    /// Sell `count` rations at today's price. Rations above the spoilage
    /// cap are paid for and lost.
    pub fn sell_rations(&self, fisher: &mut Fisher, count: u32) -> Result<i64, TradeError> {
        if count == 0 {
            return Err(TradeError::ZeroQuantity("rations"));
        }
        let cost = self.ration_price * i64::from(count);
        Self::charge(fisher, cost)?;
        fisher.add_rations(count);
        Ok(cost)
    }

    pub fn sell_nets(&self, fisher: &mut Fisher, count: u32) -> Result<i64, TradeError> {
        if count == 0 {
            return Err(TradeError::ZeroQuantity("nets"));
        }
        let cost = self.prices.net * i64::from(count);
        Self::charge(fisher, cost)?;
        fisher.add_nets(count);
        Ok(cost)
    }

    /// Sell the course that raises `skill` by one level. Returns the new
    /// level.
    pub fn sell_course(&self, fisher: &mut Fisher, skill: SkillKind) -> Result<u8, TradeError> {
        let level = fisher.skill(skill);
        let price = self.course_price(level).ok_or(TradeError::SkillAtMaximum {
            skill,
            level: self.highest_course(),
        })?;
        Self::charge(fisher, price)?;
        fisher.raise_skill(skill);
        Ok(fisher.skill(skill))
    }

    pub fn sell_navigation_course(&self, fisher: &mut Fisher) -> Result<u8, TradeError> {
        self.sell_course(fisher, SkillKind::Navigation)
    }

    pub fn sell_fishing_course(&self, fisher: &mut Fisher) -> Result<u8, TradeError> {
        self.sell_course(fisher, SkillKind::Fishing)
    }

    /// Buy the whole catch of a boat at today's price. The hold is emptied
    /// unconditionally; the returned amount is owed to the crew.
    pub fn buy_fish(&self, boat: &mut Boat) -> i64 {
        self.fish_price * i64::from(boat.unload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::types::FisherId;

    fn rich_fisher() -> Fisher {
        let mut fisher = Fisher::new(FisherId(0), "Ana");
        fisher.credit(2000);
        fisher
    }

    fn priced_market(ration_roll: i32, fish_roll: i32) -> Market {
        let mut market = Market::default();
        market.reprice(&mut ScriptedDice::new([ration_roll, fish_roll]));
        market
    }

    #[test]
    fn reprice_uses_one_die_each() {
        let market = priced_market(1, 6);
        assert_eq!(market.ration_price(), 10);
        assert_eq!(market.fish_price(), 15);
        let market = priced_market(6, 1);
        assert_eq!(market.ration_price(), 20);
        assert_eq!(market.fish_price(), 5);
    }

    #[test]
    fn daily_prices_stay_in_range() {
        let mut market = Market::default();
        let mut rng = crate::prng::GameRng::new(8);
        for _ in 0..200 {
            market.reprice(&mut rng);
            assert!((10..=20).contains(&market.ration_price()));
            assert!((5..=15).contains(&market.fish_price()));
        }
    }

    #[test]
    fn price_list_covers_every_good() {
        let market = priced_market(2, 3);
        let list = market.price_list();
        let price_of = |item| list.iter().find(|e| e.item == item).map(|e| e.price);
        assert_eq!(price_of(PriceItem::Net), Some(300));
        assert_eq!(price_of(PriceItem::Ration), Some(12));
        assert_eq!(price_of(PriceItem::Fish), Some(9));
        assert_eq!(price_of(PriceItem::Course(1)), Some(200));
        assert_eq!(price_of(PriceItem::Course(3)), Some(800));
        assert_eq!(price_of(PriceItem::Course(4)), None);
        assert_eq!(price_of(PriceItem::Repair), Some(200));
        assert_eq!(price_of(PriceItem::Boat(BoatClass::Basic)), Some(1000));
        assert_eq!(price_of(PriceItem::Boat(BoatClass::Reinforced)), Some(1950));
        assert_eq!(PriceItem::Course(2).to_string(), "level 2 course");
        assert_eq!(PriceItem::Boat(BoatClass::Reinforced).to_string(), "reinforced boat");
    }

    #[test]
    fn course_price_tracks_next_level() {
        let market = Market::default();
        let mut fisher = Fisher::new(FisherId(1), "Beto");
        fisher.credit(10_000);
        let mut spent = 0;
        for expected in 1..=3u8 {
            let before = fisher.balance();
            assert_eq!(market.sell_navigation_course(&mut fisher), Ok(expected));
            spent += before - fisher.balance();
            assert_eq!(before - fisher.balance(), [0, 200, 500, 800][usize::from(expected)]);
        }
        assert_eq!(spent, 1500);

        let before = fisher.balance();
        assert_eq!(
            market.sell_navigation_course(&mut fisher),
            Err(TradeError::SkillAtMaximum {
                skill: SkillKind::Navigation,
                level: 3
            })
        );
        assert_eq!(fisher.balance(), before);
        assert_eq!(fisher.navigation(), 3);
    }

    #[test]
    fn failed_sales_change_nothing() {
        let market = priced_market(3, 3);
        let mut fisher = Fisher::new(FisherId(2), "Caio");
        fisher.credit(250);

        assert!(matches!(
            market.sell_nets(&mut fisher, 1),
            Err(TradeError::InsufficientFunds {
                needed: 300,
                available: 250
            })
        ));
        assert!(market.sell_fishing_course(&mut fisher).is_ok());
        assert!(market.sell_fishing_course(&mut fisher).is_err());
        assert!(market.sell_boat(&mut fisher, BoatClass::Basic, BoatId(0), "Saga").is_err());
        assert_eq!(fisher.balance(), 50);
        assert_eq!(fisher.fishing(), 1);
        assert_eq!(fisher.nets(), 0);
        assert!(fisher.boats().is_empty());
    }

    #[test]
    fn zero_quantities_are_not_sold() {
        let market = priced_market(3, 3);
        let mut fisher = rich_fisher();
        assert_eq!(
            market.sell_rations(&mut fisher, 0),
            Err(TradeError::ZeroQuantity("rations"))
        );
        assert_eq!(market.sell_nets(&mut fisher, 0), Err(TradeError::ZeroQuantity("nets")));
        assert_eq!(fisher.balance(), 2000);
        assert_eq!(fisher.rations(), 0);
        assert_eq!(fisher.nets(), 0);
    }

    #[test]
    fn rations_above_cap_are_paid_for() {
        let market = priced_market(1, 1);
        let mut fisher = rich_fisher();
        fisher.add_rations(10);
        assert_eq!(market.sell_rations(&mut fisher, 5), Ok(50));
        assert_eq!(fisher.rations(), 12);
        assert_eq!(fisher.balance(), 1950);
    }

    #[test]
    fn boat_sale_grants_ownership() {
        let market = Market::default();
        let mut fisher = rich_fisher();
        let boat = market
            .sell_boat(&mut fisher, BoatClass::Basic, BoatId(7), "Saga")
            .unwrap();
        assert_eq!(boat.id, BoatId(7));
        assert_eq!(boat.name, "Saga");
        assert_eq!(boat.cargo_capacity, 150);
        assert_eq!(fisher.boats(), &[BoatId(7)]);
        assert_eq!(fisher.balance(), 1000);
    }

    #[test]
    fn missing_boat_class_is_refused() {
        let mut config = GameConfig::default();
        config.boat_catalog.remove(&BoatClass::Reinforced);
        let market = Market::new(&config);
        let mut fisher = rich_fisher();
        assert_eq!(
            market
                .sell_boat(&mut fisher, BoatClass::Reinforced, BoatId(0), "Fortuna")
                .map(|b| b.name),
            Err(TradeError::BoatClassUnavailable("reinforced".to_string()))
        );
        assert_eq!(fisher.balance(), 2000);
    }

    #[test]
    fn buying_fish_empties_the_hold() {
        let market = priced_market(1, 4);
        let config = GameConfig::default();
        let spec = config.boat_spec(BoatClass::Basic).unwrap();
        let mut boat = Boat::new(BoatId(0), "Saga", BoatClass::Basic, spec);
        boat.load(40);
        assert_eq!(market.buy_fish(&mut boat), 40 * 11);
        assert_eq!(boat.cargo(), 0);
        assert_eq!(market.buy_fish(&mut boat), 0);
    }
}
