use std::ops::Range;

use rand::Rng;

use crate::journal::{Entry, Journal};
use crate::types::{Good, GoodTable, Money, Quantity};

// === PRICING CONSTANTS ===

pub const MIN_PRICE: Money = 1.0;
/// Supply strictly below this raises the price.
pub const LOW_SUPPLY: Quantity = 50;
/// Supply strictly above this lowers the price.
pub const HIGH_SUPPLY: Quantity = 100;
/// Half-open range of the integer step applied by supply-driven pricing.
pub const PRICE_STEP: Range<u32> = 1..4;
/// Half-open range of the integer change applied by the random walk.
pub const RANDOM_WALK_STEP: Range<i32> = -2..3;

/// Shared price and supply table every actor and producer trades against.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSupplyLedger {
    prices: GoodTable<Money>,
    supply: GoodTable<Quantity>,
    inflation_rate: f64,
}

impl Default for PriceSupplyLedger {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl PriceSupplyLedger {
    /// Every good starts at the minimum price with no supply.
    pub fn new(inflation_rate: f64) -> Self {
        Self {
            prices: GoodTable::splat(MIN_PRICE),
            supply: GoodTable::splat(0),
            inflation_rate,
        }
    }

    pub fn with_good(mut self, good: Good, price: Money, supply: Quantity) -> Self {
        self.set_price(good, price);
        self.supply[good] = supply;
        self
    }

    pub fn price(&self, good: Good) -> Money {
        self.prices[good]
    }

    pub fn supply(&self, good: Good) -> Quantity {
        self.supply[good]
    }

    pub fn inflation_rate(&self) -> f64 {
        self.inflation_rate
    }

    pub fn prices(&self) -> &GoodTable<Money> {
        &self.prices
    }

    pub fn supplies(&self) -> &GoodTable<Quantity> {
        &self.supply
    }

    pub fn set_price(&mut self, good: Good, price: Money) {
        self.prices[good] = price.max(MIN_PRICE);
    }

    pub fn add_supply(&mut self, good: Good, quantity: Quantity) {
        self.supply[good] = self.supply[good].saturating_add(quantity);
    }

    /// Remove up to `quantity` units, returning how many were actually taken.
    pub fn take_supply(&mut self, good: Good, quantity: Quantity) -> Quantity {
        let taken = quantity.min(self.supply[good]);
        self.supply[good] -= taken;
        taken
    }

    /// Draw every good's price uniformly from the integers in `range`.
    pub fn randomize_prices<R: Rng>(&mut self, rng: &mut R, range: Range<u32>) {
        for good in Good::all() {
            let price: u32 = rng.random_range(range.clone());
            self.set_price(good, f64::from(price));
        }
    }

    /// Supply-driven pricing followed by inflation.
    ///
    /// Scarce goods (supply below [`LOW_SUPPLY`]) rise by a random step,
    /// plentiful goods (above [`HIGH_SUPPLY`]) fall by a random step, floored at
    /// [`MIN_PRICE`]. Inflation then compounds every good, whichever branch
    /// (if any) fired.
    pub fn adjust_prices<R: Rng>(&mut self, rng: &mut R, journal: &mut Journal) {
        for good in Good::all() {
            let supply = self.supply[good];
            let mut price = self.prices[good];

            if supply < LOW_SUPPLY {
                let step: u32 = rng.random_range(PRICE_STEP);
                price += f64::from(step);
            } else if supply > HIGH_SUPPLY {
                let step: u32 = rng.random_range(PRICE_STEP);
                price = (price - f64::from(step)).max(MIN_PRICE);
            }

            price = (price * (1.0 + self.inflation_rate)).max(MIN_PRICE);
            self.prices[good] = price;

            journal.record(Entry::PriceAdjusted {
                good,
                price,
                supply: Some(supply),
            });
        }
    }

    /// Supply-blind fluctuation: each price moves by an integer in
    /// [`RANDOM_WALK_STEP`], floored at [`MIN_PRICE`]. No inflation.
    pub fn random_walk<R: Rng>(&mut self, rng: &mut R, journal: &mut Journal) {
        for good in Good::all() {
            let change: i32 = rng.random_range(RANDOM_WALK_STEP);
            let price = (self.prices[good] + f64::from(change)).max(MIN_PRICE);
            self.prices[good] = price;

            journal.record(Entry::PriceAdjusted {
                good,
                price,
                supply: None,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn food_ledger(price: Money, supply: Quantity, inflation_rate: f64) -> PriceSupplyLedger {
        PriceSupplyLedger::new(inflation_rate)
            .with_good(Good::Food, price, supply)
            .with_good(Good::Tools, 15.0, 75)
    }

    #[test]
    fn boundary_supply_only_inflates() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut journal = Journal::new();

        for supply in [LOW_SUPPLY, HIGH_SUPPLY] {
            let mut ledger = food_ledger(10.0, supply, 0.02);
            ledger.adjust_prices(&mut rng, &mut journal);
            assert!((ledger.price(Good::Food) - 10.2).abs() < 1e-9);
            assert_eq!(ledger.supply(Good::Food), supply);
        }
    }

    #[test]
    fn scarce_supply_raises_price_by_a_step() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut journal = Journal::new();

        for _ in 0..50 {
            let mut ledger = food_ledger(10.0, 10, 0.0);
            ledger.adjust_prices(&mut rng, &mut journal);
            let rise = ledger.price(Good::Food) - 10.0;
            assert!((1.0..=3.0).contains(&rise), "rise {rise} outside [1, 3]");
            assert_eq!(rise.fract(), 0.0);
        }
    }

    #[test]
    fn glut_lowers_price_but_never_below_floor() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut journal = Journal::new();
        let mut ledger = food_ledger(5.0, 500, 0.0);

        for _ in 0..20 {
            ledger.adjust_prices(&mut rng, &mut journal);
            assert!(ledger.price(Good::Food) >= MIN_PRICE);
        }
        assert_eq!(ledger.price(Good::Food), MIN_PRICE);
    }

    #[test]
    fn glut_lowers_price_by_a_step() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut journal = Journal::new();

        for _ in 0..50 {
            let mut ledger = food_ledger(50.0, 500, 0.0);
            ledger.adjust_prices(&mut rng, &mut journal);
            let drop = 50.0 - ledger.price(Good::Food);
            assert!((1.0..=3.0).contains(&drop));
        }
    }

    #[test]
    fn adjust_records_one_entry_per_good() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut journal = Journal::new();
        let mut ledger = food_ledger(10.0, 100, 0.02);

        ledger.adjust_prices(&mut rng, &mut journal);

        let goods: Vec<Good> = journal
            .entries()
            .iter()
            .filter_map(|e| match e {
                Entry::PriceAdjusted { good, supply, .. } => {
                    assert!(supply.is_some());
                    Some(*good)
                }
                _ => None,
            })
            .collect();
        assert_eq!(goods, vec![Good::Food, Good::Tools]);
    }

    #[test]
    fn take_supply_saturates_at_zero() {
        let mut ledger = food_ledger(10.0, 3, 0.0);
        assert_eq!(ledger.take_supply(Good::Food, 5), 3);
        assert_eq!(ledger.supply(Good::Food), 0);
        assert_eq!(ledger.take_supply(Good::Food, 1), 0);
    }

    #[test]
    fn random_walk_stays_within_two_and_above_floor() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut journal = Journal::new();
        let mut ledger = food_ledger(2.0, 0, 0.5);

        for _ in 0..200 {
            let before = ledger.price(Good::Food);
            ledger.random_walk(&mut rng, &mut journal);
            let after = ledger.price(Good::Food);
            assert!(after >= MIN_PRICE);
            assert!((after - before).abs() <= 2.0);
        }
        assert_eq!(ledger.supply(Good::Food), 0);
    }

    #[test]
    fn randomized_prices_fall_in_range() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut ledger = PriceSupplyLedger::default();
        ledger.randomize_prices(&mut rng, 5..21);
        for (_, price) in ledger.prices().iter() {
            assert!((5.0..21.0).contains(price));
        }
    }
}
