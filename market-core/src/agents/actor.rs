use rand::Rng;

use crate::agents::needs::{Needs, Relief};
use crate::journal::{Entry, Journal};
use crate::ledger::PriceSupplyLedger;
use crate::types::{Good, GoodTable, Money, ProducerId, Quantity};

/// Savings spent on one stake in a producer.
pub const INVESTMENT_STAKE: Money = 100.0;
/// Half-open range of the quantity picked by a random trade.
pub const RANDOM_TRADE_QUANTITY: std::ops::Range<Quantity> = 1..5;

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub title: String,
    pub salary: Money,
}

/// An agent that earns, saves, invests and buys goods to relieve its needs.
#[derive(Debug, Clone)]
pub struct EconomicActor {
    pub name: String,
    /// Never negative: purchases that cannot be paid in full are rejected.
    pub money: Money,
    pub inventory: GoodTable<Quantity>,
    pub needs: Needs,
    pub job: Option<Job>,
    /// Preference weight per good, each in [0, 1].
    pub preferences: GoodTable<f64>,
    pub savings: Money,
    /// Fraction of each salary moved into savings.
    pub savings_rate: f64,
    /// Producers invested in; repeats mean repeated stakes.
    pub investments: Vec<ProducerId>,
}

impl EconomicActor {
    pub fn new(name: impl Into<String>, money: Money) -> Self {
        Self {
            name: name.into(),
            money,
            inventory: GoodTable::splat(0),
            needs: Needs::default(),
            job: None,
            preferences: GoodTable::splat(0.5),
            savings: 0.0,
            savings_rate: 0.0,
            investments: Vec::new(),
        }
    }

    pub fn with_job(mut self, title: impl Into<String>, salary: Money) -> Self {
        self.job = Some(Job {
            title: title.into(),
            salary,
        });
        self
    }

    pub fn with_needs(mut self, hunger: f64, productivity: f64) -> Self {
        self.needs = Needs::new(hunger, productivity);
        self
    }

    pub fn with_preferences(mut self, food: f64, tools: f64) -> Self {
        self.preferences[Good::Food] = food;
        self.preferences[Good::Tools] = tools;
        self
    }

    pub fn with_savings(mut self, savings: Money) -> Self {
        self.savings = savings;
        self
    }

    pub fn with_savings_rate(mut self, rate: f64) -> Self {
        self.savings_rate = rate;
        self
    }

    pub fn with_inventory(mut self, good: Good, quantity: Quantity) -> Self {
        self.inventory[good] = quantity;
        self
    }

    /// Does this actor prefer `good` strictly over the competing good?
    pub fn prefers(&self, good: Good) -> bool {
        self.preferences[good] > self.preferences[good.other()]
    }

    // === TRADING ===

    /// Pay `quantity * price` and take the goods, or do nothing if the money
    /// does not cover it. Returns the quantity actually bought.
    pub fn buy(
        &mut self,
        good: Good,
        quantity: Quantity,
        price: Money,
        journal: &mut Journal,
    ) -> Quantity {
        let cost = f64::from(quantity) * price;
        if self.money < cost {
            return 0;
        }

        self.money -= cost;
        self.inventory[good] += quantity;
        journal.record(Entry::Bought {
            actor: self.name.clone(),
            good,
            quantity,
            cost,
        });
        quantity
    }

    /// Hand over `quantity` units for `quantity * price`, or do nothing if the
    /// inventory is short. Returns the quantity actually sold.
    pub fn sell(
        &mut self,
        good: Good,
        quantity: Quantity,
        price: Money,
        journal: &mut Journal,
    ) -> Quantity {
        if self.inventory[good] < quantity {
            return 0;
        }

        let revenue = f64::from(quantity) * price;
        self.inventory[good] -= quantity;
        self.money += revenue;
        journal.record(Entry::Sold {
            actor: self.name.clone(),
            good,
            quantity,
            revenue,
        });
        quantity
    }

    /// Buy or sell a random quantity of a random good at the ledger price,
    /// reporting refusals. Ledger supply is left alone.
    pub fn random_action<R: Rng>(
        &mut self,
        rng: &mut R,
        ledger: &PriceSupplyLedger,
        journal: &mut Journal,
    ) {
        let good = Good::ALL[rng.random_range(0..Good::COUNT)];
        let price = ledger.price(good);
        let quantity: Quantity = rng.random_range(RANDOM_TRADE_QUANTITY);

        if rng.random_bool(0.5) {
            if self.buy(good, quantity, price, journal) == 0 {
                journal.record(Entry::CannotAfford {
                    actor: self.name.clone(),
                    good,
                    quantity,
                });
            }
        } else if self.sell(good, quantity, price, journal) == 0 {
            journal.record(Entry::CannotSell {
                actor: self.name.clone(),
                good,
                quantity,
            });
        }
    }

    // === INCOME ===

    /// Split the salary between savings and spendable money. No-op without a job.
    pub fn earn_salary(&mut self, journal: &mut Journal) {
        let Some(job) = &self.job else {
            return;
        };

        let saved = job.salary * self.savings_rate;
        self.savings += saved;
        self.money += job.salary - saved;
        journal.record(Entry::EarnedSalary {
            actor: self.name.clone(),
            job: job.title.clone(),
            salary: job.salary,
            saved,
        });
    }

    pub fn can_invest(&self) -> bool {
        self.savings > INVESTMENT_STAKE
    }

    /// Move one stake out of savings into `producer`. The caller registers the
    /// actor with the producer when this returns true.
    pub fn invest_in_company(&mut self, producer: ProducerId) -> bool {
        if !self.can_invest() {
            return false;
        }

        self.savings -= INVESTMENT_STAKE;
        self.investments.push(producer);
        true
    }

    pub fn receive_dividends(&mut self, amount: Money) {
        self.money += amount;
    }

    // === CONSUMPTION ===

    /// Buy from the ledger to relieve pressing needs, food before tools.
    ///
    /// A good is bought only when its need is above the threshold, at least
    /// one unit is affordable, and the actor strictly prefers it over the
    /// other good. Needs and ledger supply drop only by what was actually
    /// bought, so a purchase that cannot be paid in full changes nothing.
    pub fn satisfy_needs(&mut self, ledger: &mut PriceSupplyLedger, journal: &mut Journal) {
        for good in Good::all() {
            self.satisfy_need(good, ledger, journal);
        }
    }

    fn satisfy_need(&mut self, good: Good, ledger: &mut PriceSupplyLedger, journal: &mut Journal) {
        let price = ledger.price(good);
        if !self.needs.is_pressing(good) || self.money < price || !self.prefers(good) {
            return;
        }

        let relief = Relief::for_good(good);
        let quantity = relief
            .units_wanted(self.needs.level(good))
            .min(ledger.supply(good));
        if quantity == 0 {
            return;
        }

        let bought = self.buy(good, quantity, price, journal);
        let taken = ledger.take_supply(good, bought);
        *self.needs.level_mut(good) -= relief.per_unit * f64::from(taken);
    }

    // === REPORTING ===

    pub fn report_money(&self, journal: &mut Journal) {
        journal.record(Entry::MoneyStatus {
            actor: self.name.clone(),
            money: self.money,
        });
    }

    pub fn report_status(&self, journal: &mut Journal) {
        journal.record(Entry::ActorStatus {
            actor: self.name.clone(),
            money: self.money,
            savings: self.savings,
            hunger: self.needs.hunger,
            productivity: self.needs.productivity,
            food: self.inventory[Good::Food],
            tools: self.inventory[Good::Tools],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use slotmap::KeyData;

    fn market(food_price: Money, food_supply: Quantity) -> PriceSupplyLedger {
        PriceSupplyLedger::new(0.02)
            .with_good(Good::Food, food_price, food_supply)
            .with_good(Good::Tools, 15.0, 50)
    }

    fn producer_id(n: u64) -> ProducerId {
        ProducerId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn salary_split_between_savings_and_money() {
        let mut journal = Journal::new();
        let mut actor = EconomicActor::new("Bob", 150.0)
            .with_job("Blacksmith", 70.0)
            .with_savings_rate(0.3);

        actor.earn_salary(&mut journal);

        assert!((actor.savings - 21.0).abs() < 1e-9);
        assert!((actor.money - 199.0).abs() < 1e-9);
        assert_eq!(journal.entries().len(), 1);
    }

    #[test]
    fn unemployed_earns_nothing() {
        let mut journal = Journal::new();
        let mut actor = EconomicActor::new("Idle", 10.0).with_savings_rate(0.5);
        actor.earn_salary(&mut journal);
        assert_eq!(actor.money, 10.0);
        assert_eq!(actor.savings, 0.0);
        assert!(journal.is_empty());
    }

    #[test]
    fn investing_requires_savings_strictly_above_stake() {
        let mut actor = EconomicActor::new("Alice", 0.0).with_savings(100.0);
        assert!(!actor.invest_in_company(producer_id(1)));
        assert_eq!(actor.savings, 100.0);
        assert!(actor.investments.is_empty());

        actor.savings = 100.5;
        assert!(actor.invest_in_company(producer_id(1)));
        assert!((actor.savings - 0.5).abs() < 1e-9);
        assert_eq!(actor.investments, vec![producer_id(1)]);
    }

    #[test]
    fn hungry_actor_buys_food_up_to_hunger() {
        let mut journal = Journal::new();
        let mut ledger = market(10.0, 100);
        let mut actor = EconomicActor::new("Alice", 100.0)
            .with_needs(60.0, 40.0)
            .with_preferences(0.8, 0.2);

        actor.satisfy_needs(&mut ledger, &mut journal);

        assert_eq!(actor.inventory[Good::Food], 6);
        assert_eq!(actor.money, 40.0);
        assert_eq!(actor.needs.hunger, 0.0);
        assert_eq!(ledger.supply(Good::Food), 94);
        assert_eq!(ledger.supply(Good::Tools), 50);
    }

    #[test]
    fn food_purchase_limited_by_supply() {
        let mut journal = Journal::new();
        let mut ledger = market(10.0, 2);
        let mut actor = EconomicActor::new("Alice", 100.0)
            .with_needs(90.0, 0.0)
            .with_preferences(1.0, 0.0);

        actor.satisfy_needs(&mut ledger, &mut journal);

        assert_eq!(actor.inventory[Good::Food], 2);
        assert_eq!(actor.needs.hunger, 70.0);
        assert_eq!(ledger.supply(Good::Food), 0);
    }

    #[test]
    fn unaffordable_bulk_purchase_leaves_everything_unchanged() {
        let mut journal = Journal::new();
        let mut ledger = market(10.0, 100);
        let mut actor = EconomicActor::new("Poor", 15.0)
            .with_needs(60.0, 0.0)
            .with_preferences(0.9, 0.1);

        actor.satisfy_needs(&mut ledger, &mut journal);

        assert_eq!(actor.money, 15.0);
        assert_eq!(actor.needs.hunger, 60.0);
        assert_eq!(actor.inventory[Good::Food], 0);
        assert_eq!(ledger.supply(Good::Food), 100);
        assert!(journal.is_empty());
    }

    #[test]
    fn tools_bought_one_at_a_time() {
        let mut journal = Journal::new();
        let mut ledger = market(10.0, 100);
        let mut actor = EconomicActor::new("Bob", 150.0)
            .with_needs(40.0, 95.0)
            .with_preferences(0.3, 0.7);

        actor.satisfy_needs(&mut ledger, &mut journal);

        assert_eq!(actor.inventory[Good::Tools], 1);
        assert_eq!(actor.needs.productivity, 75.0);
        assert_eq!(actor.money, 135.0);
        assert_eq!(ledger.supply(Good::Tools), 49);
    }

    #[test]
    fn tools_skipped_when_out_of_stock() {
        let mut journal = Journal::new();
        let mut ledger = PriceSupplyLedger::new(0.02)
            .with_good(Good::Food, 10.0, 100)
            .with_good(Good::Tools, 15.0, 0);
        let mut actor = EconomicActor::new("Bob", 100.0)
            .with_needs(40.0, 90.0)
            .with_preferences(0.3, 0.7);

        actor.satisfy_needs(&mut ledger, &mut journal);

        assert_eq!(actor.money, 100.0);
        assert_eq!(actor.needs.productivity, 90.0);
        assert_eq!(actor.inventory[Good::Tools], 0);
        assert_eq!(ledger.supply(Good::Tools), 0);
        assert!(journal.is_empty());
    }

    #[test]
    fn tied_preferences_block_both_goods() {
        let mut journal = Journal::new();
        let mut ledger = market(10.0, 100);
        let mut actor = EconomicActor::new("Torn", 500.0)
            .with_needs(90.0, 90.0)
            .with_preferences(0.5, 0.5);

        actor.satisfy_needs(&mut ledger, &mut journal);

        assert_eq!(actor.money, 500.0);
        assert_eq!(actor.inventory, GoodTable::splat(0));
    }

    #[test]
    fn sell_requires_inventory() {
        let mut journal = Journal::new();
        let mut actor = EconomicActor::new("Alice", 0.0).with_inventory(Good::Tools, 2);

        assert_eq!(actor.sell(Good::Tools, 3, 10.0, &mut journal), 0);
        assert_eq!(actor.sell(Good::Tools, 2, 10.0, &mut journal), 2);
        assert_eq!(actor.money, 20.0);
        assert_eq!(actor.inventory[Good::Tools], 0);
    }

    #[test]
    fn random_actions_never_overdraw() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut journal = Journal::new();
        let ledger = market(12.0, 0);
        let mut actor = EconomicActor::new("Alice", 100.0);

        for _ in 0..200 {
            actor.random_action(&mut rng, &ledger, &mut journal);
            assert!(actor.money >= 0.0);
        }
        // every action leaves exactly one line: a trade or a refusal
        assert_eq!(journal.entries().len(), 200);
    }
}
