// Producers: per-round output into the ledger and dividends to investors

use std::ops::Range;

use rand::Rng;
use slotmap::SlotMap;

use crate::agents::EconomicActor;
use crate::journal::{Entry, Journal};
use crate::ledger::PriceSupplyLedger;
use crate::types::{ActorId, Good, Money, Quantity};

/// Half-open range of the per-round dividend, shared by every investor.
pub const DIVIDEND: Range<u32> = 1..6;

/// A company producing a single good.
#[derive(Debug, Clone)]
pub struct Producer {
    pub name: String,
    pub good: Good,
    /// Exclusive upper bound on the random per-round output.
    pub capacity: Quantity,
    /// Not used by pricing.
    pub production_cost: Money,
    /// May hold the same actor more than once; each slot earns a dividend.
    pub investors: Vec<ActorId>,
}

impl Producer {
    pub fn new(name: impl Into<String>, good: Good, capacity: Quantity) -> Self {
        Self {
            name: name.into(),
            good,
            capacity,
            production_cost: 0.0,
            investors: Vec::new(),
        }
    }

    pub fn with_production_cost(mut self, cost: Money) -> Self {
        self.production_cost = cost;
        self
    }

    pub fn add_investor(&mut self, actor: ActorId) {
        self.investors.push(actor);
    }

    /// Produce a uniform quantity in `[1, capacity)` into the ledger.
    ///
    /// The range is empty when capacity is 1 or less; nothing is produced and
    /// no random number is drawn.
    pub fn produce_goods<R: Rng>(
        &self,
        rng: &mut R,
        ledger: &mut PriceSupplyLedger,
        journal: &mut Journal,
    ) -> Quantity {
        let quantity = if self.capacity > 1 {
            rng.random_range(1..self.capacity)
        } else {
            0
        };

        ledger.add_supply(self.good, quantity);
        journal.record(Entry::Produced {
            producer: self.name.clone(),
            good: self.good,
            quantity,
        });
        quantity
    }

    pub fn draw_dividend<R: Rng>(&self, rng: &mut R) -> Money {
        let amount: u32 = rng.random_range(DIVIDEND);
        f64::from(amount)
    }

    /// Draw one dividend and credit it to every investor slot.
    ///
    /// The draw happens even without investors so the random sequence does not
    /// depend on who has invested. Investor ids no longer in `actors` are
    /// skipped. Returns the per-investor amount.
    pub fn pay_dividends<R: Rng>(
        &self,
        rng: &mut R,
        actors: &mut SlotMap<ActorId, EconomicActor>,
        journal: &mut Journal,
    ) -> Money {
        let amount = self.draw_dividend(rng);

        for &investor in &self.investors {
            let Some(actor) = actors.get_mut(investor) else {
                continue;
            };
            actor.receive_dividends(amount);
            journal.record(Entry::DividendPaid {
                producer: self.name.clone(),
                actor: actor.name.clone(),
                amount,
            });
        }

        amount
    }
}
