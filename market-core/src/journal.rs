//! Round-by-round record of everything the simulation does.
//!
//! Each [`Entry`] renders as one human-readable console line. With the
//! `instrument` feature enabled, every recorded entry is also emitted as a
//! structured `tracing` event whose target names the entry kind, so tests and
//! tooling can collect them into tables.

use std::fmt;

use crate::types::{Good, Money, Quantity};

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    RoundStarted {
        round: u32,
    },
    Bought {
        actor: String,
        good: Good,
        quantity: Quantity,
        cost: Money,
    },
    CannotAfford {
        actor: String,
        good: Good,
        quantity: Quantity,
    },
    Sold {
        actor: String,
        good: Good,
        quantity: Quantity,
        revenue: Money,
    },
    CannotSell {
        actor: String,
        good: Good,
        quantity: Quantity,
    },
    EarnedSalary {
        actor: String,
        job: String,
        salary: Money,
        saved: Money,
    },
    Invested {
        actor: String,
        producer: String,
        stake: Money,
    },
    Produced {
        producer: String,
        good: Good,
        quantity: Quantity,
    },
    DividendPaid {
        producer: String,
        actor: String,
        amount: Money,
    },
    /// `supply` is absent when pricing ignores supply (random walk).
    PriceAdjusted {
        good: Good,
        price: Money,
        supply: Option<Quantity>,
    },
    MoneyStatus {
        actor: String,
        money: Money,
    },
    ActorStatus {
        actor: String,
        money: Money,
        savings: Money,
        hunger: f64,
        productivity: f64,
        food: Quantity,
        tools: Quantity,
    },
}

impl Entry {
    /// Tracing target used when this entry is emitted as a structured event.
    pub fn kind(&self) -> &'static str {
        match self {
            Entry::RoundStarted { .. } => "round",
            Entry::Bought { .. } => "buy",
            Entry::CannotAfford { .. } | Entry::CannotSell { .. } => "refusal",
            Entry::Sold { .. } => "sell",
            Entry::EarnedSalary { .. } => "salary",
            Entry::Invested { .. } => "invest",
            Entry::Produced { .. } => "produce",
            Entry::DividendPaid { .. } => "dividend",
            Entry::PriceAdjusted { .. } => "price",
            Entry::MoneyStatus { .. } | Entry::ActorStatus { .. } => "status",
        }
    }

    #[cfg(feature = "instrument")]
    fn trace(&self, round: u32) {
        match self {
            Entry::RoundStarted { round } => {
                tracing::info!(target: "round", round = *round);
            }
            Entry::Bought {
                actor,
                good,
                quantity,
                cost,
            } => {
                tracing::info!(
                    target: "buy",
                    round = round,
                    actor = actor.as_str(),
                    good = good.name(),
                    quantity = *quantity,
                    cost = *cost,
                );
            }
            Entry::CannotAfford {
                actor,
                good,
                quantity,
            } => {
                tracing::info!(
                    target: "refusal",
                    round = round,
                    actor = actor.as_str(),
                    good = good.name(),
                    side = "buy",
                    quantity = *quantity,
                );
            }
            Entry::Sold {
                actor,
                good,
                quantity,
                revenue,
            } => {
                tracing::info!(
                    target: "sell",
                    round = round,
                    actor = actor.as_str(),
                    good = good.name(),
                    quantity = *quantity,
                    revenue = *revenue,
                );
            }
            Entry::CannotSell {
                actor,
                good,
                quantity,
            } => {
                tracing::info!(
                    target: "refusal",
                    round = round,
                    actor = actor.as_str(),
                    good = good.name(),
                    side = "sell",
                    quantity = *quantity,
                );
            }
            Entry::EarnedSalary {
                actor,
                job,
                salary,
                saved,
            } => {
                tracing::info!(
                    target: "salary",
                    round = round,
                    actor = actor.as_str(),
                    job = job.as_str(),
                    salary = *salary,
                    saved = *saved,
                );
            }
            Entry::Invested {
                actor,
                producer,
                stake,
            } => {
                tracing::info!(
                    target: "invest",
                    round = round,
                    actor = actor.as_str(),
                    producer = producer.as_str(),
                    stake = *stake,
                );
            }
            Entry::Produced {
                producer,
                good,
                quantity,
            } => {
                tracing::info!(
                    target: "produce",
                    round = round,
                    producer = producer.as_str(),
                    good = good.name(),
                    quantity = *quantity,
                );
            }
            Entry::DividendPaid {
                producer,
                actor,
                amount,
            } => {
                tracing::info!(
                    target: "dividend",
                    round = round,
                    producer = producer.as_str(),
                    actor = actor.as_str(),
                    amount = *amount,
                );
            }
            Entry::PriceAdjusted {
                good,
                price,
                supply,
            } => {
                tracing::info!(
                    target: "price",
                    round = round,
                    good = good.name(),
                    price = *price,
                    supply = *supply,
                );
            }
            Entry::MoneyStatus { actor, money } => {
                tracing::info!(
                    target: "status",
                    round = round,
                    actor = actor.as_str(),
                    money = *money,
                );
            }
            Entry::ActorStatus {
                actor,
                money,
                savings,
                hunger,
                productivity,
                food,
                tools,
            } => {
                tracing::info!(
                    target: "status",
                    round = round,
                    actor = actor.as_str(),
                    money = *money,
                    savings = *savings,
                    hunger = *hunger,
                    productivity = *productivity,
                    food = *food,
                    tools = *tools,
                );
            }
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::RoundStarted { round } => write!(f, "--- Round {round} ---"),
            Entry::Bought {
                actor,
                good,
                quantity,
                cost,
            } => write!(f, "{actor} bought {quantity} {good}(s) for {cost:.2} money."),
            Entry::CannotAfford {
                actor,
                good,
                quantity,
            } => write!(f, "{actor} cannot afford to buy {quantity} {good}(s)."),
            Entry::Sold {
                actor,
                good,
                quantity,
                revenue,
            } => write!(f, "{actor} sold {quantity} {good}(s) for {revenue:.2} money."),
            Entry::CannotSell { actor, good, .. } => {
                write!(f, "{actor} does not have enough {good}(s) to sell.")
            }
            Entry::EarnedSalary {
                actor,
                job,
                salary,
                saved,
            } => write!(
                f,
                "{actor} earned {salary:.2} as a {job} and saved {saved:.2}."
            ),
            Entry::Invested {
                actor,
                producer,
                stake,
            } => write!(f, "{actor} invested {stake:.2} in {producer}."),
            Entry::Produced {
                producer,
                good,
                quantity,
            } => write!(f, "{producer} produced {quantity} units of {good}."),
            Entry::DividendPaid {
                producer,
                actor,
                amount,
            } => write!(f, "{actor} received {amount:.2} in dividends from {producer}."),
            Entry::PriceAdjusted {
                good,
                price,
                supply: Some(supply),
            } => write!(
                f,
                "The price of {good} is now {price:.2} with a supply of {supply}."
            ),
            Entry::PriceAdjusted {
                good,
                price,
                supply: None,
            } => write!(f, "The price of {good} is now {price:.2}."),
            Entry::MoneyStatus { actor, money } => {
                write!(f, "{actor} has {money:.2} money remaining.")
            }
            Entry::ActorStatus {
                actor,
                money,
                savings,
                hunger,
                productivity,
                food,
                tools,
            } => write!(
                f,
                "{actor}: money {money:.2}, savings {savings:.2}, hunger {hunger:.1}, \
                 productivity {productivity:.1}, food {food}, tools {tools}"
            ),
        }
    }
}

/// Append-only log of the entries recorded since the last drain.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    #[cfg_attr(not(feature = "instrument"), allow(dead_code))]
    round: u32,
    entries: Vec<Entry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round stamped onto structured events recorded from now on.
    pub fn set_round(&mut self, round: u32) {
        self.round = round;
    }

    pub fn record(&mut self, entry: Entry) {
        #[cfg(feature = "instrument")]
        entry.trace(self.round);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn drain(&mut self) -> Vec<Entry> {
        std::mem::take(&mut self.entries)
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(Entry::to_string)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_console_lines() {
        let bought = Entry::Bought {
            actor: "Alice".to_string(),
            good: Good::Food,
            quantity: 4,
            cost: 40.0,
        };
        assert_eq!(bought.to_string(), "Alice bought 4 Food(s) for 40.00 money.");

        let sold = Entry::Sold {
            actor: "Alice".to_string(),
            good: Good::Food,
            quantity: 6,
            revenue: 61.199999999999996,
        };
        assert_eq!(sold.to_string(), "Alice sold 6 Food(s) for 61.20 money.");

        let refused = Entry::CannotSell {
            actor: "Bob".to_string(),
            good: Good::Tools,
            quantity: 2,
        };
        assert_eq!(refused.to_string(), "Bob does not have enough Tools(s) to sell.");

        let walk = Entry::PriceAdjusted {
            good: Good::Tools,
            price: 7.0,
            supply: None,
        };
        assert_eq!(walk.to_string(), "The price of Tools is now 7.00.");

        let money = Entry::MoneyStatus {
            actor: "Bob".to_string(),
            money: 123.456,
        };
        assert_eq!(money.to_string(), "Bob has 123.46 money remaining.");
    }

    #[test]
    fn drain_empties_the_journal() {
        let mut journal = Journal::new();
        journal.set_round(3);
        journal.record(Entry::RoundStarted { round: 3 });
        journal.record(Entry::Produced {
            producer: "FoodCorp".to_string(),
            good: Good::Food,
            quantity: 7,
        });

        let lines: Vec<String> = journal.lines().collect();
        assert_eq!(lines, vec!["--- Round 3 ---", "FoodCorp produced 7 units of Food."]);

        let drained = journal.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].kind(), "produce");
        assert!(journal.is_empty());
    }
}
