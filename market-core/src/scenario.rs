// The three demos, from plain random trading to the investment economy

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{ActorConfig, GoodConfig, LedgerConfig, ScenarioConfig, ScenarioError};
use crate::types::Good;
use crate::world::World;

/// Length of every demo run.
pub const ROUNDS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scenario {
    /// Two traders buy and sell at random against randomly walking prices.
    Trading,
    /// Jobs, salaries and needs against supply-driven, inflating prices.
    Labor,
    /// The labor economy plus savings, investment and dividends.
    #[default]
    Investment,
}

impl Scenario {
    pub fn all() -> impl Iterator<Item = Scenario> {
        [Scenario::Trading, Scenario::Labor, Scenario::Investment].into_iter()
    }

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Trading => "trading",
            Scenario::Labor => "labor",
            Scenario::Investment => "investment",
        }
    }

    /// Does this scenario run salaries, production and needs each round?
    pub fn has_economy(self) -> bool {
        !matches!(self, Scenario::Trading)
    }

    pub fn allows_investment(self) -> bool {
        matches!(self, Scenario::Investment)
    }

    /// The fixed cast and starting values of this demo.
    pub fn config(self) -> ScenarioConfig {
        match self {
            Scenario::Trading => ScenarioConfig {
                ledger: LedgerConfig {
                    inflation_rate: 0.0,
                    goods: Good::all()
                        .map(|good| GoodConfig {
                            good,
                            price: 1.0,
                            supply: 0,
                        })
                        .collect(),
                    random_prices: Some((5, 21)),
                },
                actors: vec![
                    ActorConfig::trader("Alice", 100.0),
                    ActorConfig::trader("Bob", 200.0),
                ],
                producers: Vec::new(),
                investments: Vec::new(),
            },
            Scenario::Labor => {
                let mut config = ScenarioConfig::default();
                for actor in &mut config.actors {
                    actor.savings_rate = 0.0;
                }
                config.investments.clear();
                config
            }
            Scenario::Investment => ScenarioConfig::default(),
        }
    }

    pub fn build(self, seed: u64) -> Result<World, ScenarioError> {
        World::from_config(self, &self.config(), seed)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Scenario::all()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ScenarioError::UnknownScenario(s.to_string()))
    }
}
