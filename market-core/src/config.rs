// Scenario configuration and validation

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Good, Money, Quantity};

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("unknown scenario: {0} (accepted: trading, labor, investment)")]
    UnknownScenario(String),
    #[error("invalid seed: {0}")]
    InvalidSeed(String),
    #[error("{0}.{1}: {2}")]
    InvalidField(String, &'static str, String),
    #[error("duplicate name: {0}")]
    DuplicateName(String),
    #[error("{0} cannot invest in {1}: no such actor or producer")]
    UnknownInvestment(String, String),
}

// ============================================================================
// Ledger
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoodConfig {
    pub good: Good,
    pub price: Money,
    pub supply: Quantity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub inflation_rate: f64,
    pub goods: Vec<GoodConfig>,
    /// When set, starting prices are drawn from `[low, high)` instead.
    pub random_prices: Option<(u32, u32)>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            inflation_rate: 0.02,
            goods: vec![
                GoodConfig {
                    good: Good::Food,
                    price: 10.0,
                    supply: 100,
                },
                GoodConfig {
                    good: Good::Tools,
                    price: 15.0,
                    supply: 50,
                },
            ],
            random_prices: None,
        }
    }
}

// ============================================================================
// Actors and producers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub title: String,
    pub salary: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorConfig {
    pub name: String,
    pub money: Money,
    pub job: Option<JobConfig>,
    pub hunger: f64,
    pub productivity: f64,
    pub food_preference: f64,
    pub tools_preference: f64,
    pub savings: Money,
    pub savings_rate: f64,
}

impl ActorConfig {
    /// A plain trader: money only, no job, needs or savings.
    pub fn trader(name: impl Into<String>, money: Money) -> Self {
        Self {
            name: name.into(),
            money,
            job: None,
            hunger: 0.0,
            productivity: 0.0,
            food_preference: 0.5,
            tools_preference: 0.5,
            savings: 0.0,
            savings_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerConfig {
    pub name: String,
    pub good: Good,
    pub capacity: Quantity,
    pub production_cost: Money,
}

// ============================================================================
// Scenario
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub ledger: LedgerConfig,
    pub actors: Vec<ActorConfig>,
    pub producers: Vec<ProducerConfig>,
    /// (actor name, producer name) pairs tried every round, in order.
    pub investments: Vec<(String, String)>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            actors: vec![
                ActorConfig {
                    name: "Alice".to_string(),
                    money: 100.0,
                    job: Some(JobConfig {
                        title: "Farmer".to_string(),
                        salary: 50.0,
                    }),
                    hunger: 60.0,
                    productivity: 40.0,
                    food_preference: 0.8,
                    tools_preference: 0.2,
                    savings: 0.0,
                    savings_rate: 0.2,
                },
                ActorConfig {
                    name: "Bob".to_string(),
                    money: 150.0,
                    job: Some(JobConfig {
                        title: "Blacksmith".to_string(),
                        salary: 70.0,
                    }),
                    hunger: 40.0,
                    productivity: 70.0,
                    food_preference: 0.3,
                    tools_preference: 0.7,
                    savings: 0.0,
                    savings_rate: 0.3,
                },
            ],
            producers: vec![
                ProducerConfig {
                    name: "FoodCorp".to_string(),
                    good: Good::Food,
                    capacity: 20,
                    production_cost: 5.0,
                },
                ProducerConfig {
                    name: "ToolMakers".to_string(),
                    good: Good::Tools,
                    capacity: 10,
                    production_cost: 8.0,
                },
            ],
            investments: vec![
                ("Alice".to_string(), "FoodCorp".to_string()),
                ("Bob".to_string(), "ToolMakers".to_string()),
            ],
        }
    }
}

fn unit_interval(owner: &str, field: &'static str, value: f64) -> Result<(), ScenarioError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ScenarioError::InvalidField(
            owner.to_string(),
            field,
            format!("{value} is outside [0, 1]"),
        ))
    }
}

fn non_negative(owner: &str, field: &'static str, value: f64) -> Result<(), ScenarioError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ScenarioError::InvalidField(
            owner.to_string(),
            field,
            format!("{value} must not be negative"),
        ))
    }
}

impl ScenarioConfig {
    /// Check every field the simulation relies on. Stops at the first problem.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.ledger.inflation_rate <= -1.0 || !self.ledger.inflation_rate.is_finite() {
            return Err(ScenarioError::InvalidField(
                "ledger".to_string(),
                "inflation_rate",
                format!("{} must be finite and above -1", self.ledger.inflation_rate),
            ));
        }
        for good in &self.ledger.goods {
            if good.price.is_nan() || good.price < 1.0 {
                return Err(ScenarioError::InvalidField(
                    good.good.to_string(),
                    "price",
                    format!("{} must be at least 1", good.price),
                ));
            }
        }
        if let Some((low, high)) = self.ledger.random_prices {
            if low < 1 || low >= high {
                return Err(ScenarioError::InvalidField(
                    "ledger".to_string(),
                    "random_prices",
                    format!("[{low}, {high}) must be a non-empty range starting at 1 or more"),
                ));
            }
        }

        let mut names = HashSet::new();
        for actor in &self.actors {
            if !names.insert(actor.name.as_str()) {
                return Err(ScenarioError::DuplicateName(actor.name.clone()));
            }
            non_negative(&actor.name, "money", actor.money)?;
            non_negative(&actor.name, "savings", actor.savings)?;
            if let Some(job) = &actor.job {
                non_negative(&actor.name, "salary", job.salary)?;
            }
            unit_interval(&actor.name, "food_preference", actor.food_preference)?;
            unit_interval(&actor.name, "tools_preference", actor.tools_preference)?;
            unit_interval(&actor.name, "savings_rate", actor.savings_rate)?;
        }

        let mut producer_names = HashSet::new();
        for producer in &self.producers {
            if !producer_names.insert(producer.name.as_str()) {
                return Err(ScenarioError::DuplicateName(producer.name.clone()));
            }
            non_negative(&producer.name, "production_cost", producer.production_cost)?;
        }

        for (actor, producer) in &self.investments {
            if !names.contains(actor.as_str()) || !producer_names.contains(producer.as_str()) {
                return Err(ScenarioError::UnknownInvestment(
                    actor.clone(),
                    producer.clone(),
                ));
            }
        }

        Ok(())
    }
}
