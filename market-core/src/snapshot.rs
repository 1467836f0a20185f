use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::types::{Good, KeyToU64, Money, Quantity};
use crate::world::World;

// ============================================================================
// Snapshot types - Read-only view of the world for rendering
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct StateSnapshot {
    pub round: u32,
    pub scenario: String,
    pub prices: Vec<(Good, Money)>,
    pub supply: Vec<(Good, Quantity)>,
    pub actors: Vec<ActorSnapshot>,
    pub producers: Vec<ProducerSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct ActorSnapshot {
    pub id: u64,
    pub name: String,
    pub money: Money,
    pub savings: Money,
    pub hunger: f64,
    pub productivity: f64,
    pub job: Option<String>,
    pub inventory: Vec<(Good, Quantity)>,
    pub investments: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct ProducerSnapshot {
    pub id: u64,
    pub name: String,
    pub good: Good,
    pub capacity: Quantity,
    pub investors: Vec<u64>,
}

impl World {
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            round: self.round,
            scenario: self.scenario.to_string(),
            prices: self.ledger.prices().iter().map(|(g, p)| (g, *p)).collect(),
            supply: self.ledger.supplies().iter().map(|(g, s)| (g, *s)).collect(),
            actors: self
                .actors
                .iter()
                .map(|(id, a)| ActorSnapshot {
                    id: id.to_u64(),
                    name: a.name.clone(),
                    money: a.money,
                    savings: a.savings,
                    hunger: a.needs.hunger,
                    productivity: a.needs.productivity,
                    job: a.job.as_ref().map(|j| j.title.clone()),
                    inventory: a.inventory.iter().map(|(g, q)| (g, *q)).collect(),
                    investments: a.investments.iter().map(|p| p.to_u64()).collect(),
                })
                .collect(),
            producers: self
                .producers
                .iter()
                .map(|(id, p)| ProducerSnapshot {
                    id: id.to_u64(),
                    name: p.name.clone(),
                    good: p.good,
                    capacity: p.capacity,
                    investors: p.investors.iter().map(|a| a.to_u64()).collect(),
                })
                .collect(),
        }
    }
}
