// World state and round orchestration for the market simulation

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use slotmap::SlotMap;

use crate::agents::EconomicActor;
use crate::config::{ScenarioConfig, ScenarioError};
use crate::journal::{Entry, Journal};
use crate::ledger::PriceSupplyLedger;
use crate::production::Producer;
use crate::scenario::Scenario;
use crate::types::{ActorId, ProducerId};

/// Complete state of one simulation run
#[derive(Debug, Clone)]
pub struct World {
    pub round: u32,
    pub scenario: Scenario,

    // Market
    pub ledger: PriceSupplyLedger,

    // Entities
    pub actors: SlotMap<ActorId, EconomicActor>,
    pub producers: SlotMap<ProducerId, Producer>,

    /// Investments attempted every round, in order.
    pub investment_plan: Vec<(ActorId, ProducerId)>,

    pub journal: Journal,

    /// Single random source; every draw goes through here in a fixed order.
    rng: StdRng,
}

impl World {
    pub fn new(scenario: Scenario, ledger: PriceSupplyLedger, seed: u64) -> Self {
        Self {
            round: 0,
            scenario,
            ledger,
            actors: SlotMap::with_key(),
            producers: SlotMap::with_key(),
            investment_plan: Vec::new(),
            journal: Journal::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Validate `config` and build the world it describes.
    pub fn from_config(
        scenario: Scenario,
        config: &ScenarioConfig,
        seed: u64,
    ) -> Result<Self, ScenarioError> {
        config.validate()?;

        let mut ledger = PriceSupplyLedger::new(config.ledger.inflation_rate);
        for good in &config.ledger.goods {
            ledger = ledger.with_good(good.good, good.price, good.supply);
        }

        let mut world = World::new(scenario, ledger, seed);
        if let Some((low, high)) = config.ledger.random_prices {
            world.ledger.randomize_prices(&mut world.rng, low..high);
        }

        let mut actor_ids = HashMap::new();
        for cfg in &config.actors {
            let mut actor = EconomicActor::new(cfg.name.clone(), cfg.money)
                .with_needs(cfg.hunger, cfg.productivity)
                .with_preferences(cfg.food_preference, cfg.tools_preference)
                .with_savings(cfg.savings)
                .with_savings_rate(cfg.savings_rate);
            if let Some(job) = &cfg.job {
                actor = actor.with_job(job.title.clone(), job.salary);
            }
            actor_ids.insert(cfg.name.as_str(), world.add_actor(actor));
        }

        let mut producer_ids = HashMap::new();
        for cfg in &config.producers {
            let producer = Producer::new(cfg.name.clone(), cfg.good, cfg.capacity)
                .with_production_cost(cfg.production_cost);
            producer_ids.insert(cfg.name.as_str(), world.add_producer(producer));
        }

        for (actor, producer) in &config.investments {
            match (
                actor_ids.get(actor.as_str()),
                producer_ids.get(producer.as_str()),
            ) {
                (Some(&a), Some(&p)) => world.plan_investment(a, p),
                _ => {
                    return Err(ScenarioError::UnknownInvestment(
                        actor.clone(),
                        producer.clone(),
                    ));
                }
            }
        }

        Ok(world)
    }

    // === Entity Management ===

    pub fn add_actor(&mut self, actor: EconomicActor) -> ActorId {
        self.actors.insert(actor)
    }

    pub fn actor(&self, id: ActorId) -> Option<&EconomicActor> {
        self.actors.get(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut EconomicActor> {
        self.actors.get_mut(id)
    }

    pub fn find_actor(&self, name: &str) -> Option<ActorId> {
        self.actors
            .iter()
            .find(|(_, a)| a.name == name)
            .map(|(id, _)| id)
    }

    pub fn add_producer(&mut self, producer: Producer) -> ProducerId {
        self.producers.insert(producer)
    }

    pub fn producer(&self, id: ProducerId) -> Option<&Producer> {
        self.producers.get(id)
    }

    pub fn producer_mut(&mut self, id: ProducerId) -> Option<&mut Producer> {
        self.producers.get_mut(id)
    }

    pub fn find_producer(&self, name: &str) -> Option<ProducerId> {
        self.producers
            .iter()
            .find(|(_, p)| p.name == name)
            .map(|(id, _)| id)
    }

    /// Attempt this investment every round, after salaries are paid.
    pub fn plan_investment(&mut self, actor: ActorId, producer: ProducerId) {
        self.investment_plan.push((actor, producer));
    }

    // === Investment ===

    /// Put one stake of `actor`'s savings into `producer`.
    ///
    /// None if either id is unknown, Some(false) if savings do not exceed the
    /// stake, Some(true) once both sides record the investment. Repeating an
    /// investment adds another investor slot.
    pub fn invest(&mut self, actor_id: ActorId, producer_id: ProducerId) -> Option<bool> {
        let producer = self.producers.get_mut(producer_id)?;
        let actor = self.actors.get_mut(actor_id)?;

        if !actor.invest_in_company(producer_id) {
            return Some(false);
        }
        producer.add_investor(actor_id);

        self.journal.record(Entry::Invested {
            actor: actor.name.clone(),
            producer: producer.name.clone(),
            stake: crate::agents::INVESTMENT_STAKE,
        });
        Some(true)
    }

    // === Rounds ===

    pub fn run_round(&mut self) {
        self.round += 1;
        self.journal.set_round(self.round);
        self.journal.record(Entry::RoundStarted { round: self.round });

        if self.scenario.has_economy() {
            self.run_economy_round();
        } else {
            self.run_trading_round();
        }
    }

    pub fn run(&mut self, rounds: u32) {
        for _ in 0..rounds {
            self.run_round();
        }
    }

    pub fn drain_journal(&mut self) -> Vec<Entry> {
        self.journal.drain()
    }

    fn run_trading_round(&mut self) {
        for actor in self.actors.values_mut() {
            actor.random_action(&mut self.rng, &self.ledger, &mut self.journal);
        }

        self.ledger.random_walk(&mut self.rng, &mut self.journal);

        for actor in self.actors.values() {
            actor.report_money(&mut self.journal);
        }
    }

    fn run_economy_round(&mut self) {
        // 1. Salaries
        for actor in self.actors.values_mut() {
            actor.earn_salary(&mut self.journal);
        }

        // 2. Investment
        if self.scenario.allows_investment() {
            for (actor, producer) in self.investment_plan.clone() {
                self.invest(actor, producer);
            }
        }

        // 3. Production
        for producer in self.producers.values() {
            producer.produce_goods(&mut self.rng, &mut self.ledger, &mut self.journal);
        }

        // 4. Dividends
        if self.scenario.allows_investment() {
            for producer in self.producers.values() {
                producer.pay_dividends(&mut self.rng, &mut self.actors, &mut self.journal);
            }
        }

        // 5. Needs
        for actor in self.actors.values_mut() {
            actor.satisfy_needs(&mut self.ledger, &mut self.journal);
        }

        // 6. Prices
        self.ledger.adjust_prices(&mut self.rng, &mut self.journal);

        // 7. Status
        for actor in self.actors.values() {
            actor.report_status(&mut self.journal);
        }
    }
}
