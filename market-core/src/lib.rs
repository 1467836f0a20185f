use wasm_bindgen::prelude::*;

pub mod agents;
pub mod config;
pub mod journal;
pub mod ledger;
pub mod production;
pub mod scenario;
pub mod snapshot;
pub mod types;
pub mod world;

pub use agents::*;
pub use config::*;
pub use journal::*;
pub use ledger::*;
pub use production::*;
pub use scenario::*;
pub use snapshot::*;
pub use types::*;
pub use world::*;

#[cfg(feature = "instrument")]
pub use instrument;

// ============================================================================
// WASM API - Simulation
// ============================================================================

#[wasm_bindgen]
pub struct Simulation {
    world: World,
}

#[wasm_bindgen]
impl Simulation {
    /// The investment economy, seeded for replay.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<Simulation, JsError> {
        Self::with_scenario(Scenario::default().name(), seed)
    }

    /// Build one of the named demos (`trading`, `labor`, `investment`).
    #[wasm_bindgen]
    pub fn with_scenario(name: &str, seed: u64) -> Result<Simulation, JsError> {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();

        let scenario: Scenario = name.parse()?;
        Ok(Self {
            world: scenario.build(seed)?,
        })
    }

    /// Advance the simulation by one round
    #[wasm_bindgen]
    pub fn advance_round(&mut self) {
        self.world.run_round();
    }

    #[wasm_bindgen]
    pub fn get_round(&self) -> u32 {
        self.world.round
    }

    /// Get a snapshot of the current state for rendering
    #[wasm_bindgen]
    pub fn get_state_snapshot(&self) -> StateSnapshot {
        self.world.snapshot()
    }

    #[wasm_bindgen]
    pub fn get_state_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.world.snapshot())?)
    }

    /// Console lines recorded since the last call, as an array of strings.
    #[wasm_bindgen]
    pub fn drain_log(&mut self) -> Result<JsValue, JsError> {
        let lines: Vec<String> = self
            .world
            .drain_journal()
            .iter()
            .map(ToString::to_string)
            .collect();
        Ok(serde_wasm_bindgen::to_value(&lines)?)
    }
}

impl Simulation {
    pub fn world(&self) -> &World {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_advances_named_scenario() {
        let mut sim = Simulation::with_scenario("labor", 3).unwrap();
        assert_eq!(sim.get_round(), 0);

        sim.advance_round();
        assert_eq!(sim.get_round(), 1);

        let json = sim.get_state_json().unwrap();
        let snapshot: StateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.scenario, "labor");
        assert_eq!(snapshot, sim.get_state_snapshot());
    }

    #[test]
    fn test_default_simulation_is_investment_economy() {
        let sim = Simulation::new(7).unwrap();

        assert_eq!(sim.world().scenario, Scenario::Investment);
        assert_eq!(sim.world().actors.len(), 2);
        assert_eq!(sim.world().producers.len(), 2);
        assert_eq!(sim.get_state_snapshot().scenario, "investment");
    }
}
