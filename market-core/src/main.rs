use std::env;
use std::process::ExitCode;

use market_core::{Entry, ROUNDS, Scenario, ScenarioError};

const SEED_VAR: &str = "MARKET_SIM_SEED";
const SCENARIO_VAR: &str = "MARKET_SIM_SCENARIO";

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_seed(value: Option<String>) -> Result<u64, ScenarioError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ScenarioError::InvalidSeed(raw)),
        None => Ok(rand::random()),
    }
}

fn parse_scenario(value: Option<String>) -> Result<Scenario, ScenarioError> {
    value.map_or(Ok(Scenario::default()), |raw| raw.parse())
}

/// Run the investment economy with its fixed cast for [`ROUNDS`] rounds.
///
/// With neither variable set there is nothing to configure. `MARKET_SIM_SEED`
/// pins the random sequence and `MARKET_SIM_SCENARIO` picks another demo; an
/// unparseable value is the only failure.
fn run() -> Result<(), ScenarioError> {
    let seed = parse_seed(env_value(SEED_VAR))?;
    let scenario = parse_scenario(env_value(SCENARIO_VAR))?;
    let mut world = scenario.build(seed)?;

    println!("Running the {scenario} scenario ({SEED_VAR}={seed})");

    for _ in 0..ROUNDS {
        world.run_round();
        for entry in world.drain_journal() {
            if matches!(entry, Entry::RoundStarted { .. }) {
                println!();
            }
            println!("{entry}");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("market-sim: {err}");
            ExitCode::FAILURE
        }
    }
}
