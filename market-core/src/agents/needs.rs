// === NEEDS ===

use crate::types::{Good, Quantity};

/// A need only drives purchases once it rises strictly above this level.
pub const NEED_THRESHOLD: f64 = 50.0;

/// How a good relieves the need it serves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relief {
    /// Need reduction per unit bought.
    pub per_unit: f64,
    /// Upper bound on units bought in one round, if any.
    pub max_units: Option<Quantity>,
}

impl Relief {
    pub fn for_good(good: Good) -> Self {
        match good {
            // Hunger: buy as many units as whole tens of hunger
            Good::Food => Relief {
                per_unit: 10.0,
                max_units: None,
            },
            // Productivity: one tool a round
            Good::Tools => Relief {
                per_unit: 20.0,
                max_units: Some(1),
            },
        }
    }

    /// Units wanted to relieve `level`, before supply and budget limits.
    pub fn units_wanted(&self, level: f64) -> Quantity {
        match self.max_units {
            Some(cap) => cap,
            None => (level / self.per_unit).floor().max(0.0) as Quantity,
        }
    }
}

/// Hunger and productivity-need levels of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Needs {
    pub hunger: f64,
    pub productivity: f64,
}

impl Needs {
    pub fn new(hunger: f64, productivity: f64) -> Self {
        Self {
            hunger,
            productivity,
        }
    }

    /// Level of the need that `good` serves.
    pub fn level(&self, good: Good) -> f64 {
        match good {
            Good::Food => self.hunger,
            Good::Tools => self.productivity,
        }
    }

    pub fn level_mut(&mut self, good: Good) -> &mut f64 {
        match good {
            Good::Food => &mut self.hunger,
            Good::Tools => &mut self.productivity,
        }
    }

    pub fn is_pressing(&self, good: Good) -> bool {
        self.level(good) > NEED_THRESHOLD
    }
}
