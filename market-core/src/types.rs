use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use tsify_next::Tsify;

// ============================================================================
// IDs - Using slotmap for generational indices
// ============================================================================

new_key_type! {
    pub struct ActorId;
    pub struct ProducerId;
}

/// Trait for converting SlotMap keys to u64 for WASM boundary
pub trait KeyToU64 {
    fn to_u64(self) -> u64;
}

impl KeyToU64 for ActorId {
    fn to_u64(self) -> u64 {
        self.0.as_ffi()
    }
}

impl KeyToU64 for ProducerId {
    fn to_u64(self) -> u64 {
        self.0.as_ffi()
    }
}

pub type Money = f64;
pub type Quantity = u32;

// ============================================================================
// Goods - The commodities traded against the ledger
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub enum Good {
    Food,
    Tools,
}

impl Good {
    pub const COUNT: usize = 2;
    pub const ALL: [Good; Good::COUNT] = [Good::Food, Good::Tools];

    /// Returns an iterator over all goods
    pub fn all() -> impl Iterator<Item = Good> {
        Good::ALL.into_iter()
    }

    pub fn name(self) -> &'static str {
        match self {
            Good::Food => "Food",
            Good::Tools => "Tools",
        }
    }

    /// The good competing with this one for an actor's preference.
    pub fn other(self) -> Good {
        match self {
            Good::Food => Good::Tools,
            Good::Tools => Good::Food,
        }
    }

    fn index(self) -> usize {
        match self {
            Good::Food => 0,
            Good::Tools => 1,
        }
    }
}

impl fmt::Display for Good {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// GoodTable - Fixed-size per-good storage
// ============================================================================

/// One value per [`Good`], indexed directly by the good.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GoodTable<T>([T; Good::COUNT]);

impl<T: Copy> GoodTable<T> {
    pub fn splat(value: T) -> Self {
        Self([value; Good::COUNT])
    }
}

impl<T> GoodTable<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Good, &T)> {
        Good::all().zip(self.0.iter())
    }
}

impl<T> Index<Good> for GoodTable<T> {
    type Output = T;

    fn index(&self, good: Good) -> &T {
        &self.0[good.index()]
    }
}

impl<T> IndexMut<Good> for GoodTable<T> {
    fn index_mut(&mut self, good: Good) -> &mut T {
        &mut self.0[good.index()]
    }
}
