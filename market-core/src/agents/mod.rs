pub mod actor;
pub mod needs;

pub use actor::*;
pub use needs::*;
