pub mod pool_state;
pub mod registry;
pub mod share_ledger;

pub use pool_state::*;
pub use registry::*;
pub use share_ledger::*;
