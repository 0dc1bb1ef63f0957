//! Session control: phases, snapshots and the controller that drives them.

mod controller;
mod phase;
mod snapshot;

pub use controller::GameSession;
pub use phase::{FirstPlayer, OpponentTurn, SessionPhase};
pub use snapshot::Snapshot;
