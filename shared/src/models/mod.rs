//! Domain models
//!
//! Read-only entities as served by the queue backend. The client never
//! invents identifiers or turn numbers; everything here mirrors server
//! state.

mod area;
mod office;
mod turn;

pub use area::Area;
pub use office::Office;
pub use turn::{Turn, TurnStatus};
