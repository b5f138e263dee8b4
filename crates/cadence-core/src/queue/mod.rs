//! Queue structures: the priority-ordered pending queue and the bounded
//! completed history.

mod history;
mod pending;

pub use history::{CompletedHistory, DependencyState};
pub use pending::PendingQueue;
