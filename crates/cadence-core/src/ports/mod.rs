//! Ports: the trait seams between the engine and its collaborators
//! (time, external resource constraints, job bodies).

pub mod clock;
pub mod gate;
pub mod handler;

pub use clock::{Clock, FixedClock, SystemClock};
pub use gate::{AlwaysAvailable, ResourceGate};
pub use handler::{HandlerRegistry, JobHandler};
