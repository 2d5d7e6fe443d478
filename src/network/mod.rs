//! Network layer - async HTTP execution off the event-processing path.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
