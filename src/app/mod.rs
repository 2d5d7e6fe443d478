//! App layer - central state machine processing events.

pub mod actor;
pub mod state;

pub use actor::AppActor;
pub use state::{AppState, BuilderForm, InputField, Screen, Viewport};
