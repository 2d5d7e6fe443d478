//! apiscope - interactive terminal explorer for OpenAPI documents.
//!
//! Three layers talk over channels:
//! - UI layer: synchronous ratatui rendering, translates key presses
//!   into semantic events
//! - App layer: single-writer state machine, owns all application state
//! - Network layer: async HTTP execution, posts completion events back

pub mod app;
pub mod constants;
pub mod document;
pub mod format;
pub mod loader;
pub mod messages;
pub mod network;
pub mod ui;

pub use app::{AppActor, AppState, Screen};
pub use document::{Document, Endpoints, LoadedDocument};
pub use messages::{NetworkCommand, NetworkEvent, RenderState, UiEvent};
