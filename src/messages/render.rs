//! Render state - snapshot sent from the App layer to the UI for drawing.

use std::sync::Arc;

use crate::app::state::Screen;
use crate::document::{Document, Endpoints};

/// Complete state needed by the UI to render one frame.
#[derive(Clone, Debug, Default)]
pub struct RenderState {
    pub doc: Arc<Document>,
    pub endpoints: Arc<Endpoints>,
    pub screen: Screen,
    pub selected: usize,
    pub show_help: bool,
    pub is_loading: bool,
}
