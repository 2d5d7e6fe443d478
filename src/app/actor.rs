//! App actor - message loop processing UI events and network completions.
//!
//! The single writer of [`AppState`]: one event is fully applied before
//! the next is received, so no locking is needed anywhere.

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::document::LoadedDocument;
use crate::messages::{NetworkCommand, NetworkEvent, RenderState, UiEvent};

pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        loaded: LoadedDocument,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(loaded),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop until the session terminates.
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkEvent>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(event) = net_rx.recv() => {
                    tracing::info!(id = event.id(), "request completed");
                    self.state.handle_network_event(event);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if the session should end.
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::MoveDown => self.state.move_down(),
            UiEvent::MoveUp => self.state.move_up(),
            UiEvent::JumpFirst => self.state.jump_first(),
            UiEvent::JumpLast => self.state.jump_last(),
            UiEvent::Select => self.state.select(),

            UiEvent::ScrollDown => self.state.scroll_down(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::HalfPageDown => self.state.half_page_down(),
            UiEvent::HalfPageUp => self.state.half_page_up(),
            UiEvent::Execute => self.state.execute(),

            UiEvent::NextField => self.state.focus_next_field(),
            UiEvent::PrevField => self.state.focus_prev_field(),
            UiEvent::FieldChar(c) => self.state.field_char(c),
            UiEvent::FieldBackspace => self.state.field_backspace(),
            UiEvent::Send => {
                if let Some(cmd) = self.state.send_request() {
                    if let NetworkCommand::Execute { id, ref method, ref path, .. } = cmd {
                        tracing::info!(id, %method, %path, "dispatching request");
                    }
                    let _ = self.network_tx.send(cmd);
                }
            }

            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),
            UiEvent::Back => return self.state.go_back(),
            UiEvent::Resize(w, h) => self.state.resize(w, h),

            UiEvent::Quit => return true,
        }

        false
    }
}
