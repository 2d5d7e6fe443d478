//! App state - the single mutable view-state and its transitions.
//!
//! One writer (the app actor) mutates this, one event at a time. The
//! current screen is a tagged variant carrying only the data it needs,
//! so stale builder fields cannot leak across screens by construction.

use std::sync::Arc;

use crate::constants::VIEWPORT_CHROME;
use crate::document::{Document, Endpoints, LoadedDocument, Operation};
use crate::format::{self, StyledLine, TokenClass};
use crate::messages::network::{NetworkCommand, NetworkEvent, ResponseData};
use crate::messages::render::RenderState;
use crate::messages::ui_events::ScreenKind;

/// Scrollable text content with a clamped offset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    pub content: Vec<StyledLine>,
    pub offset: u16,
}

impl Viewport {
    pub fn new(content: Vec<StyledLine>) -> Self {
        Viewport { content, offset: 0 }
    }

    fn max_offset(&self, visible: u16) -> u16 {
        self.content
            .len()
            .saturating_sub(visible as usize)
            .min(u16::MAX as usize) as u16
    }

    pub fn line_down(&mut self, visible: u16) {
        self.offset = (self.offset + 1).min(self.max_offset(visible));
    }

    pub fn line_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn half_page_down(&mut self, visible: u16) {
        let step = (visible / 2).max(1);
        self.offset = (self.offset + step).min(self.max_offset(visible));
    }

    pub fn half_page_up(&mut self, visible: u16) {
        let step = (visible / 2).max(1);
        self.offset = self.offset.saturating_sub(step);
    }

    /// Re-clamp after a resize so the offset stays within content.
    pub fn clamp(&mut self, visible: u16) {
        self.offset = self.offset.min(self.max_offset(visible));
    }
}

/// One text field of the request builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputField {
    /// Display prompt, e.g. `id (path): ` or `Body: `.
    pub prompt: String,
    /// Parameter name used for dispatch; empty for the body field.
    pub name: String,
    pub value: String,
    pub is_body: bool,
}

/// The input form of the request builder screen. Regenerated in full on
/// every entry into the builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuilderForm {
    pub fields: Vec<InputField>,
    pub focused: usize,
}

impl BuilderForm {
    /// Synthesize fields from the operation: one per declared parameter
    /// in declared order, plus a body field when a required request
    /// body is declared.
    pub fn for_operation(op: Option<&Operation>) -> Self {
        let mut fields = Vec::new();

        if let Some(op) = op {
            for param in &op.parameters {
                fields.push(InputField {
                    prompt: format!("{} ({}): ", param.name, param.location.as_str()),
                    name: param.name.clone(),
                    value: String::new(),
                    is_body: false,
                });
            }

            if op.request_body.as_ref().is_some_and(|b| b.required) {
                fields.push(InputField {
                    prompt: "Body: ".to_string(),
                    name: String::new(),
                    value: String::new(),
                    is_body: true,
                });
            }
        }

        BuilderForm { fields, focused: 0 }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = self
                .focused
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    /// Parameter fields as (name, value) pairs, declared order.
    pub fn param_values(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .filter(|f| !f.is_body)
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }

    /// Body payload, `None` when there is no body field or it is empty.
    pub fn body_value(&self) -> Option<String> {
        self.fields
            .iter()
            .find(|f| f.is_body)
            .filter(|f| !f.value.is_empty())
            .map(|f| f.value.clone())
    }
}

/// The four mutually-exclusive screens. Each variant owns only the data
/// that screen needs; the help overlay is an orthogonal flag on
/// [`AppState`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Screen {
    #[default]
    EndpointList,
    OperationDetail {
        viewport: Viewport,
    },
    RequestBuilder {
        form: BuilderForm,
    },
    /// Carries the builder form so "back" restores entered values.
    ResponseView {
        form: BuilderForm,
        viewport: Viewport,
    },
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::EndpointList => ScreenKind::EndpointList,
            Screen::OperationDetail { .. } => ScreenKind::OperationDetail,
            Screen::RequestBuilder { .. } => ScreenKind::RequestBuilder,
            Screen::ResponseView { .. } => ScreenKind::ResponseView,
        }
    }
}

/// Main application state - pure data plus transitions, no I/O.
pub struct AppState {
    pub doc: Arc<Document>,
    pub endpoints: Arc<Endpoints>,
    pub screen: Screen,
    pub selected: usize,
    pub show_help: bool,
    pub is_loading: bool,
    pub pending_request: Option<u64>,
    pub last_response: Option<Result<ResponseData, String>>,
    next_request_id: u64,
    pub width: u16,
    pub height: u16,
}

impl AppState {
    pub fn new(loaded: LoadedDocument) -> Self {
        AppState {
            doc: loaded.doc,
            endpoints: loaded.endpoints,
            screen: Screen::EndpointList,
            selected: 0,
            show_help: false,
            is_loading: false,
            pending_request: None,
            last_response: None,
            next_request_id: 1,
            width: 80,
            height: 24,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Rows available to scrollable content below header and footer.
    pub fn viewport_height(&self) -> u16 {
        self.height.saturating_sub(VIEWPORT_CHROME).max(1)
    }

    pub fn current_operation(&self) -> Option<&Operation> {
        self.endpoints.operation_at(&self.doc, self.selected)
    }

    pub fn current_path(&self) -> Option<&str> {
        self.endpoints
            .path_at(&self.doc, self.selected)
            .map(|p| p.path.as_str())
    }

    // --- Endpoint list -----------------------------------------------

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.endpoints.len() {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn jump_first(&mut self) {
        self.selected = 0;
    }

    pub fn jump_last(&mut self) {
        self.selected = self.endpoints.len().saturating_sub(1);
    }

    /// Enter the operation-detail screen for the current endpoint.
    pub fn select(&mut self) {
        self.screen = Screen::OperationDetail {
            viewport: Viewport::new(self.detail_lines()),
        };
    }

    // --- Operation detail --------------------------------------------

    /// Enter the request builder, synthesizing a fresh form.
    pub fn execute(&mut self) {
        self.screen = Screen::RequestBuilder {
            form: BuilderForm::for_operation(self.current_operation()),
        };
    }

    // --- Scrolling ---------------------------------------------------

    fn viewport_mut(&mut self) -> Option<&mut Viewport> {
        match &mut self.screen {
            Screen::OperationDetail { viewport } | Screen::ResponseView { viewport, .. } => {
                Some(viewport)
            }
            _ => None,
        }
    }

    pub fn scroll_down(&mut self) {
        let visible = self.viewport_height();
        if let Some(vp) = self.viewport_mut() {
            vp.line_down(visible);
        }
    }

    pub fn scroll_up(&mut self) {
        if let Some(vp) = self.viewport_mut() {
            vp.line_up();
        }
    }

    pub fn half_page_down(&mut self) {
        let visible = self.viewport_height();
        if let Some(vp) = self.viewport_mut() {
            vp.half_page_down(visible);
        }
    }

    pub fn half_page_up(&mut self) {
        let visible = self.viewport_height();
        if let Some(vp) = self.viewport_mut() {
            vp.half_page_up(visible);
        }
    }

    // --- Request builder ---------------------------------------------

    fn form_mut(&mut self) -> Option<&mut BuilderForm> {
        match &mut self.screen {
            Screen::RequestBuilder { form } => Some(form),
            _ => None,
        }
    }

    pub fn focus_next_field(&mut self) {
        if let Some(form) = self.form_mut() {
            form.focus_next();
        }
    }

    pub fn focus_prev_field(&mut self) {
        if let Some(form) = self.form_mut() {
            form.focus_prev();
        }
    }

    pub fn field_char(&mut self, c: char) {
        if let Some(form) = self.form_mut() {
            form.insert_char(c);
        }
    }

    pub fn field_backspace(&mut self) {
        if let Some(form) = self.form_mut() {
            form.backspace();
        }
    }

    /// Build the dispatch command for the current form. Returns `None`
    /// when not on the builder, nothing is selected, or a request is
    /// already in flight (single in-flight request discipline).
    pub fn send_request(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            return None;
        }

        let Screen::RequestBuilder { form } = &self.screen else {
            return None;
        };

        let op = self.endpoints.operation_at(&self.doc, self.selected)?;
        let path = self.endpoints.path_at(&self.doc, self.selected)?;

        let method = op.method.clone();
        let base_url = self.doc.base_url().to_string();
        let path = path.path.clone();
        let params = form.param_values();
        let body = form.body_value();

        let id = self.next_id();
        self.pending_request = Some(id);
        self.is_loading = true;

        Some(NetworkCommand::Execute {
            id,
            method,
            base_url,
            path,
            params,
            body,
        })
    }

    // --- Dispatch completion -----------------------------------------

    /// Apply a network completion event. Stale completions (an id other
    /// than the pending one) are discarded.
    pub fn handle_network_event(&mut self, event: NetworkEvent) {
        let NetworkEvent::Completed { id, result } = event;

        if self.pending_request != Some(id) {
            return;
        }
        self.pending_request = None;
        self.is_loading = false;

        let viewport = Viewport::new(format::format_response(&result));
        self.last_response = Some(result);

        // The send affordance lives on the builder, but the operator may
        // have navigated away while the call was in flight; the response
        // screen still needs a form to fall back to.
        let form = match std::mem::take(&mut self.screen) {
            Screen::RequestBuilder { form } | Screen::ResponseView { form, .. } => form,
            _ => BuilderForm::for_operation(self.current_operation()),
        };

        self.screen = Screen::ResponseView { form, viewport };
    }

    // --- Overlay and navigation --------------------------------------

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    /// Step back one screen in the chain. Returns `true` when the
    /// session should terminate (back from the endpoint list).
    pub fn go_back(&mut self) -> bool {
        self.show_help = false;

        match std::mem::take(&mut self.screen) {
            Screen::EndpointList => return true,
            Screen::OperationDetail { .. } => {
                self.screen = Screen::EndpointList;
            }
            Screen::RequestBuilder { .. } => {
                self.screen = Screen::OperationDetail {
                    viewport: Viewport::new(self.detail_lines()),
                };
            }
            Screen::ResponseView { form, .. } => {
                self.screen = Screen::RequestBuilder { form };
            }
        }

        false
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let visible = self.viewport_height();
        if let Some(vp) = self.viewport_mut() {
            vp.clamp(visible);
        }
    }

    // --- Rendering projections ---------------------------------------

    /// Detail text for the current endpoint, or a placeholder when
    /// nothing is selected.
    pub fn detail_lines(&self) -> Vec<StyledLine> {
        let (Some(op), Some(path)) = (self.current_operation(), self.current_path()) else {
            return vec![StyledLine::plain("No operation selected")];
        };

        let mut lines = Vec::new();

        let mut title = StyledLine::default();
        title.push(TokenClass::Status, format!("{} {}", op.method, path));
        lines.push(title);
        lines.push(StyledLine::default());

        if !op.summary.is_empty() {
            let mut line = StyledLine::default();
            line.push(TokenClass::Label, "Summary: ");
            line.push(TokenClass::Plain, op.summary.clone());
            lines.push(line);
            lines.push(StyledLine::default());
        }

        if !op.description.is_empty() {
            let mut line = StyledLine::default();
            line.push(TokenClass::Label, "Description:");
            lines.push(line);
            for text in op.description.lines() {
                lines.push(StyledLine::plain(text));
            }
            lines.push(StyledLine::default());
        }

        if !op.parameters.is_empty() {
            let mut line = StyledLine::default();
            line.push(TokenClass::Label, "Parameters:");
            lines.push(line);
            for param in &op.parameters {
                let mut line = StyledLine::default();
                line.push(
                    TokenClass::Plain,
                    format!("  - {} ({})", param.name, param.location.as_str()),
                );
                if param.required {
                    line.push(TokenClass::Error, " *");
                }
                if !param.description.is_empty() {
                    line.push(TokenClass::Plain, format!(" - {}", param.description));
                }
                lines.push(line);
            }
            lines.push(StyledLine::default());
        }

        if let Some(body) = &op.request_body {
            let mut line = StyledLine::default();
            line.push(TokenClass::Label, "Request Body:");
            lines.push(line);
            for content_type in body.content.keys() {
                lines.push(StyledLine::plain(format!("  - {content_type}")));
            }
            lines.push(StyledLine::default());
        }

        if !op.responses.is_empty() {
            let mut line = StyledLine::default();
            line.push(TokenClass::Label, "Responses:");
            lines.push(line);
            for (status, resp) in &op.responses {
                lines.push(StyledLine::plain(format!(
                    "  - {} - {}",
                    status, resp.description
                )));
            }
        }

        lines
    }

    /// Snapshot for the UI layer.
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            doc: Arc::clone(&self.doc),
            endpoints: Arc::clone(&self.endpoints),
            screen: self.screen.clone(),
            selected: self.selected,
            show_help: self.show_help,
            is_loading: self.is_loading,
        }
    }
}
