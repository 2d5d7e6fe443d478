//! apiscope - interactive terminal explorer for OpenAPI documents
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use apiscope::app::{AppActor, Screen};
use apiscope::constants::{APP_NAME, LOG_FILE};
use apiscope::document::LoadedDocument;
use apiscope::loader;
use apiscope::messages::ui_events::{key_to_ui_event, ScreenKind};
use apiscope::messages::{NetworkCommand, NetworkEvent, RenderState, UiEvent};
use apiscope::network::NetworkActor;
use apiscope::ui::{centered_rect, endpoint_item, styled_text};

#[derive(Parser)]
#[command(name = "apiscope")]
#[command(about = "Interactive terminal explorer for OpenAPI documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and test API endpoints in an interactive TUI
    Explore {
        /// Path to a local OpenAPI document (JSON or YAML)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// URL of a remote OpenAPI document
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Load an OpenAPI document and report a summary
    Validate {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Explore { file, url } => {
            let doc = match (file, url) {
                (Some(file), None) => loader::load_from_file(file)?,
                (None, Some(url)) => loader::load_from_url(&url).await?,
                _ => bail!("exactly one of --file or --url must be specified"),
            };
            run_explore(LoadedDocument::new(doc)).await
        }
        Commands::Validate { file } => {
            let doc = loader::load_from_file(&file).context("validation failed")?;
            let loaded = LoadedDocument::new(doc);
            println!("OpenAPI document is valid");
            println!("  Title:     {}", loaded.doc.title);
            println!("  Version:   {}", loaded.doc.version);
            println!("  Endpoints: {}", loaded.endpoints.len());
            Ok(())
        }
    }
}

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

async fn run_explore(loaded: LoadedDocument) -> Result<()> {
    // Log to file; the terminal belongs to the TUI.
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Channels between the three layers
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_event_tx, net_event_rx) = mpsc::unbounded_channel::<NetworkEvent>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    let network_actor = NetworkActor::new(net_event_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    let app_actor = AppActor::new(loaded, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_event_rx));

    // Tell the app the real terminal size before the first draw.
    let size = terminal.size()?;
    let _ = ui_tx.send(UiEvent::Resize(size.width, size.height));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for input with a timeout so completion events still land.
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(ui_event) =
                        key_to_ui_event(key, current_state.screen.kind(), current_state.show_help)
                    {
                        let quit = ui_event == UiEvent::Quit;
                        let _ = ui_tx.send(ui_event);
                        if quit {
                            break;
                        }
                    }
                }
                Event::Resize(w, h) => {
                    let _ = ui_tx.send(UiEvent::Resize(w, h));
                }
                _ => {}
            }
        }

        // Drain state updates (non-blocking); a closed channel means the
        // app actor ended the session.
        loop {
            match render_rx.try_recv() {
                Ok(state) => current_state = state,
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => return Ok(()),
            }
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_header(f, state, chunks[0]);

    match state.screen {
        Screen::EndpointList => draw_endpoint_list(f, state, chunks[1]),
        Screen::OperationDetail { ref viewport } => {
            draw_viewport(f, viewport, " Operation ", chunks[1])
        }
        Screen::RequestBuilder { ref form } => draw_builder(f, state, form, chunks[1]),
        Screen::ResponseView { ref viewport, .. } => {
            draw_viewport(f, viewport, " Response ", chunks[1])
        }
    }

    draw_footer(f, state, chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            format!(" {APP_NAME} - Terminal API Explorer"),
            Style::default().fg(Color::Magenta).bold(),
        )),
        Line::from(Span::styled(
            format!(" {} v{}", state.doc.title, state.doc.version),
            Style::default().fg(Color::Cyan).italic(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_endpoint_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = state.endpoints.labels().map(endpoint_item).collect();

    if items.is_empty() {
        let empty = Paragraph::new("No endpoints declared in this document.")
            .block(Block::default().borders(Borders::ALL).title(" Endpoints "));
        f.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Endpoints "))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_viewport(
    f: &mut Frame,
    viewport: &apiscope::app::Viewport,
    title: &str,
    area: Rect,
) {
    let paragraph = Paragraph::new(styled_text(&viewport.content))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .wrap(Wrap { trim: false })
        .scroll((viewport.offset, 0));
    f.render_widget(paragraph, area);
}

fn draw_builder(
    f: &mut Frame,
    state: &RenderState,
    form: &apiscope::app::BuilderForm,
    area: Rect,
) {
    let subtitle = match (
        state.endpoints.operation_at(&state.doc, state.selected),
        state.endpoints.path_at(&state.doc, state.selected),
    ) {
        (Some(op), Some(path)) => format!("{} {}", op.method, path.path),
        _ => "No operation selected".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            subtitle,
            Style::default().fg(Color::Cyan).italic(),
        )),
        Line::default(),
    ];

    if form.fields.is_empty() {
        lines.push(Line::from(Span::styled(
            "No parameters required",
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Press Ctrl+S to send request",
            Style::default().fg(Color::DarkGray).italic(),
        )));
    } else {
        for (i, field) in form.fields.iter().enumerate() {
            let focused = i == form.focused;
            let marker = if focused { "> " } else { "  " };
            let prompt_style = if focused {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::Magenta)
            };
            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::styled(field.prompt.clone(), prompt_style),
                Span::raw(field.value.clone()),
            ]));
            lines.push(Line::default());
        }
    }

    let title = if state.is_loading {
        " Request Builder [...] "
    } else {
        " Request Builder "
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, state: &RenderState, area: Rect) {
    let keys = if state.is_loading {
        " Sending... "
    } else {
        match state.screen.kind() {
            ScreenKind::EndpointList => " j/k: navigate | g/G: first/last | enter: select | ?: help | q: quit ",
            ScreenKind::OperationDetail => " j/k: scroll | d/u: half page | e: execute | h: back | ?: help ",
            ScreenKind::RequestBuilder => " tab: next field | ctrl+s: send | esc: back ",
            ScreenKind::ResponseView => " j/k: scroll | d/u: half page | h: back | ?: help ",
        }
    };

    let bar = Paragraph::new(keys).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 Keyboard Shortcuts

 NAVIGATION
   j / Down           Move down / scroll down
   k / Up             Move up / scroll up
   g / G              Jump to first / last endpoint
   d / u              Scroll half page down / up
   h / Left / Esc     Go back

 ACTIONS
   Enter / l          Open operation details
   e / Enter          Open request builder
   Tab / Shift+Tab    Next / previous input field
   Ctrl+S             Send request

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
