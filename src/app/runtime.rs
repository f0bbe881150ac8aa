//! TUI runtime for bizchat
//!
//! The event loop is synchronous: it drains finished background work, draws
//! a frame, then polls the terminal for input. Network calls never run on
//! this loop; they are spawned onto the tokio runtime by the input handlers.

use crate::api::Backend;
use crate::app::messages::BackgroundMessage;
use crate::app::{background, input, RuntimeContext};
use crate::ui::{self, App};
use anyhow::Result;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::Backend as TerminalBackend;
use ratatui::prelude::*;
use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

/// Run the chat client until the user quits
pub async fn run_tui(mut app: App, backend: Arc<dyn Backend>) -> Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let (tx, rx) = mpsc::channel::<BackgroundMessage>();
    let ctx = RuntimeContext {
        backend,
        tx: &tx,
    };

    tracing::info!(server = %app.config.server_url, "chat client started");
    // The greeting waits for this so it can name the business
    background::spawn_business_check(&ctx);

    let result = run_loop(&mut terminal, &mut app, &rx, &ctx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    tracing::info!(messages = app.chat.transcript().len(), "chat client stopped");
    result
}

/// Main event loop with background message handling
fn run_loop<B: TerminalBackend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mpsc::Receiver<BackgroundMessage>,
    ctx: &RuntimeContext,
) -> Result<()> {
    loop {
        app.tick();

        // Check for background messages (non-blocking)
        background::drain_messages(app, rx);

        terminal.draw(|f| ui::render(f, app))?;

        // Fast timeout keeps the typing indicator moving
        if event::poll(Duration::from_millis(80))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key_event(app, key, ctx)?;
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
