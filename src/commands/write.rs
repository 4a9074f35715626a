use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{
        self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::Settings;
use crate::form::{ClassLevel, FormInput};
use crate::llm::ensure_client;
use crate::session::{FeedbackProvider, Session};
use crate::tui::view::draw;
use crate::tui::{Action, FormView};

pub async fn run(settings: &Settings, class_level: Option<ClassLevel>) -> Result<()> {
    // resolve the credential before touching the terminal
    let client = ensure_client(settings)?;

    let mut form = FormInput::default();
    if class_level.is_some() {
        form.class_level = class_level;
    }
    let mut view = FormView::new(Session::new(form));

    start_form_session(&mut view, &client).await
}

async fn start_form_session<P>(view: &mut FormView, provider: &P) -> Result<()>
where
    P: FeedbackProvider + ?Sized,
{
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("failed to start terminal")?;
    terminal.show_cursor().context("failed to show cursor")?;

    let loop_result: Result<()> = async {
        loop {
            terminal
                .draw(|frame| draw(frame, view))
                .context("failed to render frame")?;

            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match view.handle_key(key) {
                Action::Quit => break Ok(()),
                Action::Generate => {
                    if view.will_request() {
                        view.set_loading();
                        terminal
                            .draw(|frame| draw(frame, view))
                            .context("failed to render frame")?;
                    }
                    view.generate(provider).await;
                    discard_pending_input()?;
                }
                Action::Restart => view.restart(),
                Action::Edit | Action::None => {}
            }
        }
    }
    .await;

    info!("form closed");
    loop_result
}

/// Raw mode and the alternate screen, undone on drop whichever way the form exits.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let guard = TerminalGuard;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )
        .context("failed to configure terminal")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = restore_terminal(disable_raw_mode(), &mut io::stdout()) {
            warn!("failed to restore terminal: {err}");
        }
    }
}

/// Leaves the alternate screen even when raw mode could not be switched off.
fn restore_terminal(raw_mode: io::Result<()>, out: &mut impl io::Write) -> io::Result<()> {
    let screen = execute!(out, PopKeyboardEnhancementFlags, LeaveAlternateScreen, Show);
    raw_mode.and(screen)
}

/// Keys pressed while a request was in flight are dropped, the form was busy.
fn discard_pending_input() -> Result<()> {
    while event::poll(Duration::ZERO)? {
        event::read()?;
    }
    Ok(())
}
