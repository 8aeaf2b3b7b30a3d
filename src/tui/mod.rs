pub mod app;
pub mod cards;
pub mod colors;
pub mod search;
pub mod ui;

use crate::api::BreedSource;
use crate::catalog::CatalogLimits;
use crate::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::Arc;

/// Entry point: take over the terminal and run the viewer until quit
pub fn run(source: Arc<dyn BreedSource>, limits: CatalogLimits) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = app::App::new(source, limits);
    let result = app.run(&mut terminal);
    // Restore even when the loop failed, then report the first error
    let restored = restore_terminal(&mut terminal);
    result.and(restored)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    or_rollback(enter_screen, || {
        let mut stdout = io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })
}

fn enter_screen() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

/// Run `step`, undoing earlier setup with `rollback` if it fails
fn or_rollback<T>(step: impl FnOnce() -> Result<T>, rollback: impl FnOnce()) -> Result<T> {
    step().inspect_err(|_| rollback())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
