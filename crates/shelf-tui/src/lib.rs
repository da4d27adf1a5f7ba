mod app;
mod ui;

pub use app::{App, Route};

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use shelf_api::CatalogApi;
use shelf_engine::{CartWriter, PageChangePolicy};
use tokio::sync::mpsc;

use app::{FetchOutcome, InputMode};

pub async fn run(
    api: Arc<dyn CatalogApi>,
    cart: CartWriter,
    policy: PageChangePolicy,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(api, cart, policy, tx);
    app.mount();

    let res = run_app(&mut terminal, &mut app, &mut rx).await;
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<FetchOutcome>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            key = next_key() => {
                if let Some(key) = key? {
                    handle_key(app, key).await?;
                }
            }

            Some(outcome) = rx.recv() => app.apply(outcome),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn next_key() -> Result<Option<KeyEvent>> {
    if event::poll(Duration::from_millis(50))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}

async fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match app.input_mode {
        InputMode::EditingSearch | InputMode::EditingPrice => match key.code {
            KeyCode::Enter => app.confirm_input(),
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.input_backspace(),
            KeyCode::Char(c) => app.input_char(c),
            _ => {}
        },
        InputMode::ShowingHelp => match key.code {
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => app.toggle_help(),
            _ => {}
        },
        InputMode::Normal => match app.route {
            Route::Listing => match key.code {
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('?') => app.toggle_help(),
                KeyCode::Char('j') | KeyCode::Down => app.next(),
                KeyCode::Char('k') | KeyCode::Up => app.previous(),
                KeyCode::Char('n') | KeyCode::Right => app.next_page(),
                KeyCode::Char('p') | KeyCode::Left => app.prev_page(),
                KeyCode::Enter => app.open_selected(),
                KeyCode::Char('/') => app.start_edit_search(),
                KeyCode::Char('$') => app.start_edit_price(),
                KeyCode::Char('c') => app.cycle_category(),
                KeyCode::Char('m') => app.cycle_company(),
                KeyCode::Char('o') => app.cycle_order(),
                KeyCode::Char('+') | KeyCode::Char('=') => app.raise_price(),
                KeyCode::Char('-') => app.lower_price(),
                KeyCode::Char('s') => app.search(),
                KeyCode::Char('r') => app.reset(),
                _ => {}
            },
            Route::Detail(_) => match key.code {
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('?') => app.toggle_help(),
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => {
                    app.navigate(Route::Listing)
                }
                KeyCode::Char('c') | KeyCode::Tab => app.cycle_color(),
                KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => app.increment_amount(),
                KeyCode::Char('-') | KeyCode::Down => app.decrement_amount(),
                KeyCode::Char('a') | KeyCode::Enter => app.add_to_cart().await?,
                _ => {}
            },
        },
    }
    Ok(())
}
