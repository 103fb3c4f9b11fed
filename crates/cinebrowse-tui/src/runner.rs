//! Interactive terminal loop.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::UnboundedReceiver;

use cinebrowse_api::catalog::CatalogApi;

use crate::app::{App, AppSettings};
use crate::dispatch::{Delivery, Dispatcher};
use crate::ui;

/// Upper bound on how long the loop waits for a delivery between frames.
const FRAME: Duration = Duration::from_millis(50);

/// Runs the browser until the user quits.
///
/// Must be called inside a tokio runtime; fetches run as spawned tasks.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<C>(api: Arc<C>, settings: AppSettings, address: &str) -> Result<()>
where
    C: CatalogApi + Sync + 'static,
{
    let (dispatcher, rx) = Dispatcher::new(api);
    let (mut app, startup) = App::new(settings, Instant::now());
    dispatcher.dispatch_all(startup);
    dispatcher.dispatch_all(app.open_address(address));

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &dispatcher, rx).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

async fn run_event_loop<C>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &Dispatcher<C>,
    mut rx: UnboundedReceiver<Delivery>,
) -> Result<()>
where
    C: CatalogApi + Sync + 'static,
{
    let mut list_height: u16 = 0;

    loop {
        dispatcher.dispatch_all(app.tick(Instant::now()));
        dispatcher.dispatch_all(app.on_viewport(usize::from(list_height)));

        terminal
            .draw(|frame| {
                list_height = ui::draw(frame, app);
            })
            .context("failed to draw TUI")?;

        tokio::select! {
            Some(delivery) = rx.recv() => {
                app.apply(delivery, Instant::now());
                while let Ok(delivery) = rx.try_recv() {
                    app.apply(delivery, Instant::now());
                }
            }
            () = tokio::time::sleep(FRAME) => {}
        }

        while event::poll(Duration::ZERO).context("failed to poll events")? {
            if let Event::Key(key) = event::read().context("failed to read event")?
                && key.kind == KeyEventKind::Press
            {
                dispatcher.dispatch_all(app.handle_key(key, Instant::now()));
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
