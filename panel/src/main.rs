use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, error, info, warn};
use panel_core::{HttpStreamApi, PlayerFactory, StreamApi, create_panel};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend, style::Color};

mod app;
mod cli;
mod commands;
mod events;
mod headless;
mod logging;
#[cfg(test)]
mod test_support;
mod ui;

use app::App;
use cli::Cli;
use events::{ActionEnd, event_utils, run_interruptible};
use logging::LogTarget;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        logging::init(LogTarget::Stderr)?;
        let config = cli.resolve_config()?;
        let api = HttpStreamApi::new(&config.server_url, config.request_timeout())?;
        return headless::run(&api, command, &mut io::stdout()).await;
    }

    logging::init(LogTarget::File(&cli.log_file))?;
    info!("Application starting");
    let config = cli.resolve_config()?;
    let controller = create_panel(&config).context("Failed to set up the stream controller")?;

    // Set up clean terminal restoration on panic
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        error!("PANIC: {}", panic_info);
        orig_hook(panic_info);
    }));

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(anyhow::anyhow!("Failed to setup terminal: {}", e));
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(term) => term,
        Err(e) => {
            let _ = disable_raw_mode();
            return Err(anyhow::anyhow!("Failed to create terminal: {}", e));
        }
    };
    debug!("Terminal setup complete");

    let mut app = App::new(controller, config.server_url.clone());
    let result = run_app(&mut terminal, &mut app).await;

    info!("Shutting down application");
    if let Err(e) = app.controller.shutdown() {
        warn!("Error stopping player: {}", e);
    }

    let cleanup_result = (|| -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    })();

    if let Err(e) = cleanup_result {
        error!("Error during cleanup: {}", e);
        eprintln!("Error during cleanup: {}", e);
    }

    result
}

/// Event loop: redraw, wait for a key or a tick, run the resulting action
async fn run_app<B, A, F>(terminal: &mut Terminal<B>, app: &mut App<A, F>) -> Result<()>
where
    B: Backend,
    A: StreamApi,
    F: PlayerFactory,
{
    let mut events = EventStream::new();
    // Redraws fade status messages
    let mut tick = tokio::time::interval(Duration::from_millis(250));

    terminal.draw(|f| ui::draw_ui(f, app))?;
    let refresh = async {
        app.controller.refresh_on_load().await;
    };
    if run_interruptible(&mut events, refresh).await == ActionEnd::Interrupted {
        return Ok(());
    }

    while !app.should_quit {
        terminal.draw(|f| ui::draw_ui(f, app))?;

        tokio::select! {
            _ = tick.tick() => {}
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if event_utils::is_terminate_event(&Event::Key(key)) {
                        debug!("Quit key pressed, exiting application");
                        app.should_quit = true;
                        continue;
                    }

                    let Some(action) = app.handle_key_event(key) else {
                        continue;
                    };
                    debug!("Action: {:?}", action);

                    if !action.is_remote() {
                        app.perform(action).await;
                        continue;
                    }

                    app.set_status(action.pending_message(), Color::Yellow);
                    terminal.draw(|f| ui::draw_ui(f, app))?;
                    // Quit keys stay live while the server is slow to answer
                    let end = run_interruptible(&mut events, app.perform(action)).await;
                    if end == ActionEnd::Interrupted {
                        warn!("Quit while a {:?} request was pending", action);
                        app.should_quit = true;
                    }
                }
                Some(Ok(Event::Resize(w, h))) => debug!("Resize event: {}x{}", w, h),
                Some(Ok(_)) => {}
                Some(Err(e)) => warn!("Error reading event: {}", e),
                None => break,
            }
        }
    }

    Ok(())
}
