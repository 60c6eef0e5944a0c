mod api;
mod app;
mod cli;
mod comments;
mod event;
mod help;
mod keys;
mod logging;
mod settings;
mod storage;
mod text;
mod theme;
mod time;
mod tui;
mod views;

#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::{DefaultTerminal, Frame};
use tracing::{info, warn};

use api::Feed;
use app::{App, DEBUG_PANE_HEIGHT, Message, View};
use cli::{Cli, Commands, SavedCommands};
use event::Event;
use settings::Settings;
use storage::{Storage, StorageLocation};
use tui::EventHandler;

const TICK_MS: u64 = 100;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = settings::config_dir(cli.config_dir.as_ref());

    let _log_guard = config_dir.as_ref().and_then(|dir| {
        match logging::init(&settings::logs_dir(dir), cli.verbose) {
            Ok(guard) => {
                if cli.verbose {
                    eprintln!("Logging to {}", guard.dir.display());
                }
                Some(guard)
            }
            Err(e) => {
                eprintln!("Warning: {:#}", e);
                None
            }
        }
    });

    let settings = config_dir
        .as_ref()
        .map(|dir| load_settings(&settings::settings_path(dir)))
        .unwrap_or_default();

    let storage = if let Some(ref dir) = config_dir {
        match Storage::open(StorageLocation::Path(settings::db_path(dir))) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(error = %e, "storage disabled");
                eprintln!("Storage disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    if let Some(Commands::Saved(args)) = &cli.command {
        return handle_saved_command(&args.command, storage.as_ref()).await;
    }
    run_tui(cli.feed, settings, storage).await
}

/// Load settings, writing the defaults out on first run so there is a file
/// to edit.
fn load_settings(path: &std::path::Path) -> Settings {
    if !path.exists() {
        let settings = Settings::default();
        match settings.save(path) {
            Ok(()) => info!(path = %path.display(), "wrote default settings"),
            Err(e) => warn!(error = %e, "could not write default settings"),
        }
        return settings;
    }
    Settings::load(path).unwrap_or_else(|e| {
        eprintln!("Warning: {:#}", e);
        warn!(error = %e, "falling back to default settings");
        Settings::default()
    })
}

async fn handle_saved_command(command: &SavedCommands, storage: Option<&Storage>) -> Result<()> {
    let storage = storage.context("Saved stories are unavailable: storage is disabled")?;
    match command {
        SavedCommands::List => {
            let saved = storage
                .list_saved()
                .await
                .context("Failed to list saved stories")?;
            if saved.is_empty() {
                println!("No saved stories");
            }
            for story in saved.into_iter().map(api::Story::from) {
                println!("{:>10}  {}  {}", story.id, story.title, story.content_url());
            }
        }
        SavedCommands::Remove { id } => {
            let removed = storage
                .remove_story(*id)
                .await
                .with_context(|| format!("Failed to remove story {}", id))?;
            if removed {
                println!("Removed story {}", id);
            } else {
                println!("Story {} was not saved", id);
            }
        }
    }
    Ok(())
}

async fn run_tui(feed: Feed, settings: Settings, storage: Option<Storage>) -> Result<()> {
    let mut terminal = tui::init()?;
    let mut app = App::new(settings, storage);
    app.feed = feed;
    info!(feed = feed.label(), "starting");

    let result = run_loop(&mut terminal, &mut app).await;
    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(TICK_MS);
    let mut last_size: Option<(u16, u16)> = None;

    app.load_stories();

    loop {
        // Track terminal size changes for scroll planning and story prefetch
        let size = terminal.size()?;
        if last_size != Some((size.width, size.height)) {
            last_size = Some((size.width, size.height));
            app.update(Message::UpdateViewport(size.width, size.height));
        }

        // Poll async results (non-blocking)
        while let Ok(result) = app.result_rx.try_recv() {
            app.handle_async_result(result);
        }

        terminal.draw(|frame| render(app, frame))?;

        if app.should_quit {
            break;
        }

        match events.next().await? {
            Event::Key(key) => {
                if let Some(msg) = keys::handle_key(key, app) {
                    app.update(msg);
                }
            }
            Event::Tick => app.update(Message::Tick),
            Event::Resize => {}
        }
    }

    info!("exiting");
    Ok(())
}

fn render(app: &App, frame: &mut Frame) {
    use ratatui::layout::{Constraint, Layout};

    let area = frame.area();

    // Split area for debug pane if visible
    let (main_area, debug_area) = if app.debug.visible {
        let chunks = Layout::vertical([
            Constraint::Min(0),                    // Main content
            Constraint::Length(DEBUG_PANE_HEIGHT), // Debug pane
        ])
        .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    match app.view {
        View::Stories => views::stories::render(frame, app, main_area),
        View::Comments => views::comments::render(frame, app, main_area),
    }

    if let Some(debug_area) = debug_area {
        views::debug::render(frame, app, debug_area);
    }

    views::help_overlay::render(frame, app, area);
}
