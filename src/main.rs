use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tracing::info;

use money_quest::app::{format_wealth, App};
use money_quest::config::Config;
use money_quest::course::load_course;
use money_quest::progress::{FileSlot, ProgressStore};
use money_quest::{logging, ui};

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(&config.log_path())?;

    let catalog = load_course(&config.course_dir)?;
    info!(
        levels = catalog.total_levels(),
        course = %config.course_dir.display(),
        "course loaded"
    );

    let save_path = config.save_path();
    let mut store = ProgressStore::open(Arc::new(catalog), FileSlot::new(&save_path));
    if config.reset {
        store
            .reset_progress()
            .with_context(|| format!("resetting {}", save_path.display()))?;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result?;

    let state = app.store.state();
    println!(
        "\n{}/{} quests complete. Wealth: {}\n",
        state.completed_levels().len(),
        app.store.catalog().total_levels(),
        format_wealth(state.wealth())
    );

    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<FileSlot>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}
