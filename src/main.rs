use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error, info};
use ratatui::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

use snektick::controls::Command;
use snektick::scheduler::{SyncAction, TickScheduler};
use snektick::{ui, GameConfig, GameSession, TickOutcome};

const LOG_FILE: &str = "snektick.log";

/// How long to wait for input while no tick is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> Result<(), io::Error> {
    // Set up logging before anything else
    WriteLogger::init(LevelFilter::Info, Config::default(), File::create(LOG_FILE)?)
        .map_err(io::Error::other)?;

    info!("Starting snektick");
    let config = GameConfig::load();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, config);

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("Game loop failed: {}", e);
    }
    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, config: GameConfig) -> io::Result<()> {
    let mut session = GameSession::new(config);
    session.randomize_food();
    let mut scheduler = TickScheduler::new();

    loop {
        let state = session.render_state();
        let grid = session.grid();
        terminal.draw(|f| ui::draw(f, &state, grid))?;

        let timeout = scheduler.timeout(Instant::now()).unwrap_or(IDLE_POLL);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match Command::from_key_event(key) {
                    Some(Command::Quit) => break,
                    Some(Command::Turn(dir)) => {
                        session.request_direction(dir);
                    }
                    Some(Command::StartOrRestart) => session.start_or_restart(),
                    Some(Command::ToggleRun) => session.toggle_run(),
                    Some(Command::Reset) => session.reset(),
                    None => {}
                }
            }
        }
        reschedule(&mut scheduler, &session);

        if scheduler.fire(Instant::now()) {
            match session.tick() {
                TickOutcome::Ate { score, interval_ms } => {
                    debug!("Score {} at {}ms per tick", score, interval_ms);
                }
                TickOutcome::Crashed(collision) => {
                    info!("Crashed into {:?}", collision);
                }
                TickOutcome::BoardFilled => info!("Board filled"),
                TickOutcome::Moved | TickOutcome::Idle => {}
            }
            reschedule(&mut scheduler, &session);
        }
    }

    info!("Exiting with best score {}", session.best());
    Ok(())
}

fn reschedule<R>(scheduler: &mut TickScheduler, session: &GameSession<R>) {
    if let SyncAction::Armed(handle) =
        scheduler.sync(session.running(), session.tick_interval(), Instant::now())
    {
        debug!("Ticking every {:?} ({:?})", session.tick_interval(), handle);
    }
}
