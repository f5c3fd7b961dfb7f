// Bytethon: manual memory allocator simulator

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::Level;
use ratatui::{backend::CrosstermBackend, Terminal};

use bytethon::batch::run_batch;
use bytethon::commands::Session;
use bytethon::config::{self, Config, Invocation};
use bytethon::constants::PROGRAM_NAME;
use bytethon::logging;
use bytethon::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("bytethon");

    let config = match config::parse_args(args.iter().skip(1)) {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            println!("{}", config::usage(program_name));
            return Ok(());
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            eprintln!("{}", config::usage(program_name));
            std::process::exit(1);
        }
    };

    // Batch output owns stdout, so warnings are mirrored to stderr instead
    let echo = config.batch.then_some(Level::Warn);
    logging::init(config.log_level, echo).map_err(|e| e.to_string())?;

    let mut session = Session::new(config.arena_size)?;

    if config.batch {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        run_batch(&mut session, stdin.lock(), &mut stdout)?;
        return Ok(());
    }

    run_tui(session, &config)
}

fn run_tui(session: Session, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(session);
    app.status_message = format!(
        "Welcome to {}! {} bytes of memory",
        PROGRAM_NAME, config.arena_size
    );
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
