// corewind: Reversible replay of core battle traces

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use corewind::config::Config;
use corewind::stepper::{LifeStatus, Stepper};
use corewind::trace::Trace;
use corewind::ui::App;

/// Step forward and backward through a recorded core battle
#[derive(Debug, Parser)]
#[command(name = "corewind", version, about)]
struct Cli {
    /// Trace document (JSON) produced by the battle machine
    trace: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file (overrides the config)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Advance to this turn before showing anything
    #[arg(long)]
    goto: Option<usize>,

    /// Print the replayed state instead of starting the TUI (defaults to the final turn)
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(log_file) = cli.log_file.clone() {
        config.log_file = Some(log_file);
    }
    init_logging(&config, cli.dump)?;

    eprintln!("Loading {}...", cli.trace.display());
    let trace = Trace::load(&cli.trace)?;
    eprintln!(
        "Loaded {} turns for {} processes over {} cells.",
        trace.total_moves(),
        trace.process_count(),
        trace.memory_length()
    );

    let mut stepper = Stepper::new(trace).with_window_radius(config.window_radius);

    if cli.dump {
        let target = cli.goto.unwrap_or(stepper.total_moves());
        stepper.advance_to(target);
        print_summary(&stepper);
        return Ok(());
    }

    if let Some(target) = cli.goto {
        stepper.advance_to(target);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(stepper, &config);
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

/// Log to the configured file; stderr is only usable when the TUI is not running
fn init_logging(config: &Config, dump: bool) -> Result<()> {
    let filter = corewind::logging::env_filter();

    match &config.log_file {
        Some(path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(log_file)
                .with_ansi(false)
                .init();
        }
        None if dump => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

fn print_summary(stepper: &Stepper) {
    println!("turn {}/{}", stepper.current_cursor(), stepper.total_moves());

    for pid in 0..stepper.process_count() {
        let status = match stepper.life_status(pid) {
            LifeStatus::Alive => "alive",
            LifeStatus::Dead => "dead",
        };
        let ip = stepper
            .current_ip(pid)
            .map_or_else(|| "-".to_string(), |ip| ip.to_string());
        println!("{} [{}] ip={}", stepper.process_name(pid), status, ip);
    }

    for (address, cell) in stepper.cells().iter().enumerate() {
        let owner = cell
            .owner()
            .map_or_else(|| "-".to_string(), |pid| pid.to_string());
        let occupants: Vec<String> = stepper
            .occupants(address)
            .iter()
            .map(|pid| pid.to_string())
            .collect();
        println!(
            "{:>5}  {:<20} owner={:<3} ips=[{}]",
            address,
            cell.value(),
            owner,
            occupants.join(",")
        );
    }
}
