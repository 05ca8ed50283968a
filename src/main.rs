//! # Nordpilot
//!
//! Terminal dashboard and scriptable CLI for the `NordVPN` command-line tool.
//! Every operation is one bounded invocation of the external tool; its text
//! output is parsed into typed results.
//!
//! ## Modules
//! - [`app`]: Application state and message handling.
//! - [`cli`]: Command-line argument parsing and one-shot commands.
//! - [`config`]: Configuration management.
//! - [`core`]: Background workers that run tool commands off the UI thread.
//! - [`event`]: Event loop handling.
//! - [`ui`]: TUI rendering and widget definitions.
//! - [`vpn`]: Process runner, output parsers and the command adapter.

mod app;
mod cli;
mod config;
mod constants;
mod core;
mod event;
mod logger;
mod message;
mod state;
mod theme;
mod ui;
mod utils;
mod vpn;

use app::App;
use clap::Parser;
use cli::args::Args;
use cli::commands::CliContext;
use color_eyre::Result;
use event::{Event, EventHandler};
use vpn::{AdapterConfig, CommandAdapter};

const CONFIG_DIR_ENV: &str = "NORDPILOT_CONFIG_DIR";

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // clap prefers the flag when both are set; a value equal to the env var
    // is taken to come from the env var.
    let config_dir_source = match &args.config_dir {
        Some(dir) => match std::env::var(CONFIG_DIR_ENV) {
            Ok(env_val) if dir.to_string_lossy() == env_val => "from NORDPILOT_CONFIG_DIR",
            _ => "from --config-dir",
        },
        None => "default",
    };

    let config_dir = config::resolve_config_dir(args.config_dir.as_ref())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to resolve config directory: {e}"))?;

    let mut app_config = match config::load_config(&config_dir) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("Fix the file or remove it to use defaults:");
            eprintln!(
                "  rm {}",
                config_dir.join(constants::CONFIG_FILE_NAME).display()
            );
            std::process::exit(1);
        }
    };

    logger::configure(&app_config.log_level, app_config.max_log_entries);
    if args.verbose {
        logger::set_min_level(logger::LogLevel::Debug);
    }

    if let Some(tool) = &args.tool {
        app_config.tool_path.clone_from(tool);
    }
    let adapter = CommandAdapter::new(AdapterConfig::from(&app_config));
    crate::log_debug!("APP", "Config loaded from {}", config_dir.display());

    if let Some(command) = &args.command {
        let ctx = CliContext {
            config_dir: &config_dir,
            config_dir_source,
            json: args.json,
        };
        let code = cli::commands::handle_command(command, &adapter, &ctx);
        if args.verbose {
            for entry in logger::get_logs() {
                eprintln!("{}", entry.format());
            }
        }
        if code != 0 {
            std::process::exit(code);
        }
        return Ok(());
    }

    let terminal = init_terminal()?;
    let result = run_tui(terminal, adapter, &app_config);
    ratatui::restore();

    result
}

/// Runs the main TUI event loop.
fn run_tui(
    mut terminal: ratatui::DefaultTerminal,
    adapter: CommandAdapter,
    config: &config::AppConfig,
) -> Result<()> {
    let mut app = App::new(adapter, config);
    let events = EventHandler::new(config.tick_rate);

    app.process_external();
    terminal.draw(|frame| ui::render(frame, &mut app))?;

    while !app.should_quit {
        match events.next()? {
            Event::Key(key_event) => app.handle_key(key_event),
            Event::Tick => app.on_tick(),
            Event::Resize(width, height) => app.on_resize(width, height),
        }

        // Drain worker responses before drawing so results show up immediately
        app.process_external();
        terminal.draw(|frame| ui::render(frame, &mut app))?;
    }

    Ok(())
}

fn init_terminal() -> Result<ratatui::DefaultTerminal> {
    let mut terminal = ratatui::init();
    terminal.clear()?;
    Ok(terminal)
}
