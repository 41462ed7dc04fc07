pub mod args_parser;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod executors;
pub mod manifest;
pub mod project_identity;
pub mod ui;
pub mod utils;

use clap::Parser;
use std::process::exit;

/// Run helper-scripts CLI entrypoint.
pub fn run_cli() {
    // 1. Parse (clap exits on --help/--version and usage errors)
    let argv = cli::normalize_script_args(std::env::args().collect());
    let args = cli::args::Cli::parse_from(argv);

    // 2. Color and verbosity must be settled before any output
    ui::init_colors(args.global.no_color);
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);

    // 3. Signal handling: running commands see the flag and stop
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        ui::mark_interrupted();
        ui::warning("Operation cancelled by user.");
    }) {
        ui::verbose(&format!("Ctrl-C handler not installed: {}", e));
    }

    // 4. Settings & Run
    let result = config::Settings::from_env()
        .and_then(|settings| cli::dispatcher::dispatch(&args, &settings));

    if let Err(e) = result {
        ui::error(&format!("{}", e));
        exit(e.exit_code());
    }
}
