//! Command dispatcher
//!
//! Parses script tokens and routes each subcommand to its handler.

use crate::args_parser::{ArgStore, ArgsParser};
use crate::cli::args::{Cli, Command};
use crate::commands;
use crate::config::Settings;
use crate::error::{HelperError, Result};
use std::path::PathBuf;


/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli, settings: &Settings) -> Result<()> {
    let store = ArgsParser::parse(args.command.script_args());

    match &args.command {
        Command::Publish { .. } => commands::publish::run(&publish_options(&store), settings),

        Command::CorrectBranchName { .. } => {
            commands::correct_branch::run(store.get_non_empty("branch"), settings)
        }

        Command::UpdateDeps { .. } => commands::update_deps::run(store.positional(), settings),

        Command::BundleDts { .. } => {
            commands::bundle_dts::run(store.get_non_empty("src"), store.get_non_empty("dist"))
        }

        Command::RemoveFilesByPattern { .. } => commands::remove_files::run(
            store.get_non_empty("searchDir"),
            store.get_non_empty("pattern"),
        ),

        Command::Copy { .. } => {
            let (sources, target) = copy_arguments(&store)?;
            commands::copy::copy(&sources, &target)
        }

        Command::Completions { shell } => commands::completions::run(*shell),
    }
}

fn publish_options(store: &ArgStore) -> commands::publish::PublishOptions {
    commands::publish::PublishOptions {
        branch: store.get_non_empty("branch").map(str::to_string),
        project_paths: store.get_list("projectPaths").unwrap_or_default(),
        snapshot: store.flag("snapshot"),
        merge_into: store.get_non_empty("mergeInto").map(str::to_string),
    }
}

fn copy_arguments(store: &ArgStore) -> Result<(Vec<PathBuf>, PathBuf)> {
    let target = store
        .get_non_empty("target")
        .ok_or_else(|| HelperError::Usage("--target is required".to_string()))?;

    let sources = store.positional().iter().map(PathBuf::from).collect();
    Ok((sources, PathBuf::from(target)))
}
