use super::{Cli, Command};
use crate::cli::normalize_script_args;
use crate::project_identity;
use clap::{CommandFactory, Parser};

fn parse(items: &[&str]) -> Cli {
    let mut argv = vec![project_identity::BINARY_NAME.to_string()];
    argv.extend(items.iter().map(|s| s.to_string()));
    Cli::try_parse_from(normalize_script_args(argv)).expect("arguments should parse")
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn script_tokens_are_passed_through_verbatim() {
    let cli = parse(&["publish", "--branch=master", "--projectPaths[]=/a,/b", "--snapshot"]);
    assert_eq!(
        cli.command.script_args(),
        &["--branch=master", "--projectPaths[]=/a,/b", "--snapshot"]
    );
}

#[test]
fn global_flags_precede_subcommand() {
    let cli = parse(&["-q", "--no-color", "copy", "README.md", "--target=dist"]);
    assert!(cli.global.quiet);
    assert!(cli.global.no_color);
    assert!(matches!(cli.command, Command::Copy { .. }));
    assert_eq!(cli.command.script_args(), &["README.md", "--target=dist"]);
}

#[test]
fn script_commands_accept_no_tokens() {
    let cli = parse(&["update-deps"]);
    assert!(cli.command.script_args().is_empty());
}

#[test]
fn kebab_case_subcommand_names() {
    for name in [
        "correct-branch-name",
        "update-deps",
        "bundle-dts",
        "remove-files-by-pattern",
    ] {
        assert!(
            Cli::command().find_subcommand(name).is_some(),
            "missing subcommand {name}"
        );
    }
}

#[test]
fn completions_take_a_shell() {
    let cli = parse(&["completions", "zsh"]);
    assert!(matches!(cli.command, Command::Completions { .. }));
    assert!(Cli::try_parse_from([project_identity::BINARY_NAME, "completions", "tcsh"]).is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from([project_identity::BINARY_NAME]).is_err());
}
