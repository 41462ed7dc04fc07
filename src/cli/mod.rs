pub mod args;
pub mod dispatcher;

pub use args::{Cli, Command, GlobalFlags};

/// Subcommands whose tokens belong to the script argument grammar.
const SCRIPT_COMMANDS: &[&str] = &[
    "publish",
    "correct-branch-name",
    "update-deps",
    "bundle-dts",
    "remove-files-by-pattern",
    "copy",
];

/// Insert `--` after a script subcommand so clap passes its tokens through
/// verbatim.
///
/// Arguments that already carry a separator, or only ask for help, are
/// returned unchanged. Global flags go before the subcommand.
pub fn normalize_script_args(args: Vec<String>) -> Vec<String> {
    let Some(position) = args
        .iter()
        .skip(1)
        .position(|arg| !arg.starts_with('-'))
        .map(|i| i + 1)
    else {
        return args;
    };

    if !SCRIPT_COMMANDS.contains(&args[position].as_str()) {
        return args;
    }

    let rest = &args[position + 1..];
    let help_only = matches!(rest, [flag] if flag == "-h" || flag == "--help");
    if rest.is_empty() || help_only || rest.first().is_some_and(|arg| arg == "--") {
        return args;
    }

    let mut normalized = Vec::with_capacity(args.len() + 1);
    normalized.extend_from_slice(&args[..=position]);
    normalized.push("--".to_string());
    normalized.extend_from_slice(rest);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn separator_is_inserted_after_script_command() {
        assert_eq!(
            normalize_script_args(argv(&["helper-scripts", "-q", "publish", "--branch=master"])),
            argv(&["helper-scripts", "-q", "publish", "--", "--branch=master"])
        );
    }

    #[test]
    fn help_and_existing_separator_are_untouched() {
        let help = argv(&["helper-scripts", "publish", "--help"]);
        assert_eq!(normalize_script_args(help.clone()), help);

        let separated = argv(&["helper-scripts", "copy", "--", "a", "--target=b"]);
        assert_eq!(normalize_script_args(separated.clone()), separated);
    }

    #[test]
    fn other_commands_are_untouched() {
        let completions = argv(&["helper-scripts", "completions", "bash"]);
        assert_eq!(normalize_script_args(completions.clone()), completions);

        let bare = argv(&["helper-scripts", "--version"]);
        assert_eq!(normalize_script_args(bare.clone()), bare);
    }
}
