use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(
    name = "helper-scripts",
    about = "Build and release helper scripts for npm packages",
    long_about = "Helper scripts for a package's build/release pipeline: publishing with \
                  patch versioning, branch name correction, snapshot dependency reinstall, \
                  declaration bundling and file utilities.\n\n\
                  Script options use their own syntax: --key=value, --key[]=a,b, --flag \
                  and positional values.",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalFlags {
    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors and results only)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Publish packages from the release branch and bump their patch version
    #[command(
        long_about = "Publish each project, bump its patch version, commit and push.\n\n\
                      Only the release branch publishes; other branches are skipped \
                      unless --snapshot is set.\n\n\
                      Options: --branch=<name> --projectPaths[]=/a,/b --snapshot --mergeInto=<name>"
    )]
    Publish {
        /// Script options
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Print the branch a CI server should have reported
    #[command(
        name = "correct-branch-name",
        long_about = "Correct a branch name miscomputed by a CI server, based on the last \
                      merge commit. The result is printed alone on stdout.\n\n\
                      Options: --branch=<name> (required)"
    )]
    CorrectBranchName {
        /// Script options
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Reinstall snapshot, URL and `latest` dependencies
    #[command(
        name = "update-deps",
        long_about = "Remove and add back dependencies whose version never changes: \
                      snapshots (x.y.z-branch), URLs and `latest`.\n\n\
                      Positional package names limit the reinstall to those packages."
    )]
    UpdateDeps {
        /// Package names (default: all snapshot-like dependencies)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Generate an index.d.ts re-exporting every declaration file
    #[command(
        name = "bundle-dts",
        long_about = "Generate <dist>/index.d.ts with one re-export per *.d.ts file below <src>.\n\n\
                      Options: --src=<dir> (default: dist) --dist=<dir> (default: src)"
    )]
    BundleDts {
        /// Script options
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Remove files whose name matches a regular expression
    #[command(
        name = "remove-files-by-pattern",
        long_about = "Remove every file below a directory whose base name matches a \
                      regular expression.\n\n\
                      Options: --searchDir=<dir> --pattern=<regex> (both required)"
    )]
    RemoveFilesByPattern {
        /// Script options
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Copy files and directories into a target directory
    #[command(long_about = "Copy sources into a target directory, mirroring directories.\n\n\
                      Options: <source>... --target=<dir> (required)")]
    Copy {
        /// Sources and script options
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Generate shell completions
    #[command(hide = true)]
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Command {
    /// Raw script tokens of a script subcommand.
    pub fn script_args(&self) -> &[String] {
        match self {
            Command::Publish { args }
            | Command::CorrectBranchName { args }
            | Command::UpdateDeps { args }
            | Command::BundleDts { args }
            | Command::RemoveFilesByPattern { args }
            | Command::Copy { args } => args,
            Command::Completions { .. } => &[],
        }
    }
}
