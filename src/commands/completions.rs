use crate::cli::args::Cli;
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

/// Print the completion script for `shell` on stdout.
pub fn run(shell: Shell) -> Result<()> {
    write_to(shell, &mut io::stdout())
}

pub fn write_to(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();
    generate(shell, &mut command, bin_name, out);
    Ok(())
}
