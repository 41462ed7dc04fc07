use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);
static VERBOSE: AtomicBool = AtomicBool::new(false);
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Honor `NO_COLOR` and an explicit `--no-color`. Must run before any output.
pub fn init_colors(no_color: bool) {
    if no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed) && !is_quiet()
}

pub fn mark_interrupted() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

// Diagnostics go to stderr; stdout is reserved for `result`.

pub fn header(title: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("\n{}", title.bold().underline());
}

pub fn success(msg: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("{} {}", "✓".green().bold(), msg);
}

pub fn info(msg: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("{} {}", "ℹ".blue().bold(), msg);
}

pub fn warning(msg: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

pub fn keyval(key: &str, val: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("{}: {}", key.bold(), val);
}

/// Echo a command before it runs.
pub fn command(cmd: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("{} {}", "run command:".dimmed(), cmd.cyan());
}

/// Captured subprocess output, indented under its command.
pub fn output(text: &str) {
    if is_quiet() {
        return;
    }
    for line in text.lines() {
        eprintln!("  {}", line.dimmed());
    }
}

pub fn verbose(msg: &str) {
    if is_verbose() {
        eprintln!("{} {}", "·".bright_black(), msg.bright_black());
    }
}

/// Machine-consumable result, the only thing written to stdout.
pub fn result(value: &str) {
    println!("{}", value);
}
