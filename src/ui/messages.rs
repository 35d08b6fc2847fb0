//! Console messages. Human-facing notices share stdout with command output,
//! so anything that is not a result (warnings, failures) goes to stderr.

use std::fmt::Display;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

#[derive(Clone, Copy)]
enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Level::Info => ("\x1b[34m", "ℹ️"),
            Level::Success => ("\x1b[32m", "✅"),
            Level::Warning => ("\x1b[33m", "⚠️"),
            Level::Error => ("\x1b[31m", "❌"),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Warning | Level::Error)
    }
}

fn emit(level: Level, msg: &dyn Display) {
    let (color, icon) = level.style();
    let line = format!("{color}{BOLD}{icon} {RESET}{msg}");
    if level.to_stderr() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

pub fn info<T: Display>(msg: T) {
    emit(Level::Info, &msg);
}

pub fn success<T: Display>(msg: T) {
    emit(Level::Success, &msg);
}

pub fn warning<T: Display>(msg: T) {
    emit(Level::Warning, &msg);
}

pub fn error<T: Display>(msg: T) {
    emit(Level::Error, &msg);
}

/// Title line above a listing.
pub fn header<T: Display>(msg: T) {
    println!("{}{BOLD}=== {msg} ==={RESET}", Level::Info.style().0);
}
