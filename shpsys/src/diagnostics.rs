//! Reporting of data-quality warnings and progress messages.
//!
//! Operations that repair input data on the fly (removing duplicate points, closing rings, snapping) do not fail,
//! they report what they did through a [`Diagnostics`] sink given by the caller.

use std::cell::RefCell;

/// Receiver of messages produced by data processing operations.
pub trait Diagnostics {
    /// Message that should always be shown to the user.
    fn message(&self, text: &str);
    /// Detail shown only in verbose mode.
    fn verbose(&self, text: &str);
    /// Developer diagnostics.
    fn debug(&self, text: &str);
}

/// Forwards messages to the `log` facade.
///
/// Messages are logged with `info` level, verbose messages with `debug` and debug messages with `trace`. If a command
/// name is set, every line is prefixed with `[command]`.
#[derive(Debug, Clone, Default)]
pub struct LogDiagnostics {
    command: Option<String>,
}

impl LogDiagnostics {
    /// Creates a sink without a prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that prefixes messages with the name of the running command.
    pub fn for_command(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
        }
    }

    fn format(&self, text: &str) -> String {
        match &self.command {
            Some(command) => format!("[{command}] {text}"),
            None => text.to_string(),
        }
    }
}

impl Diagnostics for LogDiagnostics {
    fn message(&self, text: &str) {
        log::info!("{}", self.format(text));
    }

    fn verbose(&self, text: &str) {
        log::debug!("{}", self.format(text));
    }

    fn debug(&self, text: &str) {
        log::trace!("{}", self.format(text));
    }
}

/// Drops all messages.
#[derive(Debug, Copy, Clone, Default)]
pub struct QuietDiagnostics;

impl Diagnostics for QuietDiagnostics {
    fn message(&self, _text: &str) {}
    fn verbose(&self, _text: &str) {}
    fn debug(&self, _text: &str) {}
}

/// Level of a collected message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Level {
    /// See [`Diagnostics::message`].
    Message,
    /// See [`Diagnostics::verbose`].
    Verbose,
    /// See [`Diagnostics::debug`].
    Debug,
}

/// Keeps messages in memory.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    lines: RefCell<Vec<(Level, String)>>,
}

impl CollectedDiagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected messages in the order they were reported.
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.borrow().clone()
    }

    /// Texts of messages reported with the given level.
    pub fn texts(&self, level: Level) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, text)| text.clone())
            .collect()
    }

    fn push(&self, level: Level, text: &str) {
        self.lines.borrow_mut().push((level, text.to_string()));
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn message(&self, text: &str) {
        self.push(Level::Message, text);
    }

    fn verbose(&self, text: &str) {
        self.push(Level::Verbose, text);
    }

    fn debug(&self, text: &str) {
        self.push(Level::Debug, text);
    }
}

/// `"s"` for any count other than one.
pub fn plural_suffix(count: usize) -> &'static str {
    if count != 1 {
        "s"
    } else {
        ""
    }
}

/// Formats an integer with `,` as thousands separator.
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `"1 point"`, `"1,200 points"`.
pub(crate) fn counted(count: usize, noun: &str) -> String {
    format!("{} {noun}{}", format_count(count), plural_suffix(count))
}
