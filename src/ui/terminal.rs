//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{should_use_colors, OutputMode, SdkgateTheme, UserInterface};

/// Terminal UI implementation.
///
/// Requested output goes to stdout; status, warnings and errors go to
/// stderr so that `--format json` stays machine-readable.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: SdkgateTheme,
    mode: OutputMode,
    color: bool,
}

impl TerminalUI {
    /// Create a new terminal UI, honouring `NO_COLOR` and TTY detection.
    pub fn new(mode: OutputMode) -> Self {
        Self::with_color(mode, should_use_colors())
    }

    /// Create a terminal UI with colors forced on or off.
    pub fn with_color(mode: OutputMode, color: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme: SdkgateTheme::for_color(color),
            mode,
            color,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_header(title)).ok();
        }
    }

    fn print(&mut self, text: &str) {
        write!(self.out, "{}", text).ok();
        self.out.flush().ok();
    }

    fn use_color(&self) -> bool {
        self.color
    }
}
