//! Diagnostic console sink.

/// Line-oriented text sink for status and setup diagnostics.
pub trait Console {
    /// Emit one complete line (no trailing newline).
    fn write_line(&mut self, line: &str);
}

/// Console that forwards every line to the logging backend at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogConsole;

impl Console for LogConsole {
    fn write_line(&mut self, line: &str) {
        info!("{}", line);
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn write_line(&mut self, line: &str) {
        (**self).write_line(line);
    }
}
