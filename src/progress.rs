//! Terminal progress display for a pipeline run.
use std::io::{self, Write};

pub trait Progress {
    /// Describe the work about to happen.
    fn title(&mut self, title: &str);
    /// Mark one step as finished.
    fn advance(&mut self);
    /// A one-line result the user should see.
    fn note(&mut self, message: &str);
}

/// Step counter on stderr, notes on stdout.
pub struct ConsoleProgress {
    total: usize,
    done: usize,
    title: String,
}

impl ConsoleProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            done: 0,
            title: String::new(),
        }
    }

    fn render(&self) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{}/{}] {}", self.done, self.total, self.title);
    }
}

impl Progress for ConsoleProgress {
    fn title(&mut self, title: &str) {
        self.title = title.to_string();
        self.render();
    }

    fn advance(&mut self) {
        self.done = (self.done + 1).min(self.total);
    }

    fn note(&mut self, message: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{message}");
    }
}
