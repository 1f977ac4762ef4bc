//! Out-of-band user interaction: destructive-action confirmation and
//! blocking acknowledgements.

use std::io::{self, BufRead, IsTerminal, Write};

use colored::Colorize;

pub trait Prompter {
    /// Ask a yes/no question. Anything other than an explicit yes declines.
    fn confirm(&mut self, question: &str) -> bool;

    /// Show a message the user has to see before continuing.
    fn acknowledge(&mut self, message: &str);
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter {
    assume_yes: bool,
    pause: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            pause: false,
        }
    }

    /// Wait for Enter after each acknowledgement. Only takes effect on an
    /// interactive stdin and without `--yes`.
    pub fn pause_on_acknowledge(&mut self, pause: bool) {
        self.pause = pause;
    }

    fn should_pause(&self, interactive: bool) -> bool {
        self.pause && !self.assume_yes && interactive
    }

    /// Print `label` and read one line. `None` on end of input.
    pub fn ask(&mut self, label: &str) -> Option<String> {
        print!("{} ", label);
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let label = format!("{} {} [y/N]", "??".yellow().bold(), question);
        self.ask(&label).is_some_and(|answer| is_yes(&answer))
    }

    fn acknowledge(&mut self, message: &str) {
        println!("{} {}", "ok".green().bold(), message);
        if self.should_pause(io::stdin().is_terminal()) {
            let _ = self.ask(&"Press Enter to continue".dimmed().to_string());
        }
    }
}

pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
