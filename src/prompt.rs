use std::io::{self, BufRead, Write};

use crate::output::{BOLD, CYAN, GRAY, GREEN, RESET, YELLOW};
use crate::validate::parse_confirmation;

/// Reads answers from the terminal or any other line source.
///
/// End of input is reported as `None`, which callers treat as "cancel".
pub struct Prompter {
    input: Box<dyn BufRead>,
}

impl Prompter {
    /// Prompter reading from standard input.
    pub fn stdin() -> Self {
        Self {
            input: Box::new(io::BufReader::new(io::stdin())),
        }
    }

    /// Prompter reading from the given source, e.g. an `io::Cursor` in tests.
    pub fn from_reader(reader: impl BufRead + 'static) -> Self {
        Self {
            input: Box::new(reader),
        }
    }

    /// Print `question` and read one line without its trailing newline.
    pub fn read_line(&mut self, question: &str) -> Option<String> {
        print!("{CYAN}?{RESET} {} ", question);
        let _ = io::stdout().flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                println!();
                None
            }
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    /// Ask a free-form question; an empty answer yields `default`.
    pub fn ask(&mut self, question: &str, default: Option<&str>) -> Option<String> {
        let prompt = match default {
            Some(d) => format!("{} {GRAY}[{}]{RESET}", question, d),
            None => question.to_string(),
        };
        let answer = self.read_line(&prompt)?;
        if answer.trim().is_empty() {
            if let Some(d) = default {
                return Some(d.to_string());
            }
        }
        Some(answer)
    }

    /// Ask a yes/no question, re-asking until the answer is y/yes/n/no.
    ///
    /// An empty answer yields `default`; end of input yields `None`.
    pub fn confirm(&mut self, question: &str, default: bool) -> Option<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.read_line(&format!("{} {GRAY}{}{RESET}", question, hint))?;
            if answer.trim().is_empty() {
                return Some(default);
            }
            match parse_confirmation(&answer) {
                Some(choice) => return Some(choice),
                None => println!("{YELLOW}Please answer y, yes, n, or no{RESET}"),
            }
        }
    }
}

/// Print a numbered option list with the default marked.
pub fn print_options(options: &[&str], default: usize) {
    for (i, option) in options.iter().enumerate() {
        let marker = if i == default {
            format!("{GREEN}>{RESET}")
        } else {
            " ".to_string()
        };
        println!("  {} {BOLD}{}{RESET}. {}", marker, i + 1, option);
    }
}
