//! Operator interaction boundary.
//!
//! Nothing outside this module reads stdin. Workflows ask questions through
//! the [`Prompter`] trait so confirmation gates stay testable without a
//! terminal attached.

use std::io::{self, BufRead, Write};

pub trait Prompter {
    /// Yes/no confirmation; `false` means the operator declined.
    fn confirm(&self, question: &str) -> bool;

    /// Free-form answer.
    fn ask(&self, question: &str) -> String;

    /// Secret answer. The stdin implementation cannot suppress echo, so the
    /// distinction only affects prompt wording for now.
    fn ask_hidden(&self, question: &str) -> String;
}

/// Blocking prompter over stdin/stdout.
pub struct StdinPrompter;

impl StdinPrompter {
    fn read_line(prompt: &str) -> String {
        print!("{prompt} ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
        line.trim().to_string()
    }
}

impl Prompter for StdinPrompter {
    fn confirm(&self, question: &str) -> bool {
        let answer = Self::read_line(&format!("{question} [y/N]"));
        matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn ask(&self, question: &str) -> String {
        Self::read_line(question)
    }

    fn ask_hidden(&self, question: &str) -> String {
        Self::read_line(question)
    }
}
