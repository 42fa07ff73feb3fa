use std::io::{self, BufRead, Write};

use anyhow::Result;

/// Parameters collected from the interactive console flow.
#[derive(Debug, Clone)]
pub struct PromptedRun {
    pub input_dir: String,
    pub output_dir: String,
    pub keywords: Vec<String>,
    pub level: Option<String>,
    pub pattern: String,
}

/// Walk the user through the same questions as `logsift run` takes as
/// flags: directories, optional keywords, optional level, file pattern.
pub fn collect() -> Result<PromptedRun> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    collect_from(&mut |question| {
        print!("{}", question);
        io::stdout().flush()?;
        Ok(lines
            .next()
            .transpose()?
            .unwrap_or_default()
            .trim()
            .to_string())
    })
}

/// Prompt-driven collection over an injected ask function, so the flow is
/// testable without a terminal.
pub fn collect_from(ask: &mut dyn FnMut(&str) -> Result<String>) -> Result<PromptedRun> {
    println!("=== LogSift log processor ===");

    let input_dir = ask_required(ask, "\nInput directory containing log files: ")?;
    let output_dir = ask_required(ask, "\nOutput directory: ")?;

    let keywords = if ask("\nFilter by keywords? (y/n): ")?.eq_ignore_ascii_case("y") {
        ask("Keywords (space separated): ")?
            .split_whitespace()
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    let level = if ask("\nFilter by log level? (y/n): ")?.eq_ignore_ascii_case("y") {
        let answer = ask("Log level (e.g. INFO, ERROR, WARNING): ")?;
        if answer.is_empty() {
            None
        } else {
            Some(answer.to_uppercase())
        }
    } else {
        None
    };

    let pattern_answer = ask("\nFile pattern (default: *.log): ")?;
    let pattern = if pattern_answer.is_empty() {
        "*.log".to_string()
    } else {
        pattern_answer
    };

    Ok(PromptedRun {
        input_dir,
        output_dir,
        keywords,
        level,
        pattern,
    })
}

/// Re-ask until the answer is non-empty.
fn ask_required(ask: &mut dyn FnMut(&str) -> Result<String>, question: &str) -> Result<String> {
    loop {
        let answer = ask(question)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
        println!("Input cannot be empty, try again");
    }
}
