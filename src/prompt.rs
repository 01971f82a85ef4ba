//! Operator interaction port.
//!
//! Workflows only see [`Interaction`]; the terminal implementation reads
//! answers line by line so it works the same against a TTY or piped stdin.
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::io::{BufRead, Write};

/// How a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Plain,
    Success,
    Warning,
    Error,
    Detail,
}

/// Ask the operator for values and show them messages.
pub trait Interaction {
    /// Pick one of `choices`; returns its index.
    fn select(&mut self, question: &str, choices: &[&str], default: usize) -> Result<usize>;

    /// Free-text answer; an empty answer yields `default` when given.
    fn input(&mut self, question: &str, default: Option<&str>) -> Result<String>;

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;

    fn tell(&mut self, tone: Tone, message: &str);
}

/// Ask until `validate` accepts the answer, showing each rejection.
pub fn ask_validated<F>(
    prompt: &mut dyn Interaction,
    question: &str,
    validate: F,
) -> Result<String>
where
    F: Fn(&str) -> std::result::Result<(), String>,
{
    loop {
        let answer = prompt.input(question, None)?;
        match validate(&answer) {
            Ok(()) => return Ok(answer),
            Err(reason) => prompt.tell(Tone::Error, &reason),
        }
    }
}

/// Line-oriented terminal prompt.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}").context("write prompt")?;
        self.output.flush().context("flush prompt")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("read operator input")?;
        if read == 0 {
            return Err(anyhow!("input closed while waiting for an answer"));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Interaction for TerminalPrompt<R, W> {
    fn select(&mut self, question: &str, choices: &[&str], default: usize) -> Result<usize> {
        writeln!(self.output, "{} {}", "?".cyan().bold(), question.bold()).context("write prompt")?;
        for (index, choice) in choices.iter().enumerate() {
            writeln!(self.output, "  {}) {choice}", index + 1).context("write prompt")?;
        }
        let default_label = choices.get(default).copied().unwrap_or_default();
        loop {
            let answer = self.ask_line(&format!("Choice [{default_label}]: "))?;
            if answer.is_empty() && default < choices.len() {
                return Ok(default);
            }
            if let Some(index) = parse_choice(&answer, choices) {
                return Ok(index);
            }
            writeln!(
                self.output,
                "{}",
                format!("Please choose one of: {}", choices.join(", ")).red()
            )
            .context("write prompt")?;
        }
    }

    fn input(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        let prompt = match default {
            Some(default) => format!("{question} [{default}]: "),
            None => format!("{question}: "),
        };
        let answer = self.ask_line(&prompt)?;
        Ok(match default {
            Some(default) if answer.is_empty() => default.to_string(),
            _ => answer,
        })
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.ask_line(&format!("{} {question} {hint}: ", "?".cyan().bold()))?;
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => {
                    writeln!(self.output, "{}", "Please answer y or n".red())
                        .context("write prompt")?;
                }
            }
        }
    }

    fn tell(&mut self, tone: Tone, message: &str) {
        let styled = match tone {
            Tone::Heading => message.bold().to_string(),
            Tone::Plain => message.to_string(),
            Tone::Success => message.green().to_string(),
            Tone::Warning => message.yellow().to_string(),
            Tone::Error => message.red().to_string(),
            Tone::Detail => message.cyan().to_string(),
        };
        if let Err(err) = writeln!(self.output, "{styled}") {
            tracing::warn!(error = %err, "failed to write operator message");
        }
    }
}

/// Accept a 1-based menu number or the choice text itself.
fn parse_choice(answer: &str, choices: &[&str]) -> Option<usize> {
    if let Ok(number) = answer.parse::<usize>() {
        return (1..=choices.len()).contains(&number).then(|| number - 1);
    }
    choices
        .iter()
        .position(|choice| choice.eq_ignore_ascii_case(answer))
}
