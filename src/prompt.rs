//! Line-oriented prompts.
//!
//! The workflows talk to the operator through the [`Prompter`] trait: print a
//! line, ask a question, get one line back. [`LinePrompter`] implements it
//! over any reader and writer, so the binary uses stdin/stdout and tests use a
//! byte slice and a `Vec<u8>`.
//!
//! A blank answer means "take the default". End of input is reported as an
//! [`io::ErrorKind::UnexpectedEof`] error so a closed pipe can never be
//! mistaken for an empty answer.

use std::io::{self, BufRead, Write};

pub trait Prompter {
    /// Ask `question` and return the answer with its line ending removed, or
    /// `default` when the answer is blank.
    fn ask(&mut self, question: &str, default: &str) -> io::Result<String>;

    /// Print one line.
    fn say(&mut self, line: &str) -> io::Result<()>;

    fn say_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    /// Yes/no question defaulting to no. Only `y` or `yes` (any case) is yes.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(question, "n")?;
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}

/// [`Prompter`] over a buffered reader and a writer.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl LinePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, question: &str, default: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        let answer = line.trim_end_matches(['\n', '\r']);
        tracing::trace!(question, answer, "prompt answered");
        if answer.trim().is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer.to_string())
        }
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }
}
