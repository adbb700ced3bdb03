use anyhow::{bail, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Source of interactive answers.
pub trait Prompt {
    fn ask(&mut self, question: &str) -> Result<String>;
}

pub struct Terminal {
    editor: DefaultEditor,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Prompt for Terminal {
    fn ask(&mut self, question: &str) -> Result<String> {
        match self.editor.readline(question) {
            Ok(line) => Ok(line.trim().to_string()),
            Err(ReadlineError::Interrupted) => {
                bail!("Interrupted");
            }
            Err(ReadlineError::Eof) => {
                bail!("EOF");
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Replays canned answers, failing once they run out.
#[cfg(test)]
pub struct Scripted {
    pub answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl Scripted {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompt for Scripted {
    fn ask(&mut self, question: &str) -> Result<String> {
        self.asked.push(question.to_string());
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("EOF"),
        }
    }
}
