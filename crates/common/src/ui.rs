//! User interface implementations

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use console::style;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};

use mgw_runtime::deps::{MessageStyle, ProgressIndicator, UserInterface};

/// Production UI implementation using dialoguer and indicatif
pub struct RealUserInterface;

impl UserInterface for RealUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
        {
            pb.set_style(spinner_style);
        }
        Box::new(RealProgressIndicator { pb })
    }

    fn print(&self, message: &str) {
        println!("{message}");
    }

    fn print_styled(&self, message: &str, msg_style: MessageStyle) {
        let styled = match msg_style {
            MessageStyle::Cyan => style(message).cyan(),
            MessageStyle::Warning => style(message).yellow().bold(),
            MessageStyle::Error => style(message).red().bold(),
            MessageStyle::Success => style(message).green().bold(),
        };
        println!("{styled}");
    }

    fn prompt_input(&self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| anyhow!("Failed to get input: {e}"))
    }

    fn prompt_password(&self, prompt: &str) -> Result<String> {
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| anyhow!("Failed to get password: {e}"))
    }
}

struct RealProgressIndicator {
    pb: ProgressBar,
}

impl ProgressIndicator for RealProgressIndicator {
    fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }

    fn enable_steady_tick(&self, duration: Duration) {
        self.pb.enable_steady_tick(duration);
    }
}

// Test implementations for mocking

/// Test UI implementation that captures output and replays scripted answers
#[derive(Default)]
pub struct TestUserInterface {
    /// Every printed line, styled or not
    pub output: Arc<Mutex<Vec<String>>>,
    /// Styled lines with their style
    pub styled_output: Arc<Mutex<Vec<(String, MessageStyle)>>>,
    /// Every prompt shown, in order
    pub prompts: Arc<Mutex<Vec<String>>>,
    answers: Arc<Mutex<VecDeque<String>>>,
}

impl TestUserInterface {
    /// A UI with no scripted answers
    pub fn new() -> Self {
        Self::default()
    }

    /// A UI answering prompts with `answers`, in order
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ui = Self::new();
        ui.answers
            .lock()
            .unwrap()
            .extend(answers.into_iter().map(Into::into));
        ui
    }

    /// Captured output lines
    pub fn get_output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }

    /// Captured styled output lines
    pub fn get_styled_output(&self) -> Vec<(String, MessageStyle)> {
        self.styled_output.lock().unwrap().clone()
    }

    /// Prompts shown so far
    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_answer(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("No scripted answer for prompt '{prompt}'"))
    }
}

impl UserInterface for TestUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        Box::new(TestProgressIndicator {
            output: Arc::clone(&self.output),
        })
    }

    fn print(&self, message: &str) {
        self.output.lock().unwrap().push(message.to_string());
    }

    fn print_styled(&self, message: &str, style: MessageStyle) {
        // Add to both styled output and regular output for easier testing
        self.styled_output
            .lock()
            .unwrap()
            .push((message.to_string(), style));
        self.output.lock().unwrap().push(message.to_string());
    }

    fn prompt_input(&self, prompt: &str) -> Result<String> {
        self.next_answer(prompt)
    }

    fn prompt_password(&self, prompt: &str) -> Result<String> {
        self.next_answer(prompt)
    }
}

// Spinner messages land in the owning UI's output
struct TestProgressIndicator {
    output: Arc<Mutex<Vec<String>>>,
}

impl ProgressIndicator for TestProgressIndicator {
    fn set_message(&self, message: &str) {
        self.output.lock().unwrap().push(message.to_string());
    }

    fn finish_and_clear(&self) {}

    fn enable_steady_tick(&self, _duration: Duration) {}
}

#[cfg(test)]
#[path = "ui_tests.rs"]
mod tests;
