use std::fmt::Display;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Interactive output for text mode. In JSON mode every method is a no-op so
/// stdout carries nothing but the final document.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    json: bool,
}

impl Reporter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn line(&self, message: impl Display) {
        if !self.json {
            println!("{}", message);
        }
    }

    pub fn spinner(&self, message: impl Into<String>) -> Spinner {
        if self.json {
            return Spinner(None);
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(100));
        Spinner(Some(pb))
    }
}

pub struct Spinner(Option<ProgressBar>);

impl Spinner {
    pub fn ok(self) {
        self.finish(" [OK]");
    }

    pub fn finish(self, note: &str) {
        if let Some(pb) = self.0 {
            let message = format!("{}{}", pb.message(), note);
            pb.finish_with_message(message);
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }
}
