use std::io::{self, BufRead, Write};

use client_core::ConfirmPrompt;
use shared::domain::BookId;
use tracing::warn;

/// Confirms without asking; backs `delete --yes`.
pub struct AssumeYes;

impl ConfirmPrompt for AssumeYes {
    fn confirm_delete(&self, _id: &BookId) -> bool {
        true
    }
}

/// Asks on stderr and reads the answer from stdin. Anything but y/yes declines.
pub struct StdinConfirm;

impl ConfirmPrompt for StdinConfirm {
    fn confirm_delete(&self, id: &BookId) -> bool {
        eprint!("Delete book {id}? [y/N] ");
        if io::stderr().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(err) => {
                warn!(error = %err, "could not read confirmation");
                false
            }
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
