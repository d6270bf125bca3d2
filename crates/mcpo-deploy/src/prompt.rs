//! Terminal prompter backed by dialoguer.

use std::io;

use dialoguer::{Confirm, Input, Password};
use mcpo_deploy_core::Prompter;

/// Interactive prompter for a real terminal session.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&mut self, message: &str) -> io::Result<String> {
        Input::new()
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .map_err(into_io)
    }

    fn secret(&mut self, message: &str) -> io::Result<String> {
        Password::new()
            .with_prompt(message)
            .allow_empty_password(true)
            .interact()
            .map_err(into_io)
    }

    fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(into_io)
    }
}

fn into_io(err: dialoguer::Error) -> io::Error {
    match err {
        dialoguer::Error::IO(err) => err,
    }
}
