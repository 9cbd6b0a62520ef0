//! Shared plumbing for the FAIRLinked command-line tools.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::io::{self, BufRead, Write};

use fairlinked::completion::Prompt;
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// The level comes from `RUST_LOG` and defaults to `info`; `verbose` forces
/// `debug`.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Interactive [`Prompt`] on stdin/stderr.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> fairlinked::Result<Option<String>> {
        let mut stderr = io::stderr();
        write!(stderr, "{question} ")
            .and_then(|()| stderr.flush())
            .map_err(|e| fairlinked::Error::io("<stderr>", e))?;
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| fairlinked::Error::io("<stdin>", e))?;
        Ok((read > 0).then(|| line.trim_end().to_owned()))
    }
}
