//! The process's own standard streams as a `LocalStdio`.

use tokio::io::{Stderr, Stdin, Stdout};

use crate::application::ports::LocalStdio;

/// Bind the remote command to this process's stdin/stdout/stderr.
#[must_use]
pub fn process_stdio() -> LocalStdio<Stdin, Stdout, Stderr> {
    LocalStdio {
        stdin: tokio::io::stdin(),
        stdout: tokio::io::stdout(),
        stderr: tokio::io::stderr(),
    }
}
