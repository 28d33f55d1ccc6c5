//! Remote-session domain types: pseudo-terminal request and retry policies.

use std::time::Duration;

/// Installer run on the fresh droplet.
pub const INSTALL_COMMAND: &str = "wget http://install.fastnetmon.com/installer -Oinstaller; \
chmod +x installer; ./installer -do_not_check_license";

/// SSH port dialed on the droplet.
pub const SSH_PORT: u16 = 22;

/// Terminal mode opcodes sent with a pseudo-terminal request (RFC 4254 §8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalMode {
    Echo,
    InputSpeed,
    OutputSpeed,
}

/// Pseudo-terminal requested before running the remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtySpec {
    pub term: String,
    pub width: u32,
    pub height: u32,
    pub modes: Vec<(TerminalMode, u32)>,
}

impl Default for PtySpec {
    /// 80x40 `xterm`, echo off, 14.4 kbaud in both directions.
    fn default() -> Self {
        Self {
            term: "xterm".to_string(),
            width: 80,
            height: 40,
            modes: vec![
                (TerminalMode::Echo, 0),
                (TerminalMode::InputSpeed, 14_400),
                (TerminalMode::OutputSpeed, 14_400),
            ],
        }
    }
}

/// How the provisioner waits for a droplet to unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between the create acknowledgment and the first status check.
    pub initial_delay: Duration,
    /// Pause after each locked status response.
    pub interval: Duration,
    /// Status checks allowed before giving up with `DeployError::Timeout`.
    pub max_attempts: u32,
}

/// How the executor retries SSH dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectPolicy {
    pub attempt_limit: u32,
    pub interval: Duration,
}
