//! Shared fakes for service tests.
//!
//! Scripted implementations of the provider and remote-shell ports. Each fake
//! records what it was asked to do so tests can assert call counts and order.

#![allow(clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::Result;

use crate::application::ports::{
    ComputeProvider, ProgressReporter, RemoteProcess, RemoteSession, RemoteShell,
};
use crate::domain::{Droplet, DropletSpec, PtySpec};

pub struct ReporterStub;

impl ProgressReporter for ReporterStub {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// Keeps every warning so tests can assert what the operator saw.
#[derive(Default)]
pub struct RecordingReporter {
    pub warnings: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

/// Droplet JSON as the provider would report it.
pub fn droplet(id: u64, locked: bool, v4: &[&str]) -> Droplet {
    let networks: Vec<_> = v4
        .iter()
        .map(|ip| serde_json::json!({"ip_address": ip, "type": "public"}))
        .collect();
    serde_json::from_value(serde_json::json!({
        "id": id,
        "locked": locked,
        "status": if locked { "new" } else { "active" },
        "networks": {"v4": networks},
    }))
    .expect("test droplet JSON")
}

// ── Provider ──────────────────────────────────────────────────────────────────

/// Returns `created` from `create_droplet`, then pops `statuses` in order.
pub struct ScriptedProvider {
    created: Droplet,
    statuses: RefCell<VecDeque<Result<Droplet>>>,
    pub create_calls: Cell<u32>,
    pub get_calls: Cell<u32>,
    pub last_spec: RefCell<Option<DropletSpec>>,
}

impl ScriptedProvider {
    pub fn new(created: Droplet, statuses: Vec<Result<Droplet>>) -> Self {
        Self {
            created,
            statuses: RefCell::new(statuses.into()),
            create_calls: Cell::new(0),
            get_calls: Cell::new(0),
            last_spec: RefCell::new(None),
        }
    }

    /// `locked` locked responses followed by one unlocked response with `ip`.
    pub fn unlocking_after(locked: usize, ip: &str) -> Self {
        let mut statuses: Vec<Result<Droplet>> =
            (0..locked).map(|_| Ok(droplet(1, true, &[]))).collect();
        statuses.push(Ok(droplet(1, false, &[ip])));
        Self::new(droplet(1, true, &[]), statuses)
    }
}

impl ComputeProvider for ScriptedProvider {
    async fn create_droplet(&self, spec: &DropletSpec) -> Result<Droplet> {
        self.create_calls.set(self.create_calls.get() + 1);
        *self.last_spec.borrow_mut() = Some(spec.clone());
        Ok(self.created.clone())
    }

    async fn get_droplet(&self, _: u64) -> Result<Droplet> {
        self.get_calls.set(self.get_calls.get() + 1);
        self.statuses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no more scripted status responses")))
    }
}

// ── Remote shell ──────────────────────────────────────────────────────────────

/// Canned output of a remote command.
#[derive(Clone)]
pub struct FakeCommand {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit: Option<u32>,
}

impl FakeCommand {
    pub fn exits(code: u32, stdout: &[u8]) -> Self {
        Self {
            stdout: stdout.to_vec(),
            stderr: Vec::new(),
            exit: Some(code),
        }
    }
}

/// Events recorded by sessions, shared so tests can inspect them after the
/// session has been consumed.
pub type SessionLog = Rc<RefCell<Vec<String>>>;

/// Fails the first `failures` dials, then hands out `FakeSession`s.
pub struct ScriptedShell {
    failures: Cell<u32>,
    pub dials: Cell<u32>,
    pub dialed: RefCell<Vec<String>>,
    pub refuse_pty: bool,
    pub command: FakeCommand,
    pub log: SessionLog,
}

impl ScriptedShell {
    pub fn failing_first(failures: u32, command: FakeCommand) -> Self {
        Self {
            failures: Cell::new(failures),
            dials: Cell::new(0),
            dialed: RefCell::new(Vec::new()),
            refuse_pty: false,
            command,
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl RemoteShell for ScriptedShell {
    type Session = FakeSession;

    async fn connect(&self, address: &str) -> Result<FakeSession> {
        self.dials.set(self.dials.get() + 1);
        self.dialed.borrow_mut().push(address.to_string());
        if self.failures.get() > 0 {
            self.failures.set(self.failures.get() - 1);
            anyhow::bail!("connection refused");
        }
        Ok(FakeSession {
            refuse_pty: self.refuse_pty,
            command: self.command.clone(),
            log: Rc::clone(&self.log),
        })
    }
}

pub struct FakeSession {
    refuse_pty: bool,
    command: FakeCommand,
    log: SessionLog,
}

impl RemoteSession for FakeSession {
    async fn request_pty(&mut self, pty: &PtySpec) -> Result<()> {
        self.log
            .borrow_mut()
            .push(format!("pty {} {}x{}", pty.term, pty.width, pty.height));
        if self.refuse_pty {
            anyhow::bail!("server refused pseudo-terminal");
        }
        Ok(())
    }

    async fn start(&mut self, command: &str) -> Result<RemoteProcess> {
        self.log.borrow_mut().push(format!("exec {command}"));
        let exit = self.command.exit;
        Ok(RemoteProcess {
            stdin: Box::new(tokio::io::sink()),
            stdout: Box::new(std::io::Cursor::new(self.command.stdout.clone())),
            stderr: Box::new(std::io::Cursor::new(self.command.stderr.clone())),
            exit: Box::pin(async move { Ok(exit) }),
        })
    }

    async fn close(self) -> Result<()> {
        self.log.borrow_mut().push("close".to_string());
        Ok(())
    }
}
