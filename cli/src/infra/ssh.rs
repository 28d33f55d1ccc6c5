//! SSH adapter for the `RemoteShell` port, built on `russh`.
//!
//! A single session channel carries the PTY request and the command. A pump
//! task moves bytes between that channel and three in-memory pipes so the
//! application layer sees plain `AsyncRead`/`AsyncWrite` streams.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, ssh_key};
use russh::{Channel, ChannelMsg, Disconnect, Pty};
use ssh_key::{HashAlg, PrivateKey};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tracing::debug;

use crate::application::ports::{RemoteProcess, RemoteSession, RemoteShell};
use crate::domain::remote::SSH_PORT;
use crate::domain::{PtySpec, TerminalMode};

/// Buffer size of each stream pipe.
const PIPE_CAPACITY: usize = 32 * 1024;

/// SSH extended-data type code for stderr (RFC 4254 §5.2).
const EXTENDED_DATA_STDERR: u32 = 1;

/// Accepts any host key. A freshly created droplet has no known key to pin.
pub struct AcceptNewHost;

impl client::Handler for AcceptNewHost {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        debug!(
            fingerprint = %server_public_key.fingerprint(HashAlg::Sha256),
            "accepting host key"
        );
        Ok(true)
    }
}

/// Public-key authenticated SSH dialer.
pub struct RusshShell {
    config: Arc<client::Config>,
    user: String,
    key: Arc<PrivateKey>,
    port: u16,
    connect_timeout: Duration,
}

impl RusshShell {
    #[must_use]
    pub fn new(user: &str, key: PrivateKey, connect_timeout: Duration) -> Self {
        Self {
            config: Arc::new(client::Config::default()),
            user: user.to_string(),
            key: Arc::new(key),
            port: SSH_PORT,
            connect_timeout,
        }
    }
}

impl RemoteShell for RusshShell {
    type Session = RusshSession;

    async fn connect(&self, address: &str) -> Result<RusshSession> {
        let dial = client::connect(Arc::clone(&self.config), (address, self.port), AcceptNewHost);
        let mut handle = tokio::time::timeout(self.connect_timeout, dial)
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "dialing {address}:{} timed out after {}s",
                    self.port,
                    self.connect_timeout.as_secs()
                )
            })?
            .with_context(|| format!("dialing {address}:{}", self.port))?;

        let hash_alg = handle
            .best_supported_rsa_hash()
            .await
            .context("negotiating signature algorithm")?
            .flatten();
        let auth = handle
            .authenticate_publickey(
                &self.user,
                PrivateKeyWithHashAlg::new(Arc::clone(&self.key), hash_alg),
            )
            .await
            .context("authenticating")?;
        anyhow::ensure!(
            auth.success(),
            "public key authentication rejected for user {}",
            self.user
        );

        let channel = handle
            .channel_open_session()
            .await
            .context("opening session channel")?;
        Ok(RusshSession {
            handle,
            channel: Some(channel),
        })
    }
}

/// An authenticated connection with one session channel.
pub struct RusshSession {
    handle: Handle<AcceptNewHost>,
    channel: Option<Channel<Msg>>,
}

impl RusshSession {
    fn channel(&mut self) -> Result<&mut Channel<Msg>> {
        self.channel
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("session channel already in use"))
    }
}

fn pty_opcode(mode: TerminalMode) -> Pty {
    match mode {
        TerminalMode::Echo => Pty::ECHO,
        TerminalMode::InputSpeed => Pty::TTY_OP_ISPEED,
        TerminalMode::OutputSpeed => Pty::TTY_OP_OSPEED,
    }
}

impl RemoteSession for RusshSession {
    async fn request_pty(&mut self, pty: &PtySpec) -> Result<()> {
        let modes: Vec<(Pty, u32)> = pty
            .modes
            .iter()
            .map(|&(mode, value)| (pty_opcode(mode), value))
            .collect();
        let channel = self.channel()?;
        channel
            .request_pty(true, &pty.term, pty.width, pty.height, 0, 0, &modes)
            .await
            .context("sending pty request")?;

        loop {
            match channel.wait().await {
                Some(ChannelMsg::Success) => return Ok(()),
                Some(ChannelMsg::Failure) => anyhow::bail!("server refused the pseudo-terminal"),
                Some(_) => {}
                None => anyhow::bail!("channel closed before the pty reply"),
            }
        }
    }

    async fn start(&mut self, command: &str) -> Result<RemoteProcess> {
        let channel = self
            .channel
            .take()
            .ok_or_else(|| anyhow::anyhow!("session channel already in use"))?;
        channel
            .exec(true, command)
            .await
            .context("sending exec request")?;

        let (stdin_local, stdin_pump) = tokio::io::duplex(PIPE_CAPACITY);
        let (stdout_pump, stdout_local) = tokio::io::duplex(PIPE_CAPACITY);
        let (stderr_pump, stderr_local) = tokio::io::duplex(PIPE_CAPACITY);

        let pump = tokio::spawn(pump(channel, stdin_pump, stdout_pump, stderr_pump));

        Ok(RemoteProcess {
            stdin: Box::new(stdin_local),
            stdout: Box::new(stdout_local),
            stderr: Box::new(stderr_local),
            exit: Box::pin(async move { pump.await.context("session pump task failed")? }),
        })
    }

    async fn close(self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
            .context("disconnecting")
    }
}

/// Shuttle bytes between the channel and the pipes until the server closes
/// the channel. Returns the exit status the server reported, if any.
async fn pump(
    mut channel: Channel<Msg>,
    mut stdin: DuplexStream,
    mut stdout: DuplexStream,
    mut stderr: DuplexStream,
) -> Result<Option<u32>> {
    let mut buf = vec![0u8; PIPE_CAPACITY];
    let mut stdin_open = true;
    let mut exit_status = None;

    loop {
        tokio::select! {
            read = stdin.read(&mut buf), if stdin_open => match read {
                Ok(0) | Err(_) => {
                    stdin_open = false;
                    if let Err(e) = channel.eof().await {
                        debug!(error = %e, "sending eof failed");
                    }
                }
                Ok(n) => channel.data(&buf[..n]).await.context("forwarding stdin")?,
            },
            msg = channel.wait() => match msg {
                Some(ChannelMsg::Data { data }) => {
                    stdout.write_all(&data).await.context("buffering stdout")?;
                }
                Some(ChannelMsg::ExtendedData { data, ext }) if ext == EXTENDED_DATA_STDERR => {
                    stderr.write_all(&data).await.context("buffering stderr")?;
                }
                Some(ChannelMsg::ExitStatus { exit_status: code }) => {
                    debug!(code, "remote exit status");
                    exit_status = Some(code);
                }
                Some(ChannelMsg::ExitSignal { signal_name, .. }) => {
                    debug!(signal = ?signal_name, "remote command killed by signal");
                }
                Some(ChannelMsg::Failure) => anyhow::bail!("server refused to run the command"),
                Some(_) => {}
                None => break,
            },
        }
    }
    Ok(exit_status)
}
