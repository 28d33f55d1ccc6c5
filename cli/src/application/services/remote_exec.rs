//! Remote execution: connect with retry, request a PTY, run one command with
//! the local standard streams attached.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{cancellable, pause};
use crate::application::ports::{
    LocalStdio, ProgressReporter, RemoteProcess, RemoteSession, RemoteShell,
};
use crate::domain::{ConnectPolicy, DeployError, PtySpec};

/// What to run on the remote host and how to reach it.
pub struct ExecRequest<'a> {
    pub command: &'a str,
    pub pty: &'a PtySpec,
    pub policy: ConnectPolicy,
}

/// Dial `address` until a connection succeeds or `policy.attempt_limit` is spent.
///
/// Stops at the first successful dial. Sleeps `policy.interval` after each
/// failure except the last.
///
/// # Errors
///
/// Returns `DeployError::Connect` when every attempt failed, or
/// `DeployError::Cancelled`.
pub async fn connect_with_retry<S: RemoteShell>(
    shell: &S,
    address: &str,
    policy: ConnectPolicy,
    cancel: &CancellationToken,
    reporter: &impl ProgressReporter,
) -> Result<S::Session> {
    let mut last_error = String::from("no attempt made");
    for attempt in 1..=policy.attempt_limit {
        match cancellable(shell.connect(address), cancel).await? {
            Ok(session) => {
                info!(%address, attempt, "connection established");
                return Ok(session);
            }
            Err(e) => {
                last_error = format!("{e:#}");
                debug!(
                    %address,
                    attempt,
                    limit = policy.attempt_limit,
                    error = %last_error,
                    "failed to dial"
                );
                if attempt < policy.attempt_limit {
                    reporter.warn(&format!(
                        "ssh not reachable yet (attempt {attempt}/{}), retrying in {}s",
                        policy.attempt_limit,
                        policy.interval.as_secs()
                    ));
                    pause(policy.interval, cancel).await?;
                }
            }
        }
    }
    Err(DeployError::Connect {
        address: address.to_string(),
        attempts: policy.attempt_limit,
        last_error,
    }
    .into())
}

/// Connect to `address`, run `request.command` in a PTY and wait for it.
///
/// # Errors
///
/// Returns `DeployError::Connect`, `DeployError::Session` if the PTY or the
/// command could not be started, `DeployError::Command` if the command
/// failed, or `DeployError::Cancelled`.
pub async fn execute<S, I, O, E>(
    shell: &S,
    address: &str,
    request: &ExecRequest<'_>,
    stdio: LocalStdio<I, O, E>,
    cancel: &CancellationToken,
    reporter: &impl ProgressReporter,
) -> Result<()>
where
    S: RemoteShell,
    I: AsyncRead + Unpin + Send + 'static,
    O: AsyncWrite + Unpin + Send + 'static,
    E: AsyncWrite + Unpin + Send + 'static,
{
    reporter.step(&format!("connecting to {address}..."));
    let mut session = connect_with_retry(shell, address, request.policy, cancel, reporter).await?;
    reporter.success(&format!("connected to {address}"));

    session
        .request_pty(request.pty)
        .await
        .map_err(|e| DeployError::Session(format!("pseudo-terminal request failed: {e:#}")))?;
    let process = session
        .start(request.command)
        .await
        .map_err(|e| DeployError::Session(format!("could not start command: {e:#}")))?;

    reporter.step("running installer...");
    let outcome = run_attached(process, stdio, cancel).await;

    if let Err(e) = session.close().await {
        debug!(error = %format!("{e:#}"), "session close failed");
    }
    outcome?;
    reporter.success("installer finished");
    Ok(())
}

/// Copy local stdin to the process and its output to local stdout/stderr
/// until it exits.
///
/// The three copy tasks live only as long as this call: output tasks are
/// joined so nothing written by the command is lost, the stdin task is
/// aborted because it may be parked on a terminal read.
///
/// # Errors
///
/// Returns `DeployError::Command` if the command exits non-zero or without a
/// status, or `DeployError::Cancelled`.
pub async fn run_attached<I, O, E>(
    process: RemoteProcess,
    stdio: LocalStdio<I, O, E>,
    cancel: &CancellationToken,
) -> Result<()>
where
    I: AsyncRead + Unpin + Send + 'static,
    O: AsyncWrite + Unpin + Send + 'static,
    E: AsyncWrite + Unpin + Send + 'static,
{
    let RemoteProcess {
        stdin: mut remote_in,
        stdout: mut remote_out,
        stderr: mut remote_err,
        exit,
    } = process;
    let LocalStdio {
        stdin: mut local_in,
        stdout: mut local_out,
        stderr: mut local_err,
    } = stdio;

    let stdin_task = tokio::spawn(async move {
        let copied = tokio::io::copy(&mut local_in, &mut remote_in).await;
        if let Err(e) = remote_in.shutdown().await {
            debug!(error = %e, "closing remote stdin failed");
        }
        copied
    });
    let stdout_task = tokio::spawn(async move {
        let copied = tokio::io::copy(&mut remote_out, &mut local_out).await?;
        local_out.flush().await?;
        Ok::<_, std::io::Error>(copied)
    });
    let stderr_task = tokio::spawn(async move {
        let copied = tokio::io::copy(&mut remote_err, &mut local_err).await?;
        local_err.flush().await?;
        Ok::<_, std::io::Error>(copied)
    });

    let status = tokio::select! {
        biased;
        () = cancel.cancelled() => {
            stdin_task.abort();
            stdout_task.abort();
            stderr_task.abort();
            return Err(DeployError::Cancelled.into());
        }
        status = exit => status,
    };

    stdin_task.abort();
    join_copy("stdout", stdout_task).await;
    join_copy("stderr", stderr_task).await;

    match status {
        Ok(Some(0)) => {
            info!("remote command exited successfully");
            Ok(())
        }
        Ok(Some(code)) => {
            Err(DeployError::Command(format!("exited with status {code}")).into())
        }
        Ok(None) => Err(DeployError::Command("exited without reporting a status".into()).into()),
        Err(e) => Err(DeployError::Command(format!("{e:#}")).into()),
    }
}

async fn join_copy(stream: &str, task: JoinHandle<std::io::Result<u64>>) {
    match task.await {
        Ok(Ok(bytes)) => debug!(stream, bytes, "stream closed"),
        Ok(Err(e)) => warn!(stream, error = %e, "stream copy failed"),
        Err(e) => warn!(stream, error = %e, "stream copy task ended abnormally"),
    }
}
