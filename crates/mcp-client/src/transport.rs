//! Transport layer: line-oriented I/O over a child process.
//!
//! The tool server is spawned from argument-vector config and spoken to
//! over inherited pipes, one newline-delimited JSON message per line.
//! Stderr is passed through to the parent's stderr for diagnostics; it
//! is not part of the protocol.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout};

use recap_domain::config::McpServerConfig;

/// Maximum number of non-JSON lines to skip before declaring the peer
/// broken (protects against a misconfigured server logging to stdout).
const MAX_SKIP_LINES: usize = 1000;

/// How long `stop()` waits for the child to exit after stdin closes
/// before killing it.
const STOP_GRACE: std::time::Duration = std::time::Duration::from_secs(5);

/// Errors that can occur during transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to spawn MCP server: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("MCP server stream closed")]
    Closed,

    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out waiting for response")]
    Timeout,
}

/// Line-oriented transport to an MCP peer.
#[async_trait]
pub trait Transport: Send {
    /// Launch the peer. Idempotent: a second call on a started
    /// transport is a no-op.
    async fn start(&mut self) -> Result<(), TransportError>;

    /// Write one line (newline appended, flushed immediately).
    async fn write_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Block until one full line is available. Fails with
    /// [`TransportError::Closed`] when the stream ends first.
    async fn read_line(&mut self) -> Result<String, TransportError>;

    /// Tear the peer down. Idempotent; never fails, safe after a failed
    /// `start()`.
    async fn stop(&mut self);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Stdio transport
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Stdio transport: communicates with a child process over stdin/stdout.
///
/// Owned by exactly one [`crate::McpClient`]; all methods take
/// `&mut self`, so there is no shared-access locking to get wrong.
pub struct StdioTransport {
    config: McpServerConfig,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: Option<BufReader<ChildStdout>>,
}

impl StdioTransport {
    /// Create an unstarted transport for the given server config.
    pub fn new(config: &McpServerConfig) -> Self {
        Self {
            config: config.clone(),
            child: None,
            stdin: None,
            stdout: None,
        }
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn start(&mut self) -> Result<(), TransportError> {
        if self.child.is_some() {
            return Ok(());
        }

        let mut cmd = tokio::process::Command::new(&self.config.command);
        cmd.args(&self.config.args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true);

        for (key, value) in &self.config.env {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().map_err(TransportError::Spawn)?;

        let stdin = child.stdin.take().ok_or_else(|| {
            TransportError::Spawn(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "failed to capture child stdin",
            ))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            TransportError::Spawn(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "failed to capture child stdout",
            ))
        })?;

        tracing::debug!(command = %self.config.command, "MCP server spawned");

        self.stdin = Some(stdin);
        self.stdout = Some(BufReader::new(stdout));
        self.child = Some(child);
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let stdin = self.stdin.as_mut().ok_or(TransportError::Closed)?;
        stdin.write_all(line.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String, TransportError> {
        let stdout = self.stdout.as_mut().ok_or(TransportError::Closed)?;
        let mut skipped = 0usize;
        loop {
            let mut line = String::new();
            let bytes_read = stdout.read_line(&mut line).await?;
            if bytes_read == 0 {
                // Peer exited or closed its stdout before producing a line.
                self.stdout = None;
                return Err(TransportError::Closed);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            // Skip lines that don't look like JSON (e.g. a peer that
            // logs to stdout by mistake).
            if trimmed.starts_with('{') {
                return Ok(trimmed.to_string());
            }
            skipped += 1;
            if skipped >= MAX_SKIP_LINES {
                self.stdout = None;
                return Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "MCP server produced too many non-JSON lines on stdout",
                )));
            }
            tracing::debug!(line = %trimmed, "skipping non-JSON line from MCP server stdout");
        }
    }

    async fn stop(&mut self) {
        // Close stdin first to signal no more requests.
        if let Some(mut stdin) = self.stdin.take() {
            if let Err(e) = stdin.shutdown().await {
                tracing::debug!(error = %e, "error closing MCP server stdin");
            }
        }
        self.stdout = None;

        let Some(mut child) = self.child.take() else {
            return;
        };

        // Give the process a moment to exit on its own.
        match tokio::time::timeout(STOP_GRACE, child.wait()).await {
            Ok(Ok(status)) => {
                tracing::debug!(?status, "MCP server process exited");
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "error waiting for MCP server process");
            }
            Err(_) => {
                tracing::warn!("MCP server process did not exit within grace period, killing");
                if let Err(e) = child.kill().await {
                    tracing::warn!(error = %e, "failed to kill MCP server process");
                }
            }
        }
    }
}
