//! `curl`-process implementation of [`SystemDownloadService`].
//!
//! Each job is one `curl` child writing straight to the requested file.
//! The bearer token travels on stdin (`--header @-`) so it never shows up in
//! the process list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use edgefetch_core::download::{AcquireError, AcquireResult};
use edgefetch_core::ports::{
    SystemDownloadRequest, SystemDownloadService, SystemJobId, SystemJobStatus,
};
use edgefetch_core::settings::EngineSettings;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::debug;

/// Reason code used when no process exit code is available.
const NO_EXIT_CODE: i32 = -1;

struct CurlJob {
    child: Child,
    destination: PathBuf,
    expected_size: Option<u64>,
    finished: Option<SystemJobStatus>,
}

/// Runs downloads as external `curl` processes.
pub struct CurlDownloadService {
    binary: Option<PathBuf>,
    connect_timeout: Duration,
    next_id: AtomicU64,
    jobs: Mutex<HashMap<SystemJobId, CurlJob>>,
}

impl CurlDownloadService {
    /// Locate `curl` on `PATH`.
    pub fn new(settings: &EngineSettings) -> Self {
        let binary = which::which("curl").ok();
        debug!(curl = ?binary, "Detected curl");
        Self::with_binary(binary, settings.connect_timeout)
    }

    /// Use a specific binary (or none).
    pub fn with_binary(binary: Option<PathBuf>, connect_timeout: Duration) -> Self {
        Self {
            binary,
            connect_timeout,
            next_id: AtomicU64::new(1),
            jobs: Mutex::new(HashMap::new()),
        }
    }

    fn command(&self, binary: &Path, request: &SystemDownloadRequest) -> Command {
        let mut cmd = Command::new(binary);
        cmd.arg("--location")
            .arg("--fail")
            .arg("--silent")
            .arg("--show-error")
            .arg("--connect-timeout")
            .arg(self.connect_timeout.as_secs().max(1).to_string())
            .arg("--output")
            .arg(&request.destination);

        if request.bearer_token.is_some() {
            cmd.arg("--header").arg("@-").stdin(Stdio::piped());
        } else {
            cmd.stdin(Stdio::null());
        }

        cmd.arg(&request.url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl SystemDownloadService for CurlDownloadService {
    fn is_available(&self) -> bool {
        self.binary.is_some()
    }

    async fn enqueue(&self, request: SystemDownloadRequest) -> AcquireResult<SystemJobId> {
        let Some(binary) = self.binary.as_ref() else {
            return Err(AcquireError::SystemBackend {
                reason_code: NO_EXIT_CODE,
                message: "curl was not found on PATH".to_string(),
            });
        };

        let mut child = self
            .command(binary, &request)
            .spawn()
            .map_err(|e| AcquireError::SystemBackend {
                reason_code: NO_EXIT_CODE,
                message: format!("Failed to spawn curl: {e}"),
            })?;

        if let Some(token) = request.bearer_token.as_deref() {
            if let Some(mut stdin) = child.stdin.take() {
                let header = format!("Authorization: Bearer {token}\n");
                stdin.write_all(header.as_bytes()).await?;
                stdin.shutdown().await?;
            }
        }

        let id = SystemJobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(job = %id, url = %request.url, "Started curl");

        self.jobs.lock().await.insert(
            id,
            CurlJob {
                child,
                destination: request.destination,
                expected_size: request.expected_size,
                finished: None,
            },
        );
        Ok(id)
    }

    async fn status(&self, id: SystemJobId) -> AcquireResult<SystemJobStatus> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs.get_mut(&id).ok_or_else(|| AcquireError::SystemBackend {
            reason_code: NO_EXIT_CODE,
            message: format!("unknown job {id}"),
        })?;

        if let Some(finished) = &job.finished {
            return Ok(finished.clone());
        }

        let exit = job.child.try_wait()?;
        let written = tokio::fs::metadata(&job.destination)
            .await
            .ok()
            .map(|m| m.len());

        let Some(exit) = exit else {
            return Ok(written.map_or(SystemJobStatus::Pending, |bytes| {
                SystemJobStatus::Running {
                    downloaded_bytes: bytes,
                    total_bytes: job.expected_size,
                }
            }));
        };

        let status = if exit.success() {
            SystemJobStatus::Succeeded {
                downloaded_bytes: written.unwrap_or(0),
            }
        } else {
            let code = exit.code().unwrap_or(NO_EXIT_CODE);
            let stderr = match job.child.stderr.take() {
                Some(pipe) => read_stderr(pipe).await,
                None => String::new(),
            };
            let detail = stderr.trim();
            SystemJobStatus::Failed {
                reason_code: code,
                message: if detail.is_empty() {
                    describe_exit_code(code).to_string()
                } else {
                    format!("{}: {detail}", describe_exit_code(code))
                },
            }
        };

        debug!(job = %id, ?status, "curl finished");
        job.finished = Some(status.clone());
        Ok(status)
    }

    async fn remove(&self, id: SystemJobId) -> AcquireResult<()> {
        let Some(mut job) = self.jobs.lock().await.remove(&id) else {
            return Ok(());
        };
        if job.finished.is_none() && job.child.try_wait()?.is_none() {
            debug!(job = %id, "Killing curl");
            job.child.start_kill()?;
            job.child.wait().await?;
        }
        Ok(())
    }
}

const fn describe_exit_code(code: i32) -> &'static str {
    match code {
        6 => "could not resolve host",
        7 => "failed to connect",
        18 => "transfer ended early",
        22 => "server returned an HTTP error",
        23 => "could not write the output file",
        28 => "operation timed out",
        35 => "TLS handshake failed",
        37 => "could not read file",
        56 => "failure receiving network data",
        _ => "curl failed",
    }
}

/// Drain curl's stderr, keeping whatever arrived before a read failure.
async fn read_stderr<R: AsyncRead + Unpin>(mut pipe: R) -> String {
    let mut raw = Vec::new();
    if let Err(e) = pipe.read_to_end(&mut raw).await {
        debug!(error = %e, "Failed to read curl stderr");
    }
    String::from_utf8_lossy(&raw).into_owned()
}
