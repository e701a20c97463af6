//! # Command Execution Module / 命令执行模块
//!
//! Spawns a child process with stdin closed, drains its stdout and stderr
//! concurrently into separate buffers, and waits for it under an optional
//! time limit and a cancellation token.
//!
//! 以关闭的 stdin 派生子进程，并发地将其 stdout 和 stderr 读入各自的缓冲区，
//! 并在可选的时间限制和取消令牌下等待其结束。

use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How long the pipe readers may keep draining after the child is gone.
/// A killed child can leave grandchildren holding the pipes open.
const OUTPUT_GRACE: Duration = Duration::from_secs(2);

/// Text captured from the two output streams, decoded lossily as UTF-8.
/// 从两个输出流捕获的文本，按 UTF-8 有损解码。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// How a spawned child came to an end.
/// 已派生子进程的结束方式。
#[derive(Debug)]
pub enum ProcessOutcome {
    /// The child terminated on its own (normally or from a signal).
    Exited {
        status: ExitStatus,
        output: CapturedOutput,
    },
    /// The child exceeded `limit` and was killed.
    TimedOut {
        limit: Duration,
        output: CapturedOutput,
    },
    /// The cancellation token fired and the child was killed.
    Cancelled { output: CapturedOutput },
}

enum Ending {
    Exited(io::Result<ExitStatus>),
    TimedOut(Duration),
    Cancelled,
}

/// Spawns a command and captures its stdout and stderr separately.
/// The output streams are read concurrently so neither pipe can fill up and
/// stall the child.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
/// * `timeout` - Optional limit after which the child is killed.
/// * `cancel` - Token that kills the child when cancelled.
///
/// # Returns
/// An `io::Error` if the process could not be spawned at all, otherwise the
/// `ProcessOutcome` with everything captured up to the end.
///
/// 派生一个命令，分别捕获其 stdout 和 stderr。
/// 两个输出流被并发读取，因此任何一个管道都不会被写满而阻塞子进程。
pub async fn spawn_and_capture(
    mut cmd: Command,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> io::Result<ProcessOutcome> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("failed to capture stderr"))?;

    let stdout_buf = Arc::new(Mutex::new(Vec::new()));
    let stderr_buf = Arc::new(Mutex::new(Vec::new()));
    let stdout_handle = tokio::spawn(drain(stdout, Arc::clone(&stdout_buf)));
    let stderr_handle = tokio::spawn(drain(stderr, Arc::clone(&stderr_buf)));

    let ending = tokio::select! {
        biased;
        _ = cancel.cancelled() => Ending::Cancelled,
        ending = wait_with_limit(&mut child, timeout) => ending,
    };

    if !matches!(ending, Ending::Exited(_)) {
        if let Err(e) = child.kill().await {
            tracing::warn!(error = %e, "failed to kill child process");
        }
    }

    let output = CapturedOutput {
        stdout: collect(stdout_handle, stdout_buf).await,
        stderr: collect(stderr_handle, stderr_buf).await,
    };

    Ok(match ending {
        Ending::Exited(status) => ProcessOutcome::Exited {
            status: status?,
            output,
        },
        Ending::TimedOut(limit) => ProcessOutcome::TimedOut { limit, output },
        Ending::Cancelled => ProcessOutcome::Cancelled { output },
    })
}

async fn wait_with_limit(child: &mut Child, timeout: Option<Duration>) -> Ending {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => Ending::Exited(status),
            Err(_) => Ending::TimedOut(limit),
        },
        None => Ending::Exited(child.wait().await),
    }
}

async fn drain<R: AsyncRead + Unpin>(mut reader: R, sink: Arc<Mutex<Vec<u8>>>) {
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => sink.lock().await.extend_from_slice(&chunk[..n]),
            Err(e) => {
                tracing::debug!(error = %e, "stopped reading child output");
                break;
            }
        }
    }
}

async fn collect(mut handle: JoinHandle<()>, sink: Arc<Mutex<Vec<u8>>>) -> String {
    if tokio::time::timeout(OUTPUT_GRACE, &mut handle).await.is_err() {
        tracing::warn!("child output still open after exit, keeping what was read");
        handle.abort();
    }
    let bytes = sink.lock().await;
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Exit code of a finished process. Deaths by signal are mapped to
/// `128 + signal`, as shells report them.
/// 已结束进程的退出码。因信号终止的进程按 shell 的惯例映射为 `128 + 信号值`。
pub fn exit_code_of(status: &ExitStatus) -> Option<i32> {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status.code().or_else(|| status.signal().map(|sig| 128 + sig))
    }
    #[cfg(not(unix))]
    {
        status.code()
    }
}
