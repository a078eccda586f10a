use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Longest stderr excerpt carried into an error message
const MAX_STDERR_CHARS: usize = 512;

/// A fully resolved external tool call: program plus ordered arguments.
/// Executed directly, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Arguments as UTF-8 (lossy), handy for logging and assertions
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed with {}{}", describe_code(.code), describe_stderr(.stderr))]
    Exit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} timed out after {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Run an invocation to completion, bounded by `timeout`.
///
/// stdin and stdout are detached; stderr is captured so a failing tool can
/// explain itself. If the timeout elapses the child is killed.
pub async fn run(invocation: &Invocation, timeout: Duration) -> Result<(), ProcessError> {
    let started = Instant::now();

    let child = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

    // Dropping the wait future on timeout drops the child, which kills it
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|source| ProcessError::Wait {
            program: invocation.program.clone(),
            source,
        })?,
        Err(_) => {
            tracing::warn!(
                program = %invocation.program,
                timeout_secs = timeout.as_secs(),
                "External process timed out, killing it"
            );
            return Err(ProcessError::Timeout {
                program: invocation.program.clone(),
                timeout,
            });
        }
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;

    if output.status.success() {
        tracing::debug!(
            program = %invocation.program,
            elapsed_ms,
            "External process finished"
        );
        return Ok(());
    }

    let stderr: String = String::from_utf8_lossy(&output.stderr)
        .trim()
        .chars()
        .take(MAX_STDERR_CHARS)
        .collect();

    tracing::warn!(
        program = %invocation.program,
        code = ?output.status.code(),
        elapsed_ms,
        stderr = %stderr,
        "External process failed"
    );

    Err(ProcessError::Exit {
        program: invocation.program.clone(),
        code: output.status.code(),
        stderr,
    })
}

/// Whether `program` resolves to a file, either as a path or through `PATH`
pub fn is_available(program: &str) -> bool {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file();
    }

    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
