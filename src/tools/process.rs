use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::foundation::error::{DeckError, DeckResult};

/// Timeout applied to external tool invocations unless configured otherwise.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(60);

/// External program invocation template.
///
/// Arguments may contain `{id}`, `{input}` and `{output}` placeholders, substituted per call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program name or path.
    pub program: String,
    /// Argument templates.
    pub args: Vec<String>,
    /// Kill the process after this long. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl ToolCommand {
    /// Command with the default timeout.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: Some(DEFAULT_TOOL_TIMEOUT),
        }
    }

    /// Replace the timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments with placeholders substituted.
    pub fn expand(&self, vars: &[(&str, &str)]) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                let mut arg = arg.clone();
                for (name, value) in vars {
                    arg = arg.replace(&format!("{{{name}}}"), value);
                }
                arg
            })
            .collect()
    }

    /// Human-readable command line, for diagnostics.
    pub fn describe(&self, vars: &[(&str, &str)]) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.expand(vars));
        parts.join(" ")
    }
}

type Drain = JoinHandle<std::io::Result<Vec<u8>>>;

fn drain<R: Read + Send + 'static>(reader: Option<R>) -> Option<Drain> {
    reader.map(|mut r| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            r.read_to_end(&mut buf)?;
            Ok(buf)
        })
    })
}

fn join_drain(handle: Option<Drain>, command: &str, stream: &str) -> DeckResult<Vec<u8>> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };
    handle
        .join()
        .map_err(|_| DeckError::external_tool(command, format!("{stream} drain thread panicked")))?
        .map_err(|e| DeckError::external_tool(command, format!("{stream} read failed: {e}")))
}

/// Write `input` to the tool's stdin and close it. The tool may exit before reading everything;
/// its exit status tells the story then.
fn feed<W: Write + Send + 'static>(mut pipe: W, input: Vec<u8>) -> JoinHandle<std::io::Result<()>> {
    std::thread::spawn(move || match pipe.write_all(&input) {
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    })
}

/// Run a tool to completion and return its stdout.
///
/// `stdin`, when given, is written to the process and then closed. A non-zero exit, a timeout or a
/// spawn failure is an [`DeckError::ExternalTool`] carrying the command line and captured stderr.
pub fn run_tool(
    command: &ToolCommand,
    vars: &[(&str, &str)],
    stdin: Option<&[u8]>,
) -> DeckResult<Vec<u8>> {
    let line = command.describe(vars);
    tracing::debug!(command = %line, "running external tool");

    let mut child = Command::new(&command.program)
        .args(command.expand(vars))
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| DeckError::external_tool(&line, format!("failed to spawn: {e}")))?;

    let started = Instant::now();
    let stdout_drain = drain(child.stdout.take());
    let stderr_drain = drain(child.stderr.take());

    let feeder = match (stdin, child.stdin.take()) {
        (Some(input), Some(pipe)) => Some(feed(pipe, input.to_vec())),
        _ => None,
    };

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => {
                return Err(DeckError::external_tool(
                    &line,
                    format!("failed to wait: {e}"),
                ));
            }
        }
        if let Some(limit) = command.timeout
            && started.elapsed() >= limit
        {
            let _ = child.kill();
            let _ = child.wait();
            return Err(DeckError::external_tool(
                &line,
                format!("timed out after {limit:?}"),
            ));
        }
        std::thread::sleep(Duration::from_millis(5));
    };

    if let Some(handle) = feeder {
        handle
            .join()
            .map_err(|_| DeckError::external_tool(&line, "stdin writer thread panicked"))?
            .map_err(|e| DeckError::external_tool(&line, format!("failed to write stdin: {e}")))?;
    }
    let stdout = join_drain(stdout_drain, &line, "stdout")?;
    let stderr = join_drain(stderr_drain, &line, "stderr")?;
    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr);
        return Err(DeckError::external_tool(
            &line,
            format!("exited with status {status}: {}", stderr.trim()),
        ));
    }
    Ok(stdout)
}

/// Return `true` when `program` can be invoked from `PATH` with `arg`.
pub fn is_on_path(program: &str, arg: &str) -> bool {
    Command::new(program)
        .arg(arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/tools/process.rs"]
mod tests;
