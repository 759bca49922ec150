//! Running fenced code blocks through an external interpreter.
//!
//! The program body is written to a temporary file whose path is the
//! interpreter's only argument, and is also streamed line by line to its
//! standard input. Standard output is captured and returned once the process
//! exits and its pipes close. A process that outlives the timeout is killed,
//! and output still pending at the deadline is abandoned.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::ExecutionError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// What a code block printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Standard output lines joined with `\n`, without a trailing newline.
    pub stdout: String,
}

impl CapturedOutput {
    pub fn from_raw(raw: &str) -> Self {
        Self {
            stdout: raw.lines().collect::<Vec<_>>().join("\n"),
        }
    }
}

/// Runs the body of a code block with the named interpreter.
pub trait CodeExecutor {
    fn execute(&self, command: &str, code: &str) -> Result<CapturedOutput, ExecutionError>;
}

impl<F> CodeExecutor for F
where
    F: Fn(&str, &str) -> Result<CapturedOutput, ExecutionError>,
{
    fn execute(&self, command: &str, code: &str) -> Result<CapturedOutput, ExecutionError> {
        self(command, code)
    }
}

/// Executes code blocks as child processes with a wall-clock timeout.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    timeout: Duration,
}

impl ProcessExecutor {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

impl CodeExecutor for ProcessExecutor {
    fn execute(&self, command: &str, code: &str) -> Result<CapturedOutput, ExecutionError> {
        // Removed when dropped, on every exit path
        let mut code_file = tempfile::Builder::new()
            .prefix("scrip-")
            .suffix(".code")
            .tempfile()?;
        code_file.write_all(code.as_bytes())?;
        code_file.flush()?;

        log::debug!("Running `{command}` on {}", code_file.path().display());

        let mut child = Command::new(command)
            .arg(code_file.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let deadline = Instant::now() + self.timeout;
        let timed_out = || ExecutionError::Timeout {
            command: command.to_string(),
            timeout: self.timeout,
        };

        spawn_stdin_writer(&mut child, command, code);
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let Some(status) = wait_with_deadline(&mut child, deadline)? else {
            return Err(timed_out());
        };

        // Background processes started by the code can hold the pipes open
        // after the interpreter exits
        let (Some(stdout), Some(stderr)) = (
            receive_by(stdout, deadline)?,
            receive_by(stderr, deadline)?,
        ) else {
            log::debug!("Output pipes of `{command}` still open at the deadline");
            return Err(timed_out());
        };

        if !status.success() {
            return Err(ExecutionError::NonZeroExit {
                command: command.to_string(),
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CapturedOutput::from_raw(&stdout))
    }
}

/// Feed the code to the child's stdin, one line at a time. Never joined: a
/// process that stops reading must not block the render.
fn spawn_stdin_writer(child: &mut Child, command: &str, code: &str) {
    let Some(mut stdin) = child.stdin.take() else {
        return;
    };
    let command = command.to_string();
    let lines: Vec<String> = code.lines().map(str::to_string).collect();

    thread::spawn(move || {
        for line in lines {
            if let Err(e) = writeln!(stdin, "{line}") {
                // The interpreter may exit without draining stdin
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    log::debug!("Writing stdin of `{command}` failed: {e}");
                }
                return;
            }
        }
        // stdin drops here, closing the pipe
    });
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Receiver<std::io::Result<String>> {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut bytes = Vec::new();
        let result = pipe
            .read_to_end(&mut bytes)
            .map(|_| String::from_utf8_lossy(&bytes).into_owned());
        // Nobody is listening any more once the deadline has passed
        let _ = sender.send(result);
    });

    receiver
}

/// Everything read from a pipe, or `None` if it is still open at the deadline.
fn receive_by(
    pipe: Option<Receiver<std::io::Result<String>>>,
    deadline: Instant,
) -> Result<Option<String>, ExecutionError> {
    let Some(pipe) = pipe else {
        return Ok(Some(String::new()));
    };

    match pipe.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(result) => Ok(Some(result?)),
        Err(RecvTimeoutError::Timeout) => Ok(None),
        Err(RecvTimeoutError::Disconnected) => {
            Err(std::io::Error::other("pipe reader panicked").into())
        }
    }
}

/// Wait for the child to exit. Returns `None` after killing it at the deadline.
fn wait_with_deadline(
    child: &mut Child,
    deadline: Instant,
) -> Result<Option<ExitStatus>, ExecutionError> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            if let Err(e) = child.kill() {
                log::warn!("Failed to kill timed out process: {e}");
            }
            // Reap it so no zombie is left behind
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn captured_output_is_newline_insensitive() {
        assert_eq!(CapturedOutput::from_raw("2\n").stdout, "2");
        assert_eq!(CapturedOutput::from_raw("a\r\nb\r\n").stdout, "a\nb");
        assert_eq!(CapturedOutput::from_raw("").stdout, "");
    }

    #[test]
    fn closures_are_executors() {
        let echo = |command: &str, code: &str| -> Result<CapturedOutput, ExecutionError> {
            Ok(CapturedOutput {
                stdout: format!("{command}:{code}"),
            })
        };
        assert_eq!(echo.execute("sh", "true").unwrap().stdout, "sh:true");
    }

    #[test]
    fn missing_interpreter_fails_to_spawn() {
        let executor = ProcessExecutor::default();
        let result = executor.execute("scrip-no-such-interpreter", "print(1)");
        assert!(matches!(result, Err(ExecutionError::Spawn { .. })));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn runs_code_file_argument() {
            let executor = ProcessExecutor::default();
            let output = executor.execute("sh", "echo hello\necho world").unwrap();
            assert_eq!(output.stdout, "hello\nworld");
        }

        #[test]
        fn streams_code_lines_to_stdin() {
            // sh runs the file; `read` consumes the first line piped to stdin
            let executor = ProcessExecutor::default();
            let output = executor.execute("sh", "read line\necho \"got $line\"").unwrap();
            assert_eq!(output.stdout, "got read line");
        }

        #[test]
        fn non_zero_exit_is_an_error() {
            let executor = ProcessExecutor::default();
            let result = executor.execute("sh", "echo oops >&2\nexit 3");
            match result {
                Err(ExecutionError::NonZeroExit { stderr, .. }) => assert_eq!(stderr, "oops"),
                other => panic!("expected NonZeroExit, got {other:?}"),
            }
        }

        #[test]
        fn hung_process_times_out() {
            let executor = ProcessExecutor::new(Duration::from_millis(200));
            let started = Instant::now();

            let result = executor.execute("sh", "sleep 10");

            assert!(matches!(result, Err(ExecutionError::Timeout { .. })));
            assert!(started.elapsed() < Duration::from_secs(5));
        }

        #[test]
        fn background_process_holding_stdout_times_out() {
            let executor = ProcessExecutor::new(Duration::from_millis(200));
            let started = Instant::now();

            let result = executor.execute("sh", "sleep 4 &\necho hi");

            assert!(matches!(result, Err(ExecutionError::Timeout { .. })));
            assert!(started.elapsed() < Duration::from_secs(2));
        }

        #[test]
        fn interpreter_ignoring_stdin_still_succeeds() {
            let executor = ProcessExecutor::default();
            let code = "echo done\n".repeat(20_000);

            let output = executor.execute("sh", &code).unwrap();

            assert_eq!(output.stdout.lines().count(), 20_000);
        }
    }
}
