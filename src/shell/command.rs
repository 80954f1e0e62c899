//! Subprocess invocation and execution.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::platform::Privilege;

/// A single program invocation, built up before it is handed to a runner.
///
/// Arguments are passed directly to the program, never through a shell,
/// so package names and paths need no quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute (looked up on PATH).
    pub program: String,

    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Working directory (None = inherit).
    pub cwd: Option<PathBuf>,

    /// Extra environment variables (merged with the process env).
    pub env: Vec<(String, String)>,

    /// Whether the invocation changes system state. Read-only queries
    /// still run during `--dry-run`.
    pub mutating: bool,
}

impl Invocation {
    /// Create a mutating invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            mutating: true,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    /// Set the working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Mark this invocation as a read-only query.
    pub fn query(mut self) -> Self {
        self.mutating = false;
        self
    }

    /// Run through `sudo` when the privilege requires it.
    pub fn with_privilege(self, privilege: Privilege) -> Self {
        match privilege {
            Privilege::Direct => self,
            Privilege::Sudo => {
                let mut args = Vec::with_capacity(self.args.len() + 1);
                args.push(self.program);
                args.extend(self.args);
                Self {
                    program: "sudo".to_string(),
                    args,
                    ..self
                }
            }
        }
    }

    /// The program that actually does the work, looking through `sudo`.
    pub fn effective_program(&self) -> &str {
        if self.program == "sudo" {
            self.args.first().map_or(self.program.as_str(), String::as_str)
        } else {
            &self.program
        }
    }

    /// Render as a copy-pasteable command line.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+@%,".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Result of executing a command.
#[derive(Debug, Clone, Default)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            success: true,
            ..Default::default()
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stderr: stderr.into(),
            success: false,
            ..Default::default()
        }
    }

    /// The last `max_lines` lines of stdout and stderr, for error reports.
    pub fn output_tail(&self, max_lines: usize) -> String {
        let mut tail: VecDeque<&str> = VecDeque::with_capacity(max_lines);
        for line in self.stdout.lines().chain(self.stderr.lines()) {
            if line.trim().is_empty() {
                continue;
            }
            if tail.len() == max_lines {
                tail.pop_front();
            }
            tail.push_back(line);
        }
        tail.into_iter().collect::<Vec<_>>().join("\n")
    }
}

/// Output line from command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    /// The line text regardless of stream.
    pub fn text(&self) -> &str {
        match self {
            Self::Stdout(s) | Self::Stderr(s) => s,
        }
    }
}

/// Callback for streaming output.
pub type OutputCallback = Box<dyn Fn(OutputLine) + Send>;

/// Execute an invocation, streaming each output line to `on_output`.
///
/// Stdout and stderr are read on helper threads and delivered to the
/// callback on the calling thread. Both streams are also captured in the
/// returned [`CommandResult`]. Returns an error only if the program could
/// not be started.
pub fn execute_streaming(
    invocation: &Invocation,
    on_output: &dyn Fn(OutputLine),
) -> io::Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);

    if let Some(cwd) = &invocation.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &invocation.env {
        cmd.env(key, value);
    }

    // stdin stays attached so sudo and package managers can prompt
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("child stderr was not captured"))?;

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle =
        thread::spawn(move || forward_lines(stdout, &tx_stdout, OutputLine::Stdout));
    let stderr_handle =
        thread::spawn(move || forward_lines(stderr, &tx_stderr, OutputLine::Stderr));

    for line in rx {
        on_output(line);
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait()?;

    Ok(CommandResult {
        exit_code: status.code(),
        stdout: stdout_output,
        stderr: stderr_output,
        duration: start.elapsed(),
        success: status.success(),
    })
}

/// Read `source` to EOF, sending each line and returning the whole text.
///
/// Lines are split on raw bytes and decoded lossily. The pipe stays open
/// until the child closes it.
fn forward_lines<R: Read>(
    source: R,
    tx: &mpsc::Sender<OutputLine>,
    wrap: fn(String) -> OutputLine,
) -> String {
    let mut reader = BufReader::new(source);
    let mut output = String::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\n', '\r']).to_string();
        output.push_str(&line);
        output.push('\n');
        let _ = tx.send(wrap(line));
    }
    output
}
