use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

/// Pager used when `$PAGER` is not set
pub const DEFAULT_PAGER: &str = "less -R";

/// Destination for rendered lines
pub enum Output {
    Stdout(io::Stdout),
    Pager { child: Child, stdin: ChildStdin },
}

impl Output {
    pub fn stdout() -> Self {
        Output::Stdout(io::stdout())
    }

    /// Pipes output through a pager, falling back to stdout when it can't start
    pub fn paged() -> Self {
        let command = pager_command(env::var("PAGER").ok().as_deref());
        match spawn_pager(&command) {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(pager = ?command, error = %err, "failed to start pager, using stdout");
                Output::stdout()
            }
        }
    }

    /// Flushes output and waits for the pager to exit
    pub fn finish(self) -> io::Result<()> {
        match self {
            Output::Stdout(mut stdout) => stdout.flush(),
            Output::Pager { mut child, stdin } => {
                drop(stdin);
                child.wait()?;
                Ok(())
            }
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(stdout) => stdout.write(buf),
            Output::Pager { stdin, .. } => stdin.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(stdout) => stdout.flush(),
            Output::Pager { stdin, .. } => stdin.flush(),
        }
    }
}

/// Splits a pager command line into program and arguments
///
/// A bare `less` gets `-R` so styling survives paging.
pub fn pager_command(pager: Option<&str>) -> Vec<String> {
    let pager = pager
        .map(str::trim)
        .filter(|pager| !pager.is_empty())
        .unwrap_or(DEFAULT_PAGER);

    let mut command: Vec<String> = pager.split_whitespace().map(String::from).collect();
    let is_less = Path::new(&command[0])
        .file_name()
        .is_some_and(|name| name == "less");

    if is_less && command.len() == 1 {
        command.push("-R".to_string());
    }

    command
}

fn spawn_pager(command: &[String]) -> io::Result<Output> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty pager command"))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("pager stdin is not available"))?;

    Ok(Output::Pager { child, stdin })
}
