use crate::stream::{FollowOptions, POLL_INTERVAL, Source};
use clap::{ArgAction, Parser};
use clap_complete::Shell;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

const FILTER_HELP: &str = "\
You can filter log records using a simple query language:

  value          search for occurrences in msg field
  field:value    positive exact search
  field:!value   negative exact search
  field:~value   search for occurrences
  field:>value   equal or greater
  field:<value   equal or less

Examples:
  lj log.json                                  Read log file
  lj < log.json                                Read log file with redirect
  tail -100 log.json | lj                      Read the tail of a log file
  kubectl logs -f mypod | lj -F -f update -f insert
                                               Follow a stream and highlight words
  lj log.json level:warn 'caller:~app/db.go' 'proc-time:>15'
                                               Read log file and filter records";

/// Tool for viewing JSON logs
#[derive(Parser, Debug)]
#[command(
    name = "lj",
    author,
    version,
    about,
    long_about = None,
    after_help = FILTER_HELP,
    disable_version_flag = true
)]
pub struct Cli {
    /// Log file ("-" for stdin) followed by filters
    #[arg(value_name = "SOURCE|FILTER")]
    pub args: Vec<String>,

    /// Read log stream
    #[arg(short = 'F', long)]
    pub follow: bool,

    /// Don't print non-JSON data
    #[arg(short = 'S', long)]
    pub strict: bool,

    /// Find and highlight part of message (repeatable)
    #[arg(short = 'f', long = "find", value_name = "TEXT")]
    pub find: Vec<String>,

    /// Disable pager
    #[arg(long = "no-pager", visible_alias = "NP", env = "LJ_NO_PAGER")]
    pub no_pager: bool,

    /// Disable colors in output
    #[arg(long = "no-color", visible_alias = "NC")]
    pub no_color: bool,

    /// Seconds without output before follow mode prints a separator
    #[arg(long, value_name = "SECS", default_value_t = 30, env = "LJ_IDLE_INTERVAL")]
    pub idle_interval: u64,

    /// Print diagnostics to stderr (repeat for more)
    #[arg(long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print completion script for the given shell
    #[arg(long, value_name = "SHELL")]
    pub completion: Option<Shell>,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    /// Splits positional arguments into the source and filter tokens
    ///
    /// With data on stdin every argument is a filter, except a leading `-`.
    /// Otherwise the first argument is the file to read; `None` means there is
    /// nothing to read.
    pub fn resolve_source(&self, stdin_has_data: bool) -> Option<(Source, Vec<String>)> {
        match self.args.split_first() {
            Some((first, rest)) if first == "-" => Some((Source::Stdin, rest.to_vec())),
            _ if stdin_has_data => Some((Source::Stdin, self.args.clone())),
            Some((first, rest)) => Some((Source::File(PathBuf::from(first)), rest.to_vec())),
            None => None,
        }
    }

    pub fn follow_options(&self) -> FollowOptions {
        FollowOptions {
            poll_interval: POLL_INTERVAL,
            idle_interval: Duration::from_secs(self.idle_interval),
        }
    }

    /// Whether output should carry ANSI styling
    pub fn colorize(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
    }
}

/// Whether stdin is a pipe or a redirected file rather than a terminal or device
#[cfg(unix)]
pub fn stdin_has_data() -> bool {
    use std::os::fd::AsFd;
    use std::os::unix::fs::FileTypeExt;

    let Ok(fd) = io::stdin().as_fd().try_clone_to_owned() else {
        return false;
    };

    std::fs::File::from(fd)
        .metadata()
        .is_ok_and(|meta| !meta.file_type().is_char_device())
}

#[cfg(not(unix))]
pub fn stdin_has_data() -> bool {
    !io::stdin().is_terminal()
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
