pub mod cli;
pub mod filter;
pub mod logging;
pub mod output;
pub mod parser;
pub mod render;
pub mod stream;

use anyhow::Context;
use clap::CommandFactory;
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use cli::{Cli, cli_parse, stdin_has_data};
pub use filter::{Condition, Filter, FilterList, FilterValue, Highlights};
pub use output::Output;
pub use parser::{DecodedRecord, Field, FieldType, Level, decode_line};
pub use render::{Line, RenderConfig, render, render_line};
pub use stream::{FollowOptions, Source, SourceError, StreamStats, follow, read_all};

fn print_completion(shell: clap_complete::Shell) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "lj", &mut io::stdout());
}

/// Exit status after an interrupt, as for a process killed by SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Follows the source until interrupted with Ctrl-C
///
/// The first interrupt asks the loop to stop. When the source can block in a
/// read (a pipe, FIFO or terminal) the loop may never get to see that, so the
/// process exits right away; a second interrupt always exits. Rendered records
/// are flushed as they are written.
fn run_follow(
    reader: impl io::BufRead,
    config: &RenderConfig,
    colorize: bool,
    options: &FollowOptions,
    reads_can_block: bool,
) -> anyhow::Result<StreamStats> {
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        if handler_stop.swap(true, Ordering::SeqCst) || reads_can_block {
            tracing::info!("interrupted");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    })
    .context("Failed to install interrupt handler")?;

    let mut out = io::stdout();
    Ok(follow(reader, &mut out, config, colorize, options, &stop)?)
}

/// Reads the whole source, through a pager when writing to a terminal
fn run_bounded(
    reader: impl io::BufRead,
    config: &RenderConfig,
    colorize: bool,
    use_pager: bool,
) -> anyhow::Result<StreamStats> {
    let mut out = if use_pager {
        Output::paged()
    } else {
        Output::stdout()
    };

    let result = read_all(reader, &mut out, config, colorize);
    let finished = out.finish();

    let stats = result?;
    match finished {
        Err(err) if err.kind() != io::ErrorKind::BrokenPipe => {
            Err(err).context("Failed to finish output")
        }
        _ => Ok(stats),
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    logging::init_logging(cli.verbose);

    if let Some(shell) = cli.completion {
        print_completion(shell);
        return Ok(());
    }

    let Some((source, filter_tokens)) = cli.resolve_source(stdin_has_data()) else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let colorize = cli.colorize();
    colored::control::set_override(colorize);

    let config = RenderConfig::new(
        FilterList::parse(&filter_tokens),
        Highlights::new(cli.find.iter().cloned()),
        cli.strict,
    );

    tracing::debug!(
        source = %source,
        filters = config.filters.len(),
        highlights = config.highlights.terms.len(),
        strict = config.strict,
        follow = cli.follow,
        "starting"
    );

    let reader = source.open()?;

    let result = if cli.follow {
        let reads_can_block = !source.is_regular_file();
        run_follow(reader, &config, colorize, &cli.follow_options(), reads_can_block)
    } else {
        let use_pager = !cli.no_pager && io::stdout().is_terminal();
        run_bounded(reader, &config, colorize, use_pager)
    };

    match result {
        Ok(stats) => {
            tracing::debug!(
                lines = stats.lines_read,
                records = stats.records_rendered,
                "done"
            );
            Ok(())
        }
        Err(err)
            if err
                .downcast_ref::<SourceError>()
                .is_some_and(SourceError::is_broken_pipe) =>
        {
            Ok(())
        }
        Err(err) => Err(err),
    }
}
