// src/main.rs
//
// chatmark: render markdown-lite chat text to a safe HTML fragment
//
// - Reads INPUT (file, or stdin when absent or "-") and writes the fragment to
//   OUTPUT (file, or stdout).
// - --history treats INPUT as a JSON message history and renders the most
//   recent --limit messages, one <div class="message"> each.
// - --until <stage> stops after the named pipeline stage (debugging aid; the
//   output may still contain code placeholders).
//
// Each rendering option is on if its flag is given or its CHATMARK_* environment
// variable is set. Log level: --log-level, else RUST_LOG, else "warn".

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatmark::{history, Options, Pipeline, Stage};

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Emit class="language-<tag>" on tagged code fences
    #[arg(long = "fence-class", action = ArgAction::SetTrue)]
    fence_class: bool,

    /// Also escape ' as &#39;
    #[arg(long = "escape-apostrophe", action = ArgAction::SetTrue)]
    escape_apostrophe: bool,

    /// Render single newlines inside paragraphs as <br>
    #[arg(long = "hard-breaks", action = ArgAction::SetTrue)]
    hard_breaks: bool,

    /// Treat INPUT as a JSON message history
    #[arg(long, action = ArgAction::SetTrue)]
    history: bool,

    /// Number of most recent messages to render with --history
    #[arg(long, default_value_t = history::DEFAULT_LIMIT)]
    limit: usize,

    /// Stop after this pipeline stage
    #[arg(long, value_name = "STAGE")]
    until: Option<Stage>,

    /// Log filter, e.g. "debug" or "chatmark=trace"
    #[arg(long = "log-level", value_name = "LEVEL")]
    log_level: Option<String>,

    /// Input file (default: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn options_for(cli: &Cli) -> Options {
    let env = Options::from_env();
    Options::new()
        .with_fence_language_class(cli.fence_class || env.fence_language_class)
        .with_escape_apostrophe(cli.escape_apostrophe || env.escape_apostrophe)
        .with_hard_line_breaks(cli.hard_breaks || env.hard_line_breaks)
}

fn run(cli: &Cli) -> chatmark::Result<()> {
    let pipeline = Pipeline::new(options_for(cli));
    let src = read_input(cli.input.as_deref())?;

    let out = if cli.history {
        let messages = history::parse(&src)?;
        let shown = history::recent(&messages, cli.limit);
        info!(total = messages.len(), shown = shown.len(), "rendering history");
        history::render_history(shown, &pipeline)
    } else {
        match cli.until {
            Some(stage) => pipeline.render_until(&src, stage),
            None => pipeline.render(&src),
        }
    };

    write_output(cli.output.as_deref(), &out)
}

fn read_input(path: Option<&Path>) -> chatmark::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => Ok(String::from_utf8(fs::read(p)?)?),
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(String::from_utf8(buf)?)
        }
    }
}

fn write_output(path: Option<&Path>, html: &str) -> chatmark::Result<()> {
    match path {
        Some(p) => fs::write(p, html)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
