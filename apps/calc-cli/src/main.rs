use anyhow::{Context, Result};
use async_trait::async_trait;
use calc_engine::{
    CalcConfig, CalcError, CalculatorInteraction, LineInteraction, Registry, Session,
    config::load_config,
    interaction::{menu_lines, render_error},
};
use clap::Parser;
use console::{Term, style};
use dialoguer::{Input, theme::ColorfulTheme};
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not clear the screen between steps
    #[arg(long)]
    no_clear: bool,

    /// Do not wait for Enter after each result
    #[arg(long)]
    no_pause: bool,

    /// Decimal places used when printing results
    #[arg(short, long)]
    precision: Option<usize>,

    /// Plain line-based I/O even when attached to a terminal
    #[arg(long)]
    plain: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

struct TerminalInteraction {
    term: Term,
}

impl TerminalInteraction {
    fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

#[async_trait]
impl CalculatorInteraction for TerminalInteraction {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let input = Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        match input {
            Ok(line) => Ok(Some(line)),
            Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e).context("Failed to read input"),
        }
    }

    async fn pause(&mut self) -> Result<()> {
        self.term
            .write_str(&format!("\n{}", style("Press Enter to continue...").dim()))?;
        self.term.read_line()?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        self.term.clear_screen()?;
        Ok(())
    }

    fn show_menu(&mut self, title: &str, registry: &Registry) -> Result<()> {
        self.term
            .write_line(&style(format!("=== {} ===", title)).bold().cyan().to_string())?;
        self.term.write_line("Available operations:")?;
        for line in menu_lines(registry) {
            self.term.write_line(&format!("  {}", line))?;
        }
        Ok(())
    }

    fn show_result(&mut self, value: &str) -> Result<()> {
        self.term
            .write_line(&format!("{} {}", style("Result:").bold().green(), value))?;
        Ok(())
    }

    fn show_error(&mut self, error: &CalcError) -> Result<()> {
        let message = render_error(error);
        let styled = match error {
            CalcError::UnknownSelector(_) => style(message).yellow(),
            _ => style(message).red(),
        };
        self.term.write_line(&styled.to_string())?;
        Ok(())
    }

    fn farewell(&mut self) -> Result<()> {
        self.term.write_line(&style("Goodbye!").bold().to_string())?;
        Ok(())
    }
}

/// `RUST_LOG` wins over both built-in filters.
fn log_directives(debug: bool, rust_log: Option<String>) -> String {
    match rust_log.filter(|v| !v.trim().is_empty()) {
        Some(directives) => directives,
        None if debug => "info,calc_cli=debug,calc_engine=debug".to_string(),
        None => "warn,calc_cli=info,calc_engine=info".to_string(),
    }
}

fn setup_logging(debug: bool) {
    let directives = log_directives(debug, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directives)
        .unwrap_or_else(|_| EnvFilter::new(log_directives(debug, None)));

    fmt::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Config file first, then command-line overrides.
async fn build_config(args: &Args) -> Result<CalcConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path).await?,
        None => CalcConfig::default(),
    };

    if args.no_clear {
        config.clear_screen = false;
    }
    if args.no_pause {
        config.pause_after_result = false;
    }
    if args.precision.is_some() {
        config.precision = args.precision;
    }
    config
        .validate()
        .context("Invalid command-line overrides")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug);

    let config = build_config(&args).await?;
    debug!(?config, "Configuration resolved");
    let session = Session::new(Registry::standard(), config);

    let attended = console::user_attended() && io::stdin().is_terminal();
    let summary = if args.plain || !attended {
        info!("Using plain line interaction");
        let mut ui = LineInteraction::new(BufReader::new(io::stdin()), io::stdout());
        session.run(&mut ui).await?
    } else {
        let mut ui = TerminalInteraction::new();
        session.run(&mut ui).await?
    };

    debug!(?summary, "Calculator finished");
    Ok(())
}
