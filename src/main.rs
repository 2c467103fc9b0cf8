//! Client Data Collector CLI
//!
//! Runs the collector against a recorded host fixture.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_data_collector::{
    Collector, Config, EventBinder, ReplayScript, Snapshot, StaticHost, Trigger,
    DATA_DECLARATION, VERSION,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "client-data-collector")]
#[command(version = VERSION)]
#[command(about = "Environment snapshot collector for browser-like hosts", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect one snapshot and print it as JSON
    Collect {
        /// Host fixture (JSON)
        #[arg(long)]
        host: PathBuf,

        /// Trigger label for the snapshot
        #[arg(long, default_value = "manual")]
        trigger: Trigger,

        /// Print on one line instead of pretty JSON
        #[arg(long)]
        compact: bool,
    },

    /// Replay a recorded event script and print every snapshot it produces
    Replay {
        /// Host fixture (JSON)
        #[arg(long)]
        host: PathBuf,

        /// Event script (JSON Lines)
        #[arg(long)]
        events: PathBuf,

        /// Write snapshots to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Display the data collection declaration
    Declaration,

    /// Show configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Jsonl,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Collect {
            host,
            trigger,
            compact,
        } => {
            let config = load_config(cli.config.as_deref())?;
            cmd_collect(config, &host, trigger, compact)
        }
        Commands::Replay {
            host,
            events,
            output,
            format,
        } => {
            let config = load_config(cli.config.as_deref())?;
            cmd_replay(config, &host, &events, output.as_deref(), format)
        }
        Commands::Declaration => {
            println!("{DATA_DECLARATION}");
            Ok(())
        }
        Commands::Config => cmd_config(cli.config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("could not load config from {}", path.display())),
        None => Config::load().context("could not load config"),
    }
}

fn load_host(path: &Path) -> Result<Arc<StaticHost>> {
    let host = StaticHost::load(path)
        .with_context(|| format!("could not load host fixture {}", path.display()))?;
    Ok(Arc::new(host))
}

fn cmd_collect(config: Config, host: &Path, trigger: Trigger, compact: bool) -> Result<()> {
    let collector = Collector::new(load_host(host)?, config);
    let snapshot = collector.collect(trigger)?;

    let json = if compact {
        serde_json::to_string(snapshot.as_ref())?
    } else {
        serde_json::to_string_pretty(snapshot.as_ref())?
    };
    println!("{json}");
    Ok(())
}

fn cmd_replay(
    config: Config,
    host_path: &Path,
    events: &Path,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let script = ReplayScript::load(events)
        .with_context(|| format!("could not load event script {}", events.display()))?;
    let host = load_host(host_path)?;
    let settle = ReplayScript::settle_for(config.scroll_debounce);
    let collector = Arc::new(Collector::new(host.clone(), config));

    let (tx, rx) = crossbeam_channel::unbounded::<Snapshot>();
    collector.on_update(move |snapshot| {
        let _ = tx.send(snapshot.clone());
    });

    info!(
        steps = script.len(),
        duration_ms = script.duration().as_millis() as u64,
        "Replaying event script"
    );

    let mut binder = EventBinder::attach(collector.clone()).context("could not attach binder")?;
    script.run(&host, &binder, settle)?;
    binder.detach();

    let snapshots: Vec<Snapshot> = rx.try_iter().collect();
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&snapshots)?,
        OutputFormat::Jsonl => {
            let mut lines = Vec::with_capacity(snapshots.len());
            for snapshot in &snapshots {
                lines.push(serde_json::to_string(snapshot)?);
            }
            lines.join("\n")
        }
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("could not write {}", path.display()))?;
            info!(path = %path.display(), count = snapshots.len(), "Wrote snapshots");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }

    eprintln!("{}", collector.transparency_log().summary());
    Ok(())
}

fn cmd_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;

    println!("Configuration");
    println!("=============");
    println!();
    println!(
        "Config file: {:?}",
        path.map(Path::to_path_buf).unwrap_or_else(Config::config_path)
    );
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
