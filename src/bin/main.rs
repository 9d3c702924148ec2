//! metaql CLI - SQL over control-plane metadata
//!
//! Usage:
//!   metaql --bootstrap-servers <servers> [--client-properties <file>] [--format <name>]
//!   metaql --snapshot <file.json> [-e <sql>]
//!
//! Examples:
//!   metaql --bootstrap-servers b1:9092 -e "SELECT * FROM brokers"
//!   metaql --client-properties client.toml --format json --init-all
//!   metaql --snapshot cluster.json

use clap::{CommandFactory, Parser};
use metaql::cluster::{AgentClient, ClusterClient, SnapshotClient};
use metaql::completion::{completion_candidates, QueryHelper};
use metaql::config::{Settings, SettingsError, BOOTSTRAP_SERVERS};
use metaql::{Engine, Registries};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const PROMPT: &str = "query> ";
const HISTORY_FILE: &str = ".metaql_history";

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "metaql")]
#[command(about = "SQL interface to cluster control-plane metadata")]
#[command(version)]
struct Cli {
    /// Control-plane endpoint (overrides bootstrap.servers in the properties file)
    #[arg(long, value_name = "BOOTSTRAP_SERVERS")]
    bootstrap_servers: Option<String>,

    /// TOML file with extra client properties
    #[arg(long, value_name = "PATH")]
    client_properties: Option<PathBuf>,

    /// Serve metadata from a JSON snapshot instead of a live cluster
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", value_name = "table|ssv|csv|json")]
    format: String,

    /// Execute the given SQL and exit instead of starting the console
    #[arg(short, long, value_name = "COMMAND")]
    exec: Option<String>,

    /// Initialize all tables at startup rather than when first queried
    #[arg(long)]
    init_all: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let client = match connect(&cli) {
        Ok(client) => client,
        Err(ConnectError::Settings(SettingsError::MissingEndpoint)) => {
            eprintln!("Missing {}", BOOTSTRAP_SERVERS);
            eprintln!("{}", Cli::command().render_help());
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, client) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}

#[derive(Debug, thiserror::Error)]
enum ConnectError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Cluster(#[from] metaql::cluster::ClusterError),
}

/// Resolve the endpoint and build the control-plane client.
fn connect(cli: &Cli) -> Result<Box<dyn ClusterClient>, ConnectError> {
    if let Some(path) = &cli.snapshot {
        log::info!("serving metadata from snapshot {}", path.display());
        return Ok(Box::new(SnapshotClient::from_file(path)?));
    }

    let settings = Settings::resolve(
        cli.client_properties.as_deref(),
        cli.bootstrap_servers.as_deref(),
    )?;
    let servers = settings.bootstrap_servers()?;
    log::info!("connecting to {}", servers);
    Ok(Box::new(AgentClient::spawn_with_settings(&settings)?))
}

fn run(cli: &Cli, client: Box<dyn ClusterClient>) -> CliResult<()> {
    let registries = Registries::with_defaults()?;
    let mut engine = Engine::from_registries(client, &registries, &cli.format)?;

    let result = drive(cli, &mut engine);
    let closed = engine.close();
    result?;
    closed?;
    Ok(())
}

fn drive(cli: &Cli, engine: &mut Engine) -> CliResult<()> {
    if cli.init_all {
        engine.init_all_tables()?;
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match &cli.exec {
        Some(sql) => {
            engine.execute(sql, &mut out)?;
            out.flush()?;
            Ok(())
        }
        None => console(engine, &mut out),
    }
}

/// Interactive read-eval-print loop.
fn console(engine: &mut Engine, out: &mut dyn Write) -> CliResult<()> {
    let candidates = completion_candidates(engine.store())?;
    let mut editor: Editor<QueryHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(QueryHelper::new(candidates)));

    let history = dirs::home_dir().map(|home| home.join(HISTORY_FILE));
    if let Some(path) = &history {
        if editor.load_history(path).is_err() {
            log::debug!("no history at {}", path.display());
        }
    }

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        editor.add_history_entry(line)?;

        if let Err(e) = engine.execute(line, out) {
            if e.is_fatal() {
                return Err(e.into());
            }
            eprintln!("Error: {}", e);
        }
    }

    if let Some(path) = &history {
        if let Err(e) = editor.save_history(path) {
            log::warn!("failed to save history to {}: {}", path.display(), e);
        }
    }
    Ok(())
}
