//! Decision-maker engine binary for the Agora agent framework.
//!
//! Wires an in-memory ledger, the agent's wallet and a decision maker
//! together, feeds it the envelopes read from a JSON-lines source, runs
//! one drain cycle and prints every response as one JSON line on stdout.
//!
//! ```text
//! agora-engine [ENVELOPES.jsonl]
//! ```
//!
//! Envelopes are read from the given file, or from stdin when no path is
//! given. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `agora-config.yaml` (or `AGORA_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Seed the in-memory ledger
//! 4. Create the decision maker from the wallet and ledger
//! 5. Enqueue the configured endowment, if any
//! 6. Spawn the envelope producer and wait for it to finish
//! 7. Run one drain cycle
//! 8. Print the responses and audit the ledger

mod error;

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use agora_core::config::{AgentConfig, LogFormat, LoggingConfig};
use agora_core::decision_maker::{DecisionMaker, DecisionMakerHandle};
use agora_ledger::{InMemoryLedger, LedgerApi};
use agora_types::Envelope;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "agora-config.yaml";

/// Counts reported by the envelope producer.
#[derive(Debug, Clone, Copy, Default)]
struct ProducerStats {
    sent: usize,
    skipped: usize,
}

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the drain cycle fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("agora-engine starting");
    match &config_path {
        Some(path) => info!(
            path = %path.display(),
            agent = config.agent.name,
            max_reactions = config.agent.max_reactions,
            "Configuration loaded"
        ),
        None => info!("Config file not found, using defaults"),
    }

    // 3. Seed the in-memory ledger.
    let ledger = Arc::new(InMemoryLedger::new(config.ledger.id.clone()));
    for (address, amount) in &config.ledger.balances {
        ledger.mint(address, *amount)?;
    }
    info!(
        ledger_id = %config.ledger.id,
        accounts = config.ledger.balances.len(),
        minted = ledger.minted()?,
        "Ledger seeded"
    );

    // 4. Create the decision maker.
    let wallet = config.wallet.to_wallet();
    info!(ledgers = wallet.len(), "Wallet loaded");
    let ledger_api: Arc<dyn LedgerApi> = Arc::clone(&ledger) as Arc<dyn LedgerApi>;
    let (decision_maker, handle, mut outbox) =
        DecisionMaker::new(config.agent.name.clone(), wallet, ledger_api);
    let mut decision_maker = decision_maker.with_max_reactions(config.agent.max_reactions);

    // 5. Enqueue the endowment.
    if let Some(endowment) = &config.endowment {
        handle.send(Envelope::state_update(endowment.to_state_update()))?;
        info!("Endowment enqueued");
    }

    // 6. Produce envelopes from the input source.
    let input = std::env::args_os().nth(1).map(PathBuf::from);
    let producer = tokio::spawn(produce(handle.clone(), input));
    let stats = producer.await??;
    info!(
        sent = stats.sent,
        skipped = stats.skipped,
        "Envelopes enqueued"
    );

    // 7. Run one drain cycle.
    let summary = decision_maker.execute();
    info!(
        handled = summary.handled,
        accepted = summary.accepted,
        rejected = summary.rejected,
        dropped = summary.dropped,
        ready = handle.is_ready(),
        "Drain cycle finished"
    );

    // 8. Print responses and audit the ledger.
    let mut stdout = std::io::stdout().lock();
    while let Ok(response) = outbox.try_recv() {
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
    }
    stdout.flush()?;

    let conservation = ledger.verify_conservation()?;
    info!(
        balanced = conservation.is_balanced(),
        transfers = ledger.transfers()?.len(),
        "agora-engine shutdown complete"
    );

    Ok(())
}

/// Load the agent configuration.
///
/// Reads `AGORA_CONFIG` if set, else `agora-config.yaml` in the working
/// directory. Returns the path that was read, or `None` when defaults are
/// used.
fn load_config() -> Result<(AgentConfig, Option<PathBuf>), EngineError> {
    let config_path = std::env::var_os("AGORA_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if config_path.exists() {
        let config = AgentConfig::from_file(&config_path)?;
        Ok((config, Some(config_path)))
    } else {
        let mut config = AgentConfig::default();
        config.apply_env_overrides();
        Ok((config, None))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Read JSON-lines envelopes from `input` (stdin when `None`) and enqueue
/// them. Blank lines are ignored; malformed lines are logged and skipped.
async fn produce(
    handle: DecisionMakerHandle,
    input: Option<PathBuf>,
) -> Result<ProducerStats, EngineError> {
    let reader = open_input(input.as_deref()).await?;
    let mut lines = reader.lines();
    let mut stats = ProducerStats::default();
    let mut line_number: usize = 0;
    while let Some(line) = lines.next_line().await? {
        line_number = line_number.saturating_add(1);
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Envelope>(&line) {
            Ok(envelope) => {
                handle.send(envelope)?;
                stats.sent = stats.sent.saturating_add(1);
            }
            Err(err) => {
                warn!(line = line_number, error = %err, "malformed envelope, skipping");
                stats.skipped = stats.skipped.saturating_add(1);
            }
        }
    }
    Ok(stats)
}

async fn open_input(
    input: Option<&Path>,
) -> Result<Box<dyn AsyncBufRead + Unpin + Send>, EngineError> {
    match input {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            info!(path = %path.display(), "Reading envelopes from file");
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            info!("Reading envelopes from stdin");
            Ok(Box::new(BufReader::new(tokio::io::stdin())))
        }
    }
}
