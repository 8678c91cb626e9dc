//! `oracle`: quantize and seal observations, and replay lifecycle scenarios.

use anyhow::{bail, Context};
use clap::Parser;
use oracle_cli::Scenario;
use oracle_crypto::{CiphertextEncoder, DecryptionKey, EncryptionKey, SealedEncoder};
use oracle_engine::OracleConfig;
use oracle_quantize::Quantizer;
use oracle_types::ValueKind;
use oracle_utils::{format_duration, init_logging, LogFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oracle", about = "Encrypted prediction oracle tooling")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Defaults to the config file's value.
    #[arg(long, global = true, env = "ORACLE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Defaults to the config file's value.
    #[arg(long, global = true, env = "ORACLE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, global = true, env = "ORACLE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Quantize a raw observation.
    Quantize {
        /// Value kind: "percent", "price" or "ratio".
        #[arg(long, default_value = "percent")]
        kind: ValueKind,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Generate an aggregator key pair (hex).
    Keygen,

    /// Quantize a value and seal it to an aggregator public key.
    Encode {
        /// Aggregator public key, 32 bytes hex.
        #[arg(long)]
        public_key: EncryptionKey,
        #[arg(long, default_value = "percent")]
        kind: ValueKind,
        value: f64,
    },

    /// Replay a scripted lifecycle against an in-memory oracle.
    ///
    /// Prints one JSON line per emitted event or rejection.
    Simulate { scenario: PathBuf },

    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<OracleConfig> {
    match path {
        Some(path) => {
            let path = path.to_string_lossy();
            OracleConfig::from_toml_file(&path).with_context(|| format!("loading {path}"))
        }
        None => Ok(OracleConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    let format: LogFormat = config.log_format.parse()?;
    init_logging(format, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Quantize { kind, value } => {
            let quantized = Quantizer::new(config.quantizer.clone()).quantize(kind, value)?;
            println!("{quantized}");
        }
        Command::Keygen => {
            let secret = DecryptionKey::generate()?;
            let public = secret.public_key();
            println!("public_key = \"{}\"", public.to_hex());
            println!("secret_key = \"{}\"", secret.to_hex());
        }
        Command::Encode {
            public_key,
            kind,
            value,
        } => {
            let quantized = Quantizer::new(config.quantizer.clone()).quantize(kind, value)?;
            let ciphertext = SealedEncoder.encode(quantized, &public_key)?;
            println!("{}", ciphertext.to_hex());
        }
        Command::Simulate { scenario } => {
            let path = scenario.to_string_lossy();
            let mut scenario = Scenario::from_toml_file(&path)?;
            if cli.config.is_some() {
                scenario = scenario.with_config(config.clone())?;
            }
            let report = scenario.run()?;
            for line in &report.lines {
                println!("{line}");
            }
            tracing::info!(
                accepted = report.accepted,
                rejected = report.rejected,
                simulated = %format_duration(report.elapsed_secs),
                "simulation finished"
            );
            if !report.mismatches.is_empty() {
                for mismatch in &report.mismatches {
                    eprintln!("{mismatch}");
                }
                bail!("{} step(s) did not match their expectation", report.mismatches.len());
            }
        }
        Command::Config => {
            tracing::debug!(
                dispute_window = %format_duration(config.params.dispute_window_secs),
                voting_window = %format_duration(config.params.voting_window_secs),
                "effective windows"
            );
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}
