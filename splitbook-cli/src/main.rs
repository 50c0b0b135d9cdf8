use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use splitbook_core::{Party, PartyCodes, PriorBalances};
use splitbook_finance::{AnalyzeOptions, analyze_path};
use splitbook_ingest::parse_amount;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod render;
mod validate;

#[derive(Parser, Debug)]
#[command(name = "splitbook", version, about = "Settle a shared bank statement between two partners")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify, total and settle a partnership statement
    Analyze {
        /// Bank statement export (.csv)
        #[arg(long)]
        csv: PathBuf,

        /// Amount already settled in the first partner's favour
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        prev_party_a: String,

        /// Amount already settled in the second partner's favour
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        prev_party_b: String,

        /// Carried-over balance of the shared pot (reported only)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        prev_shared: String,

        /// Show only transactions tagged with this code ("all" for everything)
        #[arg(long, default_value = "all")]
        filter: String,

        /// Limit number of transactions printed
        #[arg(long)]
        limit: Option<usize>,

        /// Emit the full analysis as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Manage ~/.splitbook/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            csv,
            prev_party_a,
            prev_party_b,
            prev_shared,
            filter,
            limit,
            json,
        } => {
            let prior = PriorBalances::new(
                parse_amount(&prev_party_a),
                parse_amount(&prev_party_b),
                parse_amount(&prev_shared),
            );
            analyze(csv, prior, &filter, limit, json)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                let s = toml::to_string_pretty(&cfg).context("serialize config")?;
                println!("# {}", config::config_path()?.display());
                print!("{s}");
            }
        },
    }

    Ok(())
}

fn analyze(csv: PathBuf, prior: PriorBalances, filter: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let cfg = config::load_config()?;
    let size = validate::validate_statement_file(&csv, cfg.limits.max_file_bytes)?;
    let filter = resolve_filter(filter, &cfg.parties)?;
    tracing::debug!(path = %csv.display(), size, "statement accepted");

    let opts = AnalyzeOptions {
        codes: cfg.parties.clone(),
        prior,
        epsilon: cfg.settlement.epsilon,
        ..AnalyzeOptions::default()
    };
    let analysis = analyze_path(&csv, &opts).with_context(|| format!("analyzing {}", csv.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &analysis).context("serialize analysis")?;
        writeln!(out)?;
        return Ok(());
    }

    let file_name = csv
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| csv.display().to_string());
    let view = render::View {
        file_name: &file_name,
        file_size: size,
        codes: &cfg.parties,
        currency_symbol: &cfg.display.currency_symbol,
        filter,
        limit,
    };
    render::render_report(&mut out, &analysis, &view)?;
    Ok(())
}

/// `all` means no filter; otherwise a configured code or the unspecified label.
fn resolve_filter(filter: &str, codes: &PartyCodes) -> Result<Option<Party>> {
    let f = filter.trim();
    if f.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    if f.eq_ignore_ascii_case(codes.label(Party::Unspecified)) {
        return Ok(Some(Party::Unspecified));
    }
    match codes.party_for_code(&f.to_uppercase()) {
        Some(p) => Ok(Some(p)),
        None => bail!(
            "unknown filter '{filter}' (expected all, {}, {}, {} or {})",
            codes.party_a,
            codes.party_b,
            codes.shared,
            codes.unspecified
        ),
    }
}
