//! CLI command definitions, routing, and tracing setup.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use url::Url;

use corpuskit_clean::{
    CleanTables, PiiMasker, RawParts, build_record, canonical_content, is_image_only,
};
use corpuskit_shared::{RejectReason, SiteConfig};
use corpuskit_validate::{Validator, write_reports};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Corpuskit — clean extracted web content and validate delivery batches.
#[derive(Parser)]
#[command(
    name = "corpuskit",
    version,
    about = "Content cleaning and compliance validation for corpus delivery batches.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Validate one or more JSONL batch files against the delivery contract.
    Validate {
        /// Batch files to validate.
        inputs: Vec<PathBuf>,

        /// Require at least 10,000 non-blank lines per file.
        #[arg(long)]
        strict: bool,
    },

    /// Clean one extracted document and emit the finished record (or a
    /// rejection) as a JSON line.
    Clean {
        /// JSON file with the raw extracted parts.
        #[arg(long)]
        parts: PathBuf,

        /// Site configuration TOML.
        #[arg(long)]
        site: PathBuf,

        /// Source URL of the document.
        #[arg(long)]
        url: String,

        /// Minimum character count for the record text; shorter documents
        /// are rejected as too_short.
        #[arg(long, default_value_t = 220)]
        min_chars: usize,
    },

    /// PII-mask a plain-text file to stdout.
    Mask {
        /// Text file to mask.
        file: PathBuf,
    },

    /// Load a site config and print its resolved selector candidates.
    ConfigCheck {
        /// Site configuration TOML.
        site: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "corpuskit=info",
        1 => "corpuskit=debug",
        _ => "corpuskit=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Validate { inputs, strict } => cmd_validate(&inputs, strict),
        Command::Clean {
            parts,
            site,
            url,
            min_chars,
        } => cmd_clean(&parts, &site, &url, min_chars),
        Command::Mask { file } => cmd_mask(&file),
        Command::ConfigCheck { site } => cmd_config_check(&site),
    }
}

fn cmd_validate(inputs: &[PathBuf], strict: bool) -> Result<()> {
    if inputs.is_empty() {
        return Err(eyre!("no input files given"));
    }

    let batch = Validator::new(strict).run(inputs);
    for item in batch.all_errors() {
        println!("{item}");
    }

    let written = write_reports(&batch, chrono::Utc::now())?;
    for path in &written {
        info!(report = %path.display(), "report written");
    }

    println!(
        "Summary: total={} passed={} pass_rate={:.2}%",
        batch.total(),
        batch.passed(),
        batch.pass_rate()
    );
    Ok(())
}

fn cmd_clean(parts: &Path, site: &Path, url: &str, min_chars: usize) -> Result<()> {
    Url::parse(url).map_err(|e| eyre!("invalid url {url:?}: {e}"))?;

    let raw = fs::read_to_string(parts)?;
    let parts: RawParts = serde_json::from_str(&raw)?;
    let (config, _) = SiteConfig::load(site)?;

    let (content, stats) = canonical_content(
        &parts,
        config.lang,
        &CleanTables::default(),
        &PiiMasker::default(),
    );
    info!(
        missing_notes = stats.missing_notes,
        images = stats.image_count,
        "document cleaned"
    );

    let record = build_record(&parts.title, &content, url, &config, chrono::Utc::now());

    let reject = if record.text.chars().count() < min_chars {
        Some(RejectReason::TooShort)
    } else if is_image_only(&content) {
        Some(RejectReason::ImageOnly)
    } else {
        None
    };

    match reject {
        Some(reason) => {
            let rejection = serde_json::json!({ "url": url, "reason": reason.to_string() });
            println!("{rejection}");
        }
        None => println!("{}", serde_json::to_string(&record)?),
    }
    Ok(())
}

fn cmd_mask(file: &Path) -> Result<()> {
    let body = fs::read_to_string(file)?;
    print!("{}", PiiMasker::default().mask(&body));
    Ok(())
}

fn cmd_config_check(site: &Path) -> Result<()> {
    let (config, selectors) = SiteConfig::load(site)?;
    println!("domain: {}", config.domain);
    println!("lang: {}", config.lang);
    let sections = [
        ("title", &selectors.title),
        ("image", &selectors.image),
        ("ingredients", &selectors.ingredients),
        ("instructions", &selectors.instructions),
        ("notes", &selectors.notes),
    ];
    for (name, candidates) in sections {
        if candidates.is_empty() {
            println!("{name}: (none)");
        } else {
            println!("{name}: {}", candidates.join(", "));
        }
    }
    Ok(())
}
