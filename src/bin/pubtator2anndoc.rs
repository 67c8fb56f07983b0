//! CLI binary for pubtator2anndoc.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pubtator2anndoc::{
    convert_path, BoundaryPolicy, ConversionConfig, ConversionProgressCallback,
    DeterministicHashIds, EntityClassMap, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a progress bar over records, with one log
/// line per failed record printed above it.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>5}/{len} records  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_records: usize) {
        self.bar.set_length(total_records as u64);
        self.bar.reset_eta();
    }

    fn on_record_complete(&self, _position: usize, _total: usize, document_id: &str, _entities: usize) {
        self.bar.set_message(document_id.to_string());
        self.bar.inc(1);
    }

    fn on_record_error(&self, position: usize, total: usize, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 100 {
            let cut: String = error.chars().take(99).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Record {:>5}/{:<5}  {}",
            red("✗"),
            position,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _total: usize, _success_count: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a PubTator file; artifacts land next to it
  pubtator2anndoc sample.PubTator

  # Convert every file in a directory into another directory
  pubtator2anndoc corpus/ -o anndoc/

  # Custom entity classes (JSON object: PubTator class -> anndoc classId)
  pubtator2anndoc --classes classes.json tmvar.PubTator

  # Inline class mappings, custom tagger label and confidence
  pubtator2anndoc --class Disease=e_5 --class Chemical=e_6 \
      --tagger ml:TaggerOne --confidence 0.9 input.PubTator

  # Reproducible HTML (hashIds derived from document ids)
  pubtator2anndoc --deterministic-ids input.PubTator

OUTPUT (per document <id>):
  <id>.html       anndoc 2.0 HTML; regions s1h1 (title), s2h1, s2p1 (abstract)
  <id>.ann.json   entity annotations with sorted keys

DEFAULT CLASSES (GNormPlus):
  Gene -> e_1   FamilyName -> e_2   DomainMotif -> e_3   Species -> e_4
"#;

/// Convert PubTator files to anndoc HTML + ann.json pairs.
#[derive(Parser, Debug)]
#[command(
    name = "pubtator2anndoc",
    version,
    about = "Convert PubTator files to anndoc HTML + ann.json pairs",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PubTator file, or a directory of PubTator files.
    input: PathBuf,

    /// Directory for the artifacts. Default: the input's directory.
    #[arg(short, long, env = "PUBTATOR2ANNDOC_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// JSON file mapping PubTator classes to anndoc classIds.
    #[arg(long, env = "PUBTATOR2ANNDOC_CLASSES")]
    classes: Option<PathBuf>,

    /// Extra class mapping NAME=ID; may be repeated.
    #[arg(long = "class", value_name = "NAME=ID", value_parser = parse_class_pair)]
    class: Vec<(String, String)>,

    /// Tagger label recorded in confidence.who.
    #[arg(long, env = "PUBTATOR2ANNDOC_TAGGER", default_value = "ml:GNormPlus")]
    tagger: String,

    /// Confidence recorded in confidence.prob (0.0–1.0).
    #[arg(long, env = "PUBTATOR2ANNDOC_CONFIDENCE", default_value_t = 1.0)]
    confidence: f64,

    /// Entities starting on the title/abstract separator: reject, clamp, verbatim.
    #[arg(long, env = "PUBTATOR2ANNDOC_BOUNDARY", default_value = "reject")]
    boundary: BoundaryPolicy,

    /// Derive hashIds from document ids instead of random UUIDs.
    #[arg(long, env = "PUBTATOR2ANNDOC_DETERMINISTIC_IDS")]
    deterministic_ids: bool,

    /// Print the batch report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PUBTATOR2ANNDOC_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs; per-record failures
    // are still printed above it by the callback.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let report = convert_path(&cli.input, &config).context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    }

    if !cli.quiet {
        let stats = &report.stats;
        eprintln!(
            "{}  {}/{} records  {} entities  {}ms  →  {}",
            if stats.failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.succeeded,
            stats.total_records,
            stats.total_entities,
            stats.duration_ms,
            bold(&report.output_dir.display().to_string()),
        );
        if stats.failed > 0 {
            eprintln!("   {} records failed", red(&stats.failed.to_string()));
        }
        for skipped in &report.skipped_inputs {
            eprintln!(
                "   {} skipped {}: {}",
                cyan("⚠"),
                skipped.path.display(),
                dim(&skipped.reason)
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let classes = match cli.classes {
        Some(ref path) => EntityClassMap::from_json_file(path)
            .with_context(|| format!("Failed to load class map from {:?}", path))?,
        None => EntityClassMap::gnormplus(),
    };

    let mut builder = ConversionConfig::builder()
        .entity_classes(classes)
        .tagger(cli.tagger.clone())
        .confidence(cli.confidence)
        .boundary_policy(cli.boundary);

    for (name, id) in &cli.class {
        builder = builder.entity_class(name.clone(), id.clone());
    }
    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir.clone());
    }
    if cli.deterministic_ids {
        builder = builder.hash_ids(Arc::new(DeterministicHashIds));
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--class NAME=ID`.
fn parse_class_pair(s: &str) -> Result<(String, String)> {
    let (name, id) = s
        .split_once('=')
        .with_context(|| format!("expected NAME=ID, got '{s}'"))?;
    let (name, id) = (name.trim(), id.trim());
    if name.is_empty() || id.is_empty() {
        anyhow::bail!("expected NAME=ID with both sides non-empty, got '{s}'");
    }
    Ok((name.to_string(), id.to_string()))
}
