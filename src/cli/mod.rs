//! # CLI Module
//!
//! Command-line interface for the pixel similarity engine.
//!
//! ## Usage
//! ```bash
//! # Compare two images
//! pixel-compare pair before.png after.png
//!
//! # Compare two directories file by file
//! pixel-compare batch ./expected ./actual --threads 8
//!
//! # Match files by name, include alpha, JSON output
//! pixel-compare batch ./expected ./actual --pair-by name --include-alpha --output json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use pixel_similarity::core::batch::{BatchReport, BatchRunner};
use pixel_similarity::core::scanner::{pair_directories, PairBy, ScanConfig, WalkDirScanner};
use pixel_similarity::core::scorer::{score_files, PairScore, ScorerConfig};
use pixel_similarity::error::Result;
use pixel_similarity::events::{BatchEvent, Event, EventChannel};
use std::path::{Path, PathBuf};
use std::thread;

/// Pixel Compare - score how alike images are
#[derive(Parser, Debug)]
#[command(name = "pixel-compare")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare two images
    Pair {
        /// Reference image
        image_a: PathBuf,

        /// Image compared against the reference (resized to match)
        image_b: PathBuf,

        #[command(flatten)]
        scoring: ScoringArgs,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
    /// Compare every image in one directory with its partner in another
    Batch {
        /// Directory of reference images
        dir_a: PathBuf,

        /// Directory of images compared against the references
        dir_b: PathBuf,

        /// How files are matched between the directories
        #[arg(long, default_value = "index")]
        pair_by: PairMode,

        /// Worker threads (0 = all CPUs)
        #[arg(short, long, default_value = "0")]
        threads: usize,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Follow symbolic links while listing
        #[arg(long)]
        follow_symlinks: bool,

        /// Only list these extensions, e.g. png,jpg (default: common image types)
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,

        #[command(flatten)]
        scoring: ScoringArgs,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output (per-pair scores and resize notes)
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct ScoringArgs {
    /// Let the alpha channel take part in the comparison
    #[arg(long)]
    include_alpha: bool,

    /// Force the scalar difference loop
    #[arg(long)]
    no_simd: bool,

    /// Compare both images at a fixed resolution, e.g. 100x100
    #[arg(long, value_parser = parse_size)]
    sample_size: Option<(u32, u32)>,
}

impl From<ScoringArgs> for ScorerConfig {
    fn from(args: ScoringArgs) -> Self {
        ScorerConfig {
            include_alpha: args.include_alpha,
            simd: !args.no_simd,
            sample_size: args.sample_size,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PairMode {
    /// i-th file of each directory, sorted by path
    Index,
    /// Files with the same relative path
    Name,
}

impl From<PairMode> for PairBy {
    fn from(mode: PairMode) -> Self {
        match mode {
            PairMode::Index => PairBy::Index,
            PairMode::Name => PairBy::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (scores only)
    Minimal,
}

fn parse_size(value: &str) -> std::result::Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let width: u32 = width.trim().parse().map_err(|_| format!("bad width in '{}'", value))?;
    let height: u32 = height.trim().parse().map_err(|_| format!("bad height in '{}'", value))?;
    if width == 0 || height == 0 {
        return Err("sample size must be non-zero".to_string());
    }
    Ok((width, height))
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    pixel_similarity::init_tracing();

    match cli.command {
        Commands::Pair {
            image_a,
            image_b,
            scoring,
            output,
        } => run_pair(&image_a, &image_b, scoring.into(), output),
        Commands::Batch {
            dir_a,
            dir_b,
            pair_by,
            threads,
            recursive,
            include_hidden,
            follow_symlinks,
            extensions,
            scoring,
            output,
            verbose,
        } => run_batch(BatchOptions {
            dir_a,
            dir_b,
            pair_by: pair_by.into(),
            threads,
            scan: ScanConfig {
                recursive,
                follow_symlinks,
                include_hidden,
                extensions,
            },
            scorer: scoring.into(),
            output,
            verbose,
        }),
    }
}

fn run_pair(image_a: &Path, image_b: &Path, config: ScorerConfig, output: OutputFormat) -> Result<()> {
    let score = score_files(image_a, image_b, config)?;

    match output {
        OutputFormat::Pretty => {
            let term = Term::stderr();
            if let Some(note) = score.note() {
                term.write_line(&format!("{} {}", style("note:").yellow(), note)).ok();
            }
            println!(
                "Image similarity score: {}",
                style(format!("{:.2}%", score.similarity)).cyan().bold()
            );
        }
        OutputFormat::Json => print_json(&pair_json(image_a, image_b, &score))?,
        OutputFormat::Minimal => println!("{:.2}", score.similarity),
    }

    Ok(())
}

fn pair_json(image_a: &Path, image_b: &Path, score: &PairScore) -> serde_json::Value {
    serde_json::json!({
        "image_a": image_a,
        "image_b": image_b,
        "similarity": round2(score.similarity),
        "note": score.note(),
    })
}

struct BatchOptions {
    dir_a: PathBuf,
    dir_b: PathBuf,
    pair_by: PairBy,
    threads: usize,
    scan: ScanConfig,
    scorer: ScorerConfig,
    output: OutputFormat,
    verbose: bool,
}

fn run_batch(options: BatchOptions) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(options.output, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Pixel Compare").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let (sender, receiver) = EventChannel::new();

    let scanner = WalkDirScanner::new(options.scan.clone());
    let pairs = pair_directories(
        &scanner,
        &options.dir_a,
        &options.dir_b,
        options.pair_by,
        &sender,
    )?;

    for error in &pairs.errors {
        tracing::warn!(%error, "listing error");
    }
    if pretty && !pairs.unmatched.is_empty() {
        term.write_line(&format!(
            "  {} {} files have no partner and were skipped",
            style("!").yellow(),
            pairs.unmatched.len()
        ))
        .ok();
    }

    let runner = BatchRunner::builder()
        .threads(options.threads)
        .scorer_config(options.scorer)
        .build();

    let progress = if pretty {
        let pb = ProgressBar::new(pairs.paths_a.len() as u64);
        if let Ok(bar_style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Batch(BatchEvent::Started { total_pairs }) => pb.set_length(total_pairs as u64),
                Event::Batch(BatchEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    pb.set_message(
                        p.current_path
                            .file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .into_owned(),
                    );
                }
                Event::Batch(BatchEvent::Completed { .. }) => pb.finish_and_clear(),
                _ => {}
            }
        }
    });

    let result = runner.score_batch_with_events(&pairs.paths_a, &pairs.paths_b, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let report = result?;

    match options.output {
        OutputFormat::Pretty => print_pretty_report(&term, &report, options.verbose),
        OutputFormat::Json => print_json(&serde_json::to_value(&report)?)?,
        OutputFormat::Minimal => print_minimal_report(&report),
    }

    Ok(())
}

fn print_pretty_report(term: &Term, report: &BatchReport, verbose: bool) {
    term.write_line("").ok();
    term.write_line(&format!(
        "{} Batch Complete: {}",
        style("✓").green().bold(),
        report.status()
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} pairs in {:.1}s",
        style(report.total).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();

    match (report.average, report.min, report.max) {
        (Some(average), Some(min), Some(max)) => {
            term.write_line(&format!(
                "  {} average similarity",
                style(format!("{:.2}%", average)).cyan()
            ))
            .ok();
            term.write_line(&format!(
                "  {} min, {} max",
                style(format!("{:.2}%", min)).yellow(),
                style(format!("{:.2}%", max)).yellow()
            ))
            .ok();
        }
        _ if report.total > 0 => {
            term.write_line(&format!("  {}", style("No successful comparisons").red()))
                .ok();
        }
        _ => {}
    }

    if verbose {
        term.write_line("").ok();
        for pair in &report.pairs {
            term.write_line(&format!(
                "    {:>7} {} {} {}",
                format!("{:.2}%", pair.similarity),
                pair.a.display(),
                style("vs").dim(),
                pair.b.display()
            ))
            .ok();
        }
        for note in &report.notes {
            term.write_line(&format!("    {} {}", style("note:").dim(), note)).ok();
        }
    }

    if !report.errors.is_empty() {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style(format!("Errors ({}):", report.errors.len())).bold().red()
        ))
        .ok();
        for error in &report.errors {
            term.write_line(&format!("  {} {}", style("✗").red(), error)).ok();
        }
    }
}

fn print_minimal_report(report: &BatchReport) {
    for pair in &report.pairs {
        println!("{}\t{:.2}", pair.index, pair.similarity);
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    println!("{}", text);
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
