/*
 * Autodeck CLI - Rust Edition
 * Copyright (c) 2024 Autodeck Contributors
 *
 * This work is licensed under the Creative Commons Attribution-NonCommercial 4.0 International License.
 * To view a copy of this license, visit http://creativecommons.org/licenses/by-nc/4.0/
 *
 * You are free to share and adapt this work for non-commercial purposes with attribution.
 * Commercial use is prohibited without explicit written permission.
 *
 * For commercial licensing inquiries, please contact the project maintainers.
 */

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;

use autodeck::classifier::{KeywordClassifier, TranscriptClassifier};
use autodeck::config::{Config, OutputFormat};
use autodeck::extraction::LeadSentenceSummarizer;
use autodeck::ingestion::ingest_transcript;
use autodeck::pipeline::DeckGenerator;
use autodeck::planner::PhasePlanner;
use autodeck::render::{renderer_for, write_deck};
use autodeck::ui::TerminalUI;

/// Autodeck CLI - turns meeting transcripts into client proposal decks
#[derive(Parser)]
#[command(name = "autodeck")]
#[command(version = "0.1.0")]
#[command(about = "Generate client-facing proposal decks from meeting transcripts")]
#[command(long_about = "
Autodeck CLI - Rust Edition

Reads a meeting transcript (.txt or .docx), sorts its paragraphs into
introductions, goals, pain points, constraints and next steps, clusters the
proposed next steps into project phases and writes a deck:
• Cover
• Client Objectives
• Pain Points / Challenges
• Proposed Solution (Phases Overview)
• One slide per phase
• Expected Outcomes
• Next Steps / CTA
")]
struct Cli {
    /// Enable debug output on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a deck from a transcript file
    Generate {
        /// Transcript file (.txt or .docx)
        file: PathBuf,

        /// Number of phases to plan
        #[arg(short, long, value_parser = parse_phase_count)]
        phases: Option<usize>,

        /// Clustering seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: markdown or json
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Output file (defaults to the configured output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the terminal preview
        #[arg(long)]
        no_preview: bool,
    },

    /// Cluster next-step statements (one per line) into phases
    Plan {
        /// Candidate file; reads stdin when omitted
        input: Option<PathBuf>,

        /// Number of phases to plan
        #[arg(short, long, value_parser = parse_phase_count)]
        phases: Option<usize>,

        /// Clustering seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print phases as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a transcript's paragraphs are categorised
    Classify {
        /// Transcript file (.txt or .docx)
        file: PathBuf,
    },

    /// Show configuration
    Status,
}

fn parse_phase_count(raw: &str) -> std::result::Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("phase count must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a positive integer", raw)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().await?;
    setup_logging(&config, cli.verbose)?;

    let ui = TerminalUI::new();
    let result = match cli.command {
        Commands::Generate { file, phases, seed, format, output, no_preview } => {
            run_generate(config, &ui, file, phases, seed, format, output, no_preview).await
        }
        Commands::Plan { input, phases, seed, json } => {
            run_plan(config, &ui, input, phases, seed, json).await
        }
        Commands::Classify { file } => run_classify(config, &ui, file).await,
        Commands::Status => {
            ui.print_config(&config);
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {:#}", e);
        ui.print_error(&format!("❌ {:#}", e));
    }
    result
}

#[allow(clippy::too_many_arguments)]
async fn run_generate(
    mut config: Config,
    ui: &TerminalUI,
    file: PathBuf,
    phases: Option<usize>,
    seed: Option<u64>,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    no_preview: bool,
) -> Result<()> {
    if let Some(phases) = phases {
        config.planner.phase_count = phases;
    }
    if let Some(seed) = seed {
        config.planner.seed = seed;
    }
    if let Some(format) = format {
        config.output_format = format;
    }

    ui.print_welcome();
    let classifier = build_classifier(&config).await?;
    let generator = DeckGenerator::new(config, classifier, Arc::new(LeadSentenceSummarizer));

    let spinner = ui.spinner(&format!("Generating deck from {}", file.display()));
    let deck = generator.generate(&file).await;
    spinner.finish_and_clear();
    let deck = deck.with_context(|| format!("Failed to generate deck from {}", file.display()))?;

    if deck.phases.is_empty() {
        ui.print_warning("⚠️  No next steps found in the transcript; the deck has no phase slides");
    }
    if !no_preview {
        ui.print_deck(&deck);
    }

    let config = generator.config();
    let path = output.unwrap_or_else(|| config.get_output_file(&deck.client_name));
    let renderer = renderer_for(config.output_format);
    write_deck(renderer.as_ref(), &deck, &path).await
        .with_context(|| format!("Failed to write deck to {}", path.display()))?;
    ui.print_saved(&path);

    Ok(())
}

async fn run_plan(
    config: Config,
    ui: &TerminalUI,
    input: Option<PathBuf>,
    phases: Option<usize>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let raw = match &input {
        Some(path) => tokio::fs::read_to_string(path).await
            .with_context(|| format!("Failed to read candidates from {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await
                .context("Failed to read candidates from stdin")?;
            buffer
        }
    };

    let candidates: Vec<&str> = raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut planner = PhasePlanner::new(config.planner.clone());
    if let Some(seed) = seed {
        planner = planner.with_seed(seed);
    }
    let count = phases.unwrap_or(planner.config().phase_count);
    if candidates.is_empty() {
        ui.print_warning("⚠️  No candidate lines to plan");
    } else if !json {
        ui.print_status(&format!(
            "Planning {} candidates into up to {} phases (seed {})",
            candidates.len(), count, planner.config().seed
        ));
    }
    let planned = planner.plan(&candidates, count)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&planned)?);
    } else {
        ui.print_phases(&planned);
    }
    Ok(())
}

async fn run_classify(config: Config, ui: &TerminalUI, file: PathBuf) -> Result<()> {
    let classifier = build_classifier(&config).await?;
    let transcript = ingest_transcript(&file).await?;
    let segmented = classifier.segment_transcript(&transcript).await?;
    ui.print_segments(&segmented);
    Ok(())
}

async fn build_classifier(config: &Config) -> Result<Arc<dyn TranscriptClassifier>> {
    let classifier = match &config.keywords_file {
        Some(path) => KeywordClassifier::from_file(path).await?,
        None => KeywordClassifier::new(),
    };
    Ok(Arc::new(classifier))
}

fn setup_logging(config: &Config, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    std::fs::create_dir_all(&config.log_dir)
        .context("Failed to create log directory")?;

    // Create rolling file appender (daily rotation)
    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        &config.log_dir,
        "autodeck.log",
    );

    let stderr_level = if verbose { "debug" } else { "error" };

    // File gets everything from debug up; stderr only errors unless --verbose
    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(
                    EnvFilter::from_default_env()
                        .add_directive("autodeck=debug".parse()?)
                        .add_directive("info".parse()?)
                )
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(false)
                .compact()
                .with_filter(
                    EnvFilter::from_default_env()
                        .add_directive(format!("autodeck={}", stderr_level).parse()?)
                        .add_directive("error".parse()?)
                )
        );

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    tracing::info!("Logging system initialized in {}", config.log_dir.display());
    Ok(())
}
