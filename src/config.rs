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

use anyhow::{Result, Context};
use std::env;
use std::path::PathBuf;
use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::extraction::DEFAULT_MAX_PHASE_CANDIDATES;
use crate::planner::PlannerConfig;

/// Phase count used by the deck pipeline when none is given.
pub const DEFAULT_DECK_PHASES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Markdown,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Markdown
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow::anyhow!("Unknown output format: {}", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub planner: PlannerConfig,
    pub max_phase_candidates: usize,
    pub project_name: String,
    pub next_steps: Vec<String>,
    pub keywords_file: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = base_dir();
        Self {
            planner: PlannerConfig { phase_count: DEFAULT_DECK_PHASES, ..PlannerConfig::default() },
            max_phase_candidates: DEFAULT_MAX_PHASE_CANDIDATES,
            project_name: "Proposal".to_string(),
            next_steps: vec![
                "Contact sales team".to_string(),
                "Schedule follow-up meeting".to_string(),
            ],
            keywords_file: None,
            output_dir: base.join("decks"),
            output_format: OutputFormat::Markdown,
            log_dir: base.join("logs"),
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let config = Self::from_env()?;

        tokio::fs::create_dir_all(&config.output_dir).await
            .with_context(|| format!("Failed to create output directory {}", config.output_dir.display()))?;

        Ok(config)
    }

    /// Defaults overridden by `AUTODECK_*` variables. Does not touch the filesystem.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let phase_count = parse_var("AUTODECK_PHASE_COUNT", defaults.planner.phase_count)?;
        if phase_count == 0 {
            anyhow::bail!("AUTODECK_PHASE_COUNT must be at least 1");
        }

        let planner = PlannerConfig {
            phase_count,
            description_limit: parse_var("AUTODECK_DESCRIPTION_LIMIT", defaults.planner.description_limit)?,
            seed: parse_var("AUTODECK_CLUSTER_SEED", defaults.planner.seed)?,
            max_iterations: parse_var("AUTODECK_MAX_ITERATIONS", defaults.planner.max_iterations)?,
            tolerance: parse_var("AUTODECK_TOLERANCE", defaults.planner.tolerance)?,
            restarts: parse_var("AUTODECK_RESTARTS", defaults.planner.restarts)?,
        };

        let max_phase_candidates = parse_var("AUTODECK_MAX_PHASE_CANDIDATES", defaults.max_phase_candidates)?;

        let project_name = env::var("AUTODECK_PROJECT_NAME")
            .unwrap_or(defaults.project_name);

        let next_steps = env::var("AUTODECK_NEXT_STEPS")
            .map(|raw| split_list(&raw))
            .unwrap_or(defaults.next_steps);

        let keywords_file = env::var("AUTODECK_KEYWORDS_FILE").ok().map(PathBuf::from);

        let output_dir = env::var("AUTODECK_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        let output_format = match env::var("AUTODECK_OUTPUT_FORMAT") {
            Ok(raw) => raw.parse().context("Invalid AUTODECK_OUTPUT_FORMAT")?,
            Err(_) => defaults.output_format,
        };

        let log_dir = env::var("AUTODECK_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        Ok(Config {
            planner,
            max_phase_candidates,
            project_name,
            next_steps,
            keywords_file,
            output_dir,
            output_format,
            log_dir,
        })
    }

    pub fn get_output_file(&self, stem: &str) -> PathBuf {
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let filename = format!("{}_{}.{}", slugify(stem), timestamp, self.output_format.extension());
        self.output_dir.join(filename)
    }
}

fn base_dir() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".autodeck")
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {} ({})", name, raw, e)),
        Err(_) => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn slugify(text: &str) -> String {
    let slug = text.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() { "deck".to_string() } else { slug }
}
