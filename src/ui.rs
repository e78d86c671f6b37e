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

use std::path::Path;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::types::{Phase, SegmentedTranscript, SlideDeck, SlideKind};

pub struct TerminalUI;

impl TerminalUI {
    pub fn new() -> Self {
        Self
    }

    pub fn print_welcome(&self) {
        println!("{}", "🗂️  Autodeck CLI - Rust Edition".cyan().bold());
        println!("{}", "Meeting transcript → client proposal deck".green());
        println!("{}", "=".repeat(50).bright_black());
        println!();
    }

    pub fn print_status(&self, message: &str) {
        println!("{}", message.yellow());
    }

    pub fn print_warning(&self, message: &str) {
        eprintln!("{}", message.yellow().bold());
    }

    pub fn print_error(&self, message: &str) {
        eprintln!("{}", message.red());
    }

    pub fn spinner(&self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    pub fn print_phases(&self, phases: &[Phase]) {
        if phases.is_empty() {
            println!("{}", "No phases planned (no candidates).".bright_black());
            return;
        }
        println!("{}", "🧭 Planned phases:".blue().bold());
        for phase in phases {
            println!("  {} {}", format!("{}:", phase.title).cyan().bold(), phase.description);
        }
        println!();
    }

    pub fn print_segments(&self, segmented: &SegmentedTranscript) {
        for (category, segments) in segmented.iter() {
            println!("{} {}", format!("{}", category).magenta().bold(), format!("({})", segments.len()).bright_black());
            for segment in segments {
                println!("  • {}", preview(segment, 100));
            }
        }
        println!();
    }

    pub fn print_deck(&self, deck: &SlideDeck) {
        println!("{}", format!("📊 Deck for {} ({} slides)", deck.client_name, deck.slides.len()).green().bold());
        println!("{}", "-".repeat(50).bright_black());
        for (i, slide) in deck.slides.iter().enumerate() {
            let title = match slide.kind {
                SlideKind::Cover => slide.title.cyan().bold(),
                SlideKind::Phase => slide.title.blue().bold(),
                _ => slide.title.white().bold(),
            };
            println!("{} {}", format!("[{}]", i + 1).bright_black(), title);
            if let Some(subtitle) = &slide.subtitle {
                println!("    {}", subtitle.italic());
            }
            for bullet in &slide.bullets {
                println!("    • {}", preview(bullet, 120));
            }
        }
        println!("{}", "-".repeat(50).bright_black());
    }

    pub fn print_saved(&self, path: &Path) {
        println!("{} {}", "💾 Deck saved to:".green(), path.display());
    }

    pub fn print_config(&self, config: &Config) {
        println!("{}", "🔍 Autodeck configuration".cyan().bold());
        println!("{}", "========================".bright_black());
        let env_status = if Path::new(".env").exists() { "✅" } else { "➖" };
        println!("Configuration (.env): {}", env_status);
        println!("Phase count: {}", config.planner.phase_count);
        println!("Description limit: {} chars", config.planner.description_limit);
        println!("Cluster seed: {}", config.planner.seed);
        println!("Max iterations: {} (restarts: {})", config.planner.max_iterations, config.planner.restarts);
        println!("Max phase candidates: {}", config.max_phase_candidates);
        println!("Project name: {}", config.project_name);
        println!("Next steps: {}", config.next_steps.join("; "));
        match &config.keywords_file {
            Some(path) => {
                let status = if path.exists() { "✅" } else { "❌" };
                println!("Keyword file: {} {}", path.display(), status);
            }
            None => println!("Keyword file: built-in"),
        }
        println!("Output: {} ({})", config.output_dir.display(), config.output_format);
        println!("Logs: {}", config.log_dir.display());
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        format!("{}...", text.chars().take(limit).collect::<String>())
    } else {
        text.to_string()
    }
}
