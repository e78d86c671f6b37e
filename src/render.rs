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

use std::fmt::Write as _;
use std::path::Path;

use crate::config::OutputFormat;
use crate::types::{AutodeckError, AutodeckResult, SlideDeck, SlideKind};

pub trait DeckRenderer: Send + Sync {
    fn format(&self) -> OutputFormat;
    fn render(&self, deck: &SlideDeck) -> AutodeckResult<String>;
}

pub fn renderer_for(format: OutputFormat) -> Box<dyn DeckRenderer> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

/// One `---`-separated section per slide; the cover becomes the deck heading.
pub struct MarkdownRenderer;

impl DeckRenderer for MarkdownRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }

    fn render(&self, deck: &SlideDeck) -> AutodeckResult<String> {
        let mut out = String::new();
        let sections: Vec<String> = deck.slides.iter()
            .map(|slide| {
                let mut section = String::new();
                let heading = if slide.kind == SlideKind::Cover { "#" } else { "##" };
                // writing into a String cannot fail
                let _ = writeln!(section, "{} {}", heading, slide.title);
                if let Some(subtitle) = &slide.subtitle {
                    let _ = writeln!(section, "\n_{}_", subtitle);
                }
                if !slide.bullets.is_empty() {
                    section.push('\n');
                    for bullet in &slide.bullets {
                        let _ = writeln!(section, "- {}", bullet);
                    }
                }
                section
            })
            .collect();

        out.push_str(&sections.join("\n---\n\n"));
        let _ = write!(out, "\n<!-- deck {} generated {} -->\n", deck.id, deck.generated_at.to_rfc3339());
        Ok(out)
    }
}

pub struct JsonRenderer;

impl DeckRenderer for JsonRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn render(&self, deck: &SlideDeck) -> AutodeckResult<String> {
        serde_json::to_string_pretty(deck).map_err(|e| AutodeckError::Render(e.to_string()))
    }
}

pub async fn write_deck(renderer: &dyn DeckRenderer, deck: &SlideDeck, path: &Path) -> AutodeckResult<()> {
    let rendered = renderer.render(deck)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, rendered).await?;
    tracing::info!("Wrote {} deck with {} slides to {}", renderer.format(), deck.slides.len(), path.display());
    Ok(())
}
