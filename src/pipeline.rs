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

//! Transcript to deck: ingestion, classification, extraction, phase planning
//! and the slide template, in that order.

use std::path::Path;
use std::sync::Arc;

use crate::classifier::TranscriptClassifier;
use crate::config::Config;
use crate::extraction::{InsightExtractor, Summarizer};
use crate::ingestion::ingest_transcript;
use crate::planner::PhasePlanner;
use crate::slides::build_slides;
use crate::types::{AutodeckResult, PhaseCandidate, SlideDeck};

pub struct DeckGenerator {
    config: Config,
    classifier: Arc<dyn TranscriptClassifier>,
    summarizer: Arc<dyn Summarizer>,
    planner: PhasePlanner,
}

impl DeckGenerator {
    pub fn new(config: Config, classifier: Arc<dyn TranscriptClassifier>, summarizer: Arc<dyn Summarizer>) -> Self {
        let planner = PhasePlanner::new(config.planner.clone());
        Self { config, classifier, summarizer, planner }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn generate(&self, path: &Path) -> AutodeckResult<SlideDeck> {
        let transcript = ingest_transcript(path).await?;
        self.generate_from_text(&transcript).await
    }

    pub async fn generate_from_text(&self, transcript: &str) -> AutodeckResult<SlideDeck> {
        tracing::info!("Generating deck with classifier '{}'", self.classifier.name());

        let segmented = self.classifier.segment_transcript(transcript).await?;

        let extractor = InsightExtractor::new(self.summarizer.as_ref(), self.config.max_phase_candidates);
        let insights = extractor.extract(&segmented);

        let candidates: Vec<PhaseCandidate> = insights.phases.iter().map(PhaseCandidate::from).collect();
        let phases = self.planner.plan_default(&candidates)?;
        tracing::info!("Planned {} phases from {} candidates", phases.len(), candidates.len());

        let slides = build_slides(&insights, &phases, &self.config.project_name, &self.config.next_steps);

        Ok(SlideDeck {
            id: uuid::Uuid::new_v4(),
            client_name: insights.client_name,
            generated_at: chrono::Utc::now(),
            phases,
            slides,
        })
    }
}
