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

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{Category, Insights, ProposedStep, SegmentedTranscript};

pub const DEFAULT_CLIENT_NAME: &str = "Client";
pub const DEFAULT_MAX_PHASE_CANDIDATES: usize = 6;
pub const PAIN_POINT_WORDS: usize = 50;
pub const OUTCOME_WORDS: usize = 100;

lazy_static! {
    static ref MY_NAME_IS: Regex = Regex::new(r"(?i)my name is ([A-Za-z ]+)").expect("valid name pattern");
    static ref THIS_IS: Regex = Regex::new(r"(?i)this is ([A-Za-z ]+)").expect("valid name pattern");
    static ref STEP_SEPARATOR: Regex = Regex::new(r"[;\n]+").expect("valid step separator");
    static ref TITLE_SEPARATOR: Regex = Regex::new(r"[:\-]+").expect("valid title separator");
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?](\s|$)").expect("valid sentence pattern");
}

/// Condenses free text into a short statement.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str, max_words: usize) -> String;
}

/// Keeps the first sentence, capped at `max_words` words.
#[derive(Debug, Clone, Default)]
pub struct LeadSentenceSummarizer;

impl Summarizer for LeadSentenceSummarizer {
    fn summarize(&self, text: &str, max_words: usize) -> String {
        let text = text.trim();
        let lead = match SENTENCE_END.find(text) {
            Some(m) => &text[..m.start() + 1],
            None => text,
        };
        lead.split_whitespace()
            .take(max_words)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub struct InsightExtractor<'a> {
    summarizer: &'a dyn Summarizer,
    max_phase_candidates: usize,
}

impl<'a> InsightExtractor<'a> {
    pub fn new(summarizer: &'a dyn Summarizer, max_phase_candidates: usize) -> Self {
        Self { summarizer, max_phase_candidates }
    }

    pub fn extract(&self, segmented: &SegmentedTranscript) -> Insights {
        let next_steps = segmented.get(Category::SuggestedNextSteps);
        let insights = Insights {
            client_name: extract_client_name(segmented.get(Category::Introductions))
                .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string()),
            objectives: extract_objectives(segmented.get(Category::ClientGoals)),
            pain_points: self.extract_pain_points(segmented.get(Category::PainPoints)),
            phases: extract_phases(next_steps, self.max_phase_candidates),
            expected_outcomes: self.extract_expected_outcomes(next_steps),
        };
        tracing::info!(
            "Extracted insights for {}: {} pain points, {} proposed steps",
            insights.client_name, insights.pain_points.len(), insights.phases.len()
        );
        insights
    }

    pub fn extract_pain_points(&self, pain_points: &[String]) -> Vec<String> {
        pain_points.iter()
            .map(|text| self.summarizer.summarize(text, PAIN_POINT_WORDS))
            .filter(|point| !point.is_empty())
            .collect()
    }

    /// Outcomes are summarised from the proposed next steps.
    pub fn extract_expected_outcomes(&self, outcomes: &[String]) -> String {
        let combined = outcomes.join(" ");
        let combined = combined.trim();
        if combined.is_empty() {
            return String::new();
        }
        self.summarizer.summarize(combined, OUTCOME_WORDS)
    }
}

pub fn extract_client_name(introductions: &[String]) -> Option<String> {
    for intro in introductions {
        for pattern in [&*MY_NAME_IS, &*THIS_IS] {
            if let Some(name) = pattern.captures(intro).and_then(|c| c.get(1)) {
                let name = name.as_str().trim();
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
        }
    }
    None
}

pub fn extract_objectives(client_goals: &[String]) -> String {
    client_goals.join(" ").trim().to_string()
}

/// Splits each segment on `;`/newlines, then each entry once on the first run
/// of `:` or `-` into title and description.
pub fn extract_phases(suggested_next_steps: &[String], limit: usize) -> Vec<ProposedStep> {
    suggested_next_steps.iter()
        .flat_map(|step| STEP_SEPARATOR.split(step).map(str::to_string).collect::<Vec<_>>())
        .filter_map(|entry| {
            let mut parts = TITLE_SEPARATOR.splitn(&entry, 2);
            let title = parts.next().unwrap_or("").trim().to_string();
            let description = parts.next().unwrap_or("").trim().to_string();
            (!title.is_empty()).then_some(ProposedStep { title, description })
        })
        .take(limit)
        .collect()
}
