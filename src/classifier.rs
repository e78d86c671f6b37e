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

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{AutodeckResult, Category, SegmentedTranscript};

lazy_static! {
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n[ \t\r]*\n").expect("valid paragraph pattern");
}

/// Assigns transcript paragraphs to categories. Implementations are built
/// once by the caller and passed to whatever needs them.
#[async_trait]
pub trait TranscriptClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// Best category for a single paragraph.
    async fn classify(&self, segment: &str) -> AutodeckResult<Category>;

    /// Splits on blank lines and classifies every non-empty paragraph.
    async fn segment_transcript(&self, transcript: &str) -> AutodeckResult<SegmentedTranscript> {
        let mut segmented = SegmentedTranscript::new();
        let paragraphs: Vec<&str> = split_paragraphs(transcript).collect();
        for segment in paragraphs {
            let category = self.classify(segment).await?;
            tracing::debug!("Classified segment as {}: {:.60}", category, segment);
            segmented.push(category, segment);
        }
        tracing::info!("Segmented transcript into {} paragraphs", segmented.total_segments());
        Ok(segmented)
    }
}

pub fn split_paragraphs(transcript: &str) -> impl Iterator<Item = &str> {
    PARAGRAPH_BREAK.split(transcript)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Keyword file layout, e.g.
/// `{"fallback": "Client Goals", "keywords": {"Pain Points": ["slow", "manual"]}}`.
/// Categories missing from `keywords` keep their built-in lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordConfig {
    #[serde(default)]
    pub fallback: Option<String>,
    #[serde(default)]
    pub keywords: HashMap<String, Vec<String>>,
}

/// Scores each category by keyword occurrences in the lower-cased paragraph.
pub struct KeywordClassifier {
    keywords: HashMap<Category, Vec<String>>,
    fallback: Category,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        let mut keywords = HashMap::new();
        keywords.insert(Category::Introductions, to_strings(&[
            "my name is", "this is", "i'm", "i am", "nice to meet", "introduce", "joining us",
            "hello", "welcome", "i lead", "i run", "on the call", "our company",
        ]));
        keywords.insert(Category::ClientGoals, to_strings(&[
            "goal", "objective", "we want", "we'd like", "we would like", "hoping to", "aim",
            "looking to", "grow", "increase", "improve", "vision", "achieve", "success",
        ]));
        keywords.insert(Category::PainPoints, to_strings(&[
            "problem", "issue", "struggle", "frustrat", "pain", "slow", "manual", "difficult",
            "hard to", "challenge", "broken", "error", "waste", "complain", "bottleneck",
        ]));
        keywords.insert(Category::TechnicalConstraints, to_strings(&[
            "legacy", "budget", "deadline", "compliance", "security", "integrat", "infrastructure",
            "on-prem", "limitation", "constraint", "must use", "can't change", "stack", "regulat",
        ]));
        keywords.insert(Category::SuggestedNextSteps, to_strings(&[
            "next step", "phase", "we will", "we'll", "we could", "propose", "recommend",
            "plan to", "then", "first,", "follow up", "follow-up", "implement", "deploy", "roll out",
        ]));

        Self { keywords, fallback: Category::ClientGoals }
    }

    /// Built-in lists overridden by whatever the config provides.
    pub fn with_config(config: KeywordConfig) -> Result<Self> {
        let mut classifier = Self::new();
        for (label, words) in config.keywords {
            let category = Category::from_label(&label)
                .with_context(|| format!("Unknown category in keyword config: {}", label))?;
            let words = words.into_iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect();
            classifier.keywords.insert(category, words);
        }
        if let Some(label) = config.fallback {
            classifier.fallback = Category::from_label(&label)
                .with_context(|| format!("Unknown fallback category: {}", label))?;
        }
        Ok(classifier)
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await
            .with_context(|| format!("Failed to read keyword file {}", path.display()))?;
        let config: KeywordConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid keyword file {}", path.display()))?;
        Self::with_config(config)
    }

    pub fn fallback(&self) -> Category {
        self.fallback
    }

    pub fn scores(&self, segment: &str) -> Vec<(Category, usize)> {
        let lowered = segment.to_lowercase();
        Category::ALL.iter()
            .map(|category| {
                let score = self.keywords.get(category)
                    .map(|words| words.iter().map(|w| lowered.matches(w.as_str()).count()).sum())
                    .unwrap_or(0);
                (*category, score)
            })
            .collect()
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptClassifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn classify(&self, segment: &str) -> AutodeckResult<Category> {
        let mut best = (self.fallback, 0);
        for (category, score) in self.scores(segment) {
            // strict comparison keeps the earlier category on ties
            if score > best.1 {
                best = (category, score);
            }
        }
        Ok(best.0)
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paragraphs_skips_blank_segments() {
        let text = "Hello there.\n\n  \n\nWe want growth.\n \nIt is slow.\n";
        let parts: Vec<_> = split_paragraphs(text).collect();
        assert_eq!(parts, vec!["Hello there.", "We want growth.", "It is slow."]);
    }

    #[tokio::test]
    async fn test_keyword_classification() {
        let classifier = KeywordClassifier::new();
        assert_eq!(classifier.classify("Hi, my name is Dana Smith from Acme.").await.unwrap(), Category::Introductions);
        assert_eq!(classifier.classify("Invoicing is slow and manual, a real pain.").await.unwrap(), Category::PainPoints);
        assert_eq!(classifier.classify("We must stay on the legacy stack for compliance.").await.unwrap(), Category::TechnicalConstraints);
        assert_eq!(classifier.classify("Next step: implement login; then deploy to cloud.").await.unwrap(), Category::SuggestedNextSteps);
    }

    #[tokio::test]
    async fn test_unmatched_segment_uses_fallback() {
        let classifier = KeywordClassifier::new();
        assert_eq!(classifier.classify("Weather was nice.").await.unwrap(), Category::ClientGoals);
    }

    #[tokio::test]
    async fn test_config_overrides_keywords_and_fallback() {
        let config: KeywordConfig = serde_json::from_str(
            r#"{"fallback": "Introductions", "keywords": {"Pain Points": ["Weather"]}}"#
        ).unwrap();
        let classifier = KeywordClassifier::with_config(config).unwrap();
        assert_eq!(classifier.fallback(), Category::Introductions);
        assert_eq!(classifier.classify("Weather was nice.").await.unwrap(), Category::PainPoints);
        assert_eq!(classifier.classify("Nothing matches here.").await.unwrap(), Category::Introductions);
    }

    #[test]
    fn test_unknown_category_in_config_is_rejected() {
        let mut keywords = HashMap::new();
        keywords.insert("Small Talk".to_string(), vec!["weather".to_string()]);
        let result = KeywordClassifier::with_config(KeywordConfig { fallback: None, keywords });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_segment_transcript_groups_by_category() {
        let classifier = KeywordClassifier::new();
        let transcript = "Hello, my name is Dana.\n\nOur reporting is slow and manual.\n\nNext step: deploy the dashboard.";
        let segmented = classifier.segment_transcript(transcript).await.unwrap();
        assert_eq!(segmented.get(Category::Introductions), ["Hello, my name is Dana.".to_string()]);
        assert_eq!(segmented.get(Category::PainPoints).len(), 1);
        assert_eq!(segmented.get(Category::SuggestedNextSteps), ["Next step: deploy the dashboard.".to_string()]);
    }
}
