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

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Semantic buckets a transcript paragraph can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Introductions,
    ClientGoals,
    PainPoints,
    TechnicalConstraints,
    SuggestedNextSteps,
}

impl Category {
    /// Fixed category order; also the tie-break order for classification.
    pub const ALL: [Category; 5] = [
        Category::Introductions,
        Category::ClientGoals,
        Category::PainPoints,
        Category::TechnicalConstraints,
        Category::SuggestedNextSteps,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Introductions => "Introductions",
            Category::ClientGoals => "Client Goals",
            Category::PainPoints => "Pain Points",
            Category::TechnicalConstraints => "Technical Constraints",
            Category::SuggestedNextSteps => "Suggested Next Steps",
        }
    }

    pub fn from_label(label: &str) -> Option<Category> {
        let wanted = label.trim().to_lowercase();
        Category::ALL.iter()
            .copied()
            .find(|c| c.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classifier output: every category mapped to its paragraphs in transcript order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedTranscript {
    segments: HashMap<Category, Vec<String>>,
}

impl SegmentedTranscript {
    pub fn new() -> Self {
        let segments = Category::ALL.iter()
            .map(|c| (*c, Vec::new()))
            .collect();
        Self { segments }
    }

    pub fn push(&mut self, category: Category, segment: impl Into<String>) {
        self.segments.entry(category).or_default().push(segment.into());
    }

    pub fn get(&self, category: Category) -> &[String] {
        self.segments.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categories in their fixed order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    pub fn total_segments(&self) -> usize {
        self.segments.values().map(Vec::len).sum()
    }
}

impl Default for SegmentedTranscript {
    fn default() -> Self {
        Self::new()
    }
}

/// A proposed step pulled out of the "next steps" discussion, before clustering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedStep {
    pub title: String,
    pub description: String,
}

/// One free-text fragment fed to the phase planner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseCandidate {
    pub text: String,
}

impl PhaseCandidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Title and description joined with ". ". The delimiter is dropped when
    /// there is no description.
    pub fn compose(title: &str, description: &str) -> Self {
        let title = title.trim();
        let description = description.trim();
        if description.is_empty() {
            Self::new(title)
        } else {
            Self::new(format!("{}. {}", title, description))
        }
    }
}

impl AsRef<str> for PhaseCandidate {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<&ProposedStep> for PhaseCandidate {
    fn from(step: &ProposedStep) -> Self {
        PhaseCandidate::compose(&step.title, &step.description)
    }
}

/// Planner output unit, one per non-empty cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub title: String,
    pub description: String,
}

/// Structured fields pulled out of a segmented transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub client_name: String,
    pub objectives: String,
    pub pain_points: Vec<String>,
    pub phases: Vec<ProposedStep>,
    pub expected_outcomes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    Cover,
    Objectives,
    PainPoints,
    PhasesOverview,
    Phase,
    ExpectedOutcomes,
    NextSteps,
}

impl fmt::Display for SlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlideKind::Cover => write!(f, "cover"),
            SlideKind::Objectives => write!(f, "objectives"),
            SlideKind::PainPoints => write!(f, "pain_points"),
            SlideKind::PhasesOverview => write!(f, "phases_overview"),
            SlideKind::Phase => write!(f, "phase"),
            SlideKind::ExpectedOutcomes => write!(f, "expected_outcomes"),
            SlideKind::NextSteps => write!(f, "next_steps"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub kind: SlideKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideDeck {
    pub id: Uuid,
    pub client_name: String,
    pub generated_at: DateTime<Utc>,
    pub phases: Vec<Phase>,
    pub slides: Vec<Slide>,
}

/// Errors surfaced by the transcript collaborators and the deck writer.
#[derive(Debug, thiserror::Error)]
pub enum AutodeckError {
    #[error("Transcript file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported transcript file type: {0}")]
    UnsupportedFileType(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Phase planning error: {0}")]
    Planning(#[from] crate::planner::PlannerError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AutodeckResult<T> = std::result::Result<T, AutodeckError>;
