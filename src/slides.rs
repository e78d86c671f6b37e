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

//! Slide text for the fixed proposal template.

use crate::types::{Insights, Phase, Slide, SlideKind};

pub fn cover_slide(client_name: &str, project_name: &str) -> Slide {
    Slide {
        kind: SlideKind::Cover,
        title: client_name.to_string(),
        subtitle: Some(format!("Proposal for {}", project_name)),
        bullets: Vec::new(),
    }
}

pub fn objectives_slide(objectives: &str) -> Slide {
    content_slide(SlideKind::Objectives, "Client Objectives", split_sentences(objectives))
}

pub fn pain_points_slide(pain_points: &[String]) -> Slide {
    content_slide(SlideKind::PainPoints, "Pain Points / Challenges", pain_points.to_vec())
}

/// "title: description" per phase, or the bare title when there is no description.
pub fn phases_overview_slide(phases: &[Phase]) -> Slide {
    let bullets = phases.iter()
        .map(|phase| {
            if phase.description.is_empty() {
                phase.title.clone()
            } else {
                format!("{}: {}", phase.title, phase.description)
            }
        })
        .collect();
    content_slide(SlideKind::PhasesOverview, "Proposed Solution (Phases Overview)", bullets)
}

pub fn phase_slide(phase: &Phase, timeframe: Option<&str>) -> Slide {
    let bullets = if phase.description.is_empty() {
        Vec::new()
    } else {
        vec![phase.description.clone()]
    };
    Slide {
        kind: SlideKind::Phase,
        title: phase.title.clone(),
        subtitle: timeframe.filter(|t| !t.is_empty()).map(str::to_string),
        bullets,
    }
}

pub fn expected_outcomes_slide(expected_outcomes: &str) -> Slide {
    content_slide(SlideKind::ExpectedOutcomes, "Expected Outcomes", split_sentences(expected_outcomes))
}

pub fn next_steps_slide(next_steps: &[String]) -> Slide {
    content_slide(SlideKind::NextSteps, "Next Steps / CTA", next_steps.to_vec())
}

/// Full deck in template order: cover, objectives, pain points, overview,
/// one slide per phase, outcomes, next steps.
pub fn build_slides(insights: &Insights, phases: &[Phase], project_name: &str, next_steps: &[String]) -> Vec<Slide> {
    let mut slides = vec![
        cover_slide(&insights.client_name, project_name),
        objectives_slide(&insights.objectives),
        pain_points_slide(&insights.pain_points),
        phases_overview_slide(phases),
    ];
    slides.extend(phases.iter().map(|phase| phase_slide(phase, None)));
    slides.push(expected_outcomes_slide(&insights.expected_outcomes));
    slides.push(next_steps_slide(next_steps));
    slides
}

fn content_slide(kind: SlideKind, title: &str, bullets: Vec<String>) -> Slide {
    Slide { kind, title: title.to_string(), subtitle: None, bullets }
}

fn split_sentences(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
