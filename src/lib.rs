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

//! Turns meeting transcripts into proposal slide decks.
//!
//! The interesting part is [`planner`], which clusters free-text next steps
//! into a bounded, ordered set of project phases.

pub mod classifier;
pub mod config;
pub mod extraction;
pub mod ingestion;
pub mod pipeline;
pub mod planner;
pub mod render;
pub mod slides;
pub mod types;
pub mod ui;

pub use planner::{plan_phases, PhasePlanner, PlannerConfig, PlannerError};
pub use types::{Phase, PhaseCandidate};
