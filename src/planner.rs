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

//! Phase planning: groups free-text next steps into a bounded set of
//! ordered project phases.
//!
//! Candidates are turned into TF-IDF vectors, partitioned with seeded
//! k-means, and each cluster becomes one `Phase` whose description is the
//! space-joined member text cut to a fixed number of characters.

use std::collections::{BTreeMap, HashSet};

use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::Phase;

pub const DEFAULT_PHASE_COUNT: usize = 4;
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 200;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_ITERATIONS: usize = 300;
pub const DEFAULT_TOLERANCE: f64 = 1e-4;
pub const DEFAULT_RESTARTS: usize = 10;

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\b\w\w+\b").expect("valid token pattern");
    static ref STOP_WORDS: HashSet<&'static str> = ENGLISH_STOP_WORDS.iter().copied().collect();
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("phase count must be at least 1, got {0}")]
    InvalidPhaseCount(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Phases requested when the caller does not pass a count.
    pub phase_count: usize,
    /// Maximum description length in characters.
    pub description_limit: usize,
    pub seed: u64,
    pub max_iterations: usize,
    /// Centroid movement (sum of squared shifts) below which iteration stops.
    pub tolerance: f64,
    /// Independent k-means runs; the lowest inertia wins.
    pub restarts: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            phase_count: DEFAULT_PHASE_COUNT,
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            restarts: DEFAULT_RESTARTS,
        }
    }
}

/// Groups phase candidates into at most `target_count` phases using the
/// default configuration (seed 42, 200 character descriptions).
pub fn plan_phases<S: AsRef<str>>(candidates: &[S], target_count: usize) -> Result<Vec<Phase>, PlannerError> {
    PhasePlanner::new(PlannerConfig::default()).plan(candidates, target_count)
}

/// Owned planner handle. Holds no mutable state, so one instance can be
/// shared across threads and every call reseeds its own generator.
#[derive(Debug, Clone)]
pub struct PhasePlanner {
    config: PlannerConfig,
}

impl PhasePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans with the configured `phase_count`.
    pub fn plan_default<S: AsRef<str>>(&self, candidates: &[S]) -> Result<Vec<Phase>, PlannerError> {
        self.plan(candidates, self.config.phase_count)
    }

    pub fn plan<S: AsRef<str>>(&self, candidates: &[S], target_count: usize) -> Result<Vec<Phase>, PlannerError> {
        if candidates.is_empty() {
            tracing::debug!("No phase candidates, returning empty plan");
            return Ok(Vec::new());
        }
        if target_count == 0 {
            return Err(PlannerError::InvalidPhaseCount(target_count));
        }

        let texts: Vec<&str> = candidates.iter().map(|c| c.as_ref()).collect();
        let effective_count = target_count.min(texts.len());

        let vectors = TfidfVectorizer::fit_transform(&texts);
        let kmeans = KMeans {
            clusters: effective_count,
            max_iterations: self.config.max_iterations.max(1),
            tolerance: self.config.tolerance,
            restarts: self.config.restarts.max(1),
            seed: self.config.seed,
        };
        let clustering = kmeans.fit(&vectors.rows);
        let labels = relabel_by_first_member(&clustering.labels);

        tracing::info!(
            "Clustered {} candidates into {} phases (vocabulary {}, {} iterations, inertia {:.4})",
            texts.len(), effective_count, vectors.vocabulary.len(), clustering.iterations, clustering.inertia
        );

        let mut groups: Vec<Vec<&str>> = vec![Vec::new(); effective_count];
        for (idx, label) in labels.iter().enumerate() {
            groups[*label].push(texts[idx]);
        }

        let phases = groups.iter()
            .filter(|members| !members.is_empty())
            .enumerate()
            .map(|(i, members)| Phase {
                title: format!("Phase {}", i + 1),
                description: truncate_chars(&members.join(" "), self.config.description_limit),
            })
            .collect();

        Ok(phases)
    }
}

impl Default for PhasePlanner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

/// Keeps the first `limit` characters. Not word-aware: may cut mid-word.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Renumbers cluster labels so cluster 0 holds the first candidate, cluster 1
/// the first candidate not in cluster 0, and so on.
fn relabel_by_first_member(labels: &[usize]) -> Vec<usize> {
    let mut mapping = BTreeMap::new();
    labels.iter()
        .map(|label| {
            let next = mapping.len();
            *mapping.entry(*label).or_insert(next)
        })
        .collect()
}

/// Dense TF-IDF matrix over the candidate set.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    /// Sorted vocabulary; column `i` of every row is `vocabulary[i]`.
    pub vocabulary: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

pub struct TfidfVectorizer;

impl TfidfVectorizer {
    pub fn tokenize(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TOKEN_PATTERN.find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !STOP_WORDS.contains(token))
            .map(str::to_string)
            .collect()
    }

    /// Raw term counts weighted by smoothed idf `ln((1 + n) / (1 + df)) + 1`,
    /// each row L2-normalised. Rows with no vocabulary terms stay all-zero.
    pub fn fit_transform(texts: &[&str]) -> TfidfMatrix {
        let tokenized: Vec<Vec<String>> = texts.iter().map(|t| Self::tokenize(t)).collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let vocabulary: Vec<String> = document_frequency.keys().map(|t| t.to_string()).collect();
        let n = texts.len() as f64;
        let idf: Vec<f64> = document_frequency.values()
            .map(|df| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();
        let column: BTreeMap<&str, usize> = document_frequency.keys()
            .enumerate()
            .map(|(i, t)| (*t, i))
            .collect();

        let rows = tokenized.iter()
            .map(|tokens| {
                let mut row = vec![0.0; vocabulary.len()];
                for token in tokens {
                    if let Some(&col) = column.get(token.as_str()) {
                        row[col] += 1.0;
                    }
                }
                for (value, weight) in row.iter_mut().zip(&idf) {
                    *value *= weight;
                }
                let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    row.iter_mut().for_each(|v| *v /= norm);
                }
                row
            })
            .collect();

        TfidfMatrix { vocabulary, rows }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub labels: Vec<usize>,
    pub inertia: f64,
    pub iterations: usize,
}

/// Lloyd's k-means with k-means++ seeding. Requires `1 <= clusters <= points`.
#[derive(Debug, Clone)]
pub struct KMeans {
    pub clusters: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub restarts: usize,
    pub seed: u64,
}

impl KMeans {
    pub fn fit(&self, points: &[Vec<f64>]) -> Clustering {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<Clustering> = None;

        for run in 0..self.restarts.max(1) {
            let clustering = self.fit_once(points, &mut rng);
            tracing::debug!("k-means run {} finished with inertia {:.6}", run, clustering.inertia);
            let better = best.as_ref().map_or(true, |b| clustering.inertia < b.inertia);
            if better {
                best = Some(clustering);
            }
        }

        best.unwrap_or_else(|| Clustering { labels: Vec::new(), inertia: 0.0, iterations: 0 })
    }

    fn fit_once(&self, points: &[Vec<f64>], rng: &mut StdRng) -> Clustering {
        let k = self.clusters.min(points.len());
        if k == 0 {
            return Clustering { labels: vec![0; points.len()], inertia: 0.0, iterations: 0 };
        }

        let mut centroids = init_plus_plus(points, k, rng);
        let mut labels: Vec<usize> = Vec::new();
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;

            let mut next_labels: Vec<usize> = points.iter()
                .map(|p| nearest(p, &centroids).0)
                .collect();
            relocate_empty_clusters(points, &centroids, &mut next_labels, k);

            let next_centroids = compute_centroids(points, &next_labels, k, &centroids);
            let shift: f64 = centroids.iter()
                .zip(&next_centroids)
                .map(|(a, b)| squared_distance(a, b))
                .sum();

            let converged = next_labels == labels;
            labels = next_labels;
            centroids = next_centroids;

            if converged || shift <= self.tolerance {
                break;
            }
        }

        let inertia = points.iter()
            .zip(&labels)
            .map(|(p, l)| squared_distance(p, &centroids[*l]))
            .sum();

        Clustering { labels, inertia, iterations }
    }
}

/// k-means++ seeding. When every remaining point sits on a chosen seed the
/// lowest-index unused point is taken, so duplicate inputs still get `k`
/// distinct seeds.
fn init_plus_plus(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut chosen = vec![rng.gen_range(0..n)];
    let mut distances: Vec<f64> = points.iter()
        .map(|p| squared_distance(p, &points[chosen[0]]))
        .collect();

    while chosen.len() < k {
        let total: f64 = distances.iter().sum();
        let next = if total <= f64::EPSILON {
            (0..n).find(|i| !chosen.contains(i))
        } else {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut pick = None;
            for (i, d) in distances.iter().enumerate() {
                if *d <= 0.0 {
                    continue;
                }
                cumulative += d;
                pick = Some(i);
                if cumulative >= target {
                    break;
                }
            }
            pick
        };

        let Some(next) = next else { break };
        chosen.push(next);
        for (d, p) in distances.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &points[next]));
        }
    }

    chosen.iter().map(|i| points[*i].clone()).collect()
}

/// Index of the closest centroid; ties go to the lowest index.
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_distance(point, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

/// Gives every empty cluster the point farthest from its centroid, drawn only
/// from clusters that keep at least one member. Ties take the later point.
fn relocate_empty_clusters(points: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize], k: usize) {
    let mut counts = vec![0usize; k];
    for l in labels.iter() {
        counts[*l] += 1;
    }

    for cluster in 0..k {
        if counts[cluster] > 0 {
            continue;
        }
        let mut donor: Option<(usize, f64)> = None;
        for (i, p) in points.iter().enumerate() {
            let current = labels[i];
            if counts[current] <= 1 {
                continue;
            }
            let d = squared_distance(p, &centroids[current]);
            if donor.map_or(true, |(_, best)| d >= best) {
                donor = Some((i, d));
            }
        }
        if let Some((i, _)) = donor {
            counts[labels[i]] -= 1;
            labels[i] = cluster;
            counts[cluster] += 1;
        }
    }
}

fn compute_centroids(points: &[Vec<f64>], labels: &[usize], k: usize, previous: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let dims = points.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dims]; k];
    let mut counts = vec![0usize; k];

    for (p, l) in points.iter().zip(labels) {
        counts[*l] += 1;
        for (s, v) in sums[*l].iter_mut().zip(p) {
            *s += v;
        }
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (sum, count))| {
            if count == 0 {
                previous[i].clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amoungst",
    "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere",
    "are", "around", "as", "at", "back", "be", "became", "because", "become", "becomes",
    "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "bill", "both", "bottom", "but", "by", "call", "can", "cannot", "cant",
    "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do", "done",
    "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else", "elsewhere",
    "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything", "everywhere", "except",
    "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five", "for", "former",
    "formerly", "forty", "found", "four", "from", "front", "full", "further", "get", "give",
    "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter",
    "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how", "however",
    "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is",
    "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only",
    "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over",
    "own", "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see",
    "seem", "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "thick", "thin", "third", "this", "those", "though", "three",
    "through", "throughout", "thru", "thus", "to", "together", "too", "top", "toward", "towards",
    "twelve", "twenty", "two", "un", "under", "until", "up", "upon", "us", "very",
    "via", "was", "we", "well", "were", "what", "whatever", "when", "whence", "whenever",
    "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_single_letters() {
        let tokens = TfidfVectorizer::tokenize("We will Build the REST API in a week");
        assert_eq!(tokens, vec!["build", "rest", "api", "week"]);
        assert!(TfidfVectorizer::tokenize("A").is_empty());
    }

    #[test]
    fn test_tfidf_rows_are_unit_length() {
        let matrix = TfidfVectorizer::fit_transform(&["deploy cloud", "deploy database schema", "the"]);
        assert_eq!(matrix.vocabulary, vec!["cloud", "database", "deploy", "schema"]);

        for row in &matrix.rows[..2] {
            let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
        assert!(matrix.rows[2].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_shared_terms_weigh_less() {
        let matrix = TfidfVectorizer::fit_transform(&["deploy cloud", "deploy database"]);
        let row = &matrix.rows[0];
        // vocabulary: cloud, database, deploy
        assert!(row[0] > row[2]);
    }

    #[test]
    fn test_kmeans_separates_obvious_groups() {
        let points = vec![
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            vec![0.1, 0.0],
            vec![10.0, 10.1],
        ];
        let kmeans = KMeans { clusters: 2, max_iterations: 100, tolerance: 1e-6, restarts: 1, seed: 7 };
        let labels = relabel_by_first_member(&kmeans.fit(&points).labels);
        assert_eq!(labels, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_kmeans_never_leaves_a_cluster_empty() {
        let points = vec![vec![1.0, 0.0]; 5];
        let kmeans = KMeans { clusters: 3, max_iterations: 50, tolerance: 1e-6, restarts: 2, seed: 42 };
        let clustering = kmeans.fit(&points);
        for cluster in 0..3 {
            assert!(clustering.labels.contains(&cluster), "cluster {} empty", cluster);
        }
        assert_eq!(clustering.inertia, 0.0);
    }

    #[test]
    fn test_relabel_by_first_member() {
        assert_eq!(relabel_by_first_member(&[2, 0, 2, 1]), vec![0, 1, 0, 2]);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("short", 200), "short");
    }

    #[test]
    fn test_zero_phase_count_is_rejected() {
        assert_eq!(plan_phases(&["Deploy"], 0), Err(PlannerError::InvalidPhaseCount(0)));
        assert_eq!(plan_phases::<&str>(&[], 0), Ok(Vec::new()));
    }

    #[test]
    fn test_description_limit_is_configurable() {
        let planner = PhasePlanner::new(PlannerConfig { description_limit: 5, ..PlannerConfig::default() });
        let phases = planner.plan(&["Write documentation"], 1).unwrap();
        assert_eq!(phases[0].description, "Write");
    }

    #[test]
    fn test_with_seed_overrides_only_the_seed() {
        let planner = PhasePlanner::new(PlannerConfig { phase_count: 2, ..PlannerConfig::default() }).with_seed(7);
        assert_eq!(planner.config().seed, 7);
        assert_eq!(planner.config().phase_count, 2);
        assert_eq!(planner.config().description_limit, PlannerConfig::default().description_limit);
    }
}
