use autodeck::planner::{plan_phases, PhasePlanner, PlannerConfig, PlannerError};
use proptest::prelude::*;

fn titles(phases: &[autodeck::Phase]) -> Vec<String> {
    phases.iter().map(|p| p.title.clone()).collect()
}

#[test]
fn test_empty_candidates_give_empty_plan() {
    let empty: Vec<String> = Vec::new();
    assert!(plan_phases(&empty, 4).unwrap().is_empty());
    assert!(plan_phases(&empty, 1).unwrap().is_empty());
}

#[test]
fn test_single_candidate() {
    let phases = plan_phases(&["A"], 5).unwrap();
    assert_eq!(phases.len(), 1);
    assert_eq!(phases[0].title, "Phase 1");
    assert_eq!(phases[0].description, "A");
}

#[test]
fn test_identical_candidates_split_across_phases() {
    let candidates = ["Implement login: add auth", "Implement login: add auth"];
    let phases = plan_phases(&candidates, 4).unwrap();
    assert_eq!(titles(&phases), vec!["Phase 1", "Phase 2"]);
    for phase in &phases {
        assert_eq!(phase.description, "Implement login: add auth");
    }
}

#[test]
fn test_five_distinct_candidates_three_phases() {
    let candidates = [
        "Set up database schema",
        "Build REST API",
        "Deploy to cloud",
        "Train support staff",
        "Write documentation",
    ];
    let phases = plan_phases(&candidates, 3).unwrap();
    assert_eq!(titles(&phases), vec!["Phase 1", "Phase 2", "Phase 3"]);

    // every candidate lands in exactly one description
    for candidate in candidates {
        let hits = phases.iter().filter(|p| p.description.contains(candidate)).count();
        assert_eq!(hits, 1, "{} placed {} times", candidate, hits);
    }
    // the first candidate always opens Phase 1
    assert!(phases[0].description.starts_with("Set up database schema"));
}

#[test]
fn test_similar_candidates_share_a_phase() {
    let candidates = [
        "Migrate billing database",
        "Train support staff",
        "Backfill billing database records",
        "Run support staff workshops",
    ];
    let phases = plan_phases(&candidates, 2).unwrap();
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0].description, "Migrate billing database Backfill billing database records");
    assert_eq!(phases[1].description, "Train support staff Run support staff workshops");
}

#[test]
fn test_description_is_truncated_to_200_characters() {
    let long = "x".repeat(150);
    let candidates = vec![long.clone(), long.clone()];
    let phases = plan_phases(&candidates, 1).unwrap();
    assert_eq!(phases[0].description.chars().count(), 200);
    assert!(phases[0].description.starts_with(&long));
}

#[test]
fn test_zero_target_count_is_an_error() {
    assert_eq!(plan_phases(&["Deploy"], 0), Err(PlannerError::InvalidPhaseCount(0)));
}

#[test]
fn test_stop_word_only_candidates_do_not_fail() {
    let phases = plan_phases(&["the", "and", "of it", "   "], 3).unwrap();
    assert_eq!(phases.len(), 3);
}

#[test]
fn test_planner_is_shareable_across_threads() {
    let planner = std::sync::Arc::new(PhasePlanner::new(PlannerConfig::default()));
    let candidates = vec!["Build API", "Deploy to cloud", "Write documentation", "Train staff"];
    let expected = planner.plan(&candidates, 2).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let planner = planner.clone();
            let candidates = candidates.clone();
            std::thread::spawn(move || planner.plan(&candidates, 2).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

fn candidate_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}( [a-z]{1,8}){0,5}", 0..12)
}

proptest! {
    #[test]
    fn prop_phase_count_is_min_of_target_and_candidates(candidates in candidate_strategy(), target in 1usize..8) {
        let phases = plan_phases(&candidates, target).unwrap();
        prop_assert_eq!(phases.len(), target.min(candidates.len()));
    }

    #[test]
    fn prop_titles_are_sequential(candidates in candidate_strategy(), target in 1usize..8) {
        let phases = plan_phases(&candidates, target).unwrap();
        for (i, phase) in phases.iter().enumerate() {
            prop_assert_eq!(&phase.title, &format!("Phase {}", i + 1));
        }
    }

    #[test]
    fn prop_descriptions_are_bounded(candidates in prop::collection::vec("\\PC{0,120}", 1..10), target in 1usize..5) {
        let phases = plan_phases(&candidates, target).unwrap();
        for phase in &phases {
            prop_assert!(phase.description.chars().count() <= 200);
        }
    }

    #[test]
    fn prop_planning_is_deterministic(candidates in candidate_strategy(), target in 1usize..8, seed in any::<u64>()) {
        let planner = PhasePlanner::default().with_seed(seed);
        let first = planner.plan(&candidates, target).unwrap();
        let second = planner.plan(&candidates, target).unwrap();
        prop_assert_eq!(first, second);
    }
}
