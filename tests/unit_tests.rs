// Unit tests for Tutor Match

use tutor_match::core::{
    filters::{open_requests, passes_subject_gate, validate_class},
    jitter::{NoJitter, SeededJitter},
    scoring::{calculate_match_score, score_breakdown},
    subjects::{has_subject_match, subject_covers},
    MatchError, Matcher,
};
use tutor_match::models::{ClassRequest, ClassStatus, TutorCandidate, ScoringWeights, MAX_SCORE};

fn create_class(id: &str, subject: &str, status: &str) -> ClassRequest {
    ClassRequest {
        id: id.to_string(),
        subject: subject.to_string(),
        status: ClassStatus::from(status.to_string()),
        student_name: Some("Nguyễn Văn A".to_string()),
        location: Some("Quận 3".to_string()),
        schedule: Some("T2, T4 19:00".to_string()),
        budget: Some(200_000.0),
    }
}

fn create_tutor(id: &str, subjects: &[&str], total_classes: u32) -> TutorCandidate {
    TutorCandidate {
        id: id.to_string(),
        name: format!("Tutor {}", id),
        subjects: subjects.iter().map(|s| s.to_string()).collect(),
        rating: 4.6,
        total_classes,
        monthly_earnings: 5_000_000.0,
    }
}

#[test]
fn test_example_tutor_scores_between_80_and_89() {
    let matcher = Matcher::with_default_weights();
    let class = create_class("c1", "Toán", "open");
    let tutor_a = create_tutor("a", &["Toán", "Lý"], 80);

    let breakdown = matcher.breakdown(&class, &tutor_a, &mut NoJitter).unwrap();
    assert_eq!(breakdown.base(), 80);

    let mut jitter = SeededJitter::new(3);
    for _ in 0..100 {
        let result = matcher.score(&class, &tutor_a, &mut jitter).unwrap();
        assert!((80..=89).contains(&result.score), "score {} out of [80, 89]", result.score);
        assert_eq!(result.tutor_id, "a");
        assert_eq!(result.class_id, "c1");
    }
}

#[test]
fn test_example_tutor_without_subject_excluded() {
    let matcher = Matcher::with_default_weights();
    let class = create_class("c1", "Toán", "open");
    let tutors = vec![
        create_tutor("a", &["Toán", "Lý"], 80),
        create_tutor("b", &["Hóa"], 5),
    ];

    let ranked = matcher.rank_candidates(&class, &tutors, &mut SeededJitter::new(1)).unwrap();

    assert_eq!(ranked.len(), 1);
    assert!(ranked.iter().all(|r| r.tutor_id != "b"));
}

#[test]
fn test_pre_jitter_score_is_deterministic() {
    let matcher = Matcher::with_default_weights();
    let class = create_class("c1", "Toán", "open");
    let tutor = create_tutor("a", &["Toán"], 60);

    let mut jitter = SeededJitter::new(11);
    let bases: Vec<u8> = (0..50)
        .map(|_| {
            let breakdown = matcher.breakdown(&class, &tutor, &mut jitter).unwrap();
            breakdown.total - breakdown.jitter
        })
        .collect();

    assert!(bases.iter().all(|b| *b == 80));
}

#[test]
fn test_score_always_within_range() {
    let weights = ScoringWeights::default();
    let class = create_class("c1", "Toán", "open");

    for total_classes in [0, 50, 51, 1000, u32::MAX] {
        for jitter in [0, 5, 9, 255] {
            for subjects in [vec!["Toán"], vec!["Hóa"], vec![]] {
                let tutor = create_tutor("t", &subjects, total_classes);
                let score = calculate_match_score(&class, &tutor, &weights, jitter);
                assert!(score <= MAX_SCORE);
            }
        }
    }
}

#[test]
fn test_experience_bonus_above_fifty_classes() {
    let weights = ScoringWeights::default();
    let class = create_class("c1", "Toán", "open");

    let at_fifty = score_breakdown(&class, &create_tutor("t", &["Toán"], 50), &weights, 0);
    let at_fifty_one = score_breakdown(&class, &create_tutor("t", &["Toán"], 51), &weights, 0);

    assert!(at_fifty_one.base() >= at_fifty.base() + 20);
}

#[test]
fn test_substring_subject_matching() {
    assert!(subject_covers("Toán Cao Cấp", "Toán"));
    assert!(subject_covers("tiếng anh giao tiếp", "Tiếng Anh"));
    assert!(!subject_covers("Vật Lý", "Hóa"));
    assert!(!has_subject_match(&[], "Toán"));
}

#[test]
fn test_subject_gate_for_empty_subject_list() {
    let class = create_class("c1", "Toán", "open");
    assert!(!passes_subject_gate(&create_tutor("t", &[], 500), &class));
}

#[test]
fn test_only_open_requests_eligible() {
    let requests = vec![
        create_class("1", "Toán", "open"),
        create_class("2", "Lý", "matched"),
        create_class("3", "Hóa", "Open"),
        create_class("4", "Sinh", "cancelled"),
        create_class("5", "Văn", "awaiting_deposit"),
    ];

    let ids: Vec<String> = open_requests(requests).into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[test]
fn test_missing_subject_is_invalid_input() {
    let class = create_class("c1", "", "open");
    assert!(matches!(validate_class(&class), Err(MatchError::InvalidInput(_))));

    let matcher = Matcher::with_default_weights();
    let result = matcher.score(&class, &create_tutor("a", &["Toán"], 80), &mut NoJitter);
    assert!(result.is_err());
}
