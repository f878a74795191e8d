// Integration tests for Tutor Match

use tutor_match::core::{JitterMode, JitterPolicy, Matcher, NoJitter, SeededJitter};
use tutor_match::models::{ClassRequest, ClassStatus, TutorCandidate, ScoringWeights};
use tutor_match::services::{InMemoryMatchingService, MatchingService};

fn create_class(subject: &str) -> ClassRequest {
    ClassRequest {
        id: "class_1".to_string(),
        subject: subject.to_string(),
        status: ClassStatus::Open,
        student_name: Some("Trần Thị B".to_string()),
        location: Some("Thủ Đức".to_string()),
        schedule: None,
        budget: Some(180_000.0),
    }
}

fn create_tutor(id: &str, subjects: &[&str], total_classes: u32) -> TutorCandidate {
    TutorCandidate {
        id: id.to_string(),
        name: format!("Tutor {}", id),
        subjects: subjects.iter().map(|s| s.to_string()).collect(),
        rating: 4.0 + (total_classes % 10) as f64 / 10.0,
        total_classes,
        monthly_earnings: total_classes as f64 * 100_000.0,
    }
}

fn create_roster(size: usize) -> Vec<TutorCandidate> {
    let subjects = [
        &["Toán", "Lý"][..],
        &["Hóa"][..],
        &["Toán Cao Cấp"][..],
        &["Tiếng Anh"][..],
        &[][..],
    ];

    (0..size)
        .map(|i| create_tutor(&i.to_string(), subjects[i % subjects.len()], (i * 7 % 120) as u32))
        .collect()
}

#[test]
fn test_integration_end_to_end_ranking() {
    let matcher = Matcher::with_default_weights();
    let class = create_class("Toán");

    let ranked = matcher
        .rank_candidates(&class, &create_roster(50), &mut SeededJitter::new(2024))
        .unwrap();

    // Only the "Toán" and "Toán Cao Cấp" tutors pass the gate
    assert_eq!(ranked.len(), 20);

    for r in &ranked {
        assert!(!r.matched_subjects.is_empty());
        assert_eq!(r.breakdown.subject, 50);
        assert!(r.score >= 60 && r.score <= 89);
    }

    for i in 1..ranked.len() {
        assert!(
            ranked[i - 1].score >= ranked[i].score,
            "Ranking not sorted by score"
        );
    }
}

#[test]
fn test_ranking_is_unbounded() {
    let matcher = Matcher::with_default_weights();
    let roster: Vec<TutorCandidate> = (0..500)
        .map(|i| create_tutor(&i.to_string(), &["Toán"], i))
        .collect();

    let ranked = matcher
        .rank_candidates(&create_class("Toán"), &roster, &mut NoJitter)
        .unwrap();

    assert_eq!(ranked.len(), 500);
}

#[test]
fn test_same_seed_same_ranking() {
    let matcher = Matcher::with_default_weights()
        .with_jitter(JitterPolicy::new(JitterMode::Random, 0));
    let class = create_class("Toán");
    let roster = create_roster(100);

    let first = matcher
        .rank_candidates(&class, &roster, &mut *matcher.jitter_source(Some(5)))
        .unwrap();
    let second = matcher
        .rank_candidates(&class, &roster, &mut *matcher.jitter_source(Some(5)))
        .unwrap();

    let ids = |ranked: &[tutor_match::RankedTutor]| -> Vec<String> {
        ranked.iter().map(|r| r.tutor_id.clone()).collect()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[test]
fn test_empty_roster_returns_empty() {
    let matcher = Matcher::with_default_weights();
    let ranked = matcher
        .rank_candidates(&create_class("Toán"), &[], &mut SeededJitter::new(0))
        .unwrap();

    assert!(ranked.is_empty());
}

#[test]
fn test_custom_weights() {
    let weights = ScoringWeights {
        subject: 60,
        experience: 30,
        experience_threshold: 10,
        location: 0,
        jitter_max: 0,
    };
    let matcher = Matcher::new(weights);

    let ranked = matcher
        .rank_candidates(
            &create_class("Toán"),
            &[create_tutor("a", &["Toán"], 11), create_tutor("b", &["Toán"], 10)],
            &mut SeededJitter::new(9),
        )
        .unwrap();

    assert_eq!(ranked[0].tutor_id, "a");
    assert_eq!(ranked[0].score, 90);
    assert_eq!(ranked[1].score, 60);
}

#[tokio::test]
async fn test_confirm_top_ranked_tutor() {
    let matcher = Matcher::with_default_weights();
    let service = InMemoryMatchingService::new();
    let class = create_class("Toán");

    let ranked = matcher
        .rank_candidates(&class, &create_roster(10), &mut NoJitter)
        .unwrap();
    let top = &ranked[0];

    let record = service
        .confirm_match(&class.id, &top.tutor_id, top.breakdown.base())
        .await
        .unwrap();

    assert_eq!(record.class_id, class.id);
    assert_eq!(record.tutor_id, top.tutor_id);
    assert_eq!(record.score, top.score);

    let stored = service.matches_for_class(&class.id).await.unwrap();
    assert_eq!(stored, vec![record]);
}
