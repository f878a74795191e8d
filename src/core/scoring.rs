use crate::models::{ClassRequest, TutorCandidate, ScoreBreakdown, ScoringWeights, MAX_SCORE};
use crate::core::subjects::has_subject_match;

/// Calculate the match score breakdown (0-100) of a tutor for a class request
///
/// Scoring formula (default weights):
/// score = min(
///     subject      # 50 if a tutor subject contains the class subject
///   + experience   # 20 if the tutor taught more than 50 classes
///   + location     # 10, flat; tutor records carry no address to compare
///   + jitter,      # 0..=9, supplied by the caller
///     100
/// )
///
/// This function is pure: the same inputs and jitter give the same result.
pub fn score_breakdown(
    class: &ClassRequest,
    tutor: &TutorCandidate,
    weights: &ScoringWeights,
    jitter: u8,
) -> ScoreBreakdown {
    let subject = if has_subject_match(&tutor.subjects, &class.subject) {
        weights.subject
    } else {
        0
    };

    let experience = calculate_experience_points(tutor.total_classes, weights);
    let location = weights.location;
    let jitter = jitter.min(weights.jitter_max);

    let total = (subject as u16 + experience as u16 + location as u16 + jitter as u16)
        .min(MAX_SCORE as u16) as u8;

    ScoreBreakdown {
        subject,
        experience,
        location,
        jitter,
        total,
    }
}

/// Calculate the final match score (0-100)
#[inline]
pub fn calculate_match_score(
    class: &ClassRequest,
    tutor: &TutorCandidate,
    weights: &ScoringWeights,
    jitter: u8,
) -> u8 {
    score_breakdown(class, tutor, weights, jitter).total
}

/// Experience bonus, using the number of classes taught as a proxy
#[inline]
fn calculate_experience_points(total_classes: u32, weights: &ScoringWeights) -> u8 {
    if total_classes > weights.experience_threshold {
        weights.experience
    } else {
        0
    }
}

/// Estimate an hourly rate from monthly earnings, for display only
///
/// Returns `None` when the hour basis is not positive or earnings are
/// not a usable number.
pub fn estimate_hourly_rate(monthly_earnings: f64, monthly_hours: f64) -> Option<f64> {
    if monthly_hours <= 0.0 || !monthly_earnings.is_finite() || monthly_earnings < 0.0 {
        return None;
    }
    Some((monthly_earnings / monthly_hours).round())
}
