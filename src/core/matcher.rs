use crate::models::{ClassRequest, TutorCandidate, RankedTutor, ScoreBreakdown, ScoringWeights, MatchResult};
use crate::core::{
    error::MatchError,
    filters::{passes_subject_gate, validate_class, validate_tutor},
    jitter::{JitterPolicy, JitterSource},
    scoring::{estimate_hourly_rate, score_breakdown},
    subjects::matched_subjects,
};

/// Default number of teaching hours a month used for the rate estimate
pub const DEFAULT_MONTHLY_HOURS: f64 = 40.0;

/// Tutor matching orchestrator
///
/// # Pipeline Stages
/// 1. Input validation
/// 2. Subject gate
/// 3. Scoring (with caller-supplied jitter)
/// 4. Stable descending sort
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    jitter: JitterPolicy,
    monthly_hours: f64,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            jitter: JitterPolicy::default(),
            monthly_hours: DEFAULT_MONTHLY_HOURS,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_monthly_hours(mut self, monthly_hours: f64) -> Self {
        self.monthly_hours = monthly_hours;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Fresh jitter source according to the configured policy
    pub fn jitter_source(&self, seed: Option<u64>) -> Box<dyn JitterSource + Send> {
        self.jitter.source(seed)
    }

    /// Score one tutor against one class request, with the per-term breakdown
    pub fn breakdown<J>(
        &self,
        class: &ClassRequest,
        tutor: &TutorCandidate,
        jitter: &mut J,
    ) -> Result<ScoreBreakdown, MatchError>
    where
        J: JitterSource + ?Sized,
    {
        validate_class(class)?;
        validate_tutor(tutor)?;

        let drawn = jitter.next_jitter(self.weights.jitter_max);
        Ok(score_breakdown(class, tutor, &self.weights, drawn))
    }

    /// Score one tutor against one class request (0-100)
    pub fn score<J>(
        &self,
        class: &ClassRequest,
        tutor: &TutorCandidate,
        jitter: &mut J,
    ) -> Result<MatchResult, MatchError>
    where
        J: JitterSource + ?Sized,
    {
        let breakdown = self.breakdown(class, tutor, jitter)?;
        Ok(MatchResult {
            tutor_id: tutor.id.clone(),
            class_id: class.id.clone(),
            score: breakdown.total,
        })
    }

    /// Rank the tutor roster for a class request
    ///
    /// Tutors failing the subject gate are left out entirely. The result is
    /// sorted by score, highest first; equal scores keep roster order. The
    /// full ranking is returned, callers truncate for display.
    ///
    /// Tutors without an id are skipped rather than failing the whole roster.
    pub fn rank_candidates<J>(
        &self,
        class: &ClassRequest,
        tutors: &[TutorCandidate],
        jitter: &mut J,
    ) -> Result<Vec<RankedTutor>, MatchError>
    where
        J: JitterSource + ?Sized,
    {
        validate_class(class)?;

        let mut ranked: Vec<RankedTutor> = tutors
            .iter()
            .filter(|tutor| match validate_tutor(tutor) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Skipping tutor while ranking class {}: {}", class.id, e);
                    false
                }
            })
            .filter(|tutor| passes_subject_gate(tutor, class))
            .map(|tutor| {
                let drawn = jitter.next_jitter(self.weights.jitter_max);
                let breakdown = score_breakdown(class, tutor, &self.weights, drawn);

                RankedTutor {
                    tutor_id: tutor.id.clone(),
                    name: tutor.name.clone(),
                    subjects: tutor.subjects.clone(),
                    matched_subjects: matched_subjects(&tutor.subjects, &class.subject),
                    rating: tutor.rating,
                    total_classes: tutor.total_classes,
                    estimated_hourly_rate: estimate_hourly_rate(
                        tutor.monthly_earnings,
                        self.monthly_hours,
                    ),
                    score: breakdown.total,
                    breakdown,
                }
            })
            .collect();

        // sort_by is stable, so ties stay in roster order
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!(
            "Ranked {} of {} tutors for class {} ({})",
            ranked.len(),
            tutors.len(),
            class.id,
            class.subject
        );

        Ok(ranked)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
