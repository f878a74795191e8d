// Core algorithm exports
pub mod error;
pub mod filters;
pub mod jitter;
pub mod matcher;
pub mod scoring;
pub mod subjects;

pub use error::MatchError;
pub use filters::{is_eligible, open_requests, passes_subject_gate, validate_class, validate_tutor};
pub use jitter::{JitterMode, JitterPolicy, JitterSource, NoJitter, SeededJitter, ThreadRngJitter};
pub use matcher::{Matcher, DEFAULT_MONTHLY_HOURS};
pub use scoring::{calculate_match_score, estimate_hourly_rate, score_breakdown};
pub use subjects::{has_subject_match, matched_subjects, normalize_subject, subject_covers};
