//! Tutor Match - tutor/class matching service for the marketplace office dashboard
//!
//! This library provides the rule-based scoring used by office staff to pair
//! open class requests with tutors, plus the HTTP service around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchError, JitterSource, JitterPolicy, JitterMode, NoJitter, SeededJitter, open_requests};
pub use models::{ClassRequest, ClassStatus, TutorCandidate, RankedTutor, ScoreBreakdown, MatchRecord, ScoringWeights};
