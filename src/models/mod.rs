// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ClassRequest, ClassStatus, TutorCandidate, ScoreBreakdown, MatchResult, RankedTutor, MatchRecord, ScoringWeights, MAX_SCORE};
pub use requests::{RankTutorsRequest, ScoreTutorRequest, ConfirmMatchRequest, ListMatchesQuery};
pub use responses::{OpenClassesResponse, RankTutorsResponse, ScoreTutorResponse, ListMatchesResponse, HealthResponse, ErrorResponse};
