use serde::{Deserialize, Serialize};
use crate::models::domain::{ClassRequest, MatchRecord, RankedTutor, ScoreBreakdown};

/// Response for the open classes endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenClassesResponse {
    pub classes: Vec<ClassRequest>,
    pub total: usize,
}

/// Response for the rank endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankTutorsResponse {
    #[serde(rename = "classId")]
    pub class_id: String,
    pub matches: Vec<RankedTutor>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "totalMatched")]
    pub total_matched: usize,
}

/// Response for the single score endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTutorResponse {
    #[serde(rename = "classId")]
    pub class_id: String,
    #[serde(rename = "tutorId")]
    pub tutor_id: String,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}

/// Response for listing confirmed matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMatchesResponse {
    #[serde(rename = "classId")]
    pub class_id: String,
    pub matches: Vec<MatchRecord>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
