use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to rank the tutor roster for a class request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankTutorsRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "class_id", rename = "classId")]
    pub class_id: String,
    /// Display cap; the ranking itself is unbounded
    #[serde(default)]
    pub limit: Option<u16>,
    /// Fixed seed for reproducible tie-break jitter
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Request to score a single tutor against a class request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreTutorRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "class_id", rename = "classId")]
    pub class_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "tutor_id", rename = "tutorId")]
    pub tutor_id: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Request to confirm a tutor for a class request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "class_id", rename = "classId")]
    pub class_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "tutor_id", rename = "tutorId")]
    pub tutor_id: String,
}

/// Query for listing confirmed matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMatchesQuery {
    #[serde(alias = "class_id", rename = "classId")]
    pub class_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_request_accepts_snake_case() {
        let req: RankTutorsRequest = serde_json::from_str(r#"{"class_id": "c1"}"#).unwrap();
        assert_eq!(req.class_id, "c1");
        assert_eq!(req.limit, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_confirm_request_rejects_blank_ids() {
        let req = ConfirmMatchRequest {
            class_id: String::new(),
            tutor_id: "t1".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
