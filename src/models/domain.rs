use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle state of a class request
///
/// The directory treats status as free text, so anything we don't know is
/// kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClassStatus {
    Open,
    Matched,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl ClassStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ClassStatus::Open => "open",
            ClassStatus::Matched => "matched",
            ClassStatus::InProgress => "in_progress",
            ClassStatus::Completed => "completed",
            ClassStatus::Cancelled => "cancelled",
            ClassStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for ClassStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "open" => ClassStatus::Open,
            "matched" => ClassStatus::Matched,
            "in_progress" => ClassStatus::InProgress,
            "completed" => ClassStatus::Completed,
            "cancelled" => ClassStatus::Cancelled,
            _ => ClassStatus::Other(value),
        }
    }
}

impl From<ClassStatus> for String {
    fn from(value: ClassStatus) -> Self {
        value.as_str().to_string()
    }
}

impl Default for ClassStatus {
    fn default() -> Self {
        ClassStatus::Other(String::new())
    }
}

/// A posted tutoring need awaiting tutor assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRequest {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ClassStatus,
    #[serde(rename = "studentName", default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
}

impl ClassRequest {
    pub fn is_open(&self) -> bool {
        self.status == ClassStatus::Open
    }
}

/// Tutor as listed in the user directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorCandidate {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subjects: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(rename = "totalClasses", default, deserialize_with = "lenient_count")]
    pub total_classes: u32,
    #[serde(rename = "monthlyEarnings", default, deserialize_with = "null_as_default")]
    pub monthly_earnings: f64,
}

// Directory documents send `null` for unset fields
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Counts may arrive as floats (`80.0`); negatives and NaN become 0
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if value.is_nan() || value <= 0.0 {
        return Ok(0);
    }
    Ok(value.min(u32::MAX as f64) as u32)
}

/// Per-term contribution to a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub subject: u8,
    pub experience: u8,
    pub location: u8,
    pub jitter: u8,
    pub total: u8,
}

impl ScoreBreakdown {
    /// Score without the jitter term, clamped the same way as `total`
    pub fn base(&self) -> u8 {
        self.subject
            .saturating_add(self.experience)
            .saturating_add(self.location)
            .min(MAX_SCORE)
    }
}

/// Upper bound for every match score
pub const MAX_SCORE: u8 = 100;

/// Transient score of one tutor against one class request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "tutorId")]
    pub tutor_id: String,
    #[serde(rename = "classId")]
    pub class_id: String,
    pub score: u8,
}

/// Ranked tutor as shown to office staff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedTutor {
    #[serde(rename = "tutorId")]
    pub tutor_id: String,
    pub name: String,
    pub subjects: Vec<String>,
    #[serde(rename = "matchedSubjects")]
    pub matched_subjects: Vec<String>,
    pub rating: f64,
    #[serde(rename = "totalClasses")]
    pub total_classes: u32,
    #[serde(rename = "estimatedHourlyRate")]
    pub estimated_hourly_rate: Option<f64>,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}

/// A confirmed tutor/class pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: uuid::Uuid,
    #[serde(rename = "classId")]
    pub class_id: String,
    #[serde(rename = "tutorId")]
    pub tutor_id: String,
    pub score: u8,
    #[serde(rename = "confirmedAt")]
    pub confirmed_at: chrono::DateTime<chrono::Utc>,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub subject: u8,
    pub experience: u8,
    /// Experience bonus applies strictly above this many classes
    pub experience_threshold: u32,
    pub location: u8,
    pub jitter_max: u8,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            subject: 50,
            experience: 20,
            experience_threshold: 50,
            location: 10,
            jitter_max: 9,
        }
    }
}
