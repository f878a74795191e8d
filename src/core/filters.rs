use crate::core::error::MatchError;
use crate::core::subjects::has_subject_match;
use crate::models::{ClassRequest, TutorCandidate};

/// Check if a class request may be offered for matching
///
/// Only requests in the `open` state are eligible.
#[inline]
pub fn is_eligible(class: &ClassRequest) -> bool {
    class.is_open()
}

/// Keep only the class requests eligible for matching, preserving order
pub fn open_requests(requests: Vec<ClassRequest>) -> Vec<ClassRequest> {
    requests.into_iter().filter(is_eligible).collect()
}

/// Check if a tutor passes the subject gate for a class request
///
/// Tutors failing this never appear in a ranking, whatever their experience.
#[inline]
pub fn passes_subject_gate(tutor: &TutorCandidate, class: &ClassRequest) -> bool {
    has_subject_match(&tutor.subjects, &class.subject)
}

/// Reject class requests that cannot be scored meaningfully
pub fn validate_class(class: &ClassRequest) -> Result<(), MatchError> {
    if class.id.trim().is_empty() {
        return Err(MatchError::InvalidInput("class request is missing an id".into()));
    }
    if class.subject.trim().is_empty() {
        return Err(MatchError::InvalidInput(format!(
            "class request {} is missing a subject",
            class.id
        )));
    }
    Ok(())
}

/// Reject tutors without an id
///
/// An empty subject list is valid; it simply fails the subject gate.
pub fn validate_tutor(tutor: &TutorCandidate) -> Result<(), MatchError> {
    if tutor.id.trim().is_empty() {
        return Err(MatchError::InvalidInput(format!(
            "tutor '{}' is missing an id",
            tutor.name
        )));
    }
    Ok(())
}
