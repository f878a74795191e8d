/// Normalize a free-text subject for comparison
///
/// Trims surrounding whitespace and lowercases (Unicode-aware, so "TOÁN"
/// and "toán" compare equal).
#[inline]
pub fn normalize_subject(subject: &str) -> String {
    subject.trim().to_lowercase()
}

/// Check whether a tutor subject covers a class subject
///
/// This is a case-insensitive substring test, not equality: a tutor listing
/// "Toán Cao Cấp" covers a class asking for "Toán". An empty class subject
/// never matches.
#[inline]
pub fn subject_covers(tutor_subject: &str, class_subject: &str) -> bool {
    let needle = normalize_subject(class_subject);
    if needle.is_empty() {
        return false;
    }
    normalize_subject(tutor_subject).contains(&needle)
}

/// Return every tutor subject that covers the class subject, in listing order
pub fn matched_subjects(tutor_subjects: &[String], class_subject: &str) -> Vec<String> {
    let needle = normalize_subject(class_subject);
    if needle.is_empty() {
        return Vec::new();
    }

    tutor_subjects
        .iter()
        .filter(|s| normalize_subject(s).contains(&needle))
        .cloned()
        .collect()
}

/// True if at least one tutor subject covers the class subject
#[inline]
pub fn has_subject_match(tutor_subjects: &[String], class_subject: &str) -> bool {
    let needle = normalize_subject(class_subject);
    !needle.is_empty()
        && tutor_subjects
            .iter()
            .any(|s| normalize_subject(s).contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_containment() {
        assert!(subject_covers("Toán", "toán"));
        assert!(subject_covers("TOÁN CAO CẤP", "Toán"));
        assert!(subject_covers("  Math  ", "math"));
        assert!(!subject_covers("Hóa", "Toán"));
    }

    #[test]
    fn test_class_subject_is_trimmed() {
        assert!(subject_covers("Toán", "  Toán "));
        assert!(subject_covers("Toán Cao Cấp", "toán\t"));
        assert!(has_subject_match(&["Lý".to_string()], " lý "));
    }

    #[test]
    fn test_containment_is_one_directional() {
        // The class subject must be inside the tutor subject, not the reverse
        assert!(!subject_covers("Toán", "Toán Cao Cấp"));
    }

    #[test]
    fn test_empty_class_subject_never_matches() {
        assert!(!subject_covers("Toán", ""));
        assert!(!subject_covers("Toán", "   "));
        assert!(!has_subject_match(&["Toán".to_string()], ""));
    }

    #[test]
    fn test_matched_subjects() {
        let subjects = vec![
            "Toán".to_string(),
            "Lý".to_string(),
            "Toán Cao Cấp".to_string(),
        ];

        assert_eq!(matched_subjects(&subjects, "toán"), vec!["Toán", "Toán Cao Cấp"]);
        assert!(matched_subjects(&subjects, "Hóa").is_empty());
        assert!(!has_subject_match(&[], "Toán"));
    }
}
