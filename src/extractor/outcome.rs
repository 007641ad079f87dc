use serde::Serialize;

/// Result of running one file through the extraction capability.
///
/// A success always carries text (possibly empty) and counts derived from it;
/// a failure only carries the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Extracted {
        text: String,
        character_count: usize,
        word_count: usize,
    },
    Failed {
        error_message: String,
    },
}

impl ExtractionOutcome {
    /// Build a success, computing counts from the text.
    pub fn extracted(text: String) -> Self {
        let character_count = text.chars().count();
        let word_count = text.split_whitespace().count();
        ExtractionOutcome::Extracted {
            text,
            character_count,
            word_count,
        }
    }

    pub fn failed<S: Into<String>>(error_message: S) -> Self {
        ExtractionOutcome::Failed {
            error_message: error_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Extracted { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ExtractionOutcome::Extracted { text, .. } => Some(text),
            ExtractionOutcome::Failed { .. } => None,
        }
    }

    pub fn character_count(&self) -> usize {
        match self {
            ExtractionOutcome::Extracted { character_count, .. } => *character_count,
            ExtractionOutcome::Failed { .. } => 0,
        }
    }

    pub fn word_count(&self) -> usize {
        match self {
            ExtractionOutcome::Extracted { word_count, .. } => *word_count,
            ExtractionOutcome::Failed { .. } => 0,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ExtractionOutcome::Extracted { .. } => None,
            ExtractionOutcome::Failed { error_message } => Some(error_message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_follow_text() {
        let outcome = ExtractionOutcome::extracted("Hello world".to_string());
        assert!(outcome.is_success());
        assert_eq!(outcome.text(), Some("Hello world"));
        assert_eq!(outcome.character_count(), 11);
        assert_eq!(outcome.word_count(), 2);
        assert_eq!(outcome.error_message(), None);
    }

    #[test]
    fn test_counts_are_unicode_aware() {
        let outcome = ExtractionOutcome::extracted("한글 문서\n\tok".to_string());
        assert_eq!(outcome.character_count(), 9);
        assert_eq!(outcome.word_count(), 3);
    }

    #[test]
    fn test_empty_text_is_still_success() {
        let outcome = ExtractionOutcome::extracted(String::new());
        assert!(outcome.is_success());
        assert_eq!(outcome.text(), Some(""));
        assert_eq!(outcome.character_count(), 0);
        assert_eq!(outcome.word_count(), 0);
    }

    #[test]
    fn test_failure_has_no_text() {
        let outcome = ExtractionOutcome::failed("corrupt archive");
        assert!(!outcome.is_success());
        assert_eq!(outcome.text(), None);
        assert_eq!(outcome.character_count(), 0);
        assert_eq!(outcome.word_count(), 0);
        assert_eq!(outcome.error_message(), Some("corrupt archive"));
    }

    #[test]
    fn test_serializes_with_status_tag() {
        let json = serde_json::to_value(ExtractionOutcome::failed("boom")).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error_message"], "boom");
    }
}
