/// Consent-step response classification.
///
/// The conversation engine treats natural-language interpretation as an
/// opaque collaborator: given a normalized response it must always produce
/// one of a finite set of categories, synchronously and without failing.
/// The default implementation is keyword-set substring matching.

/// Category assigned to a consent-step response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentIntent {
    /// The lead agreed to answer questions.
    Affirmative,
    /// The lead declined.
    Negative,
    /// Neither keyword set matched; ask the lead to clarify.
    Invalid,
}

/// Classifies a normalized (trimmed, lowercased) consent response.
pub trait ResponseClassifier: Send + Sync {
    fn classify_consent(&self, response: &str) -> ConsentIntent;
}

/// Affirmative keywords, matched as substrings of the normalized response.
const AFFIRMATIVE: [&str; 7] = ["yes", "y", "sure", "ok", "okay", "yep", "yeah"];

/// Negative keywords, matched as substrings of the normalized response.
const NEGATIVE: [&str; 5] = ["no", "n", "nope", "nah", "not interested"];

/// Keyword-set classifier.
///
/// The affirmative set is checked before the negative set, so a response
/// containing keywords from both (e.g. "yeah, not interested") resolves
/// affirmative. This matches the shipped behavior and is pinned by tests;
/// the intended resolution for mixed input was never decided, so the
/// precedence is kept rather than changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl ResponseClassifier for KeywordClassifier {
    fn classify_consent(&self, response: &str) -> ConsentIntent {
        if AFFIRMATIVE.iter().any(|word| response.contains(word)) {
            ConsentIntent::Affirmative
        } else if NEGATIVE.iter().any(|word| response.contains(word)) {
            ConsentIntent::Negative
        } else {
            ConsentIntent::Invalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_keywords() {
        let classifier = KeywordClassifier;
        for input in ["yes", "y", "sure", "ok", "okay", "yep", "yeah"] {
            assert_eq!(
                classifier.classify_consent(input),
                ConsentIntent::Affirmative,
                "input: {}",
                input
            );
        }
    }

    #[test]
    fn test_negative_keywords() {
        let classifier = KeywordClassifier;
        for input in ["no", "nope", "nah", "not interested"] {
            assert_eq!(
                classifier.classify_consent(input),
                ConsentIntent::Negative,
                "input: {}",
                input
            );
        }
    }

    #[test]
    fn test_substring_matching() {
        let classifier = KeywordClassifier;
        assert_eq!(
            classifier.classify_consent("yes please"),
            ConsentIntent::Affirmative
        );
        assert_eq!(
            classifier.classify_consent("i'm not interested thanks"),
            ConsentIntent::Negative
        );
    }

    #[test]
    fn test_unrecognized_input_is_invalid() {
        let classifier = KeywordClassifier;
        assert_eq!(
            classifier.classify_consent("what is this about?"),
            ConsentIntent::Invalid
        );
        assert_eq!(classifier.classify_consent(""), ConsentIntent::Invalid);
    }

    #[test]
    fn test_mixed_keywords_resolve_affirmative() {
        // Pinned precedence: the affirmative set is checked first, so a
        // response containing both sets resolves affirmative.
        let classifier = KeywordClassifier;
        assert_eq!(
            classifier.classify_consent("yeah, not interested"),
            ConsentIntent::Affirmative
        );
    }

    #[test]
    fn test_single_letter_n_is_a_substring_match() {
        // "n" appears in almost any word containing the letter; that is a
        // consequence of the substring rule, but "yes" wins first here.
        let classifier = KeywordClassifier;
        assert_eq!(
            classifier.classify_consent("n"),
            ConsentIntent::Negative
        );
    }
}
